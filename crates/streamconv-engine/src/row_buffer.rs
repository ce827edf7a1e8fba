use std::ops::RangeInclusive;

use streamconv_core::Word;
use streamconv_kernel::Window;

/// Role of a row inside the [`RowBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The row above the one being produced.
    Prev = 0,
    /// The row being produced.
    Cur = 1,
    /// The row below the one being produced.
    Next = 2,
}

/// One image row plus a border slot on each side.
///
/// Slot 0 is the left border, slots `1..=width` hold pixels and slot `width + 1` is
/// the right border.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row(Vec<Word>);

impl Row {
    /// Create a zeroed row for an image `width` pixels wide.
    pub fn new(width: usize) -> Self {
        Self(vec![0; width + 2])
    }

    /// All slots, borders included.
    pub fn as_slice(&self) -> &[Word] {
        &self.0
    }

    /// The pixel slots only.
    pub fn pixels(&self) -> &[Word] {
        &self.0[1..self.0.len() - 1]
    }

    fn clear(&mut self) {
        self.0.fill(0);
    }
}

/// Three rows forming a circular window over the image.
///
/// Rotation only moves the role mapping; the storage of each row stays where it is
/// and is reused for the row that is loaded next.
///
/// The border slots follow the raster layout of the image treated as one continuous
/// strip: the left border of a row holds the last pixel of the row above and the
/// right border holds the first pixel of the row below. The first image row has
/// zero borders and the last image row has a zero right border. Rows above the
/// first and below the last image row are all zero.
#[derive(Debug, Clone)]
pub struct RowBuffer {
    rows: [Row; 3],
    // storage index currently playing `Role::Prev`
    head: usize,
    width: usize,
}

impl RowBuffer {
    /// Create a zeroed buffer for an image `width` pixels wide.
    pub fn new(width: usize) -> Self {
        Self {
            rows: [Row::new(width), Row::new(width), Row::new(width)],
            head: 0,
            width,
        }
    }

    /// Width of the image in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Zero every row and restore the initial role mapping.
    pub fn reset(&mut self) {
        self.rows.iter_mut().for_each(Row::clear);
        self.head = 0;
    }

    fn index(&self, role: Role) -> usize {
        (self.head + role as usize) % 3
    }

    /// The row playing `role`.
    pub fn row(&self, role: Role) -> &Row {
        &self.rows[self.index(role)]
    }

    /// The row playing `role`.
    pub fn row_mut(&mut self, role: Role) -> &mut Row {
        let index = self.index(role);
        &mut self.rows[index]
    }

    /// Store one word into a slot of the row playing `role`.
    pub fn set(&mut self, role: Role, slot: usize, word: Word) {
        self.row_mut(role).0[slot] = word;
    }

    /// Slots of `Role::Cur` filled from memory before the first row is produced.
    pub fn bootstrap_slots(&self) -> RangeInclusive<usize> {
        1..=self.width
    }

    /// Prepare `Role::Next` to receive image row `loaded` (zero-based) of an
    /// image `height` rows tall, and return the slots to fill from memory.
    ///
    /// Except for the first loaded row, slot 1 already sits in the right border of
    /// `Role::Cur`, read one row early, and is carried over. Except for the last
    /// image row, the first pixel of the following row is read into the right
    /// border. The last image row gets a zero right border instead.
    ///
    /// PRECONDITION: `1 <= loaded < height`.
    pub fn begin_next(&mut self, loaded: usize, height: usize) -> RangeInclusive<usize> {
        let w = self.width;
        let (cur, next) = (self.index(Role::Cur), self.index(Role::Next));

        let first = if loaded == 1 {
            1
        } else {
            self.rows[next].0[1] = self.rows[cur].0[w + 1];
            2
        };

        let last = if loaded + 1 == height {
            self.rows[next].0[w + 1] = 0;
            w
        } else {
            w + 1
        };

        first..=last
    }

    /// Fill the left border of `Role::Next` with the last pixel of `Role::Cur`.
    pub fn finish_next(&mut self) {
        let (cur, next) = (self.index(Role::Cur), self.index(Role::Next));
        self.rows[next].0[0] = self.rows[cur].0[self.width];
    }

    /// Zero `Role::Next`, used below the last image row.
    pub fn clear_next(&mut self) {
        self.row_mut(Role::Next).clear();
    }

    /// The 3x3 window centered on pixel slot `col`.
    ///
    /// PRECONDITION: `1 <= col <= width`.
    pub fn window(&self, col: usize) -> Window {
        Window::from_rows(
            self.row(Role::Prev).as_slice(),
            self.row(Role::Cur).as_slice(),
            self.row(Role::Next).as_slice(),
            col,
        )
    }

    /// Shift the roles down by one row: prev takes cur, cur takes next and the
    /// storage of the old prev is handed to next.
    pub fn rotate(&mut self) {
        self.head = (self.head + 1) % 3;
    }
}
