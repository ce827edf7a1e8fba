use streamconv_core::Word;

/// A 3x3 neighborhood of samples, indexed as `cells[row][col]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    /// The samples in row-major order.
    pub cells: [[Word; 3]; 3],
}

impl Window {
    /// Create a window from its samples.
    pub fn new(cells: [[Word; 3]; 3]) -> Self {
        Self { cells }
    }

    /// Take the window centered on slot `col` of three stacked rows.
    ///
    /// PRECONDITION: `1 <= col` and `col + 1 < row.len()` for all three rows.
    pub fn from_rows(prev: &[Word], cur: &[Word], next: &[Word], col: usize) -> Self {
        let mut cells = [[0; 3]; 3];
        for (dst, src) in cells.iter_mut().zip([prev, cur, next]) {
            dst.copy_from_slice(&src[col - 1..col + 2]);
        }
        Self { cells }
    }

    /// The nine samples in row-major order.
    pub fn to_row_major(&self) -> [Word; 9] {
        let mut samples = [0; 9];
        for (dst, src) in samples.chunks_exact_mut(3).zip(self.cells.iter()) {
            dst.copy_from_slice(src);
        }
        samples
    }

    /// The window rotated by 180 degrees around its center.
    pub fn rotate_180(&self) -> Self {
        let mut cells = self.cells;
        cells.reverse();
        cells.iter_mut().for_each(|row| row.reverse());
        Self { cells }
    }

    /// Wrapping sum of the four corner samples.
    pub fn corners(&self) -> Word {
        let c = &self.cells;
        c[0][0]
            .wrapping_add(c[0][2])
            .wrapping_add(c[2][0])
            .wrapping_add(c[2][2])
    }

    /// Wrapping sum of the four edge-center samples.
    pub fn edges(&self) -> Word {
        let c = &self.cells;
        c[0][1]
            .wrapping_add(c[1][0])
            .wrapping_add(c[1][2])
            .wrapping_add(c[2][1])
    }

    /// The center sample.
    pub fn center(&self) -> Word {
        self.cells[1][1]
    }
}

#[cfg(test)]
mod tests {
    use super::Window;

    #[test]
    fn window_from_rows() {
        let prev = [0, 1, 2, 3, 4];
        let cur = [5, 6, 7, 8, 9];
        let next = [10, 11, 12, 13, 14];

        let window = Window::from_rows(&prev, &cur, &next, 1);
        assert_eq!(window.cells, [[0, 1, 2], [5, 6, 7], [10, 11, 12]]);

        let window = Window::from_rows(&prev, &cur, &next, 3);
        #[rustfmt::skip]
        assert_eq!(window.to_row_major(), [
            2, 3, 4,
            7, 8, 9,
            12, 13, 14,
        ]);
    }

    #[test]
    fn window_rotate_180() {
        let window = Window::new([[1, 2, 3], [4, 5, 6], [7, 8, 9]]);
        let rotated = window.rotate_180();
        assert_eq!(rotated.cells, [[9, 8, 7], [6, 5, 4], [3, 2, 1]]);
        assert_eq!(rotated.rotate_180(), window);
    }

    #[test]
    fn window_groups() {
        let window = Window::new([[1, 2, 3], [4, 5, 6], [7, 8, 9]]);
        assert_eq!(window.corners(), 1 + 3 + 7 + 9);
        assert_eq!(window.edges(), 2 + 4 + 6 + 8);
        assert_eq!(window.center(), 5);

        let window = Window::new([[u32::MAX, 0, 1], [0; 3], [0; 3]]);
        assert_eq!(window.corners(), 0);
    }
}
