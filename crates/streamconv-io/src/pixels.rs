use streamconv_core::Word;

/// Widen 8-bit pixels into one word each.
pub fn pixels_to_words(pixels: &[u8]) -> Vec<Word> {
    pixels.iter().map(|&p| p as Word).collect()
}

/// Narrow words into 8-bit pixels by keeping the low byte of each word.
pub fn words_to_pixels(words: &[Word]) -> Vec<u8> {
    words.iter().map(|&w| w as u8).collect()
}

/// Luma of an RGB pixel with the ITU-R 601-2 weights (0.299, 0.587, 0.114).
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    // 16-bit fixed point with rounding
    ((r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16) as u8
}
