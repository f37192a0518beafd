//! Packed monochrome frame buffer
//!
//! One bit per pixel, lines are stored top to bottom and every line starts on a
//! byte boundary. Bit 7 of a byte is the leftmost of its 8 pixels.
//!
//! The bit polarity is inverted compared to the controller RAM: a cleared bit is
//! a pixel that is "on" (foreground), a set bit is background. That way a buffer
//! filled with `0xFF` is blank. The driver complements every byte while
//! streaming it to the panel, see [`Ssd1680::update`](crate::ssd1680::Ssd1680::update).

/// Byte value of eight background pixels
pub const BACKGROUND_BYTE: u8 = 0xFF;

/// count the number of bytes per line knowing that it may contains padding bits
const fn line_bytes(width: u32) -> usize {
    // round to upper 8 bit count
    (width as usize + 7) / 8
}

/// Frame buffer used for drawing
///
/// - WIDTH: width in pixel
/// - HEIGHT: height in pixel
/// - BYTECOUNT: This is redundant with previous data and should be removed when const generic
///   expressions are stabilized, use [`buffer_len`](crate::buffer_len)
pub struct Framebuffer<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize> {
    buffer: [u8; BYTECOUNT],
}

impl<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize> Default
    for Framebuffer<WIDTH, HEIGHT, BYTECOUNT>
{
    /// Every pixel starts as background
    // inline is necessary here to allow heap allocation via Box on stack limited programs
    #[inline(always)]
    fn default() -> Self {
        debug_assert_eq!(BYTECOUNT, line_bytes(WIDTH) * HEIGHT as usize);
        Self {
            buffer: [BACKGROUND_BYTE; BYTECOUNT],
        }
    }
}

impl<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize>
    Framebuffer<WIDTH, HEIGHT, BYTECOUNT>
{
    /// get internal buffer to use it (to draw in epd)
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        WIDTH
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        HEIGHT
    }

    /// Set a single pixel
    ///
    /// `on` draws the pixel in the foreground color, `!on` resets it to background.
    /// Coordinates outside of the buffer are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        let Some((index, mask)) = Self::locate(x, y) else {
            return;
        };

        if on {
            self.buffer[index] &= !mask;
        } else {
            self.buffer[index] |= mask;
        }
    }

    /// Set every pixel of the buffer
    pub fn fill(&mut self, on: bool) {
        let byte = if on { !BACKGROUND_BYTE } else { BACKGROUND_BYTE };
        self.buffer.iter_mut().for_each(|b| *b = byte);
    }

    /// Byte index and bit mask of a pixel, `None` if it is outside of the buffer
    fn locate(x: i32, y: i32) -> Option<(usize, u8)> {
        // as i32 = never use more than 2 billion pixel per line or per column
        if x < 0 || x >= WIDTH as i32 || y < 0 || y >= HEIGHT as i32 {
            return None;
        }

        let (x, y) = (x as usize, y as usize);
        let index = line_bytes(WIDTH) * y + x / 8;
        let mask = 0x80 >> (x % 8);
        Some((index, mask))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer_len;

    type Panel = Framebuffer<128, 296, { buffer_len(128, 296) }>;

    fn is_on(fb: &Panel, x: usize, y: usize) -> bool {
        fb.buffer()[16 * y + x / 8] & (0x80 >> (x % 8)) == 0
    }

    #[test]
    fn framebuffer_size() {
        let fb = Panel::default();
        assert_eq!(fb.buffer().len(), 4736);
        assert_eq!(fb.width(), 128);
        assert_eq!(fb.height(), 296);
    }

    #[test]
    fn framebuffer_default_is_background() {
        let fb = Panel::default();
        assert!(fb.buffer().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn on_clears_and_off_sets_the_bit() {
        let mut fb = Panel::default();

        fb.set_pixel(3, 5, true);
        assert_eq!(fb.buffer()[16 * 5], 0b1110_1111);
        assert!(is_on(&fb, 3, 5));

        fb.set_pixel(3, 5, false);
        assert_eq!(fb.buffer()[16 * 5], 0xFF);
        assert!(!is_on(&fb, 3, 5));
    }

    #[test]
    fn corners_hit_the_expected_byte_and_bit() {
        let corners = [
            (0, 0, 0, 0x80),
            (127, 0, 15, 0x01),
            (0, 295, 16 * 295, 0x80),
            (127, 295, 16 * 295 + 15, 0x01),
        ];

        for (x, y, index, mask) in corners {
            let mut fb = Panel::default();
            fb.set_pixel(x, y, true);
            for (i, &byte) in fb.buffer().iter().enumerate() {
                if i == index {
                    assert_eq!(byte, !mask, "pixel ({x}, {y})");
                } else {
                    assert_eq!(byte, 0xFF, "pixel ({x}, {y}) touched byte {i}");
                }
            }
        }
    }

    #[test]
    fn out_of_range_writes_are_dropped() {
        let mut fb = Panel::default();
        fb.set_pixel(10, 10, true);
        let before = fb.buffer().to_vec();

        for (x, y) in [(-1, 0), (0, -1), (128, 0), (0, 296), (128, 296), (i32::MIN, i32::MAX)] {
            fb.set_pixel(x, y, true);
            fb.set_pixel(x, y, false);
        }

        assert_eq!(fb.buffer(), &before[..]);
    }

    #[test]
    fn fill_sets_every_pixel() {
        let mut fb = Panel::default();
        fb.fill(true);
        assert!(fb.buffer().iter().all(|&b| b == 0x00));
        fb.fill(false);
        assert!(fb.buffer().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn lines_are_padded_to_whole_bytes() {
        let mut fb = Framebuffer::<12, 3, { buffer_len(12, 3) }>::default();
        assert_eq!(fb.buffer().len(), 6);

        fb.set_pixel(11, 1, true);
        assert_eq!(fb.buffer(), &[0xFF, 0xFF, 0xFF, 0b1110_1111, 0xFF, 0xFF]);

        // padding bits of a line are not addressable
        fb.set_pixel(12, 1, true);
        assert_eq!(fb.buffer()[3], 0b1110_1111);
    }
}
