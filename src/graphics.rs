//! Graphics Support for the SSD1680
//!
//! The frame buffer and the driver are embedded-graphics draw targets for
//! [`BinaryColor`]. `BinaryColor::On` is a foreground pixel, see
//! [`Framebuffer::set_pixel`].

use core::convert::Infallible;

use embedded_graphics_core::{pixelcolor::BinaryColor, prelude::*};

use crate::framebuffer::Framebuffer;
use crate::ssd1680::Ssd1680;

/// For use with embedded_grahics
impl<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize> DrawTarget
    for Framebuffer<WIDTH, HEIGHT, BYTECOUNT>
{
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color.is_on());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color.is_on());
        Ok(())
    }
}

/// For use with embedded_grahics
impl<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize> OriginDimensions
    for Framebuffer<WIDTH, HEIGHT, BYTECOUNT>
{
    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }
}

/// Draws into the buffer owned by the driver, call
/// [`update`](Ssd1680::update) to show it
impl<SPI, BUSY, DC, RST, DELAY, HOST> DrawTarget for Ssd1680<SPI, BUSY, DC, RST, DELAY, HOST> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.framebuffer.draw_iter(pixels)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.framebuffer.clear(color)
    }
}

impl<SPI, BUSY, DC, RST, DELAY, HOST> OriginDimensions
    for Ssd1680<SPI, BUSY, DC, RST, DELAY, HOST>
{
    fn size(&self) -> Size {
        self.framebuffer.size()
    }
}
