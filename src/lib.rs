//! A simple Driver for SSD1680 based monochrome E-Ink Displays via SPI
//!
//! This driver was built using [`embedded-hal`] traits.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal/1.0.0
//!
//! # Requirements
//!
//! ### SPI
//!
//! - MISO is not connected/available
//! - SPI_MODE_0 is used (CPHL = 0, CPOL = 0)
//! - 8 bits per word, MSB first
//! - 4Mhz is the tested clock, see [`ssd1680::SPI_FREQUENCY_HZ`]
//! - chip select is handled by the [`SpiDevice`](embedded_hal::spi::SpiDevice),
//!   every byte is sent in its own transaction
//!
//! ### Other....
//!
//! - Reset and Busy are optional, pass `None::<NoPin>` if they aren't wired
//! - The driver needs a [`HostRuntime`](traits::HostRuntime) for the elapsed time and
//!   to give the rest of the firmware (watchdog, ...) a chance to run while the panel refreshes
//! - Buffersize: `width / 8 * height`, the buffer is owned by the driver
//!
//! # Examples
//!
//! ```ignore
//! use ssd1680_epaper::prelude::*;
//!
//! let mut epd = Ssd1680::new(spi, dc, Some(busy), Some(rst), delay, host)?;
//!
//! // draw something into the buffer
//! epd.set_pixel(10, 20, true);
//!
//! // the first update also initialises the controller
//! epd.update()?;
//! ```
//!
//!
#![no_std]
#![deny(missing_docs)]

#[cfg(feature = "graphics")]
pub mod graphics;

pub mod traits;

pub mod error;

pub mod framebuffer;

/// Interface for the physical connection between display and the controlling device
pub mod interface;

pub mod ssd1680;

#[cfg(test)]
extern crate std;

#[cfg(test)]
mod testing;

/// Includes everything important besides the chosen Display
pub mod prelude {
    pub use crate::error::ErrorKind;
    pub use crate::framebuffer::Framebuffer;
    pub use crate::interface::{IdleWait, NoPin};
    pub use crate::ssd1680::{Config, Display2in9, PanelState, Ssd1680};
    pub use crate::traits::HostRuntime;
    pub use crate::SPI_MODE;
}

use embedded_hal::spi::{Mode, Phase, Polarity};

/// SPI mode -
/// For more infos see [Requirements: SPI](index.html#spi)
pub const SPI_MODE: Mode = Mode {
    phase: Phase::CaptureOnFirstTransition,
    polarity: Polarity::IdleLow,
};

/// Computes the needed buffer length. Takes care of rounding up in case width
/// is not divisible by 8.
pub const fn buffer_len(width: usize, height: usize) -> usize {
    (width + 7) / 8 * height
}
