//! A simple Driver for 2.9" E-Ink Displays with the SSD1680 controller via SPI
//!
//! Black/white only, full refresh only. The panel has 128x296 pixels.
//!
//! # Example
//!
//!```rust, ignore
//!use ssd1680_epaper::prelude::*;
//!
//!// Setup EPD, the controller isn't touched yet
//!let mut epd = Ssd1680::new(spi, dc, Some(busy), Some(rst), delay, host)?;
//!
//!// Draw into the buffer owned by the driver
//!epd.set_pixel(0, 0, true);
//!
//!// First update: reset + init, then transfer the frame and refresh
//!epd.update()?;
//!
//!// Later updates only transfer and refresh
//!epd.update_with(|display| display.set_pixel(1, 1, true))?;
//!# Ok(())
//!```
//!
//! With the `graphics` feature the driver is an embedded-graphics `DrawTarget`
//! for [`BinaryColor`](embedded_graphics_core::pixelcolor::BinaryColor).

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};
use log::{debug, info, warn};

use crate::buffer_len;
use crate::error::DriverError;
use crate::framebuffer::Framebuffer;
use crate::interface::{DisplayInterface, IdleWait};
use crate::traits::HostRuntime;

pub(crate) mod command;
mod config;

pub use config::Config;

use self::command::{
    BorderWaveForm, BorderWaveFormFixLevel, BorderWaveFormGs, BorderWaveFormVbd, Command,
    DataEntryMode, DataEntryModeDir, DataEntryModeIncr, DisplayUpdateControl2, DriverOutput,
    TemperatureSensor,
};

/// Width of the panel in pixels
pub const WIDTH: u32 = 128;
/// Height of the panel in pixels
pub const HEIGHT: u32 = 296;
/// Color depth, the panel is black/white
pub const BITS_PER_PIXEL: u32 = 1;
/// Clock the driver was tested with
pub const SPI_FREQUENCY_HZ: u32 = 4_000_000;

/// Size of a full frame in bytes
pub const FRAME_BYTES: usize = buffer_len(WIDTH as usize, HEIGHT as usize);

/// Full size buffer for the 2.9" panel
pub type Display2in9 = Framebuffer<WIDTH, HEIGHT, FRAME_BYTES>;

/// Where the controller is in its one-time setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    /// Nothing was sent to the controller yet
    #[default]
    Uninitialized,
    /// Reset and register setup are running
    Initializing,
    /// Registers are set up, frames can be transferred
    Ready,
}

/// Ssd1680 driver
///
/// Owns the bus, the control lines and the frame buffer. The controller is set up
/// lazily by the first [`update`](Ssd1680::update).
pub struct Ssd1680<SPI, BUSY, DC, RST, DELAY, HOST> {
    /// Connection to the controller
    interface: DisplayInterface<SPI, BUSY, DC, RST, DELAY, HOST>,
    /// Pixels, in the inverted polarity of [`Framebuffer`]
    pub(crate) framebuffer: Display2in9,
    state: PanelState,
    config: Config,
}

impl<SPI, BUSY, DC, RST, DELAY, HOST> Ssd1680<SPI, BUSY, DC, RST, DELAY, HOST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
    HOST: HostRuntime,
{
    /// Creates a new driver with the default [`Config`]
    ///
    /// Drives DC low and RST high. Nothing is sent to the controller until the
    /// first [`update`](Ssd1680::update).
    pub fn new(
        spi: SPI,
        dc: DC,
        busy: Option<BUSY>,
        rst: Option<RST>,
        delay: DELAY,
        host: HOST,
    ) -> Result<Self, DriverError<SPI, BUSY, DC, RST>> {
        Self::with_config(spi, dc, busy, rst, delay, host, Config::default())
    }

    /// Same as [`new`](Ssd1680::new) with custom timings
    pub fn with_config(
        spi: SPI,
        dc: DC,
        busy: Option<BUSY>,
        rst: Option<RST>,
        delay: DELAY,
        host: HOST,
        config: Config,
    ) -> Result<Self, DriverError<SPI, BUSY, DC, RST>> {
        let mut interface = DisplayInterface::new(spi, busy, dc, rst, delay, host);
        interface.setup()?;

        debug!("SSD1680 set up, display init deferred to first update");

        Ok(Ssd1680 {
            interface,
            framebuffer: Display2in9::default(),
            state: PanelState::Uninitialized,
            config,
        })
    }

    /// Initialises the controller if needed, then transfers the frame buffer and
    /// runs a full refresh
    ///
    /// This blocks for the whole refresh (2-4s typically, at most the configured
    /// refresh timeout). The host runtime is yielded to while waiting.
    pub fn update(&mut self) -> Result<(), DriverError<SPI, BUSY, DC, RST>> {
        self.ensure_initialized()?;
        self.display_frame()
    }

    /// Lets `draw` paint the frame buffer, then runs [`update`](Ssd1680::update)
    pub fn update_with<F>(&mut self, draw: F) -> Result<(), DriverError<SPI, BUSY, DC, RST>>
    where
        F: FnOnce(&mut Display2in9),
    {
        draw(&mut self.framebuffer);
        self.update()
    }

    /// Logs the wiring and the timings
    pub fn log_config(&mut self) -> Result<(), DriverError<SPI, BUSY, DC, RST>> {
        info!("SSD1680 E-Paper {}x{}, {} bit", WIDTH, HEIGHT, BITS_PER_PIXEL);
        info!(
            "  Reset pin: {}",
            if self.interface.has_reset() { "yes" } else { "none" }
        );
        info!(
            "  Busy pin: {}",
            if self.interface.has_busy() { "yes" } else { "none" }
        );
        if self.interface.has_busy() {
            let busy = self.interface.is_busy()?;
            info!(
                "  Current BUSY state: {}",
                if busy { "HIGH (busy)" } else { "LOW (idle)" }
            );
        }
        info!("  Timings: {:?}", self.config);
        info!("  State: {:?}", self.state);
        Ok(())
    }

    /// Set a pixel in the frame buffer, nothing is sent to the panel
    ///
    /// Pixels outside of the panel are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        self.framebuffer.set_pixel(x, y, on);
    }

    /// The frame buffer, in its inverted polarity
    pub fn framebuffer(&self) -> &Display2in9 {
        &self.framebuffer
    }

    /// The frame buffer for drawing
    pub fn framebuffer_mut(&mut self) -> &mut Display2in9 {
        &mut self.framebuffer
    }

    /// Get the width of the display
    pub fn width(&self) -> u32 {
        WIDTH
    }

    /// Get the height of the display
    pub fn height(&self) -> u32 {
        HEIGHT
    }

    /// Where the controller is in its one-time setup
    pub fn state(&self) -> PanelState {
        self.state
    }

    /// The timings in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Gives back the bus, the pins, the delay and the host runtime
    #[allow(clippy::type_complexity)]
    pub fn release(self) -> (SPI, DC, Option<BUSY>, Option<RST>, DELAY, HOST) {
        let (spi, busy, dc, rst, delay, host) = self.interface.release();
        (spi, dc, busy, rst, delay, host)
    }

    /// Runs the one-time controller setup unless it already succeeded
    ///
    /// A failing bus leaves the state at `Uninitialized` so the next update retries.
    fn ensure_initialized(&mut self) -> Result<(), DriverError<SPI, BUSY, DC, RST>> {
        if self.state == PanelState::Ready {
            return Ok(());
        }

        info!("First update - initializing display");
        self.state = PanelState::Initializing;
        match self.init() {
            Ok(()) => {
                self.state = PanelState::Ready;
                Ok(())
            }
            Err(e) => {
                self.state = PanelState::Uninitialized;
                Err(e)
            }
        }
    }

    fn init(&mut self) -> Result<(), DriverError<SPI, BUSY, DC, RST>> {
        debug!("Initializing display (SSD1680)");

        self.hw_reset()?;
        self.sw_reset()?;

        debug!("Setting driver output control");
        let driver_output = DriverOutput {
            scan_is_linear: true,
            scan_g0_is_first: true,
            scan_dir_incr: true,
            gate_lines: HEIGHT as u16,
        };
        self.interface
            .cmd_with_data(Command::DriverOutputControl, &driver_output.to_bytes())?;

        debug!("Setting data entry mode");
        let entry_mode = DataEntryMode {
            incr: DataEntryModeIncr::XIncrYIncr,
            dir: DataEntryModeDir::XDir,
        };
        self.interface
            .cmd_with_data(Command::DataEntryModeSetting, &[entry_mode.to_u8()])?;

        self.set_ram_area(0, 0, WIDTH - 1, HEIGHT - 1)?;

        debug!("Setting border waveform");
        let border = BorderWaveForm {
            vbd: BorderWaveFormVbd::Gs,
            fix_level: BorderWaveFormFixLevel::Vss,
            follow_lut: true,
            gs_trans: BorderWaveFormGs::Lut1,
        };
        self.interface
            .cmd_with_data(Command::BorderWaveformControl, &[border.to_u8()])?;

        debug!("Setting temperature sensor");
        self.interface.cmd_with_data(
            Command::TemperatureSensorControl,
            &[TemperatureSensor::Internal as u8],
        )?;

        self.set_ram_counter(0, 0)?;

        self.wait_until_idle()?;

        debug!("Display initialization complete");
        Ok(())
    }

    fn hw_reset(&mut self) -> Result<(), DriverError<SPI, BUSY, DC, RST>> {
        if !self.interface.has_reset() {
            warn!("No reset pin configured");
            return Ok(());
        }

        debug!("Hardware reset");
        self.interface.reset(self.config.reset_phase_ms)?;
        self.wait_until_idle()?;
        Ok(())
    }

    fn sw_reset(&mut self) -> Result<(), DriverError<SPI, BUSY, DC, RST>> {
        debug!("Sending SW Reset");
        self.interface.cmd(Command::SwReset)?;
        self.interface.delay_ms(self.config.sw_reset_settle_ms);
        self.wait_until_idle()?;
        Ok(())
    }

    /// Streams the frame buffer into the black/white RAM
    ///
    /// The buffer stores "on" as a cleared bit while the controller RAM expects
    /// `0xFF` for eight black pixels, so every byte is sent complemented.
    fn update_frame(&mut self) -> Result<(), DriverError<SPI, BUSY, DC, RST>> {
        debug!("Writing frame to display");

        // the counter advanced during the last transfer
        self.set_ram_counter(0, 0)?;

        self.interface.cmd(Command::WriteRam)?;
        let Self {
            interface,
            framebuffer,
            ..
        } = self;
        interface.data_iter(framebuffer.buffer().iter().map(|&b| !b))?;

        self.wait_until_idle()?;
        Ok(())
    }

    /// Full refresh with the waveform stored in the controller
    fn refresh(&mut self) -> Result<(), DriverError<SPI, BUSY, DC, RST>> {
        debug!("Full refresh");
        let start = self.interface.now_ms();

        self.interface.cmd_with_data(
            Command::DisplayUpdateControl2,
            &[DisplayUpdateControl2::full_refresh().0],
        )?;
        self.interface.cmd(Command::MasterActivation)?;

        // the busy line doesn't always go low on this panel, the refresh happens anyway
        match self.interface.wait_until_idle(
            self.config.refresh_timeout_ms,
            self.config.refresh_poll_ms,
        )? {
            IdleWait::TimedOut { elapsed_ms } => {
                debug!(
                    "Update timeout after {} ms (display likely still updated)",
                    elapsed_ms
                );
            }
            IdleWait::Idle { elapsed_ms } => {
                debug!("Display update completed in {} ms", elapsed_ms);
            }
            IdleWait::NoBusyLine => {
                let elapsed_ms = self.interface.now_ms().wrapping_sub(start);
                debug!("Display update completed in {} ms", elapsed_ms);
            }
        }
        Ok(())
    }

    fn display_frame(&mut self) -> Result<(), DriverError<SPI, BUSY, DC, RST>> {
        self.update_frame()?;
        debug!("Frame written, starting update");
        self.refresh()?;
        debug!("Display update complete");
        Ok(())
    }

    fn wait_until_idle(&mut self) -> Result<IdleWait, DriverError<SPI, BUSY, DC, RST>> {
        self.interface.wait_until_idle(
            self.config.idle_timeout_ms,
            self.config.idle_poll_ms,
        )
    }

    fn set_ram_area(
        &mut self,
        start_x: u32,
        start_y: u32,
        end_x: u32,
        end_y: u32,
    ) -> Result<(), DriverError<SPI, BUSY, DC, RST>> {
        debug!("Setting RAM window");
        // x is positioned in bytes, so the last 3 bits which show the position inside a byte in the ram
        // aren't relevant
        self.interface.cmd_with_data(
            Command::SetRamXAddressStartEndPosition,
            &[(start_x >> 3) as u8, (end_x >> 3) as u8],
        )?;

        // 2 Databytes: A[7:0] & 0..A[8] for each - start and end
        self.interface.cmd_with_data(
            Command::SetRamYAddressStartEndPosition,
            &[
                start_y as u8,
                (start_y >> 8) as u8,
                end_y as u8,
                (end_y >> 8) as u8,
            ],
        )
    }

    fn set_ram_counter(&mut self, x: u32, y: u32) -> Result<(), DriverError<SPI, BUSY, DC, RST>> {
        // x is positioned in bytes, so the last 3 bits which show the position inside a byte in the ram
        // aren't relevant
        self.interface
            .cmd_with_data(Command::SetRamXAddressCounter, &[(x >> 3) as u8])?;

        // 2 Databytes: A[7:0] & 0..A[8]
        self.interface.cmd_with_data(
            Command::SetRamYAddressCounter,
            &[y as u8, (y >> 8) as u8],
        )
    }
}
