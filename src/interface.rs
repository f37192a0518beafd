use core::convert::Infallible;

use embedded_hal::{
    delay::DelayNs,
    digital::{self, InputPin, OutputPin},
    spi::SpiDevice,
};
use log::debug;

use crate::error::{DriverError, ErrorKind};
use crate::traits::{Command, HostRuntime};

/// Placeholder for a reset or busy line that isn't wired
///
/// ```ignore
/// let epd = Ssd1680::new(spi, dc, None::<NoPin>, None::<NoPin>, delay, host)?;
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPin;

impl digital::ErrorType for NoPin {
    type Error = Infallible;
}

impl InputPin for NoPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(false)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// How a wait for the busy line ended
///
/// None of these is a failure: the SSD1680 doesn't reliably release the busy line
/// after every operation, so a timeout usually means the operation finished anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleWait {
    /// There is no busy line, the device is assumed to be idle
    NoBusyLine,
    /// The busy line reported idle
    Idle {
        /// time spent waiting
        elapsed_ms: u32,
    },
    /// The busy line still reported busy when the timeout ran out
    TimedOut {
        /// time spent waiting
        elapsed_ms: u32,
    },
}

/// The Connection Interface of the SSD1680
///
/// Every byte is written in its own SPI transaction, so chip select is asserted
/// and released around each command and each data byte.
pub(crate) struct DisplayInterface<SPI, BUSY, DC, RST, DELAY, HOST> {
    /// SPI
    spi: SPI,
    /// High for busy, Wait until display is ready!
    busy: Option<BUSY>,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Resetting
    rst: Option<RST>,
    delay: DELAY,
    host: HOST,
}

impl<SPI, BUSY, DC, RST, DELAY, HOST> DisplayInterface<SPI, BUSY, DC, RST, DELAY, HOST>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
    HOST: HostRuntime,
{
    /// Creates a new `DisplayInterface` struct
    pub fn new(
        spi: SPI,
        busy: Option<BUSY>,
        dc: DC,
        rst: Option<RST>,
        delay: DELAY,
        host: HOST,
    ) -> Self {
        DisplayInterface {
            spi,
            busy,
            dc,
            rst,
            delay,
            host,
        }
    }

    /// Puts the control lines into their idle levels: command mode, reset released
    pub(crate) fn setup(&mut self) -> Result<(), DriverError<SPI, BUSY, DC, RST>> {
        self.dc.set_low().map_err(ErrorKind::DcError)?;
        if let Some(rst) = self.rst.as_mut() {
            rst.set_high().map_err(ErrorKind::RstError)?;
        }
        Ok(())
    }

    /// Basic function for sending [Commands](Command).
    ///
    /// Enables direct interaction with the device with the help of [data()](DisplayInterface::data())
    pub(crate) fn cmd<T: Command>(
        &mut self,
        command: T,
    ) -> Result<(), DriverError<SPI, BUSY, DC, RST>> {
        // low for commands
        self.dc.set_low().map_err(ErrorKind::DcError)?;

        // Transfer the command over spi
        self.write(command.address())
    }

    /// Basic function for sending an array of u8-values of data over spi
    ///
    /// Each byte is a separate transfer with the DC line set before it.
    pub(crate) fn data(&mut self, data: &[u8]) -> Result<(), DriverError<SPI, BUSY, DC, RST>> {
        self.data_iter(data.iter().copied())
    }

    /// Same as [data()](DisplayInterface::data()) for bytes that are computed on the fly
    pub(crate) fn data_iter<I>(&mut self, data: I) -> Result<(), DriverError<SPI, BUSY, DC, RST>>
    where
        I: IntoIterator<Item = u8>,
    {
        for val in data {
            // high for data
            self.dc.set_high().map_err(ErrorKind::DcError)?;
            self.write(val)?;
        }
        Ok(())
    }

    /// Basic function for sending [Commands](Command) and the data belonging to it.
    pub(crate) fn cmd_with_data<T: Command>(
        &mut self,
        command: T,
        data: &[u8],
    ) -> Result<(), DriverError<SPI, BUSY, DC, RST>> {
        self.cmd(command)?;
        self.data(data)
    }

    // spi write helper/abstraction function
    fn write(&mut self, byte: u8) -> Result<(), DriverError<SPI, BUSY, DC, RST>> {
        self.spi.write(&[byte]).map_err(ErrorKind::SpiError)
    }

    pub(crate) fn now_ms(&mut self) -> u32 {
        self.host.now_ms()
    }

    pub(crate) fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Waits until device isn't busy anymore or `timeout_ms` has passed
    ///
    /// The busy line (HIGH while the controller works) is polled every `poll_ms`.
    /// After every poll the host runtime gets a chance to run. Running into the
    /// timeout is not an error, it is logged and reported as [`IdleWait::TimedOut`].
    ///
    /// Elapsed time is summed from the wrapping differences between clock readings,
    /// so the wait ends even for `timeout_ms == u32::MAX` or a clock that overflows.
    pub(crate) fn wait_until_idle(
        &mut self,
        timeout_ms: u32,
        poll_ms: u32,
    ) -> Result<IdleWait, DriverError<SPI, BUSY, DC, RST>> {
        if self.busy.is_none() {
            return Ok(IdleWait::NoBusyLine);
        }

        let mut last = self.host.now_ms();
        let mut elapsed: u64 = 0;
        loop {
            let now = self.host.now_ms();
            elapsed += u64::from(now.wrapping_sub(last));
            last = now;
            let elapsed_ms = u32::try_from(elapsed).unwrap_or(u32::MAX);

            if !self.is_busy()? {
                return Ok(IdleWait::Idle { elapsed_ms });
            }
            if elapsed > u64::from(timeout_ms) {
                debug!("Wait idle timeout after {} ms (this may be normal)", elapsed_ms);
                return Ok(IdleWait::TimedOut { elapsed_ms });
            }

            self.delay.delay_ms(poll_ms);
            self.host.yield_now();
        }
    }

    /// Checks if device is still busy
    ///
    /// A missing busy line always reads as idle.
    pub(crate) fn is_busy(&mut self) -> Result<bool, DriverError<SPI, BUSY, DC, RST>> {
        match self.busy.as_mut() {
            Some(busy) => busy.is_high().map_err(ErrorKind::BusyError),
            None => Ok(false),
        }
    }

    /// Resets the device.
    ///
    /// The reset line is driven high, low and high again, each level is held for
    /// `phase_ms`. Returns `false` without doing anything if no reset line is wired.
    pub(crate) fn reset(&mut self, phase_ms: u32) -> Result<bool, DriverError<SPI, BUSY, DC, RST>> {
        let Some(rst) = self.rst.as_mut() else {
            return Ok(false);
        };

        rst.set_high().map_err(ErrorKind::RstError)?;
        self.delay.delay_ms(phase_ms);

        rst.set_low().map_err(ErrorKind::RstError)?;
        self.delay.delay_ms(phase_ms);

        rst.set_high().map_err(ErrorKind::RstError)?;
        self.delay.delay_ms(phase_ms);
        Ok(true)
    }

    pub(crate) fn has_busy(&self) -> bool {
        self.busy.is_some()
    }

    pub(crate) fn has_reset(&self) -> bool {
        self.rst.is_some()
    }

    pub(crate) fn release(self) -> (SPI, Option<BUSY>, DC, Option<RST>, DELAY, HOST) {
        (self.spi, self.busy, self.dc, self.rst, self.delay, self.host)
    }
}
