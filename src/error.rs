//! Errors reported by the driver

use core::fmt::{Debug, Display, Formatter};

use embedded_hal::{digital, spi};

/// Epd error type
///
/// Only failures of the bus or of a pin end up here. A busy line that never
/// deasserts, a missing reset or busy pin and out of range pixels are handled
/// by the driver and never reported as errors.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ErrorKind<SpiE, BusyE, DcE, RstE> {
    /// Encountered an SPI error
    SpiError(SpiE),

    /// Encountered an error on Busy GPIO
    BusyError(BusyE),

    /// Encountered an error on DC GPIO
    DcError(DcE),

    /// Encountered an error on RST GPIO
    RstError(RstE),
}

/// The [`ErrorKind`] of a driver built from these bus and pin types
pub type DriverError<SPI, BUSY, DC, RST> = ErrorKind<
    <SPI as spi::ErrorType>::Error,
    <BUSY as digital::ErrorType>::Error,
    <DC as digital::ErrorType>::Error,
    <RST as digital::ErrorType>::Error,
>;

impl<SpiE, BusyE, DcE, RstE> Display for ErrorKind<SpiE, BusyE, DcE, RstE>
where
    SpiE: Display,
    BusyE: Display,
    DcE: Display,
    RstE: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SpiError(err) => write!(f, "spi: {err}"),
            Self::BusyError(err) => write!(f, "busy pin: {err}"),
            Self::DcError(err) => write!(f, "dc pin: {err}"),
            Self::RstError(err) => write!(f, "reset pin: {err}"),
        }
    }
}

impl<SpiE, BusyE, DcE, RstE> Debug for ErrorKind<SpiE, BusyE, DcE, RstE>
where
    SpiE: Debug,
    BusyE: Debug,
    DcE: Debug,
    RstE: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SpiError(err) => f.debug_tuple("SpiError").field(err).finish(),
            Self::BusyError(err) => f.debug_tuple("BusyError").field(err).finish(),
            Self::DcError(err) => f.debug_tuple("DcError").field(err).finish(),
            Self::RstError(err) => f.debug_tuple("RstError").field(err).finish(),
        }
    }
}
