//! Test fixtures: recording bus and pins sharing one event log, and a simulated clock

use core::cell::{Cell, RefCell};
use core::convert::Infallible;

use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType as PinErrorType, InputPin, OutputPin},
    spi::{ErrorType as SpiErrorType, SpiBus},
};
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use log::{LevelFilter, Log, Metadata, Record};
use std::format;
use std::rc::Rc;
use std::string::String;
use std::sync::Once;
use std::vec::Vec;

use crate::traits::HostRuntime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Event {
    Dc(bool),
    Rst(bool),
    Cs(bool),
    Byte(u8),
}

/// One framed byte as the controller sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tx {
    Cmd(u8),
    Data(u8),
}

#[derive(Default)]
struct Shared {
    log: RefCell<Vec<Event>>,
    clock_ns: Cell<u64>,
    yields: Cell<u32>,
}

impl Shared {
    fn now_ms(&self) -> u32 {
        (self.clock_ns.get() / 1_000_000) as u32
    }
}

#[derive(Clone, Default)]
pub(crate) struct Bench {
    shared: Rc<Shared>,
}

pub(crate) type BenchSpi = ExclusiveDevice<RecordingBus, RecordingPin, NoDelay>;

impl Bench {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spi(&self) -> BenchSpi {
        let bus = RecordingBus {
            shared: self.shared.clone(),
        };
        ExclusiveDevice::new_no_delay(bus, self.pin(Line::Cs)).unwrap()
    }

    pub fn dc(&self) -> RecordingPin {
        self.pin(Line::Dc)
    }

    pub fn rst(&self) -> RecordingPin {
        self.pin(Line::Rst)
    }

    /// Busy line that never goes idle
    pub fn busy_stuck(&self) -> SimBusy {
        self.busy_for(u32::MAX)
    }

    /// Busy line that reads busy for the first `ms` milliseconds of simulated time
    pub fn busy_for(&self, ms: u32) -> SimBusy {
        SimBusy {
            shared: self.shared.clone(),
            until_ms: ms,
        }
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay {
            shared: self.shared.clone(),
        }
    }

    pub fn host(&self) -> SimHost {
        SimHost {
            shared: self.shared.clone(),
        }
    }

    pub fn now_ms(&self) -> u32 {
        self.shared.now_ms()
    }

    pub fn yields(&self) -> u32 {
        self.shared.yields.get()
    }

    pub fn events(&self) -> Vec<Event> {
        self.shared.log.borrow().clone()
    }

    pub fn clear(&self) {
        self.shared.log.borrow_mut().clear();
    }

    /// Decodes the event log into framed bytes
    ///
    /// Panics if a frame doesn't hold exactly one byte, or if DC changes while chip
    /// select is active.
    pub fn transactions(&self) -> Vec<Tx> {
        let mut txs = Vec::new();
        let mut dc = None;
        let mut frame: Option<Vec<u8>> = None;

        for event in self.events() {
            match event {
                Event::Dc(level) => {
                    assert!(frame.is_none(), "DC changed during a transfer");
                    dc = Some(level);
                }
                Event::Cs(false) => frame = Some(Vec::new()),
                Event::Byte(byte) => frame
                    .as_mut()
                    .expect("byte clocked without chip select")
                    .push(byte),
                Event::Cs(true) => {
                    if let Some(bytes) = frame.take() {
                        assert_eq!(bytes.len(), 1, "one byte per transfer");
                        let level = dc.expect("DC never set");
                        txs.push(if level {
                            Tx::Data(bytes[0])
                        } else {
                            Tx::Cmd(bytes[0])
                        });
                    }
                }
                Event::Rst(_) => {}
            }
        }

        txs
    }
}

#[derive(Clone, Copy)]
enum Line {
    Dc,
    Rst,
    Cs,
}

pub(crate) struct RecordingPin {
    shared: Rc<Shared>,
    line: Line,
}

impl Bench {
    fn pin(&self, line: Line) -> RecordingPin {
        RecordingPin {
            shared: self.shared.clone(),
            line,
        }
    }
}

impl RecordingPin {
    fn record(&self, level: bool) {
        let event = match self.line {
            Line::Dc => Event::Dc(level),
            Line::Rst => Event::Rst(level),
            Line::Cs => Event::Cs(level),
        };
        self.shared.log.borrow_mut().push(event);
    }
}

impl PinErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.record(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.record(true);
        Ok(())
    }
}

pub(crate) struct RecordingBus {
    shared: Rc<Shared>,
}

impl SpiErrorType for RecordingBus {
    type Error = Infallible;
}

impl SpiBus for RecordingBus {
    fn read(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        let mut log = self.shared.log.borrow_mut();
        log.extend(words.iter().map(|&b| Event::Byte(b)));
        Ok(())
    }

    fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

pub(crate) struct SimBusy {
    shared: Rc<Shared>,
    until_ms: u32,
}

impl PinErrorType for SimBusy {
    type Error = Infallible;
}

impl InputPin for SimBusy {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.shared.now_ms() < self.until_ms)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.is_high()?)
    }
}

/// Advances the simulated clock instead of sleeping
pub(crate) struct SimDelay {
    shared: Rc<Shared>,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        let now = self.shared.clock_ns.get();
        self.shared.clock_ns.set(now + u64::from(ns));
    }
}

pub(crate) struct SimHost {
    shared: Rc<Shared>,
}

impl HostRuntime for SimHost {
    fn now_ms(&mut self) -> u32 {
        self.shared.now_ms()
    }

    fn yield_now(&mut self) {
        self.shared.yields.set(self.shared.yields.get() + 1);
    }
}

std::thread_local! {
    static LOG_LINES: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Keeps the messages logged by the current test thread
struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        LOG_LINES.with(|lines| lines.borrow_mut().push(format!("{}", record.args())));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

/// Starts capturing log messages of the calling thread, dropping earlier ones
pub(crate) fn capture_logs() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Trace);
    });
    LOG_LINES.with(|lines| lines.borrow_mut().clear());
}

/// Messages logged by the calling thread since [`capture_logs`]
pub(crate) fn logged() -> Vec<String> {
    LOG_LINES.with(|lines| lines.borrow().clone())
}
