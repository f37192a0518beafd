/// Timing budgets of the driver
///
/// The defaults match the 2.9" panel and are what [`Ssd1680::new`](super::Ssd1680::new) uses.
/// All values are milliseconds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Length of each phase of the hardware reset pulse (high, low, high)
    pub reset_phase_ms: u32,
    /// Pause after the software reset command, before the busy line is polled
    pub sw_reset_settle_ms: u32,
    /// Longest wait for the busy line after a reset or a register sequence
    pub idle_timeout_ms: u32,
    /// Poll interval while waiting after a reset or a register sequence
    pub idle_poll_ms: u32,
    /// Longest wait for the busy line after a full refresh was started.
    /// A full refresh usually takes 2-4s.
    pub refresh_timeout_ms: u32,
    /// Poll interval while a full refresh is running
    pub refresh_poll_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reset_phase_ms: 10,
            sw_reset_settle_ms: 10,
            idle_timeout_ms: 1_000,
            idle_poll_ms: 10,
            refresh_timeout_ms: 5_000,
            refresh_poll_ms: 100,
        }
    }
}
