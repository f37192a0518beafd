//! Traits at the seams between the driver and the rest of the firmware

/// All commands need to have this trait which gives the address of the command
/// which needs to be send via SPI with activated CommandsPin (Data/Command Pin in CommandMode)
pub(crate) trait Command: Copy {
    fn address(self) -> u8;
}

/// Services the driver borrows from the host firmware while it waits on the panel
///
/// A full refresh keeps the controller busy for several seconds. The busy wait
/// polls with a blocking delay and calls [`yield_now`](HostRuntime::yield_now)
/// after every poll, so cooperative background work (feeding a watchdog, servicing
/// a network stack, ...) doesn't starve.
pub trait HostRuntime {
    /// Milliseconds since an arbitrary epoch
    ///
    /// Only differences are used and they are computed with wrapping arithmetic,
    /// so a 32 bit millisecond counter that overflows is fine.
    fn now_ms(&mut self) -> u32;

    /// Give the host runtime a chance to run its background tasks
    fn yield_now(&mut self) {}
}

impl<T: HostRuntime + ?Sized> HostRuntime for &mut T {
    fn now_ms(&mut self) -> u32 {
        T::now_ms(self)
    }

    fn yield_now(&mut self) {
        T::yield_now(self)
    }
}
