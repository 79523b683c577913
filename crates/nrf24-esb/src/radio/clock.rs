/// A free-running millisecond counter used to measure send timeouts.
///
/// The counter is allowed to wrap around; elapsed time is always computed
/// with [`ticks_diff()`].
pub trait MonotonicMs {
    /// The current counter value in milliseconds.
    fn now_ms(&mut self) -> u32;
}

/// Milliseconds elapsed from `start` to `now`, correct across a single wraparound.
/// ```
/// use nrf24_esb::radio::ticks_diff;
/// assert_eq!(ticks_diff(5, u32::MAX - 4), 10);
/// ```
pub const fn ticks_diff(now: u32, start: u32) -> u32 {
    now.wrapping_sub(start)
}

/// A [`MonotonicMs`] clock backed by [`std::time::Instant`].
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl MonotonicMs for StdClock {
    fn now_ms(&mut self) -> u32 {
        // truncation is the wraparound
        self.origin.elapsed().as_millis() as u32
    }
}
