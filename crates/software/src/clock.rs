//! Elapsed-time measurement in the tick domain of the device's interval timer.
//!
//! Intervals are persisted as 16-bit tick counts, so recording and playback must measure in the
//! same tick domain for the stored values (and the Modify math applied to them) to mean
//! anything. Both go through [`Clock`], with [`TickClock`] as the one real implementation.

use embassy_time::{Duration, Instant, Timer};

/// Tick rate of the interval clock: 15 625 Hz, i.e. 64 µs per tick (a 4 MHz core clock behind a
/// ÷256 prescaler). A full `u16` of ticks is just over four seconds of silence between messages.
pub const TICK_HZ: u32 = 15_625;

const MICROS_PER_TICK: u64 = 1_000_000 / TICK_HZ as u64;

/// A free-running counter reset at known points and read to measure inter-event intervals.
pub trait Clock {
    /// Zeroes the counter.
    fn restart(&mut self);

    /// Ticks since the last restart, saturating silently at `u16::MAX`.
    fn elapsed_ticks(&self) -> u16;

    /// Resolves once [`elapsed_ticks`](Self::elapsed_ticks) has reached `ticks` (immediately,
    /// if it already has).
    async fn wait_until(&mut self, ticks: u16);
}

/// [`Clock`] over the Embassy time driver.
#[derive(Clone, Copy, Debug)]
pub struct TickClock {
    epoch: Instant,
}

impl TickClock {
    /// A clock whose epoch is the moment of construction.
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TickClock {
    fn restart(&mut self) {
        self.epoch = Instant::now();
    }

    fn elapsed_ticks(&self) -> u16 {
        let micros = Instant::now().duration_since(self.epoch).as_micros();
        (micros / MICROS_PER_TICK).min(u64::from(u16::MAX)) as u16
    }

    async fn wait_until(&mut self, ticks: u16) {
        let target = self.epoch + Duration::from_micros(u64::from(ticks) * MICROS_PER_TICK);
        Timer::at(target).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embassy_time::MockDriver;

    /// One test rather than several: the mock driver's timeline is process-global, and the
    /// default parallel test runner would have concurrent tests advancing it under each other.
    #[test]
    fn ticks_follow_the_mock_timeline() {
        let driver = MockDriver::get();
        let mut clock = TickClock::new();

        assert_eq!(0, clock.elapsed_ticks(), "Expected left but got right");

        // 640 µs is ten ticks exactly.
        driver.advance(Duration::from_micros(640));
        assert_eq!(10, clock.elapsed_ticks(), "Expected left but got right");

        // Sub-tick remainders truncate.
        driver.advance(Duration::from_micros(63));
        assert_eq!(10, clock.elapsed_ticks(), "Expected left but got right");

        clock.restart();
        assert_eq!(
            0,
            clock.elapsed_ticks(),
            "Restart should zero the counter; expected left but got right"
        );

        // A reached deadline resolves without anyone driving the timeline further.
        driver.advance(Duration::from_micros(640));
        block_on(clock.wait_until(10));
        block_on(clock.wait_until(0));

        // Five seconds is 78 125 ticks, past the 16-bit range: the counter saturates
        // rather than wrapping.
        driver.advance(Duration::from_secs(5));
        assert_eq!(
            u16::MAX,
            clock.elapsed_ticks(),
            "Expected left but got right"
        );
    }
}
