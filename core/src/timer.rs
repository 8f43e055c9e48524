use core::time::Duration;
use web_time::Instant;

/// Elapsed-seconds counter that only advances while running.
///
/// Time enters either as discrete one-second [`TimerController::tick`]s from a host interval, or as wall-clock
/// readings through [`TimerController::poll`], which carries sub-second remainders between polls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimerController {
    elapsed: u32,
    running: bool,
    carry: Duration,
    anchor: Option<Instant>,
}

impl Default for TimerController {
    fn default() -> Self {
        Self {
            elapsed: 0,
            running: false,
            carry: Duration::ZERO,
            anchor: None,
        }
    }
}

impl TimerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed
    }

    pub fn is_paused(&self) -> bool {
        !self.running
    }

    /// Starts counting. The first [`TimerController::poll`] afterwards anchors the wall clock.
    pub fn resume(&mut self) {
        if !self.running {
            self.running = true;
            self.anchor = None;
        }
    }

    /// Starts counting from `now`. Already running timers keep their anchor.
    pub fn resume_at(&mut self, now: Instant) {
        if !self.running {
            self.running = true;
            self.anchor = Some(now);
        }
    }

    /// Stops counting, keeping the accumulated value.
    pub fn pause(&mut self) {
        self.running = false;
        self.anchor = None;
    }

    /// Back to zero and paused.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// One discrete second. Returns whether it was counted.
    pub fn tick(&mut self) -> bool {
        if self.running {
            self.elapsed = self.elapsed.saturating_add(1);
        }
        self.running
    }

    /// Adds `delta` of running time and returns how many whole seconds it completed.
    pub fn advance(&mut self, delta: Duration) -> u32 {
        if !self.running {
            return 0;
        }

        let total = self.carry + delta;
        let seconds = u32::try_from(total.as_secs()).unwrap_or(u32::MAX);
        self.carry = total - Duration::from_secs(u64::from(seconds));
        self.elapsed = self.elapsed.saturating_add(seconds);
        seconds
    }

    /// Feeds a wall-clock reading, returning whole seconds completed since the previous one.
    pub fn poll(&mut self, now: Instant) -> u32 {
        if !self.running {
            return 0;
        }
        match self.anchor.replace(now) {
            Some(anchor) => self.advance(now.saturating_duration_since(anchor)),
            None => 0,
        }
    }

    #[cfg(test)]
    fn carry(&self) -> Duration {
        self.carry
    }
}
