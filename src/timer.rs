use std::time::{Duration, Instant};

/// The one periodic tick source of a session. Arming always replaces the
/// previous schedule, so ticks can never stack.
#[derive(Debug, Default, Clone)]
pub struct TickTimer {
    schedule: Option<Schedule>,
}

#[derive(Debug, Copy, Clone)]
struct Schedule {
    interval: Duration,
    next_due: Instant,
}

impl TickTimer {
    pub fn new() -> Self {
        TickTimer::default()
    }

    pub fn arm(&mut self, interval: Duration) {
        self.arm_at(interval, Instant::now());
    }

    pub fn arm_at(&mut self, interval: Duration, now: Instant) {
        self.schedule = Some(Schedule { interval, next_due: now + interval });
    }

    pub fn cancel(&mut self) {
        self.schedule = None;
    }

    pub fn is_armed(&self) -> bool {
        self.schedule.is_some()
    }

    pub fn interval(&self) -> Option<Duration> {
        self.schedule.map(|s| s.interval)
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.schedule.map(|s| s.next_due.saturating_duration_since(now))
    }

    /// Returns true at most once per call when a tick is due. Missed
    /// intervals are dropped rather than replayed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match &mut self.schedule {
            Some(schedule) if now >= schedule.next_due => {
                schedule.next_due = now + schedule.interval;
                true
            }
            _ => false,
        }
    }
}
