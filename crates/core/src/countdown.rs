//! Polled auto-advance countdown.
//!
//! The host loop calls [`Countdown::tick`] once per frame with the elapsed
//! time. Nothing blocks; cancellation is observed on the next poll.

/// Status returned from [`Countdown::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStatus {
    Running,
    Expired,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    Expired,
    Cancelled,
}

/// A one-shot timer measured in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    duration_ms: u32,
    elapsed_ms: u32,
    state: State,
}

impl Countdown {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            elapsed_ms: 0,
            state: State::Running,
        }
    }

    /// Build from a seconds value. Non-positive or non-finite values yield `None`
    /// (auto-advance disabled).
    pub fn from_secs(secs: f32) -> Option<Self> {
        secs_to_ms(secs).map(Self::new)
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    pub fn remaining_ms(&self) -> u32 {
        self.duration_ms.saturating_sub(self.elapsed_ms)
    }

    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    /// Stop the countdown. The next tick reports `Cancelled`.
    pub fn cancel(&mut self) {
        if self.state == State::Running {
            self.state = State::Cancelled;
        }
    }

    /// Advance by `elapsed_ms`. Reports `Expired` once the full duration has
    /// elapsed, never earlier. Terminal states are sticky.
    pub fn tick(&mut self, elapsed_ms: u32) -> CountdownStatus {
        match self.state {
            State::Cancelled => return CountdownStatus::Cancelled,
            State::Expired => return CountdownStatus::Expired,
            State::Running => {}
        }

        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        if self.elapsed_ms >= self.duration_ms {
            self.state = State::Expired;
            CountdownStatus::Expired
        } else {
            CountdownStatus::Running
        }
    }
}

/// Convert seconds to whole milliseconds, `None` when auto-advance is off.
pub fn secs_to_ms(secs: f32) -> Option<u32> {
    if !secs.is_finite() || secs <= 0.0 {
        return None;
    }
    let ms = (secs as f64 * 1000.0).round();
    Some(ms.min(u32::MAX as f64) as u32)
}
