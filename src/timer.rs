use std::time::Duration;

use thiserror::Error;

/// Default interval between two ticks of a running countdown.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("timer has run out and must be reset before it can start again")]
    TimedOut,
}

/// Result of delivering one tick to the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer was not running; nothing changed.
    Ignored,
    /// Remaining time was decremented and is still above zero.
    Counted,
    /// Remaining time reached zero on this tick.
    TimedOut,
}

/// A pausable countdown advanced by discrete ticks.
///
/// The timer never reads the wall clock: every tick subtracts exactly one
/// `tick_interval`. Each change to the running state bumps `generation`, so a
/// periodic producer that armed itself for an older generation can be told
/// apart from the current run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownTimer {
    total: Duration,
    remaining: Duration,
    tick_interval: Duration,
    running: bool,
    timed_out: bool,
    generation: u64,
}

impl CountdownTimer {
    pub fn new(total: Duration, tick_interval: Duration) -> Self {
        Self {
            total,
            remaining: total,
            tick_interval,
            running: false,
            timed_out: false,
            generation: 0,
        }
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts or resumes the countdown. Starting a running timer is a no-op;
    /// starting an expired one is rejected.
    pub fn start(&mut self) -> Result<(), TimerError> {
        if self.timed_out {
            return Err(TimerError::TimedOut);
        }
        if !self.running {
            self.running = true;
            self.generation += 1;
        }
        Ok(())
    }

    /// Pauses the countdown, keeping the remaining time.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.generation += 1;
        }
    }

    /// Loads a new total and leaves the timer stopped and fresh.
    pub fn reset(&mut self, total: Duration) {
        self.total = total;
        self.remaining = total;
        self.running = false;
        self.timed_out = false;
        self.generation += 1;
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Ignored;
        }

        self.remaining = self.remaining.saturating_sub(self.tick_interval);
        if self.remaining.is_zero() {
            self.timed_out = true;
            self.running = false;
            self.generation += 1;
            TickOutcome::TimedOut
        } else {
            TickOutcome::Counted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn new_timer_is_stopped_and_full() {
        let timer = CountdownTimer::new(secs(10), secs(1));
        assert_eq!(timer.remaining(), secs(10));
        assert_eq!(timer.total(), secs(10));
        assert!(!timer.is_running());
        assert!(!timer.timed_out());
    }

    #[test]
    fn ticks_decrement_by_interval() {
        let mut timer = CountdownTimer::new(secs(10), secs(1));
        timer.start().unwrap();
        for _ in 0..4 {
            assert_eq!(timer.tick(), TickOutcome::Counted);
        }
        assert_eq!(timer.remaining(), secs(6));
        assert!(timer.is_running());
    }

    #[test]
    fn remaining_clamps_at_zero_and_times_out_once() {
        let mut timer = CountdownTimer::new(Duration::from_millis(2500), secs(1));
        timer.start().unwrap();

        assert_eq!(timer.tick(), TickOutcome::Counted);
        assert_eq!(timer.tick(), TickOutcome::Counted);
        assert!(!timer.timed_out());
        assert_eq!(timer.tick(), TickOutcome::TimedOut);
        assert_eq!(timer.remaining(), Duration::ZERO);
        assert!(timer.timed_out());
        assert!(!timer.is_running());

        // Further ticks after expiry change nothing
        assert_eq!(timer.tick(), TickOutcome::Ignored);
        assert_eq!(timer.remaining(), Duration::ZERO);
    }

    #[test]
    fn remaining_matches_closed_form() {
        for n in 0..15u32 {
            let mut timer = CountdownTimer::new(secs(10), secs(1));
            timer.start().unwrap();
            let mut expired_at = None;
            for i in 1..=n {
                if timer.tick() == TickOutcome::TimedOut {
                    expired_at = Some(i);
                }
            }
            let expected = secs(10).saturating_sub(secs(1) * n);
            assert_eq!(timer.remaining(), expected);
            assert_eq!(timer.timed_out(), n >= 10);
            if n >= 10 {
                assert_eq!(expired_at, Some(10));
            }
        }
    }

    #[test]
    fn stopped_timer_ignores_ticks() {
        let mut timer = CountdownTimer::new(secs(10), secs(1));
        timer.start().unwrap();
        timer.tick();
        timer.stop();

        for _ in 0..20 {
            assert_eq!(timer.tick(), TickOutcome::Ignored);
        }
        assert_eq!(timer.remaining(), secs(9));

        timer.start().unwrap();
        timer.tick();
        assert_eq!(timer.remaining(), secs(8));
    }

    #[test]
    fn start_is_idempotent() {
        let mut timer = CountdownTimer::new(secs(10), secs(1));
        timer.start().unwrap();
        let generation = timer.generation();
        timer.start().unwrap();
        assert!(timer.is_running());
        assert_eq!(timer.generation(), generation);
    }

    #[test]
    fn start_after_timeout_is_rejected() {
        let mut timer = CountdownTimer::new(secs(1), secs(1));
        timer.start().unwrap();
        timer.tick();

        assert_matches!(timer.start(), Err(TimerError::TimedOut));
        assert!(!timer.is_running());

        timer.reset(secs(3));
        assert_matches!(timer.start(), Ok(()));
    }

    #[test]
    fn reset_restores_fresh_state_from_any_state() {
        let mut running = CountdownTimer::new(secs(10), secs(1));
        running.start().unwrap();
        running.tick();

        let mut expired = CountdownTimer::new(secs(1), secs(1));
        expired.start().unwrap();
        expired.tick();

        let idle = CountdownTimer::new(secs(4), secs(1));

        for mut timer in [running, expired, idle] {
            timer.reset(secs(7));
            assert_eq!(timer.remaining(), secs(7));
            assert_eq!(timer.total(), secs(7));
            assert!(!timer.timed_out());
            assert!(!timer.is_running());
        }
    }

    #[test]
    fn run_changes_bump_generation() {
        let mut timer = CountdownTimer::new(secs(10), secs(1));
        let g0 = timer.generation();
        timer.start().unwrap();
        let g1 = timer.generation();
        timer.stop();
        let g2 = timer.generation();
        timer.reset(secs(5));
        let g3 = timer.generation();

        assert!(g0 < g1 && g1 < g2 && g2 < g3);
    }
}
