use std::time::Duration;

use log::{debug, info, trace};

use crate::timer::{CountdownTimer, TickOutcome, DEFAULT_TICK_INTERVAL};

/// Number of completed work rounds after which the next break is a long one.
pub const ROUNDS_BEFORE_LONG_BREAK: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Phase {
    #[strum(serialize = "START")]
    Idle,
    #[strum(serialize = "WORK")]
    Work,
    #[strum(serialize = "SHORT BREAK")]
    ShortBreak,
    #[strum(serialize = "LONG BREAK")]
    LongBreak,
}

/// Configured length of each phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Durations {
    pub work: Duration,
    pub short_break: Duration,
    pub long_break: Duration,
}

impl Durations {
    /// Saturates instead of overflowing; callers bound their input.
    pub fn from_minutes(work: u64, short_break: u64, long_break: u64) -> Self {
        let minutes = |n: u64| Duration::from_secs(n.saturating_mul(60));
        Self {
            work: minutes(work),
            short_break: minutes(short_break),
            long_break: minutes(long_break),
        }
    }

    /// Idle loads the work duration so that starting needs no reload.
    pub fn for_phase(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Idle | Phase::Work => self.work,
            Phase::ShortBreak => self.short_break,
            Phase::LongBreak => self.long_break,
        }
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self::from_minutes(25, 5, 15)
    }
}

/// Everything the session state machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A periodic tick armed for the given timer generation.
    Tick { generation: u64 },
    Timeout,
    Start,
    Stop,
    Reset,
    Change,
    Quit,
}

/// Side effect requested by a transition, performed by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Notify(Phase),
    OpenEditor,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    phase: Phase,
    round: u32,
    durations: Durations,
    timer: CountdownTimer,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Durations::default(), DEFAULT_TICK_INTERVAL)
    }
}

impl Session {
    pub fn new(durations: Durations, tick_interval: Duration) -> Self {
        Self {
            phase: Phase::Idle,
            round: 0,
            durations,
            timer: CountdownTimer::new(durations.for_phase(Phase::Idle), tick_interval),
        }
    }

    /// A fresh Idle session with new durations. The timer keeps counting
    /// generations so ticks armed for this session stay stale in the next.
    pub fn reconfigured(mut self, durations: Durations) -> Session {
        self.phase = Phase::Idle;
        self.round = 0;
        self.durations = durations;
        self.timer.reset(durations.for_phase(Phase::Idle));
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn durations(&self) -> &Durations {
        &self.durations
    }

    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    pub fn running(&self) -> bool {
        self.timer.is_running()
    }

    /// Applies one event and returns the next session together with the side
    /// effect the caller should perform, if any.
    pub fn apply(mut self, event: SessionEvent) -> (Session, Option<Effect>) {
        match event {
            SessionEvent::Tick { generation } => {
                if generation != self.timer.generation() {
                    trace!(
                        "dropping stale tick (generation {generation}, current {})",
                        self.timer.generation()
                    );
                    return (self, None);
                }
                match self.timer.tick() {
                    TickOutcome::TimedOut => self.apply(SessionEvent::Timeout),
                    TickOutcome::Counted | TickOutcome::Ignored => (self, None),
                }
            }
            SessionEvent::Timeout => {
                self.advance_phase();
                let phase = self.phase;
                (self, Some(Effect::Notify(phase)))
            }
            SessionEvent::Start => {
                let mut effect = None;
                if self.phase == Phase::Idle {
                    self.phase = Phase::Work;
                    self.timer.reset(self.durations.work);
                    effect = Some(Effect::Notify(Phase::Work));
                    info!("session started (round {})", self.round);
                }
                if let Err(err) = self.timer.start() {
                    debug!("start rejected: {err}");
                }
                (self, effect)
            }
            SessionEvent::Stop => {
                self.timer.stop();
                (self, None)
            }
            SessionEvent::Reset => {
                self.timer.reset(self.durations.for_phase(self.phase));
                (self, None)
            }
            SessionEvent::Change => {
                self.timer.stop();
                (self, Some(Effect::OpenEditor))
            }
            SessionEvent::Quit => (self, Some(Effect::Quit)),
        }
    }

    fn advance_phase(&mut self) {
        let from = self.phase;
        match self.phase {
            Phase::Work if self.round >= ROUNDS_BEFORE_LONG_BREAK => {
                self.phase = Phase::LongBreak;
                self.round = 0;
            }
            Phase::Work => self.phase = Phase::ShortBreak,
            Phase::Idle | Phase::ShortBreak | Phase::LongBreak => {
                self.phase = Phase::Work;
                self.round += 1;
            }
        }
        self.timer.reset(self.durations.for_phase(self.phase));
        info!("phase {from} -> {} (round {})", self.phase, self.round);
    }
}
