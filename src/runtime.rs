use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;
use std::{io, thread};

use crossterm::event::{self, Event as CtEvent, KeyEvent};
use log::{debug, info};

use crate::app::{App, Mode};
use crate::editor::{DurationEditor, EditorOutcome};
use crate::keymap::KeyMap;
use crate::notify::Notifier;
use crate::session::{Effect, SessionEvent};

/// Unified event type consumed by the dispatcher
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    /// Periodic tick for the timer run identified by `generation`.
    Tick { generation: u64 },
}

/// Ordered intake of events from every producer.
pub trait EventSource {
    /// Blocks until the next event. `None` once every producer is gone.
    fn next_event(&self) -> Option<AppEvent>;
}

/// Production event source: a thread reading the terminal, plus a sender
/// other producers (the ticker) can push into.
pub struct CrosstermEventSource {
    tx: Sender<AppEvent>,
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        let key_tx = tx.clone();
        thread::spawn(move || loop {
            let evt = match event::read() {
                Ok(CtEvent::Key(key)) => AppEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => AppEvent::Resize,
                Ok(_) => continue,
                Err(err) => {
                    debug!("terminal reader stopped: {err}");
                    break;
                }
            };
            if key_tx.send(evt).is_err() {
                break;
            }
        });

        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<AppEvent> {
        self.tx.clone()
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn next_event(&self) -> Option<AppEvent> {
        self.rx.recv().ok()
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn next_event(&self) -> Option<AppEvent> {
        self.rx.recv().ok()
    }
}

/// Periodic producer of `Tick` events for one timer run at a time.
pub trait TickSource {
    /// Starts emitting ticks tagged with `generation`, replacing any
    /// previous run.
    fn arm(&mut self, generation: u64, interval: Duration);
    fn disarm(&mut self);
}

/// Sentinel for "no run armed". Running timers always have generation >= 1.
const DISARMED: u64 = 0;

/// Spawns one sleeping thread per armed run. A thread exits as soon as it
/// notices a different generation is current, so at most one keeps sending.
pub struct ThreadTicker {
    tx: Sender<AppEvent>,
    current: Arc<AtomicU64>,
}

impl ThreadTicker {
    pub fn new(tx: Sender<AppEvent>) -> Self {
        Self {
            tx,
            current: Arc::new(AtomicU64::new(DISARMED)),
        }
    }
}

impl TickSource for ThreadTicker {
    fn arm(&mut self, generation: u64, interval: Duration) {
        self.current.store(generation, Ordering::SeqCst);
        let current = Arc::clone(&self.current);
        let tx = self.tx.clone();
        thread::spawn(move || loop {
            thread::sleep(interval);
            if current.load(Ordering::SeqCst) != generation {
                break;
            }
            if tx.send(AppEvent::Tick { generation }).is_err() {
                break;
            }
        });
    }

    fn disarm(&mut self) {
        self.current.store(DISARMED, Ordering::SeqCst);
    }
}

/// Tick source that only remembers what it was asked to do. Tests push the
/// ticks themselves.
#[derive(Debug, Default)]
pub struct ManualTicker {
    armed: Option<(u64, Duration)>,
    arm_count: usize,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn armed(&self) -> Option<(u64, Duration)> {
        self.armed
    }

    pub fn arm_count(&self) -> usize {
        self.arm_count
    }
}

impl TickSource for ManualTicker {
    fn arm(&mut self, generation: u64, interval: Duration) {
        self.armed = Some((generation, interval));
        self.arm_count += 1;
    }

    fn disarm(&mut self) {
        self.armed = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Sole owner of the session. Applies events one at a time in arrival order,
/// performs the side effects transitions ask for and keeps the ticker in step
/// with the timer.
pub struct Dispatcher<N: Notifier, T: TickSource> {
    app: App,
    keymap: KeyMap,
    notifier: N,
    ticker: T,
    armed: Option<u64>,
}

impl<N: Notifier, T: TickSource> Dispatcher<N, T> {
    pub fn new(app: App, keymap: KeyMap, notifier: N, ticker: T) -> Self {
        Self {
            app,
            keymap,
            notifier,
            ticker,
            armed: None,
        }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    /// Applies a single event. Once `Flow::Quit` has been returned every
    /// later event is ignored.
    pub fn handle(&mut self, event: AppEvent) -> Flow {
        if self.app.quitting {
            return Flow::Quit;
        }

        let flow = match event {
            AppEvent::Resize => Flow::Continue,
            AppEvent::Tick { generation } => self.apply(SessionEvent::Tick { generation }),
            AppEvent::Key(key) => self.on_key(key),
        };
        self.sync_ticker();
        flow
    }

    /// Drives the loop until quit or until the source runs dry, calling
    /// `draw` once up front and after every handled event.
    pub fn run<S, D>(&mut self, source: &S, mut draw: D) -> io::Result<()>
    where
        S: EventSource,
        D: FnMut(&App) -> io::Result<()>,
    {
        draw(&self.app)?;
        while let Some(event) = source.next_event() {
            if self.handle(event) == Flow::Quit {
                break;
            }
            draw(&self.app)?;
        }
        self.ticker.disarm();
        Ok(())
    }

    fn on_key(&mut self, key: KeyEvent) -> Flow {
        if self.app.mode == Mode::Timer {
            return match self.keymap.command_for(&key) {
                Some(command) => {
                    debug!("command {command:?}");
                    self.apply(command)
                }
                None => Flow::Continue,
            };
        }

        if self.keymap.is_interrupt(&key) {
            self.app.quitting = true;
            return Flow::Quit;
        }
        let Some(command) = self.keymap.editor_command_for(&key) else {
            return Flow::Continue;
        };
        let Mode::Editing(editor) = &mut self.app.mode else {
            return Flow::Continue;
        };

        match editor.apply(command) {
            EditorOutcome::Pending => {}
            EditorOutcome::Committed(durations) => {
                info!("durations changed to {durations:?}");
                let session = std::mem::take(&mut self.app.session);
                self.app.session = session.reconfigured(durations);
                self.app.mode = Mode::Timer;
            }
            EditorOutcome::Cancelled => {
                debug!("duration edit cancelled");
                self.app.mode = Mode::Timer;
            }
        }
        Flow::Continue
    }

    fn apply(&mut self, event: SessionEvent) -> Flow {
        let session = std::mem::take(&mut self.app.session);
        let (session, effect) = session.apply(event);
        self.app.session = session;

        match effect {
            None => Flow::Continue,
            Some(Effect::Notify(phase)) => {
                self.notifier.notify(&phase.to_string());
                Flow::Continue
            }
            Some(Effect::OpenEditor) => {
                let editor = DurationEditor::new(self.app.session.durations());
                self.app.mode = Mode::Editing(editor);
                Flow::Continue
            }
            Some(Effect::Quit) => {
                self.app.quitting = true;
                Flow::Quit
            }
        }
    }

    fn sync_ticker(&mut self) {
        let timer = self.app.session.timer();
        if timer.is_running() {
            let generation = timer.generation();
            if self.armed != Some(generation) {
                self.ticker.arm(generation, timer.tick_interval());
                self.armed = Some(generation);
            }
        } else if self.armed.take().is_some() {
            self.ticker.disarm();
        }
    }
}
