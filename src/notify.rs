use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;

use log::debug;
use notify_rust::Notification;

pub const DEFAULT_SOUND: &str = "sound.wav";
const SUMMARY: &str = "Pomodoro";

/// Best-effort side channel for phase changes. Implementations must return
/// immediately and never surface errors to the caller.
pub trait Notifier {
    fn notify(&self, label: &str);
}

/// Desktop notification plus an optional sound, each on a detached thread.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    sound: Option<PathBuf>,
    player: String,
}

impl DesktopNotifier {
    pub fn new(sound: Option<PathBuf>) -> Self {
        Self {
            sound,
            player: "paplay".to_string(),
        }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, label: &str) {
        let body = label.to_string();
        thread::spawn(move || {
            if let Err(err) = Notification::new().summary(SUMMARY).body(&body).show() {
                debug!("desktop notification failed: {err}");
            }
        });

        if let Some(sound) = &self.sound {
            // spawn() returns once the child exists; we never wait on it
            let spawned = Command::new(&self.player)
                .arg(sound)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            match spawned {
                Ok(mut child) => {
                    thread::spawn(move || child.wait());
                }
                Err(err) => debug!("could not run {}: {err}", self.player),
            }
        }
    }
}

/// Used when notifications are switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _label: &str) {}
}

/// Keeps every label it was asked to show, for tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    labels: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labels(&self) -> Vec<String> {
        self.labels
            .lock()
            .map(|labels| labels.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, label: &str) {
        if let Ok(mut labels) = self.labels.lock() {
            labels.push(label.to_string());
        }
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&self, label: &str) {
        (**self).notify(label)
    }
}
