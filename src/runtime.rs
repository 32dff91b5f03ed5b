use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What the trainer reacts to, already stripped of terminal noise
#[derive(Clone, Debug, PartialEq)]
pub enum TrainerEvent {
    Key(KeyEvent),
    /// Bracketed paste, delivered as one chunk so policies can refuse it whole
    Paste(String),
    Resize,
    Tick,
}

/// Map a raw terminal event to a trainer event. Key releases (reported by
/// terminals with the kitty protocol), focus and mouse events and empty
/// pastes are dropped.
pub fn translate(event: CtEvent) -> Option<TrainerEvent> {
    match event {
        CtEvent::Key(key) if key.kind == KeyEventKind::Release => None,
        CtEvent::Key(key) => Some(TrainerEvent::Key(key)),
        CtEvent::Paste(text) if text.is_empty() => None,
        CtEvent::Paste(text) => Some(TrainerEvent::Paste(text)),
        CtEvent::Resize(_, _) => Some(TrainerEvent::Resize),
        _ => None,
    }
}

/// Key events for typing `text` one char at a time
pub fn keystrokes(text: &str) -> impl Iterator<Item = TrainerEvent> + '_ {
    text.chars()
        .map(|c| TrainerEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)))
}

pub trait TrainerEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Err(Timeout) when nothing arrived in time.
    fn recv_timeout(&self, timeout: Duration) -> Result<TrainerEvent, RecvTimeoutError>;
}

/// Reads the terminal on a background thread
pub struct CrosstermEventSource {
    rx: Receiver<TrainerEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let Ok(raw) = event::read() else {
                break;
            };
            if let Some(ev) = translate(raw) {
                if tx.send(ev).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainerEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TrainerEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Plays back a prepared list of events, then only ticks at the ticker's
/// pace. Lets a whole typing run be driven without a terminal.
pub struct ScriptedEventSource {
    rx: Receiver<TrainerEvent>,
    // held so an exhausted script waits out the interval instead of disconnecting
    _tx: Sender<TrainerEvent>,
}

impl ScriptedEventSource {
    pub fn new<I: IntoIterator<Item = TrainerEvent>>(events: I) -> Self {
        let (tx, rx) = mpsc::channel();
        for ev in events {
            // cannot fail, the receiver is held below
            let _ = tx.send(ev);
        }
        Self { rx, _tx: tx }
    }
}

impl TrainerEventSource for ScriptedEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TrainerEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Advances the application one event or tick at a time
pub struct Runner<E: TrainerEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: TrainerEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to the tick interval; a quiet or closed source yields Tick
    pub fn step(&self) -> TrainerEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                TrainerEvent::Tick
            }
        }
    }

    /// Feed events to `handle` until it reports the run is over or
    /// `max_steps` pass. Returns whether the run ended.
    pub fn run_until<F>(&self, max_steps: u32, mut handle: F) -> bool
    where
        F: FnMut(TrainerEvent) -> bool,
    {
        (0..max_steps).any(|_| handle(self.step()))
    }
}
