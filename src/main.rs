mod cli;
mod ui;

use anyhow::{bail, Context};
use chrono::{DateTime, Local};
use clap::{error::ErrorKind, CommandFactory, Parser};
use cli::{Cli, Command, DrillArgs, ExamArgs, SportCommand, TestArgs};
use crossterm::{
    event::{
        DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    fs::OpenOptions,
    io::{self, stdin},
    sync::Mutex,
    time::{Duration, SystemTime},
};
use touchtype::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    curriculum::{lessons, Drill},
    metrics::WordCounting,
    runtime::{CrosstermEventSource, FixedTicker, Runner, TrainerEvent},
    session::{SessionResults, TypingSession},
    sport::SportFlow,
    storage::{FileStorage, Storage},
    tracker::{Activity, Completion, Tracker},
    typing_policy::{self, InputPolicy},
    word_generator::{WordGenConfig, WordGenerator},
};
use tracing_subscriber::EnvFilter;

const TICK_RATE_MS: u64 = 100;
const LOG_ENV: &str = "TOUCHTYPE_LOG";
const MISSED_ROWS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Countdown,
    Typing,
    Results,
    MissedKeys,
}

/// Where the next prompt comes from when a run is restarted with a fresh text
#[derive(Debug, Clone)]
pub enum PromptSource {
    Words(WordGenConfig),
    Drill { drill: Drill, words: usize },
    Fixed(String),
}

impl PromptSource {
    pub fn generate(&self) -> touchtype::Result<String> {
        match self {
            PromptSource::Words(config) => WordGenerator::new(config.clone())
                .generate_prompt()
                .map(|(prompt, _)| prompt),
            PromptSource::Drill { drill, words } => Ok(drill.text(*words)),
            PromptSource::Fixed(text) => Ok(text.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MissedRow {
    pub key: char,
    pub count: u32,
    pub last_missed: Option<DateTime<Local>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    Handled,
    Finished,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub activity: Activity,
    source: PromptSource,
    pub session: TypingSession,
    pub state: AppState,
    pub counting: WordCounting,
    pub results: Option<SessionResults>,
    pub completion: Option<Completion>,
    /// failure to persist, shown on the results screen
    pub notice: Option<String>,
    pub flow: Option<SportFlow>,
    countdown_mark: Option<SystemTime>,
    pub missed_rows: Vec<MissedRow>,
    pub missed_scroll: usize,
}

impl App {
    pub fn new(
        activity: Activity,
        source: PromptSource,
        time_limit: Option<u64>,
        counting: WordCounting,
    ) -> touchtype::Result<Self> {
        let prompt = source.generate()?;
        Ok(Self {
            activity,
            source,
            session: TypingSession::new(prompt, time_limit.map(|s| s as f64), InputPolicy::Standard),
            state: AppState::Typing,
            counting,
            results: None,
            completion: None,
            notice: None,
            flow: None,
            countdown_mark: None,
            missed_rows: Vec::new(),
            missed_scroll: 0,
        })
    }

    /// A proctored run that opens on the countdown
    pub fn sport(
        activity: Activity,
        text: String,
        time_limit: u64,
        counting: WordCounting,
        flow: SportFlow,
        now: SystemTime,
    ) -> Self {
        Self {
            activity,
            source: PromptSource::Fixed(text.clone()),
            session: TypingSession::new(text, Some(time_limit as f64), InputPolicy::Proctored),
            state: AppState::Countdown,
            counting,
            results: None,
            completion: None,
            notice: None,
            flow: Some(flow),
            countdown_mark: Some(now),
            missed_rows: Vec::new(),
            missed_scroll: 0,
        }
    }

    pub fn is_sport(&self) -> bool {
        matches!(self.activity, Activity::Sport { .. })
    }

    pub fn countdown_remaining(&self) -> u32 {
        self.flow.as_ref().map_or(0, |f| f.countdown_remaining())
    }

    /// Advance timers. Returns true when this tick ended the run.
    pub fn on_tick(&mut self, now: SystemTime) -> bool {
        match self.state {
            AppState::Countdown => {
                self.advance_countdown(now);
                false
            }
            AppState::Typing if self.session.has_started() => {
                self.session.tick_at(now);
                self.session.has_finished()
            }
            _ => false,
        }
    }

    fn advance_countdown(&mut self, now: SystemTime) {
        let (Some(flow), Some(mark)) = (self.flow.as_mut(), self.countdown_mark) else {
            self.state = AppState::Typing;
            return;
        };
        let whole_secs = now.duration_since(mark).unwrap_or_default().as_secs();
        for _ in 0..whole_secs {
            match flow.tick_countdown() {
                Ok(true) => {
                    self.state = AppState::Typing;
                    self.countdown_mark = None;
                    // the clock runs from the end of the countdown, typed or not
                    self.session.start_at(now);
                    return;
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "countdown out of step");
                    self.state = AppState::Typing;
                    self.session.start_at(now);
                    return;
                }
            }
        }
        self.countdown_mark = Some(mark + Duration::from_secs(whole_secs));
    }

    pub fn on_paste(&mut self, text: &str, now: SystemTime) -> KeyOutcome {
        if self.state != AppState::Typing {
            return KeyOutcome::Ignored;
        }
        if !self.session.policy.allows_paste() {
            tracing::info!(chars = text.chars().count(), "paste refused");
            return KeyOutcome::Ignored;
        }
        let any = typing_policy::apply_paste(&mut self.session, text, now);
        match (any, self.session.has_finished()) {
            (_, true) => KeyOutcome::Finished,
            (true, false) => KeyOutcome::Handled,
            (false, false) => KeyOutcome::Ignored,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: SystemTime) -> KeyOutcome {
        if key.kind == KeyEventKind::Release {
            return KeyOutcome::Ignored;
        }
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            // a proctored run cannot be abandoned and retried: leaving submits it
            if self.is_sport() && self.state == AppState::Typing {
                tracing::info!(typed = self.session.cursor_pos(), "sport run left early");
                return KeyOutcome::Finished;
            }
            return KeyOutcome::Quit;
        }

        match self.state {
            AppState::Countdown => KeyOutcome::Ignored,
            AppState::Typing => match key.code {
                KeyCode::Backspace => {
                    if self.session.backspace() {
                        KeyOutcome::Handled
                    } else {
                        KeyOutcome::Ignored
                    }
                }
                KeyCode::Char(c) => {
                    if !self.session.write_at(c, now) {
                        return KeyOutcome::Ignored;
                    }
                    if self.session.has_finished() {
                        KeyOutcome::Finished
                    } else {
                        KeyOutcome::Handled
                    }
                }
                _ => KeyOutcome::Ignored,
            },
            AppState::Results => match key.code {
                KeyCode::Char('q') => KeyOutcome::Quit,
                KeyCode::Char('r') | KeyCode::Left => self.restart(false),
                KeyCode::Char('n') | KeyCode::Right => self.restart(true),
                KeyCode::Char('m') => {
                    self.state = AppState::MissedKeys;
                    KeyOutcome::Handled
                }
                _ => KeyOutcome::Ignored,
            },
            AppState::MissedKeys => match key.code {
                KeyCode::Char('q') => KeyOutcome::Quit,
                KeyCode::Char('b') | KeyCode::Backspace => {
                    self.state = AppState::Results;
                    KeyOutcome::Handled
                }
                KeyCode::Char('r') => self.restart(false),
                KeyCode::Char('n') => self.restart(true),
                KeyCode::Up => {
                    self.missed_scroll = self.missed_scroll.saturating_sub(1);
                    KeyOutcome::Handled
                }
                KeyCode::Down => {
                    // clamped when rendering
                    self.missed_scroll += 1;
                    KeyOutcome::Handled
                }
                KeyCode::Home => {
                    self.missed_scroll = 0;
                    KeyOutcome::Handled
                }
                _ => KeyOutcome::Ignored,
            },
        }
    }

    /// Start over, with the same prompt or a freshly generated one. Sport runs
    /// are single-shot and never restart.
    fn restart(&mut self, fresh_prompt: bool) -> KeyOutcome {
        if self.is_sport() {
            return KeyOutcome::Ignored;
        }
        let prompt = if fresh_prompt {
            match self.source.generate() {
                Ok(prompt) => prompt,
                Err(e) => {
                    self.notice = Some(e.to_string());
                    return KeyOutcome::Handled;
                }
            }
        } else {
            self.session.prompt.clone()
        };

        self.session = TypingSession::new(prompt, self.session.time_limit, self.session.policy);
        self.state = AppState::Typing;
        self.results = None;
        self.completion = None;
        self.notice = None;
        self.missed_scroll = 0;
        KeyOutcome::Handled
    }

    pub fn finish(&mut self, now: SystemTime) {
        self.results = Some(self.session.results_at(now, self.counting));
        if let Some(flow) = self.flow.as_mut() {
            if let Err(e) = flow.finish() {
                tracing::warn!(error = %e, "sport flow out of step");
            }
        }
        self.state = AppState::Results;
    }

    /// Persist the finished run
    pub fn record<S: Storage>(&mut self, tracker: &mut Tracker<S>, at: DateTime<Local>) {
        let Some(results) = self.results.as_ref() else {
            return;
        };
        match tracker.complete(&self.activity, &self.session, results, at) {
            Ok(completion) => self.completion = Some(completion),
            Err(e) => {
                tracing::error!(error = %e, "could not record activity");
                self.notice = Some(format!("not saved: {e}"));
            }
        }
        self.missed_rows = tracker
            .missed_keys
            .data()
            .top(MISSED_ROWS)
            .into_iter()
            .map(|(key, stat)| MissedRow {
                key,
                count: stat.count,
                last_missed: stat.last_missed,
            })
            .collect();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config_store = FileConfigStore::new();
    let config = config_store.load();
    let data_dir = AppDirs::data_dir().context("could not determine a data directory")?;
    let storage = FileStorage::new(&data_dir);
    let mut tracker = Tracker::load(storage, config.lesson_pass_accuracy);
    let mut out = io::stdout();

    let command = cli.command.clone().unwrap_or(Command::Test(cli.test.clone()));
    let app = match command {
        Command::Stats => return cli::print_stats(&mut out, &tracker, Local::now()),
        Command::History { limit, export } => {
            return cli::print_history(&mut out, &tracker, limit, export.as_ref())
        }
        Command::Reset { yes } => return cli::reset(&mut out, &mut tracker, yes),
        Command::Config { save } => return cli::show_config(&mut out, &config_store, &config, save),
        Command::Lesson { lesson: None } => return cli::print_lessons(&mut out, &tracker),
        Command::Sport(SportCommand::Run {
            competition,
            student,
        }) => sport_app(&tracker, &config, competition, student)?,
        Command::Sport(admin) => {
            return cli::sport_admin(&mut out, &mut tracker, &admin, Local::now())
        }
        Command::Test(args) => test_app(&args, &config)?,
        Command::Lesson {
            lesson: Some(lesson),
        } => {
            let lesson = lessons::find(&lesson)?;
            App::new(
                Activity::Lesson(lesson),
                PromptSource::Fixed(lesson.text.to_string()),
                None,
                config.word_counting,
            )?
        }
        Command::Drill(args) => drill_app(&args, &tracker, &config)?,
        Command::Exam(args) => exam_app(&args, &config)?,
    };

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    run_tui(app, &mut tracker)
}

fn test_app(args: &TestArgs, config: &Config) -> anyhow::Result<App> {
    let counting = args.word_counting.unwrap_or(config.word_counting);
    let time_limit = args.time_limit(config);
    let app = App::new(
        Activity::Test { time_limit },
        PromptSource::Words(args.to_word_gen_config(config)),
        time_limit,
        counting,
    )?;
    Ok(app)
}

fn drill_app<S: Storage>(args: &DrillArgs, tracker: &Tracker<S>, config: &Config) -> anyhow::Result<App> {
    let keys: Vec<char> = match (&args.keys, args.missed) {
        (Some(keys), _) => keys.chars().collect(),
        (None, Some(n)) => {
            let top = tracker.missed_keys.data().top(n);
            if top.is_empty() {
                bail!("no missed keys recorded yet; finish a test first");
            }
            top.into_iter().map(|(key, _)| key).collect()
        }
        (None, None) => bail!("give the keys to drill, or --missed"),
    };
    let drill = Drill::new(keys)?;
    let words = args.words.unwrap_or(config.drill_words);
    let app = App::new(
        Activity::Drill(drill.clone()),
        PromptSource::Drill { drill, words },
        None,
        config.word_counting,
    )?;
    Ok(app)
}

fn exam_app(args: &ExamArgs, config: &Config) -> anyhow::Result<App> {
    let mut exam = config.exam();
    exam.duration_secs = args.secs.unwrap_or(exam.duration_secs);
    exam.min_wpm = args.min_wpm.unwrap_or(exam.min_wpm);
    exam.min_accuracy = args.min_accuracy.unwrap_or(exam.min_accuracy);

    let source = PromptSource::Words(WordGenConfig {
        number_of_sentences: Some(exam.sentence_count()),
        language: config.language,
        ..Default::default()
    });
    let app = App::new(
        Activity::Exam(exam),
        source,
        Some(exam.duration_secs),
        config.word_counting,
    )?;
    Ok(app)
}

fn sport_app<S: Storage>(
    tracker: &Tracker<S>,
    config: &Config,
    competition_id: u64,
    student_id: u64,
) -> anyhow::Result<App> {
    let competition = tracker.sport.competition(competition_id)?;
    tracker.sport.student(student_id)?;
    if tracker.sport.has_submitted(competition_id, student_id) {
        return Err(touchtype::TrainerError::AlreadySubmitted {
            competition_id,
            student_id,
        }
        .into());
    }

    let mut flow = SportFlow::new();
    flow.select_competition(competition_id)?;
    flow.register(student_id, config.sport_countdown_secs)?;

    Ok(App::sport(
        Activity::Sport {
            competition_id,
            student_id,
            title: competition.title.clone(),
        },
        competition.text.clone(),
        competition.duration_secs,
        config.word_counting,
        flow,
        SystemTime::now(),
    ))
}

/// Log to a file in the data dir; the terminal belongs to the TUI
fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn run_tui<S: Storage>(mut app: App, tracker: &mut Tracker<S>) -> anyhow::Result<()> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let result = start_tui(&mut terminal, &mut app, tracker, &runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, S: Storage>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tracker: &mut Tracker<S>,
    runner: &Runner<CrosstermEventSource, FixedTicker>,
) -> anyhow::Result<()> {
    terminal.draw(|f| ui(app, f))?;

    loop {
        let now = SystemTime::now();
        let outcome = match runner.step() {
            TrainerEvent::Tick => {
                let live = matches!(app.state, AppState::Countdown | AppState::Typing);
                if app.on_tick(now) {
                    KeyOutcome::Finished
                } else if live {
                    KeyOutcome::Handled
                } else {
                    KeyOutcome::Ignored
                }
            }
            TrainerEvent::Resize => KeyOutcome::Handled,
            TrainerEvent::Paste(text) => app.on_paste(&text, now),
            TrainerEvent::Key(key) => app.on_key(key, now),
        };

        match outcome {
            KeyOutcome::Quit => break,
            KeyOutcome::Finished => {
                app.finish(now);
                app.record(tracker, Local::now());
            }
            KeyOutcome::Handled => {}
            KeyOutcome::Ignored => continue,
        }
        terminal.draw(|f| ui(app, f))?;
    }

    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    let screen = ui::screen::current_screen(&app.state);
    screen.render(app, f);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use touchtype::curriculum::ExamSpec;
    use touchtype::storage::MemoryStorage;

    fn press(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn fixed_app(prompt: &str) -> App {
        App::new(
            Activity::Test { time_limit: None },
            PromptSource::Fixed(prompt.to_string()),
            None,
            WordCounting::Tokens,
        )
        .unwrap()
    }

    fn at(ms: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_millis(1_000_000 + ms)
    }

    #[test]
    fn typing_the_prompt_finishes_the_run() {
        let mut app = fixed_app("hi");

        assert_eq!(app.on_key(press('h'), at(0)), KeyOutcome::Handled);
        assert_eq!(app.on_key(press('i'), at(300)), KeyOutcome::Finished);
        app.finish(at(300));

        assert_eq!(app.state, AppState::Results);
        assert_eq!(app.results.as_ref().unwrap().metrics.accuracy, 100);
    }

    #[test]
    fn escape_and_ctrl_c_quit() {
        let mut app = fixed_app("hi");
        assert_eq!(app.on_key(key(KeyCode::Esc), at(0)), KeyOutcome::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.on_key(ctrl_c, at(0)), KeyOutcome::Quit);
    }

    #[test]
    fn retry_keeps_the_prompt() {
        let mut app = fixed_app("ab");
        app.on_key(press('a'), at(0));
        app.on_key(press('x'), at(100));
        app.finish(at(100));

        assert_eq!(app.on_key(press('r'), at(200)), KeyOutcome::Handled);
        assert_eq!(app.state, AppState::Typing);
        assert_eq!(app.session.prompt, "ab");
        assert!(app.session.input.is_empty());
        assert!(app.results.is_none());
    }

    #[test]
    fn results_and_missed_keys_screens_toggle() {
        let mut app = fixed_app("a");
        app.on_key(press('a'), at(0));
        app.finish(at(0));

        app.on_key(press('m'), at(10));
        assert_eq!(app.state, AppState::MissedKeys);
        app.on_key(key(KeyCode::Down), at(10));
        app.on_key(key(KeyCode::Down), at(10));
        app.on_key(key(KeyCode::Up), at(10));
        assert_eq!(app.missed_scroll, 1);
        app.on_key(press('b'), at(10));
        assert_eq!(app.state, AppState::Results);
    }

    #[test]
    fn record_fills_completion_and_missed_rows() {
        let storage = MemoryStorage::new();
        let mut tracker = Tracker::load(&storage, 90);
        let mut app = fixed_app("the cat sat");
        for (i, c) in "the cat sar".chars().enumerate() {
            app.on_key(press(c), at(150 * i as u64));
        }
        app.finish(at(1_500));
        app.record(&mut tracker, Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());

        let completion = app.completion.as_ref().unwrap();
        assert_eq!(completion.record.errors, 1);
        assert_eq!(app.missed_rows[0].key, 't');
        assert!(app.notice.is_none());
    }

    #[test]
    fn sport_run_counts_down_then_refuses_editing() {
        let mut flow = SportFlow::new();
        flow.select_competition(1).unwrap();
        flow.register(2, 3).unwrap();
        let mut app = App::sport(
            Activity::Sport {
                competition_id: 1,
                student_id: 2,
                title: "Cup".into(),
            },
            "go".into(),
            30,
            WordCounting::Tokens,
            flow,
            at(0),
        );

        assert_eq!(app.on_key(press('g'), at(100)), KeyOutcome::Ignored);
        app.on_tick(at(1_100));
        assert_eq!(app.countdown_remaining(), 2);
        assert_eq!(app.state, AppState::Countdown);
        app.on_tick(at(3_050));
        assert_eq!(app.state, AppState::Typing);

        assert_eq!(app.on_paste("go", at(3_100)), KeyOutcome::Ignored);
        app.on_key(press('x'), at(3_200));
        assert_eq!(app.on_key(key(KeyCode::Backspace), at(3_300)), KeyOutcome::Ignored);
        assert_eq!(app.on_key(press('o'), at(3_400)), KeyOutcome::Finished);
        app.finish(at(3_400));

        assert_eq!(app.on_key(press('r'), at(4_000)), KeyOutcome::Ignored);
        assert_eq!(app.state, AppState::Results);
        assert_eq!(
            app.flow.as_ref().unwrap().phase(),
            touchtype::sport::SportPhase::Result
        );
    }

    fn sport_app(storage: &MemoryStorage, secs: u64) -> (App, Tracker<&MemoryStorage>) {
        let mut tracker = Tracker::load(storage, 90);
        let now = Local.with_ymd_and_hms(2024, 3, 3, 10, 0, 0).unwrap();
        let cup = tracker
            .sport
            .create_competition("Cup", "the quick fox", secs, now)
            .unwrap();
        let ann = tracker.sport.register_student("Ann", "", now).unwrap();

        let mut flow = SportFlow::new();
        flow.select_competition(cup.id).unwrap();
        flow.register(ann.id, 3).unwrap();
        let app = App::sport(
            Activity::Sport {
                competition_id: cup.id,
                student_id: ann.id,
                title: cup.title.clone(),
            },
            cup.text.clone(),
            secs,
            WordCounting::Tokens,
            flow,
            at(0),
        );
        (app, tracker)
    }

    #[test]
    fn sport_clock_starts_when_the_countdown_ends() {
        let storage = MemoryStorage::new();
        let (mut app, mut tracker) = sport_app(&storage, 30);

        assert!(!app.on_tick(at(3_100)));
        assert_eq!(app.state, AppState::Typing);
        assert!(app.session.has_started());

        assert!(!app.on_tick(at(20_000)));
        assert!(app.on_tick(at(120_000)));
        app.finish(at(120_000));
        app.record(&mut tracker, Local.with_ymd_and_hms(2024, 3, 3, 10, 5, 0).unwrap());

        let result = &tracker.sport.results()[0];
        assert_eq!(result.wpm, 0);
        assert_eq!(app.results.as_ref().unwrap().elapsed_secs, 30.0);
    }

    #[test]
    fn leaving_a_sport_run_submits_it() {
        let storage = MemoryStorage::new();
        let (mut app, mut tracker) = sport_app(&storage, 60);
        app.on_tick(at(3_000));
        app.on_key(press('t'), at(3_500));

        assert_eq!(app.on_key(key(KeyCode::Esc), at(4_000)), KeyOutcome::Finished);
        app.finish(at(4_000));
        app.record(&mut tracker, Local.with_ymd_and_hms(2024, 3, 3, 10, 1, 0).unwrap());

        let Activity::Sport { competition_id, student_id, .. } = app.activity.clone() else {
            unreachable!()
        };
        assert!(tracker.sport.has_submitted(competition_id, student_id));
        assert_eq!(app.on_key(key(KeyCode::Esc), at(5_000)), KeyOutcome::Quit);
    }

    #[test]
    fn paste_fills_a_standard_session() {
        let mut app = fixed_app("abc");
        assert_eq!(app.on_paste("ab", at(0)), KeyOutcome::Handled);
        assert_eq!(app.on_paste("c\n", at(10)), KeyOutcome::Finished);
    }

    #[test]
    fn timed_run_finishes_on_tick() {
        let mut app = App::new(
            Activity::Exam(ExamSpec::default()),
            PromptSource::Fixed("a long enough prompt".into()),
            Some(1),
            WordCounting::Tokens,
        )
        .unwrap();
        assert!(!app.on_tick(at(0)));
        app.on_key(press('a'), at(0));
        assert!(!app.on_tick(at(500)));
        assert!(app.on_tick(at(1_200)));
    }
}
