use anyhow::{bail, Context};
use chrono::{DateTime, Local};
use clap::{Args, Parser, Subcommand};
use itertools::Itertools;
use std::io::Write;
use std::path::PathBuf;
use touchtype::{
    achievements::Achievement,
    config::{Config, ConfigStore, FileConfigStore},
    curriculum::LESSONS,
    export,
    language::SupportedLanguage,
    metrics::WordCounting,
    storage::Storage,
    tracker::Tracker,
    util::{key_label, time_ago},
    word_generator::WordGenConfig,
};

/// touch-typing trainer with lessons, drills, exams and progress tracking
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal touch-typing trainer: timed tests, a lesson catalog, key drills built from your most missed keys, exam simulations, achievements and a proctored Sport Mode with leaderboards."
)]
pub struct Cli {
    /// options for the default typing test
    #[clap(flatten)]
    pub test: TestArgs,

    #[clap(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// timed or word-count typing test (the default)
    Test(TestArgs),
    /// practice a lesson, or list the catalog when none is given
    Lesson {
        /// lesson id or its number in the catalog
        lesson: Option<String>,
    },
    /// drill a handful of keys
    Drill(DrillArgs),
    /// timed exam with pass marks
    Exam(ExamArgs),
    /// progress, streak, achievements and most missed keys
    Stats,
    /// recent activity, optionally exported as CSV
    History {
        /// how many entries to list
        #[clap(short = 'n', long, default_value_t = 10)]
        limit: usize,

        /// write the full history to this CSV file
        #[clap(long)]
        export: Option<PathBuf>,
    },
    /// clear all stored progress, missed keys and Sport Mode data
    Reset {
        /// confirm the reset
        #[clap(long)]
        yes: bool,
    },
    /// Sport Mode: students, competitions, proctored runs and leaderboards
    #[clap(subcommand)]
    Sport(SportCommand),
    /// show the effective configuration
    Config {
        /// write the effective configuration back to the config file
        #[clap(long)]
        save: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct TestArgs {
    /// number of words to use in test
    #[clap(short = 'w', long)]
    pub number_of_words: Option<usize>,

    /// number of sentences to use in test
    #[clap(short = 'f', long = "full-sentences")]
    pub number_of_sentences: Option<usize>,

    /// number of seconds to run test
    #[clap(short = 's', long)]
    pub number_of_secs: Option<u64>,

    /// custom prompt to use
    #[clap(short = 'p', long)]
    pub prompt: Option<String>,

    /// language to pull words from
    #[clap(short = 'l', long, value_enum)]
    pub language: Option<SupportedLanguage>,

    /// how words are counted for wpm
    #[clap(long, value_enum)]
    pub word_counting: Option<WordCounting>,
}

impl TestArgs {
    pub fn to_word_gen_config(&self, config: &Config) -> WordGenConfig {
        WordGenConfig {
            number_of_words: self.number_of_words.unwrap_or(config.number_of_words),
            number_of_sentences: self.number_of_sentences,
            custom_prompt: self.prompt.clone(),
            language: self.language.unwrap_or(config.language),
        }
    }

    /// Explicit seconds win; a word count or custom prompt means an untimed run
    pub fn time_limit(&self, config: &Config) -> Option<u64> {
        match self.number_of_secs {
            Some(secs) => Some(secs),
            None if self.number_of_words.is_some() || self.prompt.is_some() => None,
            None => Some(config.default_test_secs),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct DrillArgs {
    /// keys to drill, e.g. "fjdk"
    pub keys: Option<String>,

    /// drill your N most missed keys instead
    #[clap(long, value_name = "N", num_args = 0..=1, default_missing_value = "5")]
    pub missed: Option<usize>,

    /// number of drill words
    #[clap(short = 'w', long)]
    pub words: Option<usize>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ExamArgs {
    /// exam length in seconds
    #[clap(short = 's', long)]
    pub secs: Option<u64>,

    /// minimum wpm to pass
    #[clap(long)]
    pub min_wpm: Option<u32>,

    /// minimum accuracy (percent) to pass
    #[clap(long)]
    pub min_accuracy: Option<u32>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SportCommand {
    /// register a student
    Register {
        name: String,
        #[clap(short = 'g', long, default_value = "")]
        group: String,
    },
    /// list registered students
    Students,
    /// create a competition over a fixed text
    Create {
        title: String,

        /// competition text
        #[clap(long, required_unless_present = "file", conflicts_with = "file")]
        text: Option<String>,

        /// read the competition text from a file
        #[clap(long)]
        file: Option<PathBuf>,

        /// time limit in seconds
        #[clap(short = 's', long, default_value_t = 60)]
        secs: u64,
    },
    /// list competitions
    Competitions,
    /// run a student's proctored attempt
    Run {
        #[clap(long)]
        competition: u64,
        #[clap(long)]
        student: u64,
    },
    /// show a competition's leaderboard
    Leaderboard {
        competition: u64,

        /// write the leaderboard to this CSV file
        #[clap(long)]
        export: Option<PathBuf>,
    },
}

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn print_stats<S: Storage, W: Write>(
    out: &mut W,
    tracker: &Tracker<S>,
    now: DateTime<Local>,
) -> anyhow::Result<()> {
    let data = tracker.progress.data();
    writeln!(out, "Activities completed: {}", data.total_tests)?;
    writeln!(out, "Best speed:           {} wpm", data.best_wpm)?;
    writeln!(out, "Best accuracy:        {}%", data.best_accuracy)?;
    if let Some(avg) = data.average_wpm() {
        writeln!(out, "Average speed:        {avg:.1} wpm")?;
    }
    writeln!(out, "Current streak:       {} days", data.streak(now.date_naive()))?;
    writeln!(
        out,
        "Lessons completed:    {}/{}",
        data.completed_lessons(),
        LESSONS.len()
    )?;

    writeln!(out)?;
    writeln!(out, "Achievements ({}/{}):", data.achievements.len(), Achievement::ALL.len())?;
    for tag in &data.achievements {
        match Achievement::from_tag(tag) {
            Some(a) => writeln!(out, "  * {}", a.title())?,
            None => writeln!(out, "  * {tag}")?,
        }
    }

    let missed = tracker.missed_keys.data();
    if missed.total_misses > 0 {
        writeln!(out)?;
        writeln!(out, "Most missed keys ({} misses in total):", missed.total_misses)?;
        for (key, stat) in missed.top(10) {
            let when = stat
                .last_missed
                .map(|t| time_ago(t, now))
                .unwrap_or_else(|| "-".to_string());
            writeln!(out, "  {:<6} {:>5}   last missed {when}", key_label(key), stat.count)?;
        }
    }
    Ok(())
}

pub fn print_history<S: Storage, W: Write>(
    out: &mut W,
    tracker: &Tracker<S>,
    limit: usize,
    export_to: Option<&PathBuf>,
) -> anyhow::Result<()> {
    let data = tracker.progress.data();
    if let Some(path) = export_to {
        export::history_to_file(path, &data.tests)
            .with_context(|| format!("could not export history to {}", path.display()))?;
        writeln!(out, "Exported {} records to {}", data.tests.len(), path.display())?;
        return Ok(());
    }

    if data.tests.is_empty() {
        writeln!(out, "No activity recorded yet.")?;
        return Ok(());
    }
    for r in data.recent(limit) {
        writeln!(
            out,
            "{}  {:<7} {:<28} {:>4} wpm {:>4}% {:>4} err {:>5}s",
            r.timestamp.format(DATE_FORMAT),
            r.kind,
            r.title,
            r.wpm,
            r.accuracy,
            r.errors,
            r.time_spent
        )?;
    }
    Ok(())
}

pub fn print_lessons<S: Storage, W: Write>(out: &mut W, tracker: &Tracker<S>) -> anyhow::Result<()> {
    let progress = &tracker.progress.data().lesson_progress;
    for (idx, lesson) in LESSONS.iter().enumerate() {
        let status = match progress.get(lesson.id) {
            Some(p) if p.completed => format!("done, best {} wpm / {}%", p.best_wpm, p.best_accuracy),
            Some(p) => format!("{} attempts", p.attempts),
            None => "new".to_string(),
        };
        writeln!(out, "{:>2}. {:<18} {:<22} {status}", idx + 1, lesson.id, lesson.title)?;
    }
    Ok(())
}

pub fn reset<S: Storage, W: Write>(out: &mut W, tracker: &mut Tracker<S>, yes: bool) -> anyhow::Result<()> {
    if !yes {
        bail!("refusing to clear all progress without --yes");
    }
    tracker.reset_all().context("could not clear stored data")?;
    writeln!(out, "All progress cleared.")?;
    Ok(())
}

/// Sport Mode bookkeeping commands; `run` is handled by the TUI
pub fn sport_admin<S: Storage, W: Write>(
    out: &mut W,
    tracker: &mut Tracker<S>,
    command: &SportCommand,
    now: DateTime<Local>,
) -> anyhow::Result<()> {
    let sport = &mut tracker.sport;
    match command {
        SportCommand::Register { name, group } => {
            let student = sport.register_student(name, group, now)?;
            writeln!(out, "Registered {} with id {}", student.name, student.id)?;
        }
        SportCommand::Students => {
            for s in sport.students() {
                writeln!(out, "{:>14}  {:<24} {}", s.id, s.name, s.group)?;
            }
        }
        SportCommand::Create {
            title,
            text,
            file,
            secs,
        } => {
            let text = match (text, file) {
                (Some(text), _) => text.clone(),
                (None, Some(path)) => std::fs::read_to_string(path)
                    .with_context(|| format!("could not read {}", path.display()))?,
                (None, None) => bail!("a competition needs --text or --file"),
            };
            let text = text.split_whitespace().join(" ");
            let competition = sport.create_competition(title, &text, *secs, now)?;
            writeln!(
                out,
                "Created competition {} with id {}",
                competition.title, competition.id
            )?;
        }
        SportCommand::Competitions => {
            for c in sport.competitions() {
                writeln!(out, "{:>14}  {:<24} {:>4}s", c.id, c.title, c.duration_secs)?;
            }
        }
        SportCommand::Leaderboard {
            competition,
            export: export_to,
        } => {
            let board = sport.leaderboard(*competition)?;
            if let Some(path) = export_to {
                export::leaderboard_to_file(path, &board)
                    .with_context(|| format!("could not export leaderboard to {}", path.display()))?;
                writeln!(out, "Exported {} results to {}", board.len(), path.display())?;
                return Ok(());
            }
            for (idx, r) in board.iter().enumerate() {
                writeln!(
                    out,
                    "{:>3}. {:<24} {:>4} wpm {:>4}% {:>4} err",
                    idx + 1,
                    r.student_name,
                    r.wpm,
                    r.accuracy,
                    r.errors
                )?;
            }
        }
        SportCommand::Run { .. } => bail!("sport runs need an interactive terminal"),
    }
    Ok(())
}

pub fn show_config<W: Write>(
    out: &mut W,
    store: &FileConfigStore,
    config: &Config,
    save: bool,
) -> anyhow::Result<()> {
    if save {
        store
            .save(config)
            .with_context(|| format!("could not write {}", store.path().display()))?;
    }
    writeln!(out, "# {}", store.path().display())?;
    writeln!(out, "{}", serde_json::to_string_pretty(config)?)?;
    Ok(())
}
