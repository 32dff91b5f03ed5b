pub mod charting;
pub mod missed_keys;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};
use touchtype::{session::Outcome, tracker::Completion};
use unicode_width::UnicodeWidthStr;

use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Countdown => render_countdown(self, area, buf),
            AppState::Typing => render_typing(self, area, buf),
            AppState::Results | AppState::MissedKeys => render_results(self, area, buf),
        }
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn render_countdown(app: &App, area: Rect, buf: &mut Buffer) {
    let title = match &app.activity {
        touchtype::tracker::Activity::Sport { title, .. } => title.as_str(),
        _ => "",
    };
    let lines = vec![
        Line::from(Span::styled(title.to_string(), bold().fg(Color::Cyan))),
        Line::from(""),
        Line::from(Span::styled(
            app.countdown_remaining().to_string(),
            bold().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "no backspace, no paste",
            Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
        )),
    ];
    let top = area.height.saturating_sub(lines.len() as u16) / 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(top), Constraint::Min(1)])
        .split(area);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;

    let green_bold_style = bold().fg(Color::Green);
    let red_bold_style = bold().fg(Color::Red);
    let dim_bold_style = bold().add_modifier(Modifier::DIM);
    let underlined_dim_bold_style = dim_bold_style.add_modifier(Modifier::UNDERLINED);

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let prompt_width = session.prompt.width();
    let prompt_occupied_lines = if prompt_width <= max_chars_per_line as usize {
        1
    } else {
        ((prompt_width as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16
    };
    let time_left_lines = if session.time_limit.is_some() { 2 } else { 0 };
    let padding = area.height.saturating_sub(prompt_occupied_lines) / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(padding),
            Constraint::Length(time_left_lines),
            Constraint::Length(prompt_occupied_lines),
            Constraint::Length(padding),
        ])
        .split(area);

    let mut spans = session
        .input
        .iter()
        .enumerate()
        .map(|(idx, input)| {
            let expected = session
                .expected_char(idx)
                .map(String::from)
                .unwrap_or_default();
            match input.outcome {
                Outcome::Incorrect => Span::styled(
                    match input.char {
                        ' ' => "·".to_owned(),
                        c => c.to_string(),
                    },
                    red_bold_style,
                ),
                Outcome::Correct => Span::styled(expected, green_bold_style),
            }
        })
        .collect::<Vec<Span>>();

    let cursor = session.cursor_pos();
    if let Some(next) = session.expected_char(cursor) {
        spans.push(Span::styled(next.to_string(), underlined_dim_bold_style));
    }
    let rest: String = session.prompt.chars().skip(cursor + 1).collect();
    spans.push(Span::styled(rest, dim_bold_style));

    Paragraph::new(Line::from(spans))
        .alignment(if prompt_occupied_lines == 1 {
            // a prompt that fits on one line reads best centered
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true })
        .render(chunks[2], buf);

    if let Some(remaining) = session.seconds_remaining {
        let mut status = format!("{remaining:.1}");
        if !session.policy.allows_backspace() {
            status.push_str("   proctored");
        }
        Paragraph::new(Span::styled(status, dim_bold_style))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);
    }
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(results) = app.results.as_ref() else {
        return;
    };
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);
    let magenta_style = Style::default().fg(Color::Magenta);

    let summary = summary_lines(app);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),                          // chart
            Constraint::Length(1),                       // stats
            Constraint::Length(summary.len() as u16),    // verdicts and unlocks
            Constraint::Length(1),                       // padding
            Constraint::Length(1),                       // legend
        ])
        .split(area);

    let tuples: Vec<(f64, f64)> = results.wpm_series.iter().map(|p| (p.t, p.wpm)).collect();
    let (overall_duration, highest_wpm) =
        charting::compute_chart_params(&tuples, app.session.time_limit);

    let datasets = vec![Dataset::default()
        .marker(ratatui::symbols::Marker::Braille)
        .style(magenta_style)
        .graph_type(GraphType::Line)
        .data(&tuples)];

    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("seconds")
                .bounds([1.0, overall_duration])
                .labels(vec![
                    Span::styled("1", bold()),
                    Span::styled(charting::format_label(overall_duration), bold()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .bounds([0.0, highest_wpm])
                .labels(vec![
                    Span::styled("0", bold()),
                    Span::styled(charting::format_label(highest_wpm), bold()),
                ]),
        )
        .render(chunks[0], buf);

    let m = &results.metrics;
    Paragraph::new(Span::styled(
        format!(
            "{} wpm   {} cpm   {}% acc   {} errors   {:.2} sd",
            m.wpm, m.cpm, m.accuracy, m.errors, results.consistency
        ),
        bold(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    Paragraph::new(summary)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[2], buf);

    let legend = if app.is_sport() {
        "(m)issed keys / (esc)ape"
    } else {
        "(r)etry / (n)ew / (m)issed keys / (esc)ape"
    };
    Paragraph::new(Span::styled(legend, italic_style)).render(chunks[4], buf);
}

/// Outcome lines under the stats: exam verdict, lesson status, rank, unlocks
fn summary_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(notice) = &app.notice {
        lines.push(Line::from(Span::styled(notice.clone(), bold().fg(Color::Red))));
    }
    let Some(completion) = &app.completion else {
        return lines;
    };
    let Completion {
        new_achievements,
        lesson_passed,
        exam,
        sport_rank,
        ..
    } = completion;

    if let Some(verdict) = exam {
        let (text, color) = if verdict.passed {
            ("Exam passed".to_string(), Color::Green)
        } else {
            let mut missed = Vec::new();
            if !verdict.speed_ok {
                missed.push("speed");
            }
            if !verdict.accuracy_ok {
                missed.push("accuracy");
            }
            (format!("Exam failed: {} too low", missed.join(" and ")), Color::Red)
        };
        lines.push(Line::from(Span::styled(text, bold().fg(color))));
    }
    match lesson_passed {
        Some(true) => lines.push(Line::from(Span::styled("Lesson complete", bold().fg(Color::Green)))),
        Some(false) => lines.push(Line::from(Span::styled(
            "Lesson not passed yet: aim for higher accuracy",
            bold().fg(Color::Yellow),
        ))),
        None => {}
    }
    if let Some(rank) = sport_rank {
        lines.push(Line::from(Span::styled(
            format!("Leaderboard position: #{rank}"),
            bold().fg(Color::Cyan),
        )));
    }
    for achievement in new_achievements {
        lines.push(Line::from(Span::styled(
            format!("Unlocked: {}", achievement.title()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
        )));
    }
    lines
}
