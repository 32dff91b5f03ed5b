use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};
use touchtype::util::{key_label, time_ago};

use crate::{App, MissedRow};

/// Pure presenter for one missed-key row. `total` is the miss count across
/// every key, used for the share column.
pub fn present_row(row: &MissedRow, total: u32, now: DateTime<Local>) -> Row<'static> {
    let share = if total == 0 {
        0.0
    } else {
        100.0 * row.count as f64 / total as f64
    };
    let share_color = if share < 5.0 {
        Color::Green
    } else if share < 15.0 {
        Color::Yellow
    } else {
        Color::Red
    };
    let last = row
        .last_missed
        .map(|t| time_ago(t, now))
        .unwrap_or_else(|| "-".to_string());

    Row::new(vec![
        Cell::from(key_label(row.key)).style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(row.count.to_string()),
        Cell::from(format!("{share:.1}")).style(Style::default().fg(share_color)),
        Cell::from(last),
    ])
}

pub fn render_missed_keys(app: &mut App, f: &mut Frame) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(0),    // table
            Constraint::Length(2), // instructions
        ])
        .split(area);

    let total: u32 = app.missed_rows.iter().map(|r| r.count).sum();
    let title = Paragraph::new(format!("Most missed keys ({total} misses)"))
        .block(Block::default().borders(Borders::ALL).title("Missed keys"))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    if app.missed_rows.is_empty() {
        let empty = Paragraph::new("No missed keys yet. Clean typing!")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(empty, chunks[1]);
    } else {
        let table_height = chunks[1].height.saturating_sub(3) as usize; // borders + header
        let max_scroll = app.missed_rows.len().saturating_sub(table_height);
        app.missed_scroll = app.missed_scroll.min(max_scroll);

        let now = Local::now();
        let rows: Vec<Row> = app
            .missed_rows
            .iter()
            .skip(app.missed_scroll)
            .take(table_height)
            .map(|row| present_row(row, total, now))
            .collect();

        let header = Row::new(vec!["Key", "Misses", "Share (%)", "Last missed"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
        let widths = [
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Min(14),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title("All activities"))
            .column_spacing(2);
        f.render_widget(table, chunks[1]);
    }

    let instructions = Paragraph::new("(↑/↓) scroll  (Home) top  (b/backspace) back  (esc) quit")
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(instructions, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PromptSource;
    use chrono::TimeZone;
    use ratatui::{backend::TestBackend, Terminal};
    use touchtype::{metrics::WordCounting, tracker::Activity};

    fn app_with_rows(n: usize) -> App {
        let mut app = App::new(
            Activity::Test { time_limit: None },
            PromptSource::Fixed("abc".into()),
            None,
            WordCounting::Tokens,
        )
        .unwrap();
        app.missed_rows = (0..n)
            .map(|i| MissedRow {
                key: char::from(b'a' + i as u8),
                count: (n - i) as u32,
                last_missed: None,
            })
            .collect();
        app
    }

    fn draw(app: &mut App, w: u16, h: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
        terminal.draw(|f| render_missed_keys(app, f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn present_row_handles_zero_total() {
        let row = MissedRow {
            key: ' ',
            count: 0,
            last_missed: Some(Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        };
        let _ = present_row(&row, 0, Local::now());
    }

    #[test]
    fn empty_table_shows_a_message() {
        let mut app = app_with_rows(0);
        assert!(draw(&mut app, 80, 20).contains("No missed keys yet"));
    }

    #[test]
    fn scroll_is_clamped_to_the_rows() {
        let mut app = app_with_rows(20);
        app.missed_scroll = 100;

        let text = draw(&mut app, 80, 16);

        assert!(app.missed_scroll < 20);
        assert!(text.contains("Most missed keys (210 misses)"));
    }
}
