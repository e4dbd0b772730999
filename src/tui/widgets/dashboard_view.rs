use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::Config;
use crate::database::Dashboard;
use crate::tui::widgets::color::parse_color;
use crate::utils::truncate;

/// Three panels side by side: pending tasks, recent notes, people to catch up with
pub fn render_dashboard(f: &mut Frame, area: Rect, dashboard: Option<&Dashboard>, config: &Config) {
    let theme = config.get_active_theme();
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);
    let accent = parse_color(&theme.accent);

    let Some(dashboard) = dashboard else {
        let paragraph = Paragraph::new("Loading...").style(Style::default().fg(fg_color).bg(bg_color));
        f.render_widget(paragraph, area);
        return;
    };

    let columns = RatLayout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(35),
            Constraint::Percentage(25),
        ])
        .split(area);

    let width_of = |rect: Rect| rect.width.saturating_sub(2) as usize;

    let task_lines: Vec<Line> = dashboard
        .pending_tasks
        .iter()
        .map(|task| {
            let overdue = task.deadline.is_some_and(|d| d < dashboard.today);
            let deadline = task
                .deadline
                .map(|d| format!(" (due {})", d))
                .unwrap_or_default();
            let text = truncate(&format!("{} {}{}", task.priority, task.title, deadline), width_of(columns[0]));
            if overdue {
                Line::from(Span::styled(text, Style::default().fg(accent).add_modifier(Modifier::BOLD)))
            } else {
                Line::from(text)
            }
        })
        .collect();

    let note_lines: Vec<Line> = dashboard
        .recent_notes
        .iter()
        .map(|note| {
            let first_line = note.content.lines().next().unwrap_or_default();
            Line::from(vec![
                Span::styled(format!("{} ", note.date_label()), Style::default().fg(accent)),
                Span::raw(first_line.to_string()),
            ])
        })
        .collect();

    let people_lines: Vec<Line> = dashboard
        .stale_people
        .iter()
        .map(|person| {
            let days = person
                .last_interaction
                .map(|d| (dashboard.today - d).num_days())
                .unwrap_or_default();
            Line::from(truncate(&format!("{} ({} days)", person.name, days), width_of(columns[2])))
        })
        .collect();

    let panels = [
        (format!("Pending tasks ({})", dashboard.pending_tasks.len()), task_lines, "Nothing pending"),
        (format!("Recent notes ({})", dashboard.recent_notes.len()), note_lines, "No notes yet"),
        (format!("Catch up ({})", dashboard.stale_people.len()), people_lines, "Everyone is up to date"),
    ];

    for ((title, lines, empty_text), column) in panels.into_iter().zip(columns.iter()) {
        let lines = if lines.is_empty() { vec![Line::from(empty_text)] } else { lines };
        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .style(Style::default().fg(fg_color).bg(bg_color)),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, *column);
    }
}
