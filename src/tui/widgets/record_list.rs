use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

use crate::Config;
use crate::models::{Conversation, Link, Note, Task};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::utils::truncate;

/// One line in the sidebar for each kind of record
pub trait ListLine {
    fn list_line(&self) -> String;
}

impl ListLine for Task {
    fn list_line(&self) -> String {
        let status_indicator = if self.is_done() { "✓" } else { "○" };
        let deadline = self.deadline.map(|d| format!(" [{}]", d)).unwrap_or_default();
        format!("{} ({}) {}{}", status_indicator, self.priority, self.title, deadline)
    }
}

impl ListLine for Note {
    fn list_line(&self) -> String {
        let tag = self.tag.as_ref().map(|t| format!("[{}] ", t)).unwrap_or_default();
        // First line only; the rest shows in the detail pane
        let first_line = self.content.lines().next().unwrap_or_default();
        format!("{} {}{}", self.date_label(), tag, first_line)
    }
}

impl ListLine for Conversation {
    fn list_line(&self) -> String {
        format!("{} {}", self.conv_date, self.person_name)
    }
}

impl ListLine for Link {
    fn list_line(&self) -> String {
        match self.category {
            Some(ref category) => format!("{} [{}]", self.title, category),
            None => self.title.clone(),
        }
    }
}

pub fn render_record_list<T: ListLine>(
    f: &mut Frame,
    area: Rect,
    title: &str,
    records: &[T],
    list_state: &mut ListState,
    config: &Config,
) {
    // 2 for borders, 2 for the highlight symbol
    let max_width = area.width.saturating_sub(4) as usize;

    let theme = config.get_active_theme();
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);
    let highlight_bg = parse_color(&theme.highlight_bg);

    let items: Vec<ListItem> = if records.is_empty() {
        vec![ListItem::new("(empty)")]
    } else {
        records
            .iter()
            .map(|record| ListItem::new(truncate(&record.list_line(), max_width)))
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} ({})", title, records.len()))
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .highlight_style(Style::default().fg(get_contrast_text_color(highlight_bg)).bg(highlight_bg))
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, list_state);
}
