use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap};
use ratskin::RatSkin;
use std::cmp;
use termimad::minimad::Text as MinimadText;

use crate::Config;
use crate::models::{Note, RelatedEntity};
use crate::tui::app::SelectedItem;
use crate::tui::widgets::color::parse_color;

/// Markdown for the detail pane: the row's fields, then any notes attached to it
pub fn get_content_string(item: &SelectedItem, related_notes: &[Note]) -> String {
    let mut content = match item {
        SelectedItem::Task(task) => {
            let mut content = format!("**Title:** {}\n", task.title);
            content.push_str(&format!("**Priority:** {}\n", task.priority));
            content.push_str(&format!("**Status:** {}\n", task.status));
            content.push_str(&format!("**Created:** {}\n", task.created_at));
            if let Some(deadline) = task.deadline {
                content.push_str(&format!("**Deadline:** {}\n", deadline));
            }
            if let Some(ref description) = task.description {
                content.push_str("\n**Description:**\n\n");
                content.push_str(description);
                content.push('\n');
            }
            content
        }
        SelectedItem::Note(note) => {
            let mut content = format!("**Date:** {}\n", note.date_label());
            if let Some(ref tag) = note.tag {
                content.push_str(&format!("**Tag:** {}\n", tag));
            }
            if note.related != RelatedEntity::None {
                content.push_str(&format!("**Attached to:** {}\n", note.related));
            }
            content.push_str("\n**Content:**\n\n");
            content.push_str(&note.content);
            content.push('\n');
            content
        }
        SelectedItem::Conversation(conversation) => {
            let mut content = format!("**Person:** {}\n", conversation.person_name);
            content.push_str(&format!("**Date:** {}\n", conversation.conv_date));
            content.push_str("\n**Notes:**\n\n");
            content.push_str(&conversation.content);
            content.push('\n');
            content
        }
        SelectedItem::Link(link) => {
            let mut content = format!("**Title:** {}\n", link.title);
            content.push_str(&format!("**URL:** {}\n", link.url));
            if let Some(ref category) = link.category {
                content.push_str(&format!("**Category:** {}\n", category));
            }
            content.push_str(&format!("**Saved:** {}\n", link.saved_at));
            if let Some(ref comment) = link.comment {
                content.push_str("\n**Comment:**\n\n");
                content.push_str(comment);
                content.push('\n');
            }
            content
        }
    };

    if !related_notes.is_empty() {
        content.push_str(&format!("\n---\n\n**Notes ({})**\n\n", related_notes.len()));
        for note in related_notes {
            content.push_str(&format!("* *{}* {}\n", note.date_label(), note.content));
        }
    }
    content
}

pub fn render_item_view(
    f: &mut Frame,
    area: Rect,
    item: &SelectedItem,
    related_notes: &[Note],
    config: &Config,
    scroll_offset: usize,
) {
    if area.width < 2 || area.height < 2 {
        return;
    }

    let horizontal = RatLayout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let content_area = horizontal[0];
    let scrollbar_area = horizontal[1];

    let viewport_height = (area.height - 2) as usize;
    let text_width: u16 = content_area.width.saturating_sub(2);

    // ratskin wraps to the given width, so parse after the split
    let content_string = get_content_string(item, related_notes);
    let parsed = RatSkin::default().parse(MinimadText::from(content_string.as_str()), text_width);
    let lines: Vec<Line> = parsed
        .into_iter()
        .map(|line| {
            let spans: Vec<Span> = line
                .spans
                .into_iter()
                .map(|span| Span::styled(span.content.to_string(), span.style))
                .collect();
            Line::from(spans)
        })
        .collect();

    let total_lines = lines.len();
    let max_scroll = total_lines.saturating_sub(viewport_height);
    let scroll_offset = cmp::min(scroll_offset, max_scroll);
    let end_line = cmp::min(scroll_offset + viewport_height, total_lines);
    let visible_text = if scroll_offset < total_lines {
        Text::from(lines[scroll_offset..end_line].to_vec())
    } else {
        Text::default()
    };

    let title = match item {
        SelectedItem::Task(_) => "Task",
        SelectedItem::Note(_) => "Note",
        SelectedItem::Conversation(_) => "1:1",
        SelectedItem::Link(_) => "Link",
    };

    // trim: false keeps list indentation
    let paragraph = Paragraph::new(visible_text)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(parse_color(&config.get_active_theme().fg)))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, content_area);

    if total_lines > viewport_height {
        let scrollbar_inner_area = Rect::new(
            scrollbar_area.x,
            content_area.y + 1,
            scrollbar_area.width,
            content_area.height.saturating_sub(2),
        );
        let mut scrollbar_state = ScrollbarState::new(total_lines)
            .viewport_content_length(viewport_height)
            .position(scroll_offset);
        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"))
            .track_symbol(Some("│"))
            .thumb_symbol("█");
        f.render_stateful_widget(scrollbar, scrollbar_inner_area, &mut scrollbar_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, Task, TaskStatus};
    use chrono::NaiveDate;

    #[test]
    fn task_detail_lists_attached_notes() {
        let task = Task {
            id: Some(1),
            title: "Write report".to_string(),
            description: None,
            priority: Priority::High,
            status: TaskStatus::Pending,
            created_at: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            deadline: NaiveDate::from_ymd_opt(2024, 6, 1),
        };
        let note = Note {
            id: Some(3),
            note_date: NaiveDate::from_ymd_opt(2024, 5, 20),
            content: "first draft done".to_string(),
            tag: None,
            related: RelatedEntity::Task(1),
        };

        let content = get_content_string(&SelectedItem::Task(task), &[note]);
        assert!(content.contains("**Priority:** High"));
        assert!(content.contains("**Deadline:** 2024-06-01"));
        assert!(content.contains("**Notes (1)**"));
        assert!(content.contains("*2024-05-20* first draft done"));
    }
}
