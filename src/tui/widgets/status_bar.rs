use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;

use crate::Config;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::utils::truncate;

pub fn render_status_bar(f: &mut Frame, area: Rect, message: Option<&String>, key_hints: &[String], config: &Config) {
    let theme = config.get_active_theme();
    let max_width = area.width as usize;

    let (content, style) = match message {
        Some(msg) => {
            // Status messages stand out on the highlight color
            let highlight_bg = parse_color(&theme.highlight_bg);
            (
                truncate(msg, max_width),
                Style::default()
                    .fg(get_contrast_text_color(highlight_bg))
                    .bg(highlight_bg)
                    .add_modifier(Modifier::BOLD),
            )
        }
        None => (
            fit_hints(key_hints, max_width),
            Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg)),
        ),
    };

    f.render_widget(Paragraph::new(content).style(style), area);
}

/// Join as many hints as fit in `max_width`, ending with "..." when some are dropped
fn fit_hints(key_hints: &[String], max_width: usize) -> String {
    const SEPARATOR: &str = " • ";
    const ELLIPSIS: &str = "...";

    let mut text = String::new();
    for hint in key_hints {
        let candidate = if text.is_empty() {
            hint.clone()
        } else {
            format!("{}{}{}", text, SEPARATOR, hint)
        };
        if candidate.chars().count() > max_width {
            if text.is_empty() {
                return truncate(hint, max_width);
            }
            if text.chars().count() + ELLIPSIS.len() <= max_width {
                text.push_str(ELLIPSIS);
            }
            return text;
        }
        text = candidate;
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_are_cut_with_ellipsis() {
        let hints = vec!["q: Quit".to_string(), "F1: Help".to_string(), "r: Reload".to_string()];
        assert_eq!(fit_hints(&hints, 80), "q: Quit • F1: Help • r: Reload");
        assert_eq!(fit_hints(&hints, 21), "q: Quit • F1: Help...");
        assert_eq!(fit_hints(&hints, 19), "q: Quit • F1: Help");
        assert_eq!(fit_hints(&hints, 5), "q:...");
    }
}
