use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::Config;
use crate::tui::widgets::color::parse_color;
use crate::utils::format_key_binding_for_display as display;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let theme = config.get_active_theme();
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);

    let popup_area = popup_area(area, 60, 70);
    // Clear first so the list underneath does not show through
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(build_help_text(config))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help - Key Bindings")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

/// Centered rect taking the given percentages of `area`
fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

fn build_help_text(config: &Config) -> String {
    let keys = &config.key_bindings;
    let mut text = String::new();

    text.push_str("Navigation:\n");
    text.push_str(&format!("  {} / {}: Switch tabs\n", display(&keys.tab_left), display(&keys.tab_right)));
    text.push_str("  1-5: Jump to tab\n");
    text.push_str(&format!("  {} / {}: Move up/down\n", display(&keys.list_up), display(&keys.list_down)));
    text.push_str("  PageUp / PageDown: Scroll details\n");
    text.push('\n');

    text.push_str("Actions:\n");
    text.push_str(&format!("  {}: Mark task done (Tasks tab)\n", display(&keys.mark_done)));
    text.push_str(&format!("  {}: Cycle status filter (Tasks tab)\n", display(&keys.filter)));
    text.push_str(&format!("  {}: Copy URL (Links tab)\n", display(&keys.copy_url)));
    text.push_str(&format!("  {}: Reload from database\n", display(&keys.reload)));
    text.push('\n');

    text.push_str("General:\n");
    text.push_str(&format!("  {}: Quit\n", display(&keys.quit)));
    text.push_str(&format!("  {} / Esc: Show/hide help\n", display(&keys.help)));
    text.push('\n');
    text.push_str("Records are added from the command line; see `daybook --help`.\n");

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_text_uses_configured_keys() {
        let mut config = Config::default();
        config.key_bindings.mark_done = "d".to_string();
        let text = build_help_text(&config);
        assert!(text.contains("d: Mark task done"));
        assert!(text.contains("q: Quit"));
    }
}
