use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

pub struct Layout {
    pub tabs_area: Rect,
    pub sidebar_area: Rect,
    pub main_area: Rect,
    pub filters_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Minimum terminal dimensions (inside the outer border)
    pub const MIN_WIDTH: u16 = 60;
    pub const MIN_HEIGHT: u16 = 12;

    /// Split the screen. The sidebar is skipped when `with_sidebar` is false
    /// (the Dashboard tab uses the whole width).
    pub fn calculate(size: Rect, sidebar_width_percent: u16, with_sidebar: bool) -> Self {
        let width = size.width.max(Self::MIN_WIDTH + 2);
        let height = size.height.max(Self::MIN_HEIGHT + 2);

        // Inside the outer border
        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            width.saturating_sub(2),
            height.saturating_sub(2),
        );

        let sidebar_width = if with_sidebar {
            let requested = inner_area.width * sidebar_width_percent.clamp(20, 60) / 100;
            requested.min(inner_area.width.saturating_sub(20))
        } else {
            0
        };

        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Tabs
                Constraint::Min(1),    // Content
                Constraint::Length(3), // Filters
                Constraint::Length(1), // Status
            ])
            .split(inner_area);

        let horizontal = RatLayout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(sidebar_width), Constraint::Min(1)])
            .split(vertical[1]);

        Self {
            tabs_area: vertical[0],
            sidebar_area: horizontal[0],
            main_area: horizontal[1],
            filters_area: vertical[2],
            status_area: vertical[3],
        }
    }
}
