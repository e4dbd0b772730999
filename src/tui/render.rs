use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{Mode, Tab};
use crate::tui::widgets::{
    color::parse_color, dashboard_view::render_dashboard, filters_box::render_filters_box, help::render_help,
    item_view::render_item_view, record_list::render_record_list, status_bar::render_status_bar, tabs::render_tabs,
};
use crate::tui::{App, Layout};
use crate::utils::format_key_binding_for_display as display;

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    let theme = app.config.get_active_theme();
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Daybook - {}", crate::utils::get_current_date_string()))
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(outer_block, f.area());

    render_tabs(f, layout.tabs_area, app.ui.current_tab, &app.config);

    if layout.sidebar_area.width > 0 {
        let area = layout.sidebar_area;
        let title = app.ui.current_tab.title();
        let state = &mut app.ui.list_state;
        match app.ui.current_tab {
            Tab::Dashboard => {}
            Tab::Notes => render_record_list(f, area, title, &app.notes, state, &app.config),
            Tab::Conversations => render_record_list(f, area, title, &app.conversations, state, &app.config),
            Tab::Tasks => render_record_list(f, area, title, &app.tasks, state, &app.config),
            Tab::Links => render_record_list(f, area, title, &app.links, state, &app.config),
        }
    }

    if app.ui.current_tab == Tab::Dashboard {
        render_dashboard(f, layout.main_area, app.dashboard.as_ref(), &app.config);
    } else if let Some(ref item) = app.ui.selected_item {
        render_item_view(
            f,
            layout.main_area,
            item,
            &app.ui.related_notes,
            &app.config,
            app.ui.item_view_scroll,
        );
    } else {
        let empty = Paragraph::new("Nothing here yet.")
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(fg_color).bg(bg_color));
        f.render_widget(empty, layout.main_area);
    }

    let filters_title = match app.ui.current_tab {
        Tab::Tasks => format!("{}: Filter", display(&app.config.key_bindings.filter)),
        _ => "Summary".to_string(),
    };
    render_filters_box(
        f,
        layout.filters_area,
        &filters_title,
        &app.get_filter_summary(),
        &app.config,
    );

    if app.ui.mode == Mode::Help {
        render_help(f, f.area(), &app.config);
    }

    let key_hints = get_key_hints(app);
    render_status_bar(f, layout.status_area, app.status.message.as_ref(), &key_hints, &app.config);
}

fn get_key_hints(app: &App) -> Vec<String> {
    let keys = &app.config.key_bindings;
    if app.ui.mode == Mode::Help {
        return vec![format!("Esc or {}: Exit help", display(&keys.help))];
    }

    let mut hints = vec![format!("{}: Quit", display(&keys.quit))];
    match app.ui.current_tab {
        Tab::Tasks => {
            hints.push(format!("{}: Done", display(&keys.mark_done)));
            hints.push(format!("{}: Filter", display(&keys.filter)));
        }
        Tab::Links => hints.push(format!("{}: Copy URL", display(&keys.copy_url))),
        _ => {}
    }
    hints.push(format!("{}: Reload", display(&keys.reload)));
    hints.push(format!("{}: Help", display(&keys.help)));
    hints
}
