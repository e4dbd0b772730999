use crate::database::{Dashboard, DatabaseError};
use crate::models::{Conversation, Link, Note, RelatedEntity, Task, TaskStatus};
use crate::tui::error::TuiError;
use crate::utils::{self, ParsedKeyBinding, parse_key_binding};
use crate::{Config, Database};
use ratatui::widgets::ListState;
use std::time::Instant;

/// Sections of the dashboard, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Notes,
    Conversations,
    Tasks,
    Links,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Dashboard, Tab::Notes, Tab::Conversations, Tab::Tasks, Tab::Links];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Notes => "Daily Notes",
            Tab::Conversations => "1:1s",
            Tab::Tasks => "Tasks",
            Tab::Links => "Links",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    fn offset(self, delta: isize) -> Tab {
        let len = Self::ALL.len() as isize;
        let next = (self.index() as isize + delta).rem_euclid(len);
        Self::ALL[next as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    View,
    Help,
}

/// Row shown in the detail pane
#[derive(Debug, Clone, PartialEq)]
pub enum SelectedItem {
    Task(Task),
    Note(Note),
    Conversation(Conversation),
    Link(Link),
}

impl SelectedItem {
    /// What notes attached to this row would point at
    pub fn as_related(&self) -> RelatedEntity {
        match self {
            SelectedItem::Task(task) => task.id.map(RelatedEntity::Task).unwrap_or_default(),
            SelectedItem::Conversation(c) => RelatedEntity::Conversation(c.id),
            SelectedItem::Link(link) => link.id.map(RelatedEntity::Link).unwrap_or_default(),
            SelectedItem::Note(_) => RelatedEntity::None,
        }
    }
}

/// Key bindings parsed once from config
#[derive(Debug, Clone)]
pub struct Bindings {
    pub quit: ParsedKeyBinding,
    pub tab_left: ParsedKeyBinding,
    pub tab_right: ParsedKeyBinding,
    pub list_up: ParsedKeyBinding,
    pub list_down: ParsedKeyBinding,
    pub mark_done: ParsedKeyBinding,
    pub filter: ParsedKeyBinding,
    pub copy_url: ParsedKeyBinding,
    pub reload: ParsedKeyBinding,
    pub help: ParsedKeyBinding,
}

impl Bindings {
    pub fn from_config(config: &Config) -> Result<Self, TuiError> {
        let keys = &config.key_bindings;
        let parse = |name: &str, value: &str| {
            parse_key_binding(value).map_err(|e| TuiError::KeyBindingError(format!("{}: {}", name, e)))
        };
        Ok(Self {
            quit: parse("quit", &keys.quit)?,
            tab_left: parse("tab_left", &keys.tab_left)?,
            tab_right: parse("tab_right", &keys.tab_right)?,
            list_up: parse("list_up", &keys.list_up)?,
            list_down: parse("list_down", &keys.list_down)?,
            mark_done: parse("mark_done", &keys.mark_done)?,
            filter: parse("filter", &keys.filter)?,
            copy_url: parse("copy_url", &keys.copy_url)?,
            reload: parse("reload", &keys.reload)?,
            help: parse("help", &keys.help)?,
        })
    }
}

pub struct UiState {
    pub current_tab: Tab,
    pub mode: Mode,
    pub selected_index: usize,
    pub list_state: ListState,
    pub selected_item: Option<SelectedItem>,
    /// Notes attached to the selected task, conversation or link
    pub related_notes: Vec<Note>,
    pub item_view_scroll: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            current_tab: Tab::Dashboard,
            mode: Mode::View,
            selected_index: 0,
            list_state: ListState::default(),
            selected_item: None,
            related_notes: Vec::new(),
            item_view_scroll: 0,
        }
    }
}

#[derive(Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

pub struct App {
    // Core infrastructure
    pub config: Config,
    pub database: Database,
    pub bindings: Bindings,

    // Section data, reloaded after every write
    pub dashboard: Option<Dashboard>,
    pub tasks: Vec<Task>,
    pub notes: Vec<Note>,
    pub conversations: Vec<Conversation>,
    pub links: Vec<Link>,

    /// Status filter on the Tasks tab; None shows all
    pub task_filter: Option<TaskStatus>,

    pub ui: UiState,
    pub status: StatusState,
}

impl App {
    pub fn new(config: Config, database: Database) -> Result<Self, TuiError> {
        let bindings = Bindings::from_config(&config)?;
        let mut app = Self {
            config,
            database,
            bindings,
            dashboard: None,
            tasks: Vec::new(),
            notes: Vec::new(),
            conversations: Vec::new(),
            links: Vec::new(),
            task_filter: None,
            ui: UiState::default(),
            status: StatusState::default(),
        };

        app.load_data()?;
        Ok(app)
    }

    /// Re-read every section from the database
    pub fn load_data(&mut self) -> Result<(), DatabaseError> {
        self.dashboard = Some(Dashboard::load(
            &self.database,
            utils::today(),
            self.config.dashboard_settings(),
        )?);
        self.tasks = self.database.list_tasks(self.task_filter)?;
        self.notes = self.database.list_notes()?;
        self.conversations = self.database.list_conversations()?;
        self.links = self.database.list_links()?;

        self.adjust_selected_index();
        self.select_current_item()?;
        Ok(())
    }

    /// Number of rows listed on the current tab
    pub fn current_len(&self) -> usize {
        match self.ui.current_tab {
            Tab::Dashboard => 0,
            Tab::Notes => self.notes.len(),
            Tab::Conversations => self.conversations.len(),
            Tab::Tasks => self.tasks.len(),
            Tab::Links => self.links.len(),
        }
    }

    fn item_at(&self, index: usize) -> Option<SelectedItem> {
        match self.ui.current_tab {
            Tab::Dashboard => None,
            Tab::Notes => self.notes.get(index).cloned().map(SelectedItem::Note),
            Tab::Conversations => self.conversations.get(index).cloned().map(SelectedItem::Conversation),
            Tab::Tasks => self.tasks.get(index).cloned().map(SelectedItem::Task),
            Tab::Links => self.links.get(index).cloned().map(SelectedItem::Link),
        }
    }

    /// Load the row under the cursor and the notes attached to it
    pub fn select_current_item(&mut self) -> Result<(), DatabaseError> {
        self.ui.selected_item = self.item_at(self.ui.selected_index);
        self.ui.item_view_scroll = 0;
        self.ui.related_notes = match self.ui.selected_item {
            Some(ref item) => self.database.notes_for(item.as_related())?,
            None => Vec::new(),
        };
        Ok(())
    }

    pub fn adjust_selected_index(&mut self) {
        let len = self.current_len();
        if len == 0 {
            self.ui.selected_index = 0;
            self.ui.list_state.select(None);
        } else {
            self.ui.selected_index = self.ui.selected_index.min(len - 1);
            self.ui.list_state.select(Some(self.ui.selected_index));
        }
    }

    pub fn move_selection_up(&mut self) -> Result<(), DatabaseError> {
        if self.ui.selected_index > 0 {
            self.ui.selected_index -= 1;
            self.adjust_selected_index();
            self.select_current_item()?;
        }
        Ok(())
    }

    pub fn move_selection_down(&mut self) -> Result<(), DatabaseError> {
        if self.ui.selected_index + 1 < self.current_len() {
            self.ui.selected_index += 1;
            self.adjust_selected_index();
            self.select_current_item()?;
        }
        Ok(())
    }

    /// Switch to a new tab and select its first row
    pub fn switch_tab(&mut self, new_tab: Tab) -> Result<(), DatabaseError> {
        self.ui.current_tab = new_tab;
        self.ui.selected_index = 0;
        self.adjust_selected_index();
        self.select_current_item()
    }

    pub fn next_tab(&mut self) -> Result<(), DatabaseError> {
        self.switch_tab(self.ui.current_tab.offset(1))
    }

    pub fn previous_tab(&mut self) -> Result<(), DatabaseError> {
        self.switch_tab(self.ui.current_tab.offset(-1))
    }

    /// Cycle the Tasks filter: all -> pending -> done -> all
    pub fn cycle_task_filter(&mut self) -> Result<(), DatabaseError> {
        self.task_filter = match self.task_filter {
            None => Some(TaskStatus::Pending),
            Some(TaskStatus::Pending) => Some(TaskStatus::Done),
            Some(TaskStatus::Done) => None,
        };
        self.ui.selected_index = 0;
        self.load_data()
    }

    pub fn get_filter_summary(&self) -> String {
        match self.ui.current_tab {
            Tab::Tasks => match self.task_filter {
                None => "Status: All".to_string(),
                Some(status) => format!("Status: {}", status),
            },
            Tab::Dashboard => format!(
                "Stale after {} days • {} latest notes",
                self.config.stale_contact_days, self.config.recent_notes_limit
            ),
            _ => format!("{} rows", self.current_len()),
        }
    }

    /// Mark the selected task done and reload
    pub fn mark_selected_task_done(&mut self) {
        let task = match self.ui.selected_item {
            Some(SelectedItem::Task(ref task)) => task.clone(),
            _ => return,
        };
        let Some(id) = task.id else {
            self.set_status_message("Task has no ID".to_string());
            return;
        };
        if task.is_done() {
            self.set_status_message("Task is already done".to_string());
            return;
        }

        match self.database.mark_task_done(id) {
            Ok(()) => match self.load_data() {
                Ok(()) => self.set_status_message(format!("Done: {}", task.title)),
                Err(e) => self.report_failure("reload data", &e),
            },
            Err(e) => self.report_failure("mark task done", &e),
        }
    }

    /// URL of the selected link, if the Links tab has one selected
    pub fn selected_link_url(&self) -> Option<&str> {
        match self.ui.selected_item {
            Some(SelectedItem::Link(ref link)) => Some(link.url.as_str()),
            _ => None,
        }
    }

    pub fn copy_selected_link_url(&mut self) {
        let Some(url) = self.selected_link_url().map(str::to_string) else {
            return;
        };
        let copied = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(url.clone()));
        match copied {
            Ok(()) => self.set_status_message(format!("Copied {}", url)),
            Err(e) => {
                tracing::warn!(error = %e, "clipboard unavailable");
                self.set_status_message("Clipboard unavailable".to_string());
            }
        }
    }

    pub fn reload(&mut self) {
        match self.load_data() {
            Ok(()) => self.set_status_message("Reloaded".to_string()),
            Err(e) => self.report_failure("reload data", &e),
        }
    }

    /// Show a short failure notice; details go to the log
    pub fn report_failure(&mut self, action: &str, error: &DatabaseError) {
        tracing::warn!(%error, action, "operation failed");
        self.set_status_message(format!("Failed to {}: {}", action, error));
    }

    pub fn toggle_help(&mut self) {
        self.ui.mode = match self.ui.mode {
            Mode::Help => Mode::View,
            Mode::View => Mode::Help,
        };
    }

    pub fn scroll_item_view(&mut self, delta: isize) {
        self.ui.item_view_scroll = self.ui.item_view_scroll.saturating_add_signed(delta);
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status.message = Some(message);
        self.status.message_time = Some(Instant::now());
    }

    pub fn clear_status_message(&mut self) {
        self.status.message = None;
        self.status.message_time = None;
    }

    /// Check if status message should be auto-cleared (after 3 seconds)
    pub fn check_status_message_timeout(&mut self) {
        const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 3;
        if let Some(time) = self.status.message_time {
            if time.elapsed().as_secs() >= STATUS_MESSAGE_TIMEOUT_SECS {
                self.clear_status_message();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use tempfile::TempDir;

    fn test_app() -> (App, TempDir) {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("app.db")).unwrap();
        db.create_task("Write report", None, Priority::High, None).unwrap();
        let task_id = db.create_task("Clean desk", None, Priority::Low, None).unwrap();
        db.create_note("desk is a mess", None, RelatedEntity::Task(task_id)).unwrap();
        db.create_link("Docs", "https://docs.rs", None, None).unwrap();
        let app = App::new(Config::default(), db).unwrap();
        (app, dir)
    }

    #[test]
    fn tabs_wrap_around() {
        assert_eq!(Tab::Dashboard.offset(-1), Tab::Links);
        assert_eq!(Tab::Links.offset(1), Tab::Dashboard);
        assert_eq!(Tab::Tasks.index(), 3);
    }

    #[test]
    fn starts_on_dashboard_with_nothing_selected() {
        let (app, _dir) = test_app();
        assert_eq!(app.ui.current_tab, Tab::Dashboard);
        assert!(app.ui.selected_item.is_none());
        let dashboard = app.dashboard.as_ref().unwrap();
        assert_eq!(dashboard.pending_tasks.len(), 2);
    }

    #[test]
    fn selecting_a_task_loads_its_notes() {
        let (mut app, _dir) = test_app();
        app.switch_tab(Tab::Tasks).unwrap();
        app.move_selection_down().unwrap();

        match app.ui.selected_item {
            Some(SelectedItem::Task(ref task)) => assert_eq!(task.title, "Clean desk"),
            ref other => panic!("unexpected selection {:?}", other),
        }
        assert_eq!(app.ui.related_notes.len(), 1);
        assert_eq!(app.ui.related_notes[0].content, "desk is a mess");
    }

    #[test]
    fn mark_done_then_filter_pending() {
        let (mut app, _dir) = test_app();
        app.switch_tab(Tab::Tasks).unwrap();
        app.mark_selected_task_done();
        assert!(app.tasks.iter().any(|t| t.title == "Write report" && t.is_done()));

        app.cycle_task_filter().unwrap();
        assert_eq!(app.task_filter, Some(TaskStatus::Pending));
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.get_filter_summary(), "Status: Pending");
    }

    #[test]
    fn link_url_only_on_links_tab() {
        let (mut app, _dir) = test_app();
        assert_eq!(app.selected_link_url(), None);
        app.switch_tab(Tab::Links).unwrap();
        assert_eq!(app.selected_link_url(), Some("https://docs.rs"));
    }
}
