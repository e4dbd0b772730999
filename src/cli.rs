use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::Config;
use crate::database::{Dashboard, Database, DatabaseError};
use crate::models::{AssociationChoice, AssociationKind, Conversation, Link, Note, Person, Priority, Task, TaskStatus};
use crate::utils::{self, parse_date, truncate};

#[derive(Parser)]
#[command(name = "daybook")]
#[command(about = "Tasks, daily notes, 1:1s and links - a personal dashboard")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Pending tasks, latest notes and stale 1:1 contacts
    Dashboard,
    /// Create, list and update tasks
    #[command(subcommand)]
    Task(TaskCommand),
    /// Daily notes
    #[command(subcommand)]
    Note(NoteCommand),
    /// Conversations and 1:1 logs
    #[command(subcommand, visible_alias = "1on1")]
    Conversation(ConversationCommand),
    /// Saved links
    #[command(subcommand)]
    Link(LinkCommand),
}

#[derive(Subcommand)]
pub enum TaskCommand {
    /// Add a pending task
    Add {
        /// Task title
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// high, medium or low
        #[arg(short, long, default_value = "medium")]
        priority: Priority,
        /// Deadline (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        deadline: Option<NaiveDate>,
    },
    /// List tasks, deadlines first
    List {
        /// pending or done
        #[arg(short, long)]
        status: Option<TaskStatus>,
    },
    /// Show a task with its notes
    Show { id: i64 },
    /// Mark a task as done
    Done { id: i64 },
    /// Change fields of a task
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        status: Option<TaskStatus>,
        /// New deadline (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg, conflicts_with = "clear_deadline")]
        deadline: Option<NaiveDate>,
        /// Remove the deadline
        #[arg(long)]
        clear_deadline: bool,
    },
}

#[derive(Subcommand)]
pub enum NoteCommand {
    /// Write a note for today
    Add {
        content: String,
        #[arg(short, long)]
        tag: Option<String>,
        /// Attach to a task, conversation or link
        #[arg(long)]
        attach: Option<AssociationKind>,
        /// ID of the row to attach to (see `note targets`)
        #[arg(long, requires = "attach")]
        target: Option<i64>,
    },
    /// Note history, newest first
    List {
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Rows a note can be attached to
    Targets { kind: AssociationKind },
}

#[derive(Subcommand)]
pub enum ConversationCommand {
    /// Log a conversation with someone
    Add {
        /// Person's name (matched exactly)
        name: String,
        /// Summary of the conversation
        content: String,
        /// Conversation date (YYYY-MM-DD), defaults to today
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
    },
    /// Conversation history, newest first
    List,
    /// Everyone with a logged conversation
    People,
}

#[derive(Subcommand)]
pub enum LinkCommand {
    /// Save a link
    Add {
        title: String,
        url: String,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Saved links, newest first
    List,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),
    #[error("Failed to serialize output: {0}")]
    OutputError(#[from] serde_json::Error),
    #[error("Nothing to update: pass at least one field to change")]
    NothingToUpdate,
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).map_err(|e| format!("invalid date '{}' (expected YYYY-MM-DD): {}", value, e))
}

/// Print `value` as JSON, or run `plain` for the human format
fn emit<T: Serialize>(json: bool, value: &T, plain: impl FnOnce(&T)) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        plain(value);
    }
    Ok(())
}

#[derive(Serialize)]
struct Created {
    id: i64,
}

fn format_task(task: &Task) -> String {
    let marker = if task.is_done() { "✓" } else { "○" };
    let deadline = task
        .deadline
        .map(|d| d.to_string())
        .unwrap_or_else(|| "no deadline".to_string());
    format!(
        "{:>4}  {} {:<6} {:<11} {}",
        task.id.unwrap_or_default(),
        marker,
        task.priority.to_string(),
        deadline,
        task.title
    )
}

fn format_note(note: &Note) -> String {
    let tag = note.tag.as_deref().map(|t| format!(" [{}]", t)).unwrap_or_default();
    format!(
        "{:>4}  {}{}  ({})\n      {}",
        note.id.unwrap_or_default(),
        note.date_label(),
        tag,
        note.related,
        truncate(&note.content.replace('\n', " "), 100)
    )
}

fn format_person(person: &Person) -> String {
    let last = person
        .last_interaction
        .map(|d| d.to_string())
        .unwrap_or_else(|| "never".to_string());
    format!("{:>4}  {:<24} last 1:1: {}", person.id, person.name, last)
}

fn format_conversation(conversation: &Conversation) -> String {
    format!(
        "{:>4}  {}  {}\n      {}",
        conversation.id,
        conversation.conv_date,
        conversation.person_name,
        truncate(&conversation.content.replace('\n', " "), 100)
    )
}

fn format_link(link: &Link) -> String {
    let category = link.category.as_deref().map(|c| format!(" [{}]", c)).unwrap_or_default();
    format!(
        "{:>4}  {}  {}{}\n      {}",
        link.id.unwrap_or_default(),
        link.saved_at,
        link.title,
        category,
        link.url
    )
}

fn print_lines<T>(items: &[T], empty: &str, format: fn(&T) -> String) {
    if items.is_empty() {
        println!("{}", empty);
    }
    for item in items {
        println!("{}", format(item));
    }
}

/// Handle the dashboard command
pub fn handle_dashboard(db: &Database, config: &Config, json: bool) -> Result<(), CliError> {
    let dashboard = Dashboard::load(db, utils::today(), config.dashboard_settings())?;
    emit(json, &dashboard, |d| {
        println!("Daily overview for {}", d.today);
        println!("\nPriority tasks");
        print_lines(&d.pending_tasks, "  nothing pending", format_task);
        println!("\nLatest notes");
        print_lines(&d.recent_notes, "  no notes yet", format_note);
        println!("\nNo 1:1 for {}+ days", config.stale_contact_days);
        print_lines(&d.stale_people, "  everyone is up to date", format_person);
    })
}

/// Handle the task subcommands
pub fn handle_task(command: TaskCommand, db: &Database, json: bool) -> Result<(), CliError> {
    match command {
        TaskCommand::Add { title, description, priority, deadline } => {
            let id = db.create_task(&title, description.as_deref(), priority, deadline)?;
            emit(json, &Created { id }, |c| println!("Task created successfully (ID: {})", c.id))
        }
        TaskCommand::List { status } => {
            let tasks = db.list_tasks(status)?;
            emit(json, &tasks, |t| print_lines(t, "No tasks", format_task))
        }
        TaskCommand::Show { id } => {
            #[derive(Serialize)]
            struct TaskWithNotes {
                task: Task,
                notes: Vec<Note>,
            }
            let shown = TaskWithNotes {
                task: db.get_task(id)?,
                notes: db.task_notes(id)?,
            };
            emit(json, &shown, |s| {
                println!("{}", format_task(&s.task));
                println!("      status: {}", s.task.status);
                println!("      created: {}", s.task.created_at);
                if let Some(ref description) = s.task.description {
                    println!("      {}", description);
                }
                println!("\nNotes");
                print_lines(&s.notes, "  none", format_note);
            })
        }
        TaskCommand::Done { id } => {
            db.mark_task_done(id)?;
            emit(json, &Created { id }, |c| println!("Task {} marked done", c.id))
        }
        TaskCommand::Edit {
            id,
            title,
            description,
            priority,
            status,
            deadline,
            clear_deadline,
        } => {
            if title.is_none()
                && description.is_none()
                && priority.is_none()
                && status.is_none()
                && deadline.is_none()
                && !clear_deadline
            {
                return Err(CliError::NothingToUpdate);
            }

            let mut task = db.get_task(id)?;
            if let Some(title) = title {
                task.title = title;
            }
            if let Some(description) = description {
                task.description = Some(description);
            }
            if let Some(priority) = priority {
                task.priority = priority;
            }
            if let Some(status) = status {
                task.status = status;
            }
            if clear_deadline {
                task.deadline = None;
            } else if deadline.is_some() {
                task.deadline = deadline;
            }

            db.update_task(&task)?;
            emit(json, &task, |t| println!("Task updated\n{}", format_task(t)))
        }
    }
}

/// Handle the note subcommands
pub fn handle_note(command: NoteCommand, db: &Database, json: bool) -> Result<(), CliError> {
    match command {
        NoteCommand::Add { content, tag, attach, target } => {
            let related = AssociationChoice { kind: attach, target }.resolve()?;
            let id = db.create_note(&content, tag.as_deref(), related)?;
            emit(json, &Created { id }, |c| println!("Note saved (ID: {})", c.id))
        }
        NoteCommand::List { limit } => {
            let notes = match limit {
                Some(limit) => db.recent_notes(limit)?,
                None => db.list_notes()?,
            };
            emit(json, &notes, |n| print_lines(n, "No notes", format_note))
        }
        NoteCommand::Targets { kind } => {
            let targets = db.association_targets(kind)?;
            emit(json, &targets, |targets| {
                if targets.is_empty() {
                    println!("No {} to attach to", kind.to_string().to_lowercase());
                }
                for target in targets {
                    println!("{:>4}  {}", target.id, target.label);
                }
            })
        }
    }
}

/// Handle the conversation subcommands
pub fn handle_conversation(command: ConversationCommand, db: &Database, json: bool) -> Result<(), CliError> {
    match command {
        ConversationCommand::Add { name, content, date } => {
            let date = date.unwrap_or_else(utils::today);
            let recorded = db.record_conversation(&name, date, &content)?;
            emit(json, &recorded, |r| {
                if r.person_created {
                    println!("Added {} to your people", name.trim());
                }
                println!("Conversation saved (ID: {})", r.conversation_id);
            })
        }
        ConversationCommand::List => {
            let conversations = db.list_conversations()?;
            emit(json, &conversations, |c| print_lines(c, "No conversations", format_conversation))
        }
        ConversationCommand::People => {
            let people = db.list_people()?;
            emit(json, &people, |p| print_lines(p, "No people", format_person))
        }
    }
}

/// Handle the link subcommands
pub fn handle_link(command: LinkCommand, db: &Database, json: bool) -> Result<(), CliError> {
    match command {
        LinkCommand::Add { title, url, category, comment } => {
            let id = db.create_link(&title, &url, category.as_deref(), comment.as_deref())?;
            emit(json, &Created { id }, |c| println!("Link saved (ID: {})", c.id))
        }
        LinkCommand::List => {
            let links = db.list_links()?;
            emit(json, &links, |l| print_lines(l, "No links", format_link))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_task_add_with_priority_and_deadline() {
        let cli = Cli::try_parse_from([
            "daybook", "task", "add", "Write report", "--priority", "high", "--deadline", "2024-01-10",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Task(TaskCommand::Add { title, priority, deadline, .. })) => {
                assert_eq!(title, "Write report");
                assert_eq!(priority, Priority::High);
                assert_eq!(deadline, NaiveDate::from_ymd_opt(2024, 1, 10));
            }
            _ => panic!("expected task add"),
        }
    }

    #[test]
    fn rejects_bad_deadline() {
        assert!(Cli::try_parse_from(["daybook", "task", "add", "x", "--deadline", "tomorrow"]).is_err());
    }

    #[test]
    fn target_requires_attach() {
        assert!(Cli::try_parse_from(["daybook", "note", "add", "text", "--target", "3"]).is_err());
        assert!(Cli::try_parse_from(["daybook", "note", "add", "text", "--attach", "task", "--target", "3"]).is_ok());
    }
}
