pub mod cli;
pub mod config;
pub mod database;
pub mod logging;
pub mod models;
pub mod tui;
pub mod utils;

pub use config::Config;
pub use database::{Database, DatabaseError};
pub use models::{AssociationKind, Conversation, Link, Note, Person, Priority, RelatedEntity, Task, TaskStatus};
pub use utils::Profile;
