use clap::Parser;
use color_eyre::Result;
use daybook::cli::{self, Cli, Commands};
use daybook::{Config, Database, Profile, logging, tui};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let config = match cli.config {
        Some(ref path) => Config::load_from_path(path, profile)?,
        None => Config::load_with_profile(profile)?,
    };

    let db_path = config.get_database_path();
    // Profile data dir, else the directory holding the database
    let log_dir = daybook::utils::get_data_dir(profile)
        .or_else(|| db_path.parent().map(|p| p.to_path_buf()));
    if let Some(ref dir) = log_dir {
        logging::init(dir, &config.log_level);
    }
    tracing::info!(database = %db_path.display(), ?profile, "starting");

    let db = Database::new(&db_path)?.with_busy_timeout(config.busy_timeout());

    let json = cli.json;
    match cli.command {
        None | Some(Commands::Tui) => {
            let app = tui::App::new(config, db)?;
            tui::run_event_loop(app)?;
        }
        Some(Commands::Dashboard) => cli::handle_dashboard(&db, &config, json)?,
        Some(Commands::Task(command)) => cli::handle_task(command, &db, json)?,
        Some(Commands::Note(command)) => cli::handle_note(command, &db, json)?,
        Some(Commands::Conversation(command)) => cli::handle_conversation(command, &db, json)?,
        Some(Commands::Link(command)) => cli::handle_link(command, &db, json)?,
    }

    Ok(())
}
