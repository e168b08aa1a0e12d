use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use notes_core::{Config, CreateNote, FileStorage, NotesApi, NotesError, UpdateNote};
use serde::Serialize;

/// Manage notes on the configured notes service, falling back to a local
/// store when the service is unreachable.
#[derive(Debug, Parser)]
#[command(name = "notes", version)]
struct Cli {
    /// Directory holding the local fallback store.
    #[arg(long, default_value = ".notes")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List notes, most recently updated first.
    List,
    Create {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        content: String,
    },
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    Delete {
        id: String,
    },
    /// Discard the local store; it is reseeded on next use.
    Reset,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), NotesError> {
    let config = Config::from_env();
    log::debug!("remote base address: {:?}", config.api_base_url);
    let api = NotesApi::from_config(&config, FileStorage::new(cli.data_dir));

    match cli.command {
        Command::List => print_json(&api.list().await?),
        Command::Create { title, content } => {
            print_json(&api.create(CreateNote { title, content }).await?)
        }
        Command::Update { id, title, content } => {
            print_json(&api.update(&id, UpdateNote { title, content }).await?)
        }
        Command::Delete { id } => print_json(&api.delete(&id).await?),
        Command::Reset => {
            api.local().clear()?;
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), NotesError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
