use clap::{Parser, Subcommand};
use docchat::commands::{self, Action, Outcome};
use docchat::{ChatClient, ClientConfig, ClientError, ClientResult, ExportFile, HttpBackend};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;

mod render;
mod repl;

#[derive(Parser)]
#[command(name = "docchat", version)]
#[command(about = "Chat with your documents from the terminal", long_about = None)]
struct Cli {
    /// Backend base URL (overrides config and DOCCHAT_SERVER_URL)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Config file (default: $CONFIG_DIR/docchat/config.toml)
    #[arg(long, global = true, env = "DOCCHAT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat; type /help inside for commands
    Chat {
        /// Open this session instead of starting fresh
        #[arg(long)]
        session: Option<String>,
    },
    /// List active and archived sessions
    Sessions,
    /// Print a session's transcript
    History { id: String },
    /// Save a transcript as chat_<id>.txt
    Export {
        id: String,
        /// Target directory (default: export_dir from config)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Rename a session
    Rename { id: String, name: String },
    /// Delete a session
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Move a session to the archive
    Archive { id: String },
    /// Restore an archived session
    Unarchive { id: String },
    /// List uploaded files
    Files,
    /// Upload up to 10 documents (500 MB total)
    Upload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Manage file groups
    Groups {
        #[command(subcommand)]
        action: GroupsAction,
    },
}

#[derive(Subcommand)]
enum GroupsAction {
    /// List file groups
    List,
    /// Create a group from uploaded files
    Create {
        name: String,
        #[arg(required = true)]
        files: Vec<String>,
    },
    /// Rename a group
    Rename { id: i64, name: String },
    /// Replace a group's files
    Edit { id: i64, files: Vec<String> },
    /// Delete a group
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("docchat: {}", e);
            return ExitCode::FAILURE;
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_filter.as_str()))
        .format_timestamp(None)
        .init();
    log::debug!("[cli] Server {}", config.server_url);

    let mut client = ChatClient::new(HttpBackend::new(config.server_url.clone()));
    match run(&mut client, &config, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            render::events(client.drain_events(), false);
            eprintln!("docchat: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> ClientResult<ClientConfig> {
    let config = ClientConfig::load(cli.config.as_deref())?;
    match &cli.server {
        Some(url) => config.with_server_url(url),
        None => Ok(config),
    }
}

async fn run(client: &mut ChatClient<HttpBackend>, config: &ClientConfig, command: Commands) -> ClientResult<()> {
    match command {
        Commands::Chat { session } => return repl::run(client, config, session).await,
        Commands::Sessions => {
            one_shot(client, Action::ListSessions).await?;
            render::sessions(client.state());
        }
        Commands::History { id } => {
            one_shot(client, Action::Select(id)).await?;
            for message in client.state().view.bubbles() {
                render::bubble(message);
            }
        }
        Commands::Export { id, out } => {
            if let Outcome::Exported(file) = one_shot(client, Action::Export(id)).await? {
                let path = save_export(out.as_deref().unwrap_or(&config.export_dir), &file)?;
                println!("{}", path.display());
            }
        }
        Commands::Rename { id, name } => {
            one_shot(client, Action::Rename { session_id: id, name }).await?;
        }
        Commands::Delete { id, yes } => {
            confirm_then(client, Action::Delete { session_id: id.clone(), confirmed: yes }, || Action::Delete {
                session_id: id,
                confirmed: true,
            })
            .await?;
        }
        Commands::Archive { id } => {
            one_shot(client, Action::Archive(id)).await?;
        }
        Commands::Unarchive { id } => {
            one_shot(client, Action::Unarchive(id)).await?;
        }
        Commands::Files => {
            one_shot(client, Action::ListFiles).await?;
            render::files(client.state());
        }
        Commands::Upload { paths } => {
            one_shot(client, Action::Upload(paths)).await?;
        }
        Commands::Groups { action } => match action {
            GroupsAction::List => {
                one_shot(client, Action::ListGroups).await?;
                render::groups(client.state());
            }
            GroupsAction::Create { name, files } => {
                one_shot(client, Action::CreateGroup { name, files }).await?;
            }
            GroupsAction::Rename { id, name } => {
                one_shot(client, Action::RenameGroup { group_id: id, name }).await?;
            }
            GroupsAction::Edit { id, files } => {
                one_shot(client, Action::EditGroup { group_id: id, files }).await?;
            }
            GroupsAction::Delete { id, yes } => {
                confirm_then(client, Action::DeleteGroup { group_id: id, confirmed: yes }, || {
                    Action::DeleteGroup { group_id: id, confirmed: true }
                })
                .await?;
            }
        },
    }
    Ok(())
}

async fn one_shot(client: &mut ChatClient<HttpBackend>, action: Action) -> ClientResult<Outcome> {
    let outcome = commands::dispatch(client, action, Instant::now()).await?;
    render::events(client.drain_events(), false);
    Ok(outcome)
}

/// Dispatch, and if the action is held for confirmation ask on stdin.
async fn confirm_then(
    client: &mut ChatClient<HttpBackend>,
    action: Action,
    confirmed: impl FnOnce() -> Action,
) -> ClientResult<()> {
    if let Outcome::NeedsConfirmation(prompt) = one_shot(client, action).await? {
        eprint!("{} [y/N] ", prompt);
        let mut answer = String::new();
        BufReader::new(tokio::io::stdin()).read_line(&mut answer).await?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            return Err(ClientError::validation("Cancelled."));
        }
        one_shot(client, confirmed()).await?;
    }
    Ok(())
}

pub(crate) fn save_export(dir: &Path, file: &ExportFile) -> ClientResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(&file.file_name);
    std::fs::write(&path, &file.contents)?;
    log::info!("[cli] Exported {}", path.display());
    Ok(path)
}
