mod file_store;
mod sender;
mod session;

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use compose::{ComposeConfig, Composer, DraftKey, SendError, SendOutcome, StorageError};

use crate::file_store::FileStore;
use crate::sender::GraphqlSender;
use crate::session::Session;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("draft storage failed: {0}")]
    Storage(#[from] StorageError),
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("message send failed: {0}")]
    Send(#[from] SendError),
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("timestamp formatting failed: {0}")]
    Time(#[from] time::error::Format),
    #[error("nothing to send; pass --text or save a draft first")]
    EmptyMessage,
}

#[derive(Parser, Debug)]
#[command(name = "chatpost", about = "Compose and send chat messages with local drafts")]
struct Cli {
    #[arg(long, env = "CHATPOST_ENDPOINT", default_value = "http://127.0.0.1:4000/graphql")]
    endpoint: String,

    #[arg(long, env = "CHATPOST_STORE", default_value = ".chatpost-drafts.json")]
    store: PathBuf,

    #[arg(long, env = "CHATPOST_USER")]
    user: String,

    #[arg(long, env = "CHATPOST_CHANNEL")]
    channel: String,

    #[arg(long, default_value_t = 500)]
    debounce_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send a message, or the saved draft when no text is given.
    Send {
        #[arg(long)]
        text: Option<String>,
    },
    Draft(DraftCommand),
    /// Interactive compose loop reading lines from stdin.
    Compose,
}

#[derive(Args, Debug)]
struct DraftCommand {
    #[command(subcommand)]
    command: DraftSubcommand,
}

#[derive(Subcommand, Debug)]
enum DraftSubcommand {
    Show,
    Set {
        #[arg(long)]
        text: String,
    },
    Clear,
}

impl Cli {
    fn compose_config(&self) -> ComposeConfig {
        ComposeConfig {
            debounce: Duration::from_millis(self.debounce_ms),
            ..ComposeConfig::default()
        }
    }

    fn draft_key(&self) -> DraftKey {
        DraftKey::new(&self.user, &self.channel)
    }

    fn composer(&self) -> Result<Composer<FileStore>, CliError> {
        let store = FileStore::open(&self.store)?;
        tracing::debug!(path = %store.path().display(), "opened draft store");
        Ok(Composer::new(store, &self.compose_config(), self.draft_key()))
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Command::Send { text } => run_send(&cli, text.clone()).await,
        Command::Draft(draft) => run_draft(&cli, &draft.command),
        Command::Compose => run_compose(&cli).await,
    }
}

async fn run_send(cli: &Cli, text: Option<String>) -> Result<(), CliError> {
    let sender = GraphqlSender::new(&cli.endpoint)?;
    let mut session = Session::new(cli.composer()?, sender);
    if let Some(text) = text {
        session.edit(text);
    }

    match session.submit().await? {
        None => Err(CliError::EmptyMessage),
        Some(SendOutcome::Delivered(posted)) => {
            println!("{}", serde_json::to_string_pretty(&posted)?);
            Ok(())
        }
        Some(SendOutcome::Failed { error, pending }) => {
            // Keep the unsent text so the next run can retry it.
            session.composer_mut().flush_now();
            eprintln!("{}", serde_json::to_string_pretty(&pending)?);
            Err(error.into())
        }
    }
}

fn run_draft(cli: &Cli, command: &DraftSubcommand) -> Result<(), CliError> {
    let mut composer = cli.composer()?;
    match command {
        DraftSubcommand::Show => println!("{}", composer.stored_draft()),
        DraftSubcommand::Set { text } => {
            composer.edit(text.as_str(), 0);
            composer.flush_now();
        }
        DraftSubcommand::Clear => {
            let key = composer.key().clone();
            composer.drafts_mut().discard(&key);
        }
    }
    Ok(())
}

async fn run_compose(cli: &Cli) -> Result<(), CliError> {
    let sender = GraphqlSender::new(&cli.endpoint)?;
    let mut session = Session::new(cli.composer()?, sender);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout().lock();
    session.run_compose(stdin, &mut stdout).await?;
    stdout.flush()?;
    Ok(())
}
