//! `rolegate` command-line shell.
//!
//! Each invocation boots a [`Shell`] over a file-backed session record, so a
//! login survives between commands the way a browser tab survives a reload.

mod http;


use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use session::net::api::ResourceService;
use session::router::navigator::{HistoryNavigator, Navigator};
use session::router::routes::RouteError;
use session::state::store::{LogoutOutcome, RestoreOutcome};
use session::util::storage::FileStorage;
use session::{RouteName, Session, SessionConfig, SessionError, Shell};
use tracing::{debug, warn};

use crate::http::HttpResourceService;

const DEFAULT_STATE_FILE: &str = ".rolegate-session.json";

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "rolegate", about = "Role-gated session shell")]
struct Cli {
    #[arg(long, env = "ROLEGATE_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[arg(long, env = "ROLEGATE_STATE_FILE", default_value = DEFAULT_STATE_FILE)]
    state_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exchange credentials for a session.
    Login {
        username: String,
        #[arg(long, env = "ROLEGATE_PASSWORD")]
        password: String,
    },
    /// End the current session.
    Logout,
    /// Show the current session.
    Whoami,
    /// Fetch the user directory.
    Users,
    /// Fetch dashboard metrics.
    Metrics,
    /// Navigate to a path and report where the guard lands.
    Visit { path: String },
    /// List the route table.
    Routes,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let service: Arc<dyn ResourceService> = Arc::new(HttpResourceService::new(&cli.base_url)?);
    let storage = Arc::new(FileStorage::new(&cli.state_file));
    let navigator = Arc::new(HistoryNavigator::new());

    let (shell, restored) = Shell::start(SessionConfig::from_env(), service, storage, navigator.clone());
    match &restored {
        RestoreOutcome::Restored(profile) => debug!(username = %profile.username, "resumed session"),
        RestoreOutcome::Empty => debug!("no stored session"),
        RestoreOutcome::Discarded(err) => warn!(error = %err, "stored session was unusable"),
        RestoreOutcome::Unavailable(err) => warn!(error = %err, "stored session could not be read"),
    }

    let output = run(&shell, cli.command).await;
    if let Some(route) = navigator.current() {
        debug!(%route, "final route");
    }
    print_json(&output?)
}

async fn run(shell: &Shell, command: Command) -> Result<Value, CliError> {
    match command {
        Command::Login { username, password } => {
            let profile = shell.login(&username, &password).await?;
            Ok(json!({ "user": profile }))
        }
        Command::Logout => {
            let outcome = shell.logout();
            Ok(json!({
                "loggedOut": outcome != LogoutOutcome::AlreadyAnonymous,
                "storageCleared": outcome != LogoutOutcome::DurableRecordRetained,
            }))
        }
        Command::Whoami => Ok(describe_session(&shell.store().session())),
        Command::Users => {
            let users = shell.fetch_users().await?;
            Ok(serde_json::to_value(users)?)
        }
        Command::Metrics => {
            let data = shell.fetch_slow_data().await?;
            Ok(serde_json::to_value(data)?)
        }
        Command::Visit { path } => {
            let route = shell.visit(&path)?;
            Ok(json!({ "requested": path, "route": route.as_str(), "path": route.path() }))
        }
        Command::Routes => Ok(route_table()),
    }
}

fn describe_session(session: &Session) -> Value {
    match session.profile() {
        Some(profile) => json!({ "authenticated": true, "user": profile }),
        None => json!({ "authenticated": false }),
    }
}

fn route_table() -> Value {
    let rows = RouteName::ALL
        .into_iter()
        .map(|route| {
            let meta = route.meta();
            json!({
                "name": route.as_str(),
                "path": route.path(),
                "requiresAuth": meta.requires_auth,
                "requiresAdmin": meta.requires_admin,
                "requiresGuestOnly": meta.requires_guest_only,
            })
        })
        .collect();
    Value::Array(rows)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
