use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use statekit::forms::{FieldValidator, ValidationError, validate_fields};
use statekit::storage::{FileStorageError, JsonFileStorage};
use statekit::config::DEFAULT_SESSION_PATH;
use statekit::{AuthSession, Observable};

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("session storage failed: {0}")]
    Storage(#[from] FileStorageError),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<Vec<ValidationError>> for CliError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Invalid(errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))
    }
}

#[derive(Parser, Debug)]
#[command(name = "sessionctl", about = "Inspect and change the persisted auth session")]
struct Cli {
    /// Session file.
    #[arg(long, env = "STATEKIT_SESSION_PATH", default_value = DEFAULT_SESSION_PATH)]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the restored session as JSON.
    Status,
    /// Persist a user and token.
    SignIn {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, env = "STATEKIT_TOKEN", hide_env_values = true)]
        token: String,
    },
    /// Clear both session slots.
    SignOut,
}

/// User record stored by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CliUser {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

type CliSession = AuthSession<JsonFileStorage<CliUser, String>>;

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let output = run(cli.store, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run(path: PathBuf, command: Command) -> Result<Value, CliError> {
    let session: CliSession = AuthSession::new(JsonFileStorage::new(path));
    session.initialize().await?;
    session.subscribe(Arc::new(|| tracing::debug!("session changed")));

    match command {
        Command::Status => {}
        Command::SignIn { name, email, token } => {
            let user = build_user(&name, email.as_deref(), &token)?;
            session.sign_in(user, token.trim().to_owned()).await?;
            tracing::info!("signed in");
        }
        Command::SignOut => {
            session.sign_out().await?;
            tracing::info!("signed out");
        }
    }

    Ok(describe(&session))
}

fn build_user(name: &str, email: Option<&str>, token: &str) -> Result<CliUser, CliError> {
    let name_rule = FieldValidator::new("Name").required().max_length(64);
    let email_rule = FieldValidator::new("Email").email();
    let token_rule = FieldValidator::new("Token").required();
    validate_fields(&[(&name_rule, name), (&email_rule, email.unwrap_or_default()), (&token_rule, token)])?;

    let email = email.map(str::trim).filter(|e| !e.is_empty()).map(str::to_owned);
    Ok(CliUser { name: name.trim().to_owned(), email })
}

fn describe(session: &CliSession) -> Value {
    let snapshot = session.snapshot();
    json!({
        "signed_in": snapshot.is_signed_in(),
        "user": snapshot.user,
        "token": snapshot.token.as_deref().map(mask_token),
    })
}

/// Keep the first four characters of a token, mask the rest.
fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(4).collect();
    if token.chars().count() <= 4 { "*".repeat(visible.chars().count()) } else { format!("{visible}…") }
}
