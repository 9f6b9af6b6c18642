use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use servicehub_client::config::{ClientConfig, ConfigError, normalize_base_url, timeout_from_millis};
use servicehub_client::net::client::ApiClient;
use servicehub_client::net::fetch::{fetch_service_requests, fetch_services};
use servicehub_client::net::types::{ApiError, NewService};
use servicehub_client::router::guard::{Decision, NavigationGuard};
use servicehub_client::router::navigator::Navigator;
use servicehub_client::router::routes::{RouteTable, home_for};
use servicehub_client::state::session::SessionState;
use servicehub_client::state::storage::FileStorage;
use servicehub_client::util::date::format_date;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "servicehub", about = "Service marketplace API client")]
struct Cli {
    /// Overrides `SERVICEHUB_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    /// Overrides `SERVICEHUB_TIMEOUT_MS`.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Overrides `SERVICEHUB_SESSION_FILE`.
    #[arg(long)]
    session_file: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and persist the token and roles.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "SERVICEHUB_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the persisted session.
    Logout,
    /// Show the current session.
    Whoami,
    /// List services (retries with backoff, empty on failure).
    Services,
    /// Show one service.
    Service { id: i64 },
    /// List service requests (retries with backoff, empty on failure).
    Requests,
    /// Add a service (admin only).
    CreateService(CreateServiceArgs),
    /// Resolve in-app navigations in order against the route guard.
    Navigate {
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct CreateServiceArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    base_price: f64,
    /// Minutes.
    #[arg(long)]
    time_required: i64,
    #[arg(long)]
    description: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    tracing::debug!(base_url = %config.base_url, timeout = ?config.timeout, "client configured");

    let storage = Arc::new(FileStorage::new(&config.session_file));
    let session = Arc::new(SessionState::load(storage));
    let client = ApiClient::new(&config, session.clone())?;

    match cli.command {
        Command::Login { email, password } => {
            let response = client.login(&email, &password).await?;
            print_json(&json!({
                "message": response.message,
                "roles": session.roles(),
                "home": home_for(&session.snapshot()),
            }))
        }
        Command::Logout => {
            client.logout();
            print_json(&json!({ "message": "Logged out" }))
        }
        Command::Whoami => {
            let snapshot = session.snapshot();
            print_json(&json!({
                "authenticated": snapshot.is_authenticated(),
                "roles": snapshot.effective_roles(),
                "home": home_for(&snapshot),
            }))
        }
        Command::Services => print_json(&fetch_services(&client).await),
        Command::Service { id } => print_json(&client.fetch_service(id).await?),
        Command::Requests => {
            let requests = fetch_service_requests(&client).await;
            let rows: Vec<_> = requests
                .iter()
                .map(|r| {
                    json!({
                        "request": r,
                        "requested_on": r.date_of_request.as_deref().and_then(format_date),
                    })
                })
                .collect();
            print_json(&rows)
        }
        Command::CreateService(args) => {
            let new = NewService {
                name: args.name,
                base_price: args.base_price,
                time_required: args.time_required,
                description: args.description,
            };
            print_json(&client.create_service(&new).await?)
        }
        Command::Navigate { paths } => {
            let mut navigator = Navigator::new(NavigationGuard::new(RouteTable::standard()), session);
            for path in paths {
                let outcome = navigator.navigate(&path);
                let reason = match outcome.decision {
                    Decision::Allow => None,
                    Decision::Redirect { reason, .. } => Some(reason.to_string()),
                };
                print_json(&json!({
                    "requested": outcome.requested,
                    "location": outcome.location,
                    "redirect_reason": reason,
                }))?;
            }
            Ok(())
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = normalize_base_url(base_url)?;
    }
    if let Some(ms) = cli.timeout_ms {
        config.timeout = timeout_from_millis(ms)?;
    }
    if let Some(path) = &cli.session_file {
        config.session_file = path.into();
    }
    Ok(config)
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
