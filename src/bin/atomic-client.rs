use std::path::Path;

use anyhow::{Context, Result};
use atomic_client::config::proc_loader;
use atomic_client::identity::SigningKeyPair;
use atomic_client::model::CardQuery;
use atomic_client::observability::metrics;
use atomic_client::utils::logging::{self, LogLevel};
use atomic_client::{AtomicClient, Role};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "ATOMIC_CONFIG", default_value = "atomic-client.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the sites of the organization
    Sites,
    /// List cards of the configured site
    Cards {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        user_id: Option<String>,
        #[arg(long)]
        event_name: Option<String>,
        #[arg(long)]
        lifecycle_id: Option<String>,
        #[arg(long)]
        template_id: Option<i64>,
    },
    /// List webhook subscriptions
    Webhooks,
    /// Public key used to sign webhook payloads
    WebhookKey,
    /// Exchange the credentials of a role for a bearer token
    Token { role: Role },
    /// Sign a client SDK identity token for a user
    Jwt { subject: String },
    /// Print the Prometheus metrics registry
    Metrics,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config
    // -------------------------------

    let args = Args::parse();
    let service_config = proc_loader::file_to_config(Path::new(&args.config))
        .await
        .with_context(|| format!("loading config '{}'", args.config))?;

    let log_config = logging::resolve(service_config.settings.logging.as_ref(), args.log_level);
    logging::init_logging(&log_config);
    info!(config = %args.config, site = %service_config.site_id, "config loaded");

    // -------------------------------
    // 2. Build client
    // -------------------------------

    let client = AtomicClient::new(service_config.client_config()?)?;

    // -------------------------------
    // 3. Run command
    // -------------------------------

    let output: Value = match args.command {
        Command::Sites => client.list_sites().await?,
        Command::Cards {
            status,
            user_id,
            event_name,
            lifecycle_id,
            template_id,
        } => {
            let mut query = CardQuery::new();
            if let Some(status) = status {
                query = query.status(status);
            }
            if let Some(user_id) = user_id {
                query = query.user_id(user_id);
            }
            if let Some(event_name) = event_name {
                query = query.event_name(event_name);
            }
            if let Some(lifecycle_id) = lifecycle_id {
                query = query.lifecycle_id(lifecycle_id);
            }
            if let Some(template_id) = template_id {
                query = query.card_template_id(template_id);
            }
            client.list_cards(&query).await?
        }
        Command::Webhooks => client.list_webhooks().await?,
        Command::WebhookKey => client.get_webhook_key().await?,
        Command::Token { role } => {
            let token = client.access_token(role).await?;
            json!({ "role": role.as_str(), "access_token": token.secret() })
        }
        Command::Jwt { subject } => {
            let identity = service_config
                .identity
                .as_ref()
                .context("config has no identity section")?;
            let keys = SigningKeyPair::load(&identity.private_key_path, &identity.public_key_path).await?;
            let token = client.identity_token(&subject, &identity.api_key, &identity.issuer, &keys)?;
            json!({ "token": token.as_str(), "claims": token.claims() })
        }
        Command::Metrics => {
            print!("{}", metrics::gather_text());
            return Ok(());
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
