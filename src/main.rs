//! Sirportly - command-line access to a Sirportly helpdesk
//!
//! Runs one API operation and prints the JSON response on stdout. Logs go
//! to stderr.
//!
//! # Configuration
//!
//! Set the following environment variables (or use a `.env` file):
//!
//! - `SIRPORTLY_TOKEN`: API token
//! - `SIRPORTLY_SECRET`: API secret
//! - `SIRPORTLY_SERVER`: Hostname of the helpdesk
//! - `SIRPORTLY_PROTOCOL`, `SIRPORTLY_PORT`, `SIRPORTLY_TIMEOUT_SECS`: optional
//!
//! `--server`, `--protocol` and `--port` override the environment.
//!
//! # Usage
//!
//! ```bash
//! sirportly ping
//! sirportly ticket AB-123456
//! sirportly tickets --page 2
//! sirportly update AB-123456 status=Resolved priority=Low
//! sirportly objects escalation_paths
//! sirportly spql "SELECT reference, subject FROM tickets"
//! ```

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::{fmt, EnvFilter};

use sirportly::{Client, ClientOptions, MacroRef, NewUser, ObjectKind, Params, Protocol};

/// Run Sirportly helpdesk API operations
#[derive(Parser)]
#[command(name = "sirportly", version, about, long_about = None)]
struct Cli {
    /// Server hostname (overrides SIRPORTLY_SERVER)
    #[arg(long, global = true)]
    server: Option<String>,

    /// http or https (overrides SIRPORTLY_PROTOCOL)
    #[arg(long, global = true)]
    protocol: Option<Protocol>,

    /// Port (overrides SIRPORTLY_PORT)
    #[arg(long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check connectivity and credentials
    Ping,

    /// Show a ticket
    Ticket {
        /// Ticket reference
        reference: String,
    },

    /// List tickets
    Tickets {
        /// Page number
        #[arg(long)]
        page: Option<u32>,
    },

    /// Submit a new ticket
    Submit {
        /// Ticket fields as key=value
        #[arg(value_parser = parse_key_value, required = true)]
        fields: Vec<(String, String)>,
    },

    /// Post an update to a ticket
    PostUpdate {
        /// Ticket reference
        reference: String,
        /// Update fields as key=value
        #[arg(value_parser = parse_key_value)]
        fields: Vec<(String, String)>,
    },

    /// Change ticket properties
    Update {
        /// Ticket reference
        reference: String,
        /// Properties as key=value
        #[arg(value_parser = parse_key_value, required = true)]
        fields: Vec<(String, String)>,
    },

    /// Run a macro against a ticket
    Macro {
        /// Ticket reference
        reference: String,
        /// Macro ID or name
        #[arg(value_name = "MACRO")]
        macro_ref: MacroRef,
    },

    /// Add a follow-up to a ticket
    FollowUp {
        /// Ticket reference
        reference: String,
        /// Follow-up fields as key=value
        #[arg(value_parser = parse_key_value)]
        fields: Vec<(String, String)>,
    },

    /// List an object collection (statuses, teams, brands, ...)
    Objects {
        /// Collection name
        kind: ObjectKind,
    },

    /// Create a user
    CreateUser {
        /// Email address
        email: String,
        /// First name
        first_name: String,
        /// Last name
        last_name: String,
        /// Extra fields as key=value
        #[arg(value_parser = parse_key_value)]
        extra: Vec<(String, String)>,
    },

    /// Run an SPQL query
    Spql {
        /// Query text
        query: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore errors if not found)
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays pipeable JSON
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sirportly=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    let mut options = ClientOptions::from_env().context("Failed to load configuration")?;
    if let Some(server) = cli.server {
        options = options.with_server(server);
    }
    if let Some(protocol) = cli.protocol {
        options = options.with_protocol(protocol);
    }
    if let Some(port) = cli.port {
        options = options.with_port(port);
    }

    let client = Client::new(options).context("Failed to create Sirportly client")?;

    tracing::debug!("Sirportly client initialized");

    let result = run(&client, cli.command).await;

    match result {
        Ok(Some(body)) => {
            let output = serde_json::to_string_pretty(&body).context("Failed to format response")?;
            println!("{}", output);
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => {
            let message = client.sanitize(&e.to_string());
            tracing::error!(error = %message, "Request failed");
            Err(anyhow!(message))
        }
    }
}

/// Runs one command. `Ok(None)` means there is nothing to print.
async fn run(client: &Client, command: Command) -> Result<Option<Value>, sirportly::SirportlyError> {
    let body = match command {
        Command::Ping => {
            client.test_connection().await?;
            eprintln!("pong");
            return Ok(None);
        }
        Command::Ticket { reference } => client.ticket(&reference).await?,
        Command::Tickets { page } => client.tickets(page).await?,
        Command::Submit { fields } => client.submit_ticket(to_params(fields)).await?,
        Command::PostUpdate { reference, fields } => {
            client.post_update(&reference, to_params(fields)).await?
        }
        Command::Update { reference, fields } => {
            client.update_ticket(&reference, to_params(fields)).await?
        }
        Command::Macro {
            reference,
            macro_ref,
        } => client.run_macro(&reference, macro_ref).await?,
        Command::FollowUp { reference, fields } => {
            client.add_follow_up(&reference, to_params(fields)).await?
        }
        Command::Objects { kind } => client.objects(kind).await?,
        Command::CreateUser {
            email,
            first_name,
            last_name,
            extra,
        } => {
            let user = NewUser {
                extra: to_params(extra),
                ..NewUser::new(email, first_name, last_name)
            };
            client.create_user(user).await?
        }
        Command::Spql { query } => client.spql(&query).await?,
    };

    Ok(Some(body))
}

/// Parses a `key=value` argument. The value may itself contain `=`.
fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {:?}", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in {:?}", s));
    }
    Ok((key.to_string(), value.to_string()))
}

fn to_params(pairs: Vec<(String, String)>) -> Params {
    pairs.into_iter().collect()
}
