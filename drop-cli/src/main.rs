//! # drop
//!
//! Send and receive files through a relaydrop relay.
//!
//! ## Commands
//!
//! - `send`: Offer a file and print the secret for the receiver
//! - `receive`: Fetch the file offered under a secret
//!
//! ## Example
//!
//! ```bash
//! # On the sending machine
//! drop send relay.example.com:8080 ./holiday.jpg
//! fast-blue-began
//!
//! # On the receiving machine
//! drop receive relay.example.com:8080 fast-blue-began ~/Downloads
//!
//! # Against a relay serving plain HTTP
//! drop send http://127.0.0.1:8080 ./notes.txt
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use drop_client::RelayClient;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{receive, send};

/// Send and receive files through a relaydrop relay.
#[derive(Parser, Debug)]
#[command(name = "drop")]
#[command(version, about, long_about = None)]
#[command(after_help = "A bare relay address is reached over HTTPS. A drop-relay started without \
--tls-cert/--tls-key serves plain HTTP and needs an explicit http:// address.")]
struct Cli {
    /// Skip TLS certificate verification (for relays with self-signed certificates)
    #[arg(long, global = true)]
    insecure: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Offer a file; prints the secret and waits until it has been received
    Send {
        /// Relay address (host:port for HTTPS, or a full http:// or https:// URL)
        relay: String,

        /// File to send
        file: PathBuf,
    },

    /// Receive the file offered under a secret
    Receive {
        /// Relay address (host:port for HTTPS, or a full http:// or https:// URL)
        relay: String,

        /// Secret printed by the sender
        secret: String,

        /// Directory to save the file in (created if missing)
        dest_dir: PathBuf,

        /// Overwrite an existing file with the same name
        #[arg(long, short)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Send { relay, file } => {
            let client = RelayClient::new(&relay, cli.insecure)?;
            send::run(&client, &file).await?;
        }
        Commands::Receive {
            relay,
            secret,
            dest_dir,
            force,
        } => {
            let client = RelayClient::new(&relay, cli.insecure)?;
            receive::run(&client, &secret, &dest_dir, force).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn help_explains_plain_http_relays() {
        let help = Cli::command().render_help().to_string();
        assert!(help.contains("reached over HTTPS"));
        assert!(help.contains("explicit http:// address"));
    }
}
