//! Command-line arguments for the ticker client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;
use ticker_common::ClientCommand;
use ticker_common::net::COMMAND_PORT;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Server IP address (IPv4 or IPv6) where the ticker server is running.
    #[clap(long, default_value = "127.0.0.1")]
    pub server_ip: String,

    /// Server TCP port.
    #[clap(long, default_value_t = COMMAND_PORT)]
    pub port: u16,

    /// Command to send to the server.
    #[clap(value_enum)]
    pub command: ClientCommand,

    /// Keep printing market events after the reply until Ctrl+C.
    #[clap(long)]
    pub watch: bool,
}
