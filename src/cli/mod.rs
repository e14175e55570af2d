//! CLI module for Folio
//!
//! Provides command-line interface parsing for the folio-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Folio - portfolio content server
///
/// Serves the portfolio sections over a REST API and backs the admin panel
/// that edits them.
#[derive(Parser, Debug)]
#[command(
    name = "folio-server",
    author = "Folio Maintainers <dev@folio-cms.dev>",
    version,
    about = "Folio - portfolio content server with an admin API",
    long_about = "Serves a personal portfolio (profile, skills, projects, education,\n\
                  experience, learning journey and more) over a REST API, with JWT-protected\n\
                  admin endpoints for editing it.\n\n\
                  Run without arguments to start the server, or use 'init' to scaffold a new site.",
    after_help = "EXAMPLES:\n    \
                  folio-server init                 # Scaffold folio.toml and .env.example\n    \
                  folio-server                      # Start the server (requires folio.toml)\n    \
                  folio-server seed --dry-run       # Print the sample content\n    \
                  folio-server create-admin editor  # Add an admin account\n    \
                  folio-server --config site.toml   # Use a custom config file"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "folio.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the server (the default)
    Serve,

    /// Scaffold folio.toml, .env.example and the data directories
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,

        /// Host address for the server
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port for the server
        #[arg(long, default_value = "8001")]
        port: u16,
    },

    /// Load the sample portfolio into an empty database
    Seed {
        /// Print the sample content as JSON instead of writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Create an additional admin account
    CreateAdmin {
        /// Login name
        username: String,

        /// Display name (defaults to the username)
        #[arg(long)]
        name: Option<String>,

        /// Password; read from the environment when not given
        #[arg(long, env = "FOLIO_NEW_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Show configuration information
    Config {
        /// Show the full configuration
        #[arg(short = 'f', long)]
        full: bool,

        /// Validate the configuration file
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
