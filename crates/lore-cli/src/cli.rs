use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "lore")]
#[command(about = "Share geotagged photo stories, even while offline")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional directory for the offline story ledger
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Post a new story; queued locally when the service is unreachable
    #[command(alias = "post")]
    Add {
        /// Path to the photo to attach
        photo: PathBuf,
        /// Story text
        #[arg(short, long)]
        description: String,
        /// Latitude of the story location
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Longitude of the story location
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
        /// Post without an account (no offline queueing)
        #[arg(long)]
        guest: bool,
    },
    /// List stories from the remote service
    List {
        /// Page number to fetch
        #[arg(short, long)]
        page: Option<u32>,
        /// Number of stories per page
        #[arg(short, long)]
        size: Option<u32>,
        /// Only stories that carry coordinates
        #[arg(long)]
        location: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one remote story
    Show {
        /// Server-assigned story id
        id: String,
    },
    /// List locally queued story drafts
    Pending {
        /// Include drafts that already synced
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Push pending offline stories to the service
    Sync,
    /// Authenticate with the story service
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Create a new account
    Register {
        /// Display name
        #[arg(long)]
        name: String,
        /// Account email
        #[arg(long, value_name = "EMAIL")]
        email: String,
        /// Account password
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Login and store the session in the keychain
    Login {
        /// Account email
        #[arg(long, value_name = "EMAIL")]
        email: String,
        /// Account password
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Show auth status
    Status,
    /// Logout and clear the stored session
    Logout,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
