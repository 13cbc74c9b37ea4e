//! Stitchline CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run api database migrations
//! stitch-cli migrate
//!
//! # Create an account from the terminal
//! stitch-cli user create -u alice -p secret123 -e alice@example.com
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user create` - Create accounts

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "stitch-cli")]
#[command(author, version, about = "Stitchline CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run api database migrations
    Migrate,
    /// Manage accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new account
    Create {
        /// Username (login handle)
        #[arg(short, long)]
        username: String,

        /// Password (min 6 characters)
        #[arg(short, long)]
        password: String,

        /// Contact email
        #[arg(short, long)]
        email: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::api().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                username,
                password,
                email,
            } => {
                commands::user::create(&username, &password, email).await?;
            }
        },
    }
    Ok(())
}
