//! Clubhouse CLI - demo client for the member directory.
//!
//! # Usage
//!
//! ```bash
//! # Create an account and join a club
//! clubhouse signup -n "Ann Lee" -e ann@example.com -c sigma-rho
//!
//! # Verify credentials
//! clubhouse login -e ann@example.com
//!
//! # Browse your club's roster
//! clubhouse roster -e ann@example.com -s an
//!
//! # Browse the bundled demo roster (no backend required)
//! clubhouse roster --bundled --club sigma-rho
//!
//! # Show one member's profile
//! clubhouse member m-003 --bundled
//! ```
//!
//! # Commands
//!
//! - `signup` - Create an account and join a club
//! - `login` - Verify credentials against the account service
//! - `roster` - List the members visible to you
//! - `member` - Show one member's profile
//!
//! The CLI is the composition root: configuration, backend client, session
//! manager, and directory store are constructed here once and passed down
//! explicitly.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use clubhouse_directory::preferences::{ColorScheme, ThemeState};

mod commands;

#[derive(Parser)]
#[command(name = "clubhouse")]
#[command(author, version, about = "Clubhouse member directory CLI")]
struct Cli {
    /// Render for a dark terminal (default follows CLUBHOUSE_THEME)
    #[arg(long, global = true, conflicts_with = "light")]
    dark: bool,

    /// Render for a light terminal
    #[arg(long, global = true)]
    light: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and join a club
    Signup {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Club to join (opaque club id)
        #[arg(short, long)]
        club: String,
    },
    /// Verify credentials against the account service
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,
    },
    /// List the members visible to you
    Roster {
        /// Email to log in with (not needed with --bundled)
        #[arg(short, long)]
        email: Option<String>,

        /// Case-insensitive name filter
        #[arg(short, long)]
        search: Option<String>,

        /// Browse the bundled demo roster instead of the hosted backend
        #[arg(long)]
        bundled: bool,

        /// Club scope for --bundled browsing
        #[arg(long)]
        club: Option<String>,
    },
    /// Show one member's profile
    Member {
        /// Member id
        id: String,

        /// Email to log in with (not needed with --bundled)
        #[arg(short, long)]
        email: Option<String>,

        /// Browse the bundled demo roster instead of the hosted backend
        #[arg(long)]
        bundled: bool,

        /// Club scope for --bundled browsing
        #[arg(long)]
        club: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let theme = seed_theme(&cli);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, &theme).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Seed the display mode from the environment, then apply explicit flags.
fn seed_theme(cli: &Cli) -> ThemeState {
    let seeded = match std::env::var("CLUBHOUSE_THEME").as_deref() {
        Ok("dark") => ColorScheme::Dark,
        _ => ColorScheme::Light,
    };

    let theme = ThemeState::new(seeded);
    if cli.dark && !theme.is_dark() {
        theme.toggle();
    }
    if cli.light && theme.is_dark() {
        theme.toggle();
    }
    theme
}

async fn run(cli: Cli, theme: &ThemeState) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Signup { name, email, club } => {
            commands::account::signup(&name, &email, &club).await?;
        }
        Commands::Login { email } => commands::account::login(&email).await?,
        Commands::Roster {
            email,
            search,
            bundled,
            club,
        } => {
            commands::members::roster(
                email.as_deref(),
                search.as_deref(),
                bundled,
                club.as_deref(),
                theme,
            )
            .await?;
        }
        Commands::Member {
            id,
            email,
            bundled,
            club,
        } => {
            commands::members::detail(
                &id,
                email.as_deref(),
                bundled,
                club.as_deref(),
                theme,
            )
            .await?;
        }
    }
    Ok(())
}
