//! Orchid: orchid catalog and favorites client.
//!
//! # Usage
//!
//! ```text
//! orchid login --email E --password P
//! orchid register --email E --password P --confirm-password P
//! orchid logout
//! orchid profile
//! orchid list [--json]
//! orchid show <id> [--json]
//! orchid create --name .. --weight .. --rating .. --price .. --image .. \
//!               --color .. --bonus .. --origin .. --category .. \
//!               [--top-of-the-week] [--inactive]
//! orchid edit <id> [--name ..] [--weight ..] [--rating ..] [--origin ..]
//! orchid delete <id>
//! orchid favorite toggle|list|remove|clear
//! orchid reconcile
//! ```

mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use commands::{
    account::{LoginArgs, RegisterArgs},
    catalog::{CreateArgs, DeleteArgs, EditArgs, ListArgs, ShowArgs},
    favorite::FavoriteCommand,
    App,
};
use orchid_sync::SyncError;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "orchid",
    version,
    about = "Browse the orchid catalog and keep favorites in sync",
    long_about = None,
)]
struct Cli {
    /// Catalog service base URL (overrides config.yaml).
    #[arg(long, global = true, value_name = "URL")]
    catalog_url: Option<String>,

    /// Reconcile local favorites against the catalog before the command runs.
    #[arg(long, global = true)]
    reconcile: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and store the session locally.
    Login(LoginArgs),

    /// Create an account. Sign in afterwards with `orchid login`.
    Register(RegisterArgs),

    /// Forget the stored session.
    Logout,

    /// Show the signed-in user.
    Profile,

    /// List every catalog item.
    List(ListArgs),

    /// Show one catalog item.
    Show(ShowArgs),

    /// Create a catalog item.
    Create(CreateArgs),

    /// Update fields of a catalog item.
    Edit(EditArgs),

    /// Delete a catalog item.
    Delete(DeleteArgs),

    /// Manage favorites.
    Favorite {
        #[command(subcommand)]
        command: FavoriteCommand,
    },

    /// Repair drift between catalog favorites and local records.
    Reconcile,
}

impl Commands {
    /// Commands usable without a stored session.
    fn is_public(&self) -> bool {
        matches!(
            self,
            Commands::Login(_) | Commands::Register(_) | Commands::Logout
        )
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let app = App::open(cli.catalog_url)?;

    if !cli.command.is_public() {
        app.require_session()?;
        if cli.reconcile && !matches!(cli.command, Commands::Reconcile) {
            commands::reconcile::run(&app)?;
        }
    }

    match cli.command {
        Commands::Login(args) => args.run(&app),
        Commands::Register(args) => args.run(&app),
        Commands::Logout => commands::account::logout(&app),
        Commands::Profile => commands::account::profile(&app),
        Commands::List(args) => args.run(&app),
        Commands::Show(args) => args.run(&app),
        Commands::Create(args) => args.run(&app),
        Commands::Edit(args) => args.run(&app),
        Commands::Delete(args) => args.run(&app),
        Commands::Favorite { command } => commands::favorite::run(&app, command),
        Commands::Reconcile => commands::reconcile::run(&app),
    }
}

/// Print `err` for the user. Validation failures get one line per field.
fn report(err: &anyhow::Error) {
    let validation = err
        .chain()
        .find_map(|e| match e.downcast_ref::<SyncError>() {
            Some(SyncError::Validation(v)) => Some(v),
            _ => None,
        });
    match validation {
        Some(validation) => {
            for field in &validation.fields {
                eprintln!("{} {}: {}", "✗".red(), field.field, field.message);
            }
        }
        None => eprintln!("{} {err:#}", "error:".red().bold()),
    }
}

/// `RUST_LOG` overrides the default `warn` level; output goes to stderr.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
