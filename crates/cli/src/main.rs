//! Bizcard CLI - view and share digital business cards from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the demo card (`/` redirects to `/card/demo`)
//! bizcard show
//!
//! # Show a card's company panel, or its back face
//! bizcard show /card/QcsoVRnPirWZeFWgwm2Q --tab company
//! bizcard show QcsoVRnPirWZeFWgwm2Q --back
//!
//! # Save the contact as a .vcf file
//! bizcard export /card/demo --out ~/Downloads
//!
//! # Switch between dark and light output
//! bizcard theme toggle
//! ```
//!
//! # Environment Variables
//!
//! See `bizcard_viewer::config` for the full list. `RUST_LOG` overrides the
//! default log filter; logs go to stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::{self, Write};
use std::path::PathBuf;

use bizcard_core::ThemePreference;
use bizcard_viewer::config::{ConfigError, ViewerConfig};
use bizcard_viewer::view::Tab;
use clap::{Parser, Subcommand, ValueEnum};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "bizcard")]
#[command(author, version, about = "Digital business card viewer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a card
    Show {
        /// Card path (`/card/<id>`) or bare identifier
        #[arg(default_value = "/")]
        target: String,

        /// Front panel to show
        #[arg(short, long, default_value_t = Tab::Contact)]
        tab: Tab,

        /// Show the back of the card
        #[arg(short, long)]
        back: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// Save a card's contact as a vCard file
    Export {
        /// Card path (`/card/<id>`) or bare identifier
        #[arg(default_value = "/")]
        target: String,

        /// Directory to write the file into
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    /// Read or change the display theme
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the current theme
    Show,
    /// Switch between dark and light
    Toggle,
    /// Set the theme explicitly
    Set {
        #[arg(value_enum)]
        mode: ThemeMode,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeMode {
    Dark,
    Light,
}

impl From<ThemeMode> for ThemePreference {
    fn from(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::DARK,
            ThemeMode::Light => Self::LIGHT,
        }
    }
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ViewerConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configuration errors surface per command; Sentry needs it up front
    let config = ViewerConfig::from_env();
    let sentry_guard = config.as_ref().ok().and_then(init_sentry);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bizcard=info,bizcard_viewer=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            sentry_guard
                .is_some()
                .then(|| sentry_tracing::layer().event_filter(sentry_event_filter)),
        )
        .init();

    if sentry_guard.is_some() {
        tracing::info!("Sentry initialized");
    }

    if let Err(e) = run(cli, config).await {
        e.report();
        let _ = writeln!(io::stderr(), "{}", e.user_message());
        // Exiting skips destructors, so flush pending Sentry events first
        drop(sentry_guard);
        std::process::exit(e.exit_code());
    }
}

async fn run(
    cli: Cli,
    config: Result<ViewerConfig, ConfigError>,
) -> bizcard_viewer::error::Result<()> {
    match cli.command {
        Commands::Show {
            target,
            tab,
            back,
            no_color,
        } => {
            let config = config?;
            commands::card::show(&config, &target, tab, back, !no_color).await
        }
        Commands::Export { target, out } => {
            let config = config?;
            commands::card::export(&config, &target, &out).await
        }
        Commands::Theme { action } => {
            let path = match &config {
                Ok(config) => config.preferences_path.clone(),
                Err(_) => ViewerConfig::preferences_path_from_env(),
            };
            let action = match action {
                ThemeAction::Show => commands::theme::Action::Show,
                ThemeAction::Toggle => commands::theme::Action::Toggle,
                ThemeAction::Set { mode } => commands::theme::Action::Set(mode.into()),
            };
            commands::theme::run(path.as_deref(), action)
        }
    }
}
