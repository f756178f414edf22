mod cmd_calendar;
mod cmd_config;
mod cmd_profile;
mod cmd_stats;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd_config::ConfigCmd;
use cmd_profile::ProfileCmd;

#[derive(Parser)]
#[command(
    name = "summify",
    version,
    about = "Summify activity calendar and statistics"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the contribution calendar for the last 365 days
    Calendar {
        /// User ID (defaults to `user_id` from config)
        #[arg(long)]
        user: Option<String>,
        /// Last day of the window, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        anchor: Option<String>,
        /// Read contributions from a JSON file instead of the backend
        #[arg(long)]
        input: Option<std::path::PathBuf>,
        /// Output the calendar as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show quiz and summary counters
    Stats {
        /// User ID (defaults to `user_id` from config)
        #[arg(long)]
        user: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show or update the public profile
    Profile {
        /// User ID (defaults to `user_id` from config)
        #[arg(long, global = true)]
        user: Option<String>,
        /// Output as JSON
        #[arg(long, global = true)]
        json: bool,
        #[command(subcommand)]
        cmd: Option<ProfileCmd>,
    },
    /// Read or write config (backend_url, token, user_id)
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let store_root = summify_store::store_root();

    match cli.cmd {
        Command::Calendar {
            user,
            anchor,
            input,
            json,
        } => cmd_calendar::execute(cmd_calendar::CalendarParams {
            store_root: &store_root,
            user: user.as_deref(),
            anchor: anchor.as_deref(),
            input: input.as_deref(),
            json,
        }),
        Command::Stats { user, json } => cmd_stats::execute(&store_root, user.as_deref(), json),
        Command::Profile { user, json, cmd } => {
            cmd_profile::run(cmd, &store_root, user.as_deref(), json)
        }
        Command::Config { cmd } => cmd_config::run(cmd, &store_root),
    }
}

fn init_logging() {
    let default_level = "warn";
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Explicit `--user`, else the `user_id` config key.
pub(crate) fn resolve_user(
    config: &serde_json::Map<String, serde_json::Value>,
    user: Option<&str>,
) -> anyhow::Result<String> {
    if let Some(u) = user.filter(|u| !u.trim().is_empty()) {
        return Ok(u.trim().to_string());
    }
    match summify_store::config_string(config, summify_store::keys::USER_ID) {
        Some(u) => Ok(u),
        None => anyhow::bail!(
            "No user given. Pass --user or run `summify config set user_id <ID>`."
        ),
    }
}
