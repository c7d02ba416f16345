//! PayFlow admin console.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (password is prompted for when not given)
//! payflow login -u admin
//!
//! # Review the queue and decide on a request
//! payflow withdrawals --status pending
//! payflow approve 1 --notes "verified by phone"
//! payflow reject 2
//!
//! # Analytics and the Excel report
//! payflow analytics
//! payflow export --dir reports/
//! ```
//!
//! Endpoints and storage locations come from the environment; see
//! `payflow_admin::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use payflow_admin::AdminConfig;
use payflow_admin::viewmodel::{BuilderDialog, SortKey};
use payflow_core::{StatusFilter, WithdrawalId, WithdrawalStatus};
use secrecy::SecretString;

mod commands;
mod telemetry;

use commands::{CommandError, Context};

#[derive(Parser)]
#[command(name = "payflow")]
#[command(author, version, about = "PayFlow withdrawal admin console")]
struct Cli {
    /// Directory holding the session file (overrides `PAYFLOW_STATE_DIR`)
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the product landing page
    Landing,

    #[command(flatten)]
    Service(ServiceCommand),
}

/// Commands that need endpoint configuration.
#[derive(Subcommand)]
enum ServiceCommand {
    /// Sign in and store the session
    Login {
        /// Administrator username
        #[arg(short, long, env = "PAYFLOW_USERNAME")]
        username: String,

        /// Password; prompted for when omitted
        #[arg(long, env = "PAYFLOW_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Check the stored session against the service
    Whoami,
    /// Stat cards and the monthly chart
    Dashboard,
    /// The withdrawal request table
    Withdrawals {
        /// Only list requests in this status (`all`, `pending`, `approved`, `rejected`)
        #[arg(long, default_value = "all")]
        status: StatusFilter,

        /// Sort column (`id`, `date`, `amount`, `user`, `status`)
        #[arg(long, default_value = "date")]
        sort: SortKey,

        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,
    },
    /// Approve a pending withdrawal request
    Approve {
        id: WithdrawalId,

        /// Note stored with the decision
        #[arg(long)]
        notes: Option<String>,
    },
    /// Reject a pending withdrawal request
    Reject {
        id: WithdrawalId,

        /// Note stored with the decision
        #[arg(long)]
        notes: Option<String>,
    },
    /// Monthly volume, method breakdown and top users
    Analytics,
    /// Download the analytics Excel report
    Export {
        /// Target directory (overrides `PAYFLOW_EXPORT_DIR`)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Page builder dialogs (nothing is stored)
    Builder {
        /// Dialog to open (`home` or `settings`)
        dialog: Option<BuilderDialog>,

        /// Field value, e.g. `--set hero-title="Fast payouts"`
        #[arg(long = "set", value_parser = parse_field)]
        fields: Vec<(String, String)>,

        /// Press the save button
        #[arg(long)]
        save: bool,
    },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = AdminConfig::from_env().map(|mut config| {
        if let Some(dir) = &cli.state_dir {
            config.state_dir.clone_from(dir);
        }
        config
    });

    // Keep the guard alive until exit so queued events are flushed
    let _sentry_guard = telemetry::init(config.as_ref().ok());

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_reportable() {
                tracing::error!(error = %e, "Command failed");
            } else {
                tracing::debug!(error = %e, "Command refused");
            }
            let _ = writeln!(std::io::stderr().lock(), "error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(
    cli: Cli,
    config: Result<AdminConfig, payflow_admin::config::ConfigError>,
) -> Result<(), CommandError> {
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Landing => commands::pages::landing(&mut out),
        Commands::Service(command) => {
            let ctx = Context::new(config?)?;
            dispatch(&ctx, command, &mut out).await
        }
    }
}

async fn dispatch(
    ctx: &Context,
    command: ServiceCommand,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    match command {
        ServiceCommand::Login { username, password } => {
            let password = match password {
                Some(password) => SecretString::from(password),
                None => commands::auth::prompt_password()?,
            };
            commands::auth::login(ctx, &username, password, out).await
        }
        ServiceCommand::Logout => commands::auth::logout(ctx, out),
        ServiceCommand::Whoami => commands::auth::whoami(ctx, out).await,
        ServiceCommand::Dashboard => commands::screens::dashboard(ctx, out).await,
        ServiceCommand::Withdrawals { status, sort, asc } => {
            commands::screens::withdrawals(ctx, status, sort, asc, out).await
        }
        ServiceCommand::Approve { id, notes } => {
            commands::decide::decide(ctx, id, WithdrawalStatus::Approved, notes, out).await
        }
        ServiceCommand::Reject { id, notes } => {
            commands::decide::decide(ctx, id, WithdrawalStatus::Rejected, notes, out).await
        }
        ServiceCommand::Analytics => commands::screens::analytics(ctx, out).await,
        ServiceCommand::Export { dir } => {
            let dir = dir.unwrap_or_else(|| ctx.config.export_dir.clone());
            commands::export::export(ctx, &dir, out).await
        }
        ServiceCommand::Builder {
            dialog,
            fields,
            save,
        } => commands::pages::builder(ctx, dialog, &fields, save, out),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(
            parse_field("hero-title=Fast payouts").unwrap(),
            ("hero-title".to_string(), "Fast payouts".to_string())
        );
        assert_eq!(
            parse_field("keywords=a=b").unwrap(),
            ("keywords".to_string(), "a=b".to_string())
        );
        assert!(parse_field("hero-title").is_err());
    }

    #[test]
    fn test_withdrawals_arguments() {
        let cli = Cli::try_parse_from([
            "payflow",
            "withdrawals",
            "--status",
            "pending",
            "--sort",
            "amount",
            "--asc",
        ])
        .unwrap();
        let Commands::Service(ServiceCommand::Withdrawals { status, sort, asc }) = cli.command
        else {
            panic!("expected withdrawals");
        };
        assert_eq!(status, StatusFilter::Only(WithdrawalStatus::Pending));
        assert_eq!(sort, SortKey::Amount);
        assert!(asc);
    }

    #[test]
    fn test_only_landing_runs_without_services() {
        let cli = Cli::try_parse_from(["payflow", "landing"]).unwrap();
        assert!(matches!(cli.command, Commands::Landing));

        let cli = Cli::try_parse_from(["payflow", "logout"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Service(ServiceCommand::Logout)
        ));
    }

    #[test]
    fn test_bad_id_is_rejected() {
        assert!(Cli::try_parse_from(["payflow", "approve", "abc"]).is_err());
    }
}
