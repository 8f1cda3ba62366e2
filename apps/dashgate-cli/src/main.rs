use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

/// Inspect how the access gate treats a request.
#[derive(Parser, Debug)]
#[command(name = "dashgate", version)]
struct Cli {
    /// YAML configuration file. Defaults apply when omitted or missing.
    #[arg(long, short = 'c', value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Log decisions at debug level.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the authorization envelope derived from an identity header.
    Context(IdentityArgs),
    /// Print the rewrite applied to a data-source item.
    Rewrite {
        #[command(flatten)]
        identity: IdentityArgs,
        /// Item id, matched against the rewrite rules.
        #[arg(long)]
        id: String,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Print whether an item is visible to the caller.
    Filter {
        #[command(flatten)]
        identity: IdentityArgs,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Inspect stored dashboards. Lists them when no subcommand is given.
    Dashboards {
        #[command(subcommand)]
        command: Option<DashboardCommand>,
    },
}

#[derive(Subcommand, Debug)]
enum DashboardCommand {
    /// List stored dashboards.
    List,
    /// Print a stored dashboard definition.
    Show { id: String },
    /// Print whether a dashboard is stored.
    Exists { id: String },
}

#[derive(Args, Debug)]
struct IdentityArgs {
    /// Raw identity header value, e.g. `userId:ALFKI,orderId:10248`.
    #[arg(long, default_value = "")]
    header: String,
}

#[derive(Args, Debug)]
struct TargetArgs {
    #[arg(long)]
    table: Option<String>,
    #[arg(long)]
    procedure: Option<String>,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = access_gate::AccessGateConfig::load(cli.config.as_deref())
        .context("failed to load configuration")?;
    let app = commands::App::from_config(&config)?;
    tracing::debug!(
        header = %app.header_name(),
        dashboards_root = %config.dashboards.root.display(),
        "configuration loaded"
    );

    let output = match cli.command {
        Command::Context(identity) => app.context(&identity.header),
        Command::Rewrite {
            identity,
            id,
            target,
        } => app.rewrite(&identity.header, &id, target.table, target.procedure),
        Command::Filter { identity, target } => {
            app.filter(&identity.header, target.table, target.procedure)
                .await
        }
        Command::Dashboards { command } => match command.unwrap_or(DashboardCommand::List) {
            DashboardCommand::List => app.dashboards().await,
            DashboardCommand::Show { id } => app.show_dashboard(&id).await,
            DashboardCommand::Exists { id } => app.dashboard_exists(&id).await,
        },
    }?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
