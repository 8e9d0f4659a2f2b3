//! mcsync binary.
//!
//! Connects to the server console, opens the SQLite store and runs one player
//! reconciliation pass and one property sync pass.
//!
//! ```sh
//! RCON_SERVER=localhost RCON_PORT=25575 RCON_PASSWORD=secret mcsync --debug
//! ```

use std::{path::PathBuf, process::ExitCode};

use anyhow::Context as _;
use clap::{Parser, builder::NonEmptyStringValueParser};
use mcsync::{DocumentPaths, SyncConfig, SyncContext, players, properties};
use mcsync_rcon::{ConsoleManager, RconDialer};
use mcsync_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about = "Mirror a Minecraft server's players and properties into SQLite")]
struct Cli {
  /// Console host.
  #[arg(long, env = "RCON_SERVER", value_parser = NonEmptyStringValueParser::new())]
  host: String,

  /// Console port.
  #[arg(long, env = "RCON_PORT")]
  port: u16,

  /// Console password.
  #[arg(
    long,
    env = "RCON_PASSWORD",
    hide_env_values = true,
    value_parser = NonEmptyStringValueParser::new()
  )]
  password: String,

  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "mcsync.toml")]
  config: PathBuf,

  /// Log at debug level unless `RUST_LOG` says otherwise.
  #[arg(short, long)]
  debug: bool,
}

type Context = SyncContext<SqliteStore, RconDialer>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.debug { LevelFilter::DEBUG } else { LevelFilter::INFO };
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy(),
    )
    .with_file(true)
    .with_line_number(true)
    .init();

  let mut ctx = match startup(cli).await {
    Ok(ctx) => ctx,
    Err(e) => {
      tracing::error!("{e:#}");
      return ExitCode::FAILURE;
    }
  };

  // The passes are independent; one failing does not skip the other. Both
  // log their own failure.
  let players_ok = players::reconcile(&mut ctx).await.is_ok();
  let properties_ok = properties::sync(&mut ctx).await.is_ok();
  ctx.console.close().await;

  if players_ok && properties_ok {
    ExitCode::SUCCESS
  } else {
    ExitCode::FAILURE
  }
}

async fn startup(cli: Cli) -> anyhow::Result<Context> {
  let cfg = SyncConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;

  let store = SqliteStore::open(&cfg.database)
    .await
    .with_context(|| format!("failed to open store at {}", cfg.database.display()))?;

  let address = format!("{}:{}", cli.host, cli.port);
  let mut console = ConsoleManager::new(RconDialer::minecraft(), address, cli.password)
    .with_policy(cfg.retry_policy())
    .with_canary(cfg.canary());
  console.init().await.context("failed to connect to the server console")?;

  Ok(SyncContext::new(store, console, DocumentPaths::in_dir(&cfg.data_dir)))
}
