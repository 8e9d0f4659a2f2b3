//! `server.properties` synchronisation.
//!
//! Every pair in the file is upserted into the revisioned property table,
//! then every key missing from the file is retired. Unchanged values write
//! nothing, so repeating a pass over the same file is a no-op.

use mcsync_core::{console::Dialer, store::SyncStore};

use crate::{Result, SyncContext, SyncError, documents};

/// Counts from one completed pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropertyReport {
  pub keys:    usize,
  pub written: usize,
  pub retired: usize,
}

/// Run one full property synchronisation pass.
pub async fn sync<S, D>(ctx: &mut SyncContext<S, D>) -> Result<PropertyReport>
where
  S: SyncStore,
  D: Dialer,
{
  tracing::debug!(path = %ctx.documents.server_properties.display(), "syncing server properties");
  let result = run(ctx).await;

  match &result {
    Ok(report) => tracing::info!(
      keys = report.keys,
      written = report.written,
      retired = report.retired,
      "property sync complete"
    ),
    Err(e) => tracing::error!(error = %e, "property sync aborted"),
  }
  result
}

async fn run<S, D>(ctx: &SyncContext<S, D>) -> Result<PropertyReport>
where
  S: SyncStore,
  D: Dialer,
{
  let store = &ctx.store;
  let pairs = documents::read_properties(&ctx.documents.server_properties).await?;
  let mut report = PropertyReport { keys: pairs.len(), ..Default::default() };

  let mut keys = Vec::with_capacity(pairs.len());
  for (key, value) in pairs {
    let outcome = store
      .upsert_property(key.clone(), value)
      .await
      .map_err(SyncError::storage)?;
    if outcome.is_written() {
      tracing::debug!(%key, revision = outcome.revision(), "property changed");
      report.written += 1;
    }
    keys.push(key);
  }

  report.retired = store
    .retire_properties_except(keys)
    .await
    .map_err(SyncError::storage)?;

  Ok(report)
}
