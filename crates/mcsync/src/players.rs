//! Player reconciliation.
//!
//! One pass mirrors the server's view of its players into the store:
//!
//! 1. every account in the user cache gets a row (insert-if-absent);
//! 2. `whitelisted` is rewritten from `whitelist.json`;
//! 3. `banned` and the ban reason from `banned-players.json`;
//! 4. `op` from `ops.json`;
//! 5. `active` from the live `list` reply.
//!
//! All inputs are read and validated before the first write, so a missing or
//! malformed document (or an unreachable console) aborts the pass with the
//! store untouched. Each facet rewrite is a full reset followed by a re-mark,
//! which makes the pass idempotent.

use mcsync_core::{
  console::Dialer,
  player::{Facet, FacetMember, PlayerKey},
  store::SyncStore,
};
use uuid::Uuid;

use crate::{
  Result, SyncContext, SyncError, documents,
  online::{LIST_COMMAND, parse_list_reply},
};

/// Counts from one completed pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerReport {
  pub inserted:    usize,
  pub whitelisted: usize,
  pub banned:      usize,
  pub operators:   usize,
  pub online:      usize,
}

/// Everything a pass writes, gathered up front.
struct Inputs {
  user_cache: Vec<(Uuid, String)>,
  whitelist:  Vec<FacetMember>,
  bans:       Vec<FacetMember>,
  ops:        Vec<FacetMember>,
  online:     Vec<FacetMember>,
}

/// Run one full player reconciliation pass.
pub async fn reconcile<S, D>(ctx: &mut SyncContext<S, D>) -> Result<PlayerReport>
where
  S: SyncStore,
  D: Dialer,
{
  tracing::debug!("reconciling players");
  let result = match gather(ctx).await {
    Ok(inputs) => apply(&ctx.store, inputs).await,
    Err(e) => Err(e),
  };

  match &result {
    Ok(report) => tracing::info!(
      inserted = report.inserted,
      whitelisted = report.whitelisted,
      banned = report.banned,
      operators = report.operators,
      online = report.online,
      "player reconciliation complete"
    ),
    Err(e) => tracing::error!(error = %e, "player reconciliation aborted"),
  }
  result
}

async fn gather<S, D>(ctx: &mut SyncContext<S, D>) -> Result<Inputs>
where
  S: SyncStore,
  D: Dialer,
{
  let docs = &ctx.documents;
  let user_cache = documents::read_user_cache(&docs.user_cache).await?;
  let whitelist = documents::read_members(&docs.whitelist).await?;
  let bans = documents::read_bans(&docs.banned_players).await?;
  let ops = documents::read_members(&docs.ops).await?;

  let reply = ctx.console.execute(LIST_COMMAND).await?;
  let names = parse_list_reply(&reply)?;
  if names.is_empty() {
    tracing::debug!("no players online");
  } else {
    tracing::debug!(?names, "players online");
  }
  // The live list only carries display names.
  let online = names
    .into_iter()
    .map(|n| FacetMember::new(PlayerKey::Name(n)))
    .collect();

  Ok(Inputs { user_cache, whitelist, bans, ops, online })
}

async fn apply<S: SyncStore>(store: &S, inputs: Inputs) -> Result<PlayerReport> {
  let mut report = PlayerReport::default();

  for (uuid, name) in inputs.user_cache {
    if store
      .ensure_player(uuid, name)
      .await
      .map_err(SyncError::storage)?
    {
      report.inserted += 1;
    }
  }

  report.whitelisted = replace(store, Facet::Whitelisted, inputs.whitelist).await?;
  report.banned = replace(store, Facet::Banned, inputs.bans).await?;
  report.operators = replace(store, Facet::Operator, inputs.ops).await?;
  report.online = replace(store, Facet::Active, inputs.online).await?;

  Ok(report)
}

async fn replace<S: SyncStore>(store: &S, facet: Facet, members: Vec<FacetMember>) -> Result<usize> {
  let listed = members.len();
  let marked = store
    .replace_facet(facet, members)
    .await
    .map_err(SyncError::storage)?;
  tracing::debug!(%facet, listed, marked, "facet rewritten");
  Ok(marked)
}
