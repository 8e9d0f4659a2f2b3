//! [`ConsoleManager`]: one self-healing console session.
//!
//! The console protocol has no keepalive and no close notification, so a
//! session dropped by a firewall or a server restart is only noticed when a
//! command fails. Before every command the manager sends a canary and checks
//! the reply for a marker; a failed check closes the session and redials with
//! [`RetryPolicy`] before the real command is sent.

use std::time::Duration;

use mcsync_core::console::{Dialer, Session};

use crate::{Error, Result};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Bounded dial retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  /// Total dial attempts before giving up; at least one is always made.
  pub attempts: u32,
  /// Pause between consecutive attempts.
  pub backoff:  Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self { attempts: 3, backoff: Duration::from_secs(5) }
  }
}

/// A known-good command and a substring its reply always contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canary {
  pub command: String,
  pub marker:  String,
}

impl Default for Canary {
  fn default() -> Self {
    Self { command: "list".into(), marker: "players online".into() }
  }
}

// ─── Manager ─────────────────────────────────────────────────────────────────

/// Owns at most one live session from `D`.
pub struct ConsoleManager<D: Dialer> {
  dialer:     D,
  address:    String,
  credential: String,
  policy:     RetryPolicy,
  canary:     Canary,
  session:    Option<D::Session>,
}

impl<D: Dialer> ConsoleManager<D> {
  /// A manager for `address` (`host:port`). No connection is made until
  /// [`init`](Self::init) or the first [`execute`](Self::execute).
  pub fn new(dialer: D, address: impl Into<String>, credential: impl Into<String>) -> Self {
    Self {
      dialer,
      address: address.into(),
      credential: credential.into(),
      policy: RetryPolicy::default(),
      canary: Canary::default(),
      session: None,
    }
  }

  pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
    self.policy = policy;
    self
  }

  pub fn with_canary(mut self, canary: Canary) -> Self {
    self.canary = canary;
    self
  }

  pub fn is_connected(&self) -> bool { self.session.is_some() }

  /// Establish the initial session, retrying per the policy.
  pub async fn init(&mut self) -> Result<()> {
    tracing::debug!(address = %self.address, "connecting to console");
    self.dial_with_retry().await
  }

  /// Run the canary against the current session.
  ///
  /// A transport error and a reply missing the marker both count as dead.
  pub async fn is_alive(&mut self) -> bool {
    let Some(session) = self.session.as_mut() else {
      return false;
    };
    match session.execute(&self.canary.command).await {
      Ok(reply) if reply.contains(&self.canary.marker) => true,
      Ok(reply) => {
        tracing::debug!(%reply, "canary reply missing marker");
        false
      }
      Err(e) => {
        tracing::debug!(error = %e, "canary command failed");
        false
      }
    }
  }

  /// Close the current session, if any, and dial a fresh one.
  pub async fn reconnect(&mut self) -> Result<()> {
    self.close().await;
    self.dial_with_retry().await
  }

  /// Send `command` and return the reply, redialling first if the session
  /// fails its health check.
  pub async fn execute(&mut self, command: &str) -> Result<String> {
    if !self.is_alive().await {
      if self.session.is_some() {
        tracing::warn!(address = %self.address, "console session is dead; reconnecting");
      }
      self.reconnect().await?;
    }

    let Some(session) = self.session.as_mut() else {
      return Err(self.unavailable(None));
    };
    tracing::debug!(%command, "executing console command");
    session
      .execute(command)
      .await
      .map_err(|e| Error::Transport(Box::new(e)))
  }

  /// Release the session. A no-op when not connected.
  pub async fn close(&mut self) {
    if let Some(session) = self.session.take() {
      session.close().await;
    }
  }

  async fn dial_with_retry(&mut self) -> Result<()> {
    let attempts = self.policy.attempts.max(1);
    let mut last = None;

    for attempt in 1..=attempts {
      match self.dialer.dial(&self.address, &self.credential).await {
        Ok(session) => {
          tracing::info!(address = %self.address, attempt, "console connected");
          self.session = Some(session);
          return Ok(());
        }
        Err(e) => {
          tracing::warn!(address = %self.address, attempt, attempts, error = %e, "console dial failed");
          last = Some(e);
          if attempt < attempts {
            tokio::time::sleep(self.policy.backoff).await;
          }
        }
      }
    }

    Err(self.unavailable(last.map(|e| Box::new(e) as _)))
  }

  fn unavailable(&self, last: Option<Box<dyn std::error::Error + Send + Sync>>) -> Error {
    Error::ConnectionUnavailable {
      address: self.address.clone(),
      attempts: self.policy.attempts.max(1),
      last,
    }
  }
}
