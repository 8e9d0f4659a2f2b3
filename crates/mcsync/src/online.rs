//! Parsing the reply to the console `list` command.
//!
//! Vanilla servers answer with a header sentence, a colon and a
//! comma-separated list of names:
//!
//! ```text
//! There are 2 of a max of 20 players online: Alice, Bob
//! There are 0 of a max of 20 players online:
//! ```

use crate::{Result, SyncError};

/// Console command that lists connected players.
pub const LIST_COMMAND: &str = "list";

/// Names of the connected players, trimmed, in reply order.
///
/// A header announcing zero players returns an empty list without looking at
/// anything after the colon.
pub fn parse_list_reply(reply: &str) -> Result<Vec<String>> {
  let Some((header, names)) = reply.split_once(':') else {
    return Err(SyncError::parse("list reply", format!("no ':' in {reply:?}")));
  };

  let count = header
    .split(|c: char| c.is_whitespace() || c == '/')
    .find_map(|token| token.parse::<usize>().ok())
    .ok_or_else(|| SyncError::parse("list reply", format!("no player count in {header:?}")))?;

  if count == 0 {
    return Ok(Vec::new());
  }

  let names: Vec<String> = names
    .split(',')
    .map(str::trim)
    .filter(|n| !n.is_empty())
    .map(str::to_owned)
    .collect();

  if names.len() != count {
    tracing::debug!(count, listed = names.len(), "list reply count differs from names");
  }
  Ok(names)
}
