//! Plain-text rendering of server responses.

use crate::client::{GeneratedKey, KeyListItem};

/// Lines printed after `generate`. The masked form matches the key's later
/// `list` entry.
pub fn render_generated(key: &GeneratedKey) -> String {
    format!(
        "id:         {}\napi key:    {}\nmasked:     {}\nexpires at: {}",
        key.id, key.api_key, key.masked_key, key.expires_at
    )
}

/// One line per key, or a notice when there are none.
pub fn render_list(keys: &[KeyListItem]) -> String {
    if keys.is_empty() {
        return "No keys issued.".to_string();
    }
    keys.iter()
        .map(|k| {
            format!(
                "{}  {}  expires {}  created {}",
                k.id, k.masked_key, k.expires_at, k.created_at
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
