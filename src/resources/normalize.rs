//! List-field normalization
//!
//! Free-text list fields (technologies, highlights) arrive either as a JSON
//! array or as one comma/newline-delimited string. Both are resolved once,
//! at the API boundary, into a canonical ordered list.

use serde::{Deserialize, Serialize};

/// Raw list input as submitted by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListInput {
    List(Vec<String>),
    Text(String),
}

impl ListInput {
    /// Trimmed, non-empty, first-occurrence-wins list of entries
    pub fn normalize(&self) -> Vec<String> {
        let pieces: Vec<&str> = match self {
            ListInput::List(items) => items.iter().map(String::as_str).collect(),
            ListInput::Text(text) => text.split([',', '\n']).collect(),
        };

        let mut out: Vec<String> = Vec::with_capacity(pieces.len());
        for piece in pieces {
            let trimmed = piece.trim();
            if trimmed.is_empty() || out.iter().any(|seen| seen == trimmed) {
                continue;
            }
            out.push(trimmed.to_string());
        }
        out
    }
}
