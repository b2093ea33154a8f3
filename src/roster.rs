//! Loading candidate pools from roster files.
//!
//! A roster is a JSON array of member records as exported from the chat
//! platform. Records are normalized into [`Identity`] values here, so the
//! resolver never has to reinterpret platform quirks.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::errors::{MemberLensError, Result};
use crate::types::Identity;

/// A number that exports sometimes encode as a JSON string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u64),
    Text(String),
}

impl NumberOrText {
    fn to_u64(&self) -> Option<u64> {
        match self {
            NumberOrText::Number(n) => Some(*n),
            NumberOrText::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// One member as it appears in a roster file.
#[derive(Debug, Deserialize)]
struct MemberRecord {
    id: NumberOrText,
    username: String,
    #[serde(default)]
    discriminator: Option<NumberOrText>,
    #[serde(default)]
    nickname: Option<String>,
}

impl MemberRecord {
    fn into_identity(self, index: usize, origin: &str) -> Result<Identity> {
        let id = self.id.to_u64().ok_or_else(|| MemberLensError::Roster {
            message: format!("member #{} has an invalid id", index),
            path: origin.to_string(),
        })?;

        let discriminator = match self.discriminator {
            None => None,
            Some(raw) => match raw.to_u64().map(u16::try_from) {
                Some(Ok(tag)) => Some(tag),
                _ => {
                    return Err(MemberLensError::Roster {
                        message: format!("member {} has an invalid discriminator", id),
                        path: origin.to_string(),
                    })
                }
            },
        };

        let nickname = self.nickname.filter(|n| !n.is_empty());

        Ok(Identity {
            id,
            username: self.username,
            discriminator,
            nickname,
        })
    }
}

/// Parses roster JSON into a pool. `origin` names the source in errors.
pub fn parse_roster(json: &str, origin: &str) -> Result<Vec<Identity>> {
    let records: Vec<MemberRecord> =
        serde_json::from_str(json).map_err(|e| MemberLensError::Roster {
            message: format!("failed to parse roster: {}", e),
            path: origin.to_string(),
        })?;

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| record.into_identity(index, origin))
        .collect()
}

/// Reads and parses a roster file.
pub fn load_roster(path: &Path) -> Result<Vec<Identity>> {
    let origin = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|e| MemberLensError::Roster {
        message: format!("failed to read roster: {}", e),
        path: origin.clone(),
    })?;

    let pool = parse_roster(&contents, &origin)?;
    debug!(path = %origin, members = pool.len(), "roster loaded");
    Ok(pool)
}
