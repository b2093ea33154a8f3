use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{MemberLensError, Result};

/// One addressable community member.
///
/// Optional capabilities (tag, nickname) are settled when the pool is built;
/// strategies only ever read them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    /// Stable unique member id.
    pub id: u64,
    /// Account username.
    pub username: String,
    /// Numeric tag shown after `#`, if the account has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<u16>,
    /// Community-specific nickname, if one is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

impl Identity {
    /// Creates an identity with no tag and no nickname.
    pub fn new(id: u64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            discriminator: None,
            nickname: None,
        }
    }

    /// Sets the numeric tag.
    pub fn with_discriminator(mut self, discriminator: u16) -> Self {
        self.discriminator = Some(discriminator);
        self
    }

    /// Sets the community nickname.
    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    /// Returns the nickname if set, otherwise the username.
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.username)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.discriminator {
            Some(tag) => write!(f, "{}#{:04}", self.username, tag),
            None => write!(f, "{}", self.username),
        }
    }
}

/// Which candidate pool a match was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    /// Members visible in the current conversation channel.
    Channel,
    /// All members of the parent community.
    Community,
}

#[allow(clippy::should_implement_trait)]
impl PoolKind {
    /// Returns the string representation of this pool kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolKind::Channel => "channel",
            PoolKind::Community => "community",
        }
    }

    /// Parses a string into a `PoolKind`, returning `None` for unrecognized values.
    pub fn from_str(s: &str) -> Option<PoolKind> {
        match s {
            "channel" => Some(PoolKind::Channel),
            "community" => Some(PoolKind::Community),
            _ => None,
        }
    }
}

/// The matching rule that produced a scored candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Mention,
    Id,
    UsernameTag,
    Username,
    Nickname,
    UsernamePrefix,
    NicknamePrefix,
}

#[allow(clippy::should_implement_trait)]
impl MatchKind {
    /// Returns the string representation of this match kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Mention => "mention",
            MatchKind::Id => "id",
            MatchKind::UsernameTag => "username_tag",
            MatchKind::Username => "username",
            MatchKind::Nickname => "nickname",
            MatchKind::UsernamePrefix => "username_prefix",
            MatchKind::NicknamePrefix => "nickname_prefix",
        }
    }

    /// Parses a string into a `MatchKind`, returning `None` for unrecognized values.
    pub fn from_str(s: &str) -> Option<MatchKind> {
        match s {
            "mention" => Some(MatchKind::Mention),
            "id" => Some(MatchKind::Id),
            "username_tag" => Some(MatchKind::UsernameTag),
            "username" => Some(MatchKind::Username),
            "nickname" => Some(MatchKind::Nickname),
            "username_prefix" => Some(MatchKind::UsernamePrefix),
            "nickname_prefix" => Some(MatchKind::NicknamePrefix),
            _ => None,
        }
    }
}

/// A candidate proposed by one strategy, with its tier score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    pub identity: Identity,
    /// Tier score in `[0.0, 1.0]`.
    pub score: f32,
    /// Strategy that proposed the candidate.
    pub kind: MatchKind,
    /// Pool the candidate was found in.
    pub pool: PoolKind,
}

/// Outcome of resolving one token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    /// Exactly one identity holds the top score.
    Resolved { identity: Identity, score: f32 },
    /// Several identities tie at the top score, ordered by id.
    Ambiguous { identities: Vec<Identity>, score: f32 },
    /// No strategy matched anything.
    NotFound,
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved { .. })
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Resolution::Ambiguous { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Resolution::NotFound)
    }

    /// Top bracket score, or `None` when nothing matched.
    pub fn score(&self) -> Option<f32> {
        match self {
            Resolution::Resolved { score, .. } | Resolution::Ambiguous { score, .. } => {
                Some(*score)
            }
            Resolution::NotFound => None,
        }
    }

    /// Every identity in the top bracket.
    pub fn identities(&self) -> Vec<&Identity> {
        match self {
            Resolution::Resolved { identity, .. } => vec![identity],
            Resolution::Ambiguous { identities, .. } => identities.iter().collect(),
            Resolution::NotFound => Vec::new(),
        }
    }

    /// Converts the outcome into the top-bracket candidates.
    ///
    /// `NotFound` becomes a [`MemberLensError::NotFound`] naming the token;
    /// ambiguity is returned as a multi-element list, not as an error.
    pub fn into_candidates(self, token: &str) -> Result<Vec<Identity>> {
        match self {
            Resolution::Resolved { identity, .. } => Ok(vec![identity]),
            Resolution::Ambiguous { identities, .. } => Ok(identities),
            Resolution::NotFound => Err(MemberLensError::NotFound {
                token: token.to_string(),
            }),
        }
    }
}

/// Resolution of a single token inside a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResolution {
    pub token: String,
    pub resolution: Resolution,
}

/// Summary of a batch resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolutionSummary {
    /// Per-token outcomes, in input order.
    pub outcomes: Vec<TokenResolution>,
    pub total: usize,
    pub resolved_count: usize,
    pub ambiguous_count: usize,
    pub not_found_count: usize,
}
