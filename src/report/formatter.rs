use serde_json::json;

use crate::types::{Identity, Resolution, ResolutionSummary, ScoredMatch};

/// Message shown when no member matches a token.
pub const NOT_FOUND_MESSAGE: &str = "User not found.";

/// Formats one identity as `nickname [username#tag] (id N)`.
pub fn format_identity(identity: &Identity) -> String {
    match &identity.nickname {
        Some(nick) => format!("{} [{}] (id {})", nick, identity, identity.id),
        None => format!("{} (id {})", identity, identity.id),
    }
}

/// Formats a resolution as human-readable text.
///
/// Ambiguous results list at most `max_listed` tied members.
pub fn format_resolution_as_text(token: &str, resolution: &Resolution, max_listed: usize) -> String {
    match resolution {
        Resolution::Resolved { identity, score } => format!(
            "Resolved '{}' to {} (score {:.2})\n",
            token,
            format_identity(identity),
            score
        ),
        Resolution::Ambiguous { identities, score } => {
            let mut out = format!(
                "'{}' is ambiguous: {} members tie at score {:.2}\n",
                token,
                identities.len(),
                score
            );
            for identity in identities.iter().take(max_listed) {
                out.push_str(&format!("  - {}\n", format_identity(identity)));
            }
            if identities.len() > max_listed {
                out.push_str(&format!(
                    "  ... and {} more\n",
                    identities.len() - max_listed
                ));
            }
            out
        }
        Resolution::NotFound => format!("{}\n", NOT_FOUND_MESSAGE),
    }
}

/// Formats a resolution as pretty-printed JSON, tagged with the token.
pub fn format_resolution_as_json(token: &str, resolution: &Resolution) -> String {
    let value = json!({
        "token": token,
        "resolution": resolution,
    });
    serde_json::to_string_pretty(&value).unwrap_or_default()
}

/// Formats the ranked candidates of an explain run, one per line.
pub fn format_matches_as_text(token: &str, matches: &[ScoredMatch]) -> String {
    let mut out = format!("Candidates for '{}'\n", token);
    if matches.is_empty() {
        out.push_str("  (none)\n");
        return out;
    }
    for m in matches {
        out.push_str(&format!(
            "  {:.2}  {}  via {} in {} pool\n",
            m.score,
            format_identity(&m.identity),
            m.kind.as_str(),
            m.pool.as_str(),
        ));
    }
    out
}

/// Formats the outcome of a batch resolution.
pub fn format_summary_as_text(summary: &ResolutionSummary, max_listed: usize) -> String {
    let mut out = String::new();
    for outcome in &summary.outcomes {
        out.push_str(&format_resolution_as_text(
            &outcome.token,
            &outcome.resolution,
            max_listed,
        ));
    }
    out.push_str(&format!(
        "\n{} tokens: {} resolved, {} ambiguous, {} not found\n",
        summary.total, summary.resolved_count, summary.ambiguous_count, summary.not_found_count
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MatchKind, PoolKind};

    #[test]
    fn test_identity_with_tag_and_nickname() {
        let identity = Identity::new(111, "Bob")
            .with_discriminator(7)
            .with_nickname("Bobby");
        assert_eq!(format_identity(&identity), "Bobby [Bob#0007] (id 111)");
    }

    #[test]
    fn test_ambiguous_listing_is_truncated() {
        let resolution = Resolution::Ambiguous {
            identities: (1..=4).map(|i| Identity::new(i, format!("u{}", i))).collect(),
            score: 0.35,
        };
        let text = format_resolution_as_text("u", &resolution, 2);
        assert!(text.contains("4 members tie at score 0.35"));
        assert!(text.contains("u1 (id 1)"));
        assert!(!text.contains("u3 (id 3)"));
        assert!(text.contains("... and 2 more"));
    }

    #[test]
    fn test_not_found_message() {
        let text = format_resolution_as_text("zzz", &Resolution::NotFound, 10);
        assert_eq!(text.trim(), NOT_FOUND_MESSAGE);
    }

    #[test]
    fn test_json_carries_status_tag() {
        let json = format_resolution_as_json("zzz", &Resolution::NotFound);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["token"], "zzz");
        assert_eq!(parsed["resolution"]["status"], "not_found");
    }

    #[test]
    fn test_matches_listing() {
        let matches = vec![ScoredMatch {
            identity: Identity::new(1, "Alicia"),
            score: 0.35,
            kind: MatchKind::UsernamePrefix,
            pool: PoolKind::Channel,
        }];
        let text = format_matches_as_text("ali", &matches);
        assert!(text.contains("0.35  Alicia (id 1)  via username_prefix in channel pool"));
    }
}
