use crate::types::Resolution;

use super::aggregate::ResultMap;

/// Picks the top bracket of an aggregated map.
///
/// Ties are reported as `Ambiguous`; no entry is preferred over another.
pub fn select(map: &ResultMap) -> Resolution {
    let Some(score) = map.top_score() else {
        return Resolution::NotFound;
    };

    let mut bracket: Vec<_> = map
        .bracket()
        .into_iter()
        .map(|m| m.identity.clone())
        .collect();

    if bracket.len() == 1 {
        if let Some(identity) = bracket.pop() {
            return Resolution::Resolved { identity, score };
        }
    }

    Resolution::Ambiguous {
        identities: bracket,
        score,
    }
}
