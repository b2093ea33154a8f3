use std::collections::BTreeMap;

use crate::types::ScoredMatch;

/// Best match per member id across every strategy and pool.
///
/// Holds at most one entry per id, and that entry carries the highest score
/// ever proposed for the id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultMap {
    entries: BTreeMap<u64, ScoredMatch>,
}

impl ResultMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&ScoredMatch> {
        self.entries.get(&id)
    }

    /// Iterates entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &ScoredMatch> {
        self.entries.values()
    }

    /// Highest score in the map, or `None` if it is empty.
    pub fn top_score(&self) -> Option<f32> {
        self.entries
            .values()
            .map(|m| m.score)
            .fold(None, |best, s| match best {
                Some(b) if b >= s => Some(b),
                _ => Some(s),
            })
    }

    /// Entries tied at the top score, in ascending id order.
    pub fn bracket(&self) -> Vec<&ScoredMatch> {
        match self.top_score() {
            Some(top) => self.entries.values().filter(|m| m.score == top).collect(),
            None => Vec::new(),
        }
    }

    /// Merges another map into this one, keeping the higher score per id.
    pub fn combine(self, other: ResultMap) -> ResultMap {
        other.entries.into_values().fold(self, merge_max)
    }

    /// Consumes the map and returns its entries best-first, ties by id.
    pub fn into_ranked(self) -> Vec<ScoredMatch> {
        let mut ranked: Vec<ScoredMatch> = self.entries.into_values().collect();
        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.identity.id.cmp(&b.identity.id))
        });
        ranked
    }
}

/// Folds one candidate into the map.
///
/// The stored entry is replaced only by a strictly higher score, so an
/// equal-scored later proposal never displaces an earlier one.
pub fn merge_max(mut map: ResultMap, candidate: ScoredMatch) -> ResultMap {
    let id = candidate.identity.id;
    let improves = map
        .entries
        .get(&id)
        .map_or(true, |current| candidate.score > current.score);
    if improves {
        map.entries.insert(id, candidate);
    }
    map
}

/// Builds a `ResultMap` from every proposed candidate.
pub fn aggregate<I>(matches: I) -> ResultMap
where
    I: IntoIterator<Item = ScoredMatch>,
{
    matches.into_iter().fold(ResultMap::new(), merge_max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Identity, MatchKind, PoolKind};

    fn scored(id: u64, name: &str, score: f32) -> ScoredMatch {
        ScoredMatch {
            identity: Identity::new(id, name),
            score,
            kind: MatchKind::Username,
            pool: PoolKind::Community,
        }
    }

    #[test]
    fn test_merge_keeps_maximum_regardless_of_order() {
        let forward = aggregate(vec![scored(1, "a", 0.30), scored(1, "a", 0.85)]);
        let backward = aggregate(vec![scored(1, "a", 0.85), scored(1, "a", 0.30)]);
        assert_eq!(forward.len(), 1);
        assert_eq!(forward.get(1).unwrap().score, 0.85);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_equal_score_keeps_first() {
        let map = aggregate(vec![scored(1, "first", 0.5), scored(1, "second", 0.5)]);
        assert_eq!(map.get(1).unwrap().identity.username, "first");
    }

    #[test]
    fn test_combine_is_max_reducing() {
        let left = aggregate(vec![scored(1, "a", 0.4), scored(2, "b", 0.9)]);
        let right = aggregate(vec![scored(1, "a", 0.6), scored(2, "b", 0.1)]);
        let merged = left.clone().combine(right.clone());
        assert_eq!(merged.get(1).unwrap().score, 0.6);
        assert_eq!(merged.get(2).unwrap().score, 0.9);
        assert_eq!(merged, right.combine(left));
    }

    #[test]
    fn test_bracket_and_ranking() {
        let map = aggregate(vec![
            scored(3, "c", 0.35),
            scored(1, "a", 0.35),
            scored(2, "b", 0.30),
        ]);
        assert_eq!(map.top_score(), Some(0.35));
        let ids: Vec<u64> = map.bracket().iter().map(|m| m.identity.id).collect();
        assert_eq!(ids, vec![1, 3]);
        let ranked: Vec<u64> = map.into_ranked().iter().map(|m| m.identity.id).collect();
        assert_eq!(ranked, vec![1, 3, 2]);
    }

    #[test]
    fn test_empty_map_has_no_top_score() {
        let map = ResultMap::new();
        assert!(map.is_empty());
        assert_eq!(map.top_score(), None);
        assert!(map.bracket().is_empty());
    }
}
