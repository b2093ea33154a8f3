use tracing::debug;

use crate::types::*;

use super::aggregate::{aggregate, ResultMap};
use super::select::select;
use super::strategy::RULES;
use super::token::ParsedToken;

/// Resolves typed tokens into members of a community.
///
/// Borrows two pre-fetched pools for its lifetime: the members visible in
/// the current channel, and every member of the community. Resolution is a
/// pure function of the token and these snapshots.
pub struct MemberResolver<'a> {
    channel: &'a [Identity],
    community: &'a [Identity],
}

impl<'a> MemberResolver<'a> {
    /// Creates a resolver over the given channel and community pools.
    pub fn new(channel: &'a [Identity], community: &'a [Identity]) -> Self {
        Self { channel, community }
    }

    fn pool(&self, kind: PoolKind) -> &'a [Identity] {
        match kind {
            PoolKind::Channel => self.channel,
            PoolKind::Community => self.community,
        }
    }

    /// Runs every rule against every pool and returns all proposals.
    ///
    /// No rule short-circuits another. An empty token is a prefix of every
    /// name, so it lands every member in the prefix tiers.
    pub fn collect_matches(&self, token: &str) -> Vec<ScoredMatch> {
        let parsed = ParsedToken::parse(token);
        let mut matches = Vec::new();

        for rule in RULES.iter() {
            for pool in [PoolKind::Channel, PoolKind::Community] {
                let hits = rule.evaluate(&parsed, pool, self.pool(pool));
                if !hits.is_empty() {
                    debug!(
                        token,
                        rule = rule.kind.as_str(),
                        pool = pool.as_str(),
                        hits = hits.len(),
                        "strategy matched"
                    );
                }
                matches.extend(hits);
            }
        }

        matches
    }

    /// Aggregates every proposal into the best score per member.
    pub fn score(&self, token: &str) -> ResultMap {
        aggregate(self.collect_matches(token))
    }

    /// Resolves a single token.
    pub fn resolve(&self, token: &str) -> Resolution {
        let map = self.score(token);
        let resolution = select(&map);
        debug!(
            token,
            candidates = map.len(),
            top_score = ?resolution.score(),
            bracket = resolution.identities().len(),
            "token resolved"
        );
        resolution
    }

    /// Returns every aggregated candidate for a token, best first.
    pub fn explain(&self, token: &str) -> Vec<ScoredMatch> {
        self.score(token).into_ranked()
    }

    /// Resolves a batch of tokens, returning per-token outcomes and totals.
    pub fn resolve_all<S: AsRef<str>>(&self, tokens: &[S]) -> ResolutionSummary {
        let mut summary = ResolutionSummary {
            total: tokens.len(),
            ..ResolutionSummary::default()
        };

        for token in tokens {
            let token = token.as_ref();
            let resolution = self.resolve(token);
            match &resolution {
                Resolution::Resolved { .. } => summary.resolved_count += 1,
                Resolution::Ambiguous { .. } => summary.ambiguous_count += 1,
                Resolution::NotFound => summary.not_found_count += 1,
            }
            summary.outcomes.push(TokenResolution {
                token: token.to_string(),
                resolution,
            });
        }

        summary
    }
}

/// Resolves `token` against the two pools without keeping a resolver around.
pub fn resolve(token: &str, channel: &[Identity], community: &[Identity]) -> Resolution {
    MemberResolver::new(channel, community).resolve(token)
}
