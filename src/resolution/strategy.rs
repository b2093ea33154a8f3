//! The data-driven strategy table.
//!
//! Every rule is evaluated against every pool it defines a tier for; rules
//! never see each other's output.

use crate::types::{Identity, MatchKind, PoolKind, ScoredMatch};

use super::token::{eq_ignore_case, starts_with_ignore_case, ParsedToken};

/// Whether a candidate matched with the caller's exact letter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseMatch {
    Exact,
    Folded,
}

/// Score pair for one rule in one pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier {
    pub exact: f32,
    pub folded: f32,
}

impl Tier {
    const fn new(exact: f32, folded: f32) -> Self {
        Self { exact, folded }
    }

    /// Tier for id-based rules, which have no case distinction.
    const fn fixed(score: f32) -> Self {
        Self::new(score, score)
    }

    pub fn score(&self, case: CaseMatch) -> f32 {
        match case {
            CaseMatch::Exact => self.exact,
            CaseMatch::Folded => self.folded,
        }
    }
}

/// One row of the strategy table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub kind: MatchKind,
    /// Tier for channel-pool hits; `None` if the rule skips the channel pool.
    pub channel: Option<Tier>,
    pub community: Tier,
}

/// All matching rules with their per-pool score tiers.
pub const RULES: [Rule; 7] = [
    Rule {
        kind: MatchKind::Mention,
        channel: None,
        community: Tier::fixed(1.00),
    },
    Rule {
        kind: MatchKind::Id,
        channel: None,
        community: Tier::fixed(0.90),
    },
    Rule {
        kind: MatchKind::UsernameTag,
        channel: Some(Tier::new(0.85, 0.75)),
        community: Tier::new(0.80, 0.70),
    },
    Rule {
        kind: MatchKind::Username,
        channel: Some(Tier::new(0.65, 0.55)),
        community: Tier::new(0.60, 0.50),
    },
    Rule {
        kind: MatchKind::Nickname,
        channel: Some(Tier::new(0.65, 0.55)),
        community: Tier::new(0.60, 0.50),
    },
    Rule {
        kind: MatchKind::UsernamePrefix,
        channel: Some(Tier::new(0.45, 0.35)),
        community: Tier::new(0.40, 0.30),
    },
    Rule {
        kind: MatchKind::NicknamePrefix,
        channel: Some(Tier::new(0.45, 0.35)),
        community: Tier::new(0.40, 0.30),
    },
];

impl Rule {
    /// Returns the tier this rule applies to the given pool, if any.
    pub fn tier(&self, pool: PoolKind) -> Option<Tier> {
        match pool {
            PoolKind::Channel => self.channel,
            PoolKind::Community => Some(self.community),
        }
    }

    /// Runs the rule over one pool and returns every candidate it accepts.
    pub fn evaluate(
        &self,
        token: &ParsedToken<'_>,
        pool_kind: PoolKind,
        pool: &[Identity],
    ) -> Vec<ScoredMatch> {
        let Some(tier) = self.tier(pool_kind) else {
            return Vec::new();
        };

        pool.iter()
            .filter_map(|identity| {
                self.compare(token, identity).map(|case| ScoredMatch {
                    identity: identity.clone(),
                    score: tier.score(case),
                    kind: self.kind,
                    pool: pool_kind,
                })
            })
            .collect()
    }

    /// Decides whether `identity` satisfies this rule for `token`.
    ///
    /// A missing nickname or tag disqualifies the candidate.
    pub fn compare(&self, token: &ParsedToken<'_>, identity: &Identity) -> Option<CaseMatch> {
        match self.kind {
            MatchKind::Mention => token
                .mention
                .filter(|id| *id == identity.id)
                .map(|_| CaseMatch::Exact),
            MatchKind::Id => token
                .id
                .filter(|id| *id == identity.id)
                .map(|_| CaseMatch::Exact),
            MatchKind::UsernameTag => {
                let (name, tag) = token.tag?;
                if identity.discriminator != Some(tag) {
                    return None;
                }
                compare_equals(name, &identity.username)
            }
            MatchKind::Username => compare_equals(token.raw, &identity.username),
            MatchKind::Nickname => compare_equals(token.raw, identity.nickname.as_deref()?),
            MatchKind::UsernamePrefix => compare_prefix(token.raw, &identity.username),
            MatchKind::NicknamePrefix => compare_prefix(token.raw, identity.nickname.as_deref()?),
        }
    }
}

fn compare_equals(input: &str, text: &str) -> Option<CaseMatch> {
    if !eq_ignore_case(input, text) {
        return None;
    }
    Some(if input == text {
        CaseMatch::Exact
    } else {
        CaseMatch::Folded
    })
}

fn compare_prefix(input: &str, text: &str) -> Option<CaseMatch> {
    if !starts_with_ignore_case(text, input) {
        return None;
    }
    Some(if text.starts_with(input) {
        CaseMatch::Exact
    } else {
        CaseMatch::Folded
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(kind: MatchKind) -> Rule {
        RULES
            .iter()
            .copied()
            .find(|r| r.kind == kind)
            .expect("rule present in table")
    }

    #[test]
    fn test_every_tier_prefers_exact_case() {
        for r in RULES.iter() {
            for pool in [PoolKind::Channel, PoolKind::Community] {
                if let Some(tier) = r.tier(pool) {
                    assert!(tier.exact >= tier.folded, "{:?} in {:?}", r.kind, pool);
                    if !matches!(r.kind, MatchKind::Mention | MatchKind::Id) {
                        assert!(tier.exact > tier.folded, "{:?} in {:?}", r.kind, pool);
                    }
                }
            }
        }
    }

    #[test]
    fn test_channel_tiers_outscore_community_tiers() {
        for r in RULES.iter() {
            if let Some(channel) = r.channel {
                assert!(channel.exact > r.community.exact);
                assert!(channel.folded > r.community.folded);
            }
        }
    }

    #[test]
    fn test_equals_outscores_prefix() {
        let pairs = [
            (MatchKind::Username, MatchKind::UsernamePrefix),
            (MatchKind::Nickname, MatchKind::NicknamePrefix),
        ];
        for (equals, prefix) in pairs {
            for pool in [PoolKind::Channel, PoolKind::Community] {
                let e = rule(equals).tier(pool).unwrap();
                let p = rule(prefix).tier(pool).unwrap();
                assert!(e.folded > p.exact, "{:?} vs {:?}", equals, prefix);
            }
        }
    }

    #[test]
    fn test_id_rules_skip_channel_pool() {
        let pool = vec![Identity::new(111, "Bob")];
        let token = ParsedToken::parse("111");
        assert!(rule(MatchKind::Id)
            .evaluate(&token, PoolKind::Channel, &pool)
            .is_empty());
        let hits = rule(MatchKind::Id).evaluate(&token, PoolKind::Community, &pool);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].score, 0.90);
    }

    #[test]
    fn test_missing_nickname_disqualifies() {
        let identity = Identity::new(1, "Bob");
        let token = ParsedToken::parse("Bob");
        assert_eq!(rule(MatchKind::Nickname).compare(&token, &identity), None);
        assert_eq!(rule(MatchKind::NicknamePrefix).compare(&token, &identity), None);
        assert_eq!(
            rule(MatchKind::Username).compare(&token, &identity),
            Some(CaseMatch::Exact)
        );
    }

    #[test]
    fn test_tag_requires_matching_discriminator() {
        let tagged = Identity::new(1, "Bob").with_discriminator(4521);
        let untagged = Identity::new(2, "Bob");
        let r = rule(MatchKind::UsernameTag);

        assert_eq!(
            r.compare(&ParsedToken::parse("bob#4521"), &tagged),
            Some(CaseMatch::Folded)
        );
        assert_eq!(r.compare(&ParsedToken::parse("Bob#4522"), &tagged), None);
        assert_eq!(r.compare(&ParsedToken::parse("Bob#4521"), &untagged), None);
        assert_eq!(r.compare(&ParsedToken::parse("Bob#abcd"), &tagged), None);
    }

    #[test]
    fn test_prefix_case_is_judged_on_matched_part() {
        let identity = Identity::new(1, "Alicia");
        let r = rule(MatchKind::UsernamePrefix);
        assert_eq!(
            r.compare(&ParsedToken::parse("Ali"), &identity),
            Some(CaseMatch::Exact)
        );
        assert_eq!(
            r.compare(&ParsedToken::parse("ali"), &identity),
            Some(CaseMatch::Folded)
        );
        assert_eq!(r.compare(&ParsedToken::parse("Alx"), &identity), None);
    }
}
