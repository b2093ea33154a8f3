/// Member resolution module.
///
/// Turns a typed token into a community member by running a fixed table of
/// matching rules over the channel and community pools, keeping the best
/// score per member, and returning the top-scoring bracket.
mod aggregate;
mod resolver;
mod select;
mod strategy;
mod token;

pub use aggregate::{aggregate, merge_max, ResultMap};
pub use resolver::{resolve, MemberResolver};
pub use select::select;
pub use strategy::{CaseMatch, Rule, Tier, RULES};
pub use token::{
    eq_ignore_case, parse_id, parse_mention, split_tag, starts_with_ignore_case, ParsedToken,
};
