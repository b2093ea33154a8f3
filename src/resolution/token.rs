//! Token parsing and case-folded text comparison.

/// The forms a typed token can take, parsed once per resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedToken<'a> {
    /// The token exactly as supplied by the caller.
    pub raw: &'a str,
    /// Member id if the token is a mention such as `<@111>` or `<@!111>`.
    pub mention: Option<u64>,
    /// Member id if the token is nothing but ASCII digits.
    pub id: Option<u64>,
    /// `(name, tag)` if the token ends in `#` followed by a numeric tag.
    pub tag: Option<(&'a str, u16)>,
}

impl<'a> ParsedToken<'a> {
    pub fn parse(raw: &'a str) -> Self {
        Self {
            raw,
            mention: parse_mention(raw),
            id: parse_id(raw),
            tag: split_tag(raw),
        }
    }
}

/// Parses a user mention of the form `<@ID>` or `<@!ID>`.
pub fn parse_mention(token: &str) -> Option<u64> {
    let inner = token.strip_prefix("<@")?.strip_suffix('>')?;
    let inner = inner.strip_prefix('!').unwrap_or(inner);
    parse_id(inner)
}

/// Parses a bare numeric id. Signs, whitespace and overflow are rejected.
pub fn parse_id(token: &str) -> Option<u64> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Splits `name#tag` at the last `#`. The tag must be a decimal `u16`.
pub fn split_tag(token: &str) -> Option<(&str, u16)> {
    let index = token.rfind('#')?;
    let tag = &token[index + 1..];
    if tag.is_empty() || !tag.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((&token[..index], tag.parse().ok()?))
}

/// Case-insensitive equality using per-character lowercase mapping.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Case-insensitive `haystack.starts_with(prefix)`.
pub fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    let mut hay = haystack.chars().flat_map(char::to_lowercase);
    prefix
        .chars()
        .flat_map(char::to_lowercase)
        .all(|p| hay.next() == Some(p))
}
