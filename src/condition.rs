//! A [Condition] is a numeric predicate parsed from the localized vocabulary used by the
//! hall-data option lists, e.g. `"501～1,000G"`, `"-2,001枚以下"` or `"5スルー以上"`.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

/// Unit and thousands-separator tokens stripped before any numeric parsing. Order-independent;
/// all occurrences are removed.
const UNIT_TOKENS: [&str; 5] = [",", "枚", "G", "連", "スルー"];

/// Full-width wave dash separating the two bounds of a closed range.
const RANGE_SEPARATOR: char = '～';

const AT_MOST_SUFFIX: &str = "以下";
const AT_LEAST_SUFFIX: &str = "以上";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed condition \"{0}\"")]
pub struct MalformedCondition(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Equals(i64),
    Between(i64, i64),
    AtMost(i64),
    AtLeast(i64),
}
impl Condition {
    #[inline(always)]
    pub fn matches(&self, value: i64) -> bool {
        match self {
            Condition::Equals(bound) => value == *bound,
            Condition::Between(lo, hi) => (*lo..=*hi).contains(&value),
            Condition::AtMost(bound) => value <= *bound,
            Condition::AtLeast(bound) => value >= *bound,
        }
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Equals(bound) => write!(f, "{bound}"),
            Condition::Between(lo, hi) => write!(f, "{lo}{RANGE_SEPARATOR}{hi}"),
            Condition::AtMost(bound) => write!(f, "{bound}{AT_MOST_SUFFIX}"),
            Condition::AtLeast(bound) => write!(f, "{bound}{AT_LEAST_SUFFIX}"),
        }
    }
}

impl FromStr for Condition {
    type Err = MalformedCondition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut stripped = s.trim().to_string();
        for token in UNIT_TOKENS {
            stripped = stripped.replace(token, "");
        }
        let malformed = || MalformedCondition(s.to_string());
        if let Some((lo, hi)) = stripped.split_once(RANGE_SEPARATOR) {
            let lo = lo.parse().map_err(|_| malformed())?;
            let hi = hi.parse().map_err(|_| malformed())?;
            return Ok(Condition::Between(lo, hi));
        }
        if let Some(bound) = stripped.strip_suffix(AT_MOST_SUFFIX) {
            return bound.parse().map(Condition::AtMost).map_err(|_| malformed());
        }
        if let Some(bound) = stripped.strip_suffix(AT_LEAST_SUFFIX) {
            return bound.parse().map(Condition::AtLeast).map_err(|_| malformed());
        }
        stripped.parse().map(Condition::Equals).map_err(|_| malformed())
    }
}
