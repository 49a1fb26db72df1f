//! A conditional filtering and expected-value model for pachislot hall data.
//! Parses the localized range-condition vocabulary, filters historical play records by a
//! conjunction of per-attribute predicates, and derives payout and expected-value
//! statistics per machine profile.

pub mod cache;
pub mod condition;
pub mod criteria;
pub mod eval;
pub mod file;
pub mod filter;
pub mod print;
pub mod profile;
pub mod record;
pub mod summary;

#[cfg(test)]
pub(crate) mod testing;

#[doc = include_str!("../README.md")]
#[cfg(doc)]
fn readme() {}
