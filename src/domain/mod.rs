//! Domain logic: keyword matching, row classification, duplicate detection

pub mod dedup;
pub mod matcher;
pub mod resolve;

pub use dedup::{is_duplicate, CardLabel, ExistingCard};
pub use matcher::KeywordMatcher;
pub use resolve::{CategoryContext, ResolveError, ResolvedTask, Resolver, RowOutcome, RuleSet};
