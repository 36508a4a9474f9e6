//! Planport - import a project plan into a Trello board
//!
//! Planport reads tasks exported from a scheduling tool as a
//! semicolon-delimited CSV, creates one card per leaf task on a configured
//! board list, tags each card with labels derived from keyword matching and
//! assigns members through a name-to-member-id map. A `--setup` mode fetches
//! board members, labels and lists to help bootstrap the configuration file.

pub mod board;
pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::{KeywordMatcher, ResolvedTask, Resolver, RowOutcome};
pub use storage::{Config, TaskRow};
