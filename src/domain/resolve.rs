//! Row classification and label/member resolution
//!
//! Rows are processed strictly in file order. Category headers update an
//! ambient [`CategoryContext`]; leaf tasks inherit the context's matched
//! label ids, extend them with their own keyword matches and resolve their
//! resource names to member ids. The context is an explicit accumulator
//! threaded through [`Resolver::resolve`], never module-level state.

use std::collections::{BTreeSet, HashMap};

use anyhow::Result;
use thiserror::Error;

use crate::domain::matcher::KeywordMatcher;
use crate::storage::config::{Config, LabelRule};
use crate::storage::tasks::TaskRow;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// A resource name with no entry in the user map aborts the whole run;
    /// a silent partial import would be worse than a hard stop.
    #[error(
        "Unknown resource name \"{name}\" on task \"{task}\" \
         (add it to \"users\" in the config)"
    )]
    UnknownUser { name: String, task: String },
}

/// A label rule with its keyword list compiled
struct CompiledRule {
    id: String,
    matcher: KeywordMatcher,
    parent: Option<String>,
    category_only: bool,
}

/// All label rules, compiled once per run
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    pub fn compile(rules: &[LabelRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                Ok(CompiledRule {
                    id: rule.id.clone(),
                    matcher: KeywordMatcher::new(&rule.keywords)?,
                    parent: rule.parent.clone(),
                    category_only: rule.search_only_in_category,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }
}

/// Ambient category state, inherited by leaf tasks until the next header
#[derive(Debug, Clone, Default)]
pub struct CategoryContext {
    pub category: String,
    pub label_ids: BTreeSet<String>,
}

/// Normalized task identity, used for both duplicate comparison and the
/// card-creation payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTask {
    pub name: String,
    pub label_ids: BTreeSet<String>,
    pub member_ids: Vec<String>,
}

/// What a row turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// Category header; the context was updated, no card results
    Header,
    /// Leaf task discarded by the skip-keyword list
    Skipped,
    /// Leaf task ready for duplicate check and creation
    Task(ResolvedTask),
}

/// Classifies rows and resolves leaf tasks against the configured rules
pub struct Resolver {
    rules: RuleSet,
    skip: Option<KeywordMatcher>,
    users: HashMap<String, String>,
}

impl Resolver {
    /// Builds a resolver from the loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let skip = if config.skip.is_empty() {
            None
        } else {
            Some(KeywordMatcher::new(&config.skip)?)
        };

        Ok(Self {
            rules: RuleSet::compile(&config.labels)?,
            skip,
            users: config.users.clone(),
        })
    }

    /// Processes one row, updating the ambient context in place
    pub fn resolve(
        &self,
        ctx: &mut CategoryContext,
        row: &TaskRow,
    ) -> Result<RowOutcome, ResolveError> {
        if row.is_header() {
            self.enter_category(ctx, &row.category);
            return Ok(RowOutcome::Header);
        }

        if let Some(skip) = &self.skip {
            if skip.is_match(&row.category) || skip.is_match(&ctx.category) {
                return Ok(RowOutcome::Skipped);
            }
        }

        let mut label_ids = ctx.label_ids.clone();
        for rule in &self.rules.rules {
            if rule.parent.as_deref().is_some_and(|p| p != ctx.category) {
                continue;
            }
            if rule.matcher.is_match(&row.category)
                || (!rule.category_only && rule.matcher.is_match(&row.name))
            {
                label_ids.insert(rule.id.clone());
            }
        }

        let member_ids = row
            .resources
            .iter()
            .map(|name| {
                self.users
                    .get(name)
                    .cloned()
                    .ok_or_else(|| ResolveError::UnknownUser {
                        name: name.clone(),
                        task: row.name.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RowOutcome::Task(ResolvedTask {
            name: row.name.clone(),
            label_ids,
            member_ids,
        }))
    }

    /// Enters a new category: replaces the ambient category and recomputes
    /// the inherited label set from scratch
    fn enter_category(&self, ctx: &mut CategoryContext, category: &str) {
        ctx.category = category.to_string();
        ctx.label_ids = self
            .rules
            .rules
            .iter()
            .filter(|rule| rule.parent.as_deref().is_none_or(|p| p == category))
            .filter(|rule| rule.matcher.is_match(category))
            .map(|rule| rule.id.clone())
            .collect();
    }
}
