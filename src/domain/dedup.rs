//! Duplicate detection against the existing-card snapshot
//!
//! The snapshot of cards on the target list is fetched once at the start of
//! a run and never refreshed, so duplicates are only detected against cards
//! that existed before the run, not against cards the run itself creates.

use serde::Deserialize;

use crate::domain::resolve::ResolvedTask;

/// Label reference as it appears on an existing card
#[derive(Debug, Clone, Deserialize)]
pub struct CardLabel {
    pub id: String,
}

/// A card already present on the target list
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingCard {
    pub name: String,

    #[serde(default)]
    pub id_members: Vec<String>,

    #[serde(default)]
    pub labels: Vec<CardLabel>,
}

/// Tests whether a resolved task already exists on the target list
///
/// A task is a duplicate iff some existing card has the same name, a member
/// set of the same size whose every id appears in the resolved member list,
/// and a label set of the same size whose every id appears in the resolved
/// label set. Order never matters.
pub fn is_duplicate(task: &ResolvedTask, existing: &[ExistingCard]) -> bool {
    existing.iter().any(|card| {
        card.name == task.name
            && card.id_members.len() == task.member_ids.len()
            && card
                .id_members
                .iter()
                .all(|m| task.member_ids.contains(m))
            && card.labels.len() == task.label_ids.len()
            && card.labels.iter().all(|l| task.label_ids.contains(&l.id))
    })
}
