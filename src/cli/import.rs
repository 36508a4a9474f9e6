//! Import pipeline
//!
//! Streams task rows in file order through the resolver, checks each leaf
//! task against the snapshot of existing cards, and dispatches one
//! card-creation request per new task. Requests are fired as the stream is
//! consumed and joined once dispatching stops, whether the file ended or a
//! fatal row aborted it; a failed creation is logged with its payload and
//! does not fail the run.

use std::path::Path;

use anyhow::{Context, Result};
use futures::future::join_all;
use tokio::task::JoinHandle;

use crate::board::BoardClient;
use crate::cli::Output;
use crate::domain::{dedup, CategoryContext, ResolvedTask, Resolver, RowOutcome};
use crate::storage::{Config, TaskReader};

/// Runs the import against the configured target list
pub async fn run(
    client: &BoardClient,
    config: &Config,
    tasks_path: &Path,
    output: &Output,
) -> Result<()> {
    let list_id = config.require_target_list()?;
    let resolver = Resolver::from_config(config).context("Failed to compile label rules")?;
    let reader = TaskReader::open(tasks_path)?;

    // Snapshot taken once; cards created during this run are not part of it,
    // so identical tasks within one run are not deduplicated against each
    // other, only against pre-existing cards.
    let existing = client.list_cards(list_id).await?;

    let mut ctx = CategoryContext::default();
    let mut pending: Vec<JoinHandle<(String, Result<()>)>> = Vec::new();
    let mut duplicates = 0usize;
    let mut skipped = 0usize;
    let mut fatal: Option<anyhow::Error> = None;

    for row in reader {
        let outcome = row.and_then(|row| {
            resolver
                .resolve(&mut ctx, &row)
                .map_err(anyhow::Error::from)
        });
        match outcome {
            Ok(RowOutcome::Header) => {}
            Ok(RowOutcome::Skipped) => skipped += 1,
            Ok(RowOutcome::Task(task)) => {
                if dedup::is_duplicate(&task, &existing) {
                    output.info(&format!("Skipping duplicate card \"{}\"", task.name));
                    duplicates += 1;
                    continue;
                }
                pending.push(dispatch(client, list_id, task));
            }
            Err(e) => {
                // A fatal row stops dispatching immediately, but requests
                // already in flight still run to completion and get their
                // outcome logged before the error propagates.
                fatal = Some(e);
                break;
            }
        }
    }

    let dispatched = pending.len();
    let mut failed = 0usize;
    for joined in join_all(pending).await {
        match joined {
            Ok((name, Ok(()))) => output.info(&format!("Created card \"{}\"", name)),
            Ok((_, Err(e))) => {
                failed += 1;
                output.error(&format!("{:#}", e));
            }
            Err(e) => {
                failed += 1;
                output.error(&format!("Card creation task panicked: {}", e));
            }
        }
    }

    if let Some(e) = fatal {
        return Err(e);
    }

    output.success(&format!(
        "Imported {} card(s) ({} failed, {} duplicate(s), {} skipped)",
        dispatched - failed,
        failed,
        duplicates,
        skipped
    ));

    Ok(())
}

/// Fires a card-creation request without waiting for it
///
/// Once dispatched a request runs to completion; the join barrier at the end
/// of the stream collects its outcome.
fn dispatch(
    client: &BoardClient,
    list_id: &str,
    task: ResolvedTask,
) -> JoinHandle<(String, Result<()>)> {
    let client = client.clone();
    let list_id = list_id.to_string();
    tokio::spawn(async move {
        let result = client.create_card(&list_id, &task).await;
        (task.name, result)
    })
}
