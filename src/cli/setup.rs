//! Bootstrap exporter
//!
//! Fetches the board's members, labels and lists concurrently and writes
//! each payload verbatim to its own JSON file, to help a human populate the
//! configuration. The fetched content is not validated.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use crate::board::BoardClient;
use crate::cli::Output;
use crate::storage::Config;

/// Fetches board metadata into `<out_dir>/{members,labels,lists}.json`
pub async fn run(
    client: &BoardClient,
    config: &Config,
    out_dir: &Path,
    output: &Output,
) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    tokio::try_join!(
        fetch_into(out_dir, "members.json", client.board_members(&config.board)),
        fetch_into(out_dir, "labels.json", client.board_labels(&config.board)),
        fetch_into(out_dir, "lists.json", client.board_lists(&config.board)),
    )?;

    output.success(&format!(
        "Use the files in {}/ to set up {}",
        out_dir.display(),
        super::CONFIG_PATH
    ));

    Ok(())
}

async fn fetch_into(
    out_dir: &Path,
    file_name: &str,
    fetch: impl std::future::Future<Output = Result<Value>>,
) -> Result<()> {
    let value = fetch.await?;
    write_pretty(&out_dir.join(file_name), &value)
}

/// Writes a payload pretty-printed with 4-space indentation
fn write_pretty(path: &Path, value: &Value) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .context("Failed to serialize board payload")?;

    fs::write(path, buf).with_context(|| format!("Failed to write {}", path.display()))
}
