//! Task file reading
//!
//! The task file is a semicolon-delimited CSV with no header row; column
//! semantics are positional: `category;name;duration;resourceNames`. The
//! resource column is itself a `;`-joined sub-list, so every field past the
//! third is a resource name. Rows are produced lazily, in file order, in a
//! single pass.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskFileError {
    #[error("You must provide the task file at {0}")]
    Missing(String),

    #[error("Failed to open task file {0}: {1}")]
    Open(String, #[source] std::io::Error),
}

/// One parsed row of the task file
///
/// A row with an empty resource list is a category header: it sets the
/// ambient category for the leaf tasks that follow it. A row with at least
/// one resource name is a leaf task and becomes one card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub category: String,
    pub name: String,
    pub duration: String,
    pub resources: Vec<String>,
}

impl TaskRow {
    /// Parses a row from one raw line
    pub fn parse(line: &str) -> Self {
        let fields: Vec<&str> = line.split(';').collect();

        let field = |i: usize| fields.get(i).copied().unwrap_or("").to_string();

        let resources = fields
            .iter()
            .skip(3)
            .filter(|f| !f.is_empty())
            .map(|f| f.to_string())
            .collect();

        Self {
            category: field(0),
            name: field(1),
            duration: field(2),
            resources,
        }
    }

    /// Returns true if this row is a category header rather than a task
    pub fn is_header(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Lazy, single-pass reader over the task file
#[derive(Debug)]
pub struct TaskReader {
    lines: Lines<BufReader<File>>,
    line_num: usize,
}

impl TaskReader {
    /// Opens the task file, failing if it does not exist
    pub fn open(path: &Path) -> Result<Self, TaskFileError> {
        if !path.exists() {
            return Err(TaskFileError::Missing(path.display().to_string()));
        }

        let file = File::open(path)
            .map_err(|e| TaskFileError::Open(path.display().to_string(), e))?;

        Ok(Self {
            lines: BufReader::new(file).lines(),
            line_num: 0,
        })
    }
}

impl Iterator for TaskReader {
    type Item = Result<TaskRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line_num += 1;
            match self.lines.next()? {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => return Some(Ok(TaskRow::parse(&line))),
                Err(e) => {
                    return Some(
                        Err(e).with_context(|| format!("Failed to read line {}", self.line_num)),
                    )
                }
            }
        }
    }
}
