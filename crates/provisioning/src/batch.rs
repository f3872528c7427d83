use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use anyhow::Context;
use serde_json::Value;

use crate::action::{UserAction, UserActions};
use crate::dispatcher::Dispatcher;
use crate::error::ActionError;
use crate::result::ActionResult;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

fn text_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Runs every action of a `useractions` document in order and writes one
/// audit row per action.
pub struct BatchRunner {
    dispatcher: Dispatcher,
}

impl BatchRunner {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Opens both files before the first row is touched; failing to open
    /// either aborts the run.
    pub async fn run_files(&self, input: &Path, output: &Path) -> anyhow::Result<BatchSummary> {
        let reader = File::open(input)
            .map(BufReader::new)
            .map_err(|e| {
                tracing::error!("CRITICAL: unable to open input file {}: {e}", input.display());
                e
            })
            .with_context(|| format!("unable to open input file {}", input.display()))?;
        tracing::info!("opened input file: {}", input.display());
        let writer = File::create(output)
            .map_err(|e| {
                tracing::error!("CRITICAL: unable to open output file {}: {e}", output.display());
                e
            })
            .with_context(|| format!("unable to open output file {}", output.display()))?;
        tracing::info!("opened output file: {}", output.display());
        let summary = self.run(reader, writer).await;
        tracing::info!("closed input file: {}", input.display());
        tracing::info!("closed output file: {}", output.display());
        summary
    }

    pub async fn run<R, W>(&self, reader: R, writer: W) -> anyhow::Result<BatchSummary>
    where
        R: Read,
        W: Write,
    {
        let document: UserActions = serde_json::from_reader(reader).map_err(|e| {
            tracing::error!("CRITICAL: unable to parse input document: {e}");
            anyhow::Error::from(e).context("unable to parse input document")
        })?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        writer.write_record(["action", "username", "result"])?;
        writer.flush()?;

        let mut summary = BatchSummary::default();
        for row in document.useractions {
            let result = self.run_row(row).await;
            summary.total += 1;
            if result.is_success() {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }
            writer.serialize(&result)?;
            writer.flush()?;
        }
        tracing::info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "batch finished"
        );
        Ok(summary)
    }

    async fn run_row(&self, row: Value) -> ActionResult {
        let action_name = text_field(&row, "action");
        let username = text_field(&row, "username");
        match UserAction::from_value(row) {
            Ok(action) => {
                let outcome = self.dispatcher.dispatch(&action).await;
                ActionResult::new(action_name, username, &outcome)
            }
            Err(err) => {
                tracing::error!("CRITICAL: unknown error while processing row: {err}");
                let outcome = Err(ActionError::Unexpected(err.to_string()));
                ActionResult::new(action_name, username, &outcome)
            }
        }
    }
}
