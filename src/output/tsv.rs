//! Tab-separated summary sink

use crate::output::traits::{OutputResult, ResultSink};
use crate::state::BatchEntry;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const HEADER: &str = "keyword\tstatus\tlinks";

/// Buffers every report and writes one row per URL, in batch order, on finish
///
/// Columns are the keyword (or URL), `ok` or the failure label, and the links
/// joined by a single space.
#[derive(Debug, Clone)]
pub struct TsvSink {
    path: PathBuf,
    rows: Vec<(usize, String)>,
}

impl TsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            rows: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Formats one entry as a TSV row without the trailing newline
pub fn format_row(entry: &BatchEntry) -> String {
    let (status, links) = match &entry.outcome {
        Ok(links) => (
            "ok".to_string(),
            links.iter().map(|link| escape(link)).collect::<Vec<_>>().join(" "),
        ),
        Err(failure) => (failure.kind.label(), String::new()),
    };

    format!("{}\t{}\t{}", escape(entry.label()), status, links)
}

/// Replaces characters that would break the row structure
fn escape(field: &str) -> String {
    field
        .chars()
        .map(|c| match c {
            '\t' | '\n' | '\r' => ' ',
            c => c,
        })
        .collect()
}

impl ResultSink for TsvSink {
    fn record(&mut self, entry: &BatchEntry) -> OutputResult<()> {
        self.rows.push((entry.index, format_row(entry)));
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        self.rows.sort_by_key(|(index, _)| *index);

        let mut writer = BufWriter::new(File::create(&self.path)?);
        writeln!(writer, "{}", HEADER)?;
        for (_, row) in &self.rows {
            writeln!(writer, "{}", row)?;
        }
        writer.flush()?;

        tracing::info!("Wrote {} rows to {}", self.rows.len(), self.path.display());
        Ok(())
    }
}
