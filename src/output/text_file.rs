//! Per-URL text file sink
//!
//! Each successful URL gets `<directory>/<index>.txt`: the keyword (or the
//! URL when no keyword is attached) on the first line, then one link per line.

use crate::output::traits::{OutputResult, ResultSink};
use crate::state::BatchEntry;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes one text file per successful URL, named by batch index
#[derive(Debug, Clone)]
pub struct TextFileSink {
    directory: PathBuf,
    written: usize,
}

impl TextFileSink {
    /// Creates the sink, creating `directory` if it does not exist
    pub fn new(directory: impl Into<PathBuf>) -> OutputResult<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;
        Ok(Self {
            directory,
            written: 0,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the artifact for a batch index
    pub fn path_for(&self, index: usize) -> PathBuf {
        self.directory.join(format!("{}.txt", index))
    }

    /// Number of files written so far
    pub fn written(&self) -> usize {
        self.written
    }
}

impl ResultSink for TextFileSink {
    fn record(&mut self, entry: &BatchEntry) -> OutputResult<()> {
        let Some(links) = entry.links() else {
            tracing::debug!("No artifact for failed URL {}", entry.url);
            return Ok(());
        };

        let path = self.path_for(entry.index);
        let mut writer = BufWriter::new(File::create(&path)?);
        writeln!(writer, "{}", entry.label())?;
        for link in links {
            writeln!(writer, "{}", link)?;
        }
        writer.flush()?;

        self.written += 1;
        tracing::trace!(path = %path.display(), links = links.len(), "wrote result file");
        Ok(())
    }
}
