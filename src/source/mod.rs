//! Keyword sources
//!
//! A keyword source yields the ordered sequence of search strings a batch is
//! built from. The core only reads from it.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while reading keywords
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read keywords from {}: {}", path.display(), source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Trait for anything that can provide the batch's keywords
pub trait KeywordSource {
    /// Returns the keywords in order
    fn keywords(&self) -> Result<Vec<String>, SourceError>;
}

/// A fixed, in-memory keyword list
#[derive(Debug, Clone, Default)]
pub struct StaticKeywords {
    keywords: Vec<String>,
}

impl StaticKeywords {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }
}

impl KeywordSource for StaticKeywords {
    fn keywords(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.keywords.clone())
    }
}

/// Reads one keyword per line from a UTF-8 text file
///
/// Lines are trimmed and blank lines are skipped. With `skip_header` the
/// first line is dropped before anything else.
#[derive(Debug, Clone)]
pub struct LineFileKeywords {
    path: PathBuf,
    skip_header: bool,
}

impl LineFileKeywords {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            skip_header: false,
        }
    }

    pub fn with_header(mut self, skip_header: bool) -> Self {
        self.skip_header = skip_header;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeywordSource for LineFileKeywords {
    fn keywords(&self) -> Result<Vec<String>, SourceError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;

        let skip = usize::from(self.skip_header);
        Ok(content
            .lines()
            .skip(skip)
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}
