//! Choosing what to convert
//!
//! The operator picks either one source file or a folder of them. The
//! choice is an explicit `Selection` value so the conversion code never
//! depends on how it was obtained: command-line flags, a terminal prompt,
//! or native dialogs when built with the `dialog` feature.

#[cfg(feature = "dialog")]
mod dialog;
mod prompt;


use std::path::{Path, PathBuf};

use thiserror::Error;

#[cfg(feature = "dialog")]
pub use dialog::DialogSelector;
pub use prompt::TerminalPrompt;

#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("Failed to read selection: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid selection {}: {reason}", path.display())]
    InvalidPath { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    File,
    Folder,
}

impl SelectionKind {
    /// Parses an operator answer, ignoring case and surrounding whitespace.
    pub fn parse(answer: &str) -> Option<Self> {
        match answer.trim().to_lowercase().as_str() {
            "file" => Some(SelectionKind::File),
            "folder" => Some(SelectionKind::Folder),
            _ => None,
        }
    }

    pub fn with_path(self, path: PathBuf) -> Selection {
        match self {
            SelectionKind::File => Selection::File(path),
            SelectionKind::Folder => Selection::Folder(path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    File(PathBuf),
    Folder(PathBuf),
}

impl Selection {
    pub fn kind(&self) -> SelectionKind {
        match self {
            Selection::File(_) => SelectionKind::File,
            Selection::Folder(_) => SelectionKind::Folder,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Selection::File(path) | Selection::Folder(path) => path,
        }
    }

    /// Checks that a file selection names an existing source file and a
    /// folder selection an existing directory.
    pub fn validate(self, source_extension: &str) -> Result<Self, SelectionError> {
        let invalid = |reason: String| SelectionError::InvalidPath {
            path: self.path().to_path_buf(),
            reason,
        };

        match &self {
            Selection::File(path) => {
                if !path.is_file() {
                    return Err(invalid("not an existing file".to_string()));
                }
                let suffix = format!(".{source_extension}");
                if !path.to_string_lossy().ends_with(&suffix) {
                    return Err(invalid(format!("expected a {suffix} file")));
                }
            }
            Selection::Folder(path) => {
                if !path.is_dir() {
                    return Err(invalid("not an existing folder".to_string()));
                }
            }
        }
        Ok(self)
    }
}

/// Source of a selection. `Ok(None)` means the operator cancelled.
pub trait Selector {
    fn select(&mut self) -> Result<Option<Selection>, SelectionError>;
}
