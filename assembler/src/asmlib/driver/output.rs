use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{event, Level};

use super::super::types::{AssemblerFailure, IoAction, IoFailed, IoTarget};

/// Where a listing or the expanded program is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    /// The named file, or standard output if there is no name.
    pub fn from_option(path: Option<&Path>) -> Destination {
        match path {
            Some(p) => Destination::File(p.to_path_buf()),
            None => Destination::Stdout,
        }
    }

    fn target(&self) -> IoTarget {
        match self {
            Destination::Stdout => IoTarget::Stdout,
            Destination::File(p) => IoTarget::File(p.clone()),
        }
    }

    /// Write `text` to this destination.  A file is created or
    /// truncated.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be created or written.
    pub fn write_text(&self, text: &str) -> Result<(), AssemblerFailure> {
        let inner = || -> Result<(), std::io::Error> {
            match self {
                Destination::Stdout => {
                    let mut out = std::io::stdout().lock();
                    out.write_all(text.as_bytes())?;
                    out.flush()
                }
                Destination::File(path) => {
                    let mut f = OpenOptions::new()
                        .create(true)
                        .write(true)
                        .truncate(true)
                        .open(path)?;
                    f.write_all(text.as_bytes())?;
                    f.flush()
                }
            }
        };
        event!(
            Level::DEBUG,
            "writing {} byte(s) to {:?}",
            text.len(),
            self.target()
        );
        inner().map_err(|error| {
            AssemblerFailure::Io(IoFailed {
                action: IoAction::Write,
                target: self.target(),
                error,
            })
        })
    }
}
