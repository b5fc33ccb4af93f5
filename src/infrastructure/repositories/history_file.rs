use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::PathBuf;

use thiserror_no_std::Error;

use cheerlights_composer::HistoryRepository;

#[derive(Debug, Error)]
pub enum HistoryFileError {
    #[error("failed to read {path:?}: {err}")]
    Read { path: PathBuf, err: io::Error },
    #[error("failed to write {path:?}: {err}")]
    Write { path: PathBuf, err: io::Error },
}

/// Color history persisted as a single file
///
/// Saves go to a sibling temporary file that is then renamed over the
/// target, so a crash mid-write leaves the previous history intact.
pub struct HistoryFile {
    path: PathBuf,
}

impl HistoryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temporary_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn write_replace(&self, data: &[u8]) -> io::Result<()> {
        let temporary = self.temporary_path();
        let mut file = fs::File::create(&temporary)?;
        file.write_all(data)?;
        file.write_all(b"\n")?;
        file.sync_all()?;
        fs::rename(&temporary, &self.path)
    }
}

impl HistoryRepository for HistoryFile {
    type Error = HistoryFileError;

    fn load(&mut self) -> Result<Option<Vec<u8>>, HistoryFileError> {
        match fs::read(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(HistoryFileError::Read {
                path: self.path.clone(),
                err,
            }),
        }
    }

    fn save(&mut self, data: &[u8]) -> Result<(), HistoryFileError> {
        self.write_replace(data)
            .map_err(|err| HistoryFileError::Write {
                path: self.path.clone(),
                err,
            })
    }
}
