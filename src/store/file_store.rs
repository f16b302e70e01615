use std::{
    fs,
    io::{ErrorKind, Write},
    ops::Deref,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::{debug, instrument};

use crate::error::{Result, TrackerError};

use super::{
    codec::{decode, encode},
    period::Periods,
};

/// Interface for abstracting storage of periods.
pub trait PeriodStore {
    /// Reads every stored period. A store that was never written to holds no periods.
    fn load(&self) -> Result<Periods>;

    /// Replaces the stored periods with `periods`.
    fn save(&self, periods: &Periods) -> Result<()>;
}

impl<T: Deref> PeriodStore for T
where
    T::Target: PeriodStore,
{
    fn load(&self) -> Result<Periods> {
        self.deref().load()
    }

    fn save(&self, periods: &Periods) -> Result<()> {
        self.deref().save(periods)
    }
}

/// The main realization of [PeriodStore]. Keeps all periods in a single text file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl PeriodStore for FileStore {
    #[instrument(skip(self), fields(path = ?self.path))]
    fn load(&self) -> Result<Periods> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No tracking file yet");
                return Ok(Periods::default());
            }
            Err(e) => return Err(e.into()),
        };
        decode(&text).map_err(|source| TrackerError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    /// The file is written next to the target first and then moved over it, so an interrupted
    /// save leaves the previous content intact.
    #[instrument(skip(self, periods), fields(path = ?self.path, periods = periods.len()))]
    fn save(&self, periods: &Periods) -> Result<()> {
        let mut file = NamedTempFile::new_in(self.directory())?;
        file.write_all(encode(periods).as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        debug!("Saved tracking file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use anyhow::Result;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use crate::{
        error::TrackerError,
        store::{
            codec::DecodeErrorKind,
            file_store::{FileStore, PeriodStore},
            period::{Period, Periods},
        },
    };

    const TEST_START_DATE: NaiveDate = NaiveDate::from_ymd_opt(2018, 7, 4).unwrap();

    #[test]
    fn test_load_missing_file() -> Result<()> {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path().join("wordtrack.dat"));
        assert!(store.load()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path().join("wordtrack.dat"));
        let mut periods = Periods::default();
        periods.push(Period::starting_on(TEST_START_DATE, 30, 50000)?.with_counts(vec![10, 400]));
        periods.push(Period::starting_on(TEST_START_DATE, 7, 7000)?);

        store.save(&periods)?;
        assert_eq!(store.load()?, periods);

        // Saving again replaces the content instead of appending to it.
        store.save(&Periods::new(vec![Period::starting_on(TEST_START_DATE, 3, 5)?]))?;
        assert_eq!(store.load()?.len(), 1);
        assert_eq!(fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }

    #[test]
    fn test_load_corrupted_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("wordtrack.dat");
        fs::write(&path, "---\nstartdate: yesterday\n")?;

        let store = FileStore::new(&path);
        match store.load() {
            Err(TrackerError::Decode { source, .. }) => {
                assert_eq!(source.line, 2);
                assert!(matches!(source.kind, DecodeErrorKind::InvalidDate(_)));
            }
            other => panic!("Expected a decode error, got {other:?}"),
        }
        Ok(())
    }
}
