//! Flat-file persistence for the whole student collection.
//!
//! The collection is one pretty-printed JSON array. Every mutation reloads the
//! file, changes the in-memory `Vec`, and writes the whole array back through
//! a sibling temp file that is renamed over the original. Mutations share one
//! async mutex so concurrent writers within this process queue up instead of
//! overwriting each other.

use crate::{
    data::student::{StudentDetails, StudentPatch, StudentRecord},
    error::{
        CreateDataDirSnafu, MissingStudentSnafu, ParseStoreSnafu, ReadStoreSnafu, RosterResult,
        SerialiseStoreSnafu, WriteStoreSnafu,
    },
};
use snafu::{OptionExt, ResultExt};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs, sync::Mutex};

#[derive(Clone, Debug)]
pub struct StudentStore {
    path: Arc<PathBuf>,
    write_lock: Arc<Mutex<()>>,
}

impl StudentStore {
    /// Points the store at `path`, creating its parent directory if needed.
    pub async fn open(path: impl Into<PathBuf>) -> RosterResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .context(CreateDataDirSnafu { path: parent })?;
        }

        Ok(Self {
            path: Arc::new(path),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every record, in file order. A missing file is an empty collection.
    pub async fn load(&self) -> RosterResult<Vec<StudentRecord>> {
        let bytes = match fs::read(self.path()).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no student file yet");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(source).context(ReadStoreSnafu {
                    path: self.path(),
                });
            }
        };

        serde_json::from_slice(&bytes).context(ParseStoreSnafu {
            path: self.path(),
        })
    }

    /// Overwrites the file with `records`.
    pub async fn save(&self, records: &[StudentRecord]) -> RosterResult<()> {
        let json = serde_json::to_vec_pretty(records).context(SerialiseStoreSnafu)?;

        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let written = match fs::write(&tmp, json).await {
            Ok(()) => fs::rename(&tmp, self.path())
                .await
                .context(WriteStoreSnafu { path: self.path() }),
            Err(source) => Err(source).context(WriteStoreSnafu { path: &tmp }),
        };

        if written.is_err() {
            match fs::remove_file(&tmp).await {
                Err(e) if e.kind() != ErrorKind::NotFound => {
                    warn!(?e, path = %tmp.display(), "unable to remove temp file");
                }
                _ => {}
            }
        }
        written
    }

    async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Vec<StudentRecord>) -> RosterResult<T>,
    ) -> RosterResult<T> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        let output = change(&mut records)?;
        self.save(&records).await?;
        Ok(output)
    }

    pub async fn all(&self) -> RosterResult<Vec<StudentRecord>> {
        self.load().await
    }

    pub async fn get(&self, id: &str) -> RosterResult<StudentRecord> {
        self.load()
            .await?
            .into_iter()
            .find(|record| record.id == id)
            .context(MissingStudentSnafu { id })
    }

    pub async fn insert(&self, details: StudentDetails) -> RosterResult<StudentRecord> {
        let record = StudentRecord::new(details);
        self.mutate(|records| {
            records.push(record.clone());
            Ok(())
        })
        .await?;

        info!(id = %record.id, "created student");
        Ok(record)
    }

    pub async fn update(&self, id: &str, patch: StudentPatch) -> RosterResult<StudentRecord> {
        let record = self
            .mutate(|records| {
                let record = records
                    .iter_mut()
                    .find(|record| record.id == id)
                    .context(MissingStudentSnafu { id })?;
                record.apply(patch);
                Ok(record.clone())
            })
            .await?;

        info!(%id, "updated student");
        Ok(record)
    }

    pub async fn remove(&self, id: &str) -> RosterResult<()> {
        self.mutate(|records| {
            let before = records.len();
            records.retain(|record| record.id != id);
            snafu::ensure!(records.len() != before, MissingStudentSnafu { id });
            Ok(())
        })
        .await?;

        info!(%id, "deleted student");
        Ok(())
    }

    pub async fn search(&self, query: &str) -> RosterResult<Vec<StudentRecord>> {
        let needle = query.to_lowercase();
        Ok(self
            .load()
            .await?
            .into_iter()
            .filter(|record| record.matches(&needle))
            .collect())
    }
}
