use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, warn};

use super::error::StoreError;
use crate::models::timestamps::{self, Timestamp};
use crate::models::{Application, KbEntry};

/// Default file name for application records
pub const APPLICATIONS_FILE: &str = "applications.jsonl";

/// Default file name for knowledge-base entries
pub const KNOWLEDGE_FILE: &str = "candidate-kb.jsonl";

/// A record that can live in a [`JsonlStore`]
pub trait Record: Serialize + DeserializeOwned {
    /// File name used when the store is given no explicit path
    const DEFAULT_FILE_NAME: &'static str;

    fn id(&self) -> &str;

    /// Refresh the record's modification timestamp
    fn touch(&mut self, now: Timestamp);
}

impl Record for Application {
    const DEFAULT_FILE_NAME: &'static str = APPLICATIONS_FILE;

    fn id(&self) -> &str {
        &self.id
    }

    fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }
}

impl Record for KbEntry {
    const DEFAULT_FILE_NAME: &'static str = KNOWLEDGE_FILE;

    fn id(&self) -> &str {
        &self.id
    }

    fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }
}

pub type ApplicationStore = JsonlStore<Application>;
pub type KnowledgeStore = JsonlStore<KbEntry>;

/// CRUD over one JSONL file of records keyed by ID
#[derive(Debug, Clone)]
pub struct JsonlStore<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> JsonlStore<R> {
    /// Create a store backed by `path`; an empty path falls back to the default file name
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let path =
            if path.as_os_str().is_empty() { PathBuf::from(R::DEFAULT_FILE_NAME) } else { path };
        Self { path, _record: PhantomData }
    }

    /// Create a store for the default file name inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(R::DEFAULT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record in file order
    ///
    /// A missing file yields an empty list. Malformed lines are logged and skipped.
    pub fn load(&self) -> Result<Vec<R>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "store file missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::io("open", &self.path, e)),
        };

        let reader = BufReader::new(file);
        let mut records = Vec::new();
        let mut skipped = 0usize;

        // Split on raw bytes so a line with invalid UTF-8 is skipped like any other bad line
        for (line_num, line) in reader.split(b'\n').enumerate() {
            let line = line.map_err(|e| StoreError::io("read", &self.path, e))?;

            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            match serde_json::from_slice::<R>(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    skipped += 1;
                    warn!(
                        path = %self.path.display(),
                        line = line_num + 1,
                        error = %e,
                        "skipping malformed record"
                    );
                }
            }
        }

        debug!(path = %self.path.display(), loaded = records.len(), skipped, "loaded store");
        Ok(records)
    }

    /// Replace the file's contents with `records`, one JSON object per line
    ///
    /// Records go to a temporary file next to the target which is then renamed over it,
    /// so readers see either the old contents or the new. A symlinked data file is
    /// written through, and an existing file keeps its permissions.
    pub fn save(&self, records: &[R]) -> Result<(), StoreError> {
        let target = fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone());
        let mut tmp = self.temp_file(&target)?;

        let mut writer = BufWriter::new(tmp.as_file_mut());
        for record in records {
            serde_json::to_writer(&mut writer, record)?;
            writer.write_all(b"\n").map_err(|e| StoreError::io("write", &target, e))?;
        }
        writer.flush().map_err(|e| StoreError::io("write", &target, e))?;
        drop(writer);

        // On failure the temporary file is removed when `tmp` drops
        tmp.persist(&target).map_err(|e| StoreError::io("replace", &target, e.error))?;

        debug!(path = %self.path.display(), records = records.len(), "saved store");
        Ok(())
    }

    fn temp_file(&self, target: &Path) -> Result<NamedTempFile, StoreError> {
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut prefix = std::ffi::OsString::from(".");
        prefix.push(target.file_name().unwrap_or_default());
        prefix.push(".");

        let mut builder = Builder::new();
        builder.prefix(&prefix).suffix(".tmp");
        // tempfile creates 0600 files; match what File::create would give a new store
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(fs::Permissions::from_mode(0o666));
        }

        let tmp = builder.tempfile_in(dir).map_err(|e| StoreError::io("create", target, e))?;
        if let Ok(meta) = fs::metadata(target) {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .map_err(|e| StoreError::io("create", target, e))?;
        }
        Ok(tmp)
    }

    pub fn add(&self, record: R) -> Result<(), StoreError> {
        let mut records = self.load()?;
        records.push(record);
        self.save(&records)
    }

    /// First record with a matching ID
    pub fn get(&self, id: &str) -> Result<R, StoreError> {
        self.load()?
            .into_iter()
            .find(|record| record.id() == id)
            .ok_or_else(|| StoreError::not_found(id))
    }

    /// Apply `mutate` to the first record with a matching ID, refresh its `updated_at`,
    /// and persist. Returns the updated record.
    pub fn update<F>(&self, id: &str, mutate: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut R),
        R: Clone,
    {
        let mut records = self.load()?;
        let record = records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(|| StoreError::not_found(id))?;

        mutate(record);
        record.touch(timestamps::now());
        let updated = record.clone();

        self.save(&records)?;
        Ok(updated)
    }

    /// Drop every record with a matching ID
    pub fn remove(&self, id: &str) -> Result<(), StoreError> {
        let records = self.load()?;
        let before = records.len();
        let remaining: Vec<R> = records.into_iter().filter(|record| record.id() != id).collect();

        if remaining.len() == before {
            return Err(StoreError::not_found(id));
        }

        self.save(&remaining)
    }
}
