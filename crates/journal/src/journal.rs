//! Append-only journal over a directory tree
//!
//! Layout: `<root>/<stream>/{prefix}_{timestamp}_{suffix}.{extension}`,
//! one record per file. Appends are crash-safe:
//!
//! 1. Serialize the payload as pretty JSON and pass it through the codec
//! 2. Write to a hidden temp file (`.{id}.tmp`) in the stream directory
//! 3. fsync the temp file
//! 4. Atomic rename to the final name
//! 5. fsync the stream directory
//!
//! Either the complete record exists under its final name or it does
//! not; readers never see a partial record. Stale temp files from a
//! crash are removed the next time the journal is opened.
//!
//! After a successful append the stream's retention policy is applied.
//! The sweep is best-effort: it tolerates concurrently deleted files,
//! logs any other deletion failure, and never fails the append.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::codec::{PlainCodec, RecordCodec};
use crate::error::{JournalError, JournalResult};
use crate::record::RecordId;
use crate::stream::StreamConfig;

/// A set of append-only record streams rooted at one directory.
pub struct Journal {
    root: PathBuf,
    streams: BTreeMap<String, StreamConfig>,
    codec: Box<dyn RecordCodec>,
}

impl Journal {
    /// Open a journal at `root` with the given streams and the default
    /// [`PlainCodec`].
    ///
    /// Creates the root and every stream directory if missing, and
    /// removes temp files left behind by a crash.
    pub fn open(root: impl Into<PathBuf>, streams: Vec<StreamConfig>) -> JournalResult<Self> {
        Journal::with_codec(root, streams, Box::new(PlainCodec))
    }

    /// Open a journal with an explicit record codec.
    pub fn with_codec(
        root: impl Into<PathBuf>,
        streams: Vec<StreamConfig>,
        codec: Box<dyn RecordCodec>,
    ) -> JournalResult<Self> {
        let root = root.into();
        let streams: BTreeMap<String, StreamConfig> = streams
            .into_iter()
            .map(|config| (config.name.clone(), config))
            .collect();

        for config in streams.values() {
            fs::create_dir_all(root.join(&config.name))?;
        }

        let journal = Journal {
            root,
            streams,
            codec,
        };
        let removed = journal.cleanup_temp_files()?;
        if removed > 0 {
            debug!(
                target: "palisade::journal",
                removed,
                "removed stale temp files"
            );
        }
        Ok(journal)
    }

    /// The journal root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Configuration of a stream, if the journal was opened with it.
    pub fn stream(&self, name: &str) -> Option<&StreamConfig> {
        self.streams.get(name)
    }

    /// Serialize `payload` and append it to `stream`.
    ///
    /// Returns the freshly minted record id. Retention runs after the
    /// record is durable and cannot fail the append.
    pub fn append<T: Serialize>(&self, stream: &str, payload: &T) -> JournalResult<RecordId> {
        let config = self.config(stream)?;
        let dir = self.root.join(&config.name);

        let id = RecordId::new(&config.prefix);
        let final_path = dir.join(id.file_name(&config.extension));
        let temp_path = dir.join(format!(".{}.tmp", id.as_str()));

        let json = serde_json::to_vec_pretty(payload)?;
        let encoded = self.codec.encode(&json);

        let mut file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&temp_path)?;
        file.write_all(&encoded)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &final_path)?;
        File::open(&dir)?.sync_all()?;

        debug!(
            target: "palisade::journal",
            stream = %config.name,
            id = %id,
            bytes = encoded.len(),
            "record appended"
        );

        self.apply_retention(config);
        Ok(id)
    }

    /// Record ids currently in `stream`, oldest first.
    pub fn list(&self, stream: &str) -> JournalResult<Vec<RecordId>> {
        let config = self.config(stream)?;
        let dir = self.root.join(&config.name);

        let mut ids = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if config.matches(&name) {
                let stem = name
                    .strip_suffix(&format!(".{}", config.extension))
                    .unwrap_or(&name);
                ids.push(RecordId::from_stem(stem));
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Read one record back as JSON, decoding through the codec.
    pub fn read(&self, stream: &str, id: &RecordId) -> JournalResult<serde_json::Value> {
        let config = self.config(stream)?;
        let path = self
            .root
            .join(&config.name)
            .join(id.file_name(&config.extension));

        let bytes = fs::read(path)?;
        let decoded = self.codec.decode(&bytes)?;
        Ok(serde_json::from_slice(&decoded)?)
    }

    fn config(&self, stream: &str) -> JournalResult<&StreamConfig> {
        self.streams
            .get(stream)
            .ok_or_else(|| JournalError::UnknownStream {
                name: stream.to_string(),
            })
    }

    /// Delete the oldest records beyond the stream's retention cap.
    ///
    /// Best-effort by contract: a record already deleted by a
    /// concurrent sweep is not an error, any other failure is logged
    /// and skipped, and other streams are never touched.
    fn apply_retention(&self, config: &StreamConfig) {
        let Some(keep) = config.retention.keep_count() else {
            return;
        };
        let dir = self.root.join(&config.name);

        let mut names: Vec<String> = match fs::read_dir(&dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.file_name().to_string_lossy().to_string())
                .filter(|name| config.matches(name))
                .collect(),
            Err(err) => {
                warn!(
                    target: "palisade::journal",
                    stream = %config.name,
                    error = %err,
                    "retention sweep could not list stream directory"
                );
                return;
            }
        };

        if names.len() <= keep {
            return;
        }
        names.sort();

        let excess = names.len() - keep;
        let mut removed = 0usize;
        for name in &names[..excess] {
            match fs::remove_file(dir.join(name)) {
                Ok(()) => removed += 1,
                // Already gone: a concurrent sweep won the race.
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => {
                    warn!(
                        target: "palisade::journal",
                        stream = %config.name,
                        file = %name,
                        error = %err,
                        "retention sweep could not delete record"
                    );
                }
            }
        }

        debug!(
            target: "palisade::journal",
            stream = %config.name,
            removed,
            kept = keep,
            "retention sweep finished"
        );
    }

    fn cleanup_temp_files(&self) -> JournalResult<usize> {
        let mut count = 0;
        for config in self.streams.values() {
            let dir = self.root.join(&config.name);
            for entry in fs::read_dir(&dir)? {
                let entry = entry?;
                let name = entry.file_name().to_string_lossy().to_string();
                if name.starts_with('.') && name.ends_with(".tmp") {
                    fs::remove_file(entry.path())?;
                    count += 1;
                }
            }
        }
        Ok(count)
    }
}
