//! Persistent address → coordinate memo.
//!
//! Stored as a flat CSV file (`address,lat,lon`), read fully at load and
//! rewritten fully on flush.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::CacheError;
use crate::model::Coordinate;

#[derive(Debug, Clone, Default)]
pub struct GeocodeCache {
    entries: HashMap<String, Coordinate>,
    path: Option<PathBuf>,
    dirty: bool,
}

impl GeocodeCache {
    /// A cache that is never persisted.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the cache stored at `path`.
    ///
    /// A missing file is an empty cache. Rows that do not parse are skipped.
    pub fn try_load(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        let mut cache = Self {
            entries: HashMap::new(),
            path: Some(path.clone()),
            dirty: false,
        };

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(cache),
            Err(err) => return Err(err.into()),
        };

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
        for (line, record) in reader.byte_records().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(err) if err.is_io_error() => return Err(err.into()),
                Err(err) => {
                    tracing::warn!(line = line + 2, error = %err, "skipping undecodable geocode cache row");
                    continue;
                }
            };
            match parse_row(&record) {
                Some((address, coord)) => {
                    cache.entries.insert(address, coord);
                }
                None => tracing::warn!(line = line + 2, "skipping unreadable geocode cache row"),
            }
        }

        tracing::debug!(entries = cache.entries.len(), path = %path.display(), "geocode cache loaded");
        Ok(cache)
    }

    /// Like [`GeocodeCache::try_load`], but any failure yields an empty cache
    /// still bound to `path`.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::try_load(path.clone()).unwrap_or_else(|err| {
            tracing::warn!(error = %err, path = %path.display(), "geocode cache unreadable, starting empty");
            Self {
                path: Some(path),
                ..Self::default()
            }
        })
    }

    pub fn get(&self, address: &str) -> Option<Coordinate> {
        self.entries.get(address).copied()
    }

    /// Record a newly resolved address. Existing entries are never replaced.
    pub fn put(&mut self, address: impl Into<String>, coord: Coordinate) {
        let address = address.into();
        if !self.entries.contains_key(&address) {
            self.entries.insert(address, coord);
            self.dirty = true;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when entries were added since the last load or flush.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Persist every entry, replacing the file atomically.
    ///
    /// No-op for in-memory caches and when nothing changed.
    pub fn flush(&mut self) -> Result<(), CacheError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        if !self.dirty {
            return Ok(());
        }

        let mut rows: Vec<(&String, &Coordinate)> = self.entries.iter().collect();
        rows.sort_by(|a, b| a.0.cmp(b.0));

        let tmp_path = path.with_extension("tmp");
        let written = write_rows(&tmp_path, rows).and_then(|()| Ok(fs::rename(&tmp_path, path)?));
        if let Err(err) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(err);
        }

        self.dirty = false;
        tracing::debug!(entries = self.entries.len(), path = %path.display(), "geocode cache flushed");
        Ok(())
    }
}

fn write_rows(tmp_path: &Path, rows: Vec<(&String, &Coordinate)>) -> Result<(), CacheError> {
    let mut writer = csv::Writer::from_path(tmp_path)?;
    writer.write_record(["address", "lat", "lon"])?;
    for (address, coord) in rows {
        writer.write_record([address.as_str(), &coord.lat().to_string(), &coord.lon().to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

fn parse_row(record: &csv::ByteRecord) -> Option<(String, Coordinate)> {
    let text = |index: usize| record.get(index).and_then(|field| std::str::from_utf8(field).ok());
    let address = text(0)?.to_string();
    let lat = text(1)?.trim().parse::<f64>().ok()?;
    let lon = text(2)?.trim().parse::<f64>().ok()?;
    if address.is_empty() {
        return None;
    }
    Coordinate::new(lat, lon).ok().map(|coord| (address, coord))
}
