use std::borrow::Cow;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// A two-token, whitespace separated record.
///
/// Files are read the way a stream extractor reads them: the content is a flat
/// sequence of tokens taken two at a time, so line breaks carry no meaning.
pub trait Record: Sized + fmt::Display {
    /// What the second token is, for corruption messages.
    const VALUE_KIND: &'static str;

    fn from_tokens(key: &str, value: &str) -> Option<Self>;

    /// The employee ID the record belongs to.
    fn key(&self) -> &str;
}

/// Plain-text file holding one [`Record`] per line.
#[derive(Debug, Clone)]
pub struct FlatFile {
    path: PathBuf,
}

impl FlatFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn label(&self) -> String {
        self.path().display().to_string()
    }

    fn io_err(&self, action: &'static str) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
        move |e| StoreError::io(self.label(), action, e)
    }

    /// Parse every record in file order.
    ///
    /// Bytes that are not UTF-8 become U+FFFD instead of failing the whole file.
    pub fn read_all<R: Record>(&self) -> StoreResult<Vec<R>> {
        let bytes = fs::read(&self.path).map_err(self.io_err("reading"))?;
        let content = String::from_utf8_lossy(&bytes);
        if let Cow::Owned(_) = content {
            warn!(file = %self.label(), "File is not valid UTF-8, invalid bytes replaced");
        }
        self.parse(&content)
    }

    fn parse<R: Record>(&self, content: &str) -> StoreResult<Vec<R>> {
        let mut tokens = content.split_whitespace();
        let mut records = Vec::new();

        while let Some(key) = tokens.next() {
            let Some(value) = tokens.next() else {
                warn!(file = %self.label(), token = key, "Ignoring trailing unpaired token");
                break;
            };

            let record = R::from_tokens(key, value).ok_or_else(|| StoreError::Corrupt {
                file: self.label(),
                record: records.len() + 1,
                token: value.to_string(),
                expected: R::VALUE_KIND,
            })?;
            records.push(record);
        }

        Ok(records)
    }

    /// Append one record as a new line, creating the file if needed.
    pub fn append<R: Record>(&self, record: &R) -> StoreResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(self.io_err("appending"))?;

        writeln!(file, "{}", record).map_err(self.io_err("appending"))
    }

    /// Truncate to zero length, creating the file if needed.
    pub fn truncate(&self) -> StoreResult<()> {
        File::create(&self.path)
            .map(drop)
            .map_err(self.io_err("clearing"))
    }

    /// Zero-length check; a missing file is an I/O error like any other.
    pub fn is_empty(&self) -> StoreResult<bool> {
        fs::metadata(&self.path)
            .map(|meta| meta.len() == 0)
            .map_err(self.io_err("reading"))
    }

    /// Keep only the records matching `keep`, rewriting the file through a temp
    /// file that is renamed over the original. Returns how many were dropped.
    pub fn retain<R, F>(&self, mut keep: F) -> StoreResult<usize>
    where
        R: Record,
        F: FnMut(&R) -> bool,
    {
        let records: Vec<R> = self.read_all()?;
        let total = records.len();
        let kept: Vec<R> = records.into_iter().filter(|r| keep(r)).collect();

        let tmp = self.temp_path();
        if let Err(e) = self.write_replacement(&tmp, &kept) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }

        debug!(file = %self.label(), kept = kept.len(), dropped = total - kept.len(), "Rewrote file");
        Ok(total - kept.len())
    }

    fn write_replacement<R: Record>(&self, tmp: &Path, records: &[R]) -> StoreResult<()> {
        let file = File::create(tmp).map_err(self.io_err("rewriting"))?;
        let mut writer = BufWriter::new(file);
        for record in records {
            writeln!(writer, "{}", record).map_err(self.io_err("rewriting"))?;
        }
        writer
            .into_inner()
            .map_err(|e| StoreError::io(self.label(), "rewriting", e.into_error()))?
            .sync_all()
            .map_err(self.io_err("rewriting"))?;

        fs::rename(tmp, &self.path).map_err(self.io_err("replacing"))
    }

    /// Sibling of the backing file, unique per call.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("records");
        self.path
            .with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4()))
    }
}
