// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-ahead log of committed batches.
//!
//! One JSON line per batch: `{"seq":N,"batch":[...]}`. A batch is durable
//! once its line is flushed. A trailing line that fails to parse is the
//! remains of an interrupted write; it is dropped on open so the batch it
//! held is never half-applied.

use crate::batch::Batch;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt WAL entry at line {line}: {message}")]
    Corrupt { line: usize, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalEntry {
    pub seq: u64,
    pub batch: Batch,
}

pub struct Wal {
    path: PathBuf,
    writer: BufWriter<File>,
    write_seq: u64,
    /// File length after the last successful flush
    durable_len: u64,
    #[cfg(test)]
    fault: Option<Fault>,
}

/// Write failures a test can force on the next append.
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fault {
    /// Half the line reaches the buffer, then the write fails
    PartialWrite,
    /// The line is buffered but the flush fails
    Flush,
}

impl Wal {
    /// Open or create the log. `min_seq` is the sequence already covered by a
    /// snapshot; new entries continue after whichever is higher.
    pub fn open(path: &Path, min_seq: u64) -> Result<Self, WalError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let (entries, valid_len) = read_entries(path)?;
        let last_seq = entries.last().map(|e| e.seq).unwrap_or(0);

        let file = OpenOptions::new().create(true).read(true).write(true).truncate(false).open(path)?;
        if file.metadata()?.len() > valid_len {
            warn!(path = %path.display(), "discarding torn WAL tail");
            file.set_len(valid_len)?;
        }
        let file = OpenOptions::new().append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            write_seq: last_seq.max(min_seq),
            durable_len: valid_len,
            #[cfg(test)]
            fault: None,
        })
    }

    pub fn write_seq(&self) -> u64 {
        self.write_seq
    }

    /// Append a batch and return its sequence number. Call [`Wal::flush`]
    /// before treating it as durable.
    pub fn append(&mut self, batch: &Batch) -> Result<u64, WalError> {
        let seq = self.write_seq + 1;
        let mut line = serde_json::to_vec(&WalEntry { seq, batch: batch.clone() })?;
        line.push(b'\n');
        self.write_line(&line)?;
        self.write_seq = seq;
        Ok(seq)
    }

    pub fn flush(&mut self) -> Result<(), WalError> {
        #[cfg(test)]
        if self.fault == Some(Fault::Flush) {
            self.fault = None;
            return Err(std::io::Error::other("injected flush failure").into());
        }
        self.writer.flush()?;
        self.writer.get_ref().sync_data()?;
        self.durable_len = self.writer.get_ref().metadata()?.len();
        Ok(())
    }

    /// Append and flush one batch as a unit.
    ///
    /// On failure the log is rolled back to its last flushed state: nothing
    /// of the batch stays buffered or on disk and the sequence is unchanged,
    /// so the next append reuses it.
    pub fn append_flushed(&mut self, batch: &Batch) -> Result<u64, WalError> {
        let prev_seq = self.write_seq;
        let result = self.append(batch).and_then(|seq| self.flush().map(|()| seq));
        if let Err(e) = &result {
            warn!(error = %e, seq = prev_seq + 1, "WAL append failed, rolling back");
            self.rollback(prev_seq)?;
        }
        result
    }

    /// Drop buffered bytes and cut the file back to `durable_len`.
    fn rollback(&mut self, seq: u64) -> Result<(), WalError> {
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let stale = std::mem::replace(&mut self.writer, BufWriter::new(file));
        // into_parts discards the buffer; dropping the writer would flush it
        let _ = stale.into_parts();
        self.writer.get_ref().set_len(self.durable_len)?;
        self.write_seq = seq;
        Ok(())
    }

    fn write_line(&mut self, line: &[u8]) -> Result<(), WalError> {
        #[cfg(test)]
        if self.fault == Some(Fault::PartialWrite) {
            self.fault = None;
            self.writer.write_all(&line[..line.len() / 2])?;
            return Err(std::io::Error::other("injected write failure").into());
        }
        self.writer.write_all(line)?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn inject_fault(&mut self, fault: Fault) {
        self.fault = Some(fault);
    }

    /// Entries with a sequence greater than `seq`, in order.
    pub fn entries_after(&self, seq: u64) -> Result<Vec<WalEntry>, WalError> {
        let (entries, _) = read_entries(&self.path)?;
        Ok(entries.into_iter().filter(|e| e.seq > seq).collect())
    }

    /// Drop every entry. Used after a snapshot has captured them.
    pub fn truncate(&mut self) -> Result<(), WalError> {
        self.writer.flush()?;
        self.writer.get_ref().set_len(0)?;
        self.durable_len = 0;
        Ok(())
    }
}

/// Parse all complete entries and return them with the byte length they span.
fn read_entries(path: &Path) -> Result<(Vec<WalEntry>, u64), WalError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok((Vec::new(), 0)),
        Err(e) => return Err(e.into()),
    };

    let mut reader = BufReader::new(file);
    let mut entries = Vec::new();
    let mut valid_len: u64 = 0;
    let mut line = String::new();
    let mut line_no = 0;
    let mut pending_error: Option<WalError> = None;

    loop {
        line.clear();
        let n = reader.read_line(&mut line)?;
        if n == 0 {
            break;
        }
        line_no += 1;
        // An unparsable line followed by more data is corruption, not a torn tail
        if let Some(err) = pending_error.take() {
            return Err(err);
        }
        if !line.ends_with('\n') {
            break;
        }
        match serde_json::from_str::<WalEntry>(line.trim_end()) {
            Ok(entry) => {
                entries.push(entry);
                valid_len += n as u64;
            }
            Err(e) => {
                pending_error = Some(WalError::Corrupt { line: line_no, message: e.to_string() });
            }
        }
    }

    Ok((entries, valid_len))
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
