//! Best-time records, one per pair count.
//!
//! ## File format
//!
//! A flat sequence of `max_pairs - min_pairs + 1` little-endian `u32`
//! values, slot `i` holding the best time in milliseconds for
//! `min_pairs + i` pairs. Zero means "no record". Each value is written with
//! bincode's fixed-width integer encoding.
//!
//! A missing file reads as all zeros. A short file keeps what it has and
//! zero-fills the rest.

use log::{info, warn};
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::error::RecordError;

/// Best times indexed by pair count, backed by a record file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighScores {
    path: PathBuf,
    min_pairs: u8,
    times: Vec<u32>,
}

impl HighScores {
    /// Empty records for `min_pairs..=max_pairs`, not yet written anywhere.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, min_pairs: u8, max_pairs: u8) -> Self {
        let slots = usize::from(max_pairs.saturating_sub(min_pairs)) + 1;
        Self {
            path: path.into(),
            min_pairs,
            times: vec![0; slots],
        }
    }

    /// Read the record file at `path`.
    pub fn load(path: impl Into<PathBuf>, min_pairs: u8, max_pairs: u8) -> Result<Self, RecordError> {
        let mut scores = Self::new(path, min_pairs, max_pairs);
        let file = match File::open(&scores.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("[Records] No record file at {}, starting empty", scores.path.display());
                return Ok(scores);
            }
            Err(e) => return Err(e.into()),
        };

        let mut reader = BufReader::new(file);
        for slot in 0..scores.times.len() {
            match bincode::deserialize_from::<_, u32>(&mut reader) {
                Ok(time) => scores.times[slot] = time,
                Err(e) => match e.as_ref() {
                    bincode::ErrorKind::Io(io) if io.kind() == ErrorKind::UnexpectedEof => {
                        warn!(
                            "[Records] {} holds {} of {} records, the rest start empty",
                            scores.path.display(),
                            slot,
                            scores.times.len()
                        );
                        break;
                    }
                    _ => return Err(e.into()),
                },
            }
        }
        info!("[Records] Loaded records from {}", scores.path.display());
        Ok(scores)
    }

    /// Write every slot to the record file.
    pub fn save(&self) -> Result<(), RecordError> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        for time in &self.times {
            bincode::serialize_into(&mut writer, time)?;
        }
        writer.flush()?;
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    fn slot(&self, pairs: u8) -> Option<usize> {
        let index = usize::from(pairs.checked_sub(self.min_pairs)?);
        (index < self.times.len()).then_some(index)
    }

    /// Best time for `pairs`, if one was recorded.
    #[must_use]
    pub fn best(&self, pairs: u8) -> Option<u32> {
        self.slot(pairs).map(|i| self.times[i]).filter(|&t| t > 0)
    }

    /// Offer a finishing time. Saves and returns true when it beats the
    /// current record or no record exists.
    pub fn submit(&mut self, pairs: u8, elapsed_ms: u32) -> Result<bool, RecordError> {
        let slot = self.slot(pairs).ok_or(RecordError::NoSlot { pairs })?;
        // Zero is reserved for "no record".
        let elapsed_ms = elapsed_ms.max(1);
        if self.best(pairs).is_some_and(|best| best <= elapsed_ms) {
            return Ok(false);
        }
        self.times[slot] = elapsed_ms;
        self.save()?;
        info!("[Records] New record for {} pairs: {} ms", pairs, elapsed_ms);
        Ok(true)
    }
}
