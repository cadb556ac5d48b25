use super::model::HistoryEntry;
use crate::Result;
use crate::config::DEFAULT_HISTORY_CAPACITY;
use crate::error::RureqError;
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

pub const HISTORY_FILE: &str = "history.jsonl";

/// JSONL 格式的持久化历史记录 (一行一条，按时间顺序追加)
pub struct HistoryStorage {
    file_path: PathBuf,
    max_entries: usize,
}

impl HistoryStorage {
    /// 在数据目录下使用 `history.jsonl`
    pub fn in_dir(dir: &Path, max_entries: usize) -> Self {
        Self {
            file_path: dir.join(HISTORY_FILE),
            max_entries,
        }
    }

    /// Create with specific path (internal/testing use)
    pub fn new_with_path(path: PathBuf) -> Self {
        Self {
            file_path: path,
            max_entries: DEFAULT_HISTORY_CAPACITY,
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.file_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(RureqError::IoError)?;
        }
        Ok(())
    }

    /// Append a new entry to history
    ///
    /// Holds an exclusive `fs2` lock for the duration of the write so that
    /// several processes can append to the same file.
    pub fn append(&self, entry: &HistoryEntry) -> Result<()> {
        self.ensure_dir()?;
        let json = serde_json::to_string(entry)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
            .map_err(RureqError::IoError)?;

        file.lock_exclusive().map_err(RureqError::IoError)?;
        writeln!(file, "{}", json).map_err(RureqError::IoError)?;

        Ok(())
    }

    /// List all entries, oldest first (compacting to `max_entries` first)
    pub fn list(&self) -> Result<Vec<HistoryEntry>> {
        if !self.file_path.exists() {
            return Ok(Vec::new());
        }

        // 压缩放在读路径上，追加保持简单
        self.compact_if_needed()?;

        self.read_all()
    }

    /// Read last N entries
    ///
    /// Returns entries in chronological order (oldest -> newest).
    pub fn tail(&self, n: usize) -> Result<Vec<HistoryEntry>> {
        let entries = self.list()?;
        let skip = entries.len().saturating_sub(n);
        Ok(entries.into_iter().skip(skip).collect())
    }

    pub fn clear(&self) -> Result<()> {
        if self.file_path.exists() {
            fs::remove_file(&self.file_path).map_err(RureqError::IoError)?;
        }
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<HistoryEntry>> {
        let file = fs::File::open(&self.file_path).map_err(RureqError::IoError)?;
        file.lock_shared().map_err(RureqError::IoError)?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for line in reader.lines() {
            let line = line.map_err(RureqError::IoError)?;
            if line.trim().is_empty() {
                continue;
            }
            // 损坏的行直接跳过
            if let Ok(entry) = serde_json::from_str::<HistoryEntry>(&line) {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    /// Prune the file down to the newest `max_entries` lines
    fn compact_if_needed(&self) -> Result<()> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.file_path)
            .map_err(RureqError::IoError)?;

        // Truncate in place instead of rename so the lock stays valid on Windows.
        file.lock_exclusive().map_err(RureqError::IoError)?;

        let entries: Vec<HistoryEntry> = BufReader::new(&file)
            .lines()
            .map_while(|l| l.ok())
            .filter_map(|l| serde_json::from_str::<HistoryEntry>(&l).ok())
            .collect();

        if entries.len() <= self.max_entries {
            return Ok(());
        }

        let skip_count = entries.len() - self.max_entries;

        file.set_len(0).map_err(RureqError::IoError)?;
        file.seek(SeekFrom::Start(0)).map_err(RureqError::IoError)?;

        let mut writer = std::io::BufWriter::new(file);
        for entry in entries.iter().skip(skip_count) {
            let json = serde_json::to_string(entry)?;
            writeln!(writer, "{}", json).map_err(RureqError::IoError)?;
        }
        writer.flush().map_err(RureqError::IoError)?;

        Ok(())
    }
}
