use std::collections::VecDeque;

use crate::config::DEFAULT_HISTORY_CAPACITY;
use crate::history::model::HistoryEntry;

/// 有界的内存历史记录，最新的在最前面
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl History {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// 从按时间顺序 (旧 -> 新) 排列的条目恢复，只保留最近 `capacity` 条
    pub fn restore(capacity: usize, chronological: Vec<HistoryEntry>) -> Self {
        let mut history = Self::with_capacity(capacity);
        for entry in chronological {
            history.record(entry);
        }
        history
    }

    /// 插入到最前面，超出容量时淘汰最旧的条目
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// 最新的在前
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::http::Method;

    fn entry(id: usize) -> HistoryEntry {
        HistoryEntry {
            id: id.to_string(),
            timestamp: Utc::now(),
            method: Method::Get,
            url: format!("http://x/{}", id),
            status: 200,
            duration_ms: 1,
        }
    }

    #[test]
    fn test_most_recent_first() {
        let mut history = History::default();
        history.record(entry(1));
        history.record(entry(2));

        let ids: Vec<&str> = history.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(history.latest().unwrap().id, "2");
    }

    #[test]
    fn test_bounded_by_capacity() {
        let mut history = History::default();
        for i in 1..=60 {
            history.record(entry(i));
        }
        assert_eq!(history.len(), 50);
        assert_eq!(history.latest().unwrap().id, "60");
        assert!(history.get("10").is_none());
        assert!(history.get("11").is_some());
    }

    #[test]
    fn test_restore_keeps_newest() {
        let history = History::restore(3, (1..=5).map(entry).collect());
        let ids: Vec<&str> = history.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["5", "4", "3"]);
    }

    #[test]
    fn test_clear() {
        let mut history = History::with_capacity(2);
        history.record(entry(1));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.capacity(), 2);
    }
}
