use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http::{Method, Response};

/// 历史记录条目
///
/// 只为收到响应的请求创建 (任意状态码)；创建后不可变。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// 唯一 ID (UUID)
    pub id: String,

    /// 请求时间
    pub timestamp: DateTime<Utc>,

    pub method: Method,

    /// 完成变量替换和查询参数拼接后的 URL
    pub url: String,

    pub status: u16,

    /// 请求耗时 (毫秒)
    pub duration_ms: u64,
}

impl HistoryEntry {
    pub fn new(method: Method, url: impl Into<String>, response: &Response) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            method,
            url: url.into(),
            status: response.status.code(),
            duration_ms: response.duration_ms(),
        }
    }

    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}
