use crate::http::types::Status;
use serde_json::Value;
use std::time::Duration;

/// 解析后的响应体
///
/// 解析失败不会抛出错误，而是显式落入 `InvalidJson`，调用方可以判断走了哪条路径。
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Content-Type 为 JSON 且解析成功
    Json(Value),
    /// 非 JSON 内容
    Text(String),
    /// Content-Type 声明为 JSON，但内容无法解析
    InvalidJson { raw: String, reason: String },
}

impl ResponseBody {
    /// 根据 Content-Type 尝试解析响应文本
    pub fn parse(content_type: &str, raw: &str) -> Self {
        if !content_type.contains("application/json") {
            return ResponseBody::Text(raw.to_string());
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => ResponseBody::Json(value),
            Err(e) => ResponseBody::InvalidJson {
                raw: raw.to_string(),
                reason: e.to_string(),
            },
        }
    }

    /// 解析后的数据：JSON 值，或原始字符串
    pub fn data(&self) -> Value {
        match self {
            ResponseBody::Json(value) => value.clone(),
            ResponseBody::Text(raw) | ResponseBody::InvalidJson { raw, .. } => {
                Value::String(raw.clone())
            }
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, ResponseBody::Json(_))
    }
}

/// 收到的 HTTP 响应 (任何状态码)
#[derive(Debug, Clone)]
pub struct Response {
    pub status: Status,
    pub status_text: String,
    /// 按接收顺序排列的响应头
    pub headers: Vec<(String, String)>,
    pub raw_text: String,
    pub body: ResponseBody,
    pub duration: Duration,
}

impl Response {
    pub fn new(
        status: Status,
        status_text: impl Into<String>,
        headers: Vec<(String, String)>,
        raw_text: String,
        duration: Duration,
    ) -> Self {
        let content_type = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .map(|(_, v)| v.as_str())
            .unwrap_or("");
        let body = ResponseBody::parse(content_type, &raw_text);

        Self {
            status,
            status_text: status_text.into(),
            headers,
            raw_text,
            body,
            duration,
        }
    }

    /// 2xx
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    pub fn data(&self) -> Value {
        self.body.data()
    }

    /// 原始文本的字节长度
    pub fn size(&self) -> usize {
        self.raw_text.len()
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration.as_millis() as u64
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// 一次执行的结果：收到响应，或网络层失败
#[derive(Debug, Clone)]
pub enum ResponseRecord {
    Received(Response),
    Failed { message: String, duration: Duration },
}

impl ResponseRecord {
    pub fn failed(message: impl Into<String>, duration: Duration) -> Self {
        ResponseRecord::Failed {
            message: message.into(),
            duration,
        }
    }

    pub fn response(&self) -> Option<&Response> {
        match self {
            ResponseRecord::Received(response) => Some(response),
            ResponseRecord::Failed { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ResponseRecord::Received(_) => None,
            ResponseRecord::Failed { message, .. } => Some(message),
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status.code())
    }

    pub fn duration(&self) -> Duration {
        match self {
            ResponseRecord::Received(response) => response.duration,
            ResponseRecord::Failed { duration, .. } => *duration,
        }
    }

    /// 只有收到 2xx 响应才算 ok；网络失败与非 2xx 都返回 false
    pub fn is_ok(&self) -> bool {
        self.response().is_some_and(Response::ok)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ResponseRecord::Failed { .. })
    }
}
