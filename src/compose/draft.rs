use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::compose::auth::AuthConfig;
use crate::http::Method;
use crate::RureqError;

/// 请求头 / 查询参数的一行
///
/// 禁用的行保留在草稿里，但不参与组装。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
    pub enabled: bool,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            enabled: true,
        }
    }

    pub fn disabled(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            enabled: false,
            ..Self::new(key, value)
        }
    }

    /// 只有启用且键非空的行才会进入组装
    pub fn is_active(&self) -> bool {
        self.enabled && !self.key.is_empty()
    }

    /// 解析 "key:value" 形式 (CLI -H)
    pub fn parse_header(s: &str) -> Option<Self> {
        s.split_once(':')
            .map(|(k, v)| Self::new(k.trim(), v.trim()))
    }

    /// 解析 "key=value" 形式 (CLI -q)
    pub fn parse_param(s: &str) -> Option<Self> {
        s.split_once('=').map(|(k, v)| Self::new(k, v))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    None,
    #[default]
    Json,
    Form,
    Raw,
}

impl BodyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyType::None => "none",
            BodyType::Json => "json",
            BodyType::Form => "form",
            BodyType::Raw => "raw",
        }
    }
}

impl FromStr for BodyType {
    type Err = RureqError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(BodyType::None),
            "json" => Ok(BodyType::Json),
            "form" => Ok(BodyType::Form),
            "raw" => Ok(BodyType::Raw),
            _ => Err(RureqError::ParseError(format!("Invalid body type: {}", s))),
        }
    }
}

impl fmt::Display for BodyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 可编辑、尚未执行的请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDraft {
    pub name: String,
    pub method: Method,
    /// URL 模板 (变量替换之前)
    pub url: String,
    pub headers: Vec<KeyValue>,
    pub params: Vec<KeyValue>,
    pub body: String,
    pub body_type: BodyType,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Default for RequestDraft {
    fn default() -> Self {
        Self {
            name: String::from("Untitled Request"),
            method: Method::Get,
            url: String::new(),
            headers: vec![
                KeyValue::new("Content-Type", "application/json"),
                KeyValue::new("Accept", "application/json"),
            ],
            params: Vec::new(),
            body: String::new(),
            body_type: BodyType::Json,
            auth: AuthConfig::default(),
        }
    }
}

impl RequestDraft {
    /// 不带默认请求头的空草稿
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.add_header(key, value);
        self
    }

    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.add_param(key, value);
        self
    }

    pub fn with_body(mut self, body_type: BodyType, body: &str) -> Self {
        self.body_type = body_type;
        self.body = body.to_string();
        self
    }

    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    pub fn add_header(&mut self, key: &str, value: &str) {
        self.headers.push(KeyValue::new(key, value));
    }

    /// 删除指定位置的请求头，越界时返回 None
    pub fn remove_header(&mut self, index: usize) -> Option<KeyValue> {
        (index < self.headers.len()).then(|| self.headers.remove(index))
    }

    pub fn add_param(&mut self, key: &str, value: &str) {
        self.params.push(KeyValue::new(key, value));
    }

    pub fn remove_param(&mut self, index: usize) -> Option<KeyValue> {
        (index < self.params.len()).then(|| self.params.remove(index))
    }

    /// 当前方法与 body 类型组合下是否会发送请求体
    pub fn sends_body(&self) -> bool {
        self.method.allows_body() && self.body_type != BodyType::None
    }
}
