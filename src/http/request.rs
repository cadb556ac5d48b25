use serde::{Deserialize, Serialize};

use crate::http::types::{Headers, Method};

/// 组装完成、可直接发送的请求
///
/// 变量替换与认证注入都已完成。执行器和代码片段生成器消费的是同一个值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    pub body: Option<RequestBody>,
}

impl ComposedRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.set(key, value);
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }
}

/// multipart 表单中的一个文本字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

impl FormField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// 请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestBody {
    /// JSON 文本，原样发送 (不校验)
    Json(String),
    /// 原始文本
    Raw(String),
    /// multipart/form-data 字段
    Multipart(Vec<FormField>),
    /// form 类型但文本不是 JSON 对象，退回为原始文本发送
    FormFallback { text: String, reason: String },
}

impl RequestBody {
    /// 作为文本发送时的内容；multipart 返回 None
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RequestBody::Json(text) | RequestBody::Raw(text) => Some(text),
            RequestBody::FormFallback { text, .. } => Some(text),
            RequestBody::Multipart(_) => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, RequestBody::FormFallback { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_as_text() {
        assert_eq!(RequestBody::Json("{}".into()).as_text(), Some("{}"));
        assert_eq!(RequestBody::Raw("hi".into()).as_text(), Some("hi"));
        let fallback = RequestBody::FormFallback {
            text: "{bad".into(),
            reason: "EOF".into(),
        };
        assert_eq!(fallback.as_text(), Some("{bad"));
        assert!(fallback.is_fallback());
        assert_eq!(
            RequestBody::Multipart(vec![FormField::new("a", "1")]).as_text(),
            None
        );
    }

    #[test]
    fn test_builder() {
        let request = ComposedRequest::new(Method::Post, "http://x")
            .with_header("Accept", "application/json")
            .with_body(RequestBody::Raw("ping".into()));
        assert_eq!(request.headers.get("Accept"), Some("application/json"));
        assert_eq!(request.body.unwrap().as_text(), Some("ping"));
    }
}
