use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::compose::{BodyType, KeyValue, RequestDraft};
use crate::http::Method;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
    /// 列表中是否展开
    pub expanded: bool,
    pub requests: Vec<CollectionRequest>,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            expanded: true,
            requests: Vec::new(),
        }
    }

    pub fn get_request(&self, request_id: &str) -> Option<&CollectionRequest> {
        self.requests.iter().find(|r| r.id == request_id)
    }
}

/// 请求草稿的命名快照 (不包含认证信息)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRequest {
    pub id: String,
    pub name: String,
    pub method: Method,
    pub url: String,
    pub headers: Vec<KeyValue>,
    pub params: Vec<KeyValue>,
    pub body: String,
    pub body_type: BodyType,
    pub saved_at: DateTime<Utc>,
}

impl CollectionRequest {
    /// 名称为空时使用 `"<METHOD> Request"`
    pub fn snapshot(draft: &RequestDraft, name: Option<&str>) -> Self {
        let name = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("{} Request", draft.method),
        };

        Self {
            id: Uuid::new_v4().to_string(),
            name,
            method: draft.method,
            url: draft.url.clone(),
            headers: draft.headers.clone(),
            params: draft.params.clone(),
            body: draft.body.clone(),
            body_type: draft.body_type,
            saved_at: Utc::now(),
        }
    }
}

impl RequestDraft {
    /// 用快照覆盖当前草稿的方法、URL、请求头、参数和请求体；认证保持不变
    pub fn load_request(&mut self, snapshot: &CollectionRequest) {
        self.method = snapshot.method;
        self.url = snapshot.url.clone();
        self.headers = snapshot.headers.clone();
        self.params = snapshot.params.clone();
        self.body = snapshot.body.clone();
        self.body_type = snapshot.body_type;
    }
}
