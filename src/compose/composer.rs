use tracing::debug;
use url::form_urlencoded;

use crate::compose::auth::AuthInjector;
use crate::compose::body::encode_body;
use crate::compose::draft::{KeyValue, RequestDraft};
use crate::http::{ComposedRequest, Headers, RequestBody};
use crate::variable::{Environment, VariableResolver};

/// 请求组装器：草稿 + 激活环境 -> 可发送的请求
pub struct Composer;

impl Composer {
    /// 组装请求
    ///
    /// 顺序：变量替换 -> 请求头 -> 认证注入 -> 查询字符串 -> 请求体。
    /// 组装不会失败；无法解析的变量保持原样。
    pub fn compose(draft: &RequestDraft, env: Option<&Environment>) -> ComposedRequest {
        let unresolved = VariableResolver::unresolved(&draft.url, env);
        if !unresolved.is_empty() {
            debug!(?unresolved, "URL contains unresolved variables");
        }

        let base_url = VariableResolver::resolve(&draft.url, env);
        let headers = Self::build_headers(&draft.headers, env);
        let params = Self::resolve_params(&draft.params, env);

        let (mut headers, params) = AuthInjector::inject(&headers, &params, &draft.auth);
        let url = Self::build_url(&base_url, &params);

        let body = if draft.sends_body() {
            let text = VariableResolver::resolve(&draft.body, env);
            encode_body(draft.method, draft.body_type, &text)
        } else {
            None
        };

        // multipart 的 boundary 由传输层生成
        if matches!(body, Some(RequestBody::Multipart(_))) {
            headers.remove_ignore_case("Content-Type");
        }

        ComposedRequest {
            method: draft.method,
            url,
            headers,
            body,
        }
    }

    /// 构建请求头表：只取启用且键非空的行，键和值都做变量替换，同名键后者覆盖前者
    pub fn build_headers(entries: &[KeyValue], env: Option<&Environment>) -> Headers {
        let mut headers = Headers::new();
        for entry in entries.iter().filter(|e| e.is_active()) {
            let key = VariableResolver::resolve(&entry.key, env);
            if key.is_empty() {
                continue;
            }
            headers.set(key, VariableResolver::resolve(&entry.value, env));
        }
        headers
    }

    /// 过滤出启用的查询参数，并对值做变量替换
    pub fn resolve_params(entries: &[KeyValue], env: Option<&Environment>) -> Vec<KeyValue> {
        entries
            .iter()
            .filter(|e| e.is_active())
            .map(|e| KeyValue::new(e.key.clone(), VariableResolver::resolve(&e.value, env)))
            .collect()
    }

    /// 将参数追加到 URL
    ///
    /// 使用 application/x-www-form-urlencoded 编码；URL 中已有 `?` 时以 `&` 连接。
    pub fn build_url(base: &str, params: &[KeyValue]) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        let mut appended = false;
        for param in params.iter().filter(|p| p.is_active()) {
            serializer.append_pair(&param.key, &param.value);
            appended = true;
        }

        if !appended {
            return base.to_string();
        }

        let separator = if base.contains('?') { '&' } else { '?' };
        format!("{}{}{}", base, separator, serializer.finish())
    }
}
