use serde_json::Value;
use tracing::debug;

use crate::compose::draft::BodyType;
use crate::http::{FormField, Method, RequestBody};
use crate::{Result, RureqError};

/// 根据方法和 body 类型构建请求体 (文本已完成变量替换)
///
/// 只有 POST / PUT / PATCH 且类型不是 none 时才会产生请求体。
pub fn encode_body(method: Method, body_type: BodyType, text: &str) -> Option<RequestBody> {
    if !method.allows_body() {
        return None;
    }

    match body_type {
        BodyType::None => None,
        BodyType::Json => Some(RequestBody::Json(text.to_string())),
        BodyType::Raw => Some(RequestBody::Raw(text.to_string())),
        BodyType::Form => Some(match parse_form_fields(text) {
            Ok(fields) => RequestBody::Multipart(fields),
            Err(e) => {
                debug!("Form body is not a JSON object, sending as text: {}", e);
                RequestBody::FormFallback {
                    text: text.to_string(),
                    reason: e.to_string(),
                }
            }
        }),
    }
}

/// 将 JSON 对象的每个属性转换为表单字段
///
/// 字符串值原样使用，其它值使用其 JSON 文本。顶层不是对象时返回错误。
pub fn parse_form_fields(text: &str) -> Result<Vec<FormField>> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Object(map) = value else {
        return Err(RureqError::ParseError(
            "form body must be a JSON object".to_string(),
        ));
    };

    Ok(map
        .into_iter()
        .map(|(name, value)| {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            FormField::new(name, value)
        })
        .collect())
}
