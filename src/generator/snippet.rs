use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::http::{ComposedRequest, FormField, RequestBody};
use crate::RureqError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetLanguage {
    Curl,
    JavaScript,
    Python,
}

impl SnippetLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnippetLanguage::Curl => "curl",
            SnippetLanguage::JavaScript => "javascript",
            SnippetLanguage::Python => "python",
        }
    }

    pub fn all() -> [SnippetLanguage; 3] {
        [
            SnippetLanguage::Curl,
            SnippetLanguage::JavaScript,
            SnippetLanguage::Python,
        ]
    }
}

impl FromStr for SnippetLanguage {
    type Err = RureqError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "curl" => Ok(SnippetLanguage::Curl),
            "javascript" | "js" | "fetch" => Ok(SnippetLanguage::JavaScript),
            "python" | "py" | "requests" => Ok(SnippetLanguage::Python),
            _ => Err(RureqError::ParseError(format!(
                "Unsupported snippet language: {}",
                s
            ))),
        }
    }
}

impl fmt::Display for SnippetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 将组装好的请求渲染为 cURL / JavaScript fetch / Python requests 代码
///
/// 三种输出使用同一个 URL、同一组请求头 (含认证) 和同一个请求体。
pub struct SnippetGenerator;

impl SnippetGenerator {
    pub fn generate(language: SnippetLanguage, request: &ComposedRequest) -> String {
        match language {
            SnippetLanguage::Curl => Self::curl(request),
            SnippetLanguage::JavaScript => Self::javascript(request),
            SnippetLanguage::Python => Self::python(request),
        }
    }

    fn curl(request: &ComposedRequest) -> String {
        let mut parts = vec![format!(
            "curl -X {} \"{}\"",
            request.method,
            shell_double_quoted(&request.url)
        )];

        for (key, value) in request.headers.iter() {
            parts.push(format!(
                "-H \"{}: {}\"",
                shell_double_quoted(key),
                shell_double_quoted(value)
            ));
        }

        match body_for(request) {
            None => {}
            Some(RequestBody::Multipart(fields)) => {
                for field in fields {
                    parts.push(format!(
                        "-F \"{}={}\"",
                        shell_double_quoted(&field.name),
                        shell_double_quoted(&field.value)
                    ));
                }
            }
            Some(body) => {
                let text = body.as_text().unwrap_or_default();
                parts.push(format!("-d '{}'", text.replace('\'', "'\\''")));
            }
        }

        parts.join(" \\\n  ")
    }

    fn javascript(request: &ComposedRequest) -> String {
        let mut output = String::new();
        let body = body_for(request);

        if let Some(RequestBody::Multipart(fields)) = body {
            output.push_str("const formData = new FormData();\n");
            for FormField { name, value } in fields {
                output.push_str(&format!(
                    "formData.append({}, {});\n",
                    quoted(name),
                    quoted(value)
                ));
            }
            output.push('\n');
        }

        output.push_str(&format!("fetch({}, {{\n", quoted(&request.url)));
        output.push_str(&format!("  method: {},\n", quoted(request.method.as_str())));

        if request.headers.is_empty() {
            output.push_str("  headers: {},\n");
        } else {
            output.push_str("  headers: {\n");
            let lines: Vec<String> = request
                .headers
                .iter()
                .map(|(k, v)| format!("    {}: {}", quoted(k), quoted(v)))
                .collect();
            output.push_str(&lines.join(",\n"));
            output.push_str("\n  },\n");
        }

        match body {
            None => {}
            Some(RequestBody::Multipart(_)) => output.push_str("  body: formData,\n"),
            Some(body) => {
                let text = body.as_text().unwrap_or_default();
                match json_body(body) {
                    Some(_) => {
                        output.push_str(&format!("  body: JSON.stringify({}),\n", text.trim()))
                    }
                    None => output.push_str(&format!("  body: {},\n", quoted(text))),
                }
            }
        }

        output.push_str("})\n");
        output.push_str("  .then(res => res.json())\n");
        output.push_str("  .then(data => console.log(data))\n");
        output.push_str("  .catch(err => console.error(err))");
        output
    }

    fn python(request: &ComposedRequest) -> String {
        let mut output = String::from("import requests\n\n");
        output.push_str(&format!("url = {}\n", quoted(&request.url)));

        if request.headers.is_empty() {
            output.push_str("headers = {}\n");
        } else {
            output.push_str("headers = {\n");
            let lines: Vec<String> = request
                .headers
                .iter()
                .map(|(k, v)| format!("    {}: {}", quoted(k), quoted(v)))
                .collect();
            output.push_str(&lines.join(",\n"));
            output.push_str("\n}\n");
        }

        let method = request.method.as_str().to_lowercase();
        let call = match body_for(request) {
            None => format!("requests.{}(url, headers=headers)", method),
            Some(RequestBody::Multipart(fields)) => {
                let entries: Vec<String> = fields
                    .iter()
                    .map(|f| format!("    {}: (None, {})", quoted(&f.name), quoted(&f.value)))
                    .collect();
                output.push_str(&format!("files = {{\n{}\n}}\n", entries.join(",\n")));
                format!("requests.{}(url, headers=headers, files=files)", method)
            }
            Some(body) => match json_body(body) {
                Some(value) => {
                    output.push_str(&format!("data = {}\n", python_literal(&value)));
                    format!("requests.{}(url, headers=headers, json=data)", method)
                }
                None => {
                    let text = body.as_text().unwrap_or_default();
                    output.push_str(&format!("payload = {}\n", quoted(text)));
                    format!("requests.{}(url, headers=headers, data=payload)", method)
                }
            },
        };

        output.push_str(&format!("\nresponse = {}\n", call));
        output.push_str("print(response.json())");
        output
    }
}

/// 只有允许携带请求体的方法才渲染 body
fn body_for(request: &ComposedRequest) -> Option<&RequestBody> {
    request
        .body
        .as_ref()
        .filter(|_| request.method.allows_body())
}

/// JSON 类型且内容可解析时返回解析结果
fn json_body(body: &RequestBody) -> Option<Value> {
    match body {
        RequestBody::Json(text) => serde_json::from_str(text).ok(),
        _ => None,
    }
}

/// 双引号字符串字面量 (JavaScript 与 Python 通用的 JSON 转义)
fn quoted(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

/// shell 双引号内需要转义的字符
fn shell_double_quoted(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn python_literal(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quoted(s),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(python_literal).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", quoted(k), python_literal(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}
