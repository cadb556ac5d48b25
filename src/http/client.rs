use std::error::Error as _;
use std::time::{Duration, Instant};

use reqwest::multipart::Form;
use tracing::{debug, warn};

use crate::Result;
use crate::http::request::{ComposedRequest, RequestBody};
use crate::http::response::{Response, ResponseRecord};
use crate::http::types::Status;

#[derive(Clone)]
pub struct Client {
    inner: reqwest::Client,
}

impl Client {
    /// 创建客户端；默认不设置超时
    pub fn new() -> Result<Self> {
        Self::with_timeout(None)
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            inner: builder.build()?,
        })
    }

    /// 执行请求
    ///
    /// 永远不会返回错误：网络层失败 (DNS、连接拒绝、超时、非法头部等) 变为
    /// `ResponseRecord::Failed`，任何 HTTP 状态码都视为正常响应。不做重试。
    pub async fn execute(&self, request: &ComposedRequest) -> ResponseRecord {
        let builder = match self.build(request) {
            Ok(builder) => builder,
            Err(message) => {
                warn!(url = %request.url, "Failed to build request: {}", message);
                return ResponseRecord::failed(message, Duration::ZERO);
            }
        };

        debug!(method = %request.method, url = %request.url, "Sending request");

        let start = Instant::now();
        let result = builder.send().await;
        let duration = start.elapsed();

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                let message = describe_error(&e);
                warn!(url = %request.url, "Request failed: {}", message);
                return ResponseRecord::failed(message, duration);
            }
        };

        let status = Status::from(response.status());
        let status_text = status.reason_phrase().to_string();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect();

        // 响应体读取中断 (连接断开等) 也属于网络层失败，不产生部分结果
        let raw_text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                let message = describe_error(&e);
                warn!(url = %request.url, "Failed to read response body: {}", message);
                return ResponseRecord::failed(message, start.elapsed());
            }
        };

        debug!(
            status = status.code(),
            duration_ms = duration.as_millis() as u64,
            size = raw_text.len(),
            "Received response"
        );

        ResponseRecord::Received(Response::new(
            status,
            status_text,
            headers,
            raw_text,
            duration,
        ))
    }

    fn build(&self, request: &ComposedRequest) -> std::result::Result<reqwest::RequestBuilder, String> {
        let url = reqwest::Url::parse(&request.url)
            .map_err(|e| format!("Invalid URL '{}': {}", request.url, e))?;
        let headers = request.headers.to_header_map().map_err(|e| e.to_string())?;

        let mut builder = self
            .inner
            .request(request.method.into(), url)
            .headers(headers);

        builder = match &request.body {
            None => builder,
            Some(RequestBody::Multipart(fields)) => {
                let form = fields
                    .iter()
                    .fold(Form::new(), |form, field| {
                        form.text(field.name.clone(), field.value.clone())
                    });
                builder.multipart(form)
            }
            Some(body) => builder.body(body.as_text().unwrap_or_default().to_string()),
        };

        Ok(builder)
    }
}

/// 拼接错误及其来源链，得到可读的错误信息
fn describe_error(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
