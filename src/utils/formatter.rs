use crate::http::{Response, ResponseBody, ResponseRecord};
use colored::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Compact,
    Verbose,
}

pub struct ResponseFormatter {
    format: ResponseFormat,
    color: bool,
    show_body: bool,
    show_timing: bool,
}

impl ResponseFormatter {
    pub fn new(format: ResponseFormat) -> Self {
        Self {
            format,
            color: true,
            show_body: true,
            show_timing: true,
        }
    }

    pub fn without_color(mut self) -> Self {
        self.color = false;
        self
    }

    pub fn format(&self, record: &ResponseRecord) -> String {
        match record {
            ResponseRecord::Received(response) => self.format_response(response),
            ResponseRecord::Failed { message, duration } => {
                let mut output = vec![self.paint(format!("Error: {}", message), |s| s.red().bold())];
                if self.show_timing {
                    output.push(self.paint(format!("Time: {}ms", duration.as_millis()), |s| s.cyan()));
                }
                output.join("\n")
            }
        }
    }

    fn format_response(&self, response: &Response) -> String {
        let mut output = Vec::new();
        let status_line = format!("HTTP {} {}", response.status.code(), response.status_text);
        let bold = self.format == ResponseFormat::Verbose;
        output.push(self.paint(status_line, |s| {
            let s = if response.ok() {
                s.green()
            } else if response.is_client_error() {
                s.yellow()
            } else {
                s.red()
            };
            if bold { s.bold() } else { s }
        }));

        if self.show_timing {
            let timing = format!("Time: {}ms  Size: {} B", response.duration_ms(), response.size());
            output.push(self.paint(timing, |s| s.cyan()));
        }

        if self.format == ResponseFormat::Verbose {
            output.push(String::new());
            output.push(self.paint("Headers:".to_string(), |s| s.blue().bold()));
            for (key, value) in &response.headers {
                output.push(self.paint(format!("   {}: {}", key, value), |s| s.blue()));
            }
        }

        if self.show_body && !response.raw_text.is_empty() {
            if self.format == ResponseFormat::Verbose {
                output.push(String::new());
                output.push(self.paint("Body:".to_string(), |s| s.blue().bold()));
            }
            if let ResponseBody::InvalidJson { reason, .. } = &response.body {
                output.push(self.paint(format!("(invalid JSON: {})", reason), |s| s.yellow()));
            }
            output.push(Self::body_text(&response.body));
        }

        output.join("\n")
    }

    /// JSON 美化输出，其它内容原样显示
    fn body_text(body: &ResponseBody) -> String {
        match body {
            ResponseBody::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            ResponseBody::Text(raw) | ResponseBody::InvalidJson { raw, .. } => raw.clone(),
        }
    }

    fn paint(&self, text: String, style: impl FnOnce(ColoredString) -> ColoredString) -> String {
        if self.color {
            style(text.as_str().normal()).to_string()
        } else {
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Status;
    use std::time::Duration;

    fn response(content_type: &str, body: &str) -> ResponseRecord {
        ResponseRecord::Received(Response::new(
            Status::new(200).unwrap(),
            "OK".to_string(),
            vec![("content-type".to_string(), content_type.to_string())],
            body.to_string(),
            Duration::from_millis(12),
        ))
    }

    #[test]
    fn test_compact_json_pretty_printed() {
        let formatter = ResponseFormatter::new(ResponseFormat::Compact).without_color();
        let output = formatter.format(&response("application/json", r#"{"users":[]}"#));
        assert_eq!(
            output,
            "HTTP 200 OK\nTime: 12ms  Size: 12 B\n{\n  \"users\": []\n}"
        );
    }

    #[test]
    fn test_verbose_shows_headers_and_invalid_json() {
        let formatter = ResponseFormatter::new(ResponseFormat::Verbose).without_color();
        let output = formatter.format(&response("application/json", "not json"));
        assert!(output.contains("   content-type: application/json"));
        assert!(output.contains("(invalid JSON:"));
        assert!(output.ends_with("not json"));
    }

    #[test]
    fn test_failure() {
        let formatter = ResponseFormatter::new(ResponseFormat::Compact).without_color();
        let output = formatter.format(&ResponseRecord::failed("connection refused", Duration::from_millis(3)));
        assert_eq!(output, "Error: connection refused\nTime: 3ms");
    }
}
