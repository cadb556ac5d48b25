//! 认证注入
//!
//! `AuthConfig` 为每种认证方式分别保存字段，切换 `kind` 不会清空其它方式已填写的值；
//! 注入时通过 [`AuthConfig::active`] 投影为只携带当前方式数据的 [`Auth`]。

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::compose::draft::KeyValue;
use crate::http::Headers;
use crate::{Result, RureqError};

pub const AUTHORIZATION: &str = "Authorization";
pub const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AuthKind {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "apiKey")]
    ApiKey,
    #[serde(rename = "bearer")]
    Bearer,
    #[serde(rename = "basic")]
    Basic,
    #[serde(rename = "oauth2")]
    OAuth2,
}

impl FromStr for AuthKind {
    type Err = RureqError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(AuthKind::None),
            "apikey" | "api-key" | "api_key" => Ok(AuthKind::ApiKey),
            "bearer" => Ok(AuthKind::Bearer),
            "basic" => Ok(AuthKind::Basic),
            "oauth2" => Ok(AuthKind::OAuth2),
            _ => Err(RureqError::ParseError(format!("Invalid auth type: {}", s))),
        }
    }
}

/// API Key 放置的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    #[default]
    Header,
    Query,
}

impl FromStr for ApiKeyLocation {
    type Err = RureqError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "header" => Ok(ApiKeyLocation::Header),
            "query" => Ok(ApiKeyLocation::Query),
            _ => Err(RureqError::ParseError(format!(
                "Invalid API key location: {}",
                s
            ))),
        }
    }
}

impl fmt::Display for ApiKeyLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiKeyLocation::Header => f.write_str("header"),
            ApiKeyLocation::Query => f.write_str("query"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyAuth {
    pub key: String,
    /// 请求头名称，放在查询参数时作为参数名
    pub name: String,
    pub location: ApiKeyLocation,
}

impl Default for ApiKeyAuth {
    fn default() -> Self {
        Self {
            key: String::new(),
            name: DEFAULT_API_KEY_HEADER.to_string(),
            location: ApiKeyLocation::Header,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

/// 认证配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub kind: AuthKind,
    pub api_key: ApiKeyAuth,
    pub bearer_token: String,
    pub basic: BasicAuth,
    pub oauth2_token: String,
}

/// 当前生效的认证方式，只携带该方式需要的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth<'a> {
    None,
    ApiKey {
        name: &'a str,
        key: &'a str,
        location: ApiKeyLocation,
    },
    Bearer(&'a str),
    Basic {
        username: &'a str,
        password: &'a str,
    },
    OAuth2(&'a str),
}

impl AuthConfig {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            kind: AuthKind::Bearer,
            bearer_token: token.into(),
            ..Self::default()
        }
    }

    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            kind: AuthKind::Basic,
            basic: BasicAuth {
                username: username.into(),
                password: password.into(),
            },
            ..Self::default()
        }
    }

    pub fn api_key(
        name: impl Into<String>,
        key: impl Into<String>,
        location: ApiKeyLocation,
    ) -> Self {
        Self {
            kind: AuthKind::ApiKey,
            api_key: ApiKeyAuth {
                key: key.into(),
                name: name.into(),
                location,
            },
            ..Self::default()
        }
    }

    pub fn oauth2(token: impl Into<String>) -> Self {
        Self {
            kind: AuthKind::OAuth2,
            oauth2_token: token.into(),
            ..Self::default()
        }
    }

    /// 切换认证方式，其它方式已保存的值保持不变
    pub fn select(&mut self, kind: AuthKind) {
        self.kind = kind;
    }

    pub fn active(&self) -> Auth<'_> {
        match self.kind {
            AuthKind::None => Auth::None,
            AuthKind::ApiKey => Auth::ApiKey {
                name: &self.api_key.name,
                key: &self.api_key.key,
                location: self.api_key.location,
            },
            AuthKind::Bearer => Auth::Bearer(&self.bearer_token),
            AuthKind::Basic => Auth::Basic {
                username: &self.basic.username,
                password: &self.basic.password,
            },
            AuthKind::OAuth2 => Auth::OAuth2(&self.oauth2_token),
        }
    }

    /// 解析 "user:password" (CLI --basic)
    pub fn parse_basic(s: &str) -> Result<Self> {
        let (username, password) = s.split_once(':').unwrap_or((s, ""));
        if username.is_empty() {
            return Err(RureqError::ParseError(format!(
                "Invalid basic credentials: {}",
                s
            )));
        }
        Ok(Self::basic(username, password))
    }
}

/// 认证注入器
pub struct AuthInjector;

impl AuthInjector {
    /// 在显式请求头之后应用认证，同名键以认证为准
    ///
    /// 纯函数：返回新的请求头与查询参数。主凭据为空 (API key、token、用户名) 时不注入。
    pub fn inject(
        headers: &Headers,
        params: &[KeyValue],
        auth: &AuthConfig,
    ) -> (Headers, Vec<KeyValue>) {
        let mut headers = headers.clone();
        let mut params = params.to_vec();

        match auth.active() {
            Auth::None => {}
            Auth::ApiKey { name, key, location } => {
                if !key.is_empty() && !name.is_empty() {
                    match location {
                        ApiKeyLocation::Header => headers.set(name, key),
                        ApiKeyLocation::Query => params.push(KeyValue::new(name, key)),
                    }
                }
            }
            Auth::Bearer(token) | Auth::OAuth2(token) => {
                if !token.is_empty() {
                    headers.set(AUTHORIZATION, format!("Bearer {}", token));
                }
            }
            Auth::Basic { username, password } => {
                if !username.is_empty() {
                    headers.set(
                        AUTHORIZATION,
                        format!("Basic {}", Self::basic_credentials(username, password)),
                    );
                }
            }
        }

        (headers, params)
    }

    /// base64(username:password)
    pub fn basic_credentials(username: &str, password: &str) -> String {
        STANDARD.encode(format!("{}:{}", username, password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn explicit_headers() -> Headers {
        [("Authorization", "Foo"), ("Accept", "application/json")]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_none_is_noop() {
        let headers = explicit_headers();
        let (out, params) = AuthInjector::inject(&headers, &[], &AuthConfig::default());
        assert_eq!(out, headers);
        assert!(params.is_empty());
    }

    #[test]
    fn test_bearer_overrides_explicit_header() {
        let (out, _) = AuthInjector::inject(&explicit_headers(), &[], &AuthConfig::bearer("T"));
        assert_eq!(out.get("Authorization"), Some("Bearer T"));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_basic() {
        let (out, _) =
            AuthInjector::inject(&Headers::new(), &[], &AuthConfig::basic("user", "pass"));
        assert_eq!(out.get("Authorization"), Some("Basic dXNlcjpwYXNz"));
    }

    #[test]
    fn test_oauth2_static_token() {
        let (out, _) = AuthInjector::inject(&Headers::new(), &[], &AuthConfig::oauth2("tok"));
        assert_eq!(out.get("Authorization"), Some("Bearer tok"));
    }

    #[test]
    fn test_api_key_header() {
        let auth = AuthConfig::api_key("X-API-Key", "abc", ApiKeyLocation::Header);
        let (out, params) = AuthInjector::inject(&Headers::new(), &[], &auth);
        assert_eq!(out.get("X-API-Key"), Some("abc"));
        assert!(params.is_empty());
    }

    #[test]
    fn test_api_key_query() {
        let auth = AuthConfig::api_key("api_key", "abc", ApiKeyLocation::Query);
        let existing = vec![KeyValue::new("page", "1")];
        let (out, params) = AuthInjector::inject(&Headers::new(), &existing, &auth);
        assert!(out.is_empty());
        assert_eq!(params.len(), 2);
        assert_eq!(params[1], KeyValue::new("api_key", "abc"));
    }

    #[test]
    fn test_empty_credentials_inject_nothing() {
        let headers = explicit_headers();
        for auth in [
            AuthConfig::bearer(""),
            AuthConfig::oauth2(""),
            AuthConfig::basic("", "pass"),
            AuthConfig::api_key("X-API-Key", "", ApiKeyLocation::Header),
        ] {
            let (out, params) = AuthInjector::inject(&headers, &[], &auth);
            assert_eq!(out, headers);
            assert!(params.is_empty());
        }
    }

    #[test]
    fn test_switching_kind_keeps_values() {
        let mut auth = AuthConfig::bearer("T");
        auth.basic = BasicAuth {
            username: "u".into(),
            password: "p".into(),
        };

        auth.select(AuthKind::Basic);
        assert!(matches!(auth.active(), Auth::Basic { username: "u", .. }));

        auth.select(AuthKind::Bearer);
        assert_eq!(auth.active(), Auth::Bearer("T"));
    }

    #[test]
    fn test_parse_kind_and_basic() {
        assert_eq!("apiKey".parse::<AuthKind>().unwrap(), AuthKind::ApiKey);
        assert_eq!("OAuth2".parse::<AuthKind>().unwrap(), AuthKind::OAuth2);
        assert!("digest".parse::<AuthKind>().is_err());

        let auth = AuthConfig::parse_basic("admin:s3:cret").unwrap();
        assert_eq!(auth.basic.username, "admin");
        assert_eq!(auth.basic.password, "s3:cret");
        assert!(AuthConfig::parse_basic(":pw").is_err());
    }
}
