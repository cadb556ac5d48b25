use rureq::compose::{AuthConfig, BodyType, RequestDraft};
use rureq::generator::{SnippetGenerator, SnippetLanguage};
use rureq::session::Session;
use rureq::http::Method;

/// 三种代码片段包含同样的 URL 和请求头
#[test]
fn test_snippets_share_url_and_headers() {
    let session = Session::new().unwrap();
    let draft = RequestDraft::new(Method::Post, "https://api.test/users")
        .with_param("dry_run", "true")
        .with_header("X-Key", "abc123")
        .with_header("Content-Type", "application/json")
        .with_body(BodyType::Json, r#"{"name":"alice","admin":false}"#)
        .with_auth(AuthConfig::bearer("T"));

    let composed = session.compose(&draft);
    assert_eq!(composed.url, "https://api.test/users?dry_run=true");

    for language in SnippetLanguage::all() {
        let snippet = SnippetGenerator::generate(language, &composed);
        assert!(snippet.contains(&composed.url), "{}: url missing", language);
        for (key, value) in composed.headers.iter() {
            assert!(snippet.contains(key), "{}: header {} missing", language, key);
            assert!(snippet.contains(value), "{}: value {} missing", language, value);
        }
    }
}

#[test]
fn test_snippet_bodies() {
    let session = Session::new().unwrap();
    let draft = RequestDraft::new(Method::Post, "https://api.test/users")
        .with_body(BodyType::Json, r#"{"admin":false}"#);

    let curl = session.snippet(SnippetLanguage::Curl, &draft);
    assert!(curl.contains(r#"-d '{"admin":false}'"#));

    let javascript = session.snippet(SnippetLanguage::JavaScript, &draft);
    assert!(javascript.contains(r#"body: JSON.stringify({"admin":false}),"#));

    let python = session.snippet(SnippetLanguage::Python, &draft);
    assert!(python.contains(r#"data = {"admin": False}"#));
    assert!(python.contains("requests.post(url, headers=headers, json=data)"));
}

#[test]
fn test_snippet_values_are_escaped() {
    let session = Session::new().unwrap();
    let draft = RequestDraft::new(Method::Get, "https://api.test/search").with_header("X-Quote", "say \"hi\"");

    let curl = session.snippet(SnippetLanguage::Curl, &draft);
    assert!(curl.contains(r#"-H "X-Quote: say \"hi\"""#));

    let python = session.snippet(SnippetLanguage::Python, &draft);
    assert!(python.contains(r#""X-Quote": "say \"hi\"""#));
}
