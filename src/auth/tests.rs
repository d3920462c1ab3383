//! Tests for the auth module

use super::*;
use pretty_assertions::assert_eq;

fn request() -> reqwest::RequestBuilder {
    reqwest::Client::new().get("https://example.com/pub/player/hikaru")
}

#[test]
fn test_anonymous_adds_nothing() {
    let built = Credentials::default().apply(request()).build().unwrap();
    assert!(built.headers().get("Authorization").is_none());
    assert!(built.url().query().is_none());
    assert!(Credentials::default().is_anonymous());
}

#[test]
fn test_header_credentials() {
    let creds = Credentials::Header {
        name: "X-Gateway-Key".to_string(),
        value: "k-123".to_string(),
    };
    let built = creds.apply(request()).build().unwrap();
    assert_eq!(built.headers().get("X-Gateway-Key").unwrap(), "k-123");
}

#[test]
fn test_query_credentials() {
    let creds = Credentials::Query {
        param: "key".to_string(),
        value: "secret".to_string(),
    };
    let built = creds.apply(request()).build().unwrap();
    assert_eq!(built.url().query(), Some("key=secret"));
}

#[test]
fn test_bearer_credentials() {
    let creds = Credentials::Bearer {
        token: "t0k".to_string(),
    };
    let built = creds.apply(request()).build().unwrap();
    assert_eq!(built.headers().get("Authorization").unwrap(), "Bearer t0k");
}

#[test]
fn test_basic_credentials() {
    let creds = Credentials::Basic {
        username: "user".to_string(),
        password: Some("pass".to_string()),
    };
    let built = creds.apply(request()).build().unwrap();
    assert_eq!(
        built.headers().get("Authorization").unwrap(),
        "Basic dXNlcjpwYXNz"
    );
}

#[test]
fn test_from_yaml() {
    let creds: Credentials =
        serde_yaml::from_str("type: header\nname: X-Gateway-Key\nvalue: abc").unwrap();
    assert_eq!(
        creds,
        Credentials::Header {
            name: "X-Gateway-Key".to_string(),
            value: "abc".to_string()
        }
    );

    let creds: Credentials = serde_yaml::from_str("type: basic\nusername: u").unwrap();
    assert_eq!(
        creds,
        Credentials::Basic {
            username: "u".to_string(),
            password: None
        }
    );
}

#[test]
fn test_debug_redacts_secrets() {
    let creds = Credentials::Basic {
        username: "user".to_string(),
        password: Some("hunter2".to_string()),
    };
    let rendered = format!("{creds:?}");
    assert!(rendered.contains("user"));
    assert!(!rendered.contains("hunter2"));

    let bearer = format!(
        "{:?}",
        Credentials::Bearer {
            token: "t0k".to_string()
        }
    );
    assert!(!bearer.contains("t0k"));
}
