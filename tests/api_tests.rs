use mockmate::{ApiClient, Config, Difficulty, SessionKind};
use std::io::Write;

#[test]
fn test_socket_url_anonymous_family() {
    let api = ApiClient::new("http://localhost:8000", "ws://localhost:8000");

    assert_eq!(
        api.socket_url(SessionKind::Algorithm, "sess-1"),
        "ws://localhost:8000/api/algorithm/sess-1/ws"
    );
    assert_eq!(
        api.socket_url(SessionKind::SystemDesign, "sess-2"),
        "ws://localhost:8000/api/system-design/sess-2/ws"
    );
}

#[test]
fn test_socket_url_authenticated_family_carries_token() {
    let api = ApiClient::new("http://localhost:8000", "ws://localhost:8000")
        .with_token("tok-123");

    assert_eq!(
        api.socket_url(SessionKind::Workplace, "sess-3"),
        "ws://localhost:8000/api/workplace/v2/sess-3/ws?token=tok-123"
    );
}

#[test]
fn test_base_urls_are_normalized() {
    // Trailing slashes must not produce double-slash endpoints.
    let api = ApiClient::new("http://localhost:8000/", "ws://localhost:8000/");
    assert_eq!(
        api.socket_url(SessionKind::Algorithm, "s"),
        "ws://localhost:8000/api/algorithm/s/ws"
    );
}

#[test]
fn test_difficulty_parsing() {
    assert_eq!("easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
    assert_eq!("medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
    assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
    assert!("extreme".parse::<Difficulty>().is_err());

    assert_eq!(Difficulty::Medium.to_string(), "medium");
    assert_eq!(
        serde_json::to_string(&Difficulty::Hard).unwrap(),
        r#""hard""#
    );
}

#[test]
fn test_config_loading() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mockmate.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        r#"
[service]
name = "mockmate"

[api]
base_url = "http://interviews.example.com"
ws_url = "ws://interviews.example.com"

[auth]
token = "tok-abc"
"#
    )
    .unwrap();

    let base = dir.path().join("mockmate");
    let cfg = Config::load(base.to_str().unwrap()).unwrap();

    assert_eq!(cfg.service.name, "mockmate");
    assert_eq!(cfg.api.base_url, "http://interviews.example.com");
    // Timeout falls back to the default when omitted.
    assert_eq!(cfg.api.timeout_secs, 30);
    assert_eq!(cfg.auth.token.as_deref(), Some("tok-abc"));

    let api = ApiClient::from_config(&cfg).unwrap();
    assert!(api.is_authenticated());
}

#[test]
fn test_config_without_auth_section() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mockmate.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        r#"
[service]
name = "mockmate"

[api]
base_url = "http://localhost:8000"
ws_url = "ws://localhost:8000"
timeout_secs = 5
"#
    )
    .unwrap();

    let base = dir.path().join("mockmate");
    let cfg = Config::load(base.to_str().unwrap()).unwrap();

    assert_eq!(cfg.api.timeout_secs, 5);
    assert!(cfg.auth.token.is_none());

    let api = ApiClient::from_config(&cfg).unwrap();
    assert!(!api.is_authenticated());
}
