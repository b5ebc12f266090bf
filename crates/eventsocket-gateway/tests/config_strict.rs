#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use eventsocket_gateway::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
gateway:
  listen: "0.0.0.0:8080"
  pathh: "/ws" # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code(), "BAD_CONFIG");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.gateway.path, "/ws");
    assert_eq!(cfg.gateway.outbound_queue, 1024);
    assert_eq!(cfg.gateway.listen_addr().unwrap().port(), 8080);
}

#[test]
fn wrong_version_rejected() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.code(), "UNSUPPORTED_VERSION");
}

#[test]
fn out_of_range_values_rejected() {
    let cases = [
        "version: 1\ngateway:\n  ping_interval_ms: 10\n",
        "version: 1\ngateway:\n  ping_interval_ms: 30000\n  idle_timeout_ms: 20000\n",
        "version: 1\ngateway:\n  outbound_queue: 0\n",
        "version: 1\ngateway:\n  max_message_bytes: 0\n",
        "version: 1\ngateway:\n  path: \"ws\"\n",
        "version: 1\ngateway:\n  path: \"/ws/\"\n",
        "version: 1\ngateway:\n  listen: \"not-an-addr\"\n",
    ];
    for c in cases {
        let err = config::load_from_str(c).expect_err(c);
        assert_eq!(err.code(), "BAD_CONFIG", "case={c}");
    }
}

#[test]
fn zero_timings_rejected() {
    let mut cfg = config::GatewayConfig::default();
    cfg.gateway.ping_interval_ms = 0;
    assert_eq!(cfg.validate().unwrap_err().code(), "BAD_CONFIG");
}

#[test]
fn missing_file_is_bad_config() {
    let err = config::load_from_file("does/not/exist.yaml").expect_err("must fail");
    assert_eq!(err.code(), "BAD_CONFIG");
}
