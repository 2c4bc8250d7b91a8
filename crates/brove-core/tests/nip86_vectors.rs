//! Management call and event vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use brove_core::protocol::nip86::{MethodParams, SUPPORTED_METHODS};
use brove_core::protocol::Event;

fn load(name: &str) -> String {
    fs::read_to_string(format!("tests/vectors/{name}")).unwrap()
}

#[test]
fn parse_allowpubkey_with_reason() {
    let call = MethodParams::from_json(&load("allowpubkey.json")).unwrap();
    match call {
        MethodParams::AllowPubKey { pubkey, reason } => {
            assert_eq!(pubkey.as_str().len(), 64);
            assert_eq!(reason, "friend");
        }
        other => panic!("unexpected call: {other:?}"),
    }
}

#[test]
fn parse_banpubkey_without_reason() {
    let call = MethodParams::from_json(&load("banpubkey_no_reason.json")).unwrap();
    assert_eq!(
        call,
        MethodParams::BanPubKey { pubkey: "dave".into(), reason: String::new() }
    );
    assert_eq!(call.method_name(), "banpubkey");
}

#[test]
fn parse_listing() {
    let call = MethodParams::from_json(&load("listallowedpubkeys.json")).unwrap();
    assert_eq!(call, MethodParams::ListAllowedPubKeys);
}

#[test]
fn unknown_method_is_bad_request() {
    let err = MethodParams::from_json(&load("unknown_method.json")).unwrap_err();
    assert_eq!(err.code().as_str(), "BAD_REQUEST");
    assert!(err.to_string().contains("changerelayname"));
}

#[test]
fn allowpubkey_requires_string_pubkey() {
    let err = MethodParams::from_json(r#"{"method":"allowpubkey","params":[42]}"#).unwrap_err();
    assert_eq!(err.code().as_str(), "BAD_REQUEST");
}

#[test]
fn every_parsed_method_is_advertised() {
    for name in SUPPORTED_METHODS {
        let body = format!(r#"{{"method":"{name}","params":["x"]}}"#);
        let call = MethodParams::from_json(&body).unwrap();
        assert_eq!(call.method_name(), *name);
    }
}

#[test]
fn parse_metadata_event() {
    let ev: Event = serde_json::from_str(&load("event_metadata.json")).unwrap();
    assert_eq!(ev.kind, 0);
    assert_eq!(ev.tags.len(), 1);
    assert_eq!(ev.pubkey.as_str().len(), 64);
}
