mod common;

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use common::{affected_url, desk, incidents_url, search_url, ScriptedTransport};
use desk_api::http::Method;
use desk_core::cache::ManualClock;
use pretty_assertions::assert_eq;
use serde_json::json;

fn numbers(desk: &desk_api::Desk, force: bool) -> Vec<String> {
    desk.incidents(force).into_iter().map(|i| i.number).collect()
}

#[test]
fn incidents_are_cached_until_ttl_elapses() {
    let transport = ScriptedTransport::new();
    transport.json(
        Method::Get,
        &incidents_url(),
        200,
        json!({"result": [{"number": "INC001", "short_description": "Printer jam"}]}),
    );
    let clock = Arc::new(ManualClock::new(0));
    let desk = desk(&transport, &clock);
    let ttl = desk.config().incidents_cache_ttl.as_millis() as u64;

    assert_eq!(numbers(&desk, false), vec!["INC001"]);
    clock.set(ttl - 1);
    assert_eq!(numbers(&desk, false), vec!["INC001"]);
    assert_eq!(transport.count(Method::Get, &incidents_url()), 1);

    clock.set(ttl + 1);
    assert_eq!(numbers(&desk, false), vec!["INC001"]);
    assert_eq!(transport.count(Method::Get, &incidents_url()), 2);
}

#[test]
fn incidents_request_carries_pagination_and_bearer() {
    let transport = ScriptedTransport::new();
    transport.json(Method::Get, &incidents_url(), 200, json!([]));
    let clock = Arc::new(ManualClock::new(0));
    let desk = desk(&transport, &clock);

    assert!(desk.incidents(false).is_empty());

    let sent = transport.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].query_value("limit"), Some("20"));
    assert_eq!(sent[0].query_value("offset"), Some("0"));
    assert_eq!(sent[0].header_value("authorization"), Some("Bearer token-123"));
}

#[test]
fn force_refresh_bypasses_live_entry() {
    let transport = ScriptedTransport::new();
    transport.json(Method::Get, &incidents_url(), 200, json!({"data": [{"number": "INC001"}]}));
    transport.json(Method::Get, &incidents_url(), 200, json!({"data": [{"number": "INC002"}]}));
    let clock = Arc::new(ManualClock::new(0));
    let desk = desk(&transport, &clock);

    assert_eq!(numbers(&desk, false), vec!["INC001"]);
    assert_eq!(numbers(&desk, true), vec!["INC002"]);
    assert_eq!(numbers(&desk, false), vec!["INC002"]);
}

#[test]
fn incident_failures_serve_uncached_placeholders() {
    let transport = ScriptedTransport::new();
    transport.text(Method::Get, &incidents_url(), 500, "oops");
    let clock = Arc::new(ManualClock::new(0));
    let desk = desk(&transport, &clock);

    assert_eq!(numbers(&desk, false), vec!["INC-FALLBACK-1", "INC-FALLBACK-2"]);
    assert_eq!(numbers(&desk, false), vec!["INC-FALLBACK-1", "INC-FALLBACK-2"]);
    assert_eq!(transport.count(Method::Get, &incidents_url()), 2);
    assert_eq!(desk.incidents_api().stats().entries, 0);
}

#[test]
fn unrecognised_incident_payload_serves_placeholders() {
    let transport = ScriptedTransport::new();
    transport.json(Method::Get, &incidents_url(), 200, json!({"status": "ok", "count": 3}));
    let clock = Arc::new(ManualClock::new(0));
    let desk = desk(&transport, &clock);

    assert_eq!(numbers(&desk, false), vec!["INC-FALLBACK-1", "INC-FALLBACK-2"]);
}

#[test]
fn unreachable_backend_serves_placeholders() {
    let transport = ScriptedTransport::new();
    transport.unreachable(Method::Get, &incidents_url());
    let clock = Arc::new(ManualClock::new(0));
    let desk = desk(&transport, &clock);

    assert_eq!(desk.incidents(false).len(), 2);
}

#[test]
fn failed_refresh_keeps_previous_entry() {
    let transport = ScriptedTransport::new();
    transport.json(Method::Get, &incidents_url(), 200, json!([{"number": "INC001"}]));
    transport.text(Method::Get, &incidents_url(), 503, "");
    let clock = Arc::new(ManualClock::new(0));
    let desk = desk(&transport, &clock);

    assert_eq!(numbers(&desk, false), vec!["INC001"]);
    assert_eq!(numbers(&desk, true), vec!["INC-FALLBACK-1", "INC-FALLBACK-2"]);
    assert_eq!(numbers(&desk, false), vec!["INC001"]);
}

#[test]
fn affected_users_missing_incident_gets_placeholder_per_number() {
    let transport = ScriptedTransport::new();
    transport.text(Method::Get, &affected_url("INC1867021"), 404, "");
    transport.text(Method::Get, &affected_url("INC0000042"), 404, "");
    let clock = Arc::new(ManualClock::new(0));
    let desk = desk(&transport, &clock);

    assert_eq!(desk.affected_users("INC1867021", false)[0].name, "Luis Valdez");
    assert_eq!(desk.affected_users("INC0000042", false)[0].name, "NTT ebonding User");
}

#[test]
fn affected_users_are_cached_per_incident() {
    let transport = ScriptedTransport::new();
    transport.json(
        Method::Get,
        &affected_url("INC001"),
        200,
        json!({"users": [{"id": "u1", "name": "Ana", "email": "ana@x"}]}),
    );
    transport.json(
        Method::Get,
        &affected_url("INC002"),
        200,
        json!({"sys_id": "u2", "display_name": "Ben"}),
    );
    let clock = Arc::new(ManualClock::new(0));
    let desk = desk(&transport, &clock);

    assert_eq!(desk.affected_users("INC001", false)[0].name, "Ana");
    assert_eq!(desk.affected_users("INC002", false)[0].name, "Ben");
    assert_eq!(desk.affected_users("INC001", false)[0].id, "u1");
    assert_eq!(transport.count(Method::Get, &affected_url("INC001")), 1);
    assert_eq!(desk.affected_users_api().stats().entries, 2);
}

#[test]
fn blank_search_sends_nothing() {
    let transport = ScriptedTransport::new();
    let clock = Arc::new(ManualClock::new(0));
    let desk = desk(&transport, &clock);

    assert!(desk.search_users("   ").is_empty());
    assert!(transport.requests().is_empty());
}

#[test]
fn search_cache_key_ignores_case() {
    let transport = ScriptedTransport::new();
    transport.json(
        Method::Get,
        &search_url(),
        200,
        json!({"result": [{"sys_id": "7", "name": "Renukumar P", "email": "r@x"}, {"sys_id": "8"}]}),
    );
    let clock = Arc::new(ManualClock::new(0));
    let desk = desk(&transport, &clock);

    let first = desk.search_users("Renu");
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].id, "7");
    assert_eq!(desk.search_users("rENU"), first);

    let sent = transport.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].query_value("q"), Some("Renu"));
}

#[test]
fn search_failure_filters_local_directory() {
    let transport = ScriptedTransport::new();
    transport.text(Method::Get, &search_url(), 500, "");
    let clock = Arc::new(ManualClock::new(0));
    let desk = desk(&transport, &clock);

    let names: Vec<String> = desk
        .search_users("network")
        .into_iter()
        .map(|u| u.name)
        .collect();
    assert_eq!(names, vec!["Sarah Johnson", "Robert Brown"]);
}

#[test]
fn concurrent_misses_share_one_request() {
    let transport = ScriptedTransport::with_delay(Duration::from_millis(150));
    transport.json(Method::Get, &incidents_url(), 200, json!([{"number": "INC001"}]));
    let clock = Arc::new(ManualClock::new(0));
    let desk = Arc::new(desk(&transport, &clock));
    let barrier = Arc::new(Barrier::new(4));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let desk = desk.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                desk.incidents(false)
            })
        })
        .collect();

    for handle in handles {
        let got = handle.join().unwrap();
        assert_eq!(got[0].number, "INC001");
    }
    assert_eq!(transport.count(Method::Get, &incidents_url()), 1);
}

#[test]
fn clear_caches_forces_reload() {
    let transport = ScriptedTransport::new();
    transport.json(Method::Get, &incidents_url(), 200, json!([{"number": "INC001"}]));
    let clock = Arc::new(ManualClock::new(0));
    let desk = desk(&transport, &clock);

    desk.incidents(false);
    desk.clear_caches();
    desk.incidents(false);
    assert_eq!(transport.count(Method::Get, &incidents_url()), 2);
}
