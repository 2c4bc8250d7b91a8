//! Postgres allowlist backend against a live database.
//!
//! Runs only when `BROVE_TEST_DATABASE_URL` (or `DATABASE_URL`) is set;
//! otherwise each test returns early. Rows use a per-run prefix and are
//! removed again, so a shared database is fine.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use brove_core::PubKey;
use brove_relay::store::{AllowlistStore, PgAllowlist};

fn database_url() -> Option<String> {
    std::env::var("BROVE_TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .filter(|s| !s.is_empty())
}

/// Unique per test run and test name; fits in VARCHAR(64).
fn key(test: &str, name: &str) -> PubKey {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    PubKey::new(format!("t{}-{nanos}-{test}-{name}", std::process::id()))
}

async fn open() -> Option<PgAllowlist> {
    let Some(url) = database_url() else {
        eprintln!("BROVE_TEST_DATABASE_URL not set, skipping");
        return None;
    };
    Some(PgAllowlist::connect(&url).await.expect("connect"))
}

#[tokio::test]
async fn double_add_keeps_one_row() {
    let Some(store) = open().await else { return };
    let alice = key("dup", "alice");

    store.add(&alice, "friend").await.unwrap();
    store.add(&alice, "again").await.unwrap();

    let rows: Vec<_> = store
        .entries()
        .await
        .unwrap()
        .into_iter()
        .filter(|e| e.pubkey == alice)
        .collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].reason, "friend");
    assert!(rows[0].created_at > UNIX_EPOCH);
    assert!(store.contains(&alice).await.unwrap());

    store.remove(&alice).await.unwrap();
}

#[tokio::test]
async fn remove_of_absent_row_is_not_found() {
    let Some(store) = open().await else { return };
    let dave = key("absent", "dave");

    let err = store.remove(&dave).await.unwrap_err();
    assert!(err.is_not_found(), "got: {err}");

    store.add(&dave, "").await.unwrap();
    store.remove(&dave).await.unwrap();
    assert!(!store.contains(&dave).await.unwrap());
    assert!(store.remove(&dave).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn list_follows_insertion_order() {
    let Some(store) = open().await else { return };
    let a = key("order", "a");
    let b = key("order", "b");

    store.add(&a, "").await.unwrap();
    store.add(&b, "").await.unwrap();

    let ours: Vec<PubKey> = store
        .list()
        .await
        .unwrap()
        .into_iter()
        .filter(|k| *k == a || *k == b)
        .collect();
    assert_eq!(ours, vec![a.clone(), b.clone()]);

    store.remove(&a).await.unwrap();
    store.remove(&b).await.unwrap();
}

#[tokio::test]
async fn empty_pubkey_never_reaches_storage() {
    let Some(store) = open().await else { return };
    assert!(!store.contains(&PubKey::new("")).await.unwrap());
    assert_eq!(
        store.add(&PubKey::new(""), "").await.unwrap_err().code().as_str(),
        "VALIDATION"
    );
}

#[tokio::test]
async fn reconnects_after_the_backend_drops_the_connection() {
    let Some(url) = database_url() else { return };
    let app_name = format!("brove_reconnect_{}", std::process::id());
    let sep = if url.contains('?') { '&' } else { '?' };
    let store = PgAllowlist::connect(&format!("{url}{sep}application_name={app_name}"))
        .await
        .expect("connect");
    store.health_check().await.unwrap();

    // kill the store's session from a second connection
    let (admin, conn) = tokio_postgres::connect(&url, tokio_postgres::NoTls).await.unwrap();
    tokio::spawn(async move {
        let _ = conn.await;
    });
    admin
        .execute(
            "SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE application_name = $1",
            &[&app_name],
        )
        .await
        .unwrap();

    let missing = key("reconnect", "x");
    let mut recovered = false;
    for _ in 0..50 {
        if store.contains(&missing).await.is_ok() {
            recovered = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(recovered, "store never reconnected");
    store.health_check().await.unwrap();
}
