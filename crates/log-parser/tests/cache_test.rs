use chrono::{TimeDelta, TimeZone, Utc};
use cozy_log_parser::cache::{CacheEntry, DEFAULT_TTL, TtlCache};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[test]
fn test_entry_staleness() {
    let refreshed_at = Utc.with_ymd_and_hms(2023, 2, 1, 12, 0, 0).unwrap();
    let entry = CacheEntry::new("0.18.10", refreshed_at);
    let ttl = TimeDelta::minutes(10);

    assert!(!entry.is_stale(refreshed_at, ttl));
    assert!(!entry.is_stale(refreshed_at + TimeDelta::minutes(9), ttl));
    assert!(entry.is_stale(refreshed_at + TimeDelta::minutes(10), ttl));
    assert!(entry.is_stale(refreshed_at + TimeDelta::hours(1), ttl));
}

#[test]
fn test_default_ttl_is_ten_minutes() {
    assert_eq!(DEFAULT_TTL, Duration::from_secs(600));
}

#[test]
fn test_get_fresh_respects_ttl() {
    let cache = TtlCache::new(Duration::from_secs(60));
    let now = Utc::now();

    tokio_test::block_on(async {
        cache.insert("quilt", 1, now).await;

        assert_eq!(cache.get_fresh(&"quilt", now + TimeDelta::seconds(30)).await, Some(1));
        assert_eq!(cache.get_fresh(&"quilt", now + TimeDelta::seconds(61)).await, None);
        assert_eq!(cache.get_fresh(&"fabric", now).await, None);
    });
}

#[tokio::test]
async fn test_refresh_runs_once_while_fresh() {
    let cache = TtlCache::new(DEFAULT_TTL);
    let counter = AtomicUsize::new(0);
    let calls = &counter;
    let refresh = move || async move {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok::<_, String>("0.18.10".to_string())
    };

    let first = cache.get_or_refresh("quilt", false, refresh).await.unwrap();
    let second = cache.get_or_refresh("quilt", false, refresh).await.unwrap();
    let forced = cache.get_or_refresh("quilt", true, refresh).await.unwrap();

    assert_eq!(first, "0.18.10");
    assert_eq!(second, first);
    assert_eq!(forced, first);
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_entry() {
    let cache = TtlCache::new(DEFAULT_TTL);
    let now = Utc::now();
    cache.insert("quilt", "0.18.9".to_string(), now).await;

    let result = cache
        .get_or_refresh("quilt", true, || async { Err::<String, _>("meta is down") })
        .await;

    assert_eq!(result, Err("meta is down"));
    assert_eq!(cache.get_fresh(&"quilt", now).await, Some("0.18.9".to_string()));
}

#[tokio::test]
async fn test_invalidate() {
    let cache = TtlCache::new(DEFAULT_TTL);
    let now = Utc::now();
    cache.insert(1u8, "a", now).await;

    cache.invalidate(&1).await;

    assert_eq!(cache.get_fresh(&1, now).await, None);
}
