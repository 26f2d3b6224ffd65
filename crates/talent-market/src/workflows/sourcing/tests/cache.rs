use super::common::now;
use crate::workflows::sourcing::cache::{CachePolicy, ReadThroughCache};
use chrono::Duration;
use std::cell::Cell;

fn counting_loader<'a>(
    loads: &'a Cell<u32>,
    value: &'a str,
) -> impl FnOnce() -> Result<String, String> + 'a {
    move || {
        loads.set(loads.get() + 1);
        Ok(value.to_string())
    }
}

#[test]
fn session_policy_loads_once() {
    let cache = ReadThroughCache::new(CachePolicy::Session);
    let loads = Cell::new(0);

    let first = cache
        .get_or_load(now(), counting_loader(&loads, "v1"))
        .expect("first load");
    let later = cache
        .get_or_load(now() + Duration::days(30), counting_loader(&loads, "v2"))
        .expect("cached value");

    assert_eq!(first.as_str(), "v1");
    assert_eq!(later.as_str(), "v1");
    assert_eq!(loads.get(), 1);
    assert_eq!(cache.loaded_at(), Some(now()));
}

#[test]
fn ttl_policy_reloads_after_expiry() {
    let cache = ReadThroughCache::new(CachePolicy::Ttl(Duration::minutes(5)));
    let loads = Cell::new(0);

    cache
        .get_or_load(now(), counting_loader(&loads, "v1"))
        .expect("first load");
    let fresh = cache
        .get_or_load(now() + Duration::minutes(4), counting_loader(&loads, "v2"))
        .expect("fresh value");
    let expired = cache
        .get_or_load(now() + Duration::minutes(5), counting_loader(&loads, "v3"))
        .expect("reloaded value");

    assert_eq!(fresh.as_str(), "v1");
    assert_eq!(expired.as_str(), "v3");
    assert_eq!(loads.get(), 2);
    assert_eq!(cache.loaded_at(), Some(now() + Duration::minutes(5)));
}

#[test]
fn invalidate_forces_the_next_read_to_load() {
    let cache = ReadThroughCache::new(CachePolicy::Session);
    let loads = Cell::new(0);

    cache
        .get_or_load(now(), counting_loader(&loads, "v1"))
        .expect("first load");
    cache.invalidate();
    assert!(cache.peek().is_none());

    let value = cache
        .get_or_load(now(), counting_loader(&loads, "v2"))
        .expect("reload");

    assert_eq!(value.as_str(), "v2");
    assert_eq!(loads.get(), 2);
}

#[test]
fn failed_reload_keeps_previous_value() {
    let cache = ReadThroughCache::new(CachePolicy::Ttl(Duration::seconds(30)));
    let loads = Cell::new(0);

    cache
        .get_or_load(now(), counting_loader(&loads, "v1"))
        .expect("first load");
    let result = cache.get_or_load(now() + Duration::minutes(1), || {
        Err::<String, _>("store offline".to_string())
    });

    match result {
        Err(message) => assert_eq!(message, "store offline"),
        other => panic!("expected load error, got {other:?}"),
    }
    assert_eq!(cache.peek().as_deref().map(String::as_str), Some("v1"));
    assert_eq!(cache.loaded_at(), Some(now()));
}

#[test]
fn failed_first_load_leaves_cache_empty() {
    let cache: ReadThroughCache<String> = ReadThroughCache::new(CachePolicy::Session);

    let result = cache.get_or_load(now(), || Err::<String, _>("boom"));

    assert!(result.is_err());
    assert!(cache.peek().is_none());
    assert!(cache.loaded_at().is_none());
}

#[test]
fn rejected_fresh_value_is_reloaded() {
    let cache = ReadThroughCache::new(CachePolicy::Session);
    let loads = Cell::new(0);

    cache
        .get_or_load(now(), counting_loader(&loads, "alice"))
        .expect("first load");
    let kept = cache
        .get_or_load_unless(
            now(),
            |value: &String| value.contains("alice"),
            counting_loader(&loads, "alice,bob"),
        )
        .expect("accepted value");
    let refreshed = cache
        .get_or_load_unless(
            now(),
            |value: &String| value.contains("bob"),
            counting_loader(&loads, "alice,bob"),
        )
        .expect("refreshed value");

    assert_eq!(kept.as_str(), "alice");
    assert_eq!(refreshed.as_str(), "alice,bob");
    assert_eq!(loads.get(), 2);
}

#[test]
fn zero_ttl_means_session_caching() {
    assert_eq!(CachePolicy::from_ttl_secs(0), CachePolicy::Session);
    assert_eq!(
        CachePolicy::from_ttl_secs(120),
        CachePolicy::Ttl(Duration::seconds(120))
    );
    assert_eq!(
        ReadThroughCache::<()>::new(CachePolicy::Session).policy(),
        CachePolicy::Session
    );
}
