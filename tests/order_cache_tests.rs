//! Behaviour of the memoized order listing against a scripted API.

use std::sync::Arc;
use std::time::Duration;

use orderdesk::application::{AbortHandle, OrderQueryCache};
use orderdesk::application::orders::{ListErrorKind, PageOutcome};
use orderdesk::domain::item_name::parse_item_name;
use orderdesk::domain::{CacheKey, DateFilter, FilterState, OrderId, TypeFilter};
use orderdesk::error::Error;
use orderdesk::testkit::api::ScriptedOrderApi;
use orderdesk::testkit::domain::{listing, summaries};

fn today_all() -> FilterState {
    FilterState::new(DateFilter::Today, TypeFilter::All)
}

fn cache(api: ScriptedOrderApi) -> (OrderQueryCache, Arc<ScriptedOrderApi>) {
    let api = Arc::new(api);
    (OrderQueryCache::new(api.clone(), "king-"), api)
}

fn key_strings(cache: &OrderQueryCache) -> Vec<String> {
    cache.keys().iter().map(|k| k.to_string()).collect()
}

#[tokio::test]
async fn repeated_request_is_served_from_memo() {
    let (cache, api) = cache(ScriptedOrderApi::with_listing(listing(summaries("o", 10), 25, 3)));

    let first = cache.get_page(&today_all(), 1, false).await;
    let second = cache.get_page(&today_all(), 1, false).await;

    assert_eq!(api.list_calls(), 1);
    assert!(matches!(first, PageOutcome::Fetched(_)));
    assert!(matches!(second, PageOutcome::Cached(_)));
    assert!(Arc::ptr_eq(first.page().unwrap(), second.page().unwrap()));
}

#[tokio::test]
async fn invalidate_all_forces_new_requests() {
    let (cache, api) = cache(ScriptedOrderApi::with_listing(listing(summaries("o", 10), 25, 3)));

    cache.get_page(&today_all(), 1, false).await;
    cache.get_page(&today_all(), 2, false).await;
    cache.invalidate_all();
    assert!(cache.is_empty());

    cache.get_page(&today_all(), 1, false).await;
    cache.get_page(&today_all(), 2, false).await;
    assert_eq!(api.list_calls(), 4);
}

#[tokio::test]
async fn force_refresh_bypasses_and_overwrites_memo() {
    let (cache, api) = cache(ScriptedOrderApi::with_listing(listing(summaries("o", 10), 25, 3)));

    let first = cache.get_page(&today_all(), 1, false).await;
    let refreshed = cache.get_page(&today_all(), 1, true).await;

    assert_eq!(api.list_calls(), 2);
    assert!(matches!(refreshed, PageOutcome::Fetched(_)));
    let stored = cache.cached(&CacheKey::new(&today_all(), 1)).unwrap();
    assert!(Arc::ptr_eq(&stored, refreshed.page().unwrap()));
    assert!(!Arc::ptr_eq(&stored, first.page().unwrap()));

    let queries = api.queries();
    assert!(queries[0].cache_bust.is_none());
    assert!(queries[1].cache_bust.is_some());
}

#[tokio::test]
async fn second_page_numbers_continue_from_first() {
    let (cache, _) = cache(ScriptedOrderApi::with_listing(listing(summaries("p2-", 3), 13, 2)));

    let outcome = cache.get_page(&today_all(), 2, false).await;
    let page = outcome.page().unwrap();

    assert_eq!(page.order_number(&OrderId::new("p2-0")), Some("king-011"));
    assert_eq!(page.order_number(&OrderId::new("p2-1")), Some("king-012"));
    assert_eq!(page.order_number(&OrderId::new("p2-2")), Some("king-013"));
}

#[test]
fn item_names_yield_quantity_and_clean_name() {
    let cases = [
        (Some("Zinger Burger x2"), 2, "Zinger Burger"),
        (Some("3x Cheese Fries"), 3, "Cheese Fries"),
        (Some("Plain Burger"), 1, "Plain Burger"),
        (Some(""), 1, "Unknown Item"),
        (None, 1, "Unknown Item"),
        (Some("Burger xABC"), 1, "Burger xABC"),
    ];
    for (name, quantity, clean) in cases {
        let parsed = parse_item_name(name);
        assert_eq!(parsed.quantity, quantity, "quantity for {name:?}");
        assert_eq!(parsed.clean_name, clean, "name for {name:?}");
    }
}

#[tokio::test]
async fn malformed_listing_sets_error_without_memo() {
    let (cache, _) = cache(ScriptedOrderApi::new(|_| {
        Err(Error::MalformedResponse(
            "Invalid data received from server".into(),
        ))
    }));

    let outcome = cache.get_page(&today_all(), 1, false).await;

    let error = outcome.error().unwrap();
    assert_eq!(error.kind, ListErrorKind::Malformed);
    let view = cache.current();
    assert!(view.orders.is_empty());
    assert_eq!(view.error.as_ref().map(|e| e.kind), Some(ListErrorKind::Malformed));
    assert!(cache.cached(&CacheKey::new(&today_all(), 1)).is_none());
}

#[tokio::test]
async fn failed_page_keeps_other_memo_entries() {
    let (cache, _) = cache(ScriptedOrderApi::new(|query| {
        if query.page == 2 {
            Err(Error::Status {
                status: 500,
                url: "scripted://orders".into(),
            })
        } else {
            Ok(listing(summaries("o", 10), 25, 3))
        }
    }));

    cache.get_page(&today_all(), 1, false).await;
    let failed = cache.get_page(&today_all(), 2, false).await;

    assert_eq!(failed.error().map(|e| e.kind), Some(ListErrorKind::Transport));
    assert_eq!(key_strings(&cache), vec!["today-none-all-1"]);
}

#[tokio::test]
async fn aborted_request_changes_nothing() {
    let api = ScriptedOrderApi::new(|query| {
        if query.page == 3 {
            Err(Error::Status {
                status: 502,
                url: "scripted://orders".into(),
            })
        } else {
            Ok(listing(summaries(&format!("p{}-", query.page), 10), 25, 3))
        }
    })
    .with_list_delay(Duration::from_millis(150));
    let (cache, api) = cache(api);

    cache.get_page(&today_all(), 1, false).await;
    cache.get_page(&today_all(), 3, false).await;
    let before = cache.current();
    let keys_before = key_strings(&cache);
    assert!(before.error.is_some());

    let filters = today_all();
    let handle = AbortHandle::new();
    let signal = handle.signal();
    let (outcome, ()) = tokio::join!(
        cache.get_page_with_abort(&filters, 2, false, &signal),
        async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle.abort();
        }
    );

    assert!(outcome.is_cancelled());
    assert_eq!(api.list_calls(), 3);
    assert_eq!(cache.current(), before);
    assert_eq!(key_strings(&cache), keys_before);
}

#[tokio::test]
async fn already_aborted_signal_skips_the_memo_write() {
    let (cache, _) = cache(
        ScriptedOrderApi::with_listing(listing(summaries("o", 10), 25, 3))
            .with_list_delay(Duration::from_millis(50)),
    );
    let handle = AbortHandle::new();
    handle.abort();

    let outcome = cache
        .get_page_with_abort(&today_all(), 1, false, &handle.signal())
        .await;

    assert!(outcome.is_cancelled());
    assert!(cache.is_empty());
    assert!(!cache.current().loading);
}

#[tokio::test]
async fn today_pages_then_invalidate_end_to_end() {
    let (cache, api) = cache(ScriptedOrderApi::new(|query| {
        Ok(listing(summaries(&format!("p{}-", query.page), 10), 25, 3))
    }));

    let first = cache.get_page(&today_all(), 1, false).await;
    let page = first.page().unwrap();
    assert_eq!(page.orders.len(), 10);
    assert_eq!(page.total_count, 25);
    assert_eq!(page.total_pages, 3);
    assert_eq!(key_strings(&cache), vec!["today-none-all-1"]);

    cache.get_page(&today_all(), 2, false).await;
    assert_eq!(api.list_calls(), 2);
    assert_eq!(key_strings(&cache), vec!["today-none-all-1", "today-none-all-2"]);
    let queries = api.queries();
    assert_ne!(queries[0], queries[1]);
    assert_eq!(queries[1].page, 2);
    assert_eq!(queries[1].limit, 10);

    cache.invalidate_all();
    cache.get_page(&today_all(), 1, false).await;
    assert_eq!(api.list_calls(), 3);
    assert_eq!(key_strings(&cache), vec!["today-none-all-1"]);
}

#[tokio::test]
async fn filter_change_resets_cursor_and_memo() {
    let (cache, api) = cache(ScriptedOrderApi::with_listing(listing(summaries("o", 10), 25, 3)));

    cache.go_to_page(2).await;
    assert_eq!(cache.cursor().1, 2);

    let pickup = FilterState::new(DateFilter::Today, TypeFilter::Pickup);
    assert!(cache.set_filters(pickup));
    assert!(!cache.set_filters(pickup));
    assert_eq!(cache.cursor(), (pickup, 1));
    assert!(cache.is_empty());

    cache.go_to_page(1).await;
    assert_eq!(api.queries().last().map(|q| q.type_filter), Some(TypeFilter::Pickup));
}

#[tokio::test]
async fn realtime_refresh_on_later_page_keeps_view() {
    let (cache, api) = cache(ScriptedOrderApi::new(|query| {
        Ok(listing(summaries(&format!("p{}-", query.page), 10), 25, 3))
    }));

    cache.go_to_page(3).await;
    let before = cache.current();
    let outcome = cache.on_realtime_order_arrived().await;

    assert!(matches!(outcome, PageOutcome::Fetched(_)));
    assert_eq!(api.list_calls(), 2);
    assert_eq!(cache.current(), before);
    assert!(cache.cached(&CacheKey::new(&today_all(), 1)).is_some());
}

#[tokio::test]
async fn realtime_refresh_finishing_after_navigation_stays_off_screen() {
    let api = ScriptedOrderApi::new(|query| {
        Ok(listing(summaries(&format!("p{}-", query.page), 10), 25, 3))
    })
    .with_list_delay(Duration::from_millis(100));
    let (cache, api) = cache(api);

    cache.go_to_page(2).await;
    cache.go_to_page(1).await;
    assert_eq!(api.list_calls(), 2);

    let (refreshed, moved) = tokio::join!(cache.on_realtime_order_arrived(), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        cache.go_to_page(2).await
    });

    assert!(matches!(moved, PageOutcome::Cached(_)));
    assert!(matches!(refreshed, PageOutcome::Fetched(_)));
    assert_eq!(api.list_calls(), 3);

    let view = cache.current();
    assert_eq!(cache.cursor().1, 2);
    assert_eq!(view.page, 2);
    assert_eq!(view.orders[0].id, OrderId::new("p2-0"));
    assert!(!view.loading);

    let first = cache.cached(&CacheKey::new(&today_all(), 1)).unwrap();
    assert!(Arc::ptr_eq(&first, refreshed.page().unwrap()));
}

#[tokio::test]
async fn slow_page_loses_to_a_later_request() {
    let api = ScriptedOrderApi::new(|query| {
        Ok(listing(summaries(&format!("p{}-", query.page), 10), 25, 3))
    })
    .with_list_delay(Duration::from_millis(100));
    let (cache, _) = cache(api);
    cache.go_to_page(1).await;

    let filter = today_all();
    let (slow, ()) = tokio::join!(cache.get_page(&filter, 3, false), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        cache.go_to_page(1).await;
    });

    assert!(matches!(slow, PageOutcome::Fetched(_)));
    assert_eq!(cache.current().page, 1);
    assert!(cache.cached(&CacheKey::new(&today_all(), 3)).is_some());
}
