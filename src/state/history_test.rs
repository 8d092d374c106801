use super::*;
use serde_json::json;

fn record(id: i64, item_id: i64) -> HistoryRecord {
    serde_json::from_value(json!({
        "id": id,
        "item_id": item_id,
        "action": "UPDATE",
        "changed_by": "bob",
        "changed_at": "2024-05-03T08:00:00Z"
    }))
    .unwrap()
}

// =============================================================
// HistoryFilter
// =============================================================

#[test]
fn empty_filter_is_default_query() {
    assert_eq!(HistoryFilter::default().into_query().unwrap(), HistoryQuery::default());
}

#[test]
fn blank_strings_are_dropped() {
    let filter = HistoryFilter {
        changed_by: Some("   ".into()),
        from: Some(String::new()),
        offset: Some(0),
        ..HistoryFilter::default()
    };
    assert_eq!(filter.into_query().unwrap(), HistoryQuery::default());
}

#[test]
fn filters_are_carried_over() {
    let filter = HistoryFilter {
        changed_by: Some(" bob ".into()),
        action: Some(HistoryAction::Delete),
        from: Some("2024-05-01T00:00:00Z".into()),
        to: None,
        offset: Some(50),
    };
    let query = filter.into_query().unwrap();
    assert_eq!(query.limit, 50);
    assert_eq!(query.changed_by.as_deref(), Some("bob"));
    assert_eq!(query.action, Some(HistoryAction::Delete));
    assert_eq!(query.from_date.map(OffsetDateTime::year), Some(2024));
    assert_eq!(query.offset, Some(50));
}

#[test]
fn bad_date_is_rejected() {
    let filter = HistoryFilter { to: Some("yesterday".into()), ..HistoryFilter::default() };
    let err = filter.into_query().unwrap_err();
    assert!(err.to_string().contains("to"));
}

// =============================================================
// HistoryCache
// =============================================================

#[test]
fn cache_starts_empty() {
    let cache = HistoryCache::default();
    assert!(cache.is_empty());
    assert_eq!(cache.item_id(), None);
    assert!(cache.get(1).is_none());
}

#[test]
fn replace_indexes_by_id() {
    let mut cache = HistoryCache::default();
    cache.replace(7, &[record(1, 7), record(2, 7)]);
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.item_id(), Some(7));
    assert_eq!(cache.get(2).map(|r| r.id), Some(2));
}

#[test]
fn replace_forgets_previous_listing() {
    let mut cache = HistoryCache::default();
    cache.replace(7, &[record(1, 7)]);
    cache.replace(8, &[record(5, 8)]);
    assert!(cache.get(1).is_none());
    assert_eq!(cache.item_id(), Some(8));
}

#[test]
fn clear_drops_everything() {
    let mut cache = HistoryCache::default();
    cache.replace(7, &[record(1, 7)]);
    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.item_id(), None);
}
