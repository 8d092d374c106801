//! History view state: the filter form and the last loaded page.
//!
//! DESIGN
//! ======
//! The detail view needs the full record behind a diff. Keeping the last
//! listing keyed by record id means the common path (list, then inspect a
//! row) costs one diff request instead of a diff plus a list re-fetch.

use std::collections::BTreeMap;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::forms::FormError;
use crate::net::types::{HistoryAction, HistoryQuery, HistoryRecord};

/// Raw history filter inputs. Blank values mean "no filter".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub changed_by: Option<String>,
    pub action: Option<HistoryAction>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub offset: Option<u32>,
}

impl HistoryFilter {
    /// Convert into a query, dropping blank filters.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Invalid`] when a date is not RFC 3339.
    pub fn into_query(self) -> Result<HistoryQuery, FormError> {
        Ok(HistoryQuery {
            changed_by: non_blank(self.changed_by),
            action: self.action,
            from_date: parse_date("from", self.from)?,
            to_date: parse_date("to", self.to)?,
            offset: self.offset.filter(|offset| *offset > 0),
            ..HistoryQuery::default()
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn parse_date(field: &'static str, raw: Option<String>) -> Result<Option<OffsetDateTime>, FormError> {
    let Some(raw) = non_blank(raw) else {
        return Ok(None);
    };
    OffsetDateTime::parse(&raw, &Rfc3339)
        .map(Some)
        .map_err(|_| FormError::Invalid { field, expected: "an RFC 3339 timestamp", value: raw })
}

/// Records from the most recent history listing, keyed by record id.
#[derive(Clone, Debug, Default)]
pub struct HistoryCache {
    item_id: Option<i64>,
    records: BTreeMap<i64, HistoryRecord>,
}

impl HistoryCache {
    /// Forget the previous listing and remember `records` for `item_id`.
    pub fn replace(&mut self, item_id: i64, records: &[HistoryRecord]) {
        self.item_id = Some(item_id);
        self.records = records.iter().map(|r| (r.id, r.clone())).collect();
    }

    #[must_use]
    pub fn get(&self, history_id: i64) -> Option<&HistoryRecord> {
        self.records.get(&history_id)
    }

    /// Item whose history was loaded last.
    #[must_use]
    pub fn item_id(&self) -> Option<i64> {
        self.item_id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.item_id = None;
        self.records.clear();
    }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;
