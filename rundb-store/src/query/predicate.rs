//! Scan predicates
//!
//! Every filter a listing applies is an independent boolean function over a
//! decoded record. `Predicates` holds them in a list and requires all of them.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rundb_core::{AttrPath, LabelSelector, Record};

pub type Predicate = Box<dyn Fn(&Record) -> bool + Send + Sync>;

/// Conjunction of predicates. Empty accepts everything.
#[derive(Default)]
pub struct Predicates(Vec<Predicate>);

impl Predicates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, predicate: impl Fn(&Record) -> bool + Send + Sync + 'static) {
        self.0.push(Box::new(predicate));
    }

    pub fn with(mut self, predicate: impl Fn(&Record) -> bool + Send + Sync + 'static) -> Self {
        self.push(predicate);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.0.iter().all(|predicate| predicate(record))
    }
}

impl std::fmt::Debug for Predicates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predicates").field("len", &self.0.len()).finish()
    }
}

/// The string at `path` contains `needle` (equality included)
pub fn contains(path: &str, needle: &str) -> impl Fn(&Record) -> bool + Send + Sync + 'static {
    let path = AttrPath::parse(path);
    let needle = needle.to_string();
    move |record: &Record| {
        record
            .get_str(&path)
            .unwrap_or_default()
            .contains(needle.as_str())
    }
}

/// The string at `path` equals `expected`
pub fn equals(path: &str, expected: &str) -> impl Fn(&Record) -> bool + Send + Sync + 'static {
    let path = AttrPath::parse(path);
    let expected = expected.to_string();
    move |record: &Record| record.get_str(&path) == Some(expected.as_str())
}

/// The label mapping at `path` satisfies `selector`
pub fn labels(
    path: &str,
    selector: LabelSelector,
) -> impl Fn(&Record) -> bool + Send + Sync + 'static {
    let path = AttrPath::parse(path);
    move |record: &Record| selector.matches(record.get_object(&path))
}

/// The number at `path` is 0 or missing
///
/// Strings, nulls and other non-numbers are not 0.
pub fn zero_or_missing(path: &str) -> impl Fn(&Record) -> bool + Send + Sync + 'static {
    let path = AttrPath::parse(path);
    move |record: &Record| match record.get(&path) {
        None => true,
        Some(value) => value.as_f64() == Some(0.0),
    }
}

/// The timestamp at `path` lies in `[since, until]`
///
/// A record without the timestamp passes. One that does not parse fails.
pub fn within(
    path: &str,
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
) -> impl Fn(&Record) -> bool + Send + Sync + 'static {
    let path = AttrPath::parse(path);
    move |record: &Record| {
        let Some(text) = record.get_str(&path).filter(|t| !t.is_empty()) else {
            return true;
        };
        let Some(t) = parse_timestamp(text) else {
            tracing::debug!("Unparseable timestamp {:?} at {}", text, path);
            return false;
        };
        since.is_none_or(|since| since <= t) && until.is_none_or(|until| t <= until)
    }
}

/// The timestamp at `path` is strictly before `cutoff`
///
/// A record without a parseable timestamp never matches.
pub fn before(
    path: &str,
    cutoff: DateTime<Utc>,
) -> impl Fn(&Record) -> bool + Send + Sync + 'static {
    let path = AttrPath::parse(path);
    move |record: &Record| {
        record
            .get_str(&path)
            .and_then(parse_timestamp)
            .is_some_and(|t| t < cutoff)
    }
}

/// Parse an RFC 3339 or naive ISO-8601 timestamp. Naive values are UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        return Some(t.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(text, format) {
            return Some(t.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
}
