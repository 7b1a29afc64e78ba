//! Chronological ordering of Indonesian period labels ("MEI 2025")

use contracts::dashboards::d402_sales_report::UNKNOWN_LABEL;
use std::cmp::Ordering;

/// Month names in calendar order, index = month 0..11
pub const MONTHS_ID: [&str; 12] = [
    "JANUARI",
    "FEBRUARI",
    "MARET",
    "APRIL",
    "MEI",
    "JUNI",
    "JULI",
    "AGUSTUS",
    "SEPTEMBER",
    "OKTOBER",
    "NOVEMBER",
    "DESEMBER",
];

/// Sort position used for labels that cannot be parsed: January 1970.
/// Such labels end up before every real period.
pub const EPOCH_KEY: (i32, u32) = (1970, 0);

/// Month index 0..11 of an Indonesian month name, case-insensitive
pub fn month_index(name: &str) -> Option<u32> {
    let upper = name.trim().to_uppercase();
    MONTHS_ID
        .iter()
        .position(|m| *m == upper)
        .map(|i| i as u32)
}

/// Parse "<MONTH> <YEAR>" into (year, month index)
pub fn parse_period_label(label: &str) -> Option<(i32, u32)> {
    let mut tokens = label.split_whitespace();
    let month = month_index(tokens.next()?)?;
    let year: i32 = tokens.next()?.parse().ok()?;
    Some((year, month))
}

/// Comparable key; `None` marks "Unknown", which always sorts last
pub fn period_sort_key(label: &str) -> Option<(i32, u32)> {
    if label == UNKNOWN_LABEL {
        return None;
    }
    Some(parse_period_label(label).unwrap_or(EPOCH_KEY))
}

pub fn compare_period_labels(a: &str, b: &str) -> Ordering {
    match (period_sort_key(a), period_sort_key(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(ka), Some(kb)) => ka.cmp(&kb),
    }
}

/// Stable chronological sort of items by their period label
pub fn sort_chronologically<T, F>(items: &mut [T], label: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| compare_period_labels(label(a), label(b)));
}
