//! Canonical timeline

use std::ops::RangeInclusive;

/// Marked years on the timeline bar
pub const YEARS: [i32; 13] = [1983, 1991, 2001, 2010, 2016, 2020, 2024, 2026, 2030, 2035, 2040, 2044, 2107];

pub const FIRST_YEAR: i32 = 1983;
/// Terminal year; temporal drift is measured against it
pub const LAST_YEAR: i32 = 2107;
/// Year the core surface opens on
pub const PRESENT_YEAR: i32 = 2026;

pub fn span() -> RangeInclusive<i32> {
    FIRST_YEAR..=LAST_YEAR
}

pub fn is_marked(year: i32) -> bool {
    YEARS.contains(&year)
}

/// Closest marked year; ties go to the earlier one
pub fn nearest_year(year: i32) -> i32 {
    YEARS
        .iter()
        .copied()
        .min_by_key(|y| ((y - year).abs(), *y))
        .unwrap_or(PRESENT_YEAR)
}

/// `timeline • 1983 → 2107`
pub fn title(label: &str) -> String {
    format!("{label} • {FIRST_YEAR} → {LAST_YEAR}")
}
