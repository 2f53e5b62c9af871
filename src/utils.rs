//! Small string and formatting helpers shared across the crate.

/// Binary-unit suffixes for [`byte_count_to_display_size`], largest first.
const DISPLAY_UNITS: [(u64, &str); 5] = [
    (1 << 50, "PB"),
    (1 << 40, "TB"),
    (1 << 30, "GB"),
    (1 << 20, "MB"),
    (1 << 10, "KB"),
];

/// Returns true when the string is empty or whitespace-only.
///
/// Blank ids and filenames are rejected everywhere a download URL is parsed
/// or constructed, so this predicate is the single definition of "blank".
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Formats a raw byte count as a human-readable display size in binary units.
///
/// Values are floored to whole units, so 1535 bytes renders as "1 KB" and
/// anything below 1024 renders as "N bytes".
pub fn byte_count_to_display_size(bytes: u64) -> String {
    for (divisor, unit) in DISPLAY_UNITS {
        if bytes >= divisor {
            return format!("{} {}", bytes / divisor, unit);
        }
    }
    format!("{} bytes", bytes)
}
