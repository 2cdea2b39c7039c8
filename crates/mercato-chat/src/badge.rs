// SPDX-FileCopyrightText: 2026 Mercato Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Unread badge formatting.

/// Render the aggregate unread count as a badge label.
///
/// Returns `None` at zero (the badge is hidden), the plain count up to
/// `cap`, and `"{cap}+"` above it.
pub fn format_badge(total: u64, cap: u64) -> Option<String> {
    match total {
        0 => None,
        n if n > cap => Some(format!("{cap}+")),
        n => Some(n.to_string()),
    }
}
