//! Quantity recovery from free-text item names.
//!
//! Checkout stores the ordered quantity inside the item name, either as a
//! suffix ("Zinger Burger x2") or a prefix ("2x Zinger Burger"). Receipts
//! and the detail view need the two parts separately, and must agree
//! byte-for-byte with what the dashboard has always printed, so the two
//! patterns below are kept exactly as they are, asymmetric spacing rules
//! included.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Fallback display name for missing or empty item names.
pub const UNKNOWN_ITEM: &str = "Unknown Item";

/// Quantity and display name split out of an item name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedItemName {
    pub quantity: u32,
    pub clean_name: String,
}

impl ParsedItemName {
    fn single(name: impl Into<String>) -> Self {
        Self {
            quantity: 1,
            clean_name: name.into(),
        }
    }
}

// whitespace*, x, digits, whitespace*, end
fn suffix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\s*x([0-9]+)\s*$").expect("static pattern"))
}

// start, digits, x, whitespace*
fn prefix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)^([0-9]+)x\s*").expect("static pattern"))
}

/// Split an item name into quantity and clean name.
///
/// Pure and total: every input yields a value, quantity is at least 1.
///
/// # Examples
///
/// ```
/// use orderdesk::domain::item_name::parse_item_name;
///
/// let parsed = parse_item_name(Some("Zinger Burger x2"));
/// assert_eq!(parsed.quantity, 2);
/// assert_eq!(parsed.clean_name, "Zinger Burger");
///
/// let parsed = parse_item_name(Some("3x Cheese Fries"));
/// assert_eq!(parsed.quantity, 3);
/// assert_eq!(parsed.clean_name, "Cheese Fries");
/// ```
#[must_use]
pub fn parse_item_name(name: Option<&str>) -> ParsedItemName {
    let Some(raw) = name.filter(|n| !n.is_empty()) else {
        return ParsedItemName::single(UNKNOWN_ITEM);
    };

    let trimmed = raw.trim();

    if let Some(caps) = suffix_pattern().captures(trimmed) {
        let quantity = positive_quantity(&caps[1]);
        let end = caps.get(0).map_or(trimmed.len(), |m| m.start());
        return ParsedItemName {
            quantity,
            clean_name: trimmed[..end].trim().to_string(),
        };
    }

    if let Some(caps) = prefix_pattern().captures(trimmed) {
        let quantity = positive_quantity(&caps[1]);
        let start = caps.get(0).map_or(0, |m| m.end());
        return ParsedItemName {
            quantity,
            clean_name: trimmed[start..].trim().to_string(),
        };
    }

    ParsedItemName::single(trimmed)
}

/// Digits as a quantity. Zero, and counts too large for `u32`, read as 1
/// rather than being clamped to the largest representable count.
fn positive_quantity(digits: &str) -> u32 {
    match digits.parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => 1,
    }
}
