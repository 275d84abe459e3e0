//! Delivery areas and their fees.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A named delivery zone with a flat fee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryArea {
    pub name: String,
    pub fee: Decimal,
}

/// Table of delivery areas, looked up by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryAreas {
    areas: Vec<DeliveryArea>,
}

impl DeliveryAreas {
    #[must_use]
    pub fn new(areas: Vec<DeliveryArea>) -> Self {
        Self { areas }
    }

    /// Fee for an area, matched case-insensitively. Unknown areas cost 0.
    #[must_use]
    pub fn fee_for(&self, area: Option<&str>) -> Decimal {
        let Some(area) = area else {
            return Decimal::ZERO;
        };
        self.areas
            .iter()
            .find(|a| a.name.to_lowercase() == area.to_lowercase())
            .map_or(Decimal::ZERO, |a| a.fee)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

/// Area name from a "street, area" formatted address: the last
/// comma-separated part, when there is more than one.
#[must_use]
pub fn area_from_address(address: &str) -> Option<String> {
    let mut parts = address.rsplit(',');
    let last = parts.next()?;
    parts.next()?;
    Some(last.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn areas() -> DeliveryAreas {
        DeliveryAreas::new(vec![
            DeliveryArea {
                name: "Landhi".into(),
                fee: dec!(150),
            },
            DeliveryArea {
                name: "Korangi".into(),
                fee: dec!(200),
            },
        ])
    }

    #[test]
    fn fee_lookup_ignores_case() {
        assert_eq!(areas().fee_for(Some("landhi")), dec!(150));
        assert_eq!(areas().fee_for(Some("KORANGI")), dec!(200));
    }

    #[test]
    fn unknown_or_missing_area_is_free() {
        assert_eq!(areas().fee_for(Some("Clifton")), Decimal::ZERO);
        assert_eq!(areas().fee_for(None), Decimal::ZERO);
        assert_eq!(DeliveryAreas::default().fee_for(Some("Landhi")), Decimal::ZERO);
    }

    #[test]
    fn area_is_last_address_part() {
        assert_eq!(
            area_from_address("House 12, Street 4, Landhi").as_deref(),
            Some("Landhi")
        );
    }

    #[test]
    fn single_part_address_has_no_area() {
        assert_eq!(area_from_address("Somewhere without commas"), None);
        assert_eq!(area_from_address(""), None);
    }
}
