//! Produce listings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Amount;

/// Unit a listing quantity is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingUnit {
    /// Kilograms
    Kg,
    /// Metric tons
    Ton,
    /// Bags
    Bag,
}

/// A produce listing published by a farmer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Listing id.
    pub id: u64,
    /// Title shown in search results.
    #[serde(default)]
    pub title: Option<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Crop id or nested crop object.
    #[serde(default)]
    pub crop: Option<serde_json::Value>,
    /// Quantity originally listed.
    #[serde(default)]
    pub quantity: Option<Amount>,
    /// Quantity still available.
    #[serde(default)]
    pub quantity_available: Option<Amount>,
    /// Unit of the quantity.
    #[serde(default)]
    pub unit: Option<ListingUnit>,
    /// Minimum accepted price per unit.
    #[serde(default)]
    pub price_floor: Option<Amount>,
    /// Asking price per unit.
    #[serde(default)]
    pub price_per_unit: Option<Amount>,
    /// Expected harvest date.
    #[serde(default)]
    pub harvest_date: Option<String>,
    /// Pickup location.
    #[serde(default)]
    pub location: Option<String>,
    /// Listing status (e.g. `open`, `closed`).
    #[serde(default)]
    pub status: Option<String>,
    /// Farmer id or nested farmer object.
    #[serde(default)]
    pub farmer: Option<serde_json::Value>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Listing {
    /// Quantity on offer: what is still available, else the listed quantity.
    #[must_use]
    pub fn available(&self) -> Option<&Amount> {
        self.quantity_available.as_ref().or(self.quantity.as_ref())
    }

    /// Price per unit: the floor price, else the asking price.
    #[must_use]
    pub fn unit_price(&self) -> Option<&Amount> {
        self.price_floor.as_ref().or(self.price_per_unit.as_ref())
    }

    /// Best display name: title, then crop name, then the id.
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            return title.to_string();
        }
        match &self.crop {
            Some(serde_json::Value::Object(crop)) => crop
                .get("name")
                .and_then(serde_json::Value::as_str)
                .map_or_else(|| format!("Listing #{}", self.id), ToString::to_string),
            _ => format!("Listing #{}", self.id),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_listing_fallback_fields() {
        let listing: Listing = serde_json::from_str(
            r#"{"id":9,"crop":{"id":2,"name":"Wheat"},"quantity":"1200.00","unit":"kg","price_per_unit":"24.50","quality_grade":"A"}"#,
        )
        .unwrap();

        assert_eq!(listing.display_name(), "Wheat");
        assert_eq!(listing.available().unwrap().as_str(), "1200.00");
        assert_eq!(listing.unit_price().and_then(Amount::to_f64), Some(24.5));
        assert_eq!(listing.unit, Some(ListingUnit::Kg));
        assert!(listing.extra.contains_key("quality_grade"));
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let listing: Listing = serde_json::from_str(r#"{"id":11,"crop":5}"#).unwrap();
        assert_eq!(listing.display_name(), "Listing #11");
    }
}
