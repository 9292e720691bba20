//! Catalog item definitions
//!
//! Items are immutable cosmetic definitions loaded from static data.
//! They are not user-specific; ownership lives in the economy record.

use serde::{Deserialize, Serialize};

use super::ItemId;

/// Category a catalog item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Banners,
    Frames,
    Titles,
    Backgrounds,
    Packs,
}

impl ItemCategory {
    /// Stable string form used on the wire and in storage
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Banners => "banners",
            Self::Frames => "frames",
            Self::Titles => "titles",
            Self::Backgrounds => "backgrounds",
            Self::Packs => "packs",
        }
    }

    /// Parse from the stable string form
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "banners" => Some(Self::Banners),
            "frames" => Some(Self::Frames),
            "titles" => Some(Self::Titles),
            "backgrounds" => Some(Self::Backgrounds),
            "packs" => Some(Self::Packs),
            _ => None,
        }
    }

    /// All categories, in display order
    pub fn all() -> [Self; 5] {
        [
            Self::Banners,
            Self::Frames,
            Self::Titles,
            Self::Backgrounds,
            Self::Packs,
        ]
    }
}

/// Cosmetic rarity weighting (purely cosmetic, no gameplay effect)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Stable string form
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }
}

/// Bundle membership for pack items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackInfo {
    /// Items included in the pack
    pub member_ids: Vec<ItemId>,
    /// Percentage knocked off the summed member price
    pub discount_percent: u8,
}

/// A purchasable/equippable cosmetic definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Unique item id
    pub id: ItemId,

    /// Display name
    pub name: String,

    /// Shop category
    pub category: ItemCategory,

    /// Price in Moni; price 0 items are starter items excluded from shop listings
    pub price: u64,

    /// Preview token: a color, gradient, or image-path string
    pub preview: String,

    /// Cosmetic rarity
    pub rarity: Rarity,

    /// Whether the preview is animated
    #[serde(default)]
    pub animated: bool,

    /// Bundle semantics, only set for `ItemCategory::Packs`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack: Option<PackInfo>,
}

impl CatalogItem {
    /// Whether this item is granted for free at account creation
    pub fn is_starter(&self) -> bool {
        self.price == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_str() {
        for cat in ItemCategory::all() {
            assert_eq!(ItemCategory::from_str(cat.as_str()), Some(cat));
        }
        assert_eq!(ItemCategory::from_str("bogus"), None);
    }

    #[test]
    fn starter_items_have_zero_price() {
        let item = CatalogItem {
            id: ItemId::new("banner_default"),
            name: "Default".into(),
            category: ItemCategory::Banners,
            price: 0,
            preview: "#222222".into(),
            rarity: Rarity::Common,
            animated: false,
            pack: None,
        };
        assert!(item.is_starter());
    }
}
