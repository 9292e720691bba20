//! Vibe Player Catalog
//!
//! Static registry of purchasable/equippable cosmetic item definitions:
//! banners, frames, titles, backgrounds, and bundle packs. Read-only at
//! runtime; the catalog feeds the economy store and the shop/inventory UI.
//!
//! The catalog is an explicitly constructed value (not a global) so tests and
//! sessions can inject their own item sets.
//!
//! # Example
//!
//! ```rust
//! use vibe_catalog::Catalog;
//! use vibe_core::types::{ItemCategory, ItemId};
//!
//! let catalog = Catalog::builtin();
//! let banners = catalog.shop_items(ItemCategory::Banners);
//! assert!(banners.iter().all(|i| i.price > 0));
//! assert!(catalog.get(&ItemId::new("banner_sunset")).is_some());
//! ```

#![forbid(unsafe_code)]

mod data;

use std::collections::HashMap;

use vibe_core::types::{CatalogItem, ItemCategory, ItemId, Rarity};

/// Immutable item registry with id and category indexes
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    by_id: HashMap<ItemId, usize>,
}

impl Catalog {
    /// Build a catalog from an explicit item list
    ///
    /// Later duplicates of an id shadow earlier ones in the id index.
    pub fn new(items: Vec<CatalogItem>) -> Self {
        let by_id = items
            .iter()
            .enumerate()
            .map(|(idx, item)| (item.id.clone(), idx))
            .collect();
        Self { items, by_id }
    }

    /// The built-in item set shipped with the player
    pub fn builtin() -> Self {
        Self::new(data::builtin_items())
    }

    /// All items, in definition order
    pub fn all(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Look up an item by id
    pub fn get(&self, id: &ItemId) -> Option<&CatalogItem> {
        self.by_id.get(id).map(|&idx| &self.items[idx])
    }

    /// All items in a category, including starter items
    pub fn items_by_category(&self, category: ItemCategory) -> Vec<&CatalogItem> {
        self.items.iter().filter(|i| i.category == category).collect()
    }

    /// Purchasable items in a category; starter (price 0) items are excluded
    pub fn shop_items(&self, category: ItemCategory) -> Vec<&CatalogItem> {
        self.items
            .iter()
            .filter(|i| i.category == category && !i.is_starter())
            .collect()
    }

    /// Items granted for free at account creation
    pub fn starter_items(&self) -> Vec<&CatalogItem> {
        self.items.iter().filter(|i| i.is_starter()).collect()
    }

    /// Resolve a pack's member ids to full items
    ///
    /// Ids that fail to resolve are silently dropped. Returns an empty list
    /// for unknown ids and non-pack items.
    pub fn pack_items(&self, pack_id: &ItemId) -> Vec<&CatalogItem> {
        let Some(pack) = self.get(pack_id).and_then(|i| i.pack.as_ref()) else {
            return Vec::new();
        };
        pack.member_ids.iter().filter_map(|id| self.get(id)).collect()
    }

    /// Discounted price of a pack: member prices summed, minus the pack's
    /// discount percentage, rounded down
    ///
    /// Returns `None` for unknown ids and non-pack items. Built-in packs list
    /// exactly this value as their `price`.
    pub fn pack_price(&self, pack_id: &ItemId) -> Option<u64> {
        let pack = self.get(pack_id)?.pack.as_ref()?;
        let total: u64 = self.pack_items(pack_id).iter().map(|i| i.price).sum();
        Some(total * u64::from(100 - pack.discount_percent.min(100)) / 100)
    }
}

/// Display color for a rarity tier
pub fn rarity_color(rarity: Rarity) -> &'static str {
    match rarity {
        Rarity::Common => "#9e9e9e",
        Rarity::Rare => "#42a5f5",
        Rarity::Epic => "#ab47bc",
        Rarity::Legendary => "#ffa726",
    }
}

/// Localized display name for a rarity tier
pub fn rarity_display_name(rarity: Rarity) -> &'static str {
    match rarity {
        Rarity::Common => "Common",
        Rarity::Rare => "Rare",
        Rarity::Epic => "Epic",
        Rarity::Legendary => "Legendary",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_unique_ids() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.by_id.len(), catalog.items.len());
    }

    #[test]
    fn shop_listings_exclude_starter_items() {
        let catalog = Catalog::builtin();
        for category in ItemCategory::all() {
            assert!(catalog.shop_items(category).iter().all(|i| i.price > 0));
        }
        assert!(!catalog.starter_items().is_empty());
    }

    #[test]
    fn every_category_has_items() {
        let catalog = Catalog::builtin();
        for category in ItemCategory::all() {
            assert!(
                !catalog.items_by_category(category).is_empty(),
                "no items in {:?}",
                category
            );
        }
    }

    #[test]
    fn pack_items_resolve_members() {
        let catalog = Catalog::builtin();
        let members = catalog.pack_items(&ItemId::new("pack_warm_tones"));
        assert_eq!(members.len(), 3);
        assert!(members.iter().any(|i| i.id.as_str() == "banner_sunset"));
    }

    #[test]
    fn pack_items_drop_unresolvable_ids() {
        use vibe_core::types::{CatalogItem, PackInfo, Rarity};

        let pack = CatalogItem {
            id: ItemId::new("pack_x"),
            name: "X".into(),
            category: ItemCategory::Packs,
            price: 100,
            preview: "#000".into(),
            rarity: Rarity::Rare,
            animated: false,
            pack: Some(PackInfo {
                member_ids: vec![ItemId::new("missing_item")],
                discount_percent: 10,
            }),
        };
        let catalog = Catalog::new(vec![pack]);
        assert!(catalog.pack_items(&ItemId::new("pack_x")).is_empty());
    }

    #[test]
    fn pack_items_of_non_pack_is_empty() {
        let catalog = Catalog::builtin();
        assert!(catalog.pack_items(&ItemId::new("banner_sunset")).is_empty());
        assert!(catalog.pack_items(&ItemId::new("nope")).is_empty());
    }

    #[test]
    fn pack_members_exist_in_builtin_catalog() {
        let catalog = Catalog::builtin();
        for item in catalog.items_by_category(ItemCategory::Packs) {
            let pack = item.pack.as_ref().expect("pack items carry pack info");
            for member in &pack.member_ids {
                assert!(catalog.get(member).is_some(), "dangling member {}", member);
            }
        }
    }

    #[test]
    fn pack_listed_prices_match_discounted_member_total() {
        let catalog = Catalog::builtin();
        for item in catalog.items_by_category(ItemCategory::Packs) {
            assert_eq!(catalog.pack_price(&item.id), Some(item.price), "{}", item.id);
        }
        assert_eq!(catalog.pack_price(&ItemId::new("banner_sunset")), None);
    }

    #[test]
    fn rarity_helpers_cover_all_tiers() {
        for rarity in [Rarity::Common, Rarity::Rare, Rarity::Epic, Rarity::Legendary] {
            assert!(rarity_color(rarity).starts_with('#'));
            assert!(!rarity_display_name(rarity).is_empty());
        }
    }
}
