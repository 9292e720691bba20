//! Built-in catalog data
//!
//! Price 0 items are starter items granted at account creation and excluded
//! from shop listings.

use vibe_core::types::{CatalogItem, ItemCategory, ItemId, PackInfo, Rarity};

fn item(
    id: &str,
    name: &str,
    category: ItemCategory,
    price: u64,
    preview: &str,
    rarity: Rarity,
) -> CatalogItem {
    CatalogItem {
        id: ItemId::new(id),
        name: name.to_string(),
        category,
        price,
        preview: preview.to_string(),
        rarity,
        animated: false,
        pack: None,
    }
}

fn animated(
    id: &str,
    name: &str,
    category: ItemCategory,
    price: u64,
    preview: &str,
    rarity: Rarity,
) -> CatalogItem {
    CatalogItem {
        animated: true,
        ..item(id, name, category, price, preview, rarity)
    }
}

fn pack(
    id: &str,
    name: &str,
    price: u64,
    preview: &str,
    rarity: Rarity,
    members: &[&str],
    discount_percent: u8,
) -> CatalogItem {
    CatalogItem {
        pack: Some(PackInfo {
            member_ids: members.iter().map(|m| ItemId::new(*m)).collect(),
            discount_percent,
        }),
        ..item(id, name, ItemCategory::Packs, price, preview, rarity)
    }
}

/// The full built-in item set
pub(crate) fn builtin_items() -> Vec<CatalogItem> {
    use ItemCategory::{Backgrounds, Banners, Frames, Titles};
    use Rarity::{Common, Epic, Legendary, Rare};

    vec![
        // Banners
        item("banner_default", "Plain", Banners, 0, "#2b2b2b", Common),
        item("banner_sunset", "Sunset", Banners, 500, "linear-gradient(#ff7e5f,#feb47b)", Rare),
        item("banner_ocean", "Ocean", Banners, 500, "linear-gradient(#2b5876,#4e4376)", Rare),
        item("banner_neon_grid", "Neon Grid", Banners, 900, "img/banners/neon_grid.webp", Epic),
        animated("banner_aurora", "Aurora", Banners, 1500, "img/banners/aurora.webp", Legendary),
        animated("banner_vinyl_spin", "Spinning Vinyl", Banners, 1200, "img/banners/vinyl.webp", Epic),
        // Frames
        item("frame_default", "None", Frames, 0, "transparent", Common),
        item("frame_silver", "Silver", Frames, 300, "#c0c0c0", Common),
        item("frame_gold", "Gold", Frames, 600, "#ffd700", Rare),
        item("frame_holo", "Holographic", Frames, 1000, "linear-gradient(#a8ff78,#78ffd6)", Epic),
        animated("frame_flame", "Flame", Frames, 1600, "img/frames/flame.webp", Legendary),
        // Titles
        item("title_default", "Listener", Titles, 0, "#aaaaaa", Common),
        item("title_night_owl", "Night Owl", Titles, 250, "#7f7fd5", Common),
        item("title_audiophile", "Audiophile", Titles, 450, "#e55d87", Rare),
        item("title_bass_head", "Bass Head", Titles, 450, "#11998e", Rare),
        item("title_maestro", "Maestro", Titles, 1100, "#f7971e", Epic),
        item("title_legend", "Living Legend", Titles, 2000, "#ff512f", Legendary),
        // Backgrounds
        item("bg_default", "Charcoal", Backgrounds, 0, "#1e1e1e", Common),
        item("bg_midnight", "Midnight", Backgrounds, 400, "#0f2027", Common),
        item("bg_synthwave", "Synthwave", Backgrounds, 800, "linear-gradient(#fc466b,#3f5efb)", Rare),
        item("bg_studio", "Studio", Backgrounds, 800, "img/backgrounds/studio.webp", Rare),
        animated("bg_equalizer", "Equalizer", Backgrounds, 1400, "img/backgrounds/equalizer.webp", Epic),
        // Packs
        pack(
            "pack_warm_tones",
            "Warm Tones Pack",
            862,
            "linear-gradient(#ff7e5f,#f7971e)",
            Rare,
            &["banner_sunset", "title_night_owl", "bg_midnight"],
            25,
        ),
        pack(
            "pack_stage_ready",
            "Stage Ready Pack",
            2295,
            "img/packs/stage_ready.webp",
            Epic,
            &["banner_neon_grid", "frame_holo", "bg_synthwave"],
            15,
        ),
        pack(
            "pack_hall_of_fame",
            "Hall of Fame Pack",
            3825,
            "img/packs/hall_of_fame.webp",
            Legendary,
            &["banner_aurora", "frame_flame", "title_legend"],
            25,
        ),
    ]
}
