//! Catalog classification policy
//!
//! Policy data used once at catalog-initialization time: keyword price
//! tables that classify an item identifier into a category and give it a
//! base price, plus a deny list of keywords that can never be listed
//! (tools, equipment, raw materials, liquid containers).
//!
//! Classification is a substring match of each keyword against the
//! lowercase identifier. Tables are searched in a fixed order (food, item,
//! block, ore, decorative) and, within a table, entries are ordered so that
//! more specific keywords win over their substrings (`sandstone` before
//! `stone`).

use crate::types::ItemCategory;
use rust_decimal::Decimal;

/// Keywords that exclude an identifier from the market entirely
const DENY_LIST: &[&str] = &[
    "chestplate",
    "leggins",
    "helmet",
    "boots",
    "raw",
    "sword",
    "pickaxe",
    "hoe",
    "axe",
    "trident",
    "horse",
    "bow",
    "totem",
    "block",
    "bottle",
    "on_a_stick",
];

const FOOD_PRICES: &[(&str, u32)] = &[
    ("enchanted", 500),
    ("golden", 100),
    ("cooked", 35),
    ("bread", 20),
    ("chicken", 25),
    ("porkchop", 25),
    ("stew", 50),
    ("beetroot", 15),
    ("carrot", 10),
    ("potato", 15),
    ("cake", 60),
    ("cookie", 10),
    ("melon", 15),
    ("pufferfish", 40),
    ("salmon", 30),
    ("clownfish", 40),
    ("berries", 15),
    ("apple", 10),
];

const ITEM_PRICES: &[(&str, u32)] = &[
    ("fire_charge", 15),
    ("gunpowder", 20),
    ("slimeball", 50),
    ("stick", 5),
    ("paper", 10),
    ("book", 15),
    ("leather", 20),
    ("string", 15),
    ("feather", 10),
    ("compass", 50),
    ("clock", 60),
    ("dust", 30),
    ("powder", 40),
    ("pearl", 100),
    ("wart", 30),
    ("wheat", 15),
];

const BLOCK_PRICES: &[(&str, u32)] = &[
    ("glowstone", 200),
    ("sandstone", 40),
    ("smooth", 200),
    ("quartz", 500),
    ("stairs", 250),
    ("terracotta", 300),
    ("concrete", 500),
    ("trapdoor", 300),
    ("glass", 300),
    ("planks", 50),
    ("stone", 50),
    ("dirt", 10),
    ("grass", 15),
    ("log", 200),
    ("wood", 200),
    ("fence", 250),
    ("door", 300),
    ("lantern", 180),
    ("bricks", 50),
];

const ORE_PRICES: &[(&str, u32)] = &[
    ("netherite", 1500),
    ("redstone", 70),
    ("coal", 30),
    ("iron", 50),
    ("gold", 40),
    ("lapis", 60),
    ("diamond", 500),
    ("emerald", 1000),
    ("quartz", 60),
];

const DECORATION_PRICES: &[(&str, u32)] = &[
    ("item_frame", 40),
    ("sunflower", 20),
    ("cornflower", 12),
    ("dandelion", 8),
    ("flower", 10),
    ("banner", 50),
    ("peony", 15),
    ("lilac", 15),
    ("tulip", 12),
    ("allium", 12),
    ("daisy", 10),
    ("poppy", 10),
    ("skull", 100),
    ("painting", 60),
    ("lava", 50),
    ("water", 20),
    ("pot", 30),
];

/// Classify an identifier into a category and base price
///
/// Returns `None` when no keyword of any table matches; such identifiers
/// cannot be listed.
pub fn classify(item_id: &str) -> Option<(ItemCategory, Decimal)> {
    let name = item_id.to_lowercase();
    let tables = [
        (ItemCategory::Food, FOOD_PRICES),
        (ItemCategory::Item, ITEM_PRICES),
        (ItemCategory::Block, BLOCK_PRICES),
        (ItemCategory::Ore, ORE_PRICES),
        (ItemCategory::Decorative, DECORATION_PRICES),
    ];

    for (category, table) in tables {
        for (keyword, price) in table {
            if name.contains(keyword) {
                return Some((category, Decimal::from(*price)));
            }
        }
    }

    None
}

/// Whether the identifier matches a deny-list keyword
pub fn is_deny_listed(item_id: &str) -> bool {
    let name = item_id.to_lowercase();
    DENY_LIST.iter().any(|word| name.contains(word))
}

/// Whether the identifier may be listed on the market
///
/// True iff it is classifiable into a category and not deny-listed.
pub fn can_sell(item_id: &str) -> bool {
    !is_deny_listed(item_id) && classify(item_id).is_some()
}

/// The default identifier universe the catalog is initialized from
///
/// Stands in for the host application's full item registry; hosts with a
/// richer registry pass their own universe to catalog initialization.
pub fn default_universe() -> &'static [&'static str] {
    &[
        // blocks
        "stone",
        "cobblestone",
        "smooth_stone",
        "sandstone",
        "dirt",
        "grass",
        "oak_log",
        "oak_planks",
        "oak_fence",
        "oak_door",
        "oak_trapdoor",
        "oak_stairs",
        "glass",
        "glass_pane",
        "terracotta",
        "white_concrete",
        "quartz_pillar",
        "glowstone",
        "sea_lantern",
        "mud_bricks",
        // ores
        "coal",
        "iron_ingot",
        "gold_ingot",
        "redstone",
        "lapis_lazuli",
        "diamond",
        "emerald",
        "quartz",
        "netherite_scrap",
        // food
        "bread",
        "apple",
        "golden_apple",
        "enchanted_golden_apple",
        "cooked_beef",
        "cooked_chicken",
        "porkchop",
        "rabbit_stew",
        "beetroot",
        "carrot",
        "potato",
        "cake",
        "cookie",
        "melon_slice",
        "pufferfish",
        "salmon",
        "sweet_berries",
        // items
        "stick",
        "paper",
        "book",
        "leather",
        "string",
        "feather",
        "fire_charge",
        "compass",
        "clock",
        "glowstone_dust",
        "blaze_powder",
        "slimeball",
        "gunpowder",
        "ender_pearl",
        "nether_wart",
        "wheat",
        // decorations
        "flower_pot",
        "sunflower",
        "cornflower",
        "dandelion",
        "red_tulip",
        "lilac",
        "peony",
        "allium",
        "oxeye_daisy",
        "poppy",
        "white_banner",
        "item_frame",
        "painting",
        "skeleton_skull",
        // deny-listed or unclassifiable, never listed
        "diamond_sword",
        "iron_pickaxe",
        "golden_hoe",
        "netherite_axe",
        "iron_chestplate",
        "leather_boots",
        "raw_iron",
        "raw_gold",
        "glass_bottle",
        "grass_block",
        "totem_of_undying",
        "saddle",
        "bowl",
    ]
}
