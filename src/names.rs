//! Maps local image filenames to the file titles the wiki might use.

use std::collections::BTreeMap;

/// Local extension stripped before building titles.
const EXTENSION: &str = ".png";

/// Suffix the wiki uses for some build-menu icons.
const BUILD_SUFFIX: &str = "_Build";

/// Namespace prefix of wiki file pages.
const FILE_NAMESPACE: &str = "File:";

/// Local names whose wiki page lives under a different title.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("Battle_Rond", "Battle_Rönd"),
    ("Commanders_Helm", "Commander's_Helm"),
    ("Clockmakers_Tools", "Clockmaker's_Tools"),
    ("Pick_Axe", "Opulent_Pickaxe"),
    ("Regal_Shovel", "Regal_Shovel"),
    ("Construction_Amulet", "Construction_Amulet"),
    ("Deconstruction_Staff", "Deconstruction_Staff"),
    ("Dapper_Vest", "Dapper_Vest"),
    ("Desert_Goggles", "Desert_Goggles"),
    ("Fashion_Goggles", "Fashion_Goggles"),
    ("Flower_Hat", "Flower_Hat"),
    ("Cookie_Cutter_Cap", "Cookie_Cutter_Cap"),
    ("Hibearnation_Vest", "Hibearnation_Vest"),
    ("Snurtle_Shell_Armor", "Snurtle_Shell_Armour"),
    ("Heat_Stone", "Thermal_Stone"),
    ("Summer_Frest", "Summer_Frest"),
    ("Gunpowder", "Gunpowder"),
    ("Moon_Glass", "Moon_Glass"),
    ("Moon_Glass_Axe", "Moon_Glass_Axe"),
    ("Thulecite_Club", "Thulecite_Club"),
    ("Thulecite_Fragments", "Thulecite_Fragments"),
    ("Shadow_Thurible", "Shadow_Thurible"),
    ("Electric_Dart", "Electric_Dart"),
    ("Elding_Spear", "Elding_Spear"),
    ("Dark_Lament", "Dark_Lament"),
    ("Enlightened_Lullaby", "Enlightened_Lullaby"),
    ("Lazy_Forager", "The_Lazy_Forager"),
    ("Improved_Farm", "Improved_Farm"),
    ("Garden_Rigamajig", "Garden_Rigamajig"),
    ("Heavy_Weighted_Lure", "Heavy_Weighted_Lure"),
    ("Wobbler", "Wobbler"),
    ("Rain_Fisher", "Rain_Fisher"),
    ("Pylon", "Pylon"),
    ("Fire_Pump", "Fire_Pump"),
    ("Deck_Illuminator", "Deck_Illuminator"),
    ("Lightning_Conductor", "Lightning_Conductor"),
    ("Steering_Wheel_Stand", "Steering_Wheel_Stand"),
    ("Log_Raft_Kit", "Log_Raft"),
    ("Grass_Raft_Kit", "Grass_Raft"),
    ("Kelp_Bumper", "Kelp_Bumper"),
    ("Shell_Bumper", "Shell_Bumper"),
    ("Scaled_Furnace", "Scaled_Furnace"),
    ("Salt_Lick", "Salt_Lick"),
    ("Tree_Planter", "Tree_Planter"),
    ("Wall_Lantern", "Wall_Lantern"),
    ("Scarecrow", "Friendly_Scarecrow"),
    ("Potter_Sculpture", "Potter_Sculpture"),
    ("Potted_Tree", "Potted_Tree"),
    ("Mini_Sign", "Mini_Sign"),
    ("Directional_Sign", "Directional_Sign"),
    ("Reviver", "Reviver"),
    ("Marble_Rounds", "Marble_Rounds"),
    ("Poop_Pellets", "Poop_Pellets"),
    ("Portable_Seasoning_Station", "Portable_Seasoning_Station"),
    ("Wooden_Walking_Stick", "Wooden_Walking_Stick"),
    // Wigfrid songs
    ("Weaponized_Warble", "Weaponized_Warble"),
    ("Startling_Soliloquy", "Startling_Soliloquy"),
    ("Fireproof_Falsetto", "Fireproof_Falsetto"),
    // Wendy elixirs
    ("Vigor_Mortis", "Vigor_Mortis"),
    ("Nightshade_Nostrum", "Nightshade_Nostrum"),
    ("Spectral_Cure-All", "Spectral_Cure-All"),
    ("Distilled_Vengeance", "Distilled_Vengeance"),
    ("Revenant_Restorative", "Revenant_Restorative"),
    ("Ghastly_Experience", "Ghastly_Experience"),
    ("Cursed_Vexation", "Cursed_Vexation"),
    // Wickerbottom books
    ("Lux_Aeterna", "Lux_Aeterna"),
    ("Lunar_Grimoire", "Lunar_Grimoire"),
    ("Overcoming_Arachnophobia", "Overcoming_Arachnophobia"),
    ("Practical_Rain_Rituals", "Practical_Rain_Rituals"),
    // Woodie
    ("Kitschy_Beaver_Idol", "Kitschy_Beaver_Idol"),
    ("Kitschy_Moose_Idol", "Kitschy_Moose_Idol"),
    ("Kitschy_Goose_Idol", "Kitschy_Goose_Idol"),
    ("Den_Decorating_Set", "Den_Decorating_Set"),
    ("Shoo_Box", "Shoo_Box"),
    ("Healing_Glop", "Healing_Glop"),
    ("DIY_Royalty_Kit", "DIY_Royalty_Kit"),
    ("Craftsmerm_House", "Craftsmerm_House"),
    ("Second_Chance_Watch", "Second_Chance_Watch"),
];

/// Rename table from decoded local base names to wiki base names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    entries: BTreeMap<String, String>,
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AliasTable {
    /// The built-in table.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_ALIASES
                .iter()
                .map(|&(local, wiki)| (local.to_string(), wiki.to_string()))
                .collect(),
        }
    }

    /// A table with no entries.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Adds entries, replacing any existing entry with the same key.
    #[must_use]
    pub fn with_overrides<I, K, V>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.entries
            .extend(overrides.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Wiki base name for a decoded local base name.
    #[must_use]
    pub fn get(&self, base: &str) -> Option<&str> {
        self.entries.get(base).map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Strips the extension and decodes the escaped apostrophe.
#[must_use]
pub fn decode_base(filename: &str) -> String {
    filename.replace(EXTENSION, "").replace("%27", "'")
}

/// Builds the ordered candidate wiki titles for a local filename.
///
/// Order: alias (if any), decoded base, base without `_Build`, base with
/// `_Build` appended. Duplicates are kept.
#[must_use]
pub fn candidate_titles(filename: &str, aliases: &AliasTable) -> Vec<String> {
    let decoded = decode_base(filename);

    let mut variants = Vec::with_capacity(4);
    if let Some(alias) = aliases.get(&decoded) {
        variants.push(alias.to_string());
    }
    variants.push(decoded.clone());
    variants.push(decoded.replace(BUILD_SUFFIX, ""));
    variants.push(format!("{decoded}{BUILD_SUFFIX}"));

    variants
        .into_iter()
        .map(|v| format!("{FILE_NAMESPACE}{v}{EXTENSION}"))
        .collect()
}

/// Canonical form of a title for matching against API responses.
///
/// MediaWiki reports titles with spaces where the request used underscores,
/// and with the first letter of the page name upper-cased.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    let spaced = title.replace('_', " ");
    let Some(name) = spaced.strip_prefix(FILE_NAMESPACE) else {
        return spaced;
    };
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!(
            "{FILE_NAMESPACE}{}{}",
            first.to_uppercase(),
            chars.as_str()
        ),
        None => spaced,
    }
}
