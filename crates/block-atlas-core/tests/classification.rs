use block_atlas_core::error::BlockAtlasError;
use block_atlas_core::prelude::*;

fn classes(key: &str) -> Vec<Category> {
    TileClass::of(key, &RuleSet::default()).categories().to_vec()
}

#[test]
fn ore_names_match_with_underscore() {
    for key in [
        "diamond_ore",
        "emerald_ore",
        "gold_ore",
        "iron_ore",
        "lapis_ore",
        "redstone_ore",
        "nether_quartz_ore",
        "deepslate_iron_ore",
    ] {
        assert_eq!(classes(key), vec![Category::Ore], "key={}", key);
    }
    // no trailing underscore, no match
    assert!(classes("redstone").is_empty());
}

#[test]
fn matching_is_case_insensitive() {
    assert_eq!(classes("IRON_Ore"), vec![Category::Ore]);
    assert_eq!(classes("Lava_Still"), vec![Category::GlowSource]);
    assert_eq!(classes("OAK_LEAVES"), vec![Category::Leaves]);
}

#[test]
fn glow_leaves_water_glass() {
    assert_eq!(classes("glowstone"), vec![Category::GlowSource]);
    assert_eq!(classes("lava_flow"), vec![Category::GlowSource]);
    assert_eq!(classes("birch_leaves"), vec![Category::Leaves]);
    assert_eq!(classes("water_still"), vec![Category::Water]);
    assert_eq!(classes("glass"), vec![Category::Glass]);
    assert_eq!(classes("red_stained_glass_pane_top"), vec![Category::Glass]);
}

#[test]
fn grass_excludes_snow_and_overlay() {
    assert_eq!(classes("grass_block_top"), vec![Category::Grass]);
    assert_eq!(classes("grass_block_side"), vec![Category::Grass]);
    assert!(classes("grass_block_snow").is_empty());
    assert!(classes("grass_block_side_overlay").is_empty());
}

#[test]
fn several_categories_keep_rule_order() {
    // glass before grass in the key, grass first in rule order
    assert_eq!(classes("glass_grass"), vec![Category::Grass, Category::Glass]);
    assert_eq!(
        classes("iron_water_leaves"),
        vec![Category::Ore, Category::Leaves, Category::Water]
    );
}

#[test]
fn plain_tiles_have_no_category() {
    let class = TileClass::of("stone", &RuleSet::default());
    assert!(class.is_plain());
    assert!(!class.contains(Category::Ore));
}

#[test]
fn category_names_parse() {
    assert_eq!("ore".parse::<Category>(), Ok(Category::Ore));
    assert_eq!("Glow".parse::<Category>(), Ok(Category::GlowSource));
    assert_eq!("glow_source".parse::<Category>(), Ok(Category::GlowSource));
    assert!("metal".parse::<Category>().is_err());
}

#[test]
fn default_rules_validate() {
    RuleSet::default().validate().expect("default rules are valid");
    AtlasConfig::default().validate().expect("default config is valid");
}

#[test]
fn uppercase_pattern_rejected() {
    let mut rules = RuleSet::default();
    rules
        .rules
        .push(CategoryRule::new(Category::Glass, &["Ice"], &[]));
    match rules.validate() {
        Err(BlockAtlasError::InvalidConfig(msg)) => assert!(msg.contains("lowercase")),
        other => panic!("Expected InvalidConfig, got {:?}", other),
    }
}

#[test]
fn empty_include_rejected() {
    let mut rules = RuleSet::default();
    rules.rules.push(CategoryRule::new(Category::Water, &[], &[]));
    assert!(matches!(rules.validate(), Err(BlockAtlasError::InvalidConfig(_))));
}

#[test]
fn config_without_source_dirs_rejected() {
    let cfg = AtlasConfig::builder()
        .source_dirs(Vec::<String>::new())
        .build();
    assert!(matches!(cfg.validate(), Err(BlockAtlasError::InvalidConfig(_))));
}

#[test]
fn custom_rule_extends_classification() {
    let mut rules = RuleSet::default();
    rules
        .rules
        .push(CategoryRule::new(Category::GlowSource, &["magma"], &[]));
    let class = TileClass::of("magma_block", &rules);
    assert_eq!(class.categories(), &[Category::GlowSource]);
}

#[test]
fn rule_set_deserializes_with_defaults() {
    let rules: RuleSet =
        serde_json::from_str(r#"{"ore_brightness_threshold": 100}"#).expect("json");
    assert_eq!(rules.ore_brightness_threshold, 100);
    assert_eq!(rules.grass_tint, Tint([145, 189, 89, 255]));
    assert_eq!(rules.rules.len(), RuleSet::default().rules.len());
}
