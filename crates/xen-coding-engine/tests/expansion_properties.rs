use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use rstest::rstest;
use xen_coding_engine::{
    ExpandError, ExpanderOptions, Rejection, RenderOptions, ShortcutTable, build_tree, expand,
    expansion::render, is_valid, merge_shortcuts,
};

fn expand_plain(abbreviation: &str) -> String {
    expand(abbreviation, &ShortcutTable::empty()).unwrap()
}

#[rstest]
#[case("grid>stack>btn*3{item $}")]
#[case("dock>menu>mi*4{Item $$}^stack")]
#[case("grid>tb[Text={Binding Name} Margin=4]+btn#ok.primary{OK}")]
#[case("ul*2>li*2>a{$}^^p")]
fn expansion_is_deterministic(#[case] abbreviation: &str) {
    let table = ShortcutTable::builtin();
    assert_eq!(expand(abbreviation, &table), expand(abbreviation, &table));
}

#[rstest]
#[case("tb[Width=1")]
#[case("tb]Width=1[[")]
#[case("tb{text")]
#[case("tb}")]
#[case("<Grid")]
#[case("grid>tb{a < b}")]
fn validator_rejects_unbalanced_and_markup(#[case] text: &str) {
    assert!(!is_valid(text));
    assert!(matches!(
        expand(text, &ShortcutTable::builtin()),
        Err(ExpandError::InvalidAbbreviation(_))
    ));
}

#[test]
fn multiplier_count() {
    assert_eq!(expand_plain("li*3"), "<li />\n<li />\n<li />");
}

#[rstest]
#[case("li*3{item $}", "<li>item 1</li>\n<li>item 2</li>\n<li>item 3</li>")]
#[case("li*3{item $$}", "<li>item 01</li>\n<li>item 02</li>\n<li>item 03</li>")]
fn counter_substitution_width(#[case] abbreviation: &str, #[case] expected: &str) {
    assert_eq!(expand_plain(abbreviation), expected);
}

#[test]
fn child_nesting() {
    let tree = build_tree(
        "div>span",
        &ShortcutTable::empty(),
        &ExpanderOptions::default().rules,
    )
    .unwrap();
    let [div] = tree.children() else {
        panic!("expected one top-level element");
    };
    assert_eq!(div.tag(), "div");
    let [span] = div.children() else {
        panic!("expected one child");
    };
    assert_eq!(span.tag(), "span");
}

#[test]
fn sibling_continuation() {
    assert_eq!(
        expand_plain("div>span+span"),
        "<div>\n    <span />\n    <span />\n</div>"
    );
}

#[test]
fn climb_up_returns_to_grandparent() {
    assert_eq!(
        expand_plain("div>span>a^b"),
        "<div>\n    <span>\n        <a />\n    </span>\n    <b />\n</div>"
    );
}

#[test]
fn climb_past_root_is_clamped() {
    assert_eq!(expand_plain("div>span^^^^b"), "<div>\n    <span />\n</div>\n<b />");
}

#[test]
fn shortcut_resolution() {
    let table = ShortcutTable::with_overrides([("btn", "Button")]);
    assert_eq!(expand("btn", &table).as_deref(), Ok("<Button />"));

    let custom = ShortcutTable::with_overrides([("card", "local:Card")]);
    assert_eq!(expand("CARD", &custom).as_deref(), Ok("<local:Card />"));
}

#[test]
fn attribute_parsing() {
    assert_eq!(expand_plain("a[href='x y']"), "<a href=\"x y\" />");
}

#[test]
fn rendering_is_idempotent() {
    let tree = build_tree(
        "grid[b=2 a=1]>z+a+m",
        &ShortcutTable::empty(),
        &ExpanderOptions::default().rules,
    )
    .unwrap();
    let options = RenderOptions::default();
    let first = render(&tree, &options);
    assert_eq!(first, render(&tree, &options));
    assert_eq!(
        first,
        "<grid b=\"2\" a=\"1\">\n    <z />\n    <a />\n    <m />\n</grid>"
    );
}

#[test]
fn override_merge_keeps_base() {
    let base = BTreeMap::from([("btn".to_string(), "Button".to_string())]);
    let overrides = BTreeMap::from([("btn".to_string(), "FancyButton".to_string())]);
    let merged = merge_shortcuts(&base, &overrides);
    assert_eq!(merged["btn"], "Button");
}

#[test]
fn merged_table_drives_expansion() {
    let base = BTreeMap::from([("btn".to_string(), "MyButton".to_string())]);
    let overrides = BTreeMap::from([("card".to_string(), "local:Card".to_string())]);
    let table = ShortcutTable::from(merge_shortcuts(&base, &overrides));
    assert_eq!(expand("btn", &table).as_deref(), Ok("<MyButton />"));
    assert_eq!(
        expand("stack>card", &table).as_deref(),
        Ok("<stack>\n    <local:Card />\n</stack>")
    );
}

#[test]
fn counters_number_tag_names() {
    assert_eq!(expand_plain("h$*3"), "<h1 />\n<h2 />\n<h3 />");
    assert_eq!(
        expand_plain("list>row$$*2{Row $}"),
        "<list>\n    <row01>Row 1</row01>\n    <row02>Row 2</row02>\n</list>"
    );
}

#[test]
fn failures_are_values() {
    let table = ShortcutTable::builtin();
    assert_eq!(
        expand("", &table),
        Err(ExpandError::InvalidAbbreviation(Rejection::Empty))
    );
    assert_eq!(expand("#id", &table), Err(ExpandError::EmptyExpansion));
}

#[test]
fn brackets_inside_text_stay_text() {
    assert_eq!(expand_plain("tb{see [1]}"), "<tb>see [1]</tb>");
}

#[test]
fn nested_multipliers_are_refused_as_a_value() {
    let table = ShortcutTable::builtin();
    assert!(matches!(
        expand("grid*1000>stack*1000>tb*1000", &table),
        Err(ExpandError::TooManyElements { .. })
    ));
    assert_eq!(
        expand("list>li*1000>tb{Row $$$$}", &table)
            .unwrap()
            .matches("<TextBlock>")
            .count(),
        1000
    );
}
