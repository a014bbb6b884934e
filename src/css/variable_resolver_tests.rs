use crate::css::constants::MAX_ITERATIONS;
use crate::css::stylesheet::{AtRule, Declaration, Node, Rule, Stylesheet};
use crate::css::variable_resolver::{VariableResolver, VariableTable};

fn rule(selector: &str, declarations: &[(&str, &str)]) -> Node {
    Rule::new(
        selector,
        declarations
            .iter()
            .map(|(prop, value)| Declaration::new(*prop, *value).into())
            .collect(),
    )
    .into()
}

fn value_of(sheet: &Stylesheet, prop: &str) -> String {
    let values = sheet.declaration_values(prop);
    assert_eq!(values.len(), 1, "expected exactly one '{}' declaration", prop);
    values[0].clone()
}

fn assert_no_var_left(sheet: &Stylesheet) {
    sheet.walk_declarations(|declaration| {
        assert!(
            !declaration.value.contains("var("),
            "'{}: {}' still references a variable",
            declaration.prop,
            declaration.value
        );
    });
}

#[test]
fn test_variable_collection() {
    let sheet = Stylesheet::new(vec![
        rule(":root", &[("--primary-color", "#ff0000"), ("--margin", "10px"), ("color", "red")]),
        AtRule::new("media", "print", Some(vec![rule(".a", &[("--secondary-color", "#00ff00")])])).into(),
    ]);

    let table = VariableTable::collect(&sheet);

    assert_eq!(table.len(), 3);
    assert_eq!(table.get("--primary-color"), Some("#ff0000"));
    assert_eq!(table.get("--secondary-color"), Some("#00ff00"));
    assert_eq!(table.get("--margin"), Some("10px"));
    assert!(!table.contains("color"));
}

#[test]
fn test_variable_resolution_simple() {
    let mut sheet = Stylesheet::new(vec![
        rule(":root", &[("--primary-color", "#ff0000"), ("--text-color", "var(--primary-color)")]),
        rule(".label", &[("color", "var(--text-color)")]),
    ]);

    let report = VariableResolver::new().resolve(&mut sheet);

    assert_eq!(value_of(&sheet, "color"), "#ff0000");
    assert_eq!(value_of(&sheet, "--text-color"), "#ff0000");
    assert_eq!(report.variables, 2);
    assert_eq!(report.iterations, 3);
    assert!(!report.hit_iteration_cap);
    assert_eq!(report.cleaned_up, 0);
}

#[test]
fn test_multiple_references_in_one_value() {
    let mut sheet = Stylesheet::new(vec![
        rule(":root", &[("--w", "1px"), ("--c", "red")]),
        rule(".box", &[("border", "var(--w) solid var(--c)")]),
    ]);

    VariableResolver::new().resolve(&mut sheet);

    assert_eq!(value_of(&sheet, "border"), "1px solid red");
}

#[test]
fn test_fallback_used_for_missing_variable() {
    let mut sheet = Stylesheet::new(vec![rule(".a", &[("width", "var(--missing, 10px)")])]);

    let report = VariableResolver::new().resolve(&mut sheet);

    assert_eq!(value_of(&sheet, "width"), "10px");
    assert_eq!(report.cleaned_up, 1);
}

#[test]
fn test_defined_variable_wins_over_fallback() {
    let mut sheet = Stylesheet::new(vec![
        rule(":root", &[("--x", "1px")]),
        rule(".a", &[("width", "var(--x, 5px)")]),
    ]);

    VariableResolver::new().resolve(&mut sheet);

    assert_eq!(value_of(&sheet, "width"), "1px");
}

#[test]
fn test_missing_variable_without_fallback_becomes_empty() {
    let mut sheet = Stylesheet::new(vec![rule(".a", &[("color", "var(--nope)")])]);

    VariableResolver::new().resolve(&mut sheet);

    assert_eq!(value_of(&sheet, "color"), "");
}

#[test]
fn test_last_definition_wins_across_selectors() {
    // the reference sits in the block with the earlier definition
    let mut sheet = Stylesheet::new(vec![
        rule(".first", &[("--x", "1px"), ("size", "var(--x)")]),
        rule(".second", &[("--x", "2px")]),
    ]);

    VariableResolver::new().resolve(&mut sheet);

    assert_eq!(value_of(&sheet, "size"), "2px");
}

#[test]
fn test_circular_definitions_terminate() {
    let mut sheet = Stylesheet::new(vec![
        rule(":root", &[("--a", "var(--b)"), ("--b", "var(--a)")]),
        rule(".a", &[("color", "var(--a)")]),
    ]);

    let report = VariableResolver::new().resolve(&mut sheet);

    assert!(report.iterations <= MAX_ITERATIONS);
    assert_eq!(value_of(&sheet, "color"), "");
    assert_no_var_left(&sheet);
}

#[test]
fn test_self_referential_growth_hits_cap() {
    let mut sheet = Stylesheet::new(vec![
        rule(":root", &[("--a", "1 var(--a)")]),
        rule(".a", &[("content", "var(--a)")]),
    ]);

    let report = VariableResolver::new().resolve(&mut sheet);

    assert_eq!(report.iterations, MAX_ITERATIONS);
    assert!(report.hit_iteration_cap);
    assert_no_var_left(&sheet);
    assert!(value_of(&sheet, "content").starts_with("1 1 1"));
}

#[test]
fn test_chain_of_ten_references_resolves() {
    let mut definitions = vec![("--v0".to_string(), "1px".to_string())];
    for i in 1..10 {
        definitions.push((format!("--v{}", i), format!("var(--v{})", i - 1)));
    }
    let mut nodes: Vec<Node> = Vec::new();
    nodes.push(
        Rule::new(
            ":root",
            definitions
                .iter()
                .map(|(prop, value)| Declaration::new(prop.as_str(), value.as_str()).into())
                .collect(),
        )
        .into(),
    );
    nodes.push(rule(".deep", &[("width", "var(--v9)")]));
    let mut sheet = Stylesheet::new(nodes);

    VariableResolver::new().resolve(&mut sheet);

    assert_eq!(value_of(&sheet, "width"), "1px");
    assert_no_var_left(&sheet);
}

#[test]
fn test_nested_fallback_is_truncated() {
    // The fallback capture stops at the first ')', so the outer reference
    // consumes only "var(--b, 5px" and the trailing ')' survives.
    let mut sheet = Stylesheet::new(vec![rule(".a", &[("margin", "var(--a, var(--b, 5px))")])]);

    VariableResolver::new().resolve(&mut sheet);

    assert_eq!(value_of(&sheet, "margin"), "var(--b, 5px)");
}

#[test]
fn test_nested_fallback_with_inner_variable_defined() {
    let mut sheet = Stylesheet::new(vec![
        rule(":root", &[("--b", "3px")]),
        rule(".a", &[("margin", "var(--a, var(--b, 5px))")]),
    ]);

    VariableResolver::new().resolve(&mut sheet);

    assert_eq!(value_of(&sheet, "margin"), "3px");
}

#[test]
fn test_malformed_reference_passes_through() {
    let mut sheet = Stylesheet::new(vec![rule(".a", &[("width", "var(--x,")])]);

    let report = VariableResolver::new().resolve(&mut sheet);

    assert_eq!(value_of(&sheet, "width"), "var(--x,");
    assert_eq!(report.cleaned_up, 0);
}

#[test]
fn test_important_flag_is_untouched() {
    let mut declaration = Declaration::new("color", "var(--c)");
    declaration.important = true;
    let mut sheet = Stylesheet::new(vec![
        rule(":root", &[("--c", "blue")]),
        Rule::new(".a", vec![declaration.into()]).into(),
    ]);

    VariableResolver::new().resolve(&mut sheet);

    let mut found = None;
    sheet.walk_declarations(|d| {
        if d.prop == "color" {
            found = Some(d.clone());
        }
    });
    let found = found.unwrap();
    assert_eq!(found.value, "blue");
    assert!(found.important);
}

#[test]
fn test_resolution_is_idempotent() {
    let mut sheet = Stylesheet::new(vec![
        rule(":root", &[("--gap", "4px"), ("--double", "calc(var(--gap) * 2)")]),
        rule(".a", &[("margin", "var(--double)"), ("padding", "var(--unset, 1em)")]),
    ]);
    let resolver = VariableResolver::new();

    resolver.resolve(&mut sheet);
    let once = sheet.clone();
    let report = resolver.resolve(&mut sheet);

    assert_eq!(sheet, once);
    assert_eq!(report.cleaned_up, 0);
    assert_eq!(value_of(&sheet, "margin"), "calc(4px * 2)");
    assert_eq!(value_of(&sheet, "padding"), "1em");
}

#[test]
fn test_values_without_references_untouched() {
    let original = Stylesheet::new(vec![rule(".a", &[("color", "red"), ("width", "calc(100% - 2px)")])]);
    let mut sheet = original.clone();

    let report = VariableResolver::new().resolve(&mut sheet);

    assert_eq!(sheet, original);
    assert_eq!(report.iterations, 1);
}
