//! Tree printer utility for stylesheet debugging
//!
//! Renders the stylesheet model in a readable indented form, used by the
//! `--dump-tree` flag.

use std::collections::BTreeMap;

use crate::css::stylesheet::{Node, Stylesheet};

/// Print a complete stylesheet tree to stdout
pub fn print_tree_to_stdout(sheet: &Stylesheet) {
    println!("=== Stylesheet Tree ===");
    print!("{}", render_tree(sheet));

    println!();
    println!("=== Tree Statistics ===");
    for (node_type, count) in collect_node_stats(sheet) {
        println!("{}: {}", node_type, count);
    }
}

/// Render the tree, one node per line
pub fn render_tree(sheet: &Stylesheet) -> String {
    let mut out = String::new();
    for node in &sheet.nodes {
        render_node(node, 0, &mut out);
    }
    out
}

fn render_node(node: &Node, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let label = match node {
        Node::AtRule(at_rule) => format!("@{} '{}'", at_rule.name, at_rule.params),
        Node::Rule(rule) => format!("'{}'", rule.selector),
        Node::Declaration(declaration) => format!(
            "{}: '{}'{}",
            declaration.prop,
            declaration.value,
            if declaration.important { " !important" } else { "" }
        ),
        Node::Comment(comment) => format!("'{}'", truncate(&comment.text)),
    };

    // Escape newlines and tabs for better display
    let label = label
        .replace('\n', "\\n")
        .replace('\t', "\\t")
        .replace('\r', "\\r");

    out.push_str(&format!("{}{} {}\n", indent, node.kind(), label));

    if let Some(children) = node.children() {
        for child in children {
            render_node(child, depth + 1, out);
        }
    }
}

// Truncate very long text for readability
fn truncate(text: &str) -> String {
    if text.chars().count() > 50 {
        format!("{}...", text.chars().take(47).collect::<String>())
    } else {
        text.to_string()
    }
}

/// Collect statistics about node kinds in the tree
pub fn collect_node_stats(sheet: &Stylesheet) -> BTreeMap<&'static str, usize> {
    let mut stats = BTreeMap::new();
    let mut stack: Vec<&Node> = sheet.nodes.iter().collect();
    while let Some(node) = stack.pop() {
        *stats.entry(node.kind()).or_insert(0) += 1;
        if let Some(children) = node.children() {
            stack.extend(children.iter());
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::stylesheet::{AtRule, Declaration, Rule};

    #[test]
    fn test_tree_rendering() {
        let sheet = Stylesheet::new(vec![
            AtRule::new("layer", "base", Some(vec![
                Rule::new(".test", vec![Declaration::new("color", "red").into()]).into(),
            ]))
            .into(),
        ]);

        let rendered = render_tree(&sheet);
        assert_eq!(
            rendered,
            "at_rule @layer 'base'\n  rule '.test'\n    declaration color: 'red'\n"
        );

        let stats = collect_node_stats(&sheet);
        assert_eq!(stats.get("at_rule"), Some(&1));
        assert_eq!(stats.get("declaration"), Some(&1));
    }
}
