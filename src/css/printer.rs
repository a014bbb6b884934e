//! Serializes a [`Stylesheet`] back to CSS text.

use crate::css::stylesheet::{Node, Stylesheet};

const INDENT: &str = "  ";

/// Render the stylesheet as CSS, two-space indented, one declaration per line
pub fn to_css(sheet: &Stylesheet) -> String {
    let mut out = String::new();
    write_nodes(&mut out, &sheet.nodes, 0);
    out
}

fn write_nodes(out: &mut String, nodes: &[Node], depth: usize) {
    let indent = INDENT.repeat(depth);

    for node in nodes {
        match node {
            Node::Declaration(declaration) => {
                out.push_str(&indent);
                out.push_str(&declaration.prop);
                out.push(':');
                // substituting an empty variable can leave edge whitespace
                let value = declaration.value.trim();
                if !value.is_empty() {
                    out.push(' ');
                    out.push_str(value);
                }
                if declaration.important {
                    out.push_str(" !important");
                }
                out.push_str(";\n");
            }
            Node::Rule(rule) => {
                out.push_str(&format!("{}{} {{\n", indent, rule.selector));
                write_nodes(out, &rule.nodes, depth + 1);
                out.push_str(&format!("{}}}\n", indent));
            }
            Node::AtRule(at_rule) => {
                out.push_str(&indent);
                out.push('@');
                out.push_str(&at_rule.name);
                if !at_rule.params.is_empty() {
                    out.push(' ');
                    out.push_str(&at_rule.params);
                }
                match &at_rule.nodes {
                    Some(children) => {
                        out.push_str(" {\n");
                        write_nodes(out, children, depth + 1);
                        out.push_str(&format!("{}}}\n", indent));
                    }
                    None => out.push_str(";\n"),
                }
            }
            Node::Comment(comment) => {
                out.push_str(&format!("{}/*{}*/\n", indent, comment.text));
            }
        }
    }
}
