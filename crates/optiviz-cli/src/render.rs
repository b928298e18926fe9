//! Human-readable output
//!
//! Suggestions render as a numbered list or a table; plans and ASTs render as
//! trees drawn with box-drawing connectors.

use std::fmt::Write as _;

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use optiviz_analyzer::{PlanNode, extract_plan_root};
use optiviz_core::{AnalyzeResponse, Suggestion, TreeValue};

const UNAVAILABLE: &str = "  (unavailable)";

/// What the text format prints besides the suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextOptions {
    pub print_plan: bool,
    pub print_ast: bool,
    pub ast_depth: usize,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            print_plan: false,
            print_ast: false,
            ast_depth: 4,
        }
    }
}

/// Renders the text format: suggestions, then the optional plan and AST trees
pub fn render_text(response: &AnalyzeResponse, options: TextOptions) -> String {
    let mut out = render_suggestions(&response.suggestions);

    if options.print_plan {
        out.push_str("Explain plan:\n");
        match plan_tree(response.explain_plan.as_ref()) {
            Some(tree) => out.push_str(&tree.render()),
            None => push_line(&mut out, UNAVAILABLE),
        }
    }

    if options.print_ast {
        out.push_str("AST:\n");
        match response
            .ast
            .as_ref()
            .and_then(|ast| ast_tree("root", ast, options.ast_depth))
        {
            Some(tree) => out.push_str(&tree.render()),
            None => push_line(&mut out, UNAVAILABLE),
        }
    }

    out
}

/// Numbered list of suggestions with description and recommendation lines
pub fn render_suggestions(suggestions: &[Suggestion]) -> String {
    let mut out = String::from("Suggestions:\n");

    if suggestions.is_empty() {
        push_line(&mut out, "  (none)");
        return out;
    }

    for (index, suggestion) in suggestions.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. [{}] {}",
            index + 1,
            suggestion.severity,
            suggestion.title
        );
        if !suggestion.description.is_empty() {
            let _ = writeln!(out, "   - {}", suggestion.description);
        }
        if !suggestion.recommendation.is_empty() {
            let _ = writeln!(out, "   * {}", suggestion.recommendation);
        }
        out.push('\n');
    }

    out
}

/// Suggestions as a terminal table
pub fn render_table(suggestions: &[Suggestion]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Severity", "Finding", "Recommendation"]);

    for (index, suggestion) in suggestions.iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            suggestion.severity.to_string(),
            format!("{}\n{}", suggestion.title, suggestion.description),
            suggestion.recommendation.clone(),
        ]);
    }

    table.to_string()
}

/// A labelled node of a rendered tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub label: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// Draws the tree: the root label on its own line, descendants indented
    /// under `├──` / `└──` connectors.
    pub fn render(&self) -> String {
        let mut out = String::new();
        push_line(&mut out, &self.label);

        // (node, prefix for its line, is last sibling)
        let mut stack: Vec<(&TreeNode, String, bool)> = self
            .children
            .iter()
            .enumerate()
            .rev()
            .map(|(i, child)| (child, "    ".to_string(), i + 1 == self.children.len()))
            .collect();

        while let Some((node, prefix, is_last)) = stack.pop() {
            let branch = if is_last { "└──" } else { "├──" };
            let _ = writeln!(out, "{}{} {}", prefix, branch, node.label);

            let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
            let count = node.children.len();
            for (i, child) in node.children.iter().enumerate().rev() {
                stack.push((child, child_prefix.clone(), i + 1 == count));
            }
        }

        out
    }
}

/// Builds the plan tree, unwrapping the EXPLAIN array and `Plan` envelope
pub fn plan_tree(plan: Option<&TreeValue>) -> Option<TreeNode> {
    extract_plan_root(plan)
        .and_then(PlanNode::from_value)
        .map(plan_node_tree)
}

fn plan_node_tree(node: PlanNode<'_>) -> TreeNode {
    TreeNode {
        label: plan_label(node),
        children: node.children().map(plan_node_tree).collect(),
    }
}

/// `Node Type (relation, as alias) | filter`
pub fn plan_label(node: PlanNode<'_>) -> String {
    let mut label = node.node_type().unwrap_or("Plan Node").to_string();

    let mut parts = Vec::new();
    if let Some(relation) = node.relation() {
        parts.push(relation.to_string());
    }
    if let Some(alias) = node.alias() {
        parts.push(format!("as {}", alias));
    }
    if !parts.is_empty() {
        let _ = write!(label, " ({})", parts.join(", "));
    }

    if let Some(filter) = node.filter() {
        let _ = write!(label, " | {}", filter);
    }

    label
}

/// Builds a generic tree for a JSON value. Object keys are sorted, array items
/// are labelled `[i]`, and nothing deeper than `depth` levels below `label` is
/// included.
pub fn ast_tree(label: &str, value: &TreeValue, depth: usize) -> Option<TreeNode> {
    build_ast_tree(label, value, Some(depth))
}

fn build_ast_tree(label: &str, value: &TreeValue, depth: Option<usize>) -> Option<TreeNode> {
    let depth = depth?;
    let child_depth = depth.checked_sub(1);

    let node = match value {
        TreeValue::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            TreeNode {
                label: label.to_string(),
                children: keys
                    .into_iter()
                    .filter_map(|key| build_ast_tree(key, &map[key.as_str()], child_depth))
                    .collect(),
            }
        }
        TreeValue::Array(items) => TreeNode {
            label: label.to_string(),
            children: items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| build_ast_tree(&format!("[{}]", i), item, child_depth))
                .collect(),
        },
        TreeValue::String(text) => TreeNode::leaf(format!("{}: {:?}", label, text)),
        other => TreeNode::leaf(format!("{}: {}", label, other)),
    };

    Some(node)
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}
