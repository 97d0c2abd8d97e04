//! Methodology Diagram
//!
//! The terminal cannot draw Mermaid graphics, so diagram source goes through a
//! [`DiagramRenderer`]. [`DiagramView`] re-invokes the renderer whenever the
//! source changes and caches the output otherwise.

use std::collections::HashMap;

/// Turns diagram source into display lines
pub trait DiagramRenderer: Send {
    fn render(&self, source: &str) -> Vec<String>;
}

/// Renders a Mermaid flowchart as an indented text outline
#[derive(Debug, Default, Clone, Copy)]
pub struct MermaidOutline;

const ARROWS: [&str; 5] = ["-.->", "==>", "-->", "---", "-.-"];

const INLINE_LABEL_OPENERS: [&str; 2] = ["-- ", "== "];

const SKIPPED_KEYWORDS: [&str; 7] = [
    "graph", "flowchart", "classDef", "class", "style", "linkStyle", "direction",
];

impl DiagramRenderer for MermaidOutline {
    fn render(&self, source: &str) -> Vec<String> {
        let mut labels: HashMap<String, String> = HashMap::new();
        let mut lines = Vec::new();
        let mut depth = 0usize;

        for raw in source.lines() {
            let statement = raw.trim().trim_end_matches(';').trim();
            if statement.is_empty() || statement.starts_with("%%") {
                continue;
            }

            let keyword = statement.split_whitespace().next().unwrap_or_default();
            if SKIPPED_KEYWORDS.contains(&keyword) || keyword == "click" {
                continue;
            }

            if keyword == "subgraph" {
                let title = subgraph_title(statement["subgraph".len()..].trim());
                lines.push(format!("{}▸ {}", indent(depth), title));
                depth += 1;
                continue;
            }

            if statement == "end" {
                depth = depth.saturating_sub(1);
                continue;
            }

            let (nodes, edge_labels) = split_edges(statement);
            let names: Vec<String> = nodes
                .iter()
                .map(|node| node_label(node, &mut labels))
                .collect();

            let mut line = indent(depth);
            line.push_str("• ");
            for (i, name) in names.iter().enumerate() {
                if i > 0 {
                    match edge_labels.get(i - 1).and_then(|l| l.as_deref()) {
                        Some(label) => line.push_str(&format!(" →({}) ", label)),
                        None => line.push_str(" → "),
                    }
                }
                line.push_str(name);
            }
            lines.push(line);
        }

        lines
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn subgraph_title(rest: &str) -> String {
    match rest.find('[') {
        Some(open) => clean_label(&rest[open..]),
        None => clean_label(rest),
    }
}

/// Splits `A --> B -->|label| C -- label --> D` into nodes and edge labels
fn split_edges(statement: &str) -> (Vec<String>, Vec<Option<String>>) {
    let mut nodes = Vec::new();
    let mut edge_labels = Vec::new();
    let mut rest = statement;

    loop {
        let next = ARROWS
            .iter()
            .filter_map(|arrow| rest.find(arrow).map(|pos| (pos, arrow.len())))
            .min_by_key(|(pos, _)| *pos);

        let Some((pos, len)) = next else {
            nodes.push(rest.trim().to_string());
            break;
        };

        let (node, inline_label) = split_inline_label(&rest[..pos]);
        nodes.push(node);
        rest = &rest[pos + len..];

        // A longer arrow ("--->") leaves stray dashes behind
        rest = rest.trim_start_matches(['-', '>', '.', '=']);

        if let Some(after_pipe) = rest.strip_prefix('|') {
            match after_pipe.find('|') {
                Some(close) => {
                    edge_labels.push(Some(after_pipe[..close].trim().to_string()));
                    rest = &after_pipe[close + 1..];
                }
                None => {
                    edge_labels.push(inline_label);
                    rest = after_pipe;
                }
            }
        } else {
            edge_labels.push(inline_label);
        }
    }

    (nodes, edge_labels)
}

/// Separates `A -- label` (the head of `A -- label --> B`) into node and label
fn split_inline_label(segment: &str) -> (String, Option<String>) {
    // Dashes inside a node's brackets are part of its label
    let start = segment.rfind([']', ')', '}', '"']).map_or(0, |p| p + 1);
    let tail = &segment[start..];

    match INLINE_LABEL_OPENERS.iter().filter_map(|o| tail.find(o)).min() {
        Some(open) => {
            let label = tail[open + 2..].trim();
            let node = segment[..start + open].trim().to_string();
            (node, (!label.is_empty()).then(|| label.to_string()))
        }
        None => (segment.trim().to_string(), None),
    }
}

/// Resolves a node reference to its display label, remembering declarations
fn node_label(node: &str, labels: &mut HashMap<String, String>) -> String {
    let node = match node.find(":::") {
        Some(pos) => &node[..pos],
        None => node,
    };

    match node.find(['[', '(', '{', '>']) {
        Some(open) => {
            let id = node[..open].trim().to_string();
            let label = clean_label(&node[open..]);
            labels.insert(id, label.clone());
            label
        }
        None => {
            let id = node.trim();
            labels.get(id).cloned().unwrap_or_else(|| id.to_string())
        }
    }
}

fn clean_label(raw: &str) -> String {
    raw.trim()
        .trim_start_matches(['[', '(', '{', '>', '/', '\\'])
        .trim_end_matches([']', ')', '}', '/', '\\'])
        .trim_matches('"')
        .replace("<br/>", " ")
        .replace("<br>", " ")
        .trim()
        .to_string()
}

/// Cached rendering of the current methodology diagram
pub struct DiagramView {
    renderer: Box<dyn DiagramRenderer>,
    source: Option<String>,
    rendered: Vec<String>,
}

impl DiagramView {
    pub fn new(renderer: Box<dyn DiagramRenderer>) -> Self {
        Self {
            renderer,
            source: None,
            rendered: Vec::new(),
        }
    }

    /// Re-renders when `source` differs from the last one seen. Returns whether
    /// the renderer ran.
    pub fn sync(&mut self, source: &str) -> bool {
        if self.source.as_deref() == Some(source) {
            return false;
        }
        self.rendered = if source.trim().is_empty() {
            Vec::new()
        } else {
            self.renderer.render(source)
        };
        self.source = Some(source.to_string());
        true
    }

    pub fn clear(&mut self) {
        self.source = None;
        self.rendered.clear();
    }

    pub fn lines(&self) -> &[String] {
        &self.rendered
    }
}

impl Default for DiagramView {
    fn default() -> Self {
        Self::new(Box::new(MermaidOutline))
    }
}
