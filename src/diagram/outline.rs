//! Text outline renderer for mermaid flowcharts.
//!
//! Needs no network. Reads the edges of a `graph`/`flowchart` definition and
//! lists them grouped by source node:
//!
//! ```text
//! Knowledge Field
//! └─ Evaluation → Follows Scientific Path?
//! Follows Scientific Path?
//! ├─ Yes → Secure Progress
//! └─ No → Groping About
//! ```
//!
//! Styling statements (`style`, `classDef`, `linkStyle`, ...) and subgraph
//! boundaries are skipped.

use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;

use super::{DiagramArtifact, DiagramRenderer, RenderError};

/// Arrow tokens, longest first so `-.->` wins over `-.-`.
const ARROWS: [&str; 6] = ["-.->", "-->", "---", "==>", "===", "-.-"];

/// Shape delimiters, two-character openers first.
const SHAPES: [(&str, &str); 9] = [
    ("((", "))"),
    ("([", "])"),
    ("[[", "]]"),
    ("[(", ")]"),
    ("{{", "}}"),
    ("[", "]"),
    ("{", "}"),
    ("(", ")"),
    (">", "]"),
];

const SKIPPED_KEYWORDS: [&str; 8] = [
    "style",
    "classDef",
    "class",
    "linkStyle",
    "click",
    "subgraph",
    "end",
    "direction",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: String,
    pub label: Option<String>,
    pub to: String,
}

/// A parsed flowchart: node labels by id plus edges in source order.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Flowchart {
    labels: HashMap<String, String>,
    pub edges: Vec<Edge>,
}

impl Flowchart {
    /// Display label of a node, falling back to its id.
    pub fn label<'a>(&'a self, id: &'a str) -> &'a str {
        self.labels.get(id).map(String::as_str).unwrap_or(id)
    }
}

pub fn parse(definition: &str) -> Result<Flowchart, RenderError> {
    let mut statements = definition
        .lines()
        .enumerate()
        .map(|(n, line)| (n + 1, line.trim().trim_end_matches(';').trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with("%%"));

    match statements.next() {
        Some((_, header)) if is_header(header) => {}
        Some((n, other)) => {
            return Err(RenderError::Syntax(format!(
                "line {n}: expected 'graph' or 'flowchart', found '{other}'"
            )));
        }
        None => return Err(RenderError::Syntax("empty definition".to_string())),
    }

    let mut chart = Flowchart::default();
    for (n, line) in statements {
        if is_skipped(line) {
            continue;
        }
        parse_statement(line, &mut chart)
            .map_err(|msg| RenderError::Syntax(format!("line {n}: {msg}")))?;
    }

    if chart.edges.is_empty() {
        return Err(RenderError::Syntax("flowchart has no edges".to_string()));
    }
    Ok(chart)
}

/// Lay the chart out as one block per source node.
pub fn outline(chart: &Flowchart) -> Vec<String> {
    let mut sources: Vec<&str> = Vec::new();
    for edge in &chart.edges {
        if !sources.contains(&edge.from.as_str()) {
            sources.push(&edge.from);
        }
    }

    let mut lines = Vec::new();
    for source in sources {
        lines.push(chart.label(source).to_string());
        let outgoing: Vec<&Edge> = chart.edges.iter().filter(|e| e.from == source).collect();
        let last = outgoing.len().saturating_sub(1);
        for (i, edge) in outgoing.into_iter().enumerate() {
            let branch = if i == last { "└─" } else { "├─" };
            let target = chart.label(&edge.to);
            match &edge.label {
                Some(label) => lines.push(format!("{branch} {label} → {target}")),
                None => lines.push(format!("{branch} → {target}")),
            }
        }
    }
    lines
}

fn is_header(line: &str) -> bool {
    let keyword = line.split_whitespace().next().unwrap_or_default();
    keyword == "graph" || keyword == "flowchart"
}

fn is_skipped(line: &str) -> bool {
    let keyword = line.split_whitespace().next().unwrap_or_default();
    SKIPPED_KEYWORDS.contains(&keyword)
}

/// `A[x] -->|y| B{z} --> C`, or a lone node declaration.
fn parse_statement(line: &str, chart: &mut Flowchart) -> Result<(), String> {
    let (mut from, mut rest) = parse_node(line, chart)?;
    while !rest.is_empty() {
        let (label, after_arrow) = parse_arrow(rest)?;
        let (to, after_node) = parse_node(after_arrow, chart)?;
        chart.edges.push(Edge {
            from: from.clone(),
            label,
            to: to.clone(),
        });
        from = to;
        rest = after_node;
    }
    Ok(())
}

/// Returns the node id and the unparsed remainder, recording any label.
fn parse_node<'a>(input: &'a str, chart: &mut Flowchart) -> Result<(String, &'a str), String> {
    let input = input.trim_start();
    let id_len = input
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(input.len());
    if id_len == 0 {
        return Err(format!("expected a node id at '{input}'"));
    }
    let (id, rest) = input.split_at(id_len);

    let Some((open, close)) = SHAPES.iter().find(|(open, _)| rest.starts_with(open)) else {
        return Ok((id.to_string(), rest.trim_start()));
    };
    let body = &rest[open.len()..];

    let (raw_label, after) = if let Some(quoted) = body.strip_prefix('"') {
        let end = quoted
            .find('"')
            .ok_or_else(|| format!("unterminated quote in node '{id}'"))?;
        let after = quoted[end + 1..]
            .strip_prefix(close)
            .ok_or_else(|| format!("expected '{close}' after label of node '{id}'"))?;
        (&quoted[..end], after)
    } else {
        let end = body
            .find(close)
            .ok_or_else(|| format!("unterminated shape in node '{id}'"))?;
        (&body[..end], &body[end + close.len()..])
    };

    chart.labels.insert(id.to_string(), clean_label(raw_label));
    Ok((id.to_string(), after.trim_start()))
}

/// Returns the optional edge label and the remainder after the arrow.
fn parse_arrow(input: &str) -> Result<(Option<String>, &str), String> {
    let input = input.trim_start();

    // `A -- text --> B`
    if let Some(body) = input.strip_prefix("-- ") {
        let end = body
            .find("-->")
            .ok_or_else(|| format!("unterminated edge text at '{input}'"))?;
        let label = clean_label(&body[..end]);
        return Ok((Some(label).filter(|l| !l.is_empty()), &body[end + 3..]));
    }

    let arrow = ARROWS
        .iter()
        .find(|a| input.starts_with(*a))
        .ok_or_else(|| format!("expected an arrow at '{input}'"))?;
    let rest = input[arrow.len()..].trim_start();

    match rest.strip_prefix('|') {
        Some(body) => {
            let end = body
                .find('|')
                .ok_or_else(|| format!("unterminated edge label at '{rest}'"))?;
            let label = clean_label(&body[..end]);
            Ok((Some(label).filter(|l| !l.is_empty()), &body[end + 1..]))
        }
        None => Ok((None, rest)),
    }
}

fn clean_label(raw: &str) -> String {
    let raw = raw.trim().trim_matches('"');
    raw.replace("<br/>", " / ")
        .replace("<br>", " / ")
        .replace("<br />", " / ")
        .trim()
        .to_string()
}

// ============================================================================
// Renderer
// ============================================================================

#[derive(Debug, Default)]
pub struct OutlineRenderer;

impl OutlineRenderer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DiagramRenderer for OutlineRenderer {
    fn name(&self) -> &str {
        "outline"
    }

    async fn render(&self, definition: &str) -> Result<DiagramArtifact, RenderError> {
        let chart = parse(definition)?;
        debug!(
            "Outlined flowchart: {} nodes labelled, {} edges",
            chart.labels.len(),
            chart.edges.len()
        );
        Ok(DiagramArtifact::Outline(outline(&chart)))
    }
}
