//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use lexi_core::{GraphOutcome, GraphResponse, LexicalNode, NodeDetailResponse, StoreCounts};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const NAME_WIDTH: usize = 14;
const READING_WIDTH: usize = 16;

/// Get terminal width, defaulting to 80.
fn term_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Pad a plain string to a given visual width (right-padded).
pub fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Truncate a string respecting visual width.
pub fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 2 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}

/// Fit `s` into exactly `width` columns.
fn cell(s: &str, width: usize) -> String {
    pad_right(&truncate_visual(s, width), width)
}

fn level_colored(level: Option<&str>) -> ColoredString {
    match level.map(|l| l.trim().to_uppercase()).as_deref() {
        Some("N5") => "N5".green(),
        Some("N4") => "N4".bright_green(),
        Some("N3") => "N3".yellow(),
        Some("N2") => "N2".bright_red(),
        Some("N1") => "N1".red(),
        Some(other) => other.to_string().normal(),
        None => "-".dimmed(),
    }
}

fn node_line(node: &LexicalNode, width: usize) -> String {
    let reading = node.reading.as_deref().unwrap_or("");
    let translation_width = width.saturating_sub(NAME_WIDTH + READING_WIDTH + 10).max(10);
    format!(
        "{} {} {} {}",
        cell(&node.name, NAME_WIDTH),
        cell(reading, READING_WIDTH).dimmed(),
        level_colored(node.level.as_deref()),
        truncate_visual(node.translation.as_deref().unwrap_or(""), translation_width)
    )
}

/// Print an expansion result.
pub fn print_graph(term: &str, graph: &GraphResponse) {
    match graph.outcome() {
        GraphOutcome::EmptyInput => {
            println!("{}", "Enter a word to explore.".dimmed());
            return;
        }
        GraphOutcome::NoMatch => {
            println!("{} {}", "No data found for".yellow(), term.bold());
            return;
        }
        GraphOutcome::Found { .. } => {}
    }

    let width = term_width();
    if let Some(center) = graph.center_id().and_then(|id| graph.node(id)) {
        println!("{} {}", "Center:".bold(), node_line(center, width).cyan());
    }

    let neighbors: Vec<&LexicalNode> = graph.nodes.iter().filter(|n| !n.is_center).collect();
    if !neighbors.is_empty() {
        println!("\n{} ({}):", "Nodes".bold(), neighbors.len());
        for node in neighbors {
            println!("  {} {}", "•".dimmed(), node_line(node, width.saturating_sub(4)));
        }
    }

    if !graph.links.is_empty() {
        println!("\n{} ({}):", "Links".bold(), graph.links.len());
        for link in &graph.links {
            let name = |id: &str| graph.node(id).map(|n| n.name.clone()).unwrap_or_else(|| id.to_string());
            println!(
                "  {} {} {}",
                cell(&name(&link.source), NAME_WIDTH),
                format!("-[{} {:.2}]-", link.relation_type, link.weight).yellow(),
                name(&link.target)
            );
        }
    }
}

/// Print a node and its ranked neighbors.
pub fn print_detail(detail: &NodeDetailResponse) {
    let node = &detail.node;
    println!("{} {}", node.name.cyan().bold(), format!("({})", node.id).dimmed());
    if let Some(reading) = &node.reading {
        println!("{}: {}", "Reading".bold(), reading);
    }
    if let Some(translation) = &node.translation {
        println!("{}: {}", "Translation".bold(), translation);
    }
    if let Some(pos) = &node.part_of_speech {
        println!("{}: {}", "Part of speech".bold(), pos);
    }
    println!("{}: {}", "Level".bold(), level_colored(node.level.as_deref()));
    if let Some(domain) = &node.domain {
        println!("{}: {}", "Domain".bold(), domain);
    }

    println!();
    if detail.neighbors.is_empty() {
        println!("{}", "No neighbors.".dimmed());
        return;
    }

    println!(
        "{} {} {} {}",
        pad_right("Neighbor", NAME_WIDTH),
        pad_right("Relation", 12),
        pad_right("Strength", 9),
        "Sense"
    );
    println!("{}", "─".repeat(50));
    for neighbor in &detail.neighbors {
        println!(
            "{} {} {} {}",
            cell(&neighbor.node.name, NAME_WIDTH),
            cell(&neighbor.relation_type, 12).yellow(),
            pad_right(&format!("{:.2}", neighbor.strength()), 9),
            neighbor.mutual_sense.as_deref().unwrap_or("").dimmed()
        );
    }
    println!();
    println!("{} neighbor(s)", detail.neighbors.len());
}

/// Print store totals.
pub fn print_counts(source: &str, counts: &StoreCounts) {
    println!("{}", "Lexical Graph Status".bold());
    println!("{}", "─".repeat(40));
    println!("  Source:        {}", source.green());
    println!("  Nodes:         {}", counts.nodes.to_string().cyan());
    println!("  Relationships: {}", counts.relationships.to_string().cyan());
    println!("{}", "─".repeat(40));
}
