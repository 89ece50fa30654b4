//! Packet rendering: Markdown for humans and agents, JSON for tooling.

use crate::context::AssembledPacket;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt::Write;
use std::str::FromStr;

/// Output format for a rendered packet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md" | "markdown" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{other}' (expected md or json)")),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Markdown => write!(f, "md"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Render a packet as Markdown.
///
/// Empty sections are omitted, except the read order which always has a
/// heading.
pub fn render_markdown(packet: &AssembledPacket, generated: DateTime<Utc>) -> String {
    let mut out = String::new();

    out.push_str("# Context Packet\n");
    let _ = writeln!(
        out,
        "Generated: {} | Budget: {} tokens | Used: ~{}\n",
        timestamp(generated),
        packet.budget,
        packet.tokens_used
    );

    out.push_str("## Read These Files (in order)\n");
    for (i, path) in packet.read_order.iter().enumerate() {
        let _ = writeln!(out, "{}. {path}", i + 1);
    }
    out.push('\n');

    bullet_section(&mut out, "Constitution (NEVER VIOLATE)", &packet.constitution);

    if !packet.tasks.is_empty() {
        out.push_str("## Current Tasks\n");
        for task in &packet.tasks {
            let _ = writeln!(out, "{task}");
        }
        out.push('\n');
    }

    bullet_section(&mut out, "Key Conventions", &packet.conventions);
    body_section(&mut out, "Recent Decisions", &packet.decisions);
    body_section(&mut out, "Key Learnings", &packet.learnings);
    bullet_section(&mut out, "Also Noted", &packet.summaries);

    let _ = writeln!(out, "{}", packet.instruction);
    out
}

fn bullet_section(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "## {heading}");
    for item in items {
        let _ = writeln!(out, "- {item}");
    }
    out.push('\n');
}

fn body_section(out: &mut String, heading: &str, bodies: &[String]) {
    if bodies.is_empty() {
        return;
    }
    let _ = writeln!(out, "## {heading}");
    for body in bodies {
        let _ = writeln!(out, "{body}\n");
    }
}

/// JSON shape of a rendered packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PacketJson<'a> {
    pub generated: String,
    pub budget: usize,
    pub tokens_used: usize,
    pub read_order: &'a [String],
    pub constitution: &'a [String],
    pub tasks: &'a [String],
    pub conventions: &'a [String],
    pub decisions: &'a [String],
    pub learnings: &'a [String],
    pub summaries: &'a [String],
    pub instruction: &'a str,
}

impl<'a> PacketJson<'a> {
    pub fn new(packet: &'a AssembledPacket, generated: DateTime<Utc>) -> Self {
        Self {
            generated: timestamp(generated),
            budget: packet.budget,
            tokens_used: packet.tokens_used,
            read_order: &packet.read_order,
            constitution: &packet.constitution,
            tasks: &packet.tasks,
            conventions: &packet.conventions,
            decisions: &packet.decisions,
            learnings: &packet.learnings,
            summaries: &packet.summaries,
            instruction: &packet.instruction,
        }
    }
}

/// Render a packet as pretty-printed JSON.
pub fn render_json(
    packet: &AssembledPacket,
    generated: DateTime<Utc>,
) -> ctxpack_core::Result<String> {
    Ok(serde_json::to_string_pretty(&PacketJson::new(packet, generated))?)
}

/// Render in the requested format.
pub fn render(
    packet: &AssembledPacket,
    format: OutputFormat,
    generated: DateTime<Utc>,
) -> ctxpack_core::Result<String> {
    match format {
        OutputFormat::Markdown => Ok(render_markdown(packet, generated)),
        OutputFormat::Json => render_json(packet, generated).map(|mut s| {
            s.push('\n');
            s
        }),
    }
}

/// Per-tier token breakdown, for `--explain`.
pub fn render_tier_report(packet: &AssembledPacket) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Budget: {} tokens | Used: ~{}",
        packet.budget, packet.tokens_used
    );
    let _ = writeln!(out, "  {:<12} {:>7}  {:>9}", "tier", "tokens", "items");
    for tier in &packet.tiers {
        let _ = writeln!(
            out,
            "  {:<12} {:>7}  {:>9}",
            tier.name,
            tier.tokens,
            format!("{}/{}", tier.items_included, tier.items_total)
        );
    }
    let skipped = TIER_NAMES.len().saturating_sub(packet.tiers.len());
    if skipped > 0 {
        let _ = writeln!(out, "  ({skipped} tier(s) skipped: budget exhausted)");
    }
    out
}

const TIER_NAMES: [&str; 5] = ["foundation", "tasks", "conventions", "decisions", "learnings"];

fn timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn generated() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 19, 12, 0, 0).unwrap()
    }

    fn packet() -> AssembledPacket {
        AssembledPacket {
            read_order: vec![".context/CONSTITUTION.md".into(), ".context/TASKS.md".into()],
            constitution: vec!["Never violate".into()],
            tasks: vec!["- [ ] Ship it".into()],
            conventions: vec!["Use tracing".into()],
            decisions: vec!["## [2026-02-19-120000] Use SQLite\n\nBecause.".into()],
            learnings: vec!["## [2026-02-18-120000] Paths\n\nCheck them.".into()],
            summaries: vec!["Old note".into()],
            instruction: "Confirm.".into(),
            budget: 8000,
            tokens_used: 42,
            tiers: Vec::new(),
        }
    }

    #[test]
    fn markdown_has_all_sections_in_order() {
        let md = render_markdown(&packet(), generated());
        let headings = [
            "# Context Packet",
            "Generated: 2026-02-19T12:00:00Z | Budget: 8000 tokens | Used: ~42",
            "## Read These Files (in order)",
            "1. .context/CONSTITUTION.md",
            "2. .context/TASKS.md",
            "## Constitution (NEVER VIOLATE)",
            "- Never violate",
            "## Current Tasks",
            "- [ ] Ship it",
            "## Key Conventions",
            "- Use tracing",
            "## Recent Decisions",
            "## Key Learnings",
            "## Also Noted",
            "- Old note",
            "Confirm.",
        ];
        let mut cursor = 0;
        for h in headings {
            let pos = md[cursor..].find(h).unwrap_or_else(|| panic!("missing {h:?}"));
            cursor += pos + h.len();
        }
    }

    #[test]
    fn markdown_omits_empty_sections() {
        let mut pkt = packet();
        pkt.tasks.clear();
        pkt.decisions.clear();
        pkt.summaries.clear();
        let md = render_markdown(&pkt, generated());
        assert!(!md.contains("## Current Tasks"));
        assert!(!md.contains("## Recent Decisions"));
        assert!(!md.contains("## Also Noted"));
        assert!(md.contains("## Key Learnings"));
        assert!(md.ends_with("Confirm.\n"));
    }

    #[test]
    fn json_has_expected_fields() {
        let json = render_json(&packet(), generated()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["generated"], "2026-02-19T12:00:00Z");
        assert_eq!(value["budget"], 8000);
        assert_eq!(value["tokens_used"], 42);
        assert_eq!(value["summaries"][0], "Old note");
        assert_eq!(value["instruction"], "Confirm.");
        assert!(value.get("tiers").is_none());
    }

    #[test]
    fn tier_report_lists_each_tier() {
        use crate::context::TierStats;

        let mut pkt = packet();
        pkt.tiers = vec![
            TierStats {
                name: "foundation".into(),
                tokens: 30,
                items_included: 3,
                items_total: 3,
            },
            TierStats {
                name: "tasks".into(),
                tokens: 12,
                items_included: 1,
                items_total: 4,
            },
        ];
        let report = render_tier_report(&pkt);
        assert!(report.starts_with("Budget: 8000 tokens | Used: ~42\n"));
        assert!(report.lines().any(|l| l.contains("foundation") && l.contains("30") && l.contains("3/3")));
        assert!(report.lines().any(|l| l.contains("tasks") && l.contains("1/4")));
        assert!(report.contains("3 tier(s) skipped"));
    }

    #[test]
    fn output_format_parses() {
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn render_dispatches_on_format() {
        let md = render(&packet(), OutputFormat::Markdown, generated()).unwrap();
        assert!(md.starts_with("# Context Packet"));
        let json = render(&packet(), OutputFormat::Json, generated()).unwrap();
        assert!(json.trim_start().starts_with('{'));
    }
}
