//! End-to-end integration tests for ctxpack.
//!
//! These tests exercise the full pipeline from a `.context/` directory on
//! disk to a rendered packet, including configuration, scoring and budget
//! degradation.

use chrono::{DateTime, TimeZone, Utc};
use ctxpack_agent::{OutputFormat, PacketAssembler, render, render_markdown};
use ctxpack_config::AppConfig;
use ctxpack_memory::ContextDir;
use std::path::Path;
use tempfile::TempDir;

// ── Fixtures ─────────────────────────────────────────────────────────────

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 19, 12, 0, 0).unwrap()
}

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let d = tmp.path();

    write(
        d,
        "CONSTITUTION.md",
        "# Constitution\n\n- [ ] Never commit secrets\n- [ ] All tests pass before merge\n",
    );
    write(
        d,
        "TASKS.md",
        "# Tasks\n\n## Phase 1\n\n- [ ] Implement cache eviction policy\n- [ ] Add eviction metrics\n- [x] Set up CI\n",
    );
    write(
        d,
        "CONVENTIONS.md",
        "# Conventions\n\n- Errors use thiserror\n- Logging uses tracing\n",
    );

    let filler = "Details that make this entry long enough to matter. ".repeat(12);
    write(
        d,
        "DECISIONS.md",
        &format!(
            "# Decisions\n\n\
             ## [2026-02-18-100000] LRU cache eviction\n\n**Decision**: LRU policy.\n{filler}\n\n\
             ## [2025-06-01-100000] Logging format\n\n**Decision**: JSON lines.\n{filler}\n\n\
             ## [2025-05-01-100000] Eviction by TTL\n\n~~Superseded by [2026-02-18-100000]~~\n{filler}\n"
        ),
    );
    write(
        d,
        "LEARNINGS.md",
        &format!(
            "# Learnings\n\n\
             ## [2026-02-17-090000] Eviction races\n\nCache eviction must hold the lock.\n{filler}\n\n\
             ## [2025-01-01-090000] Windows paths\n\nUse PathBuf.\n{filler}\n"
        ),
    );
    write(d, "GLOSSARY.md", "# Glossary\n\n- **TTL**: time to live\n");
    tmp
}

fn assemble(dir: &Path, budget: usize) -> ctxpack_agent::AssembledPacket {
    let config = AppConfig::default();
    let input = ContextDir::load(dir).unwrap().packet_input();
    PacketAssembler::new(config.packet, &config.scoring).assemble(&input, budget, now())
}

// ── Scenarios ────────────────────────────────────────────────────────────

#[test]
fn e2e_generous_budget_includes_everything_live() {
    let tmp = project();
    let pkt = assemble(tmp.path(), 8000);

    assert_eq!(pkt.read_order.len(), 6);
    assert!(pkt.read_order[0].ends_with("CONSTITUTION.md"));
    assert!(pkt.read_order[1].ends_with("TASKS.md"));
    assert!(pkt.read_order.last().unwrap().ends_with("GLOSSARY.md"));

    assert_eq!(pkt.constitution.len(), 2);
    assert_eq!(pkt.tasks.len(), 2);
    assert_eq!(pkt.conventions.len(), 2);
    assert_eq!(pkt.decisions.len(), 2);
    assert_eq!(pkt.learnings.len(), 2);
    assert!(pkt.summaries.is_empty());
    assert!(pkt.decisions.iter().all(|d| !d.contains("Eviction by TTL")));
    assert!(pkt.tokens_used <= pkt.budget);
}

#[test]
fn e2e_relevant_recent_entries_rank_first() {
    let tmp = project();
    let pkt = assemble(tmp.path(), 8000);
    assert!(pkt.decisions[0].contains("LRU cache eviction"));
    assert!(pkt.learnings[0].contains("Eviction races"));
}

#[test]
fn e2e_tight_budget_degrades_to_titles() {
    let tmp = project();
    let pkt = assemble(tmp.path(), 450);

    assert_eq!(pkt.tasks.len(), 2);
    assert!(!pkt.summaries.is_empty());
    assert!(!pkt.summaries.iter().any(|s| s == "Eviction by TTL"));
    let listed = pkt.decisions.len() + pkt.learnings.len() + pkt.summaries.len();
    assert_eq!(listed, 4);
}

#[test]
fn e2e_tiny_budget_keeps_only_foundation() {
    let tmp = project();
    let pkt = assemble(tmp.path(), 50);
    assert_eq!(pkt.constitution.len(), 2);
    assert!(pkt.tasks.is_empty());
    assert!(pkt.decisions.is_empty());
    assert!(pkt.summaries.is_empty());
    assert!(pkt.tokens_used > pkt.budget);
}

#[test]
fn e2e_markdown_rendering() {
    let tmp = project();
    let md = render_markdown(&assemble(tmp.path(), 8000), now());

    assert!(md.starts_with("# Context Packet\n"));
    assert!(md.contains("Budget: 8000 tokens"));
    assert!(md.contains("## Constitution (NEVER VIOLATE)\n- Never commit secrets\n"));
    assert!(md.contains("## Current Tasks\n- [ ] Implement cache eviction policy\n"));
    assert!(md.contains("## Key Conventions\n- Errors use thiserror\n"));
    assert!(md.contains("## Recent Decisions\n## [2026-02-18-100000] LRU cache eviction"));
    assert!(md.contains("## Key Learnings\n"));
    assert!(!md.contains("## Also Noted"));
    assert!(md.trim_end().ends_with("following project conventions.\""));
}

#[test]
fn e2e_json_rendering() {
    let tmp = project();
    let out = render(&assemble(tmp.path(), 450), OutputFormat::Json, now()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(value["generated"], "2026-02-19T12:00:00Z");
    assert_eq!(value["budget"], 450);
    assert_eq!(value["constitution"].as_array().unwrap().len(), 2);
    assert!(!value["summaries"].as_array().unwrap().is_empty());
}

#[test]
fn e2e_missing_knowledge_files_are_not_errors() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "TASKS.md", "- [ ] Only tasks here\n");
    let pkt = assemble(tmp.path(), 8000);
    assert_eq!(pkt.read_order.len(), 1);
    assert!(pkt.constitution.is_empty());
    assert_eq!(pkt.tasks, vec!["- [ ] Only tasks here"]);
    assert!(pkt.decisions.is_empty() && pkt.learnings.is_empty());
}

#[test]
fn e2e_config_file_drives_assembly() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("config.toml");
    write(
        tmp.path(),
        "config.toml",
        "token_budget = 1234\n\n[packet]\ninstruction = \"Say you read it.\"\n",
    );
    let config = AppConfig::load_from(&config_path).unwrap();
    assert_eq!(config.token_budget, 1234);

    let project = project();
    let input = ContextDir::load(project.path()).unwrap().packet_input();
    let pkt = PacketAssembler::new(config.packet, &config.scoring).assemble(
        &input,
        config.token_budget,
        now(),
    );
    assert_eq!(pkt.instruction, "Say you read it.");
    assert_eq!(pkt.budget, 1234);
}

#[test]
fn e2e_assembly_is_repeatable() {
    let tmp = project();
    let a = render_markdown(&assemble(tmp.path(), 700), now());
    let b = render_markdown(&assemble(tmp.path(), 700), now());
    assert_eq!(a, b);
}

#[test]
fn e2e_tier_breakdown_accounts_for_every_token() {
    let tmp = project();
    for budget in [50, 450, 8000] {
        let pkt = assemble(tmp.path(), budget);
        let per_tier: usize = pkt.tiers.iter().map(|t| t.tokens).sum();
        assert_eq!(per_tier, pkt.tokens_used, "budget {budget}");

        let report = ctxpack_agent::render_tier_report(&pkt);
        assert!(report.contains(&format!("Used: ~{}", pkt.tokens_used)));
        for tier in &pkt.tiers {
            assert!(report.contains(&tier.name));
        }
    }
}

#[test]
fn e2e_low_stale_score_keeps_old_live_entries() {
    let tmp = project();
    let cfg_path = tmp.path().join("config.toml");
    write(tmp.path(), "config.toml", "[scoring]\nstale_score = 0.05\n");
    let config = AppConfig::load_from(&cfg_path).unwrap();

    let input = ContextDir::load(tmp.path()).unwrap().packet_input();
    let pkt = PacketAssembler::new(config.packet, &config.scoring).assemble(&input, 8000, now());
    assert!(pkt.decisions.iter().any(|d| d.contains("Logging format")));
    assert!(pkt.learnings.iter().any(|l| l.contains("Windows paths")));
}
