//! `ctxpack agent`: Print a budget-aware context packet.

use super::cooldown::Cooldown;
use anyhow::Context;
use chrono::{DateTime, Utc};
use ctxpack_agent::{AssembledPacket, OutputFormat, PacketAssembler, render, render_tier_report};
use ctxpack_config::AppConfig;
use ctxpack_memory::ContextDir;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub struct AgentArgs {
    pub budget: Option<usize>,
    pub format: OutputFormat,
    pub dir: Option<PathBuf>,
    pub session: Option<String>,
    pub cooldown: Option<u64>,
    pub explain: bool,
}

pub fn run(args: AgentArgs) -> anyhow::Result<()> {
    let config = super::load_config().context("Failed to load config")?;

    let window = Duration::from_secs(args.cooldown.unwrap_or(config.agent.cooldown_secs));
    let cooldown = args
        .session
        .as_deref()
        .and_then(|session| Cooldown::for_session(session, window));
    if let Some(cd) = &cooldown
        && cd.is_active()
    {
        debug!(path = %cd.path().display(), "Cooldown active, skipping packet");
        return Ok(());
    }

    let dir = args
        .dir
        .unwrap_or_else(|| PathBuf::from(&config.context_dir));
    let budget = args.budget.unwrap_or(config.token_budget);
    let now = Utc::now();

    let packet = assemble_packet(&config, &dir, budget, now)
        .with_context(|| format!("Failed to load context from {}", dir.display()))?;
    let output = render(&packet, args.format, now).context("Failed to render packet")?;
    print!("{output}");
    if args.explain {
        eprint!("{}", render_tier_report(&packet));
    }
    info!(dir = %dir.display(), budget, format = %args.format, "Context packet emitted");

    if let Some(cd) = &cooldown {
        cd.touch();
    }
    Ok(())
}

/// Load `dir` and assemble a packet within `budget`.
pub fn assemble_packet(
    config: &AppConfig,
    dir: &Path,
    budget: usize,
    now: DateTime<Utc>,
) -> ctxpack_core::Result<AssembledPacket> {
    let ctx = ContextDir::load(dir)?;

    let assembler = PacketAssembler::new(config.packet.clone(), &config.scoring);
    let packet = assembler.assemble(&ctx.packet_input(), budget, now);
    debug!(
        budget,
        tokens_used = packet.tokens_used,
        summaries = packet.summaries.len(),
        "Packet assembled from {}",
        dir.display()
    );
    Ok(packet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn context_dir() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let d = tmp.path();
        std::fs::write(d.join("CONSTITUTION.md"), "- [ ] Never skip tests\n").unwrap();
        std::fs::write(d.join("TASKS.md"), "- [ ] Wire the loader\n- [x] Done\n").unwrap();
        std::fs::write(
            d.join("DECISIONS.md"),
            "## [2026-02-18-100000] Loader reads markdown\n\nPlain files only.\n",
        )
        .unwrap();
        tmp
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 19, 12, 0, 0).unwrap()
    }

    fn build_packet(dir: &Path, format: OutputFormat) -> String {
        let pkt = assemble_packet(&AppConfig::default(), dir, 8000, now()).unwrap();
        render(&pkt, format, now()).unwrap()
    }

    #[test]
    fn builds_markdown_packet() {
        let tmp = context_dir();
        let out = build_packet(tmp.path(), OutputFormat::Markdown);
        assert!(out.starts_with("# Context Packet\n"));
        assert!(out.contains("- Never skip tests"));
        assert!(out.contains("- [ ] Wire the loader"));
        assert!(!out.contains("- [x]"));
        assert!(out.contains("## Recent Decisions"));
        assert!(out.contains("Loader reads markdown"));
    }

    #[test]
    fn builds_json_packet() {
        let tmp = context_dir();
        let out = build_packet(tmp.path(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["budget"], 8000);
        assert_eq!(value["tasks"][0], "- [ ] Wire the loader");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = assemble_packet(&AppConfig::default(), &tmp.path().join("missing"), 8000, now())
            .unwrap_err();
        assert!(matches!(
            err,
            ctxpack_core::Error::Load(ctxpack_core::LoadError::NotFound { .. })
        ));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn packet_reports_every_tier() {
        let tmp = context_dir();
        let pkt = assemble_packet(&AppConfig::default(), tmp.path(), 8000, now()).unwrap();
        let names: Vec<_> = pkt.tiers.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["foundation", "tasks", "conventions", "decisions", "learnings"]);

        let report = render_tier_report(&pkt);
        assert!(report.lines().any(|l| l.contains("tasks") && l.contains("1/1")));
        assert!(report.lines().any(|l| l.contains("decisions") && l.contains("1/1")));
    }
}
