//! `ctxpack status`: Show context files and their token cost.

use anyhow::Context;
use ctxpack_memory::{ContextDir, ContextFile, loader, parser};
use std::path::PathBuf;

pub fn run(dir: Option<PathBuf>) -> anyhow::Result<()> {
    let config = super::load_config().context("Failed to load config")?;
    let dir = dir.unwrap_or_else(|| PathBuf::from(&config.context_dir));
    let ctx = ContextDir::load(&dir)
        .with_context(|| format!("Failed to load context from {}", dir.display()))?;

    print!("{}", render_status(&ctx, config.token_budget));
    Ok(())
}

/// Human-readable status report.
pub fn render_status(ctx: &ContextDir, budget: usize) -> String {
    let mut out = String::new();
    out.push_str("ctxpack Status\n");
    out.push_str("==============\n");
    out.push_str(&format!("  Context dir:  {}\n", ctx.dir().display()));
    out.push_str(&format!("  Files:        {}\n", ctx.files().len()));
    out.push_str(&format!("  Tokens:       ~{}\n", ctx.total_tokens()));
    out.push_str(&format!("  Budget:       {budget}\n\n"));

    for file in ctx.files() {
        out.push_str(&format!(
            "  {:<20} {:>7} tokens  {}\n",
            file.name,
            file.tokens,
            summarize(file)
        ));
    }

    if ctx.total_tokens() > budget {
        out.push_str("\n  ⚠️  Context exceeds the token budget; packets will be trimmed\n");
    }
    out
}

fn summarize(file: &ContextFile) -> String {
    if file.is_empty() {
        return "empty".into();
    }
    match file.name.as_str() {
        loader::TASKS => {
            let active = parser::active_tasks(&file.content).len();
            let done = file
                .content
                .lines()
                .filter(|l| {
                    let l = l.trim();
                    l.starts_with("- [x]") || l.starts_with("- [X]")
                })
                .count();
            format!("{active} active, {done} completed")
        }
        loader::CONSTITUTION => plural(parser::constitution_rules(&file.content).len(), "rule"),
        loader::CONVENTIONS => plural(parser::bullet_items(&file.content).len(), "convention"),
        loader::DECISIONS => entry_summary(file, "decision"),
        loader::LEARNINGS => entry_summary(file, "learning"),
        _ => "loaded".into(),
    }
}

fn entry_summary(file: &ContextFile, noun: &str) -> String {
    let entries = parser::parse_entry_blocks(&file.content);
    let superseded = entries.iter().filter(|e| e.is_superseded()).count();
    let summary = plural(entries.len(), noun);
    if superseded > 0 {
        format!("{summary} ({superseded} superseded)")
    } else {
        summary
    }
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}
