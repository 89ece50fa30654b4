//! Context packet assembly: the heart of ctxpack.
//!
//! Given a project's knowledge (constitution, tasks, conventions, decisions,
//! learnings) and a token budget, the assembler produces the packet an AI
//! agent should read before starting work:
//!
//! 1. **Estimate** the token cost of every candidate item
//! 2. **Extract keywords** from the active tasks
//! 3. **Score** decisions and learnings by recency and relevance
//! 4. **Fill** five priority tiers until the budget runs out
//! 5. **Render** the result as Markdown or JSON
//!
//! The engine performs no I/O and never reads the clock; callers pass the
//! reference time in.

pub mod context;
pub mod render;

pub use context::{
    AssembledPacket, EntryScorer, KeywordExtractor, PacketAssembler, PacketInput, ScoredEntry,
    TierStats, estimate_slice_tokens, estimate_tokens, fill_section, fit_items_in_budget,
    split_budget,
};
pub use render::{
    OutputFormat, PacketJson, render, render_json, render_markdown, render_tier_report,
};
