//! Packet assembly pipeline: the core architectural component.
//!
//! Builds a context packet from five budget tiers, filled strictly in order:
//!
//! 1. **Tier 1** (read order, constitution, instruction): always included
//! 2. **Tier 2** (active tasks): capped at `task_pct` of the budget
//! 3. **Tier 3** (conventions): capped at `convention_pct` of the budget
//! 4. **Tiers 4+5** (decisions, learnings): share whatever remains, scored
//!    and degraded to title-only summaries under pressure
//!
//! Each tier runs only while budget remains. Tier caps are percentages of
//! the *original* budget, never of the remainder.
//!
//! # Determinism
//!
//! Assembly is deterministic: identical inputs and an identical `now`
//! always produce identical packets. The reference time is a parameter,
//! never read from the clock here.

use super::budget::{fill_section, fit_items_in_budget, percent_of, split_budget};
use super::keywords::KeywordExtractor;
use super::scoring::EntryScorer;
use super::token;
use chrono::{DateTime, Utc};
use ctxpack_config::{PacketConfig, ScoringConfig};
use ctxpack_core::KnowledgeEntry;
use serde::Serialize;
use tracing::debug;

// ── Types ─────────────────────────────────────────────────────────────────

/// All inputs required by the assembler for a single packet.
///
/// Produced by the loader; missing sources are simply empty.
#[derive(Debug, Clone, Default)]
pub struct PacketInput {
    /// File paths in recommended reading order.
    pub read_order: Vec<String>,
    /// Constitution rules, always included.
    pub constitution: Vec<String>,
    /// Active (unchecked) tasks, in file order.
    pub tasks: Vec<String>,
    /// Convention bullets, in file order.
    pub conventions: Vec<String>,
    /// Decision entries, in file order.
    pub decisions: Vec<KnowledgeEntry>,
    /// Learning entries, in file order.
    pub learnings: Vec<KnowledgeEntry>,
}

/// The budget-aware packet, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssembledPacket {
    /// File paths in recommended reading order.
    pub read_order: Vec<String>,
    /// Constitution rules (always included).
    pub constitution: Vec<String>,
    /// Active tasks (budget-capped).
    pub tasks: Vec<String>,
    /// Convention items (budget-capped).
    pub conventions: Vec<String>,
    /// Full decision entries (scored, budget-fitted).
    pub decisions: Vec<String>,
    /// Full learning entries (scored, budget-fitted).
    pub learnings: Vec<String>,
    /// Titles of entries that did not fit in full, decisions first.
    pub summaries: Vec<String>,
    /// Behavioral instruction for the agent.
    pub instruction: String,
    /// Requested token budget.
    pub budget: usize,
    /// Estimated tokens of everything emitted.
    pub tokens_used: usize,
    /// Per-tier accounting, in pipeline order.
    pub tiers: Vec<TierStats>,
}

/// Token accounting for a single tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierStats {
    /// Tier name.
    pub name: String,
    /// Estimated tokens emitted by this tier.
    pub tokens: usize,
    /// Items emitted (full or summarized).
    pub items_included: usize,
    /// Items available before selection.
    pub items_total: usize,
}

impl TierStats {
    fn new(name: &str, tokens: usize, items_included: usize, items_total: usize) -> Self {
        Self {
            name: name.into(),
            tokens,
            items_included,
            items_total,
        }
    }
}

// ── Assembler ─────────────────────────────────────────────────────────────

/// The packet assembler. Stateless; create one and reuse it.
#[derive(Debug, Clone)]
pub struct PacketAssembler {
    config: PacketConfig,
    scorer: EntryScorer,
    extractor: KeywordExtractor,
}

impl PacketAssembler {
    /// Create an assembler from tier and scoring configuration.
    pub fn new(config: PacketConfig, scoring: &ScoringConfig) -> Self {
        Self {
            config,
            scorer: EntryScorer::new(scoring),
            extractor: KeywordExtractor::new(scoring),
        }
    }

    /// Create an assembler with the default configuration.
    pub fn with_defaults() -> Self {
        Self::new(PacketConfig::default(), &ScoringConfig::default())
    }

    /// Assemble a packet within `budget` tokens.
    ///
    /// # Algorithm
    ///
    /// 1. Tier 1 is always emitted; stop if it already consumes the budget
    /// 2. Tasks, then conventions, each fitted in order to their own cap;
    ///    stop as soon as the remaining budget is exhausted
    /// 3. Score decisions and learnings against keywords from the selected
    ///    tasks, split the remainder between them, and fill each section
    /// 4. Report the ground-truth token cost of everything emitted
    pub fn assemble(
        &self,
        input: &PacketInput,
        budget: usize,
        now: DateTime<Utc>,
    ) -> AssembledPacket {
        let mut pkt = AssembledPacket {
            read_order: input.read_order.clone(),
            constitution: input.constitution.clone(),
            tasks: Vec::new(),
            conventions: Vec::new(),
            decisions: Vec::new(),
            learnings: Vec::new(),
            summaries: Vec::new(),
            instruction: self.config.instruction.clone(),
            budget,
            tokens_used: 0,
            tiers: Vec::new(),
        };

        // ── Tier 1: read order, constitution, instruction ─────────────────
        let tier1_tokens = token::estimate_slice_tokens(&pkt.read_order)
            + token::estimate_slice_tokens(&pkt.constitution)
            + token::estimate_tokens(&pkt.instruction);
        let tier1_items = pkt.read_order.len() + pkt.constitution.len() + 1;
        pkt.tiers
            .push(TierStats::new("foundation", tier1_tokens, tier1_items, tier1_items));
        debug!(tokens = tier1_tokens, budget, "Tier 1 included");

        let Some(mut remaining) = budget.checked_sub(tier1_tokens).filter(|r| *r > 0) else {
            return self.finish(pkt);
        };

        // ── Tier 2: active tasks ──────────────────────────────────────────
        let task_cap = percent_of(budget, self.config.task_pct);
        pkt.tasks = fit_items_in_budget(&input.tasks, task_cap);
        let task_tokens = token::estimate_slice_tokens(&pkt.tasks);
        pkt.tiers.push(TierStats::new(
            "tasks",
            task_tokens,
            pkt.tasks.len(),
            input.tasks.len(),
        ));
        debug!(tokens = task_tokens, cap = task_cap, included = pkt.tasks.len(), "Tier 2 tasks");

        remaining = match remaining.checked_sub(task_tokens).filter(|r| *r > 0) {
            Some(r) => r,
            None => return self.finish(pkt),
        };

        // ── Tier 3: conventions ───────────────────────────────────────────
        let convention_cap = percent_of(budget, self.config.convention_pct);
        pkt.conventions = fit_items_in_budget(&input.conventions, convention_cap);
        let convention_tokens = token::estimate_slice_tokens(&pkt.conventions);
        pkt.tiers.push(TierStats::new(
            "conventions",
            convention_tokens,
            pkt.conventions.len(),
            input.conventions.len(),
        ));
        debug!(
            tokens = convention_tokens,
            cap = convention_cap,
            included = pkt.conventions.len(),
            "Tier 3 conventions"
        );

        remaining = match remaining.checked_sub(convention_tokens).filter(|r| *r > 0) {
            Some(r) => r,
            None => return self.finish(pkt),
        };

        // ── Tiers 4+5: decisions and learnings ────────────────────────────
        let keywords = self.extractor.extract(&pkt.tasks);
        let scored_decisions = self.scorer.score_entries(&input.decisions, &keywords, now);
        let scored_learnings = self.scorer.score_entries(&input.learnings, &keywords, now);

        let (decision_budget, learning_budget) = split_budget(
            remaining,
            &scored_decisions,
            &scored_learnings,
            self.config.split_floor_pct,
        );
        debug!(
            remaining,
            decision_budget,
            learning_budget,
            keywords = keywords.len(),
            "Split knowledge budget"
        );

        let full_pct = self.config.full_content_pct;
        let (decisions, decision_summaries) =
            fill_section(&scored_decisions, decision_budget, full_pct);
        let (learnings, learning_summaries) =
            fill_section(&scored_learnings, learning_budget, full_pct);

        pkt.tiers.push(TierStats::new(
            "decisions",
            token::estimate_slice_tokens(&decisions)
                + token::estimate_slice_tokens(&decision_summaries),
            decisions.len() + decision_summaries.len(),
            input.decisions.len(),
        ));
        pkt.tiers.push(TierStats::new(
            "learnings",
            token::estimate_slice_tokens(&learnings)
                + token::estimate_slice_tokens(&learning_summaries),
            learnings.len() + learning_summaries.len(),
            input.learnings.len(),
        ));

        pkt.decisions = decisions;
        pkt.learnings = learnings;
        pkt.summaries = decision_summaries;
        pkt.summaries.extend(learning_summaries);

        self.finish(pkt)
    }

    /// Recompute `tokens_used` from what was actually emitted.
    fn finish(&self, mut pkt: AssembledPacket) -> AssembledPacket {
        pkt.tokens_used = token::estimate_slice_tokens(&pkt.read_order)
            + token::estimate_slice_tokens(&pkt.constitution)
            + token::estimate_tokens(&pkt.instruction)
            + token::estimate_slice_tokens(&pkt.tasks)
            + token::estimate_slice_tokens(&pkt.conventions)
            + token::estimate_slice_tokens(&pkt.decisions)
            + token::estimate_slice_tokens(&pkt.learnings)
            + token::estimate_slice_tokens(&pkt.summaries);

        debug!(
            budget = pkt.budget,
            tokens_used = pkt.tokens_used,
            tiers = pkt.tiers.len(),
            summaries = pkt.summaries.len(),
            "Packet assembled"
        );
        pkt
    }
}

impl Default for PacketAssembler {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
