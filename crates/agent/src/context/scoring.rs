//! Entry scoring: recency plus keyword relevance.
//!
//! Each knowledge entry receives a combined score in `0.0..=2.0`:
//!
//! ```text
//! score = recency_score + relevance_score
//! ```
//!
//! Recency is a step function over the entry's age in days. Relevance is
//! the number of distinct task keywords found in the entry, normalized so
//! that `relevance_saturation` matches (3 by default) reach 1.0.
//! Superseded entries always score exactly 0.0.

use super::token;
use chrono::{DateTime, Utc};
use ctxpack_config::{RecencyBucket, ScoringConfig};
use ctxpack_core::KnowledgeEntry;
use serde::Serialize;

/// A knowledge entry with its score and precomputed token cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredEntry {
    pub entry: KnowledgeEntry,
    /// Combined score in `0.0..=2.0`; `0.0` only for superseded entries
    pub score: f64,
    /// Token estimate of the entry's full content
    pub tokens: usize,
}

impl ScoredEntry {
    /// Full entry text.
    pub fn content(&self) -> String {
        self.entry.content()
    }

    /// Entry title, used for title-only summaries.
    pub fn title(&self) -> &str {
        self.entry.title()
    }
}

/// Scores knowledge entries against a keyword set and a reference time.
#[derive(Debug, Clone)]
pub struct EntryScorer {
    buckets: Vec<RecencyBucket>,
    stale_score: f64,
    saturation: usize,
}

impl EntryScorer {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            buckets: config.recency_buckets.clone(),
            stale_score: config.stale_score,
            saturation: config.relevance_saturation.max(1),
        }
    }

    /// Step-function recency score. Unparsable dates get the stale score.
    pub fn recency_score(&self, entry: &KnowledgeEntry, now: DateTime<Utc>) -> f64 {
        let Some(date) = entry.date() else {
            return self.stale_score;
        };
        let age_days = (now.date_naive() - date).num_days();

        self.buckets
            .iter()
            .find(|b| age_days <= b.max_age_days)
            .map_or(self.stale_score, |b| b.score)
    }

    /// Fraction of saturating keyword matches, capped at 1.0.
    pub fn relevance_score<S: AsRef<str>>(&self, entry: &KnowledgeEntry, keywords: &[S]) -> f64 {
        if keywords.is_empty() {
            return 0.0;
        }
        let text = entry.content().to_lowercase();
        let mut matched: Vec<String> = Vec::new();
        for kw in keywords {
            let kw = kw.as_ref().to_lowercase();
            if !kw.is_empty() && !matched.contains(&kw) && text.contains(&kw) {
                matched.push(kw);
            }
        }
        (matched.len() as f64 / self.saturation as f64).min(1.0)
    }

    /// Combined score; superseded entries are forced to 0.0.
    pub fn score_entry<S: AsRef<str>>(
        &self,
        entry: &KnowledgeEntry,
        keywords: &[S],
        now: DateTime<Utc>,
    ) -> f64 {
        if entry.is_superseded() {
            return 0.0;
        }
        self.recency_score(entry, now) + self.relevance_score(entry, keywords)
    }

    /// Score every entry, attach token estimates, and sort by score
    /// descending. The sort is stable, so ties keep input order.
    pub fn score_entries<S: AsRef<str>>(
        &self,
        entries: &[KnowledgeEntry],
        keywords: &[S],
        now: DateTime<Utc>,
    ) -> Vec<ScoredEntry> {
        let mut scored: Vec<ScoredEntry> = entries
            .iter()
            .map(|entry| ScoredEntry {
                score: self.score_entry(entry, keywords, now),
                tokens: token::estimate_tokens(&entry.content()),
                entry: entry.clone(),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored
    }
}

impl Default for EntryScorer {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}
