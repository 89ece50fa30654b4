//! Budget-tiered context packet assembly.
//!
//! Builds a packet from project knowledge, filling five tiers in strict
//! priority order within a token budget.
//!
//! # Tiers (in priority order)
//!
//! | Tier | Source | Trim Strategy |
//! |------|--------|---------------|
//! | 1. Foundation | Read order, constitution, instruction | Never trimmed |
//! | 2. Tasks | Unchecked tasks | In order, capped at 40% |
//! | 3. Conventions | Convention bullets | In order, capped at 20% |
//! | 4. Decisions | Scored entries | Lowest score degraded to title |
//! | 5. Learnings | Scored entries | Lowest score degraded to title |

pub mod assembler;
pub mod budget;
pub mod keywords;
pub mod scoring;
pub mod token;

pub use assembler::{AssembledPacket, PacketAssembler, PacketInput, TierStats};
pub use budget::{fill_section, fit_items_in_budget, split_budget};
pub use keywords::KeywordExtractor;
pub use scoring::{EntryScorer, ScoredEntry};
pub use token::{estimate_slice_tokens, estimate_tokens};
