//! Budget splitting and section filling.
//!
//! These are the selection primitives the assembler composes:
//! - [`fit_items_in_budget`]: strict in-order fill for flat string tiers
//! - [`split_budget`]: divide a pool between two scored sections
//! - [`fill_section`]: full bodies first, title-only summaries after

use super::scoring::ScoredEntry;
use super::token;

/// Include items in order while the running total stays within `budget`.
///
/// Stops at the first item that would exceed the budget; later, smaller
/// items are not considered. If nothing fits but items exist, the first
/// item is included anyway.
pub fn fit_items_in_budget<S: AsRef<str>>(items: &[S], budget: usize) -> Vec<String> {
    let Some(first) = items.first() else {
        return Vec::new();
    };

    let mut used = 0;
    let mut result = Vec::new();
    for item in items {
        let item = item.as_ref();
        let tokens = token::estimate_tokens(item);
        if used + tokens > budget {
            break;
        }
        result.push(item.to_string());
        used += tokens;
    }

    if result.is_empty() {
        result.push(first.as_ref().to_string());
    }
    result
}

/// Divide `total` tokens between two scored sections.
///
/// - Both empty: `(0, 0)`.
/// - One empty: the other receives everything.
/// - Needs fit: the total is shared in proportion to need, so each side
///   receives at least what it needs.
/// - Oversubscribed: each side gets `floor_pct` of the total; the rest is
///   shared in proportion to need.
///
/// Except for the both-empty case, the two budgets always sum to `total`.
pub fn split_budget(
    total: usize,
    a: &[ScoredEntry],
    b: &[ScoredEntry],
    floor_pct: u32,
) -> (usize, usize) {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return (0, 0),
        (true, false) => return (0, total),
        (false, true) => return (total, 0),
        (false, false) => {}
    }

    let a_need = token::total_entry_tokens(a);
    let b_need = token::total_entry_tokens(b);
    let combined = a_need + b_need;

    if combined == 0 {
        return (total / 2, total - total / 2);
    }

    if combined <= total {
        let a_share = proportion(total, a_need, combined);
        return (a_share, total - a_share);
    }

    let floor = percent_of(total, floor_pct.min(50));
    let flex = total - 2 * floor;
    let a_share = floor + proportion(flex, a_need, combined);
    (a_share, total - a_share)
}

/// Select full entries and title-only summaries for one section.
///
/// `full_pct` of the section budget is available for full bodies; the
/// remainder is headroom for the summaries. Entries scoring exactly 0.0
/// (superseded) are dropped entirely.
pub fn fill_section(
    entries: &[ScoredEntry],
    budget: usize,
    full_pct: u32,
) -> (Vec<String>, Vec<String>) {
    if entries.is_empty() || budget == 0 {
        return (Vec::new(), Vec::new());
    }

    let full_budget = percent_of(budget, full_pct);
    let mut used = 0;
    let mut full = Vec::new();
    let mut summaries = Vec::new();

    for entry in entries {
        if entry.score == 0.0 {
            continue;
        }
        if used + entry.tokens <= full_budget {
            full.push(entry.content());
            used += entry.tokens;
        } else {
            summaries.push(entry.title().to_string());
        }
    }

    (full, summaries)
}

/// `pct` percent of `value`, rounded down.
pub(crate) fn percent_of(value: usize, pct: u32) -> usize {
    (value as u128 * pct as u128 / 100) as usize
}

/// `value * part / whole`, rounded down, without intermediate overflow.
fn proportion(value: usize, part: usize, whole: usize) -> usize {
    (value as u128 * part as u128 / whole as u128) as usize
}
