use crate::model::{MatchResult, MatchSummary, ReviewRecord, ReviewStatus};

/// Compute summary statistics from a match result and its review records.
pub fn compute_summary(
    orders: usize,
    transactions: usize,
    result: &MatchResult,
    records: &[ReviewRecord],
) -> MatchSummary {
    let mut auto_approved = 0;
    let mut pending = 0;
    let mut rejected = 0;

    for r in records {
        match r.status {
            ReviewStatus::Approved => auto_approved += 1,
            ReviewStatus::Pending => pending += 1,
            ReviewStatus::Rejected => rejected += 1,
        }
    }

    let matched_transactions = result.matched_transaction_count();

    MatchSummary {
        orders,
        transactions,
        matched_groups: result.matched.len(),
        matched_transactions,
        unmatched_orders: result.unmatched_orders.len(),
        unmatched_transactions: result.unmatched_transactions.len(),
        auto_approved,
        pending,
        rejected,
        message: format!(
            "{matched_transactions} transactions saved to pending review, {} auto-rejected",
            result.unmatched_transactions.len()
        ),
    }
}
