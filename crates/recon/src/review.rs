use crate::approval::ApprovalDecision;
use crate::matcher::Matcher;
use crate::model::{MatchResult, ReviewRecord, ReviewStatus};
use crate::similarity::StringMetric;

/// Map a match result onto the records a review queue stores.
///
/// Matched transactions are `approved` (identity corrected from the order)
/// when the approval policy accepts the individual pair, `pending`
/// otherwise. Unmatched transactions are `rejected` with score 0.
pub fn build_review_records<M: StringMetric>(
    matcher: &Matcher<M>,
    result: &MatchResult,
) -> Vec<ReviewRecord> {
    let mut records = Vec::with_capacity(
        result.matched_transaction_count() + result.unmatched_transactions.len(),
    );

    for group in &result.matched {
        for txn in &group.transactions {
            let match_score = txn.match_score.unwrap_or(0);
            let (transaction, status) = match matcher.decide(&group.order, txn) {
                ApprovalDecision::AutoApprove(corrected) => (corrected, ReviewStatus::Approved),
                ApprovalDecision::ManualReview => (txn.clone(), ReviewStatus::Pending),
            };
            records.push(ReviewRecord {
                transaction,
                matched_order: Some(group.order.clone()),
                match_score,
                group_score: group.group_score,
                status,
            });
        }
    }

    for txn in &result.unmatched_transactions {
        records.push(ReviewRecord {
            transaction: txn.clone(),
            matched_order: None,
            match_score: 0,
            group_score: 0,
            status: ReviewStatus::Rejected,
        });
    }

    records
}
