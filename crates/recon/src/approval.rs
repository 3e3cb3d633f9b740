use crate::model::{Order, Transaction};
use crate::matcher::Matcher;
use crate::similarity::StringMetric;

/// Outcome of the approval policy for one matched pair.
#[derive(Debug, Clone, PartialEq)]
pub enum ApprovalDecision {
    /// Confident match; carries the transaction with its identity fields
    /// corrected from the order.
    AutoApprove(Transaction),
    ManualReview,
}

impl ApprovalDecision {
    pub fn is_auto_approve(&self) -> bool {
        matches!(self, Self::AutoApprove(_))
    }
}

impl<M: StringMetric> Matcher<M> {
    /// True when the pair's own total reaches the auto-approve threshold
    /// (76.5 with the defaults). Scored per pair, never from the group score.
    pub fn should_auto_approve(&self, order: &Order, txn: &Transaction) -> bool {
        self.score(order, txn).total >= self.config().auto_approve_threshold()
    }

    pub fn decide(&self, order: &Order, txn: &Transaction) -> ApprovalDecision {
        if self.should_auto_approve(order, txn) {
            ApprovalDecision::AutoApprove(auto_correct(order, txn))
        } else {
            ApprovalDecision::ManualReview
        }
    }
}

/// Copy of `txn` with `customer`, `order_id` and `item` taken from the order.
/// Date, price, type and amount are what the bank reported and stay as is.
pub fn auto_correct(order: &Order, txn: &Transaction) -> Transaction {
    Transaction {
        customer: order.customer.clone(),
        order_id: order.order_id.clone(),
        item: order.item.clone(),
        ..txn.clone()
    }
}

/// Approval check with the default configuration.
pub fn should_auto_approve(order: &Order, txn: &Transaction) -> bool {
    Matcher::default().should_auto_approve(order, txn)
}
