use crate::error::{MatchError, RecordList};
use crate::model::{Order, Transaction};

/// Structural checks run before any scoring. All-or-nothing: the first
/// failure is returned and nothing is scored.
pub fn validate_input_data(orders: &[Order], transactions: &[Transaction]) -> Result<(), MatchError> {
    if orders.is_empty() && transactions.is_empty() {
        return Err(MatchError::EmptyInput);
    }

    if let Some(index) = orders.iter().position(|o| o.order_id.is_empty()) {
        return Err(MatchError::MissingField {
            list: RecordList::Orders,
            index,
        });
    }

    if let Some(index) = transactions.iter().position(|t| t.order_id.is_empty()) {
        return Err(MatchError::MissingField {
            list: RecordList::Transactions,
            index,
        });
    }

    Ok(())
}
