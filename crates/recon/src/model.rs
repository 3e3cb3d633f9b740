use serde::{Deserialize, Deserializer, Serialize};

use crate::config::MatchStrategy;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A purchase order as entered by hand. Immutable input to the matcher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, deserialize_with = "null_as_default")]
    pub customer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub item: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
}

/// A bank/payment transaction. `match_score` is only ever set on the
/// annotated copies the matcher emits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default, deserialize_with = "null_as_default")]
    pub customer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub item: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub txn_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub txn_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<u8>,
}

impl Transaction {
    /// Derived copy carrying the engine's score.
    pub fn with_match_score(&self, score: u8) -> Self {
        Self {
            match_score: Some(score),
            ..self.clone()
        }
    }
}

/// Treat an explicit JSON `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Both record lists, as handed to the engine.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchInput {
    pub orders: Vec<Order>,
    pub transactions: Vec<Transaction>,
}

// ---------------------------------------------------------------------------
// Pair scoring
// ---------------------------------------------------------------------------

/// Weighted similarity of one (order, transaction) pair.
///
/// Every component is already weighted, so `core` is the sum of the identity
/// components and `total` adds price and date on top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairScore {
    pub customer: f64,
    pub order_id: f64,
    pub item: f64,
    pub price: f64,
    pub date: f64,
    pub core: f64,
    pub total: f64,
}

impl PairScore {
    /// Score as stored on a transaction (`matchScore`).
    pub fn rounded(&self) -> u8 {
        self.total.round().clamp(0.0, 100.0) as u8
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One order and every transaction it claimed, best first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchGroup {
    pub order: Order,
    pub transactions: Vec<Transaction>,
    pub group_score: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub matched: Vec<MatchGroup>,
    pub unmatched_orders: Vec<Order>,
    pub unmatched_transactions: Vec<Transaction>,
}

impl MatchResult {
    pub fn matched_transaction_count(&self) -> usize {
        self.matched.iter().map(|g| g.transactions.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// Review records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// A transaction as a persistence layer would file it for review.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub transaction: Transaction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_order: Option<Order>,
    pub match_score: u8,
    pub group_score: u8,
    pub status: ReviewStatus,
}

// ---------------------------------------------------------------------------
// Summary + Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub orders: usize,
    pub transactions: usize,
    pub matched_groups: usize,
    pub matched_transactions: usize,
    pub unmatched_orders: usize,
    pub unmatched_transactions: usize,
    pub auto_approved: usize,
    pub pending: usize,
    pub rejected: usize,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchMeta {
    pub engine_version: String,
    pub strategy: MatchStrategy,
    pub match_threshold: f64,
    pub auto_approve_threshold: f64,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub meta: MatchMeta,
    pub summary: MatchSummary,
    pub result: MatchResult,
    pub reviews: Vec<ReviewRecord>,
}
