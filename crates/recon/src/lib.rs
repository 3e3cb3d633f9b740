//! `ordermatch-recon`: Fuzzy order/transaction matching engine.
//!
//! Pure engine crate: receives pre-loaded orders and transactions, returns
//! match groups, leftovers and review records. No CLI dependencies.

pub mod approval;
pub mod config;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod review;
pub mod score;
pub mod similarity;
pub mod summary;
pub mod validate;

pub use approval::{auto_correct, should_auto_approve, ApprovalDecision};
pub use config::{MatchStrategy, MatcherConfig};
pub use engine::run;
pub use error::{InvalidInputKind, MatchError, RecordList};
pub use matcher::{match_orders, Matcher};
pub use model::{
    MatchGroup, MatchInput, MatchReport, MatchResult, Order, PairScore, ReviewRecord, ReviewStatus,
    Transaction,
};
pub use similarity::{IndelMetric, StringMetric};
pub use validate::validate_input_data;
