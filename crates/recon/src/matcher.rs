use crate::config::{MatchStrategy, MatcherConfig};
use crate::error::MatchError;
use crate::model::{MatchGroup, MatchResult, Order, PairScore, Transaction};
use crate::score::score_pair;
use crate::similarity::{IndelMetric, StringMetric};
use crate::validate::validate_input_data;

/// A transaction an order may claim, with its score against that order.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub txn_index: usize,
    pub score: PairScore,
}

/// Scores pairs and assigns transactions to orders.
///
/// Holds no state between calls; one `Matcher` can serve any number of
/// independent runs.
#[derive(Debug, Clone)]
pub struct Matcher<M = IndelMetric> {
    config: MatcherConfig,
    metric: M,
}

impl Matcher<IndelMetric> {
    pub fn new(config: MatcherConfig) -> Self {
        Self::with_metric(config, IndelMetric)
    }
}

impl Default for Matcher<IndelMetric> {
    fn default() -> Self {
        Self::new(MatcherConfig::default())
    }
}

impl<M: StringMetric> Matcher<M> {
    pub fn with_metric(config: MatcherConfig, metric: M) -> Self {
        Self { config, metric }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn score(&self, order: &Order, txn: &Transaction) -> PairScore {
        score_pair(&self.config, &self.metric, order, txn)
    }

    /// Validate, then partition transactions into per-order groups and
    /// leftovers.
    pub fn match_orders(
        &self,
        orders: &[Order],
        transactions: &[Transaction],
    ) -> Result<MatchResult, MatchError> {
        validate_input_data(orders, transactions)?;

        let assignments = match self.config.strategy {
            MatchStrategy::GreedyInOrder => self.assign_greedy_in_order(orders, transactions),
            MatchStrategy::BestScore => self.assign_best_score(orders, transactions),
        };

        Ok(build_result(orders, transactions, assignments))
    }

    /// Per order, in input order: every unclaimed transaction at or above the
    /// threshold is claimed, best first. Earlier orders win conflicts.
    fn assign_greedy_in_order(
        &self,
        orders: &[Order],
        transactions: &[Transaction],
    ) -> Vec<Vec<Candidate>> {
        let mut claimed = vec![false; transactions.len()];
        let mut assignments = Vec::with_capacity(orders.len());

        for order in orders {
            let mut candidates = Vec::new();
            for (ti, txn) in transactions.iter().enumerate() {
                if claimed[ti] {
                    continue;
                }
                let score = self.score(order, txn);
                if score.total >= self.config.match_threshold {
                    candidates.push(Candidate { txn_index: ti, score });
                }
            }

            sort_candidates(&mut candidates);
            for c in &candidates {
                claimed[c.txn_index] = true;
            }
            assignments.push(candidates);
        }

        assignments
    }

    /// Each transaction goes to the order it scores highest against; ties go
    /// to the earlier order. Orders have no claim cap, so this maximizes the
    /// summed score over all assignments.
    fn assign_best_score(
        &self,
        orders: &[Order],
        transactions: &[Transaction],
    ) -> Vec<Vec<Candidate>> {
        let mut best: Vec<Option<(usize, PairScore)>> = vec![None; transactions.len()];

        for (oi, order) in orders.iter().enumerate() {
            for (ti, txn) in transactions.iter().enumerate() {
                let score = self.score(order, txn);
                if score.total < self.config.match_threshold {
                    continue;
                }
                match best[ti] {
                    Some((_, current)) if current.total >= score.total => {}
                    _ => best[ti] = Some((oi, score)),
                }
            }
        }

        let mut assignments: Vec<Vec<Candidate>> = vec![Vec::new(); orders.len()];
        for (ti, slot) in best.into_iter().enumerate() {
            if let Some((oi, score)) = slot {
                assignments[oi].push(Candidate { txn_index: ti, score });
            }
        }
        for candidates in &mut assignments {
            sort_candidates(candidates);
        }

        assignments
    }
}

/// Descending total; stable, so equal scores keep input order.
fn sort_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| b.score.total.total_cmp(&a.score.total));
}

/// Turn per-order candidate lists into groups plus unmatched leftovers.
fn build_result(
    orders: &[Order],
    transactions: &[Transaction],
    assignments: Vec<Vec<Candidate>>,
) -> MatchResult {
    let mut matched = Vec::new();
    let mut order_matched = vec![false; orders.len()];
    let mut txn_claimed = vec![false; transactions.len()];

    for (oi, candidates) in assignments.into_iter().enumerate() {
        let Some(top) = candidates.first() else {
            continue;
        };
        let group_score = top.score.rounded();

        let group_txns: Vec<Transaction> = candidates
            .iter()
            .map(|c| {
                txn_claimed[c.txn_index] = true;
                transactions[c.txn_index].with_match_score(c.score.rounded())
            })
            .collect();

        log::debug!(
            "order '{}' claimed {} transaction(s), group score {group_score}",
            orders[oi].order_id,
            group_txns.len()
        );

        order_matched[oi] = true;
        matched.push(MatchGroup {
            order: orders[oi].clone(),
            transactions: group_txns,
            group_score,
        });
    }

    let unmatched_orders = orders
        .iter()
        .zip(&order_matched)
        .filter(|(_, m)| !**m)
        .map(|(o, _)| o.clone())
        .collect();

    let unmatched_transactions = transactions
        .iter()
        .zip(&txn_claimed)
        .filter(|(_, c)| !**c)
        .map(|(t, _)| t.clone())
        .collect();

    MatchResult {
        matched,
        unmatched_orders,
        unmatched_transactions,
    }
}

/// Match with the default configuration.
pub fn match_orders(orders: &[Order], transactions: &[Transaction]) -> Result<MatchResult, MatchError> {
    Matcher::default().match_orders(orders, transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidInputKind;

    fn order(customer: &str, order_id: &str, item: &str, price: f64) -> Order {
        Order {
            customer: customer.into(),
            order_id: order_id.into(),
            date: "2024-01-01".into(),
            item: item.into(),
            price,
        }
    }

    fn txn(customer: &str, order_id: &str, item: &str, price: f64) -> Transaction {
        Transaction {
            customer: customer.into(),
            order_id: order_id.into(),
            date: "2024-01-05".into(),
            item: item.into(),
            price,
            txn_type: "payment".into(),
            txn_amount: price,
            match_score: None,
        }
    }

    #[test]
    fn one_order_claims_many() {
        let orders = vec![order("Brian Bell", "A100", "Widget", 10.0)];
        let txns = vec![
            txn("Brian Bell", "A100", "Widget", 5.0),
            txn("Bell Brian", "A100", "Widget", 10.0),
            txn("Zed", "XYZ999", "Other", 999.0),
        ];
        let result = match_orders(&orders, &txns).unwrap();
        assert_eq!(result.matched.len(), 1);
        let group = &result.matched[0];
        assert_eq!(group.transactions.len(), 2);
        // Exact price sorts first.
        assert_eq!(group.transactions[0].customer, "Bell Brian");
        assert_eq!(group.transactions[0].match_score, Some(100));
        assert_eq!(group.transactions[1].match_score, Some(90));
        assert_eq!(group.group_score, 100);
        assert_eq!(result.unmatched_transactions.len(), 1);
        assert_eq!(result.unmatched_transactions[0].order_id, "XYZ999");
        assert!(result.unmatched_orders.is_empty());
    }

    #[test]
    fn ties_keep_input_order() {
        let orders = vec![order("Brian Bell", "A100", "Widget", 10.0)];
        let mut first = txn("Brian Bell", "A100", "Widget", 10.0);
        first.txn_type = "first".into();
        let mut second = first.clone();
        second.txn_type = "second".into();
        let result = match_orders(&orders, &[first, second]).unwrap();
        let group = &result.matched[0];
        assert_eq!(group.transactions[0].txn_type, "first");
        assert_eq!(group.transactions[1].txn_type, "second");
    }

    #[test]
    fn earlier_order_wins_conflict() {
        let orders = vec![
            order("Brian Bell", "A1", "Widget", 10.0),
            order("Brian Bell", "A2", "Widget", 10.0),
        ];
        let txns = vec![txn("Brian Bell", "A3", "Widget", 10.0)];
        let result = match_orders(&orders, &txns).unwrap();
        assert_eq!(result.matched.len(), 1);
        assert_eq!(result.matched[0].order.order_id, "A1");
        assert_eq!(result.unmatched_orders.len(), 1);
        assert_eq!(result.unmatched_orders[0].order_id, "A2");
    }

    #[test]
    fn greedy_can_steal_a_better_fit() {
        // A1 qualifies for the A2 payment and, coming first, keeps it.
        let orders = vec![
            order("Brian Bell", "A1", "Widget", 10.0),
            order("Brian Bell", "A2", "Widget", 10.0),
        ];
        let txns = vec![txn("Brian Bell", "A2", "Widget", 10.0)];
        let result = match_orders(&orders, &txns).unwrap();
        assert_eq!(result.matched[0].order.order_id, "A1");
        assert_eq!(result.unmatched_orders[0].order_id, "A2");
    }

    #[test]
    fn best_score_assigns_to_strongest_order() {
        let config = MatcherConfig {
            strategy: MatchStrategy::BestScore,
            ..MatcherConfig::default()
        };
        let matcher = Matcher::new(config);
        let orders = vec![
            order("Brian Bell", "A1", "Widget", 10.0),
            order("Brian Bell", "A2", "Widget", 10.0),
        ];
        let txns = vec![txn("Brian Bell", "A2", "Widget", 10.0)];
        let result = matcher.match_orders(&orders, &txns).unwrap();
        assert_eq!(result.matched.len(), 1);
        assert_eq!(result.matched[0].order.order_id, "A2");
        assert_eq!(result.matched[0].group_score, 100);
        assert_eq!(result.unmatched_orders[0].order_id, "A1");
    }

    #[test]
    fn best_score_tie_goes_to_earlier_order() {
        let config = MatcherConfig {
            strategy: MatchStrategy::BestScore,
            ..MatcherConfig::default()
        };
        let orders = vec![
            order("Brian Bell", "A1", "Widget", 10.0),
            order("Brian Bell", "A2", "Widget", 10.0),
        ];
        let txns = vec![txn("Brian Bell", "A3", "Widget", 10.0)];
        let result = Matcher::new(config).match_orders(&orders, &txns).unwrap();
        assert_eq!(result.matched[0].order.order_id, "A1");
    }

    #[test]
    fn no_orders_leaves_everything_unmatched() {
        let txns = vec![txn("Brian Bell", "A1", "Widget", 10.0), txn("Amy", "B2", "Gadget", 5.0)];
        let result = match_orders(&[], &txns).unwrap();
        assert!(result.matched.is_empty());
        assert!(result.unmatched_orders.is_empty());
        assert_eq!(result.unmatched_transactions, txns);
    }

    #[test]
    fn unmatched_transactions_keep_input_order_and_no_score() {
        let orders = vec![order("Brian Bell", "A100", "Widget", 10.0)];
        let txns = vec![
            txn("Zed", "XYZ1", "Other", 1.0),
            txn("Brian Bell", "A100", "Widget", 10.0),
            txn("Quinn", "QQ9", "Thing", 2.0),
        ];
        let result = match_orders(&orders, &txns).unwrap();
        let ids: Vec<&str> = result
            .unmatched_transactions
            .iter()
            .map(|t| t.order_id.as_str())
            .collect();
        assert_eq!(ids, vec!["XYZ1", "QQ9"]);
        assert!(result.unmatched_transactions.iter().all(|t| t.match_score.is_none()));
    }

    #[test]
    fn duplicate_order_ids_each_classified_once() {
        let orders = vec![
            order("Brian Bell", "A100", "Widget", 10.0),
            order("Brian Bell", "A100", "Widget", 10.0),
        ];
        let txns = vec![txn("Brian Bell", "A100", "Widget", 10.0)];
        let result = match_orders(&orders, &txns).unwrap();
        assert_eq!(result.matched.len(), 1);
        assert_eq!(result.unmatched_orders.len(), 1);
    }

    #[test]
    fn validation_runs_first() {
        let err = match_orders(&[], &[]).unwrap_err();
        assert_eq!(err.kind(), Some(InvalidInputKind::EmptyInput));
    }

    #[test]
    fn raised_threshold_rejects_weaker_pairs() {
        let config = MatcherConfig {
            match_threshold: 96.0,
            ..MatcherConfig::default()
        };
        let orders = vec![order("Brian Bell", "A100", "Widget", 10.0)];
        let txns = vec![txn("Brian Bell", "A100", "Widget", 10.5)];
        let result = Matcher::new(config).match_orders(&orders, &txns).unwrap();
        assert!(result.matched.is_empty());
        assert_eq!(result.unmatched_orders.len(), 1);
    }
}
