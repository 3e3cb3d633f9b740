use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::config::{DateRule, MatcherConfig, PriceRule};
use crate::model::{Order, PairScore, Transaction};
use crate::similarity::StringMetric;

/// Score one (order, transaction) pair along all five dimensions.
pub fn score_pair<M: StringMetric>(
    config: &MatcherConfig,
    metric: &M,
    order: &Order,
    txn: &Transaction,
) -> PairScore {
    let w = &config.weights;
    let customer = metric.token_sort_ratio(&order.customer, &txn.customer) * w.customer;
    let order_id = metric.ratio(&order.order_id, &txn.order_id) * w.order_id;
    let item = metric.token_sort_ratio(&order.item, &txn.item) * w.item;
    let core = customer + order_id + item;

    let price = price_score(&config.price, order.price, txn.price);
    let date = date_score(&config.date, &order.date, &txn.date);

    PairScore {
        customer,
        order_id,
        item,
        price,
        date,
        core,
        total: core + price + date,
    }
}

/// Full points for an exact price, partial points within `near_ratio` of a
/// positive order price, nothing otherwise.
pub fn price_score(rule: &PriceRule, order_price: f64, txn_price: f64) -> f64 {
    let diff = (order_price - txn_price).abs();
    if diff == 0.0 {
        rule.exact_points
    } else if order_price > 0.0 && diff / order_price <= rule.near_ratio {
        rule.near_points
    } else {
        0.0
    }
}

/// Points for the transaction date relative to the order date.
///
/// Missing or unparsable dates get partial credit: both sides are typed by
/// hand and a bad date alone should not sink an otherwise good match.
pub fn date_score(rule: &DateRule, order_date: &str, txn_date: &str) -> f64 {
    let (Some(order), Some(txn)) = (parse_date(order_date), parse_date(txn_date)) else {
        return rule.partial_points;
    };

    let days = (txn - order).num_days();
    if (0..=rule.forward_window_days).contains(&days) {
        rule.on_time_points
    } else if days < 0 && -days <= rule.backward_grace_days {
        rule.partial_points
    } else {
        0.0
    }
}

/// Parse a calendar date from `YYYY-MM-DD`, an RFC 3339 timestamp, or a
/// naive `YYYY-MM-DDTHH:MM:SS` timestamp.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.date_naive());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|ts| ts.date())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::IndelMetric;

    fn order(customer: &str, order_id: &str, date: &str, item: &str, price: f64) -> Order {
        Order {
            customer: customer.into(),
            order_id: order_id.into(),
            date: date.into(),
            item: item.into(),
            price,
        }
    }

    fn txn(customer: &str, order_id: &str, date: &str, item: &str, price: f64) -> Transaction {
        Transaction {
            customer: customer.into(),
            order_id: order_id.into(),
            date: date.into(),
            item: item.into(),
            price,
            txn_type: "payment".into(),
            txn_amount: price,
            match_score: None,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn reordered_name_scores_full() {
        let config = MatcherConfig::default();
        let o = order("Brian Bell", "A100", "2024-01-01", "Widget", 10.0);
        let t = txn("Bell Brian", "A100", "2024-01-10", "Widget", 10.0);
        let s = score_pair(&config, &IndelMetric, &o, &t);
        assert!(close(s.customer, 30.0));
        assert!(close(s.order_id, 35.0));
        assert!(close(s.item, 20.0));
        assert!(close(s.core, 85.0));
        assert!(close(s.price, 10.0));
        assert!(close(s.date, 5.0));
        assert!(close(s.total, 100.0));
        assert_eq!(s.rounded(), 100);
    }

    #[test]
    fn unrelated_pair_scores_low() {
        let config = MatcherConfig::default();
        let o = order("Amy", "B200", "2024-02-01", "Gadget", 5.0);
        let t = txn("Zed", "XYZ999", "2024-02-01", "Other", 999.0);
        let s = score_pair(&config, &IndelMetric, &o, &t);
        assert!(s.total < config.match_threshold);
        assert!(close(s.customer, 0.0));
        assert!(close(s.order_id, 0.0));
        assert!(close(s.price, 0.0));
        assert!(close(s.date, 5.0));
    }

    #[test]
    fn price_steps() {
        let rule = PriceRule::default();
        assert_eq!(price_score(&rule, 10.0, 10.0), 10.0);
        assert_eq!(price_score(&rule, 10.0, 10.5), 5.0);
        assert_eq!(price_score(&rule, 10.0, 9.0), 5.0);
        assert_eq!(price_score(&rule, 10.0, 11.5), 0.0);
        // No relative credit without a positive order price.
        assert_eq!(price_score(&rule, 0.0, 0.5), 0.0);
        assert_eq!(price_score(&rule, 0.0, 0.0), 10.0);
    }

    #[test]
    fn date_rules() {
        let rule = DateRule::default();
        assert_eq!(date_score(&rule, "2024-01-01", "2024-01-01"), 5.0);
        assert_eq!(date_score(&rule, "2024-01-01", "2024-03-31"), 5.0); // day 90
        assert_eq!(date_score(&rule, "2024-01-01", "2024-04-01"), 0.0); // day 91
        assert_eq!(date_score(&rule, "2024-01-08", "2024-01-01"), 2.5); // 7 days early
        assert_eq!(date_score(&rule, "2024-01-09", "2024-01-01"), 0.0); // 8 days early
    }

    #[test]
    fn missing_or_bad_date_gets_partial_credit() {
        let rule = DateRule::default();
        assert_eq!(date_score(&rule, "", "2024-01-01"), 2.5);
        assert_eq!(date_score(&rule, "2024-01-01", ""), 2.5);
        assert_eq!(date_score(&rule, "2024-01-01", "not a date"), 2.5);
        assert_eq!(date_score(&rule, "2024-02-30", "2024-03-01"), 2.5);
    }

    #[test]
    fn parse_date_formats() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(parse_date("2024-01-10"), Some(d));
        assert_eq!(parse_date(" 2024-01-10 "), Some(d));
        assert_eq!(parse_date("2024-01-10T08:30:00Z"), Some(d));
        assert_eq!(parse_date("2024-01-10T08:30:00"), Some(d));
        assert_eq!(parse_date("01/10/2024"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn missing_date_with_exact_identity() {
        let config = MatcherConfig::default();
        let o = order("Brian Bell", "A100", "2024-01-01", "Widget", 10.0);
        let t = txn("Brian Bell", "A100", "", "Widget", 10.0);
        let s = score_pair(&config, &IndelMetric, &o, &t);
        assert!(close(s.total, 97.5));
        assert_eq!(s.rounded(), 98);
    }
}
