use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::MatcherConfig;
use crate::error::{MatchError, RecordList};
use crate::matcher::Matcher;
use crate::model::{MatchInput, MatchMeta, MatchReport, Order, Transaction};
use crate::review::build_review_records;
use crate::summary::compute_summary;

/// Run matching per config. Returns the match result, review records and
/// summary.
pub fn run(config: &MatcherConfig, input: &MatchInput) -> Result<MatchReport, MatchError> {
    let matcher = Matcher::new(config.clone());
    let result = matcher.match_orders(&input.orders, &input.transactions)?;
    let reviews = build_review_records(&matcher, &result);
    let summary = compute_summary(input.orders.len(), input.transactions.len(), &result, &reviews);

    log::info!(
        "matched {} of {} transaction(s) into {} group(s); {} auto-approved, {} pending, {} rejected",
        summary.matched_transactions,
        summary.transactions,
        summary.matched_groups,
        summary.auto_approved,
        summary.pending,
        summary.rejected,
    );

    Ok(MatchReport {
        meta: MatchMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            strategy: config.strategy,
            match_threshold: config.match_threshold,
            auto_approve_threshold: config.auto_approve_threshold(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        result,
        reviews,
    })
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Parse a request body: `{ "orders": [...], "transactions": [...] }`.
pub fn parse_input_json(json: &str) -> Result<MatchInput, MatchError> {
    let doc: Value = serde_json::from_str(json).map_err(|e| MatchError::Io(e.to_string()))?;
    let Value::Object(body) = doc else {
        return Err(MatchError::Io("input must be a JSON object with orders and transactions".into()));
    };

    let orders_value = body.get("orders").unwrap_or(&Value::Null);
    let transactions_value = body.get("transactions").unwrap_or(&Value::Null);

    Ok(MatchInput {
        orders: records_from_value(RecordList::Orders, orders_value)?,
        transactions: records_from_value(RecordList::Transactions, transactions_value)?,
    })
}

/// Parse a bare JSON array of orders.
pub fn parse_orders_json(json: &str) -> Result<Vec<Order>, MatchError> {
    parse_records_json(RecordList::Orders, json)
}

/// Parse a bare JSON array of transactions.
pub fn parse_transactions_json(json: &str) -> Result<Vec<Transaction>, MatchError> {
    parse_records_json(RecordList::Transactions, json)
}

fn parse_records_json<T: DeserializeOwned>(list: RecordList, json: &str) -> Result<Vec<T>, MatchError> {
    let doc: Value = serde_json::from_str(json).map_err(|e| MatchError::Io(e.to_string()))?;
    records_from_value(list, &doc)
}

fn records_from_value<T: DeserializeOwned>(list: RecordList, value: &Value) -> Result<Vec<T>, MatchError> {
    let Value::Array(items) = value else {
        return Err(MatchError::InvalidInput { list });
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            T::deserialize(item).map_err(|e| MatchError::RecordParse {
                list,
                index,
                message: e.to_string(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Load orders from CSV with headers `customer,orderId,date,item,price`.
/// Absent columns and empty cells fall back to empty/zero.
pub fn load_orders_csv(csv_data: &str) -> Result<Vec<Order>, MatchError> {
    let table = CsvTable::read(RecordList::Orders, csv_data)?;
    let mut orders = Vec::with_capacity(table.rows.len());

    for index in 0..table.rows.len() {
        orders.push(Order {
            customer: table.text(index, "customer"),
            order_id: table.text(index, "orderId"),
            date: table.text(index, "date"),
            item: table.text(index, "item"),
            price: table.number(index, "price")?,
        });
    }

    Ok(orders)
}

/// Load transactions from CSV with headers
/// `customer,orderId,date,item,price,txnType,txnAmount`.
pub fn load_transactions_csv(csv_data: &str) -> Result<Vec<Transaction>, MatchError> {
    let table = CsvTable::read(RecordList::Transactions, csv_data)?;
    let mut transactions = Vec::with_capacity(table.rows.len());

    for index in 0..table.rows.len() {
        transactions.push(Transaction {
            customer: table.text(index, "customer"),
            order_id: table.text(index, "orderId"),
            date: table.text(index, "date"),
            item: table.text(index, "item"),
            price: table.number(index, "price")?,
            txn_type: table.text(index, "txnType"),
            txn_amount: table.number(index, "txnAmount")?,
            match_score: None,
        });
    }

    Ok(transactions)
}

struct CsvTable {
    list: RecordList,
    headers: Vec<String>,
    rows: Vec<csv::StringRecord>,
}

impl CsvTable {
    fn read(list: RecordList, csv_data: &str) -> Result<Self, MatchError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(csv_data.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| MatchError::Io(e.to_string()))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|e| MatchError::RecordParse {
                list,
                index,
                message: e.to_string(),
            })?;
            rows.push(record);
        }

        Ok(Self { list, headers, rows })
    }

    fn cell(&self, index: usize, column: &str) -> &str {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(column))
            .and_then(|col| self.rows[index].get(col))
            .unwrap_or("")
    }

    fn text(&self, index: usize, column: &str) -> String {
        self.cell(index, column).to_string()
    }

    fn number(&self, index: usize, column: &str) -> Result<f64, MatchError> {
        let value = self.cell(index, column);
        if value.is_empty() {
            return Ok(0.0);
        }
        value.parse().map_err(|_| MatchError::RecordParse {
            list: self.list,
            index,
            message: format!("cannot parse {column} '{value}'"),
        })
    }
}
