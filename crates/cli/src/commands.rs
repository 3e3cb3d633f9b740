//! `ordermatch run | validate | score | config check`.

use std::path::{Path, PathBuf};

use ordermatch_recon::engine::{
    load_orders_csv, load_transactions_csv, parse_input_json, parse_orders_json,
    parse_transactions_json,
};
use ordermatch_recon::{
    validate_input_data, ApprovalDecision, MatchInput, MatchReport, Matcher, MatcherConfig, Order,
    Transaction,
};
use serde_json::json;

use crate::exit_codes::{EXIT_INVALID_INPUT, EXIT_UNMATCHED};
use crate::{CliError, InputArgs};

// ============================================================================
// run
// ============================================================================

pub fn cmd_run(
    input: InputArgs,
    config_path: Option<PathBuf>,
    json_output: bool,
    output_file: Option<PathBuf>,
    strict: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path.as_deref())?;
    let input = load_input(&input)?;

    let report = ordermatch_recon::run(&config, &input)?;

    let json_str = serde_json::to_string_pretty(&report)
        .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::runtime(format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    print_summary(&report);

    let s = &report.summary;
    if strict && (s.unmatched_orders > 0 || s.unmatched_transactions > 0) {
        return Err(CliError::new(
            EXIT_UNMATCHED,
            format!(
                "{} unmatched order(s), {} unmatched transaction(s)",
                s.unmatched_orders, s.unmatched_transactions
            ),
        ));
    }

    Ok(())
}

/// Human summary to stderr.
fn print_summary(report: &MatchReport) {
    let s = &report.summary;
    eprintln!(
        "matched {} of {} transaction(s) into {} group(s) ({}, threshold {})",
        s.matched_transactions,
        s.transactions,
        s.matched_groups,
        report.meta.strategy,
        report.meta.match_threshold,
    );
    for group in &report.result.matched {
        eprintln!(
            "  {:<12} {:>3}  {} transaction(s)",
            group.order.order_id,
            group.group_score,
            group.transactions.len(),
        );
    }
    eprintln!(
        "unmatched: {} order(s), {} transaction(s)",
        s.unmatched_orders, s.unmatched_transactions,
    );
    eprintln!(
        "review: {} auto-approved, {} pending, {} rejected",
        s.auto_approved, s.pending, s.rejected,
    );
    eprintln!("{}", s.message);
}

// ============================================================================
// validate
// ============================================================================

pub fn cmd_validate(input: InputArgs) -> Result<(), CliError> {
    let input = load_input(&input)?;
    validate_input_data(&input.orders, &input.transactions)?;
    eprintln!(
        "valid: {} order(s), {} transaction(s)",
        input.orders.len(),
        input.transactions.len(),
    );
    Ok(())
}

// ============================================================================
// score
// ============================================================================

pub fn cmd_score(
    order_json: String,
    txn_json: String,
    config_path: Option<PathBuf>,
    json_output: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path.as_deref())?;
    let order: Order = serde_json::from_str(&order_json)
        .map_err(|e| CliError::new(EXIT_INVALID_INPUT, format!("invalid --order: {e}")))?;
    let txn: Transaction = serde_json::from_str(&txn_json)
        .map_err(|e| CliError::new(EXIT_INVALID_INPUT, format!("invalid --transaction: {e}")))?;

    let matcher = Matcher::new(config);
    let score = matcher.score(&order, &txn);
    let is_match = score.total >= matcher.config().match_threshold;
    let decision = matcher.decide(&order, &txn);

    if json_output {
        let corrected = match &decision {
            ApprovalDecision::AutoApprove(t) => Some(t),
            ApprovalDecision::ManualReview => None,
        };
        let out = json!({
            "score": score,
            "matchScore": score.rounded(),
            "isMatch": is_match,
            "decision": if decision.is_auto_approve() { "auto_approve" } else { "manual_review" },
            "corrected": corrected,
        });
        let json_str = serde_json::to_string_pretty(&out)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
        return Ok(());
    }

    let config = matcher.config();
    println!("customer  {:>7.2}", score.customer);
    println!("order_id  {:>7.2}", score.order_id);
    println!("item      {:>7.2}", score.item);
    println!("price     {:>7.2}", score.price);
    println!("date      {:>7.2}", score.date);
    println!("core      {:>7.2}", score.core);
    println!("total     {:>7.2}  (matchScore {})", score.total, score.rounded());
    println!(
        "match:    {} (threshold {})",
        if is_match { "yes" } else { "no" },
        config.match_threshold,
    );
    println!(
        "decision: {} (threshold {:.2})",
        if decision.is_auto_approve() { "auto-approve" } else { "manual review" },
        config.auto_approve_threshold(),
    );
    Ok(())
}

// ============================================================================
// config check
// ============================================================================

pub fn cmd_config_check(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(Some(&config_path))?;
    eprintln!(
        "valid: strategy {}, match_threshold {}, auto-approve at {:.2}, max total {:.2}",
        config.strategy,
        config.match_threshold,
        config.auto_approve_threshold(),
        config.max_total(),
    );
    Ok(())
}

// ============================================================================
// Loading
// ============================================================================

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path)
        .map_err(|e| CliError::runtime(format!("cannot read {}: {e}", path.display())))
}

fn load_config(path: Option<&Path>) -> Result<MatcherConfig, CliError> {
    match path {
        Some(path) => {
            let text = read_file(path)?;
            let config = MatcherConfig::from_toml(&text)?;
            log::info!("loaded matcher config from {}", path.display());
            Ok(config)
        }
        None => Ok(MatcherConfig::default()),
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn load_input(args: &InputArgs) -> Result<MatchInput, CliError> {
    if let Some(ref path) = args.input {
        return Ok(parse_input_json(&read_file(path)?)?);
    }

    if args.orders.is_none() && args.transactions.is_none() {
        return Err(CliError::usage("no input given")
            .with_hint("pass a request document, or --orders and/or --transactions"));
    }

    let orders = match args.orders {
        Some(ref path) if is_csv(path) => load_orders_csv(&read_file(path)?)?,
        Some(ref path) => parse_orders_json(&read_file(path)?)?,
        None => Vec::new(),
    };
    let transactions = match args.transactions {
        Some(ref path) if is_csv(path) => load_transactions_csv(&read_file(path)?)?,
        Some(ref path) => parse_transactions_json(&read_file(path)?)?,
        None => Vec::new(),
    };

    Ok(MatchInput { orders, transactions })
}
