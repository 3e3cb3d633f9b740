use serde::{Deserialize, Serialize};

use crate::error::MatchError;

/// Scores at or above this are candidates for a match.
pub const MATCH_THRESHOLD: f64 = 60.0;

/// Fraction of the maximum core score a pair must reach to skip review.
pub const AUTO_APPROVE_RATIO: f64 = 0.9;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Matcher tuning. Every field has a default, so an empty TOML document
/// yields the legacy behavior.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MatcherConfig {
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f64,
    #[serde(default = "default_auto_approve_ratio")]
    pub auto_approve_ratio: f64,
    #[serde(default)]
    pub strategy: MatchStrategy,
    #[serde(default)]
    pub weights: IdentityWeights,
    #[serde(default)]
    pub price: PriceRule,
    #[serde(default)]
    pub date: DateRule,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            match_threshold: MATCH_THRESHOLD,
            auto_approve_ratio: AUTO_APPROVE_RATIO,
            strategy: MatchStrategy::default(),
            weights: IdentityWeights::default(),
            price: PriceRule::default(),
            date: DateRule::default(),
        }
    }
}

fn default_match_threshold() -> f64 {
    MATCH_THRESHOLD
}

fn default_auto_approve_ratio() -> f64 {
    AUTO_APPROVE_RATIO
}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// How transactions wanted by more than one order are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Orders claim in input order; the first qualifying order wins.
    #[default]
    GreedyInOrder,
    /// Each transaction goes to the order it scores highest against.
    BestScore,
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GreedyInOrder => write!(f, "greedy_in_order"),
            Self::BestScore => write!(f, "best_score"),
        }
    }
}

// ---------------------------------------------------------------------------
// Weights + Rules
// ---------------------------------------------------------------------------

/// Weights applied to the 0-100 identity similarities.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityWeights {
    pub customer: f64,
    pub order_id: f64,
    pub item: f64,
}

impl Default for IdentityWeights {
    fn default() -> Self {
        Self {
            customer: 0.30,
            order_id: 0.35,
            item: 0.20,
        }
    }
}

impl IdentityWeights {
    /// Highest attainable core score. Summed per weight so the defaults
    /// land on exactly 85.
    pub fn max_core(&self) -> f64 {
        100.0 * self.customer + 100.0 * self.order_id + 100.0 * self.item
    }
}

/// Price points: exact match, or within `near_ratio` of the order price.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PriceRule {
    pub exact_points: f64,
    pub near_points: f64,
    pub near_ratio: f64,
}

impl Default for PriceRule {
    fn default() -> Self {
        Self {
            exact_points: 10.0,
            near_points: 5.0,
            near_ratio: 0.10,
        }
    }
}

/// Date points, relative to the order date.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DateRule {
    pub on_time_points: f64,
    /// Awarded for missing/unparsable dates and for slightly early payments.
    pub partial_points: f64,
    pub forward_window_days: i64,
    pub backward_grace_days: i64,
}

impl Default for DateRule {
    fn default() -> Self {
        Self {
            on_time_points: 5.0,
            partial_points: 2.5,
            forward_window_days: 90,
            backward_grace_days: 7,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MatcherConfig {
    pub fn from_toml(input: &str) -> Result<Self, MatchError> {
        let config: MatcherConfig =
            toml::from_str(input).map_err(|e| MatchError::ConfigParse(e.to_string()))?;
        config.validate()?;
        if config.match_threshold < MATCH_THRESHOLD {
            log::warn!(
                "match_threshold {} is below the default {MATCH_THRESHOLD}; expect more false matches",
                config.match_threshold
            );
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        let non_negative = [
            ("weights.customer", self.weights.customer),
            ("weights.order_id", self.weights.order_id),
            ("weights.item", self.weights.item),
            ("price.exact_points", self.price.exact_points),
            ("price.near_points", self.price.near_points),
            ("price.near_ratio", self.price.near_ratio),
            ("date.on_time_points", self.date.on_time_points),
            ("date.partial_points", self.date.partial_points),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(MatchError::ConfigValidation(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        if !(0.0..=100.0).contains(&self.match_threshold) {
            return Err(MatchError::ConfigValidation(format!(
                "match_threshold must be within 0..=100, got {}",
                self.match_threshold
            )));
        }

        if !(0.0..=1.0).contains(&self.auto_approve_ratio) {
            return Err(MatchError::ConfigValidation(format!(
                "auto_approve_ratio must be within 0..=1, got {}",
                self.auto_approve_ratio
            )));
        }

        if self.price.near_points > self.price.exact_points {
            return Err(MatchError::ConfigValidation(
                "price.near_points cannot exceed price.exact_points".into(),
            ));
        }

        if self.date.partial_points > self.date.on_time_points {
            return Err(MatchError::ConfigValidation(
                "date.partial_points cannot exceed date.on_time_points".into(),
            ));
        }

        if self.date.forward_window_days < 0 || self.date.backward_grace_days < 0 {
            return Err(MatchError::ConfigValidation(
                "date windows must be non-negative".into(),
            ));
        }

        let max_total = self.max_total();
        if max_total > 100.0 + 1e-9 {
            return Err(MatchError::ConfigValidation(format!(
                "maximum attainable score is {max_total:.2}, must not exceed 100"
            )));
        }

        Ok(())
    }

    pub fn max_core(&self) -> f64 {
        self.weights.max_core()
    }

    pub fn max_total(&self) -> f64 {
        self.max_core() + self.price.exact_points + self.date.on_time_points
    }

    /// Minimum total for auto-approval (76.5 with the defaults).
    pub fn auto_approve_threshold(&self) -> f64 {
        self.max_core() * self.auto_approve_ratio
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
