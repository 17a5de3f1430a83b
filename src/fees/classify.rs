use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;

use super::CostConstants;
use crate::primitives::Satoshis;

/// Discrete risk bucket for a fee percentage, ordered from safest to worst.
/// Thresholds are lower bounds with strict `>` semantics: an exact hit on a
/// threshold stays in the tier below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Safe,
    Caution,
    Warning,
    Elevated,
    High,
    Severe,
    Critical,
}

const TIER_THRESHOLDS: [(Decimal, RiskTier); 7] = [
    (dec!(0), RiskTier::Safe),
    (dec!(2), RiskTier::Caution),
    (dec!(10), RiskTier::Warning),
    (dec!(45), RiskTier::Elevated),
    (dec!(65), RiskTier::High),
    (dec!(85), RiskTier::Severe),
    (dec!(100), RiskTier::Critical),
];

impl RiskTier {
    pub fn for_percent(percent: Decimal) -> Self {
        let mut selected = RiskTier::Safe;
        for (threshold, tier) in TIER_THRESHOLDS {
            if percent > threshold {
                selected = tier;
            }
        }
        selected
    }

    /// Background color the selection table renders for this tier.
    pub fn color(&self) -> &'static str {
        match self {
            RiskTier::Safe => "rgb(220 252 231)",
            RiskTier::Caution => "rgb(254 240 138)",
            RiskTier::Warning => "rgb(248 113 113)",
            RiskTier::Elevated => "rgb(239 68 68)",
            RiskTier::High => "rgb(220 38 38)",
            RiskTier::Severe => "rgb(185 28 28)",
            RiskTier::Critical => "rgb(153 27 27)",
        }
    }
}

/// A fee-as-percentage-of-value figure, rounded for display. A zero amount
/// makes the percentage undefined; that case is carried as a distinct variant
/// so it can never leak into tier lookups or string rendering as infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FeePercent {
    Undefined,
    Value(Decimal),
}

impl FeePercent {
    /// `cost / amount * 100`, rounded to 2 decimal places above 1% and 4
    /// below, keeping resolution for near-zero fees while staying readable
    /// for large ones.
    pub fn of_amount(cost: Decimal, amount: Satoshis) -> Self {
        if amount.is_zero() {
            return FeePercent::Undefined;
        }
        let percent = cost / amount.into_inner() * dec!(100);
        let dp = if percent > Decimal::ONE { 2 } else { 4 };
        FeePercent::Value(percent.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
    }

    pub fn tier(&self) -> Option<RiskTier> {
        match self {
            FeePercent::Undefined => None,
            FeePercent::Value(percent) => Some(RiskTier::for_percent(*percent)),
        }
    }

    /// Whether the value being moved exceeds this fee. Undefined percentages
    /// (zero value) are never spendable.
    pub fn is_spendable(&self) -> bool {
        match self {
            FeePercent::Undefined => false,
            FeePercent::Value(percent) => *percent < dec!(100),
        }
    }
}

impl std::fmt::Display for FeePercent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeePercent::Undefined => write!(f, "undefined"),
            FeePercent::Value(percent) => write!(f, "{percent}%"),
        }
    }
}

/// Standalone classification of a single UTXO at the current fee rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UtxoClassification {
    pub fee_percent: FeePercent,
    pub tier: Option<RiskTier>,
    pub spendable: bool,
}

/// Classifies one UTXO by the marginal cost of adding it to a batch. Pure and
/// idempotent; callers with a still-loading amount show a placeholder instead
/// of calling this with a sentinel.
pub fn classify_utxo(amount: Satoshis, costs: &CostConstants) -> UtxoClassification {
    let fee_percent = FeePercent::of_amount(costs.marginal_input_cost(), amount);
    UtxoClassification {
        fee_percent,
        tier: fee_percent.tier(),
        spendable: fee_percent.is_spendable(),
    }
}
