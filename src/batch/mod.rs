mod entity;

use rust_decimal::Decimal;

use crate::{
    fees::{CostConstants, FeePercent},
    oracle::{error::OracleError, OracleFeeEstimate},
    primitives::{Satoshis, Utxo},
};
pub use entity::*;

/// Result of driving the estimate slot once, as surfaced to the caller.
/// `Failed` carries the oracle error for display; retry is a user action,
/// there is no automatic retry transition.
#[derive(Debug)]
pub enum EstimateOutcome {
    /// Batching below two inputs is a no-op, not an error.
    Idle,
    Ready(BatchEstimate),
    Failed(OracleError),
    /// A response for a superseded selection; dropped, never displayed.
    DiscardedStale,
}

/// Combines the oracle's base fee with the local signature-script surcharge.
/// The surcharge adjusts the displayed fee and percentage, but the oracle's
/// spendability verdict is taken verbatim; recomputing it locally would
/// double-count assumptions the oracle already made.
pub fn finalize_batch(
    selection: &[Utxo],
    costs: &CostConstants,
    oracle_estimate: OracleFeeEstimate,
) -> BatchEstimate {
    let sig_surcharge = costs.per_sig_script * Decimal::from(selection.len());
    let total_fee = Satoshis::from(oracle_estimate.fee.into_inner() + sig_surcharge);
    let input_total: Satoshis = selection.iter().map(|utxo| utxo.amount).sum();
    let fee_percent = FeePercent::of_amount(total_fee.into_inner(), input_total);
    BatchEstimate {
        total_fee,
        fee_percent,
        tier: fee_percent.tier(),
        spendable: oracle_estimate.spendable,
    }
}

/// The single in-flight-request slot. Owned by the UI layer's component
/// instance; last selection wins.
#[derive(Debug, Default)]
pub struct BatchEstimator {
    state: EstimateState,
}

impl BatchEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EstimateState {
        &self.state
    }

    /// UI hook for selection edits. A changed selection discards any Pending
    /// or Ready result immediately, before a new request may start; an
    /// unchanged one keeps whatever the slot holds.
    pub fn set_selection(&mut self, selection: &[Utxo]) {
        let key = SelectionKey::of(selection);
        let unchanged = match &self.state {
            EstimateState::Idle => false,
            EstimateState::Pending { key: current, .. }
            | EstimateState::Ready { key: current, .. } => *current == key,
        };
        if !unchanged {
            self.state = EstimateState::Idle;
        }
    }

    /// Transitions to Pending and hands back the request tag, or `None` when
    /// the selection is below the two-input minimum (the slot stays Idle).
    pub fn begin(&mut self, selection: &[Utxo]) -> Option<SelectionKey> {
        if selection.len() < 2 {
            self.state = EstimateState::Idle;
            return None;
        }
        let key = SelectionKey::of(selection);
        self.state = EstimateState::Pending {
            key: key.clone(),
            selection: selection.to_vec(),
        };
        Some(key)
    }

    /// Applies an oracle response if `key` still identifies the current
    /// Pending selection. A response tagged for a superseded selection is
    /// dropped silently; an oracle failure returns the slot to Idle so the
    /// user can re-trigger the estimate.
    pub fn resolve(
        &mut self,
        key: SelectionKey,
        response: Result<OracleFeeEstimate, OracleError>,
        costs: &CostConstants,
    ) -> EstimateOutcome {
        let selection = match &self.state {
            EstimateState::Pending {
                key: current,
                selection,
            } if *current == key => selection.clone(),
            _ => {
                tracing::debug!(
                    n_inputs = key.n_inputs(),
                    "discarding oracle response for superseded selection"
                );
                return EstimateOutcome::DiscardedStale;
            }
        };
        match response {
            Ok(oracle_estimate) => {
                let estimate = finalize_batch(&selection, costs, oracle_estimate);
                self.state = EstimateState::Ready { key, estimate };
                EstimateOutcome::Ready(estimate)
            }
            Err(e) => {
                self.state = EstimateState::Idle;
                EstimateOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{
        fees::{cost_constants, RiskTier},
        primitives::{SatsPerVByte, WalletScriptType},
    };

    fn utxo(txid: &str, vout: u32, amount: u64) -> Utxo {
        Utxo {
            txid: txid.to_string(),
            vout,
            amount: Satoshis::from(amount),
        }
    }

    fn p2wpkh_costs(fee_rate: u64) -> CostConstants {
        cost_constants(WalletScriptType::P2wpkh, SatsPerVByte::from(fee_rate)).unwrap()
    }

    fn selection_of_three() -> Vec<Utxo> {
        vec![
            utxo("aa", 0, 10_000),
            utxo("bb", 1, 20_000),
            utxo("cc", 0, 30_000),
        ]
    }

    #[test]
    fn batched_totals_combine_oracle_fee_and_sig_surcharge() {
        // p2wpkh at 5 sats/vbyte: 27 * 5 = 135 per input, 405 across three
        let estimate = finalize_batch(
            &selection_of_three(),
            &p2wpkh_costs(5),
            OracleFeeEstimate {
                fee: Satoshis::from(1_000),
                spendable: true,
            },
        );
        assert_eq!(estimate.total_fee, Satoshis::from(1_405));
        // 1405 / 60000 * 100 = 2.3416... -> two-decimal rule
        assert_eq!(estimate.fee_percent, FeePercent::Value(dec!(2.34)));
        assert_eq!(estimate.tier, Some(RiskTier::Caution));
        assert!(estimate.spendable);
    }

    #[test]
    fn oracle_spendability_verdict_is_authoritative() {
        let spendable_says_no = finalize_batch(
            &selection_of_three(),
            &p2wpkh_costs(5),
            OracleFeeEstimate {
                fee: Satoshis::from(1_000),
                spendable: false,
            },
        );
        assert!(!spendable_says_no.spendable);

        // fee dwarfs the inputs, yet the oracle verdict stands
        let spendable_says_yes = finalize_batch(
            &selection_of_three(),
            &p2wpkh_costs(5),
            OracleFeeEstimate {
                fee: Satoshis::from(100_000),
                spendable: true,
            },
        );
        assert!(spendable_says_yes.spendable);
        assert_eq!(spendable_says_yes.fee_percent, FeePercent::Value(dec!(167.34)));
        assert_eq!(spendable_says_yes.tier, Some(RiskTier::Critical));
    }

    #[test]
    fn zero_value_selection_has_undefined_percent() {
        let estimate = finalize_batch(
            &[utxo("aa", 0, 0), utxo("bb", 0, 0)],
            &p2wpkh_costs(5),
            OracleFeeEstimate {
                fee: Satoshis::from(1_000),
                spendable: false,
            },
        );
        assert_eq!(estimate.fee_percent, FeePercent::Undefined);
        assert_eq!(estimate.tier, None);
    }

    #[test]
    fn finalize_is_idempotent() {
        let selection = selection_of_three();
        let costs = p2wpkh_costs(5);
        let oracle_estimate = OracleFeeEstimate {
            fee: Satoshis::from(1_000),
            spendable: true,
        };
        assert_eq!(
            finalize_batch(&selection, &costs, oracle_estimate),
            finalize_batch(&selection, &costs, oracle_estimate)
        );
    }

    #[test]
    fn begin_below_two_inputs_is_a_noop() {
        let mut estimator = BatchEstimator::new();
        assert!(estimator.begin(&[utxo("aa", 0, 10_000)]).is_none());
        assert_eq!(estimator.state(), &EstimateState::Idle);
        assert!(estimator.begin(&[]).is_none());
        assert_eq!(estimator.state(), &EstimateState::Idle);
    }

    #[test]
    fn selection_change_discards_pending_and_ready() {
        let mut estimator = BatchEstimator::new();
        let selection = selection_of_three();
        let key = estimator.begin(&selection).unwrap();

        // same selection, different order: no change, request stays pending
        let mut reordered = selection.clone();
        reordered.reverse();
        estimator.set_selection(&reordered);
        assert!(matches!(estimator.state(), EstimateState::Pending { .. }));

        estimator.set_selection(&selection[..2]);
        assert_eq!(estimator.state(), &EstimateState::Idle);

        // the in-flight response for the old selection is now stale
        let outcome = estimator.resolve(
            key,
            Ok(OracleFeeEstimate {
                fee: Satoshis::from(1_000),
                spendable: true,
            }),
            &p2wpkh_costs(5),
        );
        assert!(matches!(outcome, EstimateOutcome::DiscardedStale));
        assert_eq!(estimator.state(), &EstimateState::Idle);
    }

    #[test]
    fn last_selection_wins_over_delayed_response() {
        let mut estimator = BatchEstimator::new();
        let selection_a = selection_of_three();
        let selection_b = vec![utxo("dd", 0, 40_000), utxo("ee", 1, 50_000)];
        let costs = p2wpkh_costs(5);

        let key_a = estimator.begin(&selection_a).unwrap();
        // user switches selections before A resolves
        estimator.set_selection(&selection_b);
        let key_b = estimator.begin(&selection_b).unwrap();

        let outcome_a = estimator.resolve(
            key_a,
            Ok(OracleFeeEstimate {
                fee: Satoshis::from(9_999),
                spendable: true,
            }),
            &costs,
        );
        assert!(matches!(outcome_a, EstimateOutcome::DiscardedStale));
        assert!(matches!(estimator.state(), EstimateState::Pending { .. }));

        let outcome_b = estimator.resolve(
            key_b,
            Ok(OracleFeeEstimate {
                fee: Satoshis::from(500),
                spendable: true,
            }),
            &costs,
        );
        let estimate = match outcome_b {
            EstimateOutcome::Ready(estimate) => estimate,
            other => panic!("expected Ready, got {other:?}"),
        };
        // 500 + 135 * 2 inputs = 770; B's numbers, never A's
        assert_eq!(estimate.total_fee, Satoshis::from(770));
        assert!(matches!(estimator.state(), EstimateState::Ready { .. }));
    }

    #[test]
    fn oracle_failure_returns_slot_to_idle() {
        let mut estimator = BatchEstimator::new();
        let selection = selection_of_three();
        let key = estimator.begin(&selection).unwrap();
        let outcome = estimator.resolve(
            key,
            Err(OracleError::BadStatus(
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            )),
            &p2wpkh_costs(5),
        );
        assert!(matches!(outcome, EstimateOutcome::Failed(_)));
        assert_eq!(estimator.state(), &EstimateState::Idle);
    }

    #[test]
    fn duplicate_resolution_for_a_ready_slot_is_stale() {
        let mut estimator = BatchEstimator::new();
        let selection = selection_of_three();
        let costs = p2wpkh_costs(5);
        let key = estimator.begin(&selection).unwrap();
        let oracle_estimate = OracleFeeEstimate {
            fee: Satoshis::from(1_000),
            spendable: true,
        };
        assert!(matches!(
            estimator.resolve(key.clone(), Ok(oracle_estimate), &costs),
            EstimateOutcome::Ready(_)
        ));
        assert!(matches!(
            estimator.resolve(key, Ok(oracle_estimate), &costs),
            EstimateOutcome::DiscardedStale
        ));
    }
}
