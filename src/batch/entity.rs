use serde::Serialize;

use crate::{
    fees::{FeePercent, RiskTier},
    primitives::{Satoshis, Utxo},
};

/// Canonical identity of a selection: the sorted composite (txid, vout) pairs.
/// Tags in-flight oracle requests so a late response can be checked against
/// the selection that is current on arrival, not merely "is a request
/// pending". Keying by txid alone would conflate outputs of one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectionKey(Vec<(String, u32)>);

impl SelectionKey {
    pub fn of(selection: &[Utxo]) -> Self {
        let mut outpoints: Vec<_> = selection
            .iter()
            .map(|utxo| (utxo.txid.clone(), utxo.vout))
            .collect();
        outpoints.sort();
        Self(outpoints)
    }

    pub fn n_inputs(&self) -> usize {
        self.0.len()
    }
}

/// Finalized totals for a batched spend of the selected UTXOs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchEstimate {
    pub total_fee: Satoshis,
    pub fee_percent: FeePercent,
    pub tier: Option<RiskTier>,
    pub spendable: bool,
}

/// Lifecycle of the single estimate slot. Any selection change collapses
/// Pending/Ready back to Idle so a stale estimate is never displayed against
/// a new selection.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EstimateState {
    #[default]
    Idle,
    Pending {
        key: SelectionKey,
        selection: Vec<Utxo>,
    },
    Ready {
        key: SelectionKey,
        estimate: BatchEstimate,
    },
}
