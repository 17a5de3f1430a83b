mod client;
mod config;
pub mod error;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::primitives::{SatsPerVByte, Satoshis, Utxo};
pub use client::WalletApiClient;
pub use config::WalletApiConfig;
use error::OracleError;

/// Request body for the backend's batched fee estimate. The backend builds a
/// draft transaction for exactly these inputs at this fee rate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFeeRequest {
    pub selected_utxos: Vec<SelectedUtxo>,
    pub fee_rate: SatsPerVByte,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectedUtxo {
    pub id: String,
    pub vout: u32,
    pub amount: Satoshis,
}

impl BatchFeeRequest {
    pub fn new(selection: &[Utxo], fee_rate: SatsPerVByte) -> Self {
        Self {
            selected_utxos: selection
                .iter()
                .map(|utxo| SelectedUtxo {
                    id: utxo.txid.clone(),
                    vout: utxo.vout,
                    amount: utxo.amount,
                })
                .collect(),
            fee_rate,
        }
    }
}

/// Base fee for the draft transaction, excluding signature scripts, plus the
/// backend's own spendability verdict. That verdict is authoritative: it
/// already accounts for base-fee-vs-value, so it is never recomputed locally
/// from the surcharge-adjusted percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct OracleFeeEstimate {
    pub fee: Satoshis,
    pub spendable: bool,
}

/// The one network-shaped dependency of the engine.
#[async_trait]
pub trait BatchFeeOracle: Send + Sync {
    async fn batch_fee(&self, request: BatchFeeRequest) -> Result<OracleFeeEstimate, OracleError>;
}
