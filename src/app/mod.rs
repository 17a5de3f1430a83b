pub mod error;

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::{
    batch::{BatchEstimator, EstimateOutcome, EstimateState},
    fees::{classify_utxo, cost_constants, UtxoClassification},
    oracle::{BatchFeeOracle, BatchFeeRequest},
    primitives::{SatsPerVByte, Utxo, WalletScriptType},
};
use error::ApplicationError;

/// One row of a classified snapshot, ready for rendering or export.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedUtxo {
    #[serde(flatten)]
    pub utxo: Utxo,
    #[serde(flatten)]
    pub classification: UtxoClassification,
}

/// Session facade over the estimation engine. The wallet script type is fixed
/// at sign-in; fee rate and UTXO snapshot are read on every call, so a changed
/// rate simply recomputes. The estimator slot behind the mutex is the only
/// mutable state and the oracle call the only async boundary.
pub struct App {
    script_type: WalletScriptType,
    oracle: Arc<dyn BatchFeeOracle>,
    estimator: Mutex<BatchEstimator>,
}

impl App {
    pub fn new(script_type: WalletScriptType, oracle: Arc<dyn BatchFeeOracle>) -> Self {
        Self {
            script_type,
            oracle,
            estimator: Mutex::new(BatchEstimator::new()),
        }
    }

    pub fn script_type(&self) -> WalletScriptType {
        self.script_type
    }

    /// Standalone classification of every UTXO in the snapshot.
    #[instrument(name = "app.classify_utxos", skip(self, utxos), fields(n_utxos = utxos.len()), err)]
    pub fn classify_utxos(
        &self,
        utxos: &[Utxo],
        fee_rate: SatsPerVByte,
    ) -> Result<Vec<ClassifiedUtxo>, ApplicationError> {
        let costs = cost_constants(self.script_type, fee_rate)?;
        Ok(utxos
            .iter()
            .map(|utxo| ClassifiedUtxo {
                utxo: utxo.clone(),
                classification: classify_utxo(utxo.amount, &costs),
            })
            .collect())
    }

    /// UI hook: the selection set changed. Discards any pending or ready batch
    /// estimate before a new request may start.
    pub async fn selection_changed(&self, selection: &[Utxo]) {
        self.estimator.lock().await.set_selection(selection);
    }

    pub async fn estimate_state(&self) -> EstimateState {
        self.estimator.lock().await.state().clone()
    }

    /// Drives one batch estimate: Pending, oracle round trip, then resolution
    /// against whatever selection is current when the response lands. A
    /// response outrun by a selection change comes back `DiscardedStale` and
    /// the new selection's state is untouched.
    #[instrument(name = "app.estimate_batch", skip(self, selection), fields(n_inputs = selection.len()), err)]
    pub async fn estimate_batch(
        &self,
        selection: &[Utxo],
        fee_rate: SatsPerVByte,
    ) -> Result<EstimateOutcome, ApplicationError> {
        let costs = cost_constants(self.script_type, fee_rate)?;
        let key = match self.estimator.lock().await.begin(selection) {
            Some(key) => key,
            None => return Ok(EstimateOutcome::Idle),
        };
        let response = self
            .oracle
            .batch_fee(BatchFeeRequest::new(selection, fee_rate))
            .await;
        Ok(self.estimator.lock().await.resolve(key, response, &costs))
    }

    /// Writes the classified snapshot as JSON. Takes the snapshot explicitly
    /// at invocation time; there is no shared registry to read from.
    #[instrument(name = "app.export_snapshot", skip(self, utxos, writer), err)]
    pub fn export_snapshot(
        &self,
        utxos: &[Utxo],
        fee_rate: SatsPerVByte,
        writer: impl std::io::Write,
    ) -> Result<(), ApplicationError> {
        let classified = self.classify_utxos(utxos, fee_rate)?;
        serde_json::to_writer_pretty(writer, &classified)?;
        Ok(())
    }
}
