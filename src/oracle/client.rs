use async_trait::async_trait;
use tracing::instrument;

use super::{config::*, error::*, BatchFeeOracle, BatchFeeRequest, OracleFeeEstimate};

#[derive(Clone, Debug)]
pub struct WalletApiClient {
    config: WalletApiConfig,
}

impl WalletApiClient {
    pub fn new(config: WalletApiConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl BatchFeeOracle for WalletApiClient {
    #[instrument(name = "oracle.batch_fee", skip(self, request), fields(n_inputs = request.selected_utxos.len()), err)]
    async fn batch_fee(&self, request: BatchFeeRequest) -> Result<OracleFeeEstimate, OracleError> {
        let min_retry_interval = std::time::Duration::from_secs(1);
        let max_retry_interval = std::time::Duration::from_secs(30);
        let retry_policy = reqwest_retry::policies::ExponentialBackoff::builder()
            .retry_bounds(min_retry_interval, max_retry_interval)
            .build_with_max_retries(self.config.number_of_retries);
        let client = reqwest_middleware::ClientBuilder::new(
            reqwest::Client::builder()
                .timeout(self.config.timeout)
                .build()
                .expect("could not build reqwest client"),
        )
        .with(reqwest_retry::RetryTransientMiddleware::new_with_policy(
            retry_policy,
        ))
        .build();

        let url = format!("{}{}", self.config.url, "/api/fee-estimate");
        let resp = client.post(&url).json(&request).send().await?;
        if !resp.status().is_success() {
            return Err(OracleError::BadStatus(resp.status()));
        }
        resp.json::<OracleFeeEstimate>()
            .await
            .map_err(OracleError::CouldNotDecodeResponseBody)
    }
}
