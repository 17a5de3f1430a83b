use serde::{Deserialize, Serialize};

#[serde_with::serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletApiConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    #[serde(default = "default_timeout")]
    pub timeout: std::time::Duration,
    #[serde(default = "default_number_of_retries")]
    pub number_of_retries: u32,
}

impl Default for WalletApiConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout: default_timeout(),
            number_of_retries: default_number_of_retries(),
        }
    }
}

fn default_url() -> String {
    "http://localhost:5011".to_string()
}

fn default_timeout() -> std::time::Duration {
    std::time::Duration::from_secs(10)
}

fn default_number_of_retries() -> u32 {
    2
}
