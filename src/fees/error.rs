use thiserror::Error;

use crate::primitives::WalletScriptType;

#[derive(Debug, Error)]
pub enum FeeModelError {
    #[error("FeeModelError - UnsupportedScriptType: no signature size constant for {0}")]
    UnsupportedScriptType(WalletScriptType),
}
