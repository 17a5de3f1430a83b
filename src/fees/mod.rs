mod classify;
pub mod error;

use rust_decimal::Decimal;

use crate::primitives::{SatsPerVByte, WalletScriptType};
pub use classify::*;
use error::FeeModelError;

/// Estimated virtual bytes contributed by one input, excluding its signature
/// script.
const INPUT_VBYTES: u64 = 125;
/// Estimated virtual bytes for transaction overhead plus one change output.
const BASE_VBYTES: u64 = 75;

const P2PKH_SIG_SCRIPT_VBYTES: u64 = 107;
// Wide range for script hashes; a 2-of-3 multisig redeem script can run ~250.
const P2SH_SIG_SCRIPT_VBYTES: u64 = 200;
const P2WPKH_SIG_SCRIPT_VBYTES: u64 = 27;

/// Per-unit costs in satoshis at a given fee rate. Ephemeral, recomputed
/// whenever the fee rate or wallet type changes; values keep full `Decimal`
/// precision so rounding only ever happens at display time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostConstants {
    pub per_input: Decimal,
    pub per_base: Decimal,
    pub per_sig_script: Decimal,
}

impl CostConstants {
    /// Marginal cost of adding one input to an already-planned batch. The
    /// signature-script cost is intentionally excluded here: a batch pays it
    /// once per input via the surcharge, while the standalone per-UTXO figure
    /// is a lighter-weight heuristic.
    pub fn marginal_input_cost(&self) -> Decimal {
        self.per_base + self.per_input
    }
}

fn sig_script_vbytes(script_type: WalletScriptType) -> Result<u64, FeeModelError> {
    match script_type {
        WalletScriptType::P2pkh => Ok(P2PKH_SIG_SCRIPT_VBYTES),
        WalletScriptType::P2sh => Ok(P2SH_SIG_SCRIPT_VBYTES),
        WalletScriptType::P2wpkh => Ok(P2WPKH_SIG_SCRIPT_VBYTES),
        WalletScriptType::P2wsh | WalletScriptType::P2tr => {
            Err(FeeModelError::UnsupportedScriptType(script_type))
        }
    }
}

/// Prices the fixed size units at `fee_rate`. Pure; safe to call on every
/// render. Unsupported script types are a typed error, never a silent zero
/// cost that would understate risk.
pub fn cost_constants(
    script_type: WalletScriptType,
    fee_rate: SatsPerVByte,
) -> Result<CostConstants, FeeModelError> {
    let rate = fee_rate.into_inner();
    Ok(CostConstants {
        per_input: Decimal::from(INPUT_VBYTES) * rate,
        per_base: Decimal::from(BASE_VBYTES) * rate,
        per_sig_script: Decimal::from(sig_script_vbytes(script_type)?) * rate,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn constants_scale_with_fee_rate() {
        let costs = cost_constants(WalletScriptType::P2wpkh, SatsPerVByte::from(5)).unwrap();
        assert_eq!(costs.per_input, dec!(625));
        assert_eq!(costs.per_base, dec!(375));
        assert_eq!(costs.per_sig_script, dec!(135));

        let costs = cost_constants(WalletScriptType::P2pkh, SatsPerVByte::from(2)).unwrap();
        assert_eq!(costs.per_sig_script, dec!(214));

        let costs = cost_constants(WalletScriptType::P2sh, SatsPerVByte::from(1)).unwrap();
        assert_eq!(costs.per_sig_script, dec!(200));
    }

    #[test]
    fn fractional_fee_rate_keeps_precision() {
        let costs = cost_constants(WalletScriptType::P2wpkh, SatsPerVByte::from(dec!(1.5))).unwrap();
        assert_eq!(costs.per_input, dec!(187.5));
        assert_eq!(costs.per_base, dec!(112.5));
        assert_eq!(costs.per_sig_script, dec!(40.5));
    }

    #[test]
    fn zero_fee_rate_is_free() {
        let costs = cost_constants(WalletScriptType::P2pkh, SatsPerVByte::from(0)).unwrap();
        assert_eq!(costs.per_input, Decimal::ZERO);
        assert_eq!(costs.per_base, Decimal::ZERO);
        assert_eq!(costs.per_sig_script, Decimal::ZERO);
    }

    #[test]
    fn unsupported_script_types_are_rejected() {
        for script_type in [WalletScriptType::P2wsh, WalletScriptType::P2tr] {
            let res = cost_constants(script_type, SatsPerVByte::from(5));
            assert!(matches!(
                res,
                Err(FeeModelError::UnsupportedScriptType(t)) if t == script_type
            ));
        }
    }
}
