use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Spending-script kind of the wallet, fixed for the session at sign-in.
///
/// `P2wsh` and `P2tr` are recognized on the wire but have no signature-size
/// constant assigned yet; the cost model rejects them rather than pricing
/// their inputs at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletScriptType {
    P2pkh,
    P2sh,
    P2wpkh,
    P2wsh,
    P2tr,
}

impl std::fmt::Display for WalletScriptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalletScriptType::P2pkh => write!(f, "p2pkh"),
            WalletScriptType::P2sh => write!(f, "p2sh"),
            WalletScriptType::P2wpkh => write!(f, "p2wpkh"),
            WalletScriptType::P2wsh => write!(f, "p2wsh"),
            WalletScriptType::P2tr => write!(f, "p2tr"),
        }
    }
}

impl std::str::FromStr for WalletScriptType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "p2pkh" => Ok(WalletScriptType::P2pkh),
            "p2sh" => Ok(WalletScriptType::P2sh),
            "p2wpkh" => Ok(WalletScriptType::P2wpkh),
            "p2wsh" => Ok(WalletScriptType::P2wsh),
            "p2tr" => Ok(WalletScriptType::P2tr),
            other => Err(format!("unknown script type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Satoshis(Decimal);

impl Satoshis {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn into_inner(self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<Decimal> for Satoshis {
    fn from(sats: Decimal) -> Self {
        Self(sats)
    }
}

impl From<u64> for Satoshis {
    fn from(sats: u64) -> Self {
        Self(Decimal::from(sats))
    }
}

impl std::ops::Add<Satoshis> for Satoshis {
    type Output = Satoshis;
    fn add(self, rhs: Satoshis) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign<Satoshis> for Satoshis {
    fn add_assign(&mut self, rhs: Satoshis) {
        self.0 += rhs.0;
    }
}

impl std::ops::Sub<Satoshis> for Satoshis {
    type Output = Satoshis;
    fn sub(self, rhs: Satoshis) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl std::iter::Sum for Satoshis {
    fn sum<I: Iterator<Item = Satoshis>>(iter: I) -> Self {
        iter.fold(Satoshis::ZERO, |acc, sats| acc + sats)
    }
}

impl std::fmt::Display for Satoshis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fee rate in satoshis per virtual byte. Zero is a valid "free" rate and
/// yields all-zero cost constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SatsPerVByte(Decimal);

impl SatsPerVByte {
    pub fn into_inner(self) -> Decimal {
        self.0
    }
}

impl From<Decimal> for SatsPerVByte {
    fn from(rate: Decimal) -> Self {
        Self(rate)
    }
}

impl From<u64> for SatsPerVByte {
    fn from(rate: u64) -> Self {
        Self(Decimal::from(rate))
    }
}

impl std::fmt::Display for SatsPerVByte {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One spendable output as reported by the wallet backend. The snapshot is
/// read-only for the duration of a render cycle; (txid, vout) pairs are unique
/// within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    pub txid: String,
    pub vout: u32,
    pub amount: Satoshis,
}

impl Utxo {
    pub fn outpoint(&self) -> (&str, u32) {
        (&self.txid, self.vout)
    }
}
