use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::{path::PathBuf, sync::Arc};

use crate::{
    app::App,
    batch::EstimateOutcome,
    config::{Config, EnvOverride},
    oracle::WalletApiClient,
    primitives::{SatsPerVByte, Utxo},
};

#[derive(Parser)]
#[clap(version, long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[clap(
        short,
        long,
        env = "UTXOSCOPE_CONFIG",
        default_value = "utxoscope.yml",
        value_name = "FILE"
    )]
    config: PathBuf,
    /// Overrides the wallet backend url
    #[clap(long, env = "UTXOSCOPE_WALLET_API")]
    wallet_api_url: Option<String>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify each UTXO in a snapshot at the given fee rate
    Classify {
        /// JSON file with the UTXO snapshot
        #[clap(short, long, value_name = "FILE")]
        utxos: PathBuf,
        /// Fee rate in sats per vbyte
        #[clap(short, long)]
        fee_rate: Decimal,
    },
    /// Request a batched fee estimate for the UTXOs in the snapshot
    Estimate {
        #[clap(short, long, value_name = "FILE")]
        utxos: PathBuf,
        #[clap(short, long)]
        fee_rate: Decimal,
    },
    /// Write the classified snapshot as JSON
    Export {
        #[clap(short, long, value_name = "FILE")]
        utxos: PathBuf,
        #[clap(short, long)]
        fee_rate: Decimal,
        #[clap(short, long, value_name = "FILE")]
        out: PathBuf,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_path(
        cli.config,
        EnvOverride {
            wallet_api_url: cli.wallet_api_url,
        },
    )?;
    crate::tracing::init_tracer(config.tracing.clone())?;
    let app = App::new(
        config.script_type,
        Arc::new(WalletApiClient::new(config.wallet_api)),
    );

    match cli.command {
        Command::Classify { utxos, fee_rate } => {
            let utxos = read_snapshot(&utxos)?;
            let classified = app.classify_utxos(&utxos, SatsPerVByte::from(fee_rate))?;
            for row in classified {
                let spendable = if row.classification.spendable {
                    "yes"
                } else {
                    "no"
                };
                println!(
                    "{:<18} vout {:>3}  {:>12} sats  fee ~{:<10} tier {:<10} spendable {}",
                    abbreviate_txid(&row.utxo.txid),
                    row.utxo.vout,
                    row.utxo.amount.to_string(),
                    row.classification.fee_percent.to_string(),
                    row.classification
                        .tier
                        .map(|t| format!("{t:?}").to_lowercase())
                        .unwrap_or_else(|| "-".to_string()),
                    spendable
                );
            }
        }
        Command::Estimate { utxos, fee_rate } => {
            let selection = read_snapshot(&utxos)?;
            let outcome = app
                .estimate_batch(&selection, SatsPerVByte::from(fee_rate))
                .await?;
            match outcome {
                EstimateOutcome::Idle => {
                    println!("Select at least two utxos to estimate a batch tx");
                }
                EstimateOutcome::Ready(estimate) => {
                    if estimate.spendable {
                        println!("Total fees: ~{} sats", estimate.total_fee);
                        println!("Fee pct: ~{}", estimate.fee_percent);
                    } else {
                        println!("Tx not spendable");
                    }
                }
                EstimateOutcome::Failed(e) => {
                    println!("Estimate failed: {e}");
                    println!("Re-run to retry");
                }
                EstimateOutcome::DiscardedStale => {}
            }
        }
        Command::Export {
            utxos,
            fee_rate,
            out,
        } => {
            let utxos = read_snapshot(&utxos)?;
            let file = std::fs::File::create(&out)
                .with_context(|| format!("Couldn't create {}", out.display()))?;
            app.export_snapshot(&utxos, SatsPerVByte::from(fee_rate), file)?;
            println!("Wrote {}", out.display());
        }
    }
    Ok(())
}

fn read_snapshot(path: &PathBuf) -> anyhow::Result<Vec<Utxo>> {
    let file = std::fs::read_to_string(path)
        .with_context(|| format!("Couldn't read utxo snapshot {}", path.display()))?;
    serde_json::from_str(&file).context("Couldn't parse utxo snapshot")
}

fn abbreviate_txid(txid: &str) -> String {
    let chars: Vec<char> = txid.chars().collect();
    if chars.len() <= 18 {
        return txid.to_string();
    }
    let prefix: String = chars[..7].iter().collect();
    let suffix: String = chars[chars.len() - 7..].iter().collect();
    format!("{prefix}....{suffix}")
}
