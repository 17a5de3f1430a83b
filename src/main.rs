#[tokio::main]
async fn main() -> anyhow::Result<()> {
    utxoscope::cli::run().await
}
