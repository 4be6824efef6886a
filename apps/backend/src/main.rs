#[tokio::main]
async fn main() -> anyhow::Result<()> {
    deckconfig_backend::run().await
}
