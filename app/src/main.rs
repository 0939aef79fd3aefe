#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    paygate_app::run().await
}
