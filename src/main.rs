#[tokio::main]
async fn main() -> anyhow::Result<()> {
    gitlab_proxy::run().await?;
    Ok(())
}
