#[tokio::main]
async fn main() -> anyhow::Result<()> {
    flashcard_viewer::run().await
}
