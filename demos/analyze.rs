use design_review_http::{ClientOptions, ImageUpload, ReviewClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: analyze <image.png> [context]"))?;
    let context = std::env::args().nth(2).unwrap_or_default();

    let client = ReviewClient::from_env()
        .map_err(anyhow::Error::msg)?
        .with_options(ClientOptions {
            timeout_ms: Some(120_000),
            ..ClientOptions::default()
        });

    let upload = ImageUpload::from_path(&path).await?;
    let outcome = client.analyze(upload, &context).await?;

    println!("{}", outcome.review.content);
    if let Some(info) = outcome.rate_info {
        eprintln!("{}/{} reviews used", info.requests_used, info.requests_limit);
    }

    Ok(())
}
