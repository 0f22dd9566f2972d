use design_review_http::{ImageUpload, ReviewClient, ReviewSession, SUPPORT_URL};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let email = std::env::var("DESIGN_REVIEW_EMAIL")?;
    let path = std::env::var("DESIGN_REVIEW_IMAGE")?;

    let session = ReviewSession::new(ReviewClient::from_env().map_err(anyhow::Error::msg)?);

    session.register_email(&email).await?;
    let tier = session.tier();
    println!("{} ({} reviews/day)", tier.label(), tier.daily_limit());
    for feature in tier.features() {
        println!("  - {feature}");
    }
    if !session.supporter_status().is_some_and(|status| status.is_supporter) {
        println!("Become a supporter: {SUPPORT_URL}");
    }

    let input = session.update_context("Marketing landing page for a budgeting app");
    println!("context: {}/500 characters", input.chars);

    let upload = ImageUpload::from_path(&path).await?;
    match session.submit_review(upload, &session.context_draft()).await {
        Ok(outcome) => println!("{}", outcome.review.content),
        Err(err) => eprintln!("review failed: {err}"),
    }
    if let Some(label) = session.rate_label() {
        println!("{label}");
    }

    session.teardown();
    Ok(())
}
