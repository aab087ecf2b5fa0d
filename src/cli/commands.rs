use crate::app::{AppContext, Result};
use crate::scraper::Extraction;

pub async fn find_feed(ctx: &AppContext, url: &str) -> Result<()> {
    match ctx.find_rss_feed(url).await? {
        Some(feed_url) => println!("{}", feed_url),
        None => println!("No feed found for {}", url),
    }
    Ok(())
}

pub async fn show_metadata(ctx: &AppContext, url: &str, json: bool) -> Result<()> {
    let meta = ctx.get_rss_metadata(url).await?;

    if json {
        let rendered = serde_json::to_string_pretty(&meta)
            .map_err(|e| crate::app::ScoutError::Extraction(e.to_string()))?;
        println!("{}", rendered);
        return Ok(());
    }

    println!("{}", meta.display_title());
    println!("  feed:  {}", meta.source_url);
    if let Some(ref site) = meta.site_url {
        println!("  site:  {}", site);
    }
    if let Some(ref description) = meta.description {
        println!("  about: {}", description);
    }
    if let Some(ref image) = meta.image_url {
        println!("  image: {}", image);
    }
    println!("  {} items", meta.items.len());

    for item in &meta.items {
        let date = item
            .published_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "----------".into());
        println!("  {} {} {}", date, item.display_title(), item.link);
    }

    Ok(())
}

pub async fn show_image(ctx: &AppContext, url: &str) -> Result<()> {
    println!("{}", ctx.get_image_from_rss_or_default(url).await);
    Ok(())
}

pub async fn scrape(
    ctx: &AppContext,
    url: &str,
    selector: &str,
    extraction: &Extraction,
) -> Result<()> {
    let value = ctx.scrape_articles(url, selector, extraction).await?;
    let rendered = serde_json::to_string_pretty(&value)
        .map_err(|e| crate::app::ScoutError::Extraction(e.to_string()))?;
    println!("{}", rendered);
    Ok(())
}
