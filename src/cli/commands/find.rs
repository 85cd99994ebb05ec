//! One-off lookups from the command line.

use std::sync::Arc;

use console::style;

use crate::config::Settings;
use crate::finder::{derive_slug, Finder, Prober};
use crate::scrapers::HttpClient;

/// Look up a single page and print the game source.
pub async fn cmd_find(settings: &Settings, url: &str, json: bool) -> anyhow::Result<()> {
    let client = HttpClient::from_settings(settings)?;
    let finder = Finder::new(Arc::new(client), settings.finder.clone());

    let found = finder.find(url).await?;

    match found {
        Some(found) if json => {
            let out = serde_json::json!({
                "source": found.url,
                "strategy": found.strategy.to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
        Some(found) => {
            eprintln!(
                "{} Found via {}",
                style("✓").green(),
                style(found.strategy).cyan()
            );
            println!("{}", found.url);
            Ok(())
        }
        None => {
            eprintln!("{} No game source found for {}", style("✗").red(), url);
            anyhow::bail!("No game source found")
        }
    }
}

/// Print the URLs the prober would try for a page, in order.
pub fn cmd_candidates(settings: &Settings, url: &str, id: Option<&str>) -> anyhow::Result<()> {
    let prober = Prober::new(settings.finder.templates.clone());
    let slug = derive_slug(url);
    let candidates = prober.candidates(url, id);

    if candidates.is_empty() {
        eprintln!("{} No usable slug in {} (got {:?})", style("!").yellow(), url, slug);
        return Ok(());
    }

    eprintln!("{} Slug: {}", style("→").dim(), style(&slug).cyan());

    for (i, candidate) in candidates.iter().enumerate() {
        println!("{:>2}. {}", i + 1, candidate);
    }
    Ok(())
}
