//! Sequential probing of candidate game URLs.

use tracing::{debug, info};

use super::slug::{derive_slug, is_valid_slug};
use super::templates::{build_candidates, default_templates, CandidateTemplate};
use crate::scrapers::PageFetcher;

/// Guesses the game URL from the page slug and checks each guess in turn.
#[derive(Debug, Clone)]
pub struct Prober {
    templates: Vec<CandidateTemplate>,
}

impl Prober {
    pub fn new(templates: Vec<CandidateTemplate>) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &[CandidateTemplate] {
        &self.templates
    }

    /// Ordered candidate URLs for a page. Empty when the slug is unusable.
    pub fn candidates(&self, page_url: &str, game_id: Option<&str>) -> Vec<String> {
        let slug = derive_slug(page_url);
        if !is_valid_slug(&slug) {
            debug!("No usable slug in {} (got {:?})", page_url, slug);
            return Vec::new();
        }
        let game_id =
            game_id.filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()));
        build_candidates(&self.templates, &slug, game_id)
    }

    /// Probe each candidate in order and return the first that answers 2xx.
    ///
    /// Probes never overlap: each one completes (or times out) before the
    /// next starts. Failures move on to the next candidate.
    pub async fn probe(
        &self,
        fetcher: &dyn PageFetcher,
        page_url: &str,
        game_id: Option<&str>,
    ) -> Option<String> {
        let candidates = self.candidates(page_url, game_id);
        debug!("Probing {} candidates for {}", candidates.len(), page_url);

        for candidate in candidates {
            match fetcher.probe(&candidate).await {
                Ok(status) if status.is_success() => {
                    info!("Candidate {} responded {}", candidate, status);
                    return Some(candidate);
                }
                Ok(status) => debug!("Candidate {} responded {}", candidate, status),
                Err(e) => debug!("Candidate {} failed: {}", candidate, e),
            }
        }

        None
    }
}

impl Default for Prober {
    fn default() -> Self {
        Self::new(default_templates())
    }
}
