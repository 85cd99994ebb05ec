//! Game source discovery.
//!
//! The finder fetches a listing page and tries two strategies in order:
//! - Extraction: an iframe (or player element) already points at the game
//! - Probing: guess the CDN path from the page slug and check each guess

mod extractor;
mod prober;
mod slug;
mod templates;

pub use extractor::{default_cdn_fragments, default_element_ids, Extracted, Extractor};
pub use prober::Prober;
pub use slug::{derive_slug, is_valid_slug};
pub use templates::{build_candidates, default_templates, CandidateTemplate};

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::scrapers::{FetchError, PageFetcher};

/// Which strategy located a game source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Allow-listed iframe on the page.
    Iframe,
    /// Element with a known player id.
    Element,
    /// Guessed from the slug and confirmed by a probe.
    Probe,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Iframe => "iframe",
            Strategy::Element => "element",
            Strategy::Probe => "probe",
        };
        f.write_str(name)
    }
}

/// A located game source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundSource {
    pub url: String,
    pub strategy: Strategy,
}

/// What the finder matches against and which paths it guesses.
#[derive(Debug, Clone)]
pub struct FinderOptions {
    pub cdn_fragments: Vec<String>,
    pub element_ids: Vec<String>,
    pub templates: Vec<CandidateTemplate>,
}

impl Default for FinderOptions {
    fn default() -> Self {
        Self {
            cdn_fragments: default_cdn_fragments(),
            element_ids: default_element_ids(),
            templates: default_templates(),
        }
    }
}

/// Fetch, extract, then probe.
#[derive(Clone)]
pub struct Finder {
    fetcher: Arc<dyn PageFetcher>,
    extractor: Extractor,
    prober: Prober,
}

impl Finder {
    pub fn new(fetcher: Arc<dyn PageFetcher>, options: FinderOptions) -> Self {
        Self {
            fetcher,
            extractor: Extractor::new(options.cdn_fragments, &options.element_ids),
            prober: Prober::new(options.templates),
        }
    }

    pub fn prober(&self) -> &Prober {
        &self.prober
    }

    /// Locate the game behind `page_url`.
    ///
    /// Only fetching the page itself can fail; a miss from both strategies
    /// is `Ok(None)`.
    pub async fn find(&self, page_url: &str) -> Result<Option<FoundSource>, FetchError> {
        let html = self.fetcher.fetch_page(page_url).await?;
        debug!("Page {} is {} bytes", page_url, html.len());

        if let Some(extracted) = self.extractor.extract(&html, page_url) {
            info!(
                "Found source for {} via {}: {}",
                page_url, extracted.strategy, extracted.src
            );
            return Ok(Some(FoundSource {
                url: extracted.src,
                strategy: extracted.strategy,
            }));
        }

        let game_id = self.extractor.game_id(&html);
        if let Some(ref id) = game_id {
            debug!("Page {} hints at game id {}", page_url, id);
        }

        let probed = self
            .prober
            .probe(self.fetcher.as_ref(), page_url, game_id.as_deref())
            .await;

        Ok(probed.map(|url| {
            info!("Found source for {} via probe: {}", page_url, url);
            FoundSource {
                url,
                strategy: Strategy::Probe,
            }
        }))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted `PageFetcher` for unit tests.

    use std::collections::HashSet;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reqwest::StatusCode;

    use crate::scrapers::{FetchError, PageFetcher};

    pub struct ScriptedFetcher {
        page: Result<String, StatusCode>,
        succeed: HashSet<String>,
        fail: HashSet<String>,
        fetched: Mutex<Vec<String>>,
        probed: Mutex<Vec<String>>,
    }

    impl ScriptedFetcher {
        /// Every page fetch returns `html`; every probe answers 404.
        pub fn new(html: &str) -> Self {
            Self {
                page: Ok(html.to_string()),
                succeed: HashSet::new(),
                fail: HashSet::new(),
                fetched: Mutex::new(Vec::new()),
                probed: Mutex::new(Vec::new()),
            }
        }

        /// Page fetches answer with this status instead.
        pub fn page_status(mut self, status: StatusCode) -> Self {
            self.page = Err(status);
            self
        }

        pub fn succeed_on(mut self, url: &str) -> Self {
            self.succeed.insert(url.to_string());
            self
        }

        pub fn fail_on(mut self, url: &str) -> Self {
            self.fail.insert(url.to_string());
            self
        }

        pub fn fetched(&self) -> Vec<String> {
            self.fetched.lock().unwrap().clone()
        }

        pub fn probed(&self) -> Vec<String> {
            self.probed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for ScriptedFetcher {
        async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
            self.fetched.lock().unwrap().push(url.to_string());
            self.page.clone().map_err(FetchError::Status)
        }

        async fn probe(&self, url: &str) -> Result<StatusCode, FetchError> {
            self.probed.lock().unwrap().push(url.to_string());
            if self.fail.contains(url) {
                return Err(FetchError::InvalidUrl(format!("scripted failure: {url}")));
            }
            if self.succeed.contains(url) {
                Ok(StatusCode::OK)
            } else {
                Ok(StatusCode::NOT_FOUND)
            }
        }
    }
}
