//! Candidate path templates for known game hosting layouts.

use serde::{Deserialize, Serialize};

const SLUG_PLACEHOLDER: &str = "{slug}";
const ID_PLACEHOLDER: &str = "{id}";

/// A URL pattern for one hosting layout, resolved against a base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTemplate {
    /// Path with a `{slug}` placeholder and optionally `{id}`.
    pub path: String,
    /// Scheme and host the path is resolved against.
    pub base: String,
}

impl CandidateTemplate {
    pub fn new(base: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            path: path.into(),
        }
    }

    /// Whether this template can only be rendered with a game id.
    pub fn needs_id(&self) -> bool {
        self.path.contains(ID_PLACEHOLDER)
    }

    /// Substitute the placeholders and join onto the base URL.
    ///
    /// Returns None if the template needs an id and none is known, or if any
    /// placeholder is left unresolved.
    pub fn render(&self, slug: &str, id: Option<&str>) -> Option<String> {
        let mut path = self.path.replace(SLUG_PLACEHOLDER, slug);
        if self.needs_id() {
            path = path.replace(ID_PLACEHOLDER, id?);
        }
        if path.contains('{') || path.contains('}') {
            return None;
        }

        let base = self.base.trim_end_matches('/');
        if path.starts_with('/') {
            Some(format!("{}{}", base, path))
        } else {
            Some(format!("{}/{}", base, path))
        }
    }
}

const CLOUD_BASE: &str = "https://cloud.onlinegames.io";
const SITE_BASE: &str = "https://www.onlinegames.io";

/// Built-in templates, most likely first.
///
/// The id-based layouts come first because an id found on the page is a
/// stronger signal than the slug alone. The slug layouts follow in order of
/// how common each hosting platform is: generic, Unity, Unity 3, Construct,
/// HTML5 and finally the flat `/games/<slug>/` layout.
pub fn default_templates() -> Vec<CandidateTemplate> {
    vec![
        CandidateTemplate::new(CLOUD_BASE, "/games/2024/construct/{id}/{slug}/index-og.html"),
        CandidateTemplate::new(CLOUD_BASE, "/games/2024/construct/{id}/{slug}/index.html"),
        CandidateTemplate::new(CLOUD_BASE, "/games/2024/unity/{id}/{slug}/index.html"),
        CandidateTemplate::new(SITE_BASE, "/games/2024/gm/{slug}/index.html"),
        CandidateTemplate::new(SITE_BASE, "/games/2024/unity/{slug}/index.html"),
        CandidateTemplate::new(SITE_BASE, "/games/2024/unity3/{slug}/index.html"),
        CandidateTemplate::new(SITE_BASE, "/games/2024/construct/{slug}/index.html"),
        CandidateTemplate::new(SITE_BASE, "/games/2024/html5/{slug}/index.html"),
        CandidateTemplate::new(SITE_BASE, "/games/{slug}/index.html"),
    ]
}

/// Render every template in order, skipping unrenderable ones and dropping
/// duplicate URLs (first occurrence wins).
pub fn build_candidates(
    templates: &[CandidateTemplate],
    slug: &str,
    id: Option<&str>,
) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::with_capacity(templates.len());
    for url in templates.iter().filter_map(|t| t.render(slug, id)) {
        if !candidates.contains(&url) {
            candidates.push(url);
        }
    }
    candidates
}
