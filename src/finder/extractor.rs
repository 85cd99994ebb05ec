//! Game source extraction from listing page HTML.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use super::Strategy;

/// Every `<iframe ...>` opening tag with a quoted `src` attribute.
static IFRAME_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<iframe\b[^>]*?\ssrc\s*=\s*["']([^"']+)["'][^>]*>"#).unwrap()
});

/// A numeric game id in a build path such as `/games/2024/construct/123/foo/index.html`.
static GAME_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"/(\d+)/[^/"']+/index"#).unwrap());

/// CDN host fragments that identify an embedded game.
pub fn default_cdn_fragments() -> Vec<String> {
    [
        "cloud.onlinegames.io",
        "onlinegames.io/games",
        "html5.gamedistribution.com",
        "games.cdn.famobi.com",
        "games.cdn",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Tags that can host a game; anything else with a player id is ignored.
const PLAYER_TAGS: &[&str] = &["iframe", "embed", "frame", "object"];

/// Element ids that game pages use for the player element.
pub fn default_element_ids() -> Vec<String> {
    ["game-frame", "gameFrame", "game-iframe", "gameIframe", "game"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// A source URL pulled out of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub src: String,
    pub strategy: Strategy,
}

/// Finds the embedded game URL in page HTML.
#[derive(Debug, Clone)]
pub struct Extractor {
    cdn_fragments: Vec<String>,
    element_selector: Option<Selector>,
}

impl Extractor {
    pub fn new(cdn_fragments: Vec<String>, element_ids: &[String]) -> Self {
        Self {
            cdn_fragments: cdn_fragments
                .into_iter()
                .filter(|f| !f.trim().is_empty())
                .collect(),
            element_selector: build_element_selector(element_ids),
        }
    }

    /// Look for the game source: first an allow-listed iframe, then a
    /// player element with a known id.
    pub fn extract(&self, html: &str, page_url: &str) -> Option<Extracted> {
        if let Some(src) = self.find_iframe(html) {
            return Some(Extracted {
                src,
                strategy: Strategy::Iframe,
            });
        }

        self.find_element(html, page_url).map(|src| Extracted {
            src,
            strategy: Strategy::Element,
        })
    }

    /// First iframe, in document order, whose `src` contains a CDN fragment.
    pub fn find_iframe(&self, html: &str) -> Option<String> {
        for captures in IFRAME_SRC.captures_iter(html) {
            let src = &captures[1];
            if self.matches_cdn(src) {
                debug!("Matched iframe source: {}", src);
                return Some(src.to_string());
            }
            debug!("Skipping iframe source not on allow-list: {}", src);
        }
        None
    }

    /// Source of the first player element (`iframe`, `embed`, `frame` or
    /// `object`) carrying one of the known ids.
    ///
    /// Relative sources are resolved against `page_url`; only absolute
    /// http(s) results are accepted.
    pub fn find_element(&self, html: &str, page_url: &str) -> Option<String> {
        let selector = self.element_selector.as_ref()?;
        let document = Html::parse_document(html);
        let base = Url::parse(page_url.trim()).ok();

        document
            .select(selector)
            .filter_map(element_source)
            .find_map(|src| resolve_source(base.as_ref(), src))
            .map(|src| {
                debug!("Matched player element source: {}", src);
                src
            })
    }

    /// Numeric game id hinted by a build path somewhere in the page.
    pub fn game_id(&self, html: &str) -> Option<String> {
        GAME_ID
            .captures(html)
            .map(|captures| captures[1].to_string())
    }

    fn matches_cdn(&self, src: &str) -> bool {
        self.cdn_fragments
            .iter()
            .any(|fragment| src.contains(fragment.as_str()))
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(default_cdn_fragments(), &default_element_ids())
    }
}

/// `iframe[id="a"], embed[id="a"], ...` for every id and player tag; ids
/// that would break the selector syntax are skipped.
fn build_element_selector(element_ids: &[String]) -> Option<Selector> {
    let parts: Vec<String> = element_ids
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty() && !id.contains(['"', '\\']))
        .flat_map(|id| {
            PLAYER_TAGS
                .iter()
                .map(move |tag| format!(r#"{}[id="{}"]"#, tag, id))
        })
        .collect();

    if parts.is_empty() {
        return None;
    }

    Selector::parse(&parts.join(", ")).ok()
}

/// `object` embeds its payload through `data`; the other player tags use `src`.
fn element_source<'a>(element: ElementRef<'a>) -> Option<&'a str> {
    let el = element.value();
    let attr = if el.name() == "object" { "data" } else { "src" };
    el.attr(attr).map(str::trim).filter(|src| !src.is_empty())
}

/// Absolute http(s) form of an element source.
fn resolve_source(base: Option<&Url>, src: &str) -> Option<String> {
    let url = match base {
        Some(base) => base.join(src).ok()?,
        None => Url::parse(src).ok()?,
    };
    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://www.onlinegames.io/monster-survivors/";

    #[test]
    fn extracts_allow_listed_iframe() {
        let html = r#"<div><iframe width="800" src="https://cloud.onlinegames.io/games/2024/unity/monster-survivors/index.html" allowfullscreen></iframe></div>"#;
        let found = Extractor::default().extract(html, PAGE).unwrap();
        assert_eq!(
            found.src,
            "https://cloud.onlinegames.io/games/2024/unity/monster-survivors/index.html"
        );
        assert_eq!(found.strategy, Strategy::Iframe);
    }

    #[test]
    fn scans_past_non_matching_iframes() {
        let html = r#"
            <iframe src="https://www.youtube.com/embed/abc"></iframe>
            <p>ad</p>
            <iframe class="game" src='https://html5.gamedistribution.com/abc123/'></iframe>
            <iframe src="https://games.cdn.famobi.com/html5games/x/"></iframe>
        "#;
        assert_eq!(
            Extractor::default().find_iframe(html).as_deref(),
            Some("https://html5.gamedistribution.com/abc123/")
        );
    }

    #[test]
    fn first_match_in_document_order_wins() {
        let html = r#"
            <iframe src="https://games.cdn.famobi.com/a/"></iframe>
            <iframe src="https://cloud.onlinegames.io/b/"></iframe>
        "#;
        assert_eq!(
            Extractor::default().find_iframe(html).as_deref(),
            Some("https://games.cdn.famobi.com/a/")
        );
    }

    #[test]
    fn tag_and_attribute_are_case_insensitive() {
        let html = r#"<IFRAME ID="x" SRC="https://cloud.onlinegames.io/games/foo/index.html"></IFRAME>"#;
        assert_eq!(
            Extractor::default().find_iframe(html).as_deref(),
            Some("https://cloud.onlinegames.io/games/foo/index.html")
        );
    }

    #[test]
    fn data_src_is_not_src() {
        let html = r#"<iframe data-src="https://cloud.onlinegames.io/lazy/"></iframe>"#;
        assert_eq!(Extractor::default().find_iframe(html), None);
    }

    #[test]
    fn no_matching_iframe_returns_none() {
        let html = r#"<html><body><iframe src="https://ads.example.com/"></iframe></body></html>"#;
        assert_eq!(Extractor::default().extract(html, PAGE), None);
    }

    #[test]
    fn malformed_html_is_not_an_error() {
        let extractor = Extractor::default();
        assert_eq!(extractor.extract("", PAGE), None);
        assert_eq!(
            extractor.extract("<iframe src=\"https://cloud.onlinegames.io/", PAGE),
            None
        );
        assert_eq!(extractor.extract("<<<iframe>>><div id=game", PAGE), None);
    }

    #[test]
    fn element_fallback_by_id() {
        let html = r#"
            <iframe src="https://ads.example.com/"></iframe>
            <embed id="game-frame" src="https://static.example.net/builds/foo/index.html">
        "#;
        let found = Extractor::default().extract(html, PAGE).unwrap();
        assert_eq!(found.src, "https://static.example.net/builds/foo/index.html");
        assert_eq!(found.strategy, Strategy::Element);
    }

    #[test]
    fn element_fallback_resolves_relative_src() {
        let html = r#"
            <iframe id="game" src=""></iframe>
            <iframe id="gameFrame" src="/play/foo/"></iframe>
        "#;
        assert_eq!(
            Extractor::default().find_element(html, PAGE).as_deref(),
            Some("https://www.onlinegames.io/play/foo/")
        );
    }

    #[test]
    fn element_fallback_ignores_non_player_tags() {
        let html = r#"
            <img id="game" src="/thumbs/logo.png">
            <div id="game-frame" src="https://static.example.net/x/"></div>
        "#;
        let extractor = Extractor::default();
        assert_eq!(extractor.find_element(html, PAGE), None);
        assert_eq!(extractor.extract(html, PAGE), None);
    }

    #[test]
    fn element_fallback_reads_object_data() {
        let html = r#"<object id="game" data="builds/foo/index.html"></object>"#;
        assert_eq!(
            Extractor::default().find_element(html, PAGE).as_deref(),
            Some("https://www.onlinegames.io/monster-survivors/builds/foo/index.html")
        );
    }

    #[test]
    fn element_fallback_rejects_non_http_sources() {
        let html = r#"
            <iframe id="game" src="javascript:void(0)"></iframe>
            <embed id="game-frame" src="data:text/html,hi">
        "#;
        assert_eq!(Extractor::default().find_element(html, PAGE), None);
        // Without a usable page URL only absolute sources survive.
        let html = r#"<iframe id="game" src="/play/foo/"></iframe>"#;
        assert_eq!(Extractor::default().find_element(html, "not a url"), None);
    }

    #[test]
    fn configured_fragments_replace_defaults() {
        let extractor = Extractor::new(vec!["cdn.example.org".to_string()], &[]);
        let html = r#"
            <iframe src="https://cloud.onlinegames.io/games/foo/"></iframe>
            <iframe src="https://cdn.example.org/foo/"></iframe>
            <div id="game-frame" src="https://elsewhere/"></div>
        "#;
        assert_eq!(
            extractor.extract(html, PAGE).map(|e| e.src).as_deref(),
            Some("https://cdn.example.org/foo/")
        );
        assert_eq!(extractor.find_element(html, PAGE), None);
    }

    #[test]
    fn unsafe_element_ids_are_ignored() {
        let selector = build_element_selector(&[r#"bad"id"#.to_string(), "ok".to_string()]);
        assert!(selector.is_some());
        assert!(build_element_selector(&[" ".to_string()]).is_none());
    }

    #[test]
    fn game_id_from_build_path() {
        let html = r#"<script>var p = "https://cloud.onlinegames.io/games/2024/construct/12345/foo/index-og.html";</script>"#;
        assert_eq!(Extractor::default().game_id(html).as_deref(), Some("12345"));
        assert_eq!(Extractor::default().game_id("<p>no id</p>"), None);
    }
}
