//! Which user agent outbound requests present.
//!
//! Game portals tend to serve stripped pages (or nothing) to obvious bots, so
//! the default is a current desktop Chrome.

use chrono::Utc;

/// Desktop Chrome on macOS.
pub const DEFAULT_BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Pool used when the configured user agent is `random`.
pub const ROTATING_USER_AGENTS: &[&str] = &[
    DEFAULT_BROWSER_USER_AGENT,
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.0.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (iPad; CPU OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
];

/// User agent setting as written in config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAgentChoice {
    Browser,
    Rotate,
    Custom(String),
}

impl UserAgentChoice {
    /// Unset or blank selects the browser default; `random` rotates.
    pub fn from_config(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => UserAgentChoice::Browser,
            Some(v) if v.eq_ignore_ascii_case("random") => UserAgentChoice::Rotate,
            Some(v) => UserAgentChoice::Custom(v.to_string()),
        }
    }

    pub fn resolve(&self) -> String {
        match self {
            UserAgentChoice::Browser => DEFAULT_BROWSER_USER_AGENT.to_string(),
            UserAgentChoice::Rotate => {
                let tick = Utc::now().timestamp_subsec_nanos() as usize;
                ROTATING_USER_AGENTS[tick % ROTATING_USER_AGENTS.len()].to_string()
            }
            UserAgentChoice::Custom(ua) => ua.clone(),
        }
    }
}

/// Shorthand for `UserAgentChoice::from_config(value).resolve()`.
pub fn resolve_user_agent(value: Option<&str>) -> String {
    UserAgentChoice::from_config(value).resolve()
}

/// Chromium-based agents get `sec-ch-ua` client hints.
pub fn is_chromium(user_agent: &str) -> bool {
    user_agent.contains("Chrome/") && !user_agent.contains("Firefox/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_values() {
        assert_eq!(UserAgentChoice::from_config(None), UserAgentChoice::Browser);
        assert_eq!(UserAgentChoice::from_config(Some(" ")), UserAgentChoice::Browser);
        assert_eq!(UserAgentChoice::from_config(Some("Random")), UserAgentChoice::Rotate);
        assert_eq!(
            UserAgentChoice::from_config(Some("GameBot/2.0")),
            UserAgentChoice::Custom("GameBot/2.0".to_string())
        );
    }

    #[test]
    fn rotation_stays_in_pool() {
        let ua = resolve_user_agent(Some("random"));
        assert!(ROTATING_USER_AGENTS.contains(&ua.as_str()));
    }

    #[test]
    fn default_is_chromium_and_firefox_is_not() {
        assert_eq!(resolve_user_agent(None), DEFAULT_BROWSER_USER_AGENT);
        assert!(is_chromium(DEFAULT_BROWSER_USER_AGENT));
        assert!(!is_chromium(ROTATING_USER_AGENTS[3]));
    }
}
