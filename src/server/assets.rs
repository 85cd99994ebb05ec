//! Static asset constants.

/// The single-page web console served at `/`.
pub const CONSOLE_HTML: &str = include_str!("console.html");
