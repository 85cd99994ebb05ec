//! gamesource - find the playable game behind a browser-game listing page.
//!
//! Given the URL of a page that lists a game, the finder fetches the page,
//! looks for an embedded iframe pointing at a known game CDN and, failing
//! that, guesses the CDN path from the page slug and probes it.

pub mod cli;
pub mod config;
pub mod finder;
pub mod scrapers;
pub mod server;
