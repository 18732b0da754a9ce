//! Folio - terminal portfolio dashboard.
//!
//! Two live widgets share one pattern: a [`poller::Poller`] fetches a JSON
//! resource on an interval, a normalizer turns the third-party payload into a
//! strict snapshot, and a presenter in [`tui::ui`] renders whatever the latest
//! [`poller::WidgetState`] holds.

pub mod clock;
pub mod config;
pub mod poller;
pub mod presence;
pub mod tui;
pub mod watch;
pub mod weather;

/// User agent sent with every outbound request.
pub const USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));
