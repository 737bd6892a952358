//! Browser management: launch/connect configuration, the session, and the
//! rendering-host capability the exporter talks to.

pub mod config;
pub mod host;
pub mod session;

pub use config::{ConnectionOptions, LaunchOptions};
pub use host::{ChromePage, RenderHost};
pub use session::BrowserSession;
