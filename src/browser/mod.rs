//! Browser session management and the CDP-backed track list page

pub mod config;
pub mod page;
pub mod session;

pub use config::{ConnectionOptions, LaunchOptions};
pub use page::TabPage;
pub use session::BrowserSession;
