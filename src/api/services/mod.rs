pub mod frontend;
pub mod ping;
pub mod url;

pub use frontend::{FrontendService, frontend_routes};
pub use ping::{PingCheckService, ping_routes};
pub use url::{UrlService, url_routes};
