pub mod clipboard;
pub mod files;
pub mod http;

pub use clipboard::CommandClipboard;
pub use http::HttpBackend;
