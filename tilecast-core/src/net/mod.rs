//! Network layer: the byte transport seam and the streaming HTTP
//! downloader built on top of it.

pub mod download;
pub mod transport;

pub use download::{DownloadSummary, Downloader, ResponseHeaders, build_request};
pub use transport::{TcpTransport, Transport};
