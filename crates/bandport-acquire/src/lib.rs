pub mod client;
pub mod error;
pub mod import;
pub mod listing;
pub mod session;

pub use client::{ClientConfig, FetchRequest, FetchResponse, HttpFetcher, Method, ReqwestFetcher};
pub use error::ImportError;
pub use import::{import_catalog, BatchPolicy, ImportOptions, ImportReport, ReleaseFailure};
pub use listing::enumerate_release_urls;
pub use session::{acquire_session, base_url, normalize_host};
