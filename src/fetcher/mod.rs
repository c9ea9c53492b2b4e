pub mod client;
pub mod decode;
pub mod errors;
pub mod types;

pub use client::fetch;
pub use errors::FetchError;
pub use types::{Charset, FetchedPage};
