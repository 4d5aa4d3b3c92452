//! rfimatch Archive - Observation archive access
//!
//! Key/value filter and sort grammar, cursor pagination over an
//! [`ArchiveClient`](rfimatch_core::ports::ArchiveClient), and the
//! adapters that talk to concrete archives.

pub mod auth;
pub mod bands;
pub mod http;
pub mod meerkat;
pub mod memory;
pub mod pagination;
pub mod query;

pub use auth::{StaticToken, TokenFile};
pub use bands::{freq_to_bands, RADIO_BANDS};
pub use http::HttpArchiveClient;
pub use meerkat::MeerkatArchive;
pub use memory::MemoryArchive;
pub use pagination::ArchiveQueryEngine;
pub use query::{parse_filters, parse_sort, FilterGrammar};
