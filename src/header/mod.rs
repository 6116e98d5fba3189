//! One module per header family, following the teacher crate's flat
//! `mod.rs` re-export convention (`rscil/src/metadata/mod.rs`).
//!
//! Every header here follows the same shape: a plain struct holding the
//! fields this crate actually needs, and a `read` associated function that
//! consumes exactly as many bytes as the real on-disk struct for the given
//! revision would occupy — including fields this crate never exposes, since
//! skipping them would shift every later field's offset. Fields with no
//! surviving accessor are read and discarded rather than modeled, when nothing
//! downstream depends on their value (see DESIGN.md item 1 and SPEC_FULL.md
//! §4.B).

mod channel;
mod compression;
mod dtype;
mod foreign;
mod graph;
mod journal;
mod marker;
mod padding;

pub use channel::{ChannelHeader, ChannelHeaderPost4, ChannelHeaderPre4};
pub use compression::{
    ChannelCompressionHeader, MainCompressionHeader, MainCompressionHeaderPost4,
    MainCompressionHeaderPre4,
};
pub use dtype::ChannelDTypeHeader;
pub use foreign::{ForeignHeader, ForeignHeaderPost4, ForeignHeaderPre4};
pub use graph::{GraphHeader, GraphHeaderPost4, GraphHeaderPre4};
pub use journal::{V2JournalHeader, V4JournalHeader, V4JournalLengthHeader};
pub use marker::{
    V2MarkerHeader, V2MarkerItemHeader, V2MarkerMetadataHeader, V2MarkerMetadataPreHeader,
    V4MarkerHeader, V4MarkerItemHeader,
};
pub use padding::UnknownPaddingHeader;

/// Common interface every header variant implements: how many bytes to
/// advance the cursor to reach the next header. For most header types this
/// is a field declared in the header itself rather than a function of the
/// struct's own size (see SPEC_FULL.md §4.B).
pub trait Header {
    fn effective_len_bytes(&self) -> u64;
}
