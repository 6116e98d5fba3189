//! Decoder for BIOPAC AcqKnowledge (`.acq`) physiological recording files.
//!
//! The file format packs a versioned tree of headers (file metadata,
//! per-channel metadata, data-type descriptors, compression metadata, event
//! markers, and a journal) followed by a numeric sample payload that is
//! either interleaved-and-uncompressed or per-channel zlib-compressed. This
//! crate decodes that tree and payload into a [`Datafile`]; it does not
//! write the format, and it has no opinion on how a caller renders the
//! result (text, HDF5, MATLAB, ...) -- that's left to callers.
//!
//! Three entry points, mirroring the original Python library's surface:
//!
//! - [`read`] / [`read_path`]: full read (headers + sample data).
//! - [`read_headers`] / [`read_headers_path`]: headers only, no sample data.
//! - [`reader_for_streaming`]: headers only, plus a pull iterator over
//!   sample chunks for files too large to materialize in memory at once.

mod bootstrap;
mod byte_order;
mod data;
mod datafile;
mod dtype_scan;
mod errors;
mod header;
mod header_reader;
mod journal_reader;
mod marker_reader;
mod marker_types;
mod reader;
mod revision;
mod stream;

pub use byte_order::ByteOrder;
pub use data::demux::{sample_pattern, CHUNK_SIZE};
pub use datafile::{Channel, Datafile};
pub use errors::{AcqError, DecodeErrors, Result};
pub use marker_reader::EventMarker;
pub use revision::version_string_guess;
pub use stream::{ChunkSlice, ChunkStream, StreamReader};

use std::fs::File;
use std::io::{self, Read, Seek};
use std::path::Path;

/// Reads a file into memory: every header plus sample data for the
/// requested channels (every channel, if `channel_indexes` is `None`).
/// Returns the best-effort [`Datafile`] alongside any recoverable decode
/// errors -- an empty error list means a fully successful decode (§7).
pub fn read<R: Read + Seek>(source: R, channel_indexes: Option<&[usize]>) -> (Datafile, Vec<String>) {
    reader::read(source, channel_indexes)
}

/// Opens `path` and reads it fully, closing the file before returning.
pub fn read_path<P: AsRef<Path>>(
    path: P,
    channel_indexes: Option<&[usize]>,
) -> io::Result<(Datafile, Vec<String>)> {
    let file = File::open(path)?;
    Ok(read(file, channel_indexes))
}

/// Reads only the headers of a file; channel buffers remain unallocated.
pub fn read_headers<R: Read + Seek>(source: R) -> (Datafile, Vec<String>) {
    reader::read_headers(source)
}

/// Opens `path` and reads only its headers, closing the file before
/// returning.
pub fn read_headers_path<P: AsRef<Path>>(path: P) -> io::Result<(Datafile, Vec<String>)> {
    let file = File::open(path)?;
    Ok(read_headers(file))
}

/// Reads the headers of `source` and returns a [`StreamReader`] that can
/// hand back a chunked iterator over sample data via `stream()`. Errors if
/// the file is compressed -- compressed channels aren't interleaved, so
/// there's nothing to stream chunk-by-chunk (§6).
pub fn reader_for_streaming<R: Read + Seek>(source: R) -> Result<StreamReader<R>> {
    StreamReader::new(source)
}
