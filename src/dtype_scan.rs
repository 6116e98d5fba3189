//! Forward scan for channel data-type headers (component F), grounded on
//! `header_reader.py::scan_for_dtype_headers` / `dtype_header_reader.py`.
//!
//! The dtype headers are supposed to sit right after the foreign data
//! header, but some real files have unaccounted-for bytes in between. This
//! walks forward one byte at a time and accepts the first offset where
//! every channel's dtype header looks plausible.

use crate::header::ChannelDTypeHeader;
use crate::header_reader::HeaderReader;
use std::io::{Read, Seek};

/// How far past the foreign data header to look before giving up.
pub const MAX_DTYPE_SCANS: usize = 4096;

pub fn scan_for_dtype_headers<R: Read + Seek>(
    hr: &mut HeaderReader<R>,
    start_index: u64,
    channel_count: usize,
) -> std::io::Result<Option<(Vec<ChannelDTypeHeader>, u64)>> {
    for i in 0..MAX_DTYPE_SCANS as u64 {
        let candidate_offset = start_index + i;
        let order = hr.order;
        let headers = hr.multi_headers(channel_count, candidate_offset, |hr, offset| {
            hr.seek_to(offset)?;
            ChannelDTypeHeader::read(hr.source, order)
        })?;
        if headers.iter().all(ChannelDTypeHeader::possibly_valid) {
            let data_start_offset = hr.position()?;
            return Ok(Some((headers, data_start_offset)));
        }
    }
    log::warn!("couldn't find valid dtype headers after {} scans", MAX_DTYPE_SCANS);
    Ok(None)
}
