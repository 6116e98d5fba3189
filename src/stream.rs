//! Streaming interface (component L), grounded on
//! `original_source/bioread/data_reader.py` (`DataReader.stream`,
//! `make_chunk_reader`, `read_chunks`) and `__init__.py::reader_for_streaming`.
//!
//! A pull iterator: the consumer drives pacing, there's no backpressure
//! negotiation, and it's single-pass (re-seeking would be needed to restart
//! it). Refused outright for compressed files, since compressed channels
//! aren't interleaved at all -- there's nothing to stream chunk-by-chunk.

use crate::byte_order::ByteOrder;
use crate::data::demux;
use crate::datafile::Datafile;
use crate::errors::{AcqError, Result};
use crate::reader::decode_headers;
use std::io::{self, Read, Seek, SeekFrom};
use std::ops::Range;

/// One channel's share of a chunk: its index, the decoded values, and the
/// slice of the channel's hypothetical full array those values belong at
/// (so a consumer can write directly into e.g. an external HDF5 dataset).
#[derive(Debug, Clone)]
pub struct ChunkSlice {
    pub channel: usize,
    pub values: Vec<f64>,
    pub range: Range<usize>,
}

/// Reader handle returned by `reader_for_streaming`. Holds the decoded
/// headers and the still-open byte source.
pub struct StreamReader<R: Read + Seek> {
    source: R,
    pub datafile: Datafile,
}

impl<R: Read + Seek> StreamReader<R> {
    /// Reads headers from `source` and wraps it for streaming. Fails if the
    /// file turns out to be compressed (§6).
    pub fn new(mut source: R) -> Result<Self> {
        let (datafile, _errors) = decode_headers(&mut source);
        if datafile.is_compressed {
            return Err(AcqError::StreamingCompressedFile);
        }
        Ok(StreamReader { source, datafile })
    }

    /// Produces a finite, single-pass iterator of chunk buffers starting
    /// from the data section. `target_chunk_size` defaults to
    /// `demux::CHUNK_SIZE` (256 KiB) when `None`.
    pub fn stream(
        &mut self,
        channel_indexes: Option<&[usize]>,
        target_chunk_size: Option<usize>,
    ) -> io::Result<ChunkStream<'_, R>> {
        self.source.seek(SeekFrom::Start(self.datafile.data_start_offset))?;
        let channel_count = self.datafile.channels.len();
        let wanted: Vec<usize> = match channel_indexes {
            Some(idx) => idx.to_vec(),
            None => (0..channel_count).collect(),
        };
        let dividers: Vec<u32> = self.datafile.channels.iter().map(|c| c.frequency_divider).collect();
        let sizes: Vec<usize> = self.datafile.channels.iter().map(|c| c.sample_size).collect();
        let remaining: Vec<i64> = self.datafile.channels.iter().map(|c| c.data_length() as i64).collect();
        let is_float: Vec<bool> = self.datafile.channels.iter().map(|c| c.is_float).collect();
        let target = target_chunk_size.unwrap_or(demux::CHUNK_SIZE);
        let byte_pattern = demux::chunk_byte_pattern(&dividers, &sizes, target);

        Ok(ChunkStream {
            source: &mut self.source,
            byte_pattern,
            remaining,
            wanted,
            is_float,
            consumed: vec![0; channel_count],
            order: self.datafile.byte_order,
            done: false,
        })
    }
}

/// The pull iterator itself. Each `next()` reads one chunk's worth of
/// interleaved bytes, demultiplexes it, and yields one `ChunkSlice` per
/// requested channel that received bytes this chunk.
pub struct ChunkStream<'a, R: Read> {
    source: &'a mut R,
    byte_pattern: Vec<usize>,
    remaining: Vec<i64>,
    wanted: Vec<usize>,
    is_float: Vec<bool>,
    consumed: Vec<usize>,
    order: ByteOrder,
    done: bool,
}

impl<'a, R: Read> Iterator for ChunkStream<'a, R> {
    type Item = io::Result<Vec<ChunkSlice>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.remaining.iter().sum::<i64>() <= 0 {
            self.done = true;
            return None;
        }

        let pattern = demux::chunk_pattern(&self.byte_pattern, &self.remaining);
        if pattern.is_empty() {
            self.done = true;
            return None;
        }

        let mut data = vec![0u8; pattern.len()];
        let read = match read_fully(self.source, &mut data) {
            Ok(n) => n,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };
        if read == 0 {
            self.done = true;
            return None;
        }
        data.truncate(read);
        let trimmed_pattern = &pattern[..read];

        let channel_count = self.remaining.len();
        let mut per_channel_bytes: Vec<Vec<u8>> = vec![Vec::new(); channel_count];
        for (&channel, &byte) in trimmed_pattern.iter().zip(&data) {
            per_channel_bytes[channel].push(byte);
        }

        let mut slices = Vec::new();
        for &channel in &self.wanted {
            let bytes = &per_channel_bytes[channel];
            if bytes.is_empty() {
                continue;
            }
            let values = demux::decode_samples(bytes, self.order, self.is_float[channel]);
            let start = self.consumed[channel];
            let end = start + values.len();
            self.consumed[channel] = end;
            slices.push(ChunkSlice { channel, values, range: start..end });
        }

        let mut counts = vec![0i64; channel_count];
        for &channel in trimmed_pattern {
            counts[channel] += 1;
        }
        for (r, c) in self.remaining.iter_mut().zip(counts) {
            *r -= c;
        }

        if read < pattern.len() {
            self.done = true;
        }

        Some(Ok(slices))
    }
}

fn read_fully<R: Read>(source: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match source.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_stream_concatenates_to_the_same_arrays_as_a_full_read() {
        // Two channels, frequency dividers [1, 1], 3 interleaved i16 samples each.
        let mut raw = Vec::new();
        for v in [1i16, 10, 2, 20, 3, 30] {
            raw.extend_from_slice(&v.to_le_bytes());
        }
        let byte_pattern = demux::chunk_byte_pattern(&[1, 1], &[2, 2], 3);
        let mut cursor = io::Cursor::new(raw);
        let mut chunk_stream = ChunkStream {
            source: &mut cursor,
            byte_pattern,
            remaining: vec![6, 6],
            wanted: vec![0, 1],
            is_float: vec![false, false],
            consumed: vec![0, 0],
            order: ByteOrder::Little,
            done: false,
        };

        let mut ch0 = Vec::new();
        let mut ch1 = Vec::new();
        for chunk in &mut chunk_stream {
            for slice in chunk.unwrap() {
                match slice.channel {
                    0 => ch0.extend(slice.values),
                    1 => ch1.extend(slice.values),
                    _ => unreachable!(),
                }
            }
        }

        assert_eq!(ch0, vec![1.0, 2.0, 3.0]);
        assert_eq!(ch1, vec![10.0, 20.0, 30.0]);
    }
}
