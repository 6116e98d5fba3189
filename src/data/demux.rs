//! Interleaved uncompressed sample data (component I), grounded on
//! `original_source/bioread/data_reader.py`'s `sample_pattern`,
//! `chunk_byte_pattern`, `chunk_pattern`, and `read_chunks`.
//!
//! The original builds these patterns as numpy boolean masks; nothing here
//! needs vectorized array math, so the same algorithm is expressed as plain
//! index bookkeeping over `Vec<usize>` (SPEC_FULL.md §4.I).

use crate::byte_order::ByteOrder;
use std::io::{self, Read};

/// Samples are read in chunks of roughly this many bytes at a time.
pub const CHUNK_SIZE: usize = 1024 * 256;

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

fn lcm(a: u64, b: u64) -> u64 {
    a / gcd(a, b) * b
}

/// One full period of the interleaving pattern: which channel (by index)
/// contributes the next sample, repeated `lcm(frequency_dividers)` times.
/// `sample_pattern(&[1, 4, 2])` is `[0, 1, 2, 0, 0, 2, 0]`.
pub fn sample_pattern(frequency_dividers: &[u32]) -> Vec<usize> {
    let base_len = frequency_dividers
        .iter()
        .fold(1u64, |acc, &d| lcm(acc, d.max(1) as u64));
    let mut pattern = Vec::new();
    for slot in 0..base_len {
        for (channel, &divider) in frequency_dividers.iter().enumerate() {
            if slot % divider.max(1) as u64 == 0 {
                pattern.push(channel);
            }
        }
    }
    pattern
}

/// Expands a sample pattern into a byte-index pattern (each sample-slot's
/// channel index repeated by that channel's dtype byte width), then tiles it
/// to approximate `target_chunk_size`.
pub fn chunk_byte_pattern(
    frequency_dividers: &[u32],
    sample_sizes: &[usize],
    target_chunk_size: usize,
) -> Vec<usize> {
    let spat = sample_pattern(frequency_dividers);
    let mut byte_pattern = Vec::new();
    for channel in spat {
        for _ in 0..sample_sizes[channel] {
            byte_pattern.push(channel);
        }
    }
    let reps = chunk_pattern_reps(byte_pattern.len(), target_chunk_size);
    let mut tiled = Vec::with_capacity(byte_pattern.len() * reps);
    for _ in 0..reps {
        tiled.extend_from_slice(&byte_pattern);
    }
    tiled
}

pub fn chunk_pattern_reps(pattern_byte_length: usize, target_chunk_size: usize) -> usize {
    (target_chunk_size / pattern_byte_length.max(1)).max(1)
}

fn bincount(pattern: &[usize], channel_count: usize) -> Vec<u64> {
    let mut counts = vec![0u64; channel_count];
    for &c in pattern {
        counts[c] += 1;
    }
    counts
}

/// Trims `byte_pattern` near EOF so no channel is asked to read past its
/// remaining byte budget. Returns the full pattern unchanged when every
/// channel still has room for a whole repetition of it.
pub fn chunk_pattern(byte_pattern: &[usize], channel_bytes_remaining: &[i64]) -> Vec<usize> {
    let counts = bincount(byte_pattern, channel_bytes_remaining.len());
    if counts
        .iter()
        .zip(channel_bytes_remaining)
        .all(|(&count, &remaining)| count as i64 <= remaining)
    {
        return byte_pattern.to_vec();
    }

    let mut keep = vec![false; byte_pattern.len()];
    for (channel, &remaining) in channel_bytes_remaining.iter().enumerate() {
        let mut taken = 0i64;
        for (idx, &c) in byte_pattern.iter().enumerate() {
            if c != channel {
                continue;
            }
            if taken >= remaining {
                break;
            }
            keep[idx] = true;
            taken += 1;
        }
    }
    byte_pattern
        .iter()
        .zip(keep)
        .filter_map(|(&c, k)| k.then_some(c))
        .collect()
}

/// Per-channel accumulator for the interleaved read loop. Bytes gathered
/// each chunk are appended in occurrence order, which is exactly the order
/// the channel's samples land in.
#[derive(Default)]
pub struct ChunkBuffer {
    pub bytes: Vec<u8>,
}

/// Reads interleaved channel data from `source` into one `ChunkBuffer` per
/// requested channel. `channel_indexes` may be a subset of all channels in
/// the file -- the pattern accounting still walks every channel's data so
/// the file position stays correct, but only requested channels keep bytes.
pub fn read_uncompressed<R: Read>(
    source: &mut R,
    frequency_dividers: &[u32],
    sample_sizes: &[usize],
    channel_data_lengths: &[usize],
    channel_indexes: &[usize],
) -> io::Result<Vec<ChunkBuffer>> {
    let channel_count = frequency_dividers.len();
    let byte_pattern = chunk_byte_pattern(frequency_dividers, sample_sizes, CHUNK_SIZE);
    let mut remaining: Vec<i64> = channel_data_lengths.iter().map(|&n| n as i64).collect();

    let mut buffers: Vec<ChunkBuffer> = (0..channel_count).map(|_| ChunkBuffer::default()).collect();
    let wanted: std::collections::HashSet<usize> = channel_indexes.iter().copied().collect();

    while remaining.iter().sum::<i64>() > 0 {
        let pattern = chunk_pattern(&byte_pattern, &remaining);
        if pattern.is_empty() {
            break;
        }
        let mut data = vec![0u8; pattern.len()];
        let read = read_as_much_as_possible(source, &mut data)?;
        if read == 0 {
            break;
        }
        data.truncate(read);
        let trimmed_pattern = &pattern[..read];

        for (&channel, &byte) in trimmed_pattern.iter().zip(&data) {
            if wanted.contains(&channel) {
                buffers[channel].bytes.push(byte);
            }
        }

        let counts = bincount(trimmed_pattern, channel_count);
        for (r, c) in remaining.iter_mut().zip(counts) {
            *r -= c as i64;
        }

        if read < pattern.len() {
            break;
        }
    }

    Ok(buffers)
}

fn read_as_much_as_possible<R: Read>(source: &mut R, buf: &mut [u8]) -> io::Result<usize> {
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

/// Reinterprets gathered raw bytes as typed samples, honoring the file's
/// detected byte order (uncompressed data is stored in whichever order the
/// bootstrap step detected, unlike compressed channel data).
pub fn decode_samples(bytes: &[u8], order: ByteOrder, is_float: bool) -> Vec<f64> {
    use std::io::Cursor;
    let mut cursor = Cursor::new(bytes);
    let mut out = Vec::new();
    if is_float {
        while (cursor.position() as usize) < bytes.len() {
            match order.read_f64(&mut cursor) {
                Ok(v) => out.push(v),
                Err(_) => break,
            }
        }
    } else {
        while (cursor.position() as usize) < bytes.len() {
            match order.read_i16(&mut cursor) {
                Ok(v) => out.push(v as f64),
                Err(_) => break,
            }
        }
    }
    out
}
