//! Layout walker / orchestrator: drives the header reader through the fixed
//! read order -- bootstrap, graph, padding, channels, foreign, dtypes,
//! markers, journal, compression headers. Recoverable failures are pushed
//! onto a `DecodeErrors` collector and decoding continues; the two fatal
//! conditions (bootstrap failure, no valid dtype header set) abort and
//! return whatever partial datafile could be built.

use crate::bootstrap;
use crate::byte_order::ByteOrder;
use crate::data;
use crate::datafile::{Channel, Datafile};
use crate::dtype_scan;
use crate::errors::DecodeErrors;
use crate::header::{
    ChannelCompressionHeader, ChannelHeader, ForeignHeader, GraphHeader, Header,
    MainCompressionHeader, UnknownPaddingHeader,
};
use crate::header_reader::HeaderReader;
use crate::journal_reader;
use crate::marker_reader;
use crate::revision::V_430;
use std::io::{Read, Seek, SeekFrom};

/// Reads every header in the file and assembles a `Datafile`. Channel
/// buffers are left unallocated -- see `read_data` for that.
pub fn decode_headers<R: Read + Seek>(source: &mut R) -> (Datafile, DecodeErrors) {
    let mut errors = DecodeErrors::new();

    let bootstrap = match bootstrap::detect(source) {
        Ok(b) => b,
        Err(_) => {
            errors.push("could not determine byte order and revision for this file");
            return (Datafile::empty(0, ByteOrder::Little), errors);
        }
    };
    let mut hr = HeaderReader::new(source, bootstrap.revision, bootstrap.order, bootstrap.utf8);
    let (revision, order) = (bootstrap.revision, bootstrap.order);

    // 2. Graph header at offset 0.
    let graph = match hr.single_header(0, |hr, _| GraphHeader::read(hr.source, revision, order)) {
        Ok(g) => g,
        Err(e) => {
            errors.push(format!("malformed graph header: {e}"));
            return (Datafile::empty(revision, order), errors);
        }
    };
    let channel_count = graph.channel_count().max(0) as usize;
    let mut cursor = graph.effective_len_bytes();

    // 3. Unknown padding headers (revision >= V_430 only).
    if revision >= V_430 {
        let padding_count = graph.expected_padding_headers(revision).max(0) as usize;
        match hr.multi_headers(padding_count, cursor, |hr, off| {
            hr.seek_to(off)?;
            UnknownPaddingHeader::read(hr.source, order)
        }) {
            Ok(paddings) => cursor += paddings.iter().map(Header::effective_len_bytes).sum::<u64>(),
            Err(e) => errors.push(format!("malformed padding header: {e}")),
        }
    }

    // 4. Channel headers.
    let channel_headers = match hr.multi_headers(channel_count, cursor, |hr, off| {
        hr.seek_to(off)?;
        ChannelHeader::read(hr.source, revision, order, bootstrap.utf8)
    }) {
        Ok(chs) => chs,
        Err(e) => {
            errors.push(format!("malformed channel header: {e}"));
            return (Datafile::empty(revision, order), errors);
        }
    };
    cursor += channel_headers.iter().map(Header::effective_len_bytes).sum::<u64>();

    // 5. Foreign-data header (always exactly one).
    let foreign = match hr.single_header(cursor, |hr, _| ForeignHeader::read(hr.source, revision, order)) {
        Ok(f) => f,
        Err(e) => {
            errors.push(format!("malformed foreign header: {e}"));
            return (Datafile::empty(revision, order), errors);
        }
    };
    cursor += foreign.effective_len_bytes();

    // 6. Scan for channel data-type headers.
    let (dtype_headers, data_start_offset) =
        match dtype_scan::scan_for_dtype_headers(&mut hr, cursor, channel_count) {
            Ok(Some(found)) => found,
            Ok(None) => {
                errors.push("no valid channel data-type header found within the scan budget");
                return (Datafile::empty(revision, order), errors);
            }
            Err(e) => {
                errors.push(format!("error scanning for dtype headers: {e}"));
                return (Datafile::empty(revision, order), errors);
            }
        };

    let base_samples_per_second = 1000.0 / graph.sample_time();
    let channels: Vec<Channel> = channel_headers
        .iter()
        .zip(dtype_headers.iter())
        .map(|(ch, dt)| Channel::from_headers(ch, dt, base_samples_per_second))
        .collect();

    // 7. Uncompressed data length, and thus where markers begin.
    let is_compressed = graph.compressed();
    let data_length_bytes: u64 = if is_compressed {
        0
    } else {
        channels.iter().map(|c| c.data_length() as u64).sum()
    };
    let marker_start_offset = data_start_offset + data_length_bytes;

    // 8. Markers.
    let mut event_markers =
        match marker_reader::read_markers(&mut hr, marker_start_offset, graph.sample_time()) {
            Ok(m) => m,
            Err(e) => {
                errors.push(format!("marker section is inconsistent: {e}"));
                Vec::new()
            }
        };
    let order_map: std::collections::HashMap<i16, usize> = channels
        .iter()
        .enumerate()
        .map(|(i, c)| (c.order_num, i))
        .collect();
    for marker in &mut event_markers {
        marker.channel = marker.channel_number.and_then(|n| order_map.get(&n).copied());
    }

    // 9. Journal (never aborts the rest of the walk).
    let journal = match journal_reader::read_journal(&mut hr) {
        Ok(result) => result.text,
        Err(e) => {
            errors.push(format!("journal read error: {e}"));
            None
        }
    };

    // 10. Compression headers, compressed files only.
    let mut channel_compression_headers = Vec::new();
    if is_compressed {
        match read_compression_headers(&mut hr, channel_count) {
            Ok((_main, cch)) => channel_compression_headers = cch,
            Err(e) => errors.push(format!("malformed compression header: {e}")),
        }
    }

    let datafile = Datafile::new(
        revision,
        order,
        is_compressed,
        base_samples_per_second,
        channels,
        event_markers,
        journal,
        data_start_offset,
        channel_compression_headers,
    );
    (datafile, errors)
}

fn read_compression_headers<R: Read + Seek>(
    hr: &mut HeaderReader<R>,
    channel_count: usize,
) -> std::io::Result<(MainCompressionHeader, Vec<ChannelCompressionHeader>)> {
    let offset = hr.position()?;
    let (revision, order) = (hr.revision, hr.order);
    let main = hr.single_header(offset, |hr, _| MainCompressionHeader::read(hr.source, revision, order))?;
    let cch_start = offset + main.effective_len_bytes();
    let channel_headers = hr.multi_headers(channel_count, cch_start, |hr, off| {
        hr.seek_to(off)?;
        ChannelCompressionHeader::read(hr.source, order, off)
    })?;
    Ok((main, channel_headers))
}

/// Materializes channel sample buffers (full read mode). Each failure is
/// recorded and the remaining channels are still attempted -- a zlib
/// failure in one compressed channel, for instance, doesn't block the
/// others.
pub fn read_data<R: Read + Seek>(
    source: &mut R,
    datafile: &mut Datafile,
    channel_indexes: Option<&[usize]>,
    errors: &mut DecodeErrors,
) {
    let channel_count = datafile.channels.len();
    let wanted: Vec<usize> = match channel_indexes {
        Some(idx) => idx.to_vec(),
        None => (0..channel_count).collect(),
    };

    if datafile.is_compressed {
        for &i in &wanted {
            let Some(header) = datafile.channel_compression_headers.get(i).cloned() else {
                errors.push(format!("no compression header for channel {i}"));
                continue;
            };
            let is_float = datafile.channels[i].is_float;
            match data::compressed::read_compressed_channel(source, &header, is_float) {
                Ok(samples) => datafile.channels[i].set_raw_data(samples),
                Err(e) => errors.push(format!("zlib failure in channel {i}: {e}")),
            }
        }
        return;
    }

    if let Err(e) = source.seek(SeekFrom::Start(datafile.data_start_offset)) {
        errors.push(format!("truncated payload: {e}"));
        return;
    }
    let dividers: Vec<u32> = datafile.channels.iter().map(|c| c.frequency_divider).collect();
    let sizes: Vec<usize> = datafile.channels.iter().map(|c| c.sample_size).collect();
    let lengths: Vec<usize> = datafile.channels.iter().map(Channel::data_length).collect();

    match data::demux::read_uncompressed(source, &dividers, &sizes, &lengths, &wanted) {
        Ok(buffers) => {
            for &i in &wanted {
                let is_float = datafile.channels[i].is_float;
                let samples = data::demux::decode_samples(&buffers[i].bytes, datafile.byte_order, is_float);
                if samples.len() < datafile.channels[i].point_count {
                    errors.push(format!(
                        "truncated payload: channel {i} got {} of {} samples",
                        samples.len(),
                        datafile.channels[i].point_count
                    ));
                }
                datafile.channels[i].set_raw_data(samples);
            }
        }
        Err(e) => errors.push(format!("truncated payload: {e}")),
    }
}

/// Full read: headers plus sample data for the requested channels (all of
/// them, if `channel_indexes` is `None`).
pub fn read<R: Read + Seek>(mut source: R, channel_indexes: Option<&[usize]>) -> (Datafile, Vec<String>) {
    let (mut datafile, mut errors) = decode_headers(&mut source);
    read_data(&mut source, &mut datafile, channel_indexes, &mut errors);
    (datafile, errors.into_vec())
}

/// Header-only read: channel buffers remain unallocated.
pub fn read_headers<R: Read + Seek>(mut source: R) -> (Datafile, Vec<String>) {
    let (datafile, errors) = decode_headers(&mut source);
    (datafile, errors.into_vec())
}
