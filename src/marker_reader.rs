//! Marker section reader (component G), grounded on
//! `original_source/bioread/marker_reader.py`.
//!
//! V2 files carry an optional trailing metadata block keyed by marker index
//! (color, tag), recognized by a sentinel tag that happens to be the same
//! bytes `V2JournalHeader` checks for -- when it's absent the stream is
//! rewound so the journal reader picks up at the same offset. V4 files don't
//! have a separate metadata block; color/tag live nowhere in this format.

use crate::byte_order::{decode_text, read_bytes};
use crate::header::{
    V2JournalHeader, V2MarkerHeader, V2MarkerItemHeader, V2MarkerMetadataHeader,
    V2MarkerMetadataPreHeader, V4MarkerHeader, V4MarkerItemHeader,
};
use crate::header_reader::HeaderReader;
use crate::revision::{V_381, V_400B};
use std::io::{Read, Seek};

#[derive(Debug, Clone)]
pub struct EventMarker {
    pub sample_index: i32,
    pub time_index: f64,
    pub text: String,
    pub channel_number: Option<i16>,
    /// Resolved index into `Datafile::channels`, bound after all channels
    /// are known -- the reader itself only ever sees `channel_number`.
    pub channel: Option<usize>,
    pub date_created_ms: Option<u64>,
    pub type_code: Option<String>,
    pub label: Option<&'static str>,
    pub rgba_color: Option<[u8; 4]>,
    pub tag: Option<i16>,
}

/// Equality per spec: `(sample_index, text, channel_number, type_code)`
/// only. `#[derive(PartialEq)]` would be wrong here -- it would also compare
/// `time_index` (a derived value), `channel` (a resolved-later index),
/// `label` (derived from `type_code`), and `rgba_color`/`tag` (pre-4 only,
/// absent for post-4 markers that are otherwise equal).
impl PartialEq for EventMarker {
    fn eq(&self, other: &Self) -> bool {
        self.sample_index == other.sample_index
            && self.text == other.text
            && self.channel_number == other.channel_number
            && self.type_code == other.type_code
    }
}

pub fn read_markers<R: Read + Seek>(
    hr: &mut HeaderReader<R>,
    marker_start_offset: u64,
    sample_time: f64,
) -> crate::errors::Result<Vec<EventMarker>> {
    if hr.revision < V_400B {
        read_markers_v2(hr, marker_start_offset, sample_time)
    } else {
        read_markers_v4(hr, marker_start_offset, sample_time)
    }
}

fn read_markers_v2<R: Read + Seek>(
    hr: &mut HeaderReader<R>,
    marker_start_offset: u64,
    sample_time: f64,
) -> crate::errors::Result<Vec<EventMarker>> {
    let order = hr.order;
    let marker_header =
        hr.single_header(marker_start_offset, |hr, _| V2MarkerHeader::read(hr.source, order))?;
    let mut markers = read_marker_items_v2(hr, marker_header.marker_count().max(0) as usize, sample_time)?;
    if hr.revision >= V_381 {
        apply_v2_metadata(hr, &mut markers)?;
    }
    Ok(markers)
}

fn read_marker_items_v2<R: Read + Seek>(
    hr: &mut HeaderReader<R>,
    marker_count: usize,
    sample_time: f64,
) -> crate::errors::Result<Vec<EventMarker>> {
    let (order, revision, utf8) = (hr.order, hr.revision, hr.utf8);
    let mut markers = Vec::with_capacity(marker_count);
    for _ in 0..marker_count {
        let offset = hr.position()?;
        let mih = hr.single_header(offset, |hr, _| V2MarkerItemHeader::read(hr.source, revision, order))?;
        // Marker text follows each item header sequentially, not at a
        // computed offset -- the next item simply starts wherever this read
        // left the stream.
        let text_bytes = read_bytes(hr.source, mih.text_length().max(0) as usize)?;
        let text = decode_text(&text_bytes, utf8);
        markers.push(EventMarker {
            sample_index: mih.sample_index(),
            time_index: mih.sample_index() as f64 * sample_time / 1000.0,
            text,
            channel_number: mih.channel_number(),
            channel: None,
            date_created_ms: mih.date_created_ms(),
            type_code: mih.type_code(),
            label: mih.type_code().as_deref().map(crate::marker_types::label_for),
            rgba_color: None,
            tag: None,
        });
    }
    Ok(markers)
}

fn apply_v2_metadata<R: Read + Seek>(
    hr: &mut HeaderReader<R>,
    markers: &mut [EventMarker],
) -> crate::errors::Result<()> {
    let order = hr.order;
    let pre_offset = hr.position()?;
    let pre = hr.single_header(pre_offset, |hr, _| V2MarkerMetadataPreHeader::read(hr.source, order))?;

    if pre.tag() == V2JournalHeader::TAG {
        // No metadata block after all -- what we just read is actually the
        // start of the journal section. Rewind so the journal reader sees
        // the tag at its expected offset.
        hr.seek_to(pre_offset)?;
        return Ok(());
    }

    let item_count = pre.item_count().max(0) as usize;
    let start = hr.position()?;
    let metadata_headers =
        hr.multi_headers(item_count, start, |hr, _| V2MarkerMetadataHeader::read(hr.source, order))?;
    for mh in metadata_headers {
        let idx = mh.marker_index();
        if idx < 0 {
            continue;
        }
        if let Some(marker) = markers.get_mut(idx as usize) {
            marker.rgba_color = Some(mh.rgba_color());
            marker.tag = Some(mh.marker_tag());
        }
    }
    Ok(())
}

fn read_markers_v4<R: Read + Seek>(
    hr: &mut HeaderReader<R>,
    marker_start_offset: u64,
    sample_time: f64,
) -> crate::errors::Result<Vec<EventMarker>> {
    let (order, revision) = (hr.order, hr.revision);
    let marker_header =
        hr.single_header(marker_start_offset, |hr, _| V4MarkerHeader::read(hr.source, revision, order))?;
    read_marker_items_v4(hr, marker_header.marker_count().max(0) as usize, sample_time)
}

fn read_marker_items_v4<R: Read + Seek>(
    hr: &mut HeaderReader<R>,
    marker_count: usize,
    sample_time: f64,
) -> crate::errors::Result<Vec<EventMarker>> {
    let (order, revision, utf8) = (hr.order, hr.revision, hr.utf8);
    let mut markers = Vec::with_capacity(marker_count);
    for _ in 0..marker_count {
        let offset = hr.position()?;
        let mih = hr.single_header(offset, |hr, _| V4MarkerItemHeader::read(hr.source, revision, order, utf8))?;
        let text_bytes = read_bytes(hr.source, mih.text_length().max(0) as usize)?;
        let text = decode_text(&text_bytes, utf8);
        markers.push(EventMarker {
            sample_index: mih.sample_index(),
            time_index: mih.sample_index() as f64 * sample_time / 1000.0,
            text,
            channel_number: mih.channel_number(),
            channel: None,
            date_created_ms: mih.date_created_ms(),
            type_code: mih.type_code(),
            label: mih.type_code().as_deref().map(crate::marker_types::label_for),
            rgba_color: None,
            tag: None,
        });
    }
    Ok(markers)
}
