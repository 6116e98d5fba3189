//! Datafile model (component K), grounded on
//! `original_source/bioread/biopac.py` (`Datafile`, `Channel`); the
//! aggregate-with-lazy-accessors shape follows `rscil/src/metadata/image.rs`
//! (`PeImage`).

use crate::header::{ChannelCompressionHeader, ChannelDTypeHeader, ChannelHeader};
use crate::marker_reader::EventMarker;
use crate::byte_order::ByteOrder;
use std::cell::OnceCell;
use std::collections::HashMap;

/// One channel's metadata plus its (possibly unallocated) sample buffer.
///
/// `raw_data` is `None` until a read is requested -- headers-only decoding
/// never allocates it. `data()`/`upsampled_data()` are computed from
/// `raw_data` on first access and cached; `free_data()` drops both the raw
/// buffer and the caches.
#[derive(Debug)]
pub struct Channel {
    pub order_num: i16,
    pub name: String,
    pub units: String,
    pub point_count: usize,
    pub frequency_divider: u32,
    pub raw_scale: f64,
    pub raw_offset: f64,
    pub is_float: bool,
    pub sample_size: usize,
    pub samples_per_second: f64,
    raw_data: Option<Vec<f64>>,
    data_cache: OnceCell<Vec<f64>>,
    upsampled_cache: OnceCell<Vec<f64>>,
}

impl Channel {
    pub(crate) fn from_headers(
        ch: &ChannelHeader,
        dt: &ChannelDTypeHeader,
        base_samples_per_second: f64,
    ) -> Self {
        let divider = ch.frequency_divider().max(1) as u32;
        Channel {
            order_num: ch.order_num(),
            name: ch.name().to_string(),
            units: ch.units().to_string(),
            point_count: ch.point_count().max(0) as usize,
            frequency_divider: divider,
            raw_scale: ch.raw_scale(),
            raw_offset: ch.raw_offset(),
            is_float: dt.is_float(),
            sample_size: dt.sample_size().max(0) as usize,
            samples_per_second: base_samples_per_second / divider as f64,
            raw_data: None,
            data_cache: OnceCell::new(),
            upsampled_cache: OnceCell::new(),
        }
    }

    /// Size, in bytes, of this channel's entire raw data stream.
    pub fn data_length(&self) -> usize {
        self.sample_size * self.point_count
    }

    pub fn raw_data(&self) -> Option<&[f64]> {
        self.raw_data.as_deref()
    }

    pub(crate) fn set_raw_data(&mut self, data: Vec<f64>) {
        self.raw_data = Some(data);
        self.data_cache = OnceCell::new();
        self.upsampled_cache = OnceCell::new();
    }

    /// Drops the raw buffer and any derived caches built from it.
    pub fn free_data(&mut self) {
        self.raw_data = None;
        self.data_cache = OnceCell::new();
        self.upsampled_cache = OnceCell::new();
    }

    /// Scaled data: `raw * scale + offset` for integer channels, `raw`
    /// unchanged for float channels (the on-file scale/offset for floats
    /// are ignored even if non-trivial, per the format's own convention).
    pub fn data(&self) -> Option<&[f64]> {
        let raw = self.raw_data.as_ref()?;
        let (scale, offset) = if self.is_float {
            (1.0, 0.0)
        } else {
            (self.raw_scale, self.raw_offset)
        };
        Some(
            self.data_cache
                .get_or_init(|| raw.iter().map(|v| v * scale + offset).collect())
                .as_slice(),
        )
    }

    /// Nearest-neighbor repetition of `data()` at the file's base rate.
    pub fn upsampled_data(&self) -> Option<&[f64]> {
        let data = self.data()?;
        let divider = self.frequency_divider.max(1) as usize;
        Some(
            self.upsampled_cache
                .get_or_init(|| {
                    let total = data.len() * divider;
                    (0..total).map(|i| data[i / divider]).collect()
                })
                .as_slice(),
        )
    }

    /// `time_index[::frequency_divider][:point_count]` expressed directly:
    /// `k / samples_per_second` for `k` in `[0, point_count)`.
    pub fn time_index(&self) -> Vec<f64> {
        (0..self.point_count)
            .map(|k| k as f64 / self.samples_per_second)
            .collect()
    }
}

/// The root aggregate produced by a decode session.
pub struct Datafile {
    pub revision: i32,
    pub version_label: String,
    pub byte_order: ByteOrder,
    pub is_compressed: bool,
    /// Samples per second at the base (undivided) rate.
    pub samples_per_second: f64,
    pub channels: Vec<Channel>,
    pub event_markers: Vec<EventMarker>,
    pub journal: Option<String>,
    pub(crate) data_start_offset: u64,
    pub(crate) channel_compression_headers: Vec<ChannelCompressionHeader>,
    named_channels_cache: OnceCell<HashMap<String, usize>>,
}

impl Datafile {
    pub(crate) fn new(
        revision: i32,
        byte_order: ByteOrder,
        is_compressed: bool,
        samples_per_second: f64,
        channels: Vec<Channel>,
        event_markers: Vec<EventMarker>,
        journal: Option<String>,
        data_start_offset: u64,
        channel_compression_headers: Vec<ChannelCompressionHeader>,
    ) -> Self {
        Datafile {
            version_label: crate::revision::version_string_guess(revision),
            revision,
            byte_order,
            is_compressed,
            samples_per_second,
            channels,
            event_markers,
            journal,
            data_start_offset,
            channel_compression_headers,
            named_channels_cache: OnceCell::new(),
        }
    }

    /// An empty, channel-less datafile for fatal-decode-error paths --
    /// §7's "a fatal header error aborts further decoding and the partial
    /// datafile is returned with the error recorded".
    pub(crate) fn empty(revision: i32, byte_order: ByteOrder) -> Self {
        Datafile::new(revision, byte_order, false, 0.0, Vec::new(), Vec::new(), None, 0, Vec::new())
    }

    pub fn channel_order_map(&self) -> HashMap<i16, usize> {
        self.channels
            .iter()
            .enumerate()
            .map(|(i, c)| (c.order_num, i))
            .collect()
    }

    /// Channel name -> index, built lazily. Last writer wins on collision,
    /// matching insertion in declaration order.
    pub fn named_channels(&self) -> &HashMap<String, usize> {
        self.named_channels_cache.get_or_init(|| {
            let mut map = HashMap::new();
            for (i, c) in self.channels.iter().enumerate() {
                map.insert(c.name.clone(), i);
            }
            map
        })
    }

    /// 0 if compressed, else the sum of every channel's raw byte length.
    pub fn data_length(&self) -> usize {
        if self.is_compressed {
            0
        } else {
            self.channels.iter().map(Channel::data_length).sum()
        }
    }

    /// A time axis of `max(point_count * frequency_divider)` evenly spaced
    /// seconds from 0 to the recording's total duration, at the base rate.
    pub fn time_index(&self) -> Vec<f64> {
        let max_points = self
            .channels
            .iter()
            .map(|c| c.point_count * c.frequency_divider as usize)
            .max()
            .unwrap_or(0);
        (0..max_points).map(|n| n as f64 / self.samples_per_second).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(point_count: usize, divider: u32, scale: f64, offset: f64, is_float: bool) -> Channel {
        Channel {
            order_num: 0,
            name: "chan".to_string(),
            units: "V".to_string(),
            point_count,
            frequency_divider: divider,
            raw_scale: scale,
            raw_offset: offset,
            is_float,
            sample_size: if is_float { 8 } else { 2 },
            samples_per_second: 1000.0 / divider as f64,
            raw_data: None,
            data_cache: OnceCell::new(),
            upsampled_cache: OnceCell::new(),
        }
    }

    #[test]
    fn scaled_data_applies_scale_and_offset_for_integer_channels() {
        let mut c = channel(3, 1, 0.5, 1.0, false);
        c.set_raw_data(vec![0.0, 1.0, 2.0]);
        assert_eq!(c.data().unwrap(), &[1.0, 1.5, 2.0]);
    }

    #[test]
    fn float_channels_ignore_scale_and_offset() {
        let mut c = channel(2, 1, 99.0, 99.0, true);
        c.set_raw_data(vec![3.5, -1.25]);
        assert_eq!(c.data().unwrap(), &[3.5, -1.25]);
    }

    #[test]
    fn upsampled_data_repeats_by_frequency_divider() {
        let mut c = channel(2, 3, 1.0, 0.0, true);
        c.set_raw_data(vec![10.0, 20.0]);
        assert_eq!(c.upsampled_data().unwrap(), &[10.0, 10.0, 10.0, 20.0, 20.0, 20.0]);
    }

    #[test]
    fn free_data_clears_raw_and_caches() {
        let mut c = channel(1, 1, 1.0, 0.0, true);
        c.set_raw_data(vec![5.0]);
        assert!(c.data().is_some());
        c.free_data();
        assert!(c.raw_data().is_none());
        assert!(c.data().is_none());
    }

    #[test]
    fn time_index_matches_k_over_samples_per_second() {
        let c = channel(4, 2, 1.0, 0.0, true);
        let t = c.time_index();
        for (k, v) in t.iter().enumerate() {
            assert!((v - k as f64 / c.samples_per_second).abs() < 1e-12);
        }
    }

    #[test]
    fn named_channels_last_writer_wins() {
        let mut df = Datafile::empty(132, ByteOrder::Little);
        let mut a = channel(1, 1, 1.0, 0.0, true);
        a.name = "dup".to_string();
        let mut b = channel(1, 1, 1.0, 0.0, true);
        b.name = "dup".to_string();
        df.channels = vec![a, b];
        assert_eq!(*df.named_channels().get("dup").unwrap(), 1);
    }
}
