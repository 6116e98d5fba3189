use super::Header;
use crate::byte_order::{decode_text, read_bytes, ByteOrder};
use crate::revision::*;
use std::io::{self, Read};

#[derive(Debug, Clone)]
pub struct ChannelHeaderPre4 {
    chan_header_len: i32,
    order_num: i16,
    name: String,
    units: String,
    point_count: i32,
    raw_scale: f64,
    raw_offset: f64,
    frequency_divider: Option<i16>,
}

#[derive(Debug, Clone)]
pub struct ChannelHeaderPost4 {
    chan_header_len: i32,
    order_num: i16,
    name: String,
    units: String,
    point_count: i32,
    raw_scale: f64,
    raw_offset: f64,
    frequency_divider: i16,
}

#[derive(Debug, Clone)]
pub enum ChannelHeader {
    Pre4(ChannelHeaderPre4),
    Post4(ChannelHeaderPost4),
}

impl ChannelHeader {
    pub fn read(r: &mut impl Read, revision: i32, order: ByteOrder, utf8: bool) -> io::Result<Self> {
        if revision < V_400B {
            Ok(ChannelHeader::Pre4(ChannelHeaderPre4::read(r, revision, order, utf8)?))
        } else {
            Ok(ChannelHeader::Post4(ChannelHeaderPost4::read(r, revision, order, utf8)?))
        }
    }

    pub fn order_num(&self) -> i16 {
        match self {
            ChannelHeader::Pre4(h) => h.order_num,
            ChannelHeader::Post4(h) => h.order_num,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ChannelHeader::Pre4(h) => &h.name,
            ChannelHeader::Post4(h) => &h.name,
        }
    }

    pub fn units(&self) -> &str {
        match self {
            ChannelHeader::Pre4(h) => &h.units,
            ChannelHeader::Post4(h) => &h.units,
        }
    }

    pub fn point_count(&self) -> i32 {
        match self {
            ChannelHeader::Pre4(h) => h.point_count,
            ChannelHeader::Post4(h) => h.point_count,
        }
    }

    pub fn raw_scale(&self) -> f64 {
        match self {
            ChannelHeader::Pre4(h) => h.raw_scale,
            ChannelHeader::Post4(h) => h.raw_scale,
        }
    }

    pub fn raw_offset(&self) -> f64 {
        match self {
            ChannelHeader::Pre4(h) => h.raw_offset,
            ChannelHeader::Post4(h) => h.raw_offset,
        }
    }

    /// 1 when the file has no per-channel sample-rate divider, or when the
    /// stored divider is zero (the original treats 0 and "absent" the same).
    pub fn frequency_divider(&self) -> i16 {
        match self {
            ChannelHeader::Pre4(h) => h.frequency_divider.filter(|&d| d != 0).unwrap_or(1),
            ChannelHeader::Post4(h) => if h.frequency_divider == 0 { 1 } else { h.frequency_divider },
        }
    }
}

impl Header for ChannelHeader {
    fn effective_len_bytes(&self) -> u64 {
        match self {
            ChannelHeader::Pre4(h) => h.chan_header_len as u64,
            ChannelHeader::Post4(h) => h.chan_header_len as u64,
        }
    }
}

impl ChannelHeaderPre4 {
    fn read(r: &mut impl Read, revision: i32, order: ByteOrder, utf8: bool) -> io::Result<Self> {
        let chan_header_len = order.read_i32(r)?;
        let _num = order.read_i16(r)?;
        let name = decode_text(&read_bytes(r, 40)?, utf8); // szCommentText
        read_bytes(r, 4)?; // rgbColor
        let _disp_chan = order.read_i16(r)?;
        let _volt_offset = order.read_f64(r)?;
        let _volt_scale = order.read_f64(r)?;
        let units = decode_text(&read_bytes(r, 20)?, utf8); // szUnitsText
        let point_count = order.read_i32(r)?;
        let raw_scale = order.read_f64(r)?;
        let raw_offset = order.read_f64(r)?;
        let order_num = order.read_i16(r)?;
        let _disp_size = order.read_i16(r)?;

        if revision >= V_30R {
            order.read_i16(r)?; // plotMode
            order.read_f64(r)?; // vMid
        }

        let mut frequency_divider = None;
        if revision >= V_370 {
            read_bytes(r, 128)?; // szDescription
            frequency_divider = Some(order.read_i16(r)?); // nVarSampleDivider
            // vertPrecision (>= V_373) and activeSegment* (>= V_382) follow
            // but nothing downstream needs them.
        }

        Ok(ChannelHeaderPre4 {
            chan_header_len,
            order_num,
            name,
            units,
            point_count,
            raw_scale,
            raw_offset,
            frequency_divider,
        })
    }
}

impl ChannelHeaderPost4 {
    fn read(r: &mut impl Read, revision: i32, order: ByteOrder, utf8: bool) -> io::Result<Self> {
        let chan_header_len = order.read_i32(r)?;
        let _num = order.read_i16(r)?;
        let name = decode_text(&read_bytes(r, 40)?, utf8); // szCommentText
        read_bytes(r, 4)?; // notColor
        let _disp_chan = order.read_i16(r)?;
        let _volt_offset = order.read_f64(r)?;
        let _volt_scale = order.read_f64(r)?;
        let units = decode_text(&read_bytes(r, 20)?, utf8); // szUnitsText
        let point_count = order.read_i32(r)?;
        let raw_scale = order.read_f64(r)?;
        let raw_offset = order.read_f64(r)?;
        let order_num = order.read_i16(r)?;
        let _disp_size = order.read_i16(r)?;

        let mut frequency_divider = 0;
        if revision >= V_400B {
            read_bytes(r, 40)?; // unknown
            frequency_divider = order.read_i16(r)?; // nVarSampleDivider
        }

        Ok(ChannelHeaderPost4 {
            chan_header_len,
            order_num,
            name,
            units,
            point_count,
            raw_scale,
            raw_offset,
            frequency_divider,
        })
    }
}
