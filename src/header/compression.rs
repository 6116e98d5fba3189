use super::Header;
use crate::byte_order::{read_bytes, ByteOrder};
use crate::revision::*;
use std::io::{self, Read};

#[derive(Debug, Clone)]
pub struct MainCompressionHeaderPre4 {
    text_len: i32,
}

#[derive(Debug, Clone)]
pub struct MainCompressionHeaderPost4 {
    str_len_1: i32,
    str_len_2: i32,
    struct_len: u64,
}

#[derive(Debug, Clone)]
pub enum MainCompressionHeader {
    Pre4(MainCompressionHeaderPre4),
    Post4(MainCompressionHeaderPost4),
}

impl MainCompressionHeader {
    pub fn read(r: &mut impl Read, revision: i32, order: ByteOrder) -> io::Result<Self> {
        if revision <= V_400B {
            read_bytes(r, 34)?; // Unknown
            let text_len = order.read_i32(r)?;
            Ok(MainCompressionHeader::Pre4(MainCompressionHeaderPre4 { text_len }))
        } else {
            read_bytes(r, 24)?; // Unknown1
            let str_len_1 = order.read_i32(r)?;
            let str_len_2 = order.read_i32(r)?;
            read_bytes(r, 20)?; // Unknown2
            let mut struct_len = 24 + 4 + 4 + 20;
            if revision >= V_420 {
                read_bytes(r, 6)?; // Unknown3
                struct_len += 6;
            }
            Ok(MainCompressionHeader::Post4(MainCompressionHeaderPost4 {
                str_len_1,
                str_len_2,
                struct_len,
            }))
        }
    }
}

impl Header for MainCompressionHeader {
    fn effective_len_bytes(&self) -> u64 {
        match self {
            MainCompressionHeader::Pre4(h) => 38 + h.text_len as u64,
            MainCompressionHeader::Post4(h) => {
                h.struct_len + h.str_len_1 as u64 + h.str_len_2 as u64
            }
        }
    }
}

/// Per-channel compression header: a truly variable-length header whose
/// channel label and unit text live inline before the compressed payload.
#[derive(Debug, Clone)]
pub struct ChannelCompressionHeader {
    channel_label_len: i32,
    unit_label_len: i32,
    uncompressed_len: i32,
    compressed_len: i32,
    offset: u64,
}

impl ChannelCompressionHeader {
    pub fn read(r: &mut impl Read, order: ByteOrder, offset: u64) -> io::Result<Self> {
        read_bytes(r, 44)?; // Unknown
        let channel_label_len = order.read_i32(r)?;
        let unit_label_len = order.read_i32(r)?;
        let uncompressed_len = order.read_i32(r)?;
        let compressed_len = order.read_i32(r)?;
        Ok(ChannelCompressionHeader {
            channel_label_len,
            unit_label_len,
            uncompressed_len,
            compressed_len,
            offset,
        })
    }

    /// Header length including the trailing channel-label/unit-label text,
    /// but not the compressed payload itself.
    pub fn header_only_len_bytes(&self) -> u64 {
        60 + self.channel_label_len as u64 + self.unit_label_len as u64
    }

    pub fn compressed_data_offset(&self) -> u64 {
        self.offset + self.header_only_len_bytes()
    }

    pub fn compressed_data_len(&self) -> u32 {
        self.compressed_len as u32
    }

    pub fn uncompressed_len(&self) -> u32 {
        self.uncompressed_len as u32
    }
}

impl Header for ChannelCompressionHeader {
    fn effective_len_bytes(&self) -> u64 {
        self.header_only_len_bytes() + self.compressed_len as u64
    }
}
