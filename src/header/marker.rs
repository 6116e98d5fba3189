use super::Header;
use crate::byte_order::{decode_text, read_bytes, ByteOrder};
use crate::revision::*;
use std::io::{self, Read};

#[derive(Debug, Clone, Copy)]
pub struct V2MarkerHeader {
    marker_count: i32,
}

impl V2MarkerHeader {
    pub fn read(r: &mut impl Read, order: ByteOrder) -> io::Result<Self> {
        let _length = order.read_i32(r)?;
        let marker_count = order.read_i32(r)?;
        Ok(V2MarkerHeader { marker_count })
    }

    pub fn marker_count(&self) -> i32 {
        self.marker_count
    }
}

impl Header for V2MarkerHeader {
    fn effective_len_bytes(&self) -> u64 {
        8
    }
}

#[derive(Debug, Clone, Copy)]
pub struct V4MarkerHeader {
    marker_count: i32,
}

impl V4MarkerHeader {
    pub fn read(r: &mut impl Read, revision: i32, order: ByteOrder) -> io::Result<Self> {
        let _length = order.read_i32(r)?;
        let markers_extra = order.read_i32(r)?;
        let _markers = order.read_i32(r)?;
        read_bytes(r, 6)?; // Unknown
        read_bytes(r, 5)?; // szDefl
        order.read_i16(r)?; // Unknown2
        if revision >= V_42X {
            read_bytes(r, 8)?; // Unknown3
        }
        if revision >= V_440 {
            read_bytes(r, 8)?; // Unknown4
        }
        Ok(V4MarkerHeader {
            marker_count: markers_extra - 1,
        })
    }

    pub fn marker_count(&self) -> i32 {
        self.marker_count
    }
}

#[derive(Debug, Clone)]
pub struct V2MarkerMetadataPreHeader {
    item_count: i32,
    tag: [u8; 4],
}

impl V2MarkerMetadataPreHeader {
    pub fn read(r: &mut impl Read, order: ByteOrder) -> io::Result<Self> {
        let mut tag = [0u8; 4];
        r.read_exact(&mut tag)?;
        let item_count = order.read_i32(r)?;
        read_bytes(r, 76)?; // sUnknown
        Ok(V2MarkerMetadataPreHeader { item_count, tag })
    }

    pub fn item_count(&self) -> i32 {
        self.item_count
    }

    pub fn tag(&self) -> [u8; 4] {
        self.tag
    }
}

impl Header for V2MarkerMetadataPreHeader {
    fn effective_len_bytes(&self) -> u64 {
        84
    }
}

#[derive(Debug, Clone)]
pub struct V2MarkerMetadataHeader {
    marker_number: i32,
    rgba_color: [u8; 4],
    marker_tag: i16,
}

impl V2MarkerMetadataHeader {
    pub fn read(r: &mut impl Read, order: ByteOrder) -> io::Result<Self> {
        let _unknown1 = order.read_i32(r)?;
        let marker_number = order.read_i32(r)?;
        read_bytes(r, 12)?; // bUnknown2
        let mut rgba_color = [0u8; 4];
        r.read_exact(&mut rgba_color)?;
        let marker_tag = order.read_i16(r)?;
        let _marker_type_id = order.read_i16(r)?;
        Ok(V2MarkerMetadataHeader {
            marker_number,
            rgba_color,
            marker_tag,
        })
    }

    pub fn marker_index(&self) -> i32 {
        self.marker_number - 1
    }

    pub fn rgba_color(&self) -> [u8; 4] {
        self.rgba_color
    }

    pub fn marker_tag(&self) -> i16 {
        self.marker_tag
    }
}

impl Header for V2MarkerMetadataHeader {
    fn effective_len_bytes(&self) -> u64 {
        4 + 4 + 12 + 4 + 2 + 2
    }
}

#[derive(Debug, Clone)]
pub struct V2MarkerItemHeader {
    sample_index: i32,
    text_length: i16,
}

impl V2MarkerItemHeader {
    pub fn read(r: &mut impl Read, revision: i32, order: ByteOrder) -> io::Result<Self> {
        let sample_index = order.read_i32(r)?;
        if revision >= V_35X {
            order.read_i16(r)?; // fSelected
        }
        let _text_locked = order.read_i16(r)?;
        let _position_locked = order.read_i16(r)?;
        let raw_text_length = order.read_i16(r)?;
        let text_length = if revision < V_35X {
            raw_text_length
        } else {
            raw_text_length + 1
        };
        Ok(V2MarkerItemHeader {
            sample_index,
            text_length,
        })
    }

    pub fn sample_index(&self) -> i32 {
        self.sample_index
    }

    pub fn text_length(&self) -> i16 {
        self.text_length
    }

    pub fn channel_number(&self) -> Option<i16> {
        None
    }

    pub fn date_created_ms(&self) -> Option<u64> {
        None
    }

    pub fn type_code(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct V4MarkerItemHeader {
    sample_index: i32,
    channel_number: Option<i16>,
    type_code: String,
    date_created_ms: Option<u64>,
    text_length: i16,
}

impl V4MarkerItemHeader {
    pub fn read(r: &mut impl Read, revision: i32, order: ByteOrder, utf8: bool) -> io::Result<Self> {
        let sample_index = order.read_i32(r)?;
        read_bytes(r, 4)?; // Unknown
        let chan = order.read_i16(r)?;
        let channel_number = if chan == -1 { None } else { Some(chan) };
        let style_bytes = read_bytes(r, 4)?; // sMarkerStyle
        let type_code = decode_text(&style_bytes, utf8);

        let mut date_created_ms = None;
        if revision >= V_440 {
            date_created_ms = Some(order.read_u64(r)?); // llDateCreated
        }
        if revision >= V_42X {
            read_bytes(r, 8)?; // Unknown3
        }
        let text_length = order.read_i16(r)?; // nTextLength

        Ok(V4MarkerItemHeader {
            sample_index,
            channel_number,
            type_code,
            date_created_ms,
            text_length,
        })
    }

    pub fn sample_index(&self) -> i32 {
        self.sample_index
    }

    pub fn text_length(&self) -> i16 {
        self.text_length
    }

    pub fn channel_number(&self) -> Option<i16> {
        self.channel_number
    }

    pub fn date_created_ms(&self) -> Option<u64> {
        self.date_created_ms
    }

    pub fn type_code(&self) -> Option<String> {
        Some(self.type_code.clone())
    }
}
