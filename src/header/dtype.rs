use super::Header;
use crate::byte_order::ByteOrder;
use std::io::{self, Read};

/// Channel data-type header: `nSize`/`nType` pair, always 4 bytes regardless
/// of revision. Comes right after the foreign header, but real files
/// sometimes have junk in between, hence `possibly_valid` and the forward
/// scan in `crate::dtype_scan`.
#[derive(Debug, Clone, Copy)]
pub struct ChannelDTypeHeader {
    size: i16,
    type_code: i16,
}

impl ChannelDTypeHeader {
    pub fn read(r: &mut impl Read, order: ByteOrder) -> io::Result<Self> {
        let size = order.read_i16(r)?;
        let type_code = order.read_i16(r)?;
        Ok(ChannelDTypeHeader { size, type_code })
    }

    pub fn type_code(&self) -> i16 {
        self.type_code
    }

    pub fn sample_size(&self) -> i16 {
        self.size
    }

    fn dtype_byte_width(&self) -> Option<i16> {
        match self.type_code {
            0 => Some(8), // f8
            1 => Some(8), // f8
            2 => Some(2), // i2
            _ => None,
        }
    }

    pub fn possibly_valid(&self) -> bool {
        match self.dtype_byte_width() {
            Some(width) => width == self.size,
            None => false,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self.type_code, 0 | 1)
    }
}

impl Header for ChannelDTypeHeader {
    fn effective_len_bytes(&self) -> u64 {
        4
    }
}
