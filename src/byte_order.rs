//! Runtime byte order, since an AcqKnowledge file's endianness isn't known
//! until the bootstrap step (`crate::bootstrap`) has probed it.

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::io::{self, Read};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    pub fn read_i16(self, r: &mut impl Read) -> io::Result<i16> {
        match self {
            ByteOrder::Little => r.read_i16::<LittleEndian>(),
            ByteOrder::Big => r.read_i16::<BigEndian>(),
        }
    }

    pub fn read_u16(self, r: &mut impl Read) -> io::Result<u16> {
        match self {
            ByteOrder::Little => r.read_u16::<LittleEndian>(),
            ByteOrder::Big => r.read_u16::<BigEndian>(),
        }
    }

    pub fn read_i32(self, r: &mut impl Read) -> io::Result<i32> {
        match self {
            ByteOrder::Little => r.read_i32::<LittleEndian>(),
            ByteOrder::Big => r.read_i32::<BigEndian>(),
        }
    }

    pub fn read_u32(self, r: &mut impl Read) -> io::Result<u32> {
        match self {
            ByteOrder::Little => r.read_u32::<LittleEndian>(),
            ByteOrder::Big => r.read_u32::<BigEndian>(),
        }
    }

    pub fn read_u64(self, r: &mut impl Read) -> io::Result<u64> {
        match self {
            ByteOrder::Little => r.read_u64::<LittleEndian>(),
            ByteOrder::Big => r.read_u64::<BigEndian>(),
        }
    }

    pub fn read_f64(self, r: &mut impl Read) -> io::Result<f64> {
        match self {
            ByteOrder::Little => r.read_f64::<LittleEndian>(),
            ByteOrder::Big => r.read_f64::<BigEndian>(),
        }
    }
}

pub fn read_bytes(r: &mut impl Read, n: usize) -> io::Result<Vec<u8>> {
    let mut buf = vec![0u8; n];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

/// Decodes a fixed-width byte run as text. Pre-4.0-beta files are Latin-1
/// (every byte is a valid Unicode scalar value in that range); 4.0-beta and
/// later are UTF-8. Invalid sequences are replaced rather than dropped (see
/// DESIGN.md Open Question 5). Trailing NUL padding is stripped.
pub fn decode_text(bytes: &[u8], utf8: bool) -> String {
    let s = if utf8 {
        String::from_utf8_lossy(bytes).into_owned()
    } else {
        bytes.iter().map(|&b| b as char).collect()
    };
    s.trim_end_matches('\0').to_string()
}
