//! Per-channel compressed sample data (component J), grounded on
//! `original_source/bioread/data_reader.py::read_data_compressed`.
//!
//! Unlike the interleaved uncompressed layout, each channel's compressed
//! block stands alone: seek to its offset, zlib-inflate it, done. The
//! decompressed bytes are always little-endian regardless of the file's
//! detected byte order -- an asymmetry the original source calls out
//! explicitly ("Strangely, the compressed data seems to always be
//! little-endian").

use crate::byte_order::ByteOrder;
use crate::data::demux::decode_samples;
use crate::errors::{AcqError, Result};
use crate::header::ChannelCompressionHeader;
use flate2::read::ZlibDecoder;
use std::io::{Read, Seek, SeekFrom};

pub fn read_compressed_channel<R: Read + Seek>(
    source: &mut R,
    header: &ChannelCompressionHeader,
    is_float: bool,
) -> Result<Vec<f64>> {
    source.seek(SeekFrom::Start(header.compressed_data_offset()))?;
    let mut compressed = vec![0u8; header.compressed_data_len() as usize];
    source.read_exact(&mut compressed)?;

    let mut decoder = ZlibDecoder::new(&compressed[..]);
    let mut decompressed = Vec::with_capacity(header.uncompressed_len() as usize);
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| AcqError::Decompression(e.to_string()))?;

    Ok(decode_samples(&decompressed, ByteOrder::Little, is_float))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn zlib_compress(data: &[u8]) -> Vec<u8> {
        use flate2::write::ZlibEncoder;
        use flate2::Compression;
        use std::io::Write;
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn decompresses_little_endian_regardless_of_file_order() {
        let mut raw = Vec::new();
        for v in [1i16, -2, 300] {
            raw.extend_from_slice(&v.to_le_bytes());
        }
        let compressed = zlib_compress(&raw);

        // 44 unknown bytes + 4 zero-length label fields + uncompressed_len +
        // compressed_len, immediately followed by the compressed payload.
        let header_offset = 0u64;
        let mut file = vec![0u8; 44];
        file.extend_from_slice(&0i32.to_le_bytes()); // channel_label_len
        file.extend_from_slice(&0i32.to_le_bytes()); // unit_label_len
        file.extend_from_slice(&(raw.len() as i32).to_le_bytes()); // uncompressed_len
        file.extend_from_slice(&(compressed.len() as i32).to_le_bytes()); // compressed_len
        file.extend_from_slice(&compressed);

        let mut cursor = Cursor::new(file);
        let header =
            ChannelCompressionHeader::read(&mut cursor, ByteOrder::Little, header_offset).unwrap();
        assert_eq!(header.compressed_data_offset(), 60);

        let samples = read_compressed_channel(&mut cursor, &header, false).unwrap();
        assert_eq!(samples, vec![1.0, -2.0, 300.0]);
    }
}
