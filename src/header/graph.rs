use super::Header;
use crate::byte_order::{read_bytes, ByteOrder};
use crate::revision::*;
use std::io::{self, Read};

/// Graph header for files with revision below `V_400B`.
#[derive(Debug, Clone)]
pub struct GraphHeaderPre4 {
    ext_item_header_len: i32,
    channels: i16,
    sample_time: f64,
    /// `None` below `V_381`, where the field doesn't exist at all.
    compressed: Option<bool>,
}

/// Graph header for files at `V_400B` and above.
#[derive(Debug, Clone)]
pub struct GraphHeaderPost4 {
    ext_item_header_len: i32,
    channels: i16,
    sample_time: f64,
    compressed: bool,
    expected_paddings: Option<i16>,
}

#[derive(Debug, Clone)]
pub enum GraphHeader {
    Pre4(GraphHeaderPre4),
    Post4(GraphHeaderPost4),
}

impl GraphHeader {
    pub fn read(r: &mut impl Read, revision: i32, order: ByteOrder) -> io::Result<Self> {
        if revision < V_400B {
            Ok(GraphHeader::Pre4(GraphHeaderPre4::read(r, revision, order)?))
        } else {
            Ok(GraphHeader::Post4(GraphHeaderPost4::read(r, revision, order)?))
        }
    }

    pub fn channel_count(&self) -> i16 {
        match self {
            GraphHeader::Pre4(h) => h.channels,
            GraphHeader::Post4(h) => h.channels,
        }
    }

    pub fn sample_time(&self) -> f64 {
        match self {
            GraphHeader::Pre4(h) => h.sample_time,
            GraphHeader::Post4(h) => h.sample_time,
        }
    }

    pub fn compressed(&self) -> bool {
        match self {
            GraphHeader::Pre4(h) => h.compressed.unwrap_or(false),
            GraphHeader::Post4(h) => h.compressed,
        }
    }

    /// 0 below `V_430`, where the field isn't present in any variant.
    pub fn expected_padding_headers(&self, revision: i32) -> i16 {
        if revision < V_430 {
            return 0;
        }
        match self {
            GraphHeader::Pre4(_) => 0,
            GraphHeader::Post4(h) => h.expected_paddings.unwrap_or(0),
        }
    }
}

impl Header for GraphHeader {
    fn effective_len_bytes(&self) -> u64 {
        match self {
            GraphHeader::Pre4(h) => h.ext_item_header_len as u64,
            GraphHeader::Post4(h) => h.ext_item_header_len as u64,
        }
    }
}

/// Shared prefix of both graph header variants (`nItemHeaderLen` through
/// `rRReserved`), present from `V_ALL`/`V_20A`.
struct CommonPrefix {
    ext_item_header_len: i32,
    channels: i16,
    sample_time: f64,
}

fn read_common_prefix(r: &mut impl Read, revision: i32, order: ByteOrder) -> io::Result<Option<CommonPrefix>> {
    let _item_header_len = order.read_i16(r)?;
    let _version = order.read_i32(r)?;
    if revision < V_20A {
        return Ok(None);
    }
    let ext_item_header_len = order.read_i32(r)?;
    let channels = order.read_i16(r)?;
    let _horiz_axis_type = order.read_i16(r)?;
    let _cur_channel = order.read_i16(r)?;
    let sample_time = order.read_f64(r)?;
    let _time_offset = order.read_f64(r)?;
    let _time_scale = order.read_f64(r)?;
    let _time_cursor1 = order.read_f64(r)?;
    let _time_cursor2 = order.read_f64(r)?;
    for _ in 0..4 {
        order.read_i16(r)?; // rcWindow
    }
    for _ in 0..6 {
        order.read_i16(r)?; // nMeasurement
    }
    let _f_hilite = order.read_i16(r)?;
    let _first_time_offset = order.read_f64(r)?;
    let _n_rescale = order.read_i16(r)?;
    read_bytes(r, 40)?; // szHorizUnits1
    read_bytes(r, 10)?; // szHorizUnits2
    let _in_memory = order.read_i16(r)?;
    let _grid = order.read_i16(r)?;
    let _markers = order.read_i16(r)?;
    let _plot_draft = order.read_i16(r)?;
    let _disp_mode = order.read_i16(r)?;
    let _r_reserved = order.read_i16(r)?;
    Ok(Some(CommonPrefix {
        ext_item_header_len,
        channels,
        sample_time,
    }))
}

impl GraphHeaderPre4 {
    fn read(r: &mut impl Read, revision: i32, order: ByteOrder) -> io::Result<Self> {
        let prefix = match read_common_prefix(r, revision, order)? {
            Some(p) => p,
            None => {
                return Ok(GraphHeaderPre4 {
                    ext_item_header_len: 0,
                    channels: 0,
                    sample_time: 0.0,
                    compressed: None,
                })
            }
        };

        if revision >= V_30R {
            for _ in 0..7 {
                // BShowToolBar, BShowChannelButtons, BShowMeasurements,
                // BShowMarkers, BShowJournal, CurXChannel, MmtPrecision
                order.read_i16(r)?;
            }
        }
        if revision >= V_303 {
            order.read_i16(r)?; // NMeasurementRows
            read_bytes(r, 40 * 2)?; // mmt40
            read_bytes(r, 40 * 2)?; // mmtChan40
        }
        if revision >= V_35X {
            read_bytes(r, 40 * 2)?; // MmtCalcOpnd1
            read_bytes(r, 40 * 2)?; // MmtCalcOpnd2
            read_bytes(r, 40 * 2)?; // MmtCalcOp
            read_bytes(r, 40 * 8)?; // MmtCalcConstant
        }
        if revision >= V_370 {
            order.read_i32(r)?; // bNewGridWithMinor
            read_bytes(r, 4)?; // colorMajorGrid
            read_bytes(r, 4)?; // colorMinorGrid
            order.read_u16(r)?; // wMajorGridStyle
            order.read_u16(r)?; // wMinorGridStyle
            order.read_u16(r)?; // wMajorGridWidth
            order.read_u16(r)?; // wMinorGridWidth
            order.read_u32(r)?; // bFixedUnitsDiv
            order.read_u32(r)?; // bMid_Range_Show
            order.read_f64(r)?; // dStart_Middle_Point
            read_bytes(r, 60 * 8)?; // dOffset_Point
            order.read_f64(r)?; // hGrid
            read_bytes(r, 60 * 8)?; // vGrid
            order.read_i32(r)?; // bEnableWaveTools
        }
        if revision >= V_373 {
            order.read_i16(r)?; // hozizPrecision
        }
        let mut compressed = None;
        if revision >= V_381 {
            read_bytes(r, 20)?; // Reserved
            order.read_i32(r)?; // bOverlapMode
            order.read_i32(r)?; // bShowHardware
            order.read_i32(r)?; // bXAutoPlot
            order.read_i32(r)?; // bXAutoScroll
            order.read_i32(r)?; // bStartButtonVisible
            compressed = Some(order.read_i32(r)? != 0); // bCompressed
            // Everything after bCompressed (bAlwaysStartButtonVisible onward,
            // including the 10KB mmtCalcExpr buffer) is never consulted, and
            // effective_len_bytes comes from ext_item_header_len above, not
            // from how far we read here.
        }

        Ok(GraphHeaderPre4 {
            ext_item_header_len: prefix.ext_item_header_len,
            channels: prefix.channels,
            sample_time: prefix.sample_time,
            compressed,
        })
    }
}

impl GraphHeaderPost4 {
    fn read(r: &mut impl Read, revision: i32, order: ByteOrder) -> io::Result<Self> {
        let prefix = match read_common_prefix(r, revision, order)? {
            Some(p) => p,
            None => {
                return Ok(GraphHeaderPost4 {
                    ext_item_header_len: 0,
                    channels: 0,
                    sample_time: 0.0,
                    compressed: false,
                    expected_paddings: None,
                })
            }
        };

        let mut compressed = false;
        if revision >= V_400B {
            read_bytes(r, 822)?; // Unknown
            compressed = order.read_i32(r)? != 0; // bCompressed
            read_bytes(r, 1422)?; // Unknown2
        }
        let mut expected_paddings = None;
        if revision >= V_430 {
            expected_paddings = Some(order.read_i16(r)?); // hExpectedPaddings
        }

        Ok(GraphHeaderPost4 {
            ext_item_header_len: prefix.ext_item_header_len,
            channels: prefix.channels,
            sample_time: prefix.sample_time,
            compressed,
            expected_paddings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::byte_order::ByteOrder;
    use std::io::Cursor;

    fn le(v: i16) -> [u8; 2] {
        v.to_le_bytes()
    }

    #[test]
    fn pre4_reads_channel_count_and_sample_time() {
        // Build a minimal V_381 graph header: prefix + 7 i16 + (skip V_303/35x/370/373 blocks absent since this is V_381 only, but gating requires all intervening blocks present since V_381 > V_370 etc.)
        // Exercise only the documented invariant: a file at exactly V_20A has no trailing fields.
        let mut buf = Vec::new();
        buf.extend_from_slice(&le(64)); // nItemHeaderLen
        buf.extend_from_slice(&30i32.to_le_bytes()); // lVersion == V_20A
        buf.extend_from_slice(&508i32.to_le_bytes()); // lExtItemHeaderLen
        buf.extend_from_slice(&le(3)); // nChannels
        buf.extend_from_slice(&le(0)); // nHorizAxisType
        buf.extend_from_slice(&le(0)); // nCurChannel
        buf.extend_from_slice(&2.5f64.to_le_bytes()); // dSampleTime
        buf.extend_from_slice(&0.0f64.to_le_bytes()); // dTimeOffset
        buf.extend_from_slice(&0.0f64.to_le_bytes()); // dTimeScale
        buf.extend_from_slice(&0.0f64.to_le_bytes()); // dTimeCursor1
        buf.extend_from_slice(&0.0f64.to_le_bytes()); // dTimeCursor2
        buf.extend(std::iter::repeat(0u8).take(2 * 4)); // rcWindow
        buf.extend(std::iter::repeat(0u8).take(2 * 6)); // nMeasurement
        buf.extend_from_slice(&le(0)); // fHilite
        buf.extend_from_slice(&0.0f64.to_le_bytes()); // dFirstTimeOffset
        buf.extend_from_slice(&le(0)); // nRescale
        buf.extend(std::iter::repeat(0u8).take(40)); // szHorizUnits1
        buf.extend(std::iter::repeat(0u8).take(10)); // szHorizUnits2
        buf.extend_from_slice(&le(0)); // nInMemory
        buf.extend_from_slice(&le(0)); // fGrid
        buf.extend_from_slice(&le(0)); // fMarkers
        buf.extend_from_slice(&le(0)); // nPlotDraft
        buf.extend_from_slice(&le(0)); // nDispMode
        buf.extend_from_slice(&le(0)); // rRReserved

        let mut cursor = Cursor::new(buf);
        let header = GraphHeader::read(&mut cursor, V_20A, ByteOrder::Little).unwrap();
        assert_eq!(header.channel_count(), 3);
        assert_eq!(header.sample_time(), 2.5);
        assert_eq!(header.effective_len_bytes(), 508);
        assert!(!header.compressed());
    }
}
