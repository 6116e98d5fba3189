//! End-to-end decode tests built from hand-assembled in-memory fixtures.
//!
//! Each fixture is built field-by-field in the exact order the header
//! readers consume them, so a passing test demonstrates the full pipeline --
//! bootstrap, header walk, dtype scan, sample demultiplexing/decompression,
//! marker binding, and journal decoding -- working together, not just each
//! piece in isolation.

use std::io::Cursor;

/// Little-endian byte builder mirroring the exact field order each header
/// reader expects. Length fields that the walker uses to find the next
/// header (`lExtItemHeaderLen`, `lChanHeaderLen`, ...) are written as a
/// placeholder and patched to the buffer's actual length once every field
/// for the chosen revision has been appended, so the fixture never has to
/// hand-count bytes per revision gate.
struct Buf(Vec<u8>);

impl Buf {
    fn new() -> Self {
        Buf(Vec::new())
    }

    fn push_i16(&mut self, v: i16) {
        self.0.extend_from_slice(&v.to_le_bytes());
    }

    fn push_u16(&mut self, v: u16) {
        self.0.extend_from_slice(&v.to_le_bytes());
    }

    fn push_i32(&mut self, v: i32) {
        self.0.extend_from_slice(&v.to_le_bytes());
    }

    fn push_u32(&mut self, v: u32) {
        self.0.extend_from_slice(&v.to_le_bytes());
    }

    fn push_f64(&mut self, v: f64) {
        self.0.extend_from_slice(&v.to_le_bytes());
    }

    fn push_zeros(&mut self, n: usize) {
        self.0.extend(std::iter::repeat(0u8).take(n));
    }

    fn push_bytes(&mut self, b: &[u8]) {
        self.0.extend_from_slice(b);
    }

    fn push_fixed_text(&mut self, s: &str, width: usize) {
        let mut bytes = s.as_bytes().to_vec();
        bytes.resize(width, 0);
        self.0.extend_from_slice(&bytes);
    }

    fn placeholder_i32(&mut self) -> usize {
        let pos = self.0.len();
        self.push_i32(0);
        pos
    }

    fn patch_i32(&mut self, pos: usize, v: i32) {
        self.0[pos..pos + 4].copy_from_slice(&v.to_le_bytes());
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

fn graph_header_pre4(revision: i32, channels: i16, sample_time: f64, compressed: bool) -> Vec<u8> {
    let mut b = Buf::new();
    b.push_i16(64); // nItemHeaderLen, unused
    b.push_i32(revision); // lVersion
    let len_pos = b.placeholder_i32(); // lExtItemHeaderLen
    b.push_i16(channels);
    b.push_i16(0); // nHorizAxisType
    b.push_i16(0); // nCurChannel
    b.push_f64(sample_time);
    b.push_f64(0.0); // dTimeOffset
    b.push_f64(0.0); // dTimeScale
    b.push_f64(0.0); // dTimeCursor1
    b.push_f64(0.0); // dTimeCursor2
    b.push_zeros(2 * 4); // rcWindow
    b.push_zeros(2 * 6); // nMeasurement
    b.push_i16(0); // fHilite
    b.push_f64(0.0); // dFirstTimeOffset
    b.push_i16(0); // nRescale
    b.push_zeros(40); // szHorizUnits1
    b.push_zeros(10); // szHorizUnits2
    for _ in 0..6 {
        b.push_i16(0); // nInMemory, fGrid, fMarkers, nPlotDraft, nDispMode, rRReserved
    }

    if revision >= 34 {
        for _ in 0..7 {
            b.push_i16(0);
        }
    }
    if revision >= 35 {
        b.push_i16(0); // NMeasurementRows
        b.push_zeros(80); // mmt40
        b.push_zeros(80); // mmtChan40
    }
    if revision >= 36 {
        b.push_zeros(80); // MmtCalcOpnd1
        b.push_zeros(80); // MmtCalcOpnd2
        b.push_zeros(80); // MmtCalcOp
        b.push_zeros(320); // MmtCalcConstant
    }
    if revision >= 38 {
        b.push_i32(0);
        b.push_zeros(4);
        b.push_zeros(4);
        b.push_u16(0);
        b.push_u16(0);
        b.push_u16(0);
        b.push_u16(0);
        b.push_u32(0);
        b.push_u32(0);
        b.push_f64(0.0);
        b.push_zeros(60 * 8);
        b.push_f64(0.0);
        b.push_zeros(60 * 8);
        b.push_i32(0);
    }
    if revision >= 39 {
        b.push_i16(0);
    }
    if revision >= 41 {
        b.push_zeros(20);
        b.push_i32(0);
        b.push_i32(0);
        b.push_i32(0);
        b.push_i32(0);
        b.push_i32(0);
        b.push_i32(compressed as i32);
    }

    let total = b.len() as i32;
    b.patch_i32(len_pos, total);
    b.0
}

fn graph_header_post4(revision: i32, channels: i16, sample_time: f64, compressed: bool) -> Vec<u8> {
    let mut b = Buf::new();
    b.push_i16(64);
    b.push_i32(revision);
    let len_pos = b.placeholder_i32();
    b.push_i16(channels);
    b.push_i16(0);
    b.push_i16(0);
    b.push_f64(sample_time);
    b.push_f64(0.0);
    b.push_f64(0.0);
    b.push_f64(0.0);
    b.push_f64(0.0);
    b.push_zeros(2 * 4);
    b.push_zeros(2 * 6);
    b.push_i16(0);
    b.push_f64(0.0);
    b.push_i16(0);
    b.push_zeros(40);
    b.push_zeros(10);
    for _ in 0..6 {
        b.push_i16(0);
    }

    if revision >= 61 {
        b.push_zeros(822);
        b.push_i32(compressed as i32);
        b.push_zeros(1422);
    }
    if revision >= 124 {
        b.push_i16(0); // hExpectedPaddings
    }

    let total = b.len() as i32;
    b.patch_i32(len_pos, total);
    b.0
}

fn channel_header_pre4(
    revision: i32,
    order_num: i16,
    name: &str,
    units: &str,
    point_count: i32,
    raw_scale: f64,
    raw_offset: f64,
) -> Vec<u8> {
    let mut b = Buf::new();
    let len_pos = b.placeholder_i32(); // lChanHeaderLen
    b.push_i16(0); // num
    b.push_fixed_text(name, 40); // szCommentText
    b.push_zeros(4); // rgbColor
    b.push_i16(0); // dispChan
    b.push_f64(0.0); // voltOffset
    b.push_f64(0.0); // voltScale
    b.push_fixed_text(units, 20); // szUnitsText
    b.push_i32(point_count);
    b.push_f64(raw_scale);
    b.push_f64(raw_offset);
    b.push_i16(order_num);
    b.push_i16(0); // dispSize
    if revision >= 34 {
        b.push_i16(0); // plotMode
        b.push_f64(0.0); // vMid
    }
    if revision >= 38 {
        b.push_zeros(128); // szDescription
        b.push_i16(1); // nVarSampleDivider
    }
    let total = b.len() as i32;
    b.patch_i32(len_pos, total);
    b.0
}

fn channel_header_post4(
    revision: i32,
    order_num: i16,
    name: &str,
    units: &str,
    point_count: i32,
    raw_scale: f64,
    raw_offset: f64,
    frequency_divider: i16,
) -> Vec<u8> {
    let mut b = Buf::new();
    let len_pos = b.placeholder_i32();
    b.push_i16(0);
    b.push_fixed_text(name, 40);
    b.push_zeros(4); // notColor
    b.push_i16(0);
    b.push_f64(0.0);
    b.push_f64(0.0);
    b.push_fixed_text(units, 20);
    b.push_i32(point_count);
    b.push_f64(raw_scale);
    b.push_f64(raw_offset);
    b.push_i16(order_num);
    b.push_i16(0);
    if revision >= 61 {
        b.push_zeros(40);
        b.push_i16(frequency_divider);
    }
    let total = b.len() as i32;
    b.patch_i32(len_pos, total);
    b.0
}

fn foreign_header_pre4() -> Vec<u8> {
    2i16.to_le_bytes().to_vec() // length includes only itself
}

fn foreign_header_post4() -> Vec<u8> {
    4i32.to_le_bytes().to_vec()
}

fn dtype_header(size: i16, type_code: i16) -> Vec<u8> {
    let mut b = Buf::new();
    b.push_i16(size);
    b.push_i16(type_code);
    b.0
}

fn v2_marker_header(marker_count: i32) -> Vec<u8> {
    let mut b = Buf::new();
    b.push_i32(0); // lLength, unused
    b.push_i32(marker_count);
    b.0
}

/// The pre-4 journal section: sentinel tag, "show" flag, length, then the
/// text itself. This is exactly what's on disk -- no padding -- so a test
/// with a short journal exercises the real end-of-file boundary.
fn v2_journal_section(text: &str) -> Vec<u8> {
    let mut b = Buf::new();
    b.push_bytes(&[0x44, 0x33, 0x22, 0x11]); // tag
    b.push_i16(0); // show
    b.push_i32(text.len() as i32);
    b.push_bytes(text.as_bytes());
    b.0
}

fn v4_marker_header(marker_count: i32) -> Vec<u8> {
    let mut b = Buf::new();
    b.push_i32(0); // length
    b.push_i32(marker_count + 1); // markers_extra
    b.push_i32(0); // markers
    b.push_zeros(6);
    b.push_zeros(5); // szDefl
    b.push_i16(0);
    b.0
}

fn v4_marker_item(sample_index: i32, channel_number: Option<i16>, type_code: &str, text: &str) -> Vec<u8> {
    let mut b = Buf::new();
    b.push_i32(sample_index);
    b.push_zeros(4);
    b.push_i16(channel_number.unwrap_or(-1));
    b.push_fixed_text(type_code, 4);
    b.push_i16(text.len() as i16);
    b.push_bytes(text.as_bytes());
    b.0
}

fn v4_journal_section_absent() -> Vec<u8> {
    4i32.to_le_bytes().to_vec() // section length == itself, no journal header follows
}

fn main_compression_header_post4() -> Vec<u8> {
    let mut b = Buf::new();
    b.push_zeros(24); // Unknown1
    b.push_i32(0); // str_len_1
    b.push_i32(0); // str_len_2
    b.push_zeros(20); // Unknown2
    b.0
}

fn channel_compression_header_bytes(uncompressed_len: i32, compressed_len: i32) -> Vec<u8> {
    let mut b = Buf::new();
    b.push_zeros(44);
    b.push_i32(0); // channel_label_len
    b.push_i32(0); // unit_label_len
    b.push_i32(uncompressed_len);
    b.push_i32(compressed_len);
    b.0
}

fn zlib_compress(data: &[u8]) -> Vec<u8> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

#[test]
fn minimal_pre4_single_channel_uncompressed_round_trips() {
    let revision = 36;
    let mut file = Buf::new();
    file.push_bytes(&graph_header_pre4(revision, 1, 10.0, false));
    file.push_bytes(&channel_header_pre4(revision, 0, "Chan1", "V", 10, 0.5, 1.0));
    file.push_bytes(&foreign_header_pre4());
    file.push_bytes(&dtype_header(2, 2));
    for raw in 0..10i16 {
        file.push_i16(raw);
    }
    file.push_bytes(&v2_marker_header(0));
    file.push_bytes(&v2_journal_section(""));

    let (datafile, errors) = acqdecode::read(Cursor::new(file.0), None);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    assert_eq!(datafile.channels.len(), 1);
    let ch = &datafile.channels[0];
    assert_eq!(ch.point_count, 10);
    let expected_raw: Vec<f64> = (0..10i16).map(|v| v as f64).collect();
    assert_eq!(ch.raw_data().unwrap(), &expected_raw[..]);
    let expected_scaled: Vec<f64> = (0..10i16).map(|v| v as f64 * 0.5 + 1.0).collect();
    assert_eq!(ch.data().unwrap(), &expected_scaled[..]);
}

#[test]
fn post4_three_channels_at_mixed_rates_demultiplex_correctly() {
    let revision = 80;
    let pattern = [0usize, 1, 2, 0, 0, 2, 0]; // one period for dividers [1, 4, 2]
    let ch0_values: Vec<i16> = (100..108).collect();
    let ch1_values: Vec<i16> = vec![200, 201];
    let ch2_values: Vec<i16> = vec![300, 301, 302, 303];
    let mut next = [0usize; 3];
    let mut interleaved = Vec::new();
    for _period in 0..2 {
        for &ch in &pattern {
            let v = match ch {
                0 => ch0_values[next[0]],
                1 => ch1_values[next[1]],
                2 => ch2_values[next[2]],
                _ => unreachable!(),
            };
            next[ch] += 1;
            interleaved.push(v);
        }
    }

    let mut file = Buf::new();
    file.push_bytes(&graph_header_post4(revision, 3, 10.0, false));
    file.push_bytes(&channel_header_post4(revision, 0, "Chan0", "V", 8, 1.0, 0.0, 1));
    file.push_bytes(&channel_header_post4(revision, 1, "Chan1", "V", 2, 1.0, 0.0, 4));
    file.push_bytes(&channel_header_post4(revision, 2, "Chan2", "V", 4, 1.0, 0.0, 2));
    file.push_bytes(&foreign_header_post4());
    file.push_bytes(&dtype_header(2, 2));
    file.push_bytes(&dtype_header(2, 2));
    file.push_bytes(&dtype_header(2, 2));
    for v in &interleaved {
        file.push_i16(*v);
    }
    file.push_bytes(&v4_marker_header(0));
    file.push_bytes(&v4_journal_section_absent());

    let (datafile, errors) = acqdecode::read(Cursor::new(file.0), None);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    assert_eq!(datafile.channels.len(), 3);
    let as_f64 = |v: &[i16]| -> Vec<f64> { v.iter().map(|x| *x as f64).collect() };
    assert_eq!(datafile.channels[0].raw_data().unwrap(), &as_f64(&ch0_values)[..]);
    assert_eq!(datafile.channels[1].raw_data().unwrap(), &as_f64(&ch1_values)[..]);
    assert_eq!(datafile.channels[2].raw_data().unwrap(), &as_f64(&ch2_values)[..]);
}

#[test]
fn post4_compressed_single_channel_decompresses_through_the_full_pipeline() {
    let revision = 80;
    let raw_samples: Vec<i16> = (-5..5).collect();
    let mut raw_bytes = Vec::new();
    for v in &raw_samples {
        raw_bytes.extend_from_slice(&v.to_le_bytes());
    }
    let compressed = zlib_compress(&raw_bytes);

    let mut file = Buf::new();
    file.push_bytes(&graph_header_post4(revision, 1, 10.0, true));
    file.push_bytes(&channel_header_post4(revision, 0, "Chan0", "V", 10, 2.0, 0.0, 1));
    file.push_bytes(&foreign_header_post4());
    file.push_bytes(&dtype_header(2, 2));
    // Compressed files have no interleaved payload: markers/journal follow
    // the dtype headers directly, and the compression headers come last.
    file.push_bytes(&v4_marker_header(0));
    file.push_bytes(&v4_journal_section_absent());
    file.push_bytes(&main_compression_header_post4());
    file.push_bytes(&channel_compression_header_bytes(raw_bytes.len() as i32, compressed.len() as i32));
    file.push_bytes(&compressed);

    let (datafile, errors) = acqdecode::read(Cursor::new(file.0), None);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    assert!(datafile.is_compressed);
    assert_eq!(datafile.data_length(), 0);
    let expected_raw: Vec<f64> = raw_samples.iter().map(|v| *v as f64).collect();
    assert_eq!(datafile.channels[0].raw_data().unwrap(), &expected_raw[..]);
    let expected_scaled: Vec<f64> = raw_samples.iter().map(|v| *v as f64 * 2.0).collect();
    assert_eq!(datafile.channels[0].data().unwrap(), &expected_scaled[..]);
}

#[test]
fn markers_bind_to_channels_by_order_num_and_resolve_labels() {
    let revision = 80;
    let mut file = Buf::new();
    file.push_bytes(&graph_header_post4(revision, 2, 10.0, false));
    file.push_bytes(&channel_header_post4(revision, 0, "Chan0", "V", 1, 1.0, 0.0, 1));
    file.push_bytes(&channel_header_post4(revision, 1, "Chan1", "V", 1, 1.0, 0.0, 1));
    file.push_bytes(&foreign_header_post4());
    file.push_bytes(&dtype_header(2, 2));
    file.push_bytes(&dtype_header(2, 2));
    file.push_i16(1);
    file.push_i16(2);
    file.push_bytes(&v4_marker_header(3));
    file.push_bytes(&v4_marker_item(5, Some(0), "flag", ""));
    file.push_bytes(&v4_marker_item(6, None, "defl", ""));
    file.push_bytes(&v4_marker_item(7, Some(1), "star", ""));
    file.push_bytes(&v4_journal_section_absent());

    let (datafile, errors) = acqdecode::read(Cursor::new(file.0), None);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    assert_eq!(datafile.event_markers.len(), 3);
    assert_eq!(datafile.event_markers[0].channel, Some(0));
    assert_eq!(datafile.event_markers[0].label, Some("Flag"));
    assert_eq!(datafile.event_markers[1].channel, None);
    assert_eq!(datafile.event_markers[1].label, Some("Default"));
    assert_eq!(datafile.event_markers[2].channel, Some(1));
    assert_eq!(datafile.event_markers[2].label, Some("Star"));
}

#[test]
fn journal_text_round_trips_through_the_v2_metadata_rewind_path() {
    // V_381 (41) is the floor for the optional per-marker metadata block
    // (spec §4.G), so this revision actually probes for one, unlike the
    // pre-41 fixtures below. Padded to 84 bytes so the metadata pre-header's
    // speculative probe has enough bytes to read before it finds the
    // journal's sentinel tag and rewinds.
    let revision = 41;
    let mut file = Buf::new();
    file.push_bytes(&graph_header_pre4(revision, 1, 10.0, false));
    file.push_bytes(&channel_header_pre4(revision, 0, "Chan1", "V", 1, 1.0, 0.0));
    file.push_bytes(&foreign_header_pre4());
    file.push_bytes(&dtype_header(2, 2));
    file.push_i16(0);
    file.push_bytes(&v2_marker_header(0));
    let mut journal_section = v2_journal_section("hello\nworld\0\0");
    journal_section.resize(84, 0);
    file.push_bytes(&journal_section);

    let (datafile, errors) = acqdecode::read(Cursor::new(file.0), None);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    assert_eq!(datafile.journal.as_deref(), Some("hello\nworld"));
}

#[test]
fn journal_section_shorter_than_the_metadata_probe_still_reads_below_v381() {
    // Revision 38 (V_370) is below V_381 (41): no per-marker metadata block
    // exists on disk, so the reader must not probe for one. The journal
    // section here is 23 bytes, far short of the metadata pre-header's
    // 84-byte read -- if the metadata probe ran anyway it would hit EOF and
    // the whole decode would fail (this is exactly Scenario E from §8).
    let revision = 38;
    let mut file = Buf::new();
    file.push_bytes(&graph_header_pre4(revision, 1, 10.0, false));
    file.push_bytes(&channel_header_pre4(revision, 0, "Chan1", "V", 1, 1.0, 0.0));
    file.push_bytes(&foreign_header_pre4());
    file.push_bytes(&dtype_header(2, 2));
    file.push_i16(0);
    file.push_bytes(&v2_marker_header(0));
    file.push_bytes(&v2_journal_section("hello\nworld\0\0"));

    let (datafile, errors) = acqdecode::read(Cursor::new(file.0), None);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    assert_eq!(datafile.journal.as_deref(), Some("hello\nworld"));
}

#[test]
fn truncated_payload_yields_fewer_samples_than_declared_and_records_an_error() {
    let revision = 36;
    let mut file = Buf::new();
    file.push_bytes(&graph_header_pre4(revision, 1, 10.0, false));
    // Declares 11 samples (22 bytes) but the file physically ends after 10.
    file.push_bytes(&channel_header_pre4(revision, 0, "Chan1", "V", 11, 1.0, 0.0));
    file.push_bytes(&foreign_header_pre4());
    file.push_bytes(&dtype_header(2, 2));
    for raw in 0..10i16 {
        file.push_i16(raw);
    }

    let (datafile, errors) = acqdecode::read(Cursor::new(file.0), None);
    assert_eq!(datafile.channels[0].point_count, 11);
    assert_eq!(datafile.channels[0].raw_data().unwrap().len(), 10);
    assert!(errors.iter().any(|e| e.contains("truncated payload")));
}
