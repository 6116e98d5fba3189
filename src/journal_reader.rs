//! Journal text reader (component H), grounded on
//! `original_source/bioread/journal_reader.py`.

use crate::byte_order::{decode_text, read_bytes};
use crate::header::{V2JournalHeader, V4JournalHeader, V4JournalLengthHeader};
use crate::header_reader::HeaderReader;
use crate::revision::{V_370, V_400B};
use std::io::{Read, Seek};

pub enum JournalHeader {
    V2(Option<V2JournalHeader>),
    V4 {
        length_header: V4JournalLengthHeader,
        header: Option<V4JournalHeader>,
    },
}

pub struct JournalResult {
    pub header: JournalHeader,
    pub text: Option<String>,
}

pub fn read_journal<R: Read + Seek>(hr: &mut HeaderReader<R>) -> crate::errors::Result<JournalResult> {
    if hr.revision <= V_400B {
        read_journal_v2(hr)
    } else {
        read_journal_v4(hr)
    }
}

fn read_journal_v2<R: Read + Seek>(hr: &mut HeaderReader<R>) -> crate::errors::Result<JournalResult> {
    if hr.revision < V_370 {
        // No journal section exists at all below this revision -- nothing
        // to seek to, nothing to read.
        return Ok(JournalResult {
            header: JournalHeader::V2(None),
            text: None,
        });
    }
    let offset = hr.position()?;
    let (order, utf8) = (hr.order, hr.utf8);
    let header = hr.single_header(offset, |hr, _| V2JournalHeader::read(hr.source, order))?;
    if !header.tag_matches_expected() {
        return Err(crate::errors::AcqError::JournalTagMismatch {
            expected: "44332211".to_string(),
            found: header.tag_hex(),
        });
    }
    let bytes = read_bytes(hr.source, header.journal_len().max(0) as usize)?;
    let text = decode_text(&bytes, utf8);
    Ok(JournalResult {
        header: JournalHeader::V2(Some(header)),
        text: Some(text),
    })
}

fn read_journal_v4<R: Read + Seek>(hr: &mut HeaderReader<R>) -> crate::errors::Result<JournalResult> {
    let offset = hr.position()?;
    let (order, utf8, revision) = (hr.order, hr.utf8, hr.revision);
    let length_header =
        hr.single_header(offset, |hr, off| V4JournalLengthHeader::read(hr.source, order, off))?;
    let journal_len = length_header.journal_len();

    let mut header = None;
    let mut text = None;
    if V4JournalHeader::struct_length(revision) <= journal_len.max(0) as u64 {
        let header_offset = hr.position()?;
        let h = hr.single_header(header_offset, |hr, _| V4JournalHeader::read(hr.source, revision, order))?;
        let bytes = read_bytes(hr.source, h.journal_len().max(0) as usize)?;
        text = Some(decode_text(&bytes, utf8));
        header = Some(h);
    }

    hr.seek_to(length_header.data_end())?;
    Ok(JournalResult {
        header: JournalHeader::V4 { length_header, header },
        text,
    })
}
