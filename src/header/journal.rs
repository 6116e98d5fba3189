use super::Header;
use crate::byte_order::read_bytes;
use crate::byte_order::ByteOrder;
use crate::revision::*;
use std::io::{self, Read};

const EXPECTED_TAG: [u8; 4] = [0x44, 0x33, 0x22, 0x11];

#[derive(Debug, Clone, Copy)]
pub struct V2JournalHeader {
    tag: [u8; 4],
    journal_len: i32,
}

impl V2JournalHeader {
    /// Sentinel tag also used by `_read_v2_marker_metadata` to recognize
    /// when the marker section has no per-marker metadata block at all.
    pub const TAG: [u8; 4] = EXPECTED_TAG;

    pub fn read(r: &mut impl Read, order: ByteOrder) -> io::Result<Self> {
        let mut tag = [0u8; 4];
        r.read_exact(&mut tag)?;
        let _show = order.read_i16(r)?;
        let journal_len = order.read_i32(r)?;
        Ok(V2JournalHeader { tag, journal_len })
    }

    pub fn tag_matches_expected(&self) -> bool {
        self.tag == EXPECTED_TAG
    }

    pub fn tag_hex(&self) -> String {
        self.tag.iter().map(|b| format!("{:02X}", b)).collect()
    }

    pub fn journal_len(&self) -> i32 {
        self.journal_len
    }
}

impl Header for V2JournalHeader {
    fn effective_len_bytes(&self) -> u64 {
        10
    }
}

#[derive(Debug, Clone, Copy)]
pub struct V4JournalHeader {
    journal_len: i32,
}

impl V4JournalHeader {
    pub fn read(r: &mut impl Read, revision: i32, order: ByteOrder) -> io::Result<Self> {
        read_bytes(r, 262)?; // bUnknown1
        let early_journal_len = order.read_i32(r)?;
        read_bytes(r, 290)?; // bUnknown2
        let mut late_journal_len = None;
        if revision >= V_420 {
            read_bytes(r, 26)?; // bUnknown3
        }
        if revision >= V_440 {
            read_bytes(r, 4)?; // bUnknown4
        }
        if revision >= V_420 {
            order.read_i32(r)?; // lLateJournalLenMinusOne
            late_journal_len = Some(order.read_i32(r)?); // lLateJournalLen
        }
        let journal_len = if revision < V_420 {
            early_journal_len
        } else {
            late_journal_len.unwrap_or(early_journal_len)
        };
        Ok(V4JournalHeader { journal_len })
    }

    /// Struct size for this revision -- used only to decide whether a full
    /// journal header is present at all (see `V4JournalLengthHeader`).
    pub fn struct_length(revision: i32) -> u64 {
        let mut len = 262 + 4 + 290;
        if revision >= V_420 {
            len += 26;
        }
        if revision >= V_440 {
            len += 4;
        }
        if revision >= V_420 {
            len += 4 + 4;
        }
        len
    }

    pub fn journal_len(&self) -> i32 {
        self.journal_len
    }
}

impl Header for V4JournalHeader {
    fn effective_len_bytes(&self) -> u64 {
        // Callers that need this compute it from `struct_length` directly
        // since it depends on revision, not just the decoded instance.
        0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct V4JournalLengthHeader {
    offset: u64,
    journal_len: i32,
}

impl V4JournalLengthHeader {
    pub fn read(r: &mut impl Read, order: ByteOrder, offset: u64) -> io::Result<Self> {
        let journal_len = order.read_i32(r)?;
        Ok(V4JournalLengthHeader { offset, journal_len })
    }

    pub fn journal_len(&self) -> i32 {
        self.journal_len
    }

    pub fn data_end(&self) -> u64 {
        (self.offset as i64 + self.journal_len as i64) as u64
    }
}

impl Header for V4JournalLengthHeader {
    fn effective_len_bytes(&self) -> u64 {
        4
    }
}
