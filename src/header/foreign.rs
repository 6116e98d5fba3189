use super::Header;
use crate::byte_order::ByteOrder;
use crate::revision::*;
use std::io::{self, Read};

#[derive(Debug, Clone)]
pub struct ForeignHeaderPre4 {
    length: i16,
}

#[derive(Debug, Clone)]
pub struct ForeignHeaderPost4 {
    length: i32,
}

#[derive(Debug, Clone)]
pub enum ForeignHeader {
    Pre4(ForeignHeaderPre4),
    Post4(ForeignHeaderPost4),
}

impl ForeignHeader {
    /// The foreign header's own pre4/post4 split is `V_390`, not `V_400B`
    /// like every other header family (DESIGN.md Open Question 2).
    pub fn read(r: &mut impl Read, revision: i32, order: ByteOrder) -> io::Result<Self> {
        if revision <= V_390 {
            let length = order.read_i16(r)?;
            Ok(ForeignHeader::Pre4(ForeignHeaderPre4 { length }))
        } else {
            let length = order.read_i32(r)?;
            Ok(ForeignHeader::Post4(ForeignHeaderPost4 { length }))
        }
    }
}

impl Header for ForeignHeader {
    fn effective_len_bytes(&self) -> u64 {
        match self {
            ForeignHeader::Pre4(h) => h.length as u64,
            ForeignHeader::Post4(h) => h.length as u64,
        }
    }
}
