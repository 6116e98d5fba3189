//! Sample payload reading: the interleaved-uncompressed demultiplexer
//! (component I) and the per-channel zlib reader (component J).

pub mod compressed;
pub mod demux;
