//! zstd framing for record streams.
//!
//! The codec is a plain byte transform: decoding an encoded stream must
//! give back the exact input bytes, and the level only trades speed for
//! size.

use crate::{config::DEFAULT_COMPRESSION_LEVEL, error::MathResult};
use std::io::{Read, Write};
use zstd::stream::write::Encoder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZstdCodec {
    pub level: i32,
}

impl ZstdCodec {
    pub fn new(level: i32) -> Self {
        Self { level }
    }

    /// Streaming encoder over `writer`. Call `finish()` on it to flush
    /// the final frame.
    pub fn encoder<W: Write>(&self, writer: W) -> MathResult<Encoder<'static, W>> {
        Ok(Encoder::new(writer, self.level)?)
    }

    pub fn compress(&self, bytes: &[u8]) -> MathResult<Vec<u8>> {
        Ok(zstd::stream::encode_all(bytes, self.level)?)
    }

    pub fn decompress<R: Read>(&self, reader: R) -> MathResult<Vec<u8>> {
        Ok(zstd::stream::decode_all(reader)?)
    }
}

impl Default for ZstdCodec {
    fn default() -> Self {
        Self::new(DEFAULT_COMPRESSION_LEVEL)
    }
}
