//! Pack header prefixed to every push frame.
//!
//! Layout (big-endian):
//!
//! ```text
//! [ mark_len: u8 ][ mark: mark_len bytes ][ serial: u32 ][ func_no: u16 ]
//! ```
//!
//! The mark identifies the logical service a frame belongs to
//! ([`crate::PUSH_MARK`] for registry pushes); `func_no` selects the body
//! shape.

use bytes::Buf;
use bytes::BufMut;
use bytes::Bytes;
use bytes::BytesMut;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame truncated: need {need} more bytes")]
    Truncated { need: usize },

    #[error("mark is not valid utf-8")]
    InvalidMark,

    #[error("unexpected mark: expected {expected}, found {found}")]
    MarkMismatch { expected: String, found: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackHeader {
    pub mark: String,
    pub serial: u32,
    pub func_no: u16,
}

impl PackHeader {
    pub fn new(
        mark: &str,
        serial: u32,
        func_no: u16,
    ) -> Self {
        Self {
            mark: mark.to_string(),
            serial,
            func_no,
        }
    }

    pub fn encoded_len(&self) -> usize {
        1 + self.mark.len() + 4 + 2
    }

    pub fn encode(&self) -> Bytes {
        debug_assert!(self.mark.len() <= u8::MAX as usize);

        let mut buf = BytesMut::with_capacity(self.encoded_len());
        buf.put_u8(self.mark.len() as u8);
        buf.put_slice(self.mark.as_bytes());
        buf.put_u32(self.serial);
        buf.put_u16(self.func_no);
        buf.freeze()
    }

    /// Decodes a header from the front of `buf`, advancing it past the
    /// header so that the remainder is the frame body.
    pub fn decode(buf: &mut impl Buf) -> Result<Self, FrameError> {
        if buf.remaining() < 1 {
            return Err(FrameError::Truncated { need: 1 });
        }
        let mark_len = buf.get_u8() as usize;

        let rest = mark_len + 4 + 2;
        if buf.remaining() < rest {
            return Err(FrameError::Truncated {
                need: rest - buf.remaining(),
            });
        }

        let mut mark_bytes = vec![0u8; mark_len];
        buf.copy_to_slice(&mut mark_bytes);
        let mark = String::from_utf8(mark_bytes).map_err(|_| FrameError::InvalidMark)?;

        let serial = buf.get_u32();
        let func_no = buf.get_u16();

        Ok(Self {
            mark,
            serial,
            func_no,
        })
    }

    /// Decodes and checks the mark in one step.
    pub fn decode_expect(
        buf: &mut impl Buf,
        expected_mark: &str,
    ) -> Result<Self, FrameError> {
        let header = Self::decode(buf)?;
        if header.mark != expected_mark {
            return Err(FrameError::MarkMismatch {
                expected: expected_mark.to_string(),
                found: header.mark,
            });
        }

        Ok(header)
    }
}
