//! The work record sent by the client.
//!
//! Layout, integers little-endian:
//!
//! ```text
//! +--------+-----------+-----------+-----------------+
//! | tag 8B | command 4B| length 4B | payload (length)|
//! +--------+-----------+-----------+-----------------+
//! ```

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::Error;

pub const TAG_LEN: usize = 8;
pub const HEADER_LEN: usize = TAG_LEN + 4 + 4;
pub const WORK_TAG: &[u8] = b"work";
pub const CMD_WORK: u32 = 1;

const PAYLOAD_FRAGMENT: &str =
    "aaaaaaaaaaaaaaaaaaaa高万禄aaaaaaaaaaaaaaaabhdsbjchbfvjbdfjvbfjdhvbjhfbh";
const PAYLOAD_REPEAT: usize = 10;

/// The built-in message every round carries.
pub fn default_payload() -> String {
    PAYLOAD_FRAGMENT.repeat(PAYLOAD_REPEAT)
}

/// NUL-pads or truncates `tag` to exactly [`TAG_LEN`] bytes.
pub fn pad_tag(tag: &[u8]) -> [u8; TAG_LEN] {
    let mut out = [0u8; TAG_LEN];
    let n = tag.len().min(TAG_LEN);
    out[..n].copy_from_slice(&tag[..n]);
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkRecord {
    pub tag: [u8; TAG_LEN],
    pub command: u32,
    pub payload: Bytes,
}

impl WorkRecord {
    pub fn work(message: &str) -> Self {
        WorkRecord {
            tag: pad_tag(WORK_TAG),
            command: CMD_WORK,
            payload: Bytes::copy_from_slice(message.as_bytes()),
        }
    }

    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.payload.len()
    }

    /// Appends the wire form to `dst`. The length field is always taken from
    /// the payload itself.
    pub fn encode(&self, dst: &mut BytesMut) -> Result<(), Error> {
        let len = u32::try_from(self.payload.len())
            .map_err(|_| Error::PayloadTooLarge(self.payload.len()))?;
        dst.reserve(self.encoded_len());
        dst.put_slice(&self.tag);
        dst.put_u32_le(self.command);
        dst.put_u32_le(len);
        dst.put_slice(&self.payload);
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Bytes, Error> {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode(&mut buf)?;
        Ok(buf.freeze())
    }

    /// Parses one record from the front of `src`.
    ///
    /// Returns `Ok(None)` while the header or payload is still incomplete,
    /// otherwise the record and the number of bytes it occupied.
    pub fn parse(src: &[u8]) -> Result<Option<(WorkRecord, usize)>, Error> {
        if src.len() < HEADER_LEN {
            return Ok(None);
        }
        let mut header = &src[..HEADER_LEN];
        let mut tag = [0u8; TAG_LEN];
        header.copy_to_slice(&mut tag);
        let command = header.get_u32_le();
        let len = header.get_u32_le() as usize;
        let total = HEADER_LEN
            .checked_add(len)
            .ok_or(Error::PayloadTooLarge(len))?;
        if src.len() < total {
            return Ok(None);
        }
        let record = WorkRecord {
            tag,
            command,
            payload: Bytes::copy_from_slice(&src[HEADER_LEN..total]),
        };
        Ok(Some((record, total)))
    }

    /// The length field as it would appear on the wire.
    pub fn declared_len(header: &[u8]) -> Option<u32> {
        header
            .get(TAG_LEN + 4..HEADER_LEN)
            .map(|mut b| b.get_u32_le())
    }
}
