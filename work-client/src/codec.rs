use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::record::{WorkRecord, HEADER_LEN};
use crate::Error;

/// Upper bound of one reply read.
pub const REPLY_CHUNK: usize = 1024;

/// Largest payload the sink is willing to buffer.
pub const MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// Client side: writes work records, reads raw reply chunks.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClientCodec;

impl Encoder<&WorkRecord> for ClientCodec {
    type Error = Error;

    fn encode(&mut self, item: &WorkRecord, dst: &mut BytesMut) -> Result<(), Error> {
        item.encode(dst)
    }
}

impl Decoder for ClientCodec {
    type Item = BytesMut;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<BytesMut>, Error> {
        if src.is_empty() {
            return Ok(None);
        }
        let n = src.len().min(REPLY_CHUNK);
        Ok(Some(src.split_to(n)))
    }
}

/// Server side: reassembles work records, writes raw replies.
#[derive(Debug, Default, Clone, Copy)]
pub struct SinkCodec;

impl Decoder for SinkCodec {
    type Item = WorkRecord;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<WorkRecord>, Error> {
        if let Some(len) = WorkRecord::declared_len(src) {
            let len = len as usize;
            if len > MAX_PAYLOAD {
                return Err(Error::PayloadTooLarge(len));
            }
            src.reserve((HEADER_LEN + len).saturating_sub(src.len()));
        }
        match WorkRecord::parse(src)? {
            Some((record, used)) => {
                src.advance(used);
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }
}

impl Encoder<Bytes> for SinkCodec {
    type Error = Error;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), Error> {
        dst.extend_from_slice(&item);
        Ok(())
    }
}
