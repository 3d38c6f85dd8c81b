//! Transaction wire format
//!
//! Little-endian throughout; variable-length integers use the Bitcoin
//! varint scheme (1 byte below 0xfd, else a prefix byte and a u16/u32/u64).

use crate::script::Script;
use crate::types::{OutPoint, Transaction, TransactionInput, TransactionOutput};
use thiserror::Error;

/// Wire-format decoding failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TxDecodeError {
    #[error("Unexpected end of data at byte {0}")]
    UnexpectedEnd(usize),

    #[error("Non-canonical varint encoding")]
    NonCanonicalVarint,

    #[error("Declared length {0} exceeds remaining data")]
    LengthOverflow(u64),

    #[error("Trailing bytes after transaction")]
    TrailingBytes,
}

/// Append a varint to `out`.
pub fn write_varint(out: &mut Vec<u8>, value: u64) {
    if value < 0xfd {
        out.push(value as u8);
    } else if value <= 0xffff {
        out.push(0xfd);
        out.extend_from_slice(&(value as u16).to_le_bytes());
    } else if value <= 0xffff_ffff {
        out.push(0xfe);
        out.extend_from_slice(&(value as u32).to_le_bytes());
    } else {
        out.push(0xff);
        out.extend_from_slice(&value.to_le_bytes());
    }
}

/// Encode a varint on its own.
pub fn encode_varint(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(9);
    write_varint(&mut out, value);
    out
}

/// Byte-slice reader with position tracking.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Reader { data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], TxDecodeError> {
        if self.pos + n > self.data.len() {
            return Err(TxDecodeError::UnexpectedEnd(self.pos));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u32(&mut self) -> Result<u32, TxDecodeError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_i32(&mut self) -> Result<i32, TxDecodeError> {
        Ok(self.read_u32()? as i32)
    }

    fn read_i64(&mut self) -> Result<i64, TxDecodeError> {
        let b = self.take(8)?;
        Ok(i64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    fn read_varint(&mut self) -> Result<u64, TxDecodeError> {
        let first = self.take(1)?[0];
        match first {
            0xfd => {
                let b = self.take(2)?;
                Ok(u16::from_le_bytes([b[0], b[1]]) as u64)
            }
            0xfe => Ok(self.read_u32()? as u64),
            0xff => {
                let b = self.take(8)?;
                Ok(u64::from_le_bytes([
                    b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
                ]))
            }
            n => Ok(n as u64),
        }
    }

    fn read_bytes(&mut self, len: u64) -> Result<Vec<u8>, TxDecodeError> {
        if len > (self.data.len() - self.pos) as u64 {
            return Err(TxDecodeError::LengthOverflow(len));
        }
        Ok(self.take(len as usize)?.to_vec())
    }

    fn done(&self) -> bool {
        self.pos == self.data.len()
    }
}

/// Serialize a transaction to its wire form.
pub fn serialize_tx(tx: &Transaction) -> Vec<u8> {
    let mut out = Vec::with_capacity(10 + tx.inputs.len() * 64 + tx.outputs.len() * 40);

    out.extend_from_slice(&tx.version.to_le_bytes());

    write_varint(&mut out, tx.inputs.len() as u64);
    for input in &tx.inputs {
        out.extend_from_slice(&input.prevout.txid);
        out.extend_from_slice(&input.prevout.index.to_le_bytes());
        write_varint(&mut out, input.script_sig.len() as u64);
        out.extend_from_slice(input.script_sig.as_bytes());
        out.extend_from_slice(&input.sequence.to_le_bytes());
    }

    write_varint(&mut out, tx.outputs.len() as u64);
    for output in &tx.outputs {
        out.extend_from_slice(&output.value.to_le_bytes());
        write_varint(&mut out, output.script_pubkey.len() as u64);
        out.extend_from_slice(output.script_pubkey.as_bytes());
    }

    out.extend_from_slice(&tx.lock_time.to_le_bytes());
    out
}

/// Decode a transaction from its wire form. The whole buffer must be
/// consumed.
pub fn deserialize_tx(data: &[u8]) -> Result<Transaction, TxDecodeError> {
    let mut r = Reader::new(data);

    let version = r.read_i32()?;

    let n_inputs = r.read_varint()?;
    let mut inputs = Vec::with_capacity(n_inputs.min(1024) as usize);
    for _ in 0..n_inputs {
        let txid_bytes = r.take(32)?;
        let mut txid = [0u8; 32];
        txid.copy_from_slice(txid_bytes);
        let index = r.read_u32()?;
        let script_len = r.read_varint()?;
        let script_sig = Script::from_bytes(r.read_bytes(script_len)?);
        let sequence = r.read_u32()?;
        inputs.push(TransactionInput {
            prevout: OutPoint { txid, index },
            script_sig,
            sequence,
        });
    }

    let n_outputs = r.read_varint()?;
    let mut outputs = Vec::with_capacity(n_outputs.min(1024) as usize);
    for _ in 0..n_outputs {
        let value = r.read_i64()?;
        let script_len = r.read_varint()?;
        let script_pubkey = Script::from_bytes(r.read_bytes(script_len)?);
        outputs.push(TransactionOutput {
            value,
            script_pubkey,
        });
    }

    let lock_time = r.read_u32()?;

    if !r.done() {
        return Err(TxDecodeError::TrailingBytes);
    }

    Ok(Transaction {
        version,
        inputs,
        outputs,
        lock_time,
    })
}

/// Serialize to lowercase hex.
pub fn tx_to_hex(tx: &Transaction) -> String {
    hex::encode(serialize_tx(tx))
}

/// Decode from hex.
pub fn tx_from_hex(s: &str) -> Result<Transaction, TxDecodeError> {
    let data = hex::decode(s).map_err(|_| TxDecodeError::UnexpectedEnd(0))?;
    deserialize_tx(&data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TxBuilder;

    fn sample_tx() -> Transaction {
        TxBuilder::new()
            .version(2)
            .lock_time(101)
            .input(
                OutPoint::new([0xaa; 32], 3),
                Script::from_bytes(vec![0x51]),
                0xffff_fffe,
            )
            .output(42_000, Script::from_bytes(vec![0x76, 0xa9]))
            .build()
    }

    #[test]
    fn test_varint_encoding() {
        assert_eq!(encode_varint(0), vec![0]);
        assert_eq!(encode_varint(252), vec![252]);
        assert_eq!(encode_varint(253), vec![0xfd, 253, 0]);
        assert_eq!(encode_varint(65535), vec![0xfd, 255, 255]);
        assert_eq!(encode_varint(65536), vec![0xfe, 0, 0, 1, 0]);
        assert_eq!(
            encode_varint(0x1_0000_0000),
            vec![0xff, 0, 0, 0, 0, 1, 0, 0, 0]
        );
    }

    #[test]
    fn test_round_trip() {
        let tx = sample_tx();
        let bytes = serialize_tx(&tx);
        let decoded = deserialize_tx(&bytes).unwrap();
        assert_eq!(decoded, tx);
    }

    #[test]
    fn test_hex_round_trip() {
        let tx = sample_tx();
        assert_eq!(tx_from_hex(&tx_to_hex(&tx)).unwrap(), tx);
    }

    #[test]
    fn test_empty_tx_layout() {
        let tx = Transaction {
            version: 1,
            inputs: vec![],
            outputs: vec![],
            lock_time: 0,
        };
        // version(4) + n_in(1) + n_out(1) + locktime(4)
        assert_eq!(serialize_tx(&tx).len(), 10);
    }

    #[test]
    fn test_truncated_fails() {
        let tx = sample_tx();
        let bytes = serialize_tx(&tx);
        let err = deserialize_tx(&bytes[..bytes.len() - 2]);
        assert!(err.is_err());
    }

    #[test]
    fn test_trailing_bytes_fail() {
        let tx = sample_tx();
        let mut bytes = serialize_tx(&tx);
        bytes.push(0x00);
        assert_eq!(deserialize_tx(&bytes), Err(TxDecodeError::TrailingBytes));
    }

    #[test]
    fn test_negative_version_round_trip() {
        let tx = TxBuilder::new().version(-1).build();
        let decoded = deserialize_tx(&serialize_tx(&tx)).unwrap();
        assert_eq!(decoded.version, -1);
    }
}
