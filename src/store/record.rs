//! Log record codec for the durable substrate
//!
//! Record format:
//!
//! ```text
//! +------------------+
//! | Record Length    | (u32 LE, includes this field)
//! +------------------+
//! | Key Tag          | (u8: 0 bool, 1 int, 2 float, 3 string)
//! +------------------+
//! | Key Payload      | (length-prefixed bytes)
//! +------------------+
//! | Tombstone Flag   | (u8: 0 = live, 1 = deleted)
//! +------------------+
//! | Value Payload    | (length-prefixed bytes, empty for tombstones)
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! The checksum covers all bytes except the checksum itself.

use std::io::{self, Read};

use crc32fast::Hasher;

use super::key::Key;

/// Minimum byte length of a well-formed record.
pub const MIN_RECORD_SIZE: usize = 4 + 1 + 4 + 1 + 4 + 4;

const TAG_BOOL: u8 = 0;
const TAG_INT: u8 = 1;
const TAG_FLOAT: u8 = 2;
const TAG_STRING: u8 = 3;

/// Computes a CRC32 checksum over the provided data.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// One entry in the append-only log.
///
/// The value payload is opaque bytes here; the log store serializes JSON
/// into it on write and parses it back on replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Collection key this record addresses
    pub key: Key,
    /// Whether this record removes the key
    pub is_tombstone: bool,
    /// Serialized value (empty for tombstones)
    pub payload: Vec<u8>,
}

impl LogRecord {
    /// A live record carrying a value.
    pub fn live(key: Key, payload: Vec<u8>) -> Self {
        Self {
            key,
            is_tombstone: false,
            payload,
        }
    }

    /// A tombstone removing a key.
    pub fn tombstone(key: Key) -> Self {
        Self {
            key,
            is_tombstone: true,
            payload: Vec::new(),
        }
    }

    fn key_tag_and_bytes(&self) -> (u8, Vec<u8>) {
        match &self.key {
            Key::Bool(b) => (TAG_BOOL, vec![u8::from(*b)]),
            Key::Int(i) => (TAG_INT, i.to_le_bytes().to_vec()),
            Key::Float(bits) => (TAG_FLOAT, bits.to_le_bytes().to_vec()),
            Key::String(s) => (TAG_STRING, s.as_bytes().to_vec()),
        }
    }

    /// Serialize the complete record to bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let (tag, key_bytes) = self.key_tag_and_bytes();

        let mut body = Vec::with_capacity(1 + 4 + key_bytes.len() + 1 + 4 + self.payload.len());
        body.push(tag);
        body.extend_from_slice(&(key_bytes.len() as u32).to_le_bytes());
        body.extend_from_slice(&key_bytes);
        body.push(u8::from(self.is_tombstone));
        body.extend_from_slice(&(self.payload.len() as u32).to_le_bytes());
        body.extend_from_slice(&self.payload);

        let record_length = (4 + body.len() + 4) as u32;

        // Checksum covers: length + body
        let mut checksum_data = Vec::with_capacity(4 + body.len());
        checksum_data.extend_from_slice(&record_length.to_le_bytes());
        checksum_data.extend_from_slice(&body);
        let checksum = compute_checksum(&checksum_data);

        let mut record = Vec::with_capacity(record_length as usize);
        record.extend_from_slice(&record_length.to_le_bytes());
        record.extend_from_slice(&body);
        record.extend_from_slice(&checksum.to_le_bytes());

        record
    }

    /// Deserialize a record from bytes, verifying the checksum.
    ///
    /// Returns the record and the number of bytes consumed.
    pub fn deserialize(data: &[u8]) -> io::Result<(Self, usize)> {
        if data.len() < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "record too short",
            ));
        }

        let record_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

        if record_length < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid record length: {}", record_length),
            ));
        }

        if data.len() < record_length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "record truncated: expected {} bytes, got {}",
                    record_length,
                    data.len()
                ),
            ));
        }

        let checksum_offset = record_length - 4;
        let stored_checksum = u32::from_le_bytes([
            data[checksum_offset],
            data[checksum_offset + 1],
            data[checksum_offset + 2],
            data[checksum_offset + 3],
        ]);

        let computed_checksum = compute_checksum(&data[0..checksum_offset]);
        if computed_checksum != stored_checksum {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "checksum mismatch: computed {:08x}, stored {:08x}",
                    computed_checksum, stored_checksum
                ),
            ));
        }

        let mut cursor = io::Cursor::new(&data[4..checksum_offset]);

        fn read_bytes<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
            let mut len_buf = [0u8; 4];
            reader.read_exact(&mut len_buf)?;
            let len = u32::from_le_bytes(len_buf) as usize;

            let mut buf = vec![0u8; len];
            reader.read_exact(&mut buf)?;
            Ok(buf)
        }

        let mut tag_buf = [0u8; 1];
        cursor.read_exact(&mut tag_buf)?;
        let key_bytes = read_bytes(&mut cursor)?;
        let key = Self::decode_key(tag_buf[0], &key_bytes)?;

        let mut tombstone_buf = [0u8; 1];
        cursor.read_exact(&mut tombstone_buf)?;
        let is_tombstone = tombstone_buf[0] != 0;

        let payload = read_bytes(&mut cursor)?;

        Ok((
            Self {
                key,
                is_tombstone,
                payload,
            },
            record_length,
        ))
    }

    fn decode_key(tag: u8, bytes: &[u8]) -> io::Result<Key> {
        let fixed8 = || -> io::Result<[u8; 8]> {
            bytes.try_into().map_err(|_| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("key payload length {} does not match tag", bytes.len()),
                )
            })
        };

        match tag {
            TAG_BOOL => {
                if bytes.len() != 1 {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        "bool key payload must be one byte",
                    ));
                }
                Ok(Key::Bool(bytes[0] != 0))
            }
            TAG_INT => Ok(Key::Int(i64::from_le_bytes(fixed8()?))),
            TAG_FLOAT => Ok(Key::Float(u64::from_le_bytes(fixed8()?))),
            TAG_STRING => {
                let s = String::from_utf8(bytes.to_vec()).map_err(|e| {
                    io::Error::new(io::ErrorKind::InvalidData, format!("invalid UTF-8: {}", e))
                })?;
                Ok(Key::String(s))
            }
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unknown key tag: {}", other),
            )),
        }
    }
}
