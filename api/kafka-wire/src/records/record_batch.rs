// Copyright 2024 tison <wander4096@gmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::io::Cursor;

use crate::codec::err_codec_message;
use crate::codec::Decoder;
use crate::codec::Int16;
use crate::codec::Int32;
use crate::codec::Int64;
use crate::codec::Int8;
use crate::codec::RecordList;
use crate::codec::UInt32;
use crate::records::Record;
use crate::IoResult;

/// Bytes that precede every batch body: base offset (8) plus batch length (4).
pub const LOG_OVERHEAD: usize = 12;

#[derive(Debug, Default, Clone)]
pub struct RecordBatch {
    pub base_offset: i64,
    pub batch_length: i32,
    pub partition_leader_epoch: i32,
    pub magic: i8,
    pub crc: u32,
    pub attributes: i16,
    pub last_offset_delta: i32,
    pub base_timestamp: i64,
    pub max_timestamp: i64,
    pub producer_id: i64,
    pub producer_epoch: i16,
    pub base_sequence: i32,
    pub records: Vec<Record>,
}

impl RecordBatch {
    /// Decodes every batch in a raw log buffer.
    ///
    /// A declared batch length reaching past the end of the buffer is clamped
    /// to the bytes that are actually present; the batch must still decode
    /// whole within them. Trailing bytes too short to hold another batch
    /// header are ignored.
    pub fn parse_all(bytes: &[u8]) -> IoResult<Vec<RecordBatch>> {
        let mut batches = vec![];
        let mut pos = 0;
        while bytes.len() - pos >= LOG_OVERHEAD {
            let mut header = Cursor::new(&bytes[pos..]);
            let base_offset = Int64.decode(&mut header)?;
            let batch_length = Int32.decode(&mut header)?;
            if batch_length < 0 {
                return Err(err_codec_message(format!(
                    "invalid record batch length: {batch_length}"
                )));
            }

            let remaining = bytes.len() - pos - LOG_OVERHEAD;
            let body_len = (batch_length as usize).min(remaining);
            let body = &bytes[pos + LOG_OVERHEAD..pos + LOG_OVERHEAD + body_len];
            batches.push(RecordBatch::read_body(base_offset, batch_length, body)?);
            pos += LOG_OVERHEAD + body_len;
        }
        Ok(batches)
    }

    fn read_body(base_offset: i64, batch_length: i32, body: &[u8]) -> IoResult<RecordBatch> {
        let mut buf = Cursor::new(body);
        Ok(RecordBatch {
            base_offset,
            batch_length,
            partition_leader_epoch: Int32.decode(&mut buf)?,
            magic: Int8.decode(&mut buf)?,
            crc: UInt32.decode(&mut buf)?,
            attributes: Int16.decode(&mut buf)?,
            last_offset_delta: Int32.decode(&mut buf)?,
            base_timestamp: Int64.decode(&mut buf)?,
            max_timestamp: Int64.decode(&mut buf)?,
            producer_id: Int64.decode(&mut buf)?,
            producer_epoch: Int16.decode(&mut buf)?,
            base_sequence: Int32.decode(&mut buf)?,
            records: RecordList.decode(&mut buf)?,
        })
    }

    pub fn last_offset(&self) -> i64 {
        self.base_offset + self.last_offset_delta as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &[u8] = &[
        // batch 1
        0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, // first offset
        0x0, 0x0, 0x0, 0x52, // record batch size
        0xFF, 0xFF, 0xFF, 0xFF, // partition leader epoch
        0x2,  // magic byte
        0xE2, 0x3F, 0xC9, 0x74, // crc
        0x0, 0x0, // attributes
        0x0, 0x0, 0x0, 0x0, // last offset delta
        0x0, 0x0, 0x1, 0x89, 0xAF, 0x78, 0x40, 0x72, // base timestamp
        0x0, 0x0, 0x1, 0x89, 0xAF, 0x78, 0x40, 0x72, // max timestamp
        0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x1, // producer ID
        0x0, 0x0, // producer epoch
        0x0, 0x0, 0x0, 0x0, // base sequence
        0x0, 0x0, 0x0, 0x1,  // record counts
        0x40, // first record size
        0x0,  // attribute
        0x0,  // timestamp delta
        0x0,  // offset delta
        0x1,  // key length (zigzag : -1)
        // empty key payload
        0x34, // value length (zigzag : 26)
        0x54, 0x68, 0x69, 0x73, 0x20, 0x69, 0x73, 0x20, 0x74, 0x68, 0x65, 0x20, 0x66, 0x69, 0x72,
        0x73, 0x74, 0x20, 0x6D, 0x65, 0x73, 0x73, 0x61, 0x67, 0x65, 0x2E, // value payload
        0x0,  // header counts
        // batch 2
        0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x1, // first offset
        0x0, 0x0, 0x0, 0x52, // record batch size
        0xFF, 0xFF, 0xFF, 0xFF, // partition leader epoch
        0x2,  // magic byte
        0xE2, 0x3F, 0xC9, 0x74, // crc
        0x0, 0x0, // attributes
        0x0, 0x0, 0x0, 0x0, // last offset delta
        0x0, 0x0, 0x1, 0x89, 0xAF, 0x78, 0x40, 0x72, // base timestamp
        0x0, 0x0, 0x1, 0x89, 0xAF, 0x78, 0x40, 0x72, // max timestamp
        0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x1, // producer ID
        0x0, 0x0, // producer epoch
        0x0, 0x0, 0x0, 0x0, // base sequence
        0x0, 0x0, 0x0, 0x1,  // record counts
        0x40, // first record size
        0x0,  // attribute
        0x0,  // timestamp delta
        0x0,  // offset delta
        0x1,  // key length (zigzag : -1)
        // empty key payload
        0x34, // value length (zigzag : 26)
        0x54, 0x68, 0x69, 0x73, 0x20, 0x69, 0x73, 0x20, 0x74, 0x68, 0x65, 0x20, 0x66, 0x69, 0x72,
        0x73, 0x74, 0x20, 0x6D, 0x65, 0x73, 0x73, 0x61, 0x67, 0x65, 0x2E, // value payload
        0x0,  // header counts
    ];

    #[test]
    fn test_parse_record_batches() {
        let batches = RecordBatch::parse_all(RECORD).unwrap();
        assert_eq!(batches.len(), 2);

        let batch = &batches[0];
        assert_eq!(batch.base_offset, 0);
        assert_eq!(batch.batch_length, 0x52);
        assert_eq!(batch.magic, 2);
        assert_eq!(batch.producer_id, 1);
        assert_eq!(batch.records.len(), 1);

        let record = &batch.records[0];
        assert_eq!(record.key_len, -1);
        assert_eq!(record.key, None);
        assert_eq!(record.value_len, 26);
        assert_eq!(
            record.value.as_deref().map(String::from_utf8_lossy),
            Some("This is the first message.".into())
        );

        assert_eq!(batches[1].base_offset, 1);
    }

    #[test]
    fn test_parse_clamps_overstated_batch_length() {
        let mut bytes = RECORD[..94].to_vec();
        // declare a batch length far past the end of the buffer
        bytes[11] = 0xFF;
        let batches = RecordBatch::parse_all(&bytes).unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].records.len(), 1);
    }

    #[test]
    fn test_parse_ignores_short_trailer() {
        let mut bytes = RECORD[..94].to_vec();
        bytes.extend_from_slice(&[0x0; 5]);
        let batches = RecordBatch::parse_all(&bytes).unwrap();
        assert_eq!(batches.len(), 1);
    }

    #[test]
    fn test_parse_aborts_on_truncated_record() {
        // keep the batch header but cut the record stream short
        let bytes = &RECORD[..80];
        assert!(RecordBatch::parse_all(bytes).is_err());
    }
}
