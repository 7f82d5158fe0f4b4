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

//! Typed payloads of the KRaft cluster-metadata log.
//!
//! Every record value starts with a 3-byte header `{frame_version,
//! record_type, version}`; the body that follows is a flexible-version
//! struct keyed by `record_type`.

use std::io::Cursor;

use crate::codec::Decodable;
use crate::codec::Decoder;
use crate::codec::Int8;
use crate::IoResult;

mod feature_level_record;
pub use feature_level_record::FeatureLevelRecord;

mod partition_record;
pub use partition_record::PartitionRecord;

mod topic_record;
pub use topic_record::TopicRecord;

pub const TOPIC_RECORD: i8 = 2;
pub const PARTITION_RECORD: i8 = 3;
pub const FEATURE_LEVEL_RECORD: i8 = 12;

#[derive(Debug, Clone)]
pub enum MetadataRecord {
    Topic(TopicRecord),
    Partition(PartitionRecord),
    FeatureLevel(FeatureLevelRecord),
}

impl MetadataRecord {
    /// Decodes the payload of a metadata-log record value.
    ///
    /// Returns `None` for empty values and for record types this broker does
    /// not track; callers skip those without failing the batch.
    pub fn decode(value: &[u8]) -> IoResult<Option<MetadataRecord>> {
        if value.is_empty() {
            return Ok(None);
        }

        let mut buf = Cursor::new(value);
        let _frame_version = Int8.decode(&mut buf)?;
        let record_type = Int8.decode(&mut buf)?;
        let version = Int8.decode(&mut buf)? as i16;

        match record_type {
            TOPIC_RECORD => TopicRecord::read(&mut buf, version)
                .map(MetadataRecord::Topic)
                .map(Some),
            PARTITION_RECORD => PartitionRecord::read(&mut buf, version)
                .map(MetadataRecord::Partition)
                .map(Some),
            FEATURE_LEVEL_RECORD => FeatureLevelRecord::read(&mut buf, version)
                .map(MetadataRecord::FeatureLevel)
                .map(Some),
            _ => Ok(None),
        }
    }
}
