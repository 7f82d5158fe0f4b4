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

use byteorder::WriteBytesExt;

use crate::codec::*;
use crate::IoResult;

// Version 0 is the first and, so far, only version; it has been flexible
// from the start.

#[derive(Debug, Clone)]
pub struct DescribeTopicPartitionsResponse {
    /// The duration in milliseconds for which the request was throttled due to a quota violation,
    /// or zero if the request did not violate any quota.
    pub throttle_time_ms: i32,
    /// Each topic in the response.
    pub topics: Vec<DescribeTopicPartitionsResponseTopic>,
    /// The next topic and partition index to fetch details for, or -1 when
    /// the iteration is complete.
    pub next_cursor: i8,
    /// Unknown tagged fields.
    pub unknown_tagged_fields: Vec<RawTaggedField>,
}

impl Default for DescribeTopicPartitionsResponse {
    fn default() -> Self {
        DescribeTopicPartitionsResponse {
            throttle_time_ms: 0,
            topics: vec![],
            next_cursor: -1,
            unknown_tagged_fields: vec![],
        }
    }
}

impl Encodable for DescribeTopicPartitionsResponse {
    fn write<B: WriteBytesExt>(&self, buf: &mut B, version: i16) -> IoResult<()> {
        if version != 0 {
            Err(err_encode_message_unsupported(
                version,
                "DescribeTopicPartitionsResponse",
            ))?
        }
        Int32.encode(buf, self.throttle_time_ms)?;
        NullableArray(Struct(version), true).encode(buf, self.topics.as_slice())?;
        Int8.encode(buf, self.next_cursor)?;
        RawTaggedFieldList.encode(buf, self.unknown_tagged_fields.as_slice())?;
        Ok(())
    }

    fn calculate_size(&self, version: i16) -> usize {
        let mut res = 0;
        res += Int32::SIZE; // self.throttle_time_ms
        res += NullableArray(Struct(version), true).calculate_size(self.topics.as_slice());
        res += Int8::SIZE; // self.next_cursor
        res += RawTaggedFieldList.calculate_size(self.unknown_tagged_fields.as_slice());
        res
    }
}

#[derive(Debug, Default, Clone)]
pub struct DescribeTopicPartitionsResponseTopic {
    /// The topic error, or 0 if there was no error.
    pub error_code: i16,
    /// The topic name.
    pub name: String,
    /// The topic id.
    pub topic_id: uuid::Uuid,
    /// True if the topic is internal.
    pub is_internal: bool,
    /// Each partition in the topic.
    pub partitions: Vec<DescribeTopicPartitionsResponsePartition>,
    /// 32-bit bitfield representing the authorized operations for this topic.
    pub topic_authorized_operations: i32,
    /// Unknown tagged fields.
    pub unknown_tagged_fields: Vec<RawTaggedField>,
}

impl Encodable for DescribeTopicPartitionsResponseTopic {
    fn write<B: WriteBytesExt>(&self, buf: &mut B, version: i16) -> IoResult<()> {
        Int16.encode(buf, self.error_code)?;
        NullableString(true).encode(buf, self.name.as_str())?;
        Uuid.encode(buf, self.topic_id)?;
        Bool.encode(buf, self.is_internal)?;
        NullableArray(Struct(version), true).encode(buf, self.partitions.as_slice())?;
        Int32.encode(buf, self.topic_authorized_operations)?;
        RawTaggedFieldList.encode(buf, self.unknown_tagged_fields.as_slice())?;
        Ok(())
    }

    fn calculate_size(&self, version: i16) -> usize {
        let mut res = 0;
        res += Int16::SIZE; // self.error_code
        res += NullableString(true).calculate_size(self.name.as_str());
        res += Uuid::SIZE; // self.topic_id
        res += Bool::SIZE; // self.is_internal
        res += NullableArray(Struct(version), true).calculate_size(self.partitions.as_slice());
        res += Int32::SIZE; // self.topic_authorized_operations
        res += RawTaggedFieldList.calculate_size(self.unknown_tagged_fields.as_slice());
        res
    }
}

#[derive(Debug, Default, Clone)]
pub struct DescribeTopicPartitionsResponsePartition {
    /// The partition error, or 0 if there was no error.
    pub error_code: i16,
    /// The partition index.
    pub partition_index: i32,
    /// The ID of the leader broker.
    pub leader_id: i32,
    /// The leader epoch of this partition.
    pub leader_epoch: i32,
    /// The set of all nodes that host this partition.
    pub replica_nodes: Vec<i32>,
    /// The set of nodes that are in sync with the leader for this partition.
    pub isr_nodes: Vec<i32>,
    /// The new eligible leader replicas otherwise.
    pub eligible_leader_replicas: Vec<i32>,
    /// The last known ELR.
    pub last_known_elr: Vec<i32>,
    /// The set of offline replicas of this partition.
    pub offline_replicas: Vec<i32>,
    /// Unknown tagged fields.
    pub unknown_tagged_fields: Vec<RawTaggedField>,
}

impl Encodable for DescribeTopicPartitionsResponsePartition {
    fn write<B: WriteBytesExt>(&self, buf: &mut B, _version: i16) -> IoResult<()> {
        Int16.encode(buf, self.error_code)?;
        Int32.encode(buf, self.partition_index)?;
        Int32.encode(buf, self.leader_id)?;
        Int32.encode(buf, self.leader_epoch)?;
        NullableArray(Int32, true).encode(buf, self.replica_nodes.as_slice())?;
        NullableArray(Int32, true).encode(buf, self.isr_nodes.as_slice())?;
        NullableArray(Int32, true).encode(buf, self.eligible_leader_replicas.as_slice())?;
        NullableArray(Int32, true).encode(buf, self.last_known_elr.as_slice())?;
        NullableArray(Int32, true).encode(buf, self.offline_replicas.as_slice())?;
        RawTaggedFieldList.encode(buf, self.unknown_tagged_fields.as_slice())?;
        Ok(())
    }

    fn calculate_size(&self, _version: i16) -> usize {
        let mut res = 0;
        res += Int16::SIZE; // self.error_code
        res += Int32::SIZE; // self.partition_index
        res += Int32::SIZE; // self.leader_id
        res += Int32::SIZE; // self.leader_epoch
        res += NullableArray(Int32, true).calculate_size(self.replica_nodes.as_slice());
        res += NullableArray(Int32, true).calculate_size(self.isr_nodes.as_slice());
        res += NullableArray(Int32, true).calculate_size(self.eligible_leader_replicas.as_slice());
        res += NullableArray(Int32, true).calculate_size(self.last_known_elr.as_slice());
        res += NullableArray(Int32, true).calculate_size(self.offline_replicas.as_slice());
        res += RawTaggedFieldList.calculate_size(self.unknown_tagged_fields.as_slice());
        res
    }
}
