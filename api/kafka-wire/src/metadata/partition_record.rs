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

use byteorder::ReadBytesExt;

use crate::codec::*;
use crate::IoResult;

#[derive(Debug, Default, Clone)]
pub struct PartitionRecord {
    /// The partition index within its topic.
    pub partition_id: i32,
    /// The ID of the owning topic.
    pub topic_id: uuid::Uuid,
    /// The replicas of this partition, as broker IDs.
    pub replicas: Vec<i32>,
    /// The in-sync replicas of this partition.
    pub isr: Vec<i32>,
    /// The replicas being removed from this partition.
    pub removing_replicas: Vec<i32>,
    /// The replicas being added to this partition.
    pub adding_replicas: Vec<i32>,
    /// The lead replica, or -1 if there is no leader.
    pub leader: i32,
    /// The epoch of the partition leader.
    pub leader_epoch: i32,
    /// An epoch that gets incremented each time the partition changes.
    pub partition_epoch: i32,
    pub directories: Vec<u8>,
    /// Unknown tagged fields.
    pub unknown_tagged_fields: Vec<RawTaggedField>,
}

impl Decodable for PartitionRecord {
    fn read<B: ReadBytesExt>(buf: &mut B, _version: i16) -> IoResult<Self> {
        Ok(PartitionRecord {
            partition_id: Int32.decode(buf)?,
            topic_id: Uuid.decode(buf)?,
            replicas: NullableArray(Int32, true)
                .decode(buf)?
                .ok_or_else(|| err_decode_message_null("replicas"))?,
            isr: NullableArray(Int32, true)
                .decode(buf)?
                .ok_or_else(|| err_decode_message_null("isr"))?,
            removing_replicas: NullableArray(Int32, true)
                .decode(buf)?
                .ok_or_else(|| err_decode_message_null("removing_replicas"))?,
            adding_replicas: NullableArray(Int32, true)
                .decode(buf)?
                .ok_or_else(|| err_decode_message_null("adding_replicas"))?,
            leader: Int32.decode(buf)?,
            leader_epoch: Int32.decode(buf)?,
            partition_epoch: Int32.decode(buf)?,
            directories: NullableBytes(true).decode(buf)?.unwrap_or_default(),
            unknown_tagged_fields: RawTaggedFieldList.decode(buf)?,
        })
    }
}
