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

// Version 0 is the first and, so far, only version; it has been flexible
// from the start.

#[derive(Debug, Default, Clone)]
pub struct DescribeTopicPartitionsRequest {
    /// The topics to fetch details for.
    pub topics: Vec<String>,
    /// The maximum number of partitions included in the response.
    pub response_partition_limit: i32,
    /// The first topic and partition index to fetch details for, or -1 to
    /// start from the beginning.
    pub cursor: i8,
    /// Unknown tagged fields.
    pub unknown_tagged_fields: Vec<RawTaggedField>,
}

impl Decodable for DescribeTopicPartitionsRequest {
    fn read<B: ReadBytesExt>(buf: &mut B, version: i16) -> IoResult<Self> {
        if version != 0 {
            Err(err_decode_message_unsupported(
                version,
                "DescribeTopicPartitionsRequest",
            ))?
        }

        let topics: Vec<Option<String>> = NullableArray(NullableString(true), true)
            .decode(buf)?
            .ok_or_else(|| err_decode_message_null("topics"))?;
        let mut this = DescribeTopicPartitionsRequest::default();
        for topic in topics {
            this.topics
                .push(topic.ok_or_else(|| err_decode_message_null("topics element"))?);
        }
        this.response_partition_limit = Int32.decode(buf)?;
        this.cursor = Int8.decode(buf)?;
        this.unknown_tagged_fields = RawTaggedFieldList.decode(buf)?;
        Ok(this)
    }
}
