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

use std::fmt;
use std::fmt::Display;
use std::io;

use crate::codec::err_codec_message;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct ApiMessageType {
    api_key: i16,
    lowest_supported_version: i16,
    highest_supported_version: i16,
}

impl ApiMessageType {
    const fn new(
        api_key: i16,
        lowest_supported_version: i16,
        highest_supported_version: i16,
    ) -> Self {
        Self {
            api_key,
            lowest_supported_version,
            highest_supported_version,
        }
    }

    pub fn api_key(&self) -> i16 {
        self.api_key
    }

    pub fn lowest_supported_version(&self) -> i16 {
        self.lowest_supported_version
    }

    pub fn highest_supported_version(&self) -> i16 {
        self.highest_supported_version
    }

    pub fn supports(&self, api_version: i16) -> bool {
        (self.lowest_supported_version..=self.highest_supported_version).contains(&api_version)
    }

    /// Clamps the requested version into the supported range.
    ///
    /// Responses to out-of-range requests are encoded at the nearest
    /// supported version so that they stay schema-valid on the wire.
    pub fn effective_version(&self, api_version: i16) -> i16 {
        api_version.clamp(
            self.lowest_supported_version,
            self.highest_supported_version,
        )
    }
}

impl ApiMessageType {
    pub const PRODUCE: Self = ApiMessageType::new(0, 0, 11);
    pub const FETCH: Self = ApiMessageType::new(1, 0, 16);
    pub const API_VERSIONS: Self = ApiMessageType::new(18, 0, 4);
    pub const DESCRIBE_TOPIC_PARTITIONS: Self = ApiMessageType::new(75, 0, 0);
}

impl TryFrom<i16> for ApiMessageType {
    type Error = io::Error;

    fn try_from(api_key: i16) -> Result<Self, Self::Error> {
        match api_key {
            0 => Ok(ApiMessageType::PRODUCE),
            1 => Ok(ApiMessageType::FETCH),
            18 => Ok(ApiMessageType::API_VERSIONS),
            75 => Ok(ApiMessageType::DESCRIBE_TOPIC_PARTITIONS),
            _ => Err(err_codec_message(format!("unknown api key {api_key}"))),
        }
    }
}

impl Display for ApiMessageType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match *self {
                ApiMessageType::PRODUCE => "Produce",
                ApiMessageType::FETCH => "Fetch",
                ApiMessageType::API_VERSIONS => "ApiVersions",
                ApiMessageType::DESCRIBE_TOPIC_PARTITIONS => "DescribeTopicPartitions",
                api_key => unreachable!("unknown api key {:?}", api_key),
            }
        )
    }
}

impl ApiMessageType {
    pub fn request_header_version(&self, api_version: i16) -> i16 {
        // the current difference is whether the request is flexible
        fn resolve_request_header_version(flexible: bool) -> i16 {
            if flexible {
                2
            } else {
                1
            }
        }

        match *self {
            ApiMessageType::PRODUCE => resolve_request_header_version(api_version >= 9),
            ApiMessageType::FETCH => resolve_request_header_version(api_version >= 12),
            ApiMessageType::API_VERSIONS => resolve_request_header_version(api_version >= 3),
            // DescribeTopicPartitions has always been flexible.
            ApiMessageType::DESCRIBE_TOPIC_PARTITIONS => 2,
            _ => unreachable!("unknown api type {}", self.api_key),
        }
    }

    pub fn response_header_version(&self, api_version: i16) -> i16 {
        // the current difference is whether the response is flexible
        fn resolve_response_header_version(flexible: bool) -> i16 {
            if flexible {
                1
            } else {
                0
            }
        }

        match *self {
            ApiMessageType::PRODUCE => resolve_response_header_version(api_version >= 9),
            ApiMessageType::FETCH => resolve_response_header_version(api_version >= 12),
            ApiMessageType::API_VERSIONS => {
                // ApiVersionsResponse always includes a v0 header.
                // @see KIP-511 https://cwiki.apache.org/confluence/display/KAFKA/KIP-511%3A+Collect+and+Expose+Client%27s+Name+and+Version+in+the+Brokers
                0
            }
            ApiMessageType::DESCRIBE_TOPIC_PARTITIONS => 1,
            _ => unreachable!("unknown api type {}", self.api_key),
        }
    }
}
