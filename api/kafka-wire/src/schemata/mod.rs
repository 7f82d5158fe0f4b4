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

use byteorder::BigEndian;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;

use crate::codec::Decodable;
use crate::codec::Encodable;
use crate::codec::Encoder;
use crate::codec::Int32;
use crate::schemata::apikey::ApiMessageType;
use crate::schemata::request_header::RequestHeader;
use crate::schemata::response_header::ResponseHeader;
use crate::IoResult;

pub mod apikey;
pub mod error;

pub mod api_versions_request;
pub mod api_versions_response;
pub mod describe_topic_partitions_request;
pub mod describe_topic_partitions_response;
pub mod fetch_request;
pub mod fetch_response;
pub mod produce_request;
pub mod produce_response;
pub mod request_header;
pub mod response_header;

#[derive(Debug)]
pub enum Request {
    ApiVersionsRequest(api_versions_request::ApiVersionsRequest),
    DescribeTopicPartitionsRequest(
        describe_topic_partitions_request::DescribeTopicPartitionsRequest,
    ),
    FetchRequest(fetch_request::FetchRequest),
    ProduceRequest(produce_request::ProduceRequest),
}

impl Request {
    pub fn decode<T: AsRef<[u8]>>(buf: &mut Cursor<T>) -> IoResult<(RequestHeader, Request)> {
        let header_version = {
            let pos = buf.position();
            let api_key = buf.read_i16::<BigEndian>()?;
            let api_version = buf.read_i16::<BigEndian>()?;
            buf.set_position(pos);
            ApiMessageType::try_from(api_key)?.request_header_version(api_version)
        };

        let header = RequestHeader::read(buf, header_version)?;
        let api_type = ApiMessageType::try_from(header.request_api_key)?;
        let api_version = header.request_api_version;

        // An out-of-range version still deserves a well-formed error reply.
        // The body cannot be trusted to match any known schema, so it is left
        // unread and the handler answers UNSUPPORTED_VERSION.
        if !api_type.supports(api_version) {
            let request = match api_type {
                ApiMessageType::API_VERSIONS => {
                    Request::ApiVersionsRequest(Default::default())
                }
                ApiMessageType::DESCRIBE_TOPIC_PARTITIONS => {
                    Request::DescribeTopicPartitionsRequest(Default::default())
                }
                ApiMessageType::FETCH => Request::FetchRequest(Default::default()),
                ApiMessageType::PRODUCE => Request::ProduceRequest(Default::default()),
                api_type => unreachable!("unknown api type {}", api_type),
            };
            return Ok((header, request));
        }

        let request = match api_type {
            ApiMessageType::API_VERSIONS => {
                api_versions_request::ApiVersionsRequest::read(buf, api_version)
                    .map(Request::ApiVersionsRequest)
            }
            ApiMessageType::DESCRIBE_TOPIC_PARTITIONS => {
                describe_topic_partitions_request::DescribeTopicPartitionsRequest::read(
                    buf,
                    api_version,
                )
                .map(Request::DescribeTopicPartitionsRequest)
            }
            ApiMessageType::FETCH => {
                fetch_request::FetchRequest::read(buf, api_version).map(Request::FetchRequest)
            }
            ApiMessageType::PRODUCE => {
                produce_request::ProduceRequest::read(buf, api_version).map(Request::ProduceRequest)
            }
            api_type => unreachable!("unknown api type {}", api_type),
        }?;

        Ok((header, request))
    }
}

#[derive(Debug)]
pub enum Response {
    ApiVersionsResponse(api_versions_response::ApiVersionsResponse),
    DescribeTopicPartitionsResponse(
        describe_topic_partitions_response::DescribeTopicPartitionsResponse,
    ),
    FetchResponse(fetch_response::FetchResponse),
    ProduceResponse(produce_response::ProduceResponse),
}

impl Response {
    pub fn encode<B: WriteBytesExt>(&self, header: RequestHeader, buf: &mut B) -> IoResult<()> {
        let api_type = ApiMessageType::try_from(header.request_api_key)?;
        // Encode at the nearest supported version so that replies to
        // out-of-range requests stay schema-valid.
        let api_version = api_type.effective_version(header.request_api_version);
        let correlation_id = header.correlation_id;

        let response_header_version = api_type.response_header_version(api_version);
        let response_header = ResponseHeader {
            correlation_id,
            unknown_tagged_fields: vec![],
        };

        // 1. total size
        let size = self.calculate_size(api_version)
            + response_header.calculate_size(response_header_version);
        Int32.encode(buf, size as i32)?;

        // 2. response header
        response_header.write(buf, response_header_version)?;

        // 3. response body
        self.do_encode(buf, api_version)
    }

    fn calculate_size(&self, version: i16) -> usize {
        match self {
            Response::ApiVersionsResponse(resp) => resp.calculate_size(version),
            Response::DescribeTopicPartitionsResponse(resp) => resp.calculate_size(version),
            Response::FetchResponse(resp) => resp.calculate_size(version),
            Response::ProduceResponse(resp) => resp.calculate_size(version),
        }
    }

    fn do_encode<B: WriteBytesExt>(&self, buf: &mut B, version: i16) -> IoResult<()> {
        match self {
            Response::ApiVersionsResponse(resp) => resp.write(buf, version),
            Response::DescribeTopicPartitionsResponse(resp) => resp.write(buf, version),
            Response::FetchResponse(resp) => resp.write(buf, version),
            Response::ProduceResponse(resp) => resp.write(buf, version),
        }
    }
}
