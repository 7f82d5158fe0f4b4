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

use kafka_wire::schemata::api_versions_response::ApiVersion;
use kafka_wire::schemata::api_versions_response::ApiVersionsResponse;
use kafka_wire::schemata::apikey::ApiMessageType;
use kafka_wire::schemata::describe_topic_partitions_response::DescribeTopicPartitionsResponse;
use kafka_wire::schemata::describe_topic_partitions_response::DescribeTopicPartitionsResponsePartition;
use kafka_wire::schemata::describe_topic_partitions_response::DescribeTopicPartitionsResponseTopic;
use kafka_wire::schemata::fetch_response::FetchResponse;
use kafka_wire::schemata::fetch_response::FetchableTopicResponse;
use kafka_wire::schemata::fetch_response::PartitionData;
use kafka_wire::schemata::request_header::RequestHeader;
use kafka_wire::schemata::Request;
use kafka_wire::schemata::Response;
use uuid::Uuid;

fn supported_api_rows() -> Vec<ApiVersion> {
    [
        ApiMessageType::API_VERSIONS,
        ApiMessageType::DESCRIBE_TOPIC_PARTITIONS,
        ApiMessageType::FETCH,
        ApiMessageType::PRODUCE,
    ]
    .iter()
    .map(|api| ApiVersion {
        api_key: api.api_key(),
        min_version: api.lowest_supported_version(),
        max_version: api.highest_supported_version(),
        ..Default::default()
    })
    .collect()
}

fn frame(body: &[u8]) -> Vec<u8> {
    let mut framed = (body.len() as i32).to_be_bytes().to_vec();
    framed.extend_from_slice(body);
    framed
}

#[test]
fn test_api_versions_v4_request_decode() {
    let bytes: Vec<u8> = vec![
        0x00, 0x12, // api key 18
        0x00, 0x04, // api version 4
        0x00, 0x00, 0x00, 0x07, // correlation id
        0x00, 0x01, 0x78, // client id "x"
        0x00, // header tag buffer
        0x04, 0x6B, 0x61, 0x66, // client software name "kaf"
        0x04, 0x31, 0x2E, 0x30, // client software version "1.0"
        0x00, // body tag buffer
    ];

    let (header, request) = Request::decode(&mut Cursor::new(bytes)).unwrap();
    assert_eq!(header.request_api_key, 18);
    assert_eq!(header.request_api_version, 4);
    assert_eq!(header.correlation_id, 7);
    assert_eq!(header.client_id, "x");

    match request {
        Request::ApiVersionsRequest(req) => {
            assert_eq!(req.client_software_name, "kaf");
            assert_eq!(req.client_software_version, "1.0");
        }
        req => panic!("unexpected request {req:?}"),
    }
}

#[test]
fn test_api_versions_v4_response_bytes() {
    let header = RequestHeader {
        request_api_key: 18,
        request_api_version: 4,
        correlation_id: 7,
        ..Default::default()
    };
    let response = Response::ApiVersionsResponse(ApiVersionsResponse {
        error_code: 0,
        api_keys: supported_api_rows(),
        ..Default::default()
    });

    let mut bs = vec![];
    response.encode(header, &mut bs).unwrap();

    let body: Vec<u8> = vec![
        0x00, 0x00, 0x00, 0x07, // correlation id (header v0, no tag buffer)
        0x00, 0x00, // error code
        0x05, // compact array: 4 apis + 1
        0x00, 0x12, 0x00, 0x00, 0x00, 0x04, 0x00, // ApiVersions 0..4
        0x00, 0x4B, 0x00, 0x00, 0x00, 0x00, 0x00, // DescribeTopicPartitions 0..0
        0x00, 0x01, 0x00, 0x00, 0x00, 0x10, 0x00, // Fetch 0..16
        0x00, 0x00, 0x00, 0x00, 0x00, 0x0B, 0x00, // Produce 0..11
        0x00, 0x00, 0x00, 0x00, // throttle time
        0x00, // tag buffer
    ];
    assert_eq!(bs, frame(&body));
}

#[test]
fn test_api_versions_unsupported_version_bytes() {
    // a version 9 request is out of range: the reply carries error code 35
    // and still encodes as the newest supported layout
    let header = RequestHeader {
        request_api_key: 18,
        request_api_version: 9,
        correlation_id: 7,
        ..Default::default()
    };
    let response = Response::ApiVersionsResponse(ApiVersionsResponse {
        error_code: 35,
        api_keys: supported_api_rows(),
        ..Default::default()
    });

    let mut bs = vec![];
    response.encode(header, &mut bs).unwrap();

    assert_eq!(&bs[4..8], &[0x00, 0x00, 0x00, 0x07]);
    assert_eq!(&bs[8..10], &[0x00, 0x23]); // UNSUPPORTED_VERSION
    assert_eq!(bs[10], 0x05);
}

#[test]
fn test_describe_topic_partitions_unknown_topic_bytes() {
    let header = RequestHeader {
        request_api_key: 75,
        request_api_version: 0,
        correlation_id: 7,
        ..Default::default()
    };
    let response = Response::DescribeTopicPartitionsResponse(DescribeTopicPartitionsResponse {
        topics: vec![DescribeTopicPartitionsResponseTopic {
            error_code: 3,
            name: "foo".to_string(),
            topic_id: Uuid::nil(),
            ..Default::default()
        }],
        ..Default::default()
    });

    let mut bs = vec![];
    response.encode(header, &mut bs).unwrap();

    let body: Vec<u8> = vec![
        0x00, 0x00, 0x00, 0x07, // correlation id
        0x00, // header tag buffer
        0x00, 0x00, 0x00, 0x00, // throttle time
        0x02, // one topic
        0x00, 0x03, // UNKNOWN_TOPIC_OR_PARTITION
        0x04, 0x66, 0x6F, 0x6F, // name "foo"
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // null uuid
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        0x00, // is internal
        0x01, // empty partitions
        0x00, 0x00, 0x00, 0x00, // authorized operations
        0x00, // topic tag buffer
        0xFF, // next cursor
        0x00, // tag buffer
    ];
    assert_eq!(bs, frame(&body));
}

#[test]
fn test_describe_topic_partitions_known_topic_bytes() {
    let topic_id = Uuid::from_bytes([
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x40, 0x00, //
        0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
    ]);
    let header = RequestHeader {
        request_api_key: 75,
        request_api_version: 0,
        correlation_id: 11,
        ..Default::default()
    };
    let response = Response::DescribeTopicPartitionsResponse(DescribeTopicPartitionsResponse {
        topics: vec![DescribeTopicPartitionsResponseTopic {
            error_code: 0,
            name: "bar".to_string(),
            topic_id,
            partitions: vec![
                DescribeTopicPartitionsResponsePartition {
                    partition_index: 0,
                    leader_id: 1,
                    replica_nodes: vec![1, 2],
                    isr_nodes: vec![1, 2],
                    ..Default::default()
                },
                DescribeTopicPartitionsResponsePartition {
                    partition_index: 1,
                    leader_id: 2,
                    replica_nodes: vec![1, 2],
                    isr_nodes: vec![2],
                    ..Default::default()
                },
            ],
            ..Default::default()
        }],
        ..Default::default()
    });

    let mut bs = vec![];
    response.encode(header, &mut bs).unwrap();

    let body: Vec<u8> = vec![
        0x00, 0x00, 0x00, 0x0B, // correlation id
        0x00, // header tag buffer
        0x00, 0x00, 0x00, 0x00, // throttle time
        0x02, // one topic
        0x00, 0x00, // error code
        0x04, 0x62, 0x61, 0x72, // name "bar"
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x40, 0x00, // topic id
        0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, //
        0x00, // is internal
        0x03, // two partitions
        // partition 0
        0x00, 0x00, // error code
        0x00, 0x00, 0x00, 0x00, // partition index
        0x00, 0x00, 0x00, 0x01, // leader id
        0x00, 0x00, 0x00, 0x00, // leader epoch
        0x03, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02, // replicas [1, 2]
        0x03, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02, // isr [1, 2]
        0x01, // eligible leader replicas
        0x01, // last known elr
        0x01, // offline replicas
        0x00, // partition tag buffer
        // partition 1
        0x00, 0x00, // error code
        0x00, 0x00, 0x00, 0x01, // partition index
        0x00, 0x00, 0x00, 0x02, // leader id
        0x00, 0x00, 0x00, 0x00, // leader epoch
        0x03, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02, // replicas [1, 2]
        0x02, 0x00, 0x00, 0x00, 0x02, // isr [2]
        0x01, // eligible leader replicas
        0x01, // last known elr
        0x01, // offline replicas
        0x00, // partition tag buffer
        0x00, 0x00, 0x00, 0x00, // authorized operations
        0x00, // topic tag buffer
        0xFF, // next cursor
        0x00, // tag buffer
    ];
    assert_eq!(bs, frame(&body));
}

#[test]
fn test_fetch_unknown_topic_id_bytes() {
    let topic_id = Uuid::from_bytes([
        0xDE, 0xAD, 0xBE, 0xEF, 0xDE, 0xAD, 0xBE, 0xEF, //
        0xDE, 0xAD, 0xBE, 0xEF, 0xDE, 0xAD, 0xBE, 0xEF,
    ]);
    let header = RequestHeader {
        request_api_key: 1,
        request_api_version: 16,
        correlation_id: 5,
        ..Default::default()
    };
    let response = Response::FetchResponse(FetchResponse {
        responses: vec![FetchableTopicResponse {
            topic_id,
            partitions: vec![PartitionData {
                partition_index: 0,
                error_code: 100,
                ..Default::default()
            }],
            ..Default::default()
        }],
        ..Default::default()
    });

    let mut bs = vec![];
    response.encode(header, &mut bs).unwrap();

    let body: Vec<u8> = vec![
        0x00, 0x00, 0x00, 0x05, // correlation id
        0x00, // header tag buffer
        0x00, 0x00, 0x00, 0x00, // throttle time
        0x00, 0x00, // error code
        0x00, 0x00, 0x00, 0x00, // session id
        0x02, // one topic
        0xDE, 0xAD, 0xBE, 0xEF, 0xDE, 0xAD, 0xBE, 0xEF, // topic id
        0xDE, 0xAD, 0xBE, 0xEF, 0xDE, 0xAD, 0xBE, 0xEF, //
        0x02, // one partition
        0x00, 0x00, 0x00, 0x00, // partition index
        0x00, 0x64, // UNKNOWN_TOPIC_ID
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // high watermark
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // last stable offset
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // log start offset
        0x01, // empty aborted transactions
        0x00, 0x00, 0x00, 0x00, // preferred read replica
        0x01, // empty records
        0x00, // partition tag buffer
        0x00, // topic tag buffer
        0x00, // tag buffer
    ];
    assert_eq!(bs, frame(&body));
}

#[test]
fn test_fetch_records_blob_splice() {
    // the raw partition blob must come back as UVARINT(len + 1) || blob
    let blob = vec![0xCA, 0xFE, 0xBA, 0xBE];
    let header = RequestHeader {
        request_api_key: 1,
        request_api_version: 16,
        correlation_id: 1,
        ..Default::default()
    };
    let response = Response::FetchResponse(FetchResponse {
        responses: vec![FetchableTopicResponse {
            topic_id: Uuid::nil(),
            partitions: vec![PartitionData {
                records: blob.clone(),
                ..Default::default()
            }],
            ..Default::default()
        }],
        ..Default::default()
    });

    let mut bs = vec![];
    response.encode(header, &mut bs).unwrap();

    let needle = [&[0x05u8], blob.as_slice()].concat();
    assert!(bs
        .windows(needle.len())
        .any(|window| window == needle.as_slice()));
}

#[test]
fn test_fetch_request_decode_v16() {
    let bytes: Vec<u8> = vec![
        0x00, 0x01, // api key 1
        0x00, 0x10, // api version 16
        0x00, 0x00, 0x00, 0x2A, // correlation id 42
        0x00, 0x02, 0x6B, 0x66, // client id "kf"
        0x00, // header tag buffer
        0x00, 0x00, 0x01, 0xF4, // max wait ms 500
        0x00, 0x00, 0x00, 0x01, // min bytes
        0x00, 0x10, 0x00, 0x00, // max bytes
        0x00, // isolation level
        0x00, 0x00, 0x00, 0x00, // session id
        0xFF, 0xFF, 0xFF, 0xFF, // session epoch -1
        0x02, // one topic
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, // topic id
        0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, //
        0x02, // one partition
        0x00, 0x00, 0x00, 0x00, // partition
        0xFF, 0xFF, 0xFF, 0xFF, // current leader epoch -1
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // fetch offset
        0xFF, 0xFF, 0xFF, 0xFF, // last fetched epoch -1
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // log start offset -1
        0x00, 0x10, 0x00, 0x00, // partition max bytes
        0x00, // partition tag buffer
        0x00, // topic tag buffer
        0x01, // empty forgotten topics
        0x01, // empty rack id
        0x00, // body tag buffer
    ];

    let (header, request) = Request::decode(&mut Cursor::new(bytes)).unwrap();
    assert_eq!(header.correlation_id, 42);
    assert_eq!(header.client_id, "kf");

    match request {
        Request::FetchRequest(req) => {
            assert_eq!(req.max_wait_ms, 500);
            assert_eq!(req.min_bytes, 1);
            assert_eq!(req.session_epoch, -1);
            assert_eq!(req.topics.len(), 1);
            let topic = &req.topics[0];
            assert_eq!(
                topic.topic_id,
                Uuid::parse_str("00010203-0405-0607-0809-0a0b0c0d0e0f").unwrap()
            );
            assert_eq!(topic.partitions.len(), 1);
            assert_eq!(topic.partitions[0].partition, 0);
            assert_eq!(topic.partitions[0].partition_max_bytes, 0x100000);
            assert!(req.forgotten_topics_data.is_empty());
            assert_eq!(req.rack_id, "");
        }
        req => panic!("unexpected request {req:?}"),
    }
}

#[test]
fn test_describe_topic_partitions_request_decode() {
    let bytes: Vec<u8> = vec![
        0x00, 0x4B, // api key 75
        0x00, 0x00, // api version 0
        0x00, 0x00, 0x00, 0x07, // correlation id
        0x00, 0x01, 0x78, // client id "x"
        0x00, // header tag buffer
        0x03, // two topics
        0x04, 0x62, 0x61, 0x7A, // "baz"
        0x04, 0x62, 0x61, 0x72, // "bar"
        0x00, 0x00, 0x00, 0x64, // response partition limit
        0xFF, // null cursor
        0x00, // body tag buffer
    ];

    let (header, request) = Request::decode(&mut Cursor::new(bytes)).unwrap();
    assert_eq!(header.request_api_key, 75);

    match request {
        Request::DescribeTopicPartitionsRequest(req) => {
            // request order is preserved; the handler sorts
            assert_eq!(req.topics, vec!["baz".to_string(), "bar".to_string()]);
            assert_eq!(req.response_partition_limit, 100);
            assert_eq!(req.cursor, -1);
        }
        req => panic!("unexpected request {req:?}"),
    }
}

#[test]
fn test_produce_request_decode_v11() {
    let bytes: Vec<u8> = vec![
        0x00, 0x00, // api key 0
        0x00, 0x0B, // api version 11
        0x00, 0x00, 0x00, 0x09, // correlation id
        0x00, 0x01, 0x70, // client id "p"
        0x00, // header tag buffer
        0x00, // null transactional id
        0xFF, 0xFF, // acks -1
        0x00, 0x00, 0x05, 0xDC, // timeout ms 1500
        0x02, // one topic
        0x04, 0x62, 0x61, 0x72, // name "bar"
        0x02, // one partition
        0x00, 0x00, 0x00, 0x00, // index
        0x05, 0xDE, 0xAD, 0xBE, 0xEF, // records
        0x00, // partition tag buffer
        0x00, // topic tag buffer
        0x00, // body tag buffer
    ];

    let (header, request) = Request::decode(&mut Cursor::new(bytes)).unwrap();
    assert_eq!(header.correlation_id, 9);

    match request {
        Request::ProduceRequest(req) => {
            assert_eq!(req.transactional_id, None);
            assert_eq!(req.acks, -1);
            assert_eq!(req.timeout_ms, 1500);
            assert_eq!(req.topic_data.len(), 1);
            assert_eq!(req.topic_data[0].name, "bar");
            assert_eq!(
                req.topic_data[0].partition_data[0].records,
                Some(vec![0xDE, 0xAD, 0xBE, 0xEF])
            );
        }
        req => panic!("unexpected request {req:?}"),
    }
}

#[test]
fn test_unknown_api_key_fails_decode() {
    let bytes: Vec<u8> = vec![
        0x00, 0x2A, // api key 42
        0x00, 0x00, // api version 0
        0x00, 0x00, 0x00, 0x01, // correlation id
        0xFF, 0xFF, // null client id
        0x00, // tag buffer
    ];
    assert!(Request::decode(&mut Cursor::new(bytes)).is_err());
}

#[test]
fn test_out_of_range_version_skips_body_decode() {
    // fetch v17 does not exist: the header still parses and the body is
    // ignored so the broker can reply UNSUPPORTED_VERSION
    let bytes: Vec<u8> = vec![
        0x00, 0x01, // api key 1
        0x00, 0x11, // api version 17
        0x00, 0x00, 0x00, 0x03, // correlation id
        0xFF, 0xFF, // null client id
        0x00, // header tag buffer
        0xAB, 0xCD, // bytes that match no schema
    ];

    let (header, request) = Request::decode(&mut Cursor::new(bytes)).unwrap();
    assert_eq!(header.request_api_version, 17);
    assert!(matches!(request, Request::FetchRequest(_)));
}

#[test]
fn test_encode_sizes_are_consistent() {
    let response = FetchResponse {
        responses: vec![FetchableTopicResponse {
            topic_id: Uuid::nil(),
            partitions: vec![PartitionData {
                records: vec![0x01, 0x02, 0x03],
                ..Default::default()
            }],
            ..Default::default()
        }],
        ..Default::default()
    };

    for version in [0i16, 4, 11, 12, 16] {
        use kafka_wire::codec::Encodable;
        let mut bs = vec![];
        response.write(&mut bs, version).unwrap();
        assert_eq!(bs.len(), response.calculate_size(version), "version {version}");
    }
}
