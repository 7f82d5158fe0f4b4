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

use kafka_wire::schemata::apikey::ApiMessageType;
use kafka_wire::schemata::error::ErrorCode;
use kafka_wire::schemata::fetch_request::FetchRequest;
use kafka_wire::schemata::fetch_response::FetchResponse;
use kafka_wire::schemata::fetch_response::FetchableTopicResponse;
use kafka_wire::schemata::fetch_response::PartitionData;
use kafka_wire::schemata::request_header::RequestHeader;
use uuid::Uuid;

use crate::broker::Broker;

impl Broker {
    pub(super) async fn receive_fetch(
        &self,
        header: &RequestHeader,
        request: FetchRequest,
    ) -> FetchResponse {
        if !ApiMessageType::FETCH.supports(header.request_api_version) {
            return FetchResponse {
                error_code: ErrorCode::UNSUPPORTED_VERSION.code(),
                session_id: request.session_id,
                ..Default::default()
            };
        }

        // maxWaitMs and minBytes are decoded but not honored: the reply is
        // immediate, whatever is on disk right now
        let mut responses = vec![];
        for topic in request.topics.iter() {
            let Some(topic_name) = self.catalog.topic_name(topic.topic_id) else {
                // one synthetic partition carries the unknown-topic-id error
                responses.push(FetchableTopicResponse {
                    topic: topic.topic.clone(),
                    topic_id: topic.topic_id,
                    partitions: vec![PartitionData {
                        partition_index: 0,
                        error_code: ErrorCode::UNKNOWN_TOPIC_ID.code(),
                        ..Default::default()
                    }],
                    ..Default::default()
                });
                continue;
            };

            let mut partitions = vec![];
            for part in topic.partitions.iter() {
                let partition = self
                    .fetch_partition(topic_name, topic.topic_id, part.partition)
                    .await;
                partitions.push(partition);
            }

            responses.push(FetchableTopicResponse {
                topic: topic.topic.clone(),
                topic_id: topic.topic_id,
                partitions,
                ..Default::default()
            });
        }

        FetchResponse {
            session_id: request.session_id,
            responses,
            ..Default::default()
        }
    }

    async fn fetch_partition(
        &self,
        topic_name: &str,
        topic_id: Uuid,
        partition_index: i32,
    ) -> PartitionData {
        if !self.catalog.contains_partition(topic_id, partition_index) {
            return PartitionData {
                partition_index,
                error_code: ErrorCode::UNKNOWN_TOPIC_OR_PARTITION.code(),
                ..Default::default()
            };
        }

        match self.storage.read_partition(topic_name, partition_index).await {
            // a zero-byte read is still a successful read
            Ok(records) => PartitionData {
                partition_index,
                records,
                ..Default::default()
            },
            Err(err) => {
                log::error!("failed to read partition {topic_name}-{partition_index}: {err:?}");
                PartitionData {
                    partition_index,
                    error_code: ErrorCode::UNKNOWN_TOPIC_OR_PARTITION.code(),
                    ..Default::default()
                }
            }
        }
    }
}
