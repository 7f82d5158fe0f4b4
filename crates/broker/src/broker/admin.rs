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

use kafka_wire::schemata::api_versions_request::ApiVersionsRequest;
use kafka_wire::schemata::api_versions_response::ApiVersion;
use kafka_wire::schemata::api_versions_response::ApiVersionsResponse;
use kafka_wire::schemata::apikey::ApiMessageType;
use kafka_wire::schemata::describe_topic_partitions_request::DescribeTopicPartitionsRequest;
use kafka_wire::schemata::describe_topic_partitions_response::DescribeTopicPartitionsResponse;
use kafka_wire::schemata::describe_topic_partitions_response::DescribeTopicPartitionsResponsePartition;
use kafka_wire::schemata::describe_topic_partitions_response::DescribeTopicPartitionsResponseTopic;
use kafka_wire::schemata::error::ErrorCode;
use kafka_wire::schemata::request_header::RequestHeader;

use crate::broker::Broker;

impl Broker {
    pub(super) fn receive_api_versions(
        &self,
        header: &RequestHeader,
        _request: ApiVersionsRequest,
    ) -> ApiVersionsResponse {
        let error = if ApiMessageType::API_VERSIONS.supports(header.request_api_version) {
            ErrorCode::NONE
        } else {
            ErrorCode::UNSUPPORTED_VERSION
        };

        let api_keys = supported_apis()
            .iter()
            .map(|api| ApiVersion {
                api_key: api.api_key(),
                min_version: api.lowest_supported_version(),
                max_version: api.highest_supported_version(),
                ..Default::default()
            })
            .collect();

        ApiVersionsResponse {
            error_code: error.code(),
            api_keys,
            ..Default::default()
        }
    }

    pub(super) fn receive_describe_topic_partitions(
        &self,
        header: &RequestHeader,
        request: DescribeTopicPartitionsRequest,
    ) -> DescribeTopicPartitionsResponse {
        if !ApiMessageType::DESCRIBE_TOPIC_PARTITIONS.supports(header.request_api_version) {
            return DescribeTopicPartitionsResponse::default();
        }

        // response entries follow code-point order regardless of the request
        // order; duplicates are preserved
        let mut names = request.topics;
        names.sort();

        let topics = names.into_iter().map(|name| self.describe_topic(name)).collect();
        DescribeTopicPartitionsResponse {
            topics,
            ..Default::default()
        }
    }

    fn describe_topic(&self, name: String) -> DescribeTopicPartitionsResponseTopic {
        let topic_id = self.catalog.topic_id(&name);
        if topic_id.is_nil() {
            return DescribeTopicPartitionsResponseTopic {
                error_code: ErrorCode::UNKNOWN_TOPIC_OR_PARTITION.code(),
                name,
                ..Default::default()
            };
        }

        let partitions = self
            .catalog
            .partitions(topic_id)
            .iter()
            .map(|partition| DescribeTopicPartitionsResponsePartition {
                error_code: ErrorCode::NONE.code(),
                partition_index: partition.partition_id,
                leader_id: partition.leader,
                leader_epoch: partition.leader_epoch,
                replica_nodes: partition.replicas.clone(),
                isr_nodes: partition.isr.clone(),
                ..Default::default()
            })
            .collect();

        DescribeTopicPartitionsResponseTopic {
            error_code: ErrorCode::NONE.code(),
            name,
            topic_id,
            partitions,
            ..Default::default()
        }
    }
}

const fn supported_apis() -> &'static [ApiMessageType] {
    &[
        ApiMessageType::API_VERSIONS,
        ApiMessageType::DESCRIBE_TOPIC_PARTITIONS,
        ApiMessageType::FETCH,
        ApiMessageType::PRODUCE,
    ]
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use kafka_wire::metadata::MetadataRecord;
    use kafka_wire::metadata::PartitionRecord;
    use kafka_wire::metadata::TopicRecord;
    use stolas_meta::ClusterCatalog;
    use stolas_storage::PartitionStorage;
    use uuid::Uuid;

    use super::*;

    fn topic_id() -> Uuid {
        Uuid::parse_str("00000000-0000-4000-8000-000000000001").unwrap()
    }

    fn broker() -> Broker {
        let mut catalog = ClusterCatalog::default();
        catalog.apply(MetadataRecord::Topic(TopicRecord {
            name: "bar".to_string(),
            topic_id: topic_id(),
            ..Default::default()
        }));
        catalog.apply(MetadataRecord::Partition(PartitionRecord {
            partition_id: 0,
            topic_id: topic_id(),
            leader: 1,
            replicas: vec![1, 2],
            isr: vec![1, 2],
            ..Default::default()
        }));
        catalog.apply(MetadataRecord::Partition(PartitionRecord {
            partition_id: 1,
            topic_id: topic_id(),
            leader: 2,
            replicas: vec![1, 2],
            isr: vec![2],
            ..Default::default()
        }));
        Broker::new(Arc::new(catalog), PartitionStorage::new("/nonexistent"))
    }

    fn header(api_key: i16, api_version: i16) -> RequestHeader {
        RequestHeader {
            request_api_key: api_key,
            request_api_version: api_version,
            correlation_id: 7,
            ..Default::default()
        }
    }

    #[test]
    fn test_api_versions_lists_the_dispatch_table() {
        let response = broker().receive_api_versions(&header(18, 4), Default::default());
        assert_eq!(response.error_code, 0);

        let rows: Vec<_> = response
            .api_keys
            .iter()
            .map(|api| (api.api_key, api.min_version, api.max_version))
            .collect();
        assert_eq!(rows, vec![(18, 0, 4), (75, 0, 0), (1, 0, 16), (0, 0, 11)]);
    }

    #[test]
    fn test_api_versions_flags_unsupported_version() {
        let response = broker().receive_api_versions(&header(18, 9), Default::default());
        assert_eq!(response.error_code, 35);
        // KIP-511: the supported versions are still listed
        assert_eq!(response.api_keys.len(), 4);
    }

    #[test]
    fn test_describe_topic_partitions_sorts_topics() {
        let request = DescribeTopicPartitionsRequest {
            topics: vec!["foo".to_string(), "bar".to_string(), "foo".to_string()],
            ..Default::default()
        };
        let response = broker().receive_describe_topic_partitions(&header(75, 0), request);

        let names: Vec<_> = response.topics.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["bar", "foo", "foo"]);
        assert_eq!(response.next_cursor, -1);
    }

    #[test]
    fn test_describe_unknown_topic() {
        let request = DescribeTopicPartitionsRequest {
            topics: vec!["foo".to_string()],
            ..Default::default()
        };
        let response = broker().receive_describe_topic_partitions(&header(75, 0), request);

        let topic = &response.topics[0];
        assert_eq!(topic.error_code, 3);
        assert_eq!(topic.name, "foo");
        assert_eq!(topic.topic_id, Uuid::nil());
        assert!(!topic.is_internal);
        assert!(topic.partitions.is_empty());
        assert_eq!(topic.topic_authorized_operations, 0);
    }

    #[test]
    fn test_describe_known_topic_projects_partitions_in_order() {
        let request = DescribeTopicPartitionsRequest {
            topics: vec!["bar".to_string()],
            ..Default::default()
        };
        let response = broker().receive_describe_topic_partitions(&header(75, 0), request);

        let topic = &response.topics[0];
        assert_eq!(topic.error_code, 0);
        assert_eq!(topic.topic_id, topic_id());
        assert_eq!(topic.partitions.len(), 2);

        let first = &topic.partitions[0];
        assert_eq!(first.error_code, 0);
        assert_eq!(first.partition_index, 0);
        assert_eq!(first.leader_id, 1);
        assert_eq!(first.replica_nodes, vec![1, 2]);
        assert_eq!(first.isr_nodes, vec![1, 2]);
        assert!(first.eligible_leader_replicas.is_empty());
        assert!(first.last_known_elr.is_empty());
        assert!(first.offline_replicas.is_empty());

        let second = &topic.partitions[1];
        assert_eq!(second.partition_index, 1);
        assert_eq!(second.leader_id, 2);
        assert_eq!(second.isr_nodes, vec![2]);
    }
}
