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

use std::sync::Arc;

use kafka_wire::schemata::request_header::RequestHeader;
use kafka_wire::schemata::Request;
use kafka_wire::schemata::Response;
use stolas_meta::ClusterCatalog;
use stolas_storage::PartitionStorage;

mod admin;
mod fetch;
mod produce;

#[derive(Debug)]
pub struct Broker {
    catalog: Arc<ClusterCatalog>,
    storage: PartitionStorage,
}

impl Broker {
    pub fn new(catalog: Arc<ClusterCatalog>, storage: PartitionStorage) -> Self {
        Broker { catalog, storage }
    }
}

impl Broker {
    pub async fn reply(&self, header: RequestHeader, request: Request) -> Response {
        match request {
            Request::ApiVersionsRequest(request) => {
                Response::ApiVersionsResponse(self.receive_api_versions(&header, request))
            }
            Request::DescribeTopicPartitionsRequest(request) => {
                Response::DescribeTopicPartitionsResponse(
                    self.receive_describe_topic_partitions(&header, request),
                )
            }
            Request::FetchRequest(request) => {
                Response::FetchResponse(self.receive_fetch(&header, request).await)
            }
            Request::ProduceRequest(request) => {
                Response::ProduceResponse(self.receive_produce(request))
            }
        }
    }
}
