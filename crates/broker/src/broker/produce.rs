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

use kafka_wire::schemata::produce_request::ProduceRequest;
use kafka_wire::schemata::produce_response::ProduceResponse;

use crate::broker::Broker;

impl Broker {
    /// There is no write path: the request is decoded and dropped, and the
    /// reply is a bare header that echoes the correlation id.
    pub(super) fn receive_produce(&self, request: ProduceRequest) -> ProduceResponse {
        let payloads = request
            .topic_data
            .iter()
            .flat_map(|topic| topic.partition_data.iter())
            .filter(|partition| partition.records.is_some())
            .count();
        log::debug!("discarding produce request carrying {payloads} record payloads");
        ProduceResponse::default()
    }
}
