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

use std::collections::HashMap;
use std::fmt::Write;

use kafka_wire::metadata::MetadataRecord;
use kafka_wire::metadata::PartitionRecord;
use uuid::Uuid;

/// In-memory indexes over the cluster-metadata log.
///
/// Name-to-id bindings are last-wins; partition lists are append-only in
/// observation order and may contain duplicates, which readers tolerate.
#[derive(Debug, Default)]
pub struct ClusterCatalog {
    topic_ids: HashMap<String, Uuid>,
    topic_names: HashMap<Uuid, String>,
    partitions: HashMap<Uuid, Vec<PartitionRecord>>,
    partition_ids: HashMap<Uuid, Vec<i32>>,
    feature_levels: HashMap<String, i16>,
}

impl ClusterCatalog {
    /// Folds one metadata record into the indexes.
    pub fn apply(&mut self, record: MetadataRecord) {
        match record {
            MetadataRecord::Topic(topic) => {
                self.topic_names.insert(topic.topic_id, topic.name.clone());
                self.topic_ids.insert(topic.name, topic.topic_id);
            }
            MetadataRecord::Partition(partition) => {
                self.partition_ids
                    .entry(partition.topic_id)
                    .or_default()
                    .push(partition.partition_id);
                self.partitions
                    .entry(partition.topic_id)
                    .or_default()
                    .push(partition);
            }
            MetadataRecord::FeatureLevel(feature) => {
                self.feature_levels
                    .insert(feature.name, feature.feature_level);
            }
        }
    }

    /// Resolves a topic name to its id; the nil UUID denotes an unknown
    /// topic.
    pub fn topic_id(&self, name: &str) -> Uuid {
        self.topic_ids.get(name).copied().unwrap_or_else(Uuid::nil)
    }

    pub fn topic_name(&self, topic_id: Uuid) -> Option<&str> {
        self.topic_names.get(&topic_id).map(String::as_str)
    }

    /// Every partition record observed for the topic, in observation order.
    pub fn partitions(&self, topic_id: Uuid) -> &[PartitionRecord] {
        self.partitions
            .get(&topic_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The partition indexes of the topic, parallel to [`Self::partitions`].
    pub fn partition_ids(&self, topic_id: Uuid) -> &[i32] {
        self.partition_ids
            .get(&topic_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains_partition(&self, topic_id: Uuid, partition_index: i32) -> bool {
        self.partition_ids(topic_id).contains(&partition_index)
    }

    pub fn feature_level(&self, name: &str) -> Option<i16> {
        self.feature_levels.get(name).copied()
    }

    pub fn topic_count(&self) -> usize {
        self.topic_ids.len()
    }

    /// A canonical rendering of the indexes, independent of hash order.
    ///
    /// Two catalogs built from the same log bytes render identically.
    pub fn canonical_state(&self) -> String {
        let mut out = String::new();

        let mut names = self.topic_ids.iter().collect::<Vec<_>>();
        names.sort();
        for (name, id) in names {
            writeln!(out, "topic {name} => {id}").unwrap();
        }

        let mut ids = self.topic_names.iter().collect::<Vec<_>>();
        ids.sort();
        for (id, name) in ids {
            writeln!(out, "id {id} => {name}").unwrap();
        }

        let mut partitions = self.partitions.iter().collect::<Vec<_>>();
        partitions.sort_by_key(|(id, _)| **id);
        for (id, records) in partitions {
            for record in records {
                writeln!(
                    out,
                    "partition {id}/{} leader={} leader_epoch={} replicas={:?} isr={:?}",
                    record.partition_id,
                    record.leader,
                    record.leader_epoch,
                    record.replicas,
                    record.isr,
                )
                .unwrap();
            }
        }

        let mut parallel = self.partition_ids.iter().collect::<Vec<_>>();
        parallel.sort_by_key(|(id, _)| **id);
        for (id, indexes) in parallel {
            writeln!(out, "partition_ids {id} => {indexes:?}").unwrap();
        }

        let mut features = self.feature_levels.iter().collect::<Vec<_>>();
        features.sort();
        for (name, level) in features {
            writeln!(out, "feature {name} => {level}").unwrap();
        }

        out
    }
}
