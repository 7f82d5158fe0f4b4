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

use std::path::Path;
use std::path::PathBuf;

use error_stack::Result;
use error_stack::ResultExt;
use kafka_wire::metadata::MetadataRecord;
use kafka_wire::records::RecordBatch;

use crate::ClusterCatalog;
use crate::MetaError;

pub const METADATA_TOPIC_DIR: &str = "__cluster_metadata-0";
pub const METADATA_LOG_SEGMENT: &str = "00000000000000000000.log";

/// Resolves the cluster-metadata segment under the logs root.
pub fn metadata_log_path(logs_dir: &Path) -> PathBuf {
    logs_dir.join(METADATA_TOPIC_DIR).join(METADATA_LOG_SEGMENT)
}

/// Reads the cluster-metadata log and folds its records into a catalog.
///
/// Runs single-threaded before the accept loop starts; a corrupt log is
/// fatal.
pub fn load_catalog(logs_dir: &Path) -> Result<ClusterCatalog, MetaError> {
    let path = metadata_log_path(logs_dir);
    let bytes = std::fs::read(&path).change_context_lazy(|| {
        MetaError(format!(
            "failed to read cluster metadata log: {}",
            path.display()
        ))
    })?;
    build_catalog(&bytes)
        .attach_printable_lazy(|| format!("cluster metadata log: {}", path.display()))
}

/// Builds a catalog from raw metadata-log bytes.
pub fn build_catalog(bytes: &[u8]) -> Result<ClusterCatalog, MetaError> {
    let batches = RecordBatch::parse_all(bytes)
        .change_context_lazy(|| MetaError("malformed cluster metadata log".to_string()))?;

    let mut catalog = ClusterCatalog::default();
    let mut records = 0usize;
    for batch in batches {
        for record in batch.records {
            let Some(value) = record.value.as_deref() else {
                continue;
            };
            let parsed = MetadataRecord::decode(value)
                .change_context_lazy(|| MetaError("malformed metadata record".to_string()))?;
            if let Some(parsed) = parsed {
                catalog.apply(parsed);
                records += 1;
            }
        }
    }

    log::debug!(
        "loaded {records} metadata records covering {} topics",
        catalog.topic_count()
    );
    Ok(catalog)
}
