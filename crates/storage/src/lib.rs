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

use std::path::PathBuf;

use error_stack::Result;
use opendal::Operator;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{0}")]
    OpenDAL(opendal::Error),
}

/// Read access to the partition segment files under the logs root.
///
/// Each partition lives in `<logs_dir>/<topic>-<partition>/` and holds one or
/// more `*.log` segment files. Operators are built per read; nothing is
/// cached across requests.
#[derive(Debug, Clone)]
pub struct PartitionStorage {
    logs_dir: PathBuf,
}

impl PartitionStorage {
    pub fn new(logs_dir: impl Into<PathBuf>) -> Self {
        Self {
            logs_dir: logs_dir.into(),
        }
    }

    /// Concatenates every `.log` segment of the partition, in ascending
    /// file-name order. A missing partition directory is an error.
    pub async fn read_partition(
        &self,
        topic_name: &str,
        partition_index: i32,
    ) -> Result<Vec<u8>, StorageError> {
        let op = self.make_op()?;
        let dir = format!("{topic_name}-{partition_index}/");

        // a partition without a directory is unknown, not empty
        op.stat(&dir).await.map_err(StorageError::OpenDAL)?;

        let mut entries = op.list(&dir).await.map_err(StorageError::OpenDAL)?;
        entries.sort_by(|a, b| a.name().cmp(b.name()));

        let mut records = vec![];
        for entry in entries {
            if !entry.metadata().mode().is_file() || !entry.name().ends_with(".log") {
                continue;
            }
            let segment = op.read(entry.path()).await.map_err(StorageError::OpenDAL)?;
            records.extend_from_slice(&segment.to_vec());
        }
        Ok(records)
    }

    fn make_op(&self) -> Result<Operator, StorageError> {
        let builder = opendal::services::Fs::default().root(&self.logs_dir.to_string_lossy());
        let op = Operator::new(builder).map_err(StorageError::OpenDAL)?;
        Ok(op.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed_partition(root: &std::path::Path, dir: &str, segments: &[(&str, &[u8])]) {
        let partition_dir = root.join(dir);
        std::fs::create_dir_all(&partition_dir).unwrap();
        for (name, bytes) in segments {
            std::fs::write(partition_dir.join(name), bytes).unwrap();
        }
    }

    #[tokio::test]
    async fn test_read_single_segment() {
        let root = tempfile::tempdir().unwrap();
        seed_partition(
            root.path(),
            "bar-0",
            &[("00000000000000000000.log", b"hello records")],
        );

        let storage = PartitionStorage::new(root.path());
        let records = storage.read_partition("bar", 0).await.unwrap();
        assert_eq!(records, b"hello records");
    }

    #[tokio::test]
    async fn test_read_concatenates_segments_in_name_order() {
        let root = tempfile::tempdir().unwrap();
        seed_partition(
            root.path(),
            "bar-1",
            &[
                ("00000000000000000010.log", b"-second"),
                ("00000000000000000000.log", b"first"),
                ("leader-epoch-checkpoint", b"ignored"),
            ],
        );

        let storage = PartitionStorage::new(root.path());
        let records = storage.read_partition("bar", 1).await.unwrap();
        assert_eq!(records, b"first-second");
    }

    #[tokio::test]
    async fn test_missing_partition_directory_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let storage = PartitionStorage::new(root.path());
        assert!(storage.read_partition("ghost", 0).await.is_err());
    }

    #[tokio::test]
    async fn test_empty_segment_reads_as_empty() {
        let root = tempfile::tempdir().unwrap();
        seed_partition(root.path(), "bar-0", &[("00000000000000000000.log", b"")]);

        let storage = PartitionStorage::new(root.path());
        let records = storage.read_partition("bar", 0).await.unwrap();
        assert!(records.is_empty());
    }
}
