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

//! The topic/partition catalog of a Stolas broker.
//!
//! [`bootstrap::load_catalog`] parses the on-disk KRaft cluster-metadata log
//! into a [`ClusterCatalog`] once at startup; the catalog is frozen afterwards
//! and shared read-only across every connection worker.

mod bootstrap;
pub use bootstrap::*;

mod catalog;
pub use catalog::*;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct MetaError(pub String);
