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

use std::net::SocketAddr;
use std::sync::Arc;

use error_stack::Result;
use error_stack::ResultExt;
use mea::latch::Latch;
use mea::waitgroup::WaitGroup;
use stolas_protos::config::ServerConfig;
use stolas_storage::PartitionStorage;

use crate::broker::bootstrap_broker;
use crate::broker::BrokerBootstrapContext;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ServerError(pub(crate) String);

pub(crate) type ServerFuture<T> = stolas_runtime::JoinHandle<Result<T, ServerError>>;

#[derive(Debug)]
pub struct ServerState {
    broker_addr: SocketAddr,
    broker_fut: ServerFuture<()>,
    shutdown: Arc<Latch>,
}

impl ServerState {
    pub fn broker_addr(&self) -> SocketAddr {
        self.broker_addr
    }

    pub fn shutdown_handle(&self) -> impl Fn() {
        let shutdown = self.shutdown.clone();
        move || shutdown.count_down()
    }

    pub fn shutdown(&self) {
        self.shutdown_handle()();
    }

    pub async fn await_shutdown(self) {
        self.shutdown.wait().await;

        match futures::future::try_join_all(vec![flatten(self.broker_fut)]).await {
            Ok(_) => log::info!("Stolas server stopped."),
            Err(err) => log::error!(err:?; "Stolas server failed."),
        }
    }
}

pub async fn start(config: ServerConfig) -> Result<ServerState, ServerError> {
    let make_error = || ServerError("failed to start server".to_string());
    let shutdown = Arc::new(Latch::new(1));
    let wg = WaitGroup::new();

    // the catalog is built once, single-threaded, before the accept loop
    // starts; a corrupt metadata log is fatal
    let catalog = stolas_meta::load_catalog(&config.storage.logs_dir)
        .map(Arc::new)
        .change_context_lazy(make_error)?;
    let storage = PartitionStorage::new(config.storage.logs_dir.clone());

    let (broker_addr, broker_fut) = bootstrap_broker(BrokerBootstrapContext {
        config: config.broker,
        catalog,
        storage,
        wg: wg.clone(),
        shutdown: shutdown.clone(),
    })
    .await?;

    // wait for the listener to start and return
    wg.await;
    Ok(ServerState {
        broker_addr,
        broker_fut,
        shutdown,
    })
}

async fn flatten<T>(fut: ServerFuture<T>) -> Result<T, ServerError> {
    let make_error = || ServerError("failed to join server future".to_string());
    fut.await.change_context_lazy(make_error)?
}
