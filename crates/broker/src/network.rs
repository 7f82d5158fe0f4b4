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
use std::net::SocketAddr;
use std::sync::Arc;

use error_stack::bail;
use error_stack::ResultExt;
use kafka_wire::schemata::apikey::ApiMessageType;
use kafka_wire::schemata::Request;
use mea::latch::Latch;
use mea::waitgroup::WaitGroup;
use stolas_meta::ClusterCatalog;
use stolas_storage::PartitionStorage;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::net::TcpStream;

use crate::broker::Broker;
use crate::BrokerError;

pub async fn start_broker(
    catalog: Arc<ClusterCatalog>,
    storage: PartitionStorage,
    broker_listener: TcpListener,
    wg: WaitGroup,
    shutdown: Arc<Latch>,
) -> error_stack::Result<(), BrokerError> {
    let addr = broker_listener.local_addr().change_context_lazy(|| {
        BrokerError("failed to get local address of broker listener".to_string())
    })?;
    let broker = Arc::new(Broker::new(catalog, storage));

    log::info!("Starting Kafka listener at {addr}");
    drop(wg);

    loop {
        let socket = tokio::select! {
            _ = shutdown.wait() => {
                log::info!("Stolas server is closing");
                return Ok(());
            }
            socket = broker_listener.accept() => socket,
        };

        let (socket, remote_addr) = socket
            .change_context_lazy(|| BrokerError("failed to accept new connections".to_string()))?;
        let shutdown_ref = shutdown.clone();
        let broker_ref = broker.clone();
        let _forget = stolas_runtime::server_runtime().spawn(async move {
            if let Err(err) = process_packet(socket, remote_addr, broker_ref, shutdown_ref).await {
                log::error!("failed to process packet: {err:?}");
            }
        });
    }
}

async fn process_packet(
    mut socket: TcpStream,
    remote_addr: SocketAddr,
    broker: Arc<Broker>,
    shutdown: Arc<Latch>,
) -> error_stack::Result<(), BrokerError> {
    log::debug!("accepted connection from {remote_addr}");
    loop {
        tokio::select! {
            _ = shutdown.wait() => {
                log::info!("Stolas server is closing");
                return Ok(());
            }
            closed = process_packet_one(&mut socket, &broker) => {
                if closed? {
                    return Ok(());
                }
            }
        }
    }
}

// Process one packet from the client. Return true if the connection is closed.
async fn process_packet_one(
    socket: &mut TcpStream,
    broker: &Broker,
) -> error_stack::Result<bool, BrokerError> {
    let n = {
        let mut buf = [0; size_of::<i32>()];
        if let Err(err) = socket.read_exact(&mut buf).await {
            match err.kind() {
                std::io::ErrorKind::UnexpectedEof => {
                    log::debug!("connection closed by client");
                    return Ok(true);
                }
                _ => bail!(BrokerError(format!("failed to read packet length: {err}"))),
            }
        }
        i32::from_be_bytes(buf) as usize
    };

    let mut bytes = {
        let mut bytes = vec![0u8; n];
        socket
            .read_exact(&mut bytes)
            .await
            .change_context_lazy(|| BrokerError("failed to read packet bytes".to_string()))?;
        Cursor::new(bytes)
    };

    let (header, request) = Request::decode(&mut bytes)
        .change_context_lazy(|| BrokerError("failed to decode Kafka request".to_string()))?;

    // SAFETY: verified above
    let api_type =
        ApiMessageType::try_from(header.request_api_key).expect("must be a valid api key");
    log::debug!(
        "Receive header {} (version: {}) with correlation_id {} and client_id {}",
        api_type,
        header.request_api_version,
        header.correlation_id,
        header.client_id
    );
    log::debug!("Receive request {request:?}");

    let response = broker.reply(header.clone(), request).await;

    log::debug!("Send response {response:?}");
    let mut bytes = vec![];
    response
        .encode(header, &mut bytes)
        .change_context_lazy(|| BrokerError("failed to encode Kafka response".to_string()))?;
    socket
        .write_all(&bytes)
        .await
        .change_context_lazy(|| BrokerError("failed to send response bytes".to_string()))?;
    Ok(false)
}
