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

use serde::Deserialize;
use serde::Serialize;
use stolas_protos::config::BrokerConfig;
use stolas_protos::config::LogConfig;
use stolas_protos::config::RuntimeOptions;
use stolas_protos::config::ServerConfig;
use stolas_protos::config::StderrAppenderConfig;
use stolas_protos::config::StorageConfig;
use stolas_protos::config::TelemetryConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub runtime: RuntimeOptions,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                broker: BrokerConfig {
                    listen_addr: "0.0.0.0:9092".to_string(),
                },
                storage: StorageConfig {
                    logs_dir: "/tmp/kraft-combined-logs".into(),
                },
            },
            telemetry: TelemetryConfig {
                log: LogConfig {
                    stderr: Some(StderrAppenderConfig {
                        filter: "INFO".to_string(),
                    }),
                },
            },
            runtime: RuntimeOptions::default(),
        }
    }
}
