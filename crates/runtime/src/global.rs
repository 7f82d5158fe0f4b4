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

use std::num::NonZeroUsize;
use std::sync::OnceLock;

use stolas_protos::config::RuntimeOptions;

use crate::num_cpus;
use crate::Builder;
use crate::Runtime;

pub fn make_runtime(runtime_name: &str, thread_name: &str, worker_threads: usize) -> Runtime {
    log::info!(
        "creating runtime with runtime_name: {runtime_name}, thread_name: {thread_name}, work_threads: {worker_threads}."
    );
    Builder::default()
        .runtime_name(runtime_name)
        .thread_name(thread_name)
        .worker_threads(worker_threads)
        .build()
        .expect("failed to create runtime")
}

#[derive(Debug)]
struct GlobalRuntimes {
    server_runtime: Runtime,
    io_runtime: Runtime,
}

static GLOBAL_RUNTIMES: OnceLock<GlobalRuntimes> = OnceLock::new();

pub fn init(opts: &RuntimeOptions) {
    GLOBAL_RUNTIMES.get_or_init(|| do_initialize_runtimes(opts));
}

fn do_initialize_runtimes(opts: &RuntimeOptions) -> GlobalRuntimes {
    log::info!("initializing global runtimes: {opts:?}");

    set_panic_hook();

    let RuntimeOptions {
        server_runtime_threads,
        io_runtime_threads,
    } = opts;

    let server_runtime = make_runtime(
        "server_runtime",
        "server_thread",
        server_runtime_threads
            .unwrap_or_else(default_server_threads)
            .get(),
    );
    let io_runtime = make_runtime(
        "io_runtime",
        "io_thread",
        io_runtime_threads.unwrap_or_else(default_io_threads).get(),
    );

    GlobalRuntimes {
        server_runtime,
        io_runtime,
    }
}

fn default_server_threads() -> NonZeroUsize {
    num_cpus()
}

fn default_io_threads() -> NonZeroUsize {
    num_cpus()
}

fn set_panic_hook() {
    std::panic::set_hook(Box::new(move |info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        log::error!("panic occurred: {info}\nbacktrace:\n{backtrace}");
        better_panic::Settings::auto().create_panic_handler()(info);
        std::process::exit(1);
    }));
}

fn fetch_runtimes_or_default() -> &'static GlobalRuntimes {
    GLOBAL_RUNTIMES.get_or_init(|| do_initialize_runtimes(&RuntimeOptions::default()))
}

pub fn server_runtime() -> &'static Runtime {
    &fetch_runtimes_or_default().server_runtime
}

pub fn io_runtime() -> &'static Runtime {
    &fetch_runtimes_or_default().io_runtime
}
