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

// Derived:
// https://kafka.apache.org/protocol.html#protocol_error_codes
//
// The table is trimmed to the codes this broker can put on the wire.

#[derive(Debug, Clone)]
pub struct ErrorCode {
    code: i16,
    message: &'static str,
    retryable: bool,
}

impl ErrorCode {
    const fn new(code: i16, message: &'static str, retryable: bool) -> ErrorCode {
        ErrorCode {
            code,
            message,
            retryable,
        }
    }

    pub fn code(&self) -> i16 {
        self.code
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn retryable(&self) -> bool {
        self.retryable
    }
}

impl ErrorCode {
    pub const UNKNOWN_SERVER_ERROR: Self = Self::new(
        -1,
        "The server experienced an unexpected error when processing the request.",
        false,
    );
    pub const NONE: Self = Self::new(0, "", false);
    pub const UNKNOWN_TOPIC_OR_PARTITION: Self =
        ErrorCode::new(3, "This server does not host this topic-partition.", true);
    pub const UNSUPPORTED_VERSION: Self =
        Self::new(35, "The version of API is not supported.", false);
    pub const UNKNOWN_TOPIC_ID: Self =
        Self::new(100, "This server does not host this topic ID.", true);
}
