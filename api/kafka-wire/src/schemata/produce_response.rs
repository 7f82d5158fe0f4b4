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

use byteorder::WriteBytesExt;

use crate::codec::Encodable;
use crate::IoResult;

// The produce path is a placeholder: the broker accepts and decodes the
// request but persists nothing, and replies with a bare response header.

#[derive(Debug, Default, Clone)]
pub struct ProduceResponse {}

impl Encodable for ProduceResponse {
    fn write<B: WriteBytesExt>(&self, _buf: &mut B, _version: i16) -> IoResult<()> {
        Ok(())
    }

    fn calculate_size(&self, _version: i16) -> usize {
        0
    }
}
