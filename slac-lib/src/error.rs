/*
 * Copyright (C) 2015-2022 IoT.bzh Company
 * Author: Fulup Ar Foll <fulup@iot.bzh>
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use thiserror::Error;

// Recoverable errors only. Caller contract violations (oversized payload,
// reading an empty frame) panic instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SlacError {
    #[error("slac-msg-version: unsupported homeplug protocol version:{0}")]
    UnsupportedVersion(u8),

    #[error("slac-msg-ethertype: invalid ether type:{0:#06x}")]
    InvalidEtherType(u16),

    #[error("slac-msg-mmv: invalid homeplug mmv:{found:#04x} expected:{expected:#04x}")]
    InvalidMmv { expected: u8, found: u8 },

    #[error("slac-msg-length: invalid frame len:{len} (min:{min} max:{max})")]
    FrameLength { len: usize, min: usize, max: usize },

    #[error("slac-msg-mmtype: invalid mode:{mode} for mmtype:{mmtype:#06x}")]
    MmtypeMode { mmtype: u16, mode: u16 },

    #[error("string-ecode-hexa: {0}")]
    HexaEncoding(String),

    #[error("slac-config: {0}")]
    Config(String),
}

impl From<serde_json::Error> for SlacError {
    fn from(error: serde_json::Error) -> Self {
        SlacError::Config(error.to_string())
    }
}
