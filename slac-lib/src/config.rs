/*
 * Copyright (C) 2015-2022 IoT.bzh Company
 * Author: Fulup Ar Foll <fulup@iot.bzh>
 *
 * Licensed under the Apache License; Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing; software
 * distributed under the License is distributed on an "AS IS" BASIS;
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND; either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 *
 * Reference:
 *   https://github.com/qca/open-plc-utils.git
 *   https://github.com/EVerest/libslac
 *
 * Note:
 *  static values taken from HomePlug GreenPHY 1.1 and ISO15118-3
 */

use crate::prelude::*;
use serde::{Deserialize, Serialize};

// ethernet layer
pub const ETHER_ADDR_LEN: usize = 6;
pub const ETH_HEADER_LEN: usize = 2 * ETHER_ADDR_LEN + 2;
pub const ETH_FRAME_LEN: usize = 1514; // max frame len without FCS
pub const ETH_P_HOMEPLUG_GREENPHY: u16 = 0x88E1; // registered ethertype

// homeplug management message version (MMV)
pub const MMV_VENDOR_MME: u8 = 0x00;
pub const MMV_HOMEPLUG_GREENPHY: u8 = 0x01;

// homeplug header: mmv[1] + mmtype[2], GreenPHY adds fmni[1] + fmsn[1]
pub const HOMEPLUG_HEADER_LEN: usize = 3;
pub const HOMEPLUG_FRAGMENT_LEN: usize = 2;

// layer2 packet should be 60 bytes minimum (no FCS)
pub const MME_MIN_LENGTH: usize = 60;

// protocol version tags
pub const HOMEPLUG_VERSION_VENDOR: u8 = 0;
pub const HOMEPLUG_VERSION_GREENPHY: u8 = 1;

// key material
pub const NMK_LEN: usize = 16;
pub const NID_LEN: usize = 7;

// PBKDF1 salt for NMK-HS [HPAV 1.1 4.4.3.1], DAK uses the same bytes ending with 0x85
pub const NMK_HASH: [u8; 8] = [0x08, 0x85, 0x6D, 0xAF, 0x7C, 0xF5, 0x81, 0x86];
pub const NMK_HASH_ROUNDS: usize = 1000;
pub const NID_HASH_ROUNDS: usize = 5;

// NID last byte: 4 hash bits in the low nibble, 2 security level bits above
pub const NID_MOST_SIGNIFICANT_BYTE_SHIFT: u32 = 4;
pub const NID_SECURITY_LEVEL_OFFSET: u32 = 4;
pub const NID_SECURITY_LEVEL_SIMPLE_CONNECT: u8 = 0b00 << NID_SECURITY_LEVEL_OFFSET;
pub const NID_SECURITY_LEVEL_SECURE: u8 = 0b01 << NID_SECURITY_LEVEL_OFFSET;

pub type SlacNid = [u8; NID_LEN];
pub type SlacNmk = [u8; NMK_LEN];
pub type SlacIfMac = [u8; ETHER_ADDR_LEN];
pub const BROADCAST_ADDR: SlacIfMac = [0xFF; ETHER_ADDR_LEN];
pub const ATHEROS_ADDR: SlacIfMac = [0x00, 0xb0, 0x52, 0x00, 0x00, 0x01];

// convert an hexadecimal string "01:02:...:NN" into an &[u8] slice
pub fn hexa_to_byte(input: &str, buffer: &mut [u8]) -> Result<(), SlacError> {
    if buffer.is_empty() || input.len() != 3 * buffer.len() - 1 {
        return Err(SlacError::HexaEncoding(format!(
            "invalid len {}!=3*{}-1",
            input.len(),
            buffer.len()
        )));
    }

    for (idx, hexa) in input.split(':').enumerate() {
        if idx >= buffer.len() || hexa.len() != 2 {
            return Err(SlacError::HexaEncoding(format!("invalid hexa token '{}'", hexa)));
        }
        match u8::from_str_radix(hexa, 16) {
            Ok(value) => buffer[idx] = value,
            Err(_) => return Err(SlacError::HexaEncoding("invalid hexa encoding".to_string())),
        }
    }
    Ok(())
}

// reverse of hexa_to_byte, used for config dump and traces of public values
pub fn byte_to_hexa(input: &[u8]) -> String {
    input
        .iter()
        .map(|value| format!("{:02X}", value))
        .collect::<Vec<String>>()
        .join(":")
}

fn default_protocol() -> u8 {
    HOMEPLUG_VERSION_GREENPHY
}

// key configuration as found in binding json config
// {"protocol":1, "passphrase":"HomePlugAV"} or {"nmk":"50:D3:...:B7"}
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SlacKeyConfig {
    #[serde(default = "default_protocol")]
    pub protocol: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nmk: Option<String>,
}

impl SlacKeyConfig {
    pub fn from_json(jconf: &str) -> Result<SlacKeyConfig, SlacError> {
        let config: SlacKeyConfig = serde_json::from_str(jconf)?;
        // reject unknown version at config time rather than at first frame
        MmeLayout::try_from(config.protocol)?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, SlacError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn get_layout(&self) -> Result<MmeLayout, SlacError> {
        MmeLayout::try_from(self.protocol)
    }

    pub fn get_nmk(&self) -> Result<SlacNmk, SlacError> {
        match (&self.passphrase, &self.nmk) {
            (Some(passphrase), None) => Ok(mk_nmk_hs(passphrase.as_bytes())),
            (None, Some(hexa)) => {
                let mut nmk: SlacNmk = [0; NMK_LEN];
                hexa_to_byte(hexa, &mut nmk)?;
                Ok(nmk)
            }
            (Some(_), Some(_)) => Err(SlacError::Config(
                "passphrase and nmk are mutually exclusive".to_string(),
            )),
            (None, None) => Err(SlacError::Config("missing passphrase or nmk".to_string())),
        }
    }

    pub fn get_nid(&self) -> Result<SlacNid, SlacError> {
        Ok(mk_nid_from_nmk(&self.get_nmk()?))
    }
}
