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
 *
 * Reference:
 *   https://github.com/SwitchEV/pyslac/blob/master/pyslac/session.py
 *   https://github.com/qca/open-plc-utils.git
 *   https://github.com/EVerest/libslac
 *
 * Note:
 *   raw frame layout (all offsets from frame start)
 *   |dst_mac[6]|src_mac[6]|ether_type[2] BE|mmv[1]|mmtype[2] LE|fmni[1]|fmsn[1]|mmentry...|
 *   fmni/fmsn only exist within the GreenPHY layout, the vendor layout starts
 *   mmentry right after mmtype.
 */

use crate::prelude::*;
use std::fmt;

// homeplug message types [HPGP table 11-87], two lsb encode the mode
pub const MMTYPE_CM_SET_KEY: u16 = 0x6008;
pub const MMTYPE_CM_AMP_MAP: u16 = 0x601C;
pub const MMTYPE_CM_SLAC_PARAM: u16 = 0x6064;
pub const MMTYPE_CM_START_ATTEN_CHAR: u16 = 0x6068;
pub const MMTYPE_CM_ATTEN_CHAR: u16 = 0x606C;
pub const MMTYPE_CM_PKCS_CERT: u16 = 0x6070;
pub const MMTYPE_CM_MNBC_SOUND: u16 = 0x6074;
pub const MMTYPE_CM_VALIDATE: u16 = 0x6078;
pub const MMTYPE_CM_SLAC_MATCH: u16 = 0x607C;
pub const MMTYPE_CM_SLAC_USER_DATA: u16 = 0x6080;
pub const MMTYPE_CM_ATTEN_PROFILE: u16 = 0x6084;

pub const MMTYPE_MODE_REQ: u16 = 0x0000;
pub const MMTYPE_MODE_CNF: u16 = 0x0001;
pub const MMTYPE_MODE_IND: u16 = 0x0002;
pub const MMTYPE_MODE_RSP: u16 = 0x0003;
pub const MMTYPE_MODE_MASK: u16 = 0x0003;

const DST_MAC_OFFSET: usize = 0;
const SRC_MAC_OFFSET: usize = ETHER_ADDR_LEN;
const ETHER_TYPE_OFFSET: usize = 2 * ETHER_ADDR_LEN;
const MMV_OFFSET: usize = ETH_HEADER_LEN;
const MMTYPE_OFFSET: usize = MMV_OFFSET + 1;
const FRAGMENT_OFFSET: usize = MMV_OFFSET + HOMEPLUG_HEADER_LEN;

// split mmtype into (base, mode)
pub fn split_mmtype(mmtype: u16) -> (u16, u16) {
    (mmtype & !MMTYPE_MODE_MASK, mmtype & MMTYPE_MODE_MASK)
}

// Byte layout selected by the homeplug protocol version tag
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MmeLayout {
    Vendor,   // v1.0 vendor MME, no fragmentation bytes
    GreenPhy, // v1.1 GreenPHY MME, fmni+fmsn present
}

impl TryFrom<u8> for MmeLayout {
    type Error = SlacError;
    fn try_from(version: u8) -> Result<Self, Self::Error> {
        match version {
            HOMEPLUG_VERSION_VENDOR => Ok(MmeLayout::Vendor),
            HOMEPLUG_VERSION_GREENPHY => Ok(MmeLayout::GreenPhy),
            _ => Err(SlacError::UnsupportedVersion(version)),
        }
    }
}

impl MmeLayout {
    pub fn get_version(&self) -> u8 {
        match self {
            MmeLayout::Vendor => HOMEPLUG_VERSION_VENDOR,
            MmeLayout::GreenPhy => HOMEPLUG_VERSION_GREENPHY,
        }
    }

    pub fn get_mmv(&self) -> u8 {
        match self {
            MmeLayout::Vendor => MMV_VENDOR_MME,
            MmeLayout::GreenPhy => MMV_HOMEPLUG_GREENPHY,
        }
    }

    // ethernet + homeplug header, mmentry starts here
    pub fn header_len(&self) -> usize {
        match self {
            MmeLayout::Vendor => ETH_HEADER_LEN + HOMEPLUG_HEADER_LEN,
            MmeLayout::GreenPhy => ETH_HEADER_LEN + HOMEPLUG_HEADER_LEN + HOMEPLUG_FRAGMENT_LEN,
        }
    }

    // payload must stay strictly below this value
    pub fn max_payload_len(&self) -> usize {
        ETH_FRAME_LEN - self.header_len()
    }
}

impl fmt::Display for MmeLayout {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MmeLayout::Vendor => "vendor-mme(v1.0)",
            MmeLayout::GreenPhy => "greenphy(v1.1)",
        };
        fmt.pad(text)
    }
}

// One ethernet frame carrying one homeplug MME. Buffer is zeroed at
// creation, an unset destination mac is therefore 00:00:00:00:00:00.
#[derive(Clone)]
pub struct HomeplugMessage {
    protocol_version: u8,
    raw_msg: [u8; ETH_FRAME_LEN],
    raw_msg_len: usize,
    keep_src_mac: bool,
}

impl HomeplugMessage {
    pub fn new(protocol_version: u8) -> HomeplugMessage {
        HomeplugMessage {
            protocol_version,
            raw_msg: [0; ETH_FRAME_LEN],
            raw_msg_len: 0,
            keep_src_mac: false,
        }
    }

    pub fn with_layout(layout: MmeLayout) -> HomeplugMessage {
        HomeplugMessage::new(layout.get_version())
    }

    // load a frame received from a raw socket
    pub fn from_bytes(protocol_version: u8, buffer: &[u8]) -> Result<HomeplugMessage, SlacError> {
        let layout = MmeLayout::try_from(protocol_version)?;
        if buffer.len() < layout.header_len() || buffer.len() > ETH_FRAME_LEN {
            return Err(SlacError::FrameLength {
                len: buffer.len(),
                min: layout.header_len(),
                max: ETH_FRAME_LEN,
            });
        }

        let ether_type = u16::from_be_bytes([buffer[ETHER_TYPE_OFFSET], buffer[ETHER_TYPE_OFFSET + 1]]);
        if ether_type != ETH_P_HOMEPLUG_GREENPHY {
            return Err(SlacError::InvalidEtherType(ether_type));
        }

        if buffer[MMV_OFFSET] != layout.get_mmv() {
            return Err(SlacError::InvalidMmv {
                expected: layout.get_mmv(),
                found: buffer[MMV_OFFSET],
            });
        }

        let mut msg = HomeplugMessage::new(protocol_version);
        msg.raw_msg[..buffer.len()].copy_from_slice(buffer);
        msg.raw_msg_len = buffer.len();
        msg.keep_src_mac = true;
        tracing::trace!(len = msg.raw_msg_len, layout = %layout, "HomeplugMessage:from_bytes");
        Ok(msg)
    }

    fn get_layout(&self) -> Result<MmeLayout, SlacError> {
        MmeLayout::try_from(self.protocol_version)
    }

    pub fn get_protocol_version(&self) -> u8 {
        self.protocol_version
    }

    // ethernet frame byte order is big endian
    pub fn set_ethernet_header(
        &mut self,
        dst_mac: Option<&SlacIfMac>,
        src_mac: Option<&SlacIfMac>,
    ) -> Result<(), SlacError> {
        self.get_layout()?;

        self.raw_msg[ETHER_TYPE_OFFSET..ETHER_TYPE_OFFSET + 2]
            .copy_from_slice(&ETH_P_HOMEPLUG_GREENPHY.to_be_bytes());

        if let Some(dst_mac) = dst_mac {
            self.raw_msg[DST_MAC_OFFSET..DST_MAC_OFFSET + ETHER_ADDR_LEN].copy_from_slice(dst_mac);
        }

        // when not kept, the raw socket layer fills the interface mac at send time
        match src_mac {
            Some(src_mac) => {
                self.raw_msg[SRC_MAC_OFFSET..SRC_MAC_OFFSET + ETHER_ADDR_LEN]
                    .copy_from_slice(src_mac);
                self.keep_src_mac = true;
            }
            None => self.keep_src_mac = false,
        }

        tracing::trace!(keep_src_mac = self.keep_src_mac, "HomeplugMessage:set_ethernet_header");
        Ok(())
    }

    // panics when payload does not fit, that is a caller bug not a network fault
    pub fn set_payload(&mut self, payload: &[u8], mmtype: u16) -> Result<(), SlacError> {
        let layout = self.get_layout()?;
        assert!(
            payload.len() < layout.max_payload_len(),
            "Homeplug payload length too long: {} >= {}",
            payload.len(),
            layout.max_payload_len()
        );

        self.raw_msg[MMV_OFFSET] = layout.get_mmv();
        self.raw_msg[MMTYPE_OFFSET..MMTYPE_OFFSET + 2].copy_from_slice(&mmtype.to_le_bytes());

        // fragmentation not supported: fmni/fmsn always zero
        if let MmeLayout::GreenPhy = layout {
            self.raw_msg[FRAGMENT_OFFSET..FRAGMENT_OFFSET + HOMEPLUG_FRAGMENT_LEN].fill(0);
        }

        let start = layout.header_len();
        let message_len = start + payload.len();
        self.raw_msg[start..message_len].copy_from_slice(payload);

        if message_len < MME_MIN_LENGTH {
            self.raw_msg[message_len..MME_MIN_LENGTH].fill(0);
        }
        self.raw_msg_len = message_len.max(MME_MIN_LENGTH);

        tracing::debug!(
            mmtype,
            len = self.raw_msg_len,
            layout = %layout,
            "HomeplugMessage:set_payload"
        );
        Ok(())
    }

    fn assert_loaded(&self) {
        assert!(
            self.raw_msg_len > 0,
            "HomeplugMessage read before payload was set"
        );
    }

    // wire order is little endian
    pub fn get_message_type(&self) -> Result<u16, SlacError> {
        self.get_layout()?;
        self.assert_loaded();
        Ok(u16::from_le_bytes([
            self.raw_msg[MMTYPE_OFFSET],
            self.raw_msg[MMTYPE_OFFSET + 1],
        ]))
    }

    // retreive base mmtype verifying the expected mode bits
    pub fn get_mmtype_mode(&self, mode: u16) -> Result<u16, SlacError> {
        let mmtype = self.get_message_type()?;
        let (base, found) = split_mmtype(mmtype);
        if found != mode & MMTYPE_MODE_MASK {
            return Err(SlacError::MmtypeMode { mmtype, mode });
        }
        Ok(base)
    }

    pub fn get_mmv(&self) -> Result<u8, SlacError> {
        self.get_layout()?;
        self.assert_loaded();
        Ok(self.raw_msg[MMV_OFFSET])
    }

    pub fn get_source_mac(&self) -> Result<SlacIfMac, SlacError> {
        self.get_layout()?;
        let mut mac: SlacIfMac = [0; ETHER_ADDR_LEN];
        mac.copy_from_slice(&self.raw_msg[SRC_MAC_OFFSET..SRC_MAC_OFFSET + ETHER_ADDR_LEN]);
        Ok(mac)
    }

    pub fn get_destination_mac(&self) -> Result<SlacIfMac, SlacError> {
        self.get_layout()?;
        let mut mac: SlacIfMac = [0; ETHER_ADDR_LEN];
        mac.copy_from_slice(&self.raw_msg[DST_MAC_OFFSET..DST_MAC_OFFSET + ETHER_ADDR_LEN]);
        Ok(mac)
    }

    // mmentry including zero padding
    pub fn get_payload(&self) -> Result<&[u8], SlacError> {
        let layout = self.get_layout()?;
        self.assert_loaded();
        Ok(&self.raw_msg[layout.header_len()..self.raw_msg_len])
    }

    pub fn keep_source_mac(&self) -> bool {
        self.keep_src_mac
    }

    // occupied bytes, ready to be written on a raw socket
    pub fn get_raw_msg(&self) -> &[u8] {
        &self.raw_msg[..self.raw_msg_len]
    }

    pub fn get_raw_msg_len(&self) -> usize {
        self.raw_msg_len
    }

    pub fn is_valid(&self) -> bool {
        self.raw_msg_len >= MME_MIN_LENGTH
    }
}

impl fmt::Display for HomeplugMessage {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = format!(
            "HomeplugMessage:{{ version:{}, dst:{:02X?}, src:{:02X?}, keep_src:{}, mmv:{:02X?}, mmtype:{:02X?}, len:{} }}",
            self.protocol_version,
            &self.raw_msg[DST_MAC_OFFSET..DST_MAC_OFFSET + ETHER_ADDR_LEN],
            &self.raw_msg[SRC_MAC_OFFSET..SRC_MAC_OFFSET + ETHER_ADDR_LEN],
            self.keep_src_mac,
            self.raw_msg[MMV_OFFSET],
            u16::from_le_bytes([self.raw_msg[MMTYPE_OFFSET], self.raw_msg[MMTYPE_OFFSET + 1]]),
            self.raw_msg_len
        );
        fmt.pad(&text)
    }
}
