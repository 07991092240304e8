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
 *   https://github.com/qca/open-plc-utils/blob/master/key/HPAVKeyNMK.c
 *   https://github.com/qca/open-plc-utils/blob/master/key/HPAVKeyNID.c
 */

use crate::prelude::*;
use sha2::{Digest, Sha256};

// pbkdf1 loop: first round hashes the seed chunks, every following round
// rehashes the previous digest only.
fn pbkdf1_sha256(seeds: &[&[u8]], rounds: usize) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    let mut digest: [u8; 32] = hasher.finalize().into();

    for _ in 1..rounds {
        digest = Sha256::digest(digest).into();
    }
    digest
}

// nmk-hs: network membership key from a user passphrase
// sha256 takes the most significant byte first from the lowest memory
// address, the first octet of the digest becomes octet zero of the NMK-HS.
// Passphrase length comes from the slice, an empty passphrase is valid.
pub fn mk_nmk_hs(passphrase: &[u8]) -> SlacNmk {
    tracing::trace!(len = passphrase.len(), "slac:mk_nmk_hs");
    let digest = pbkdf1_sha256(&[passphrase, &NMK_HASH[..]], NMK_HASH_ROUNDS);

    let mut nmk: SlacNmk = [0; NMK_LEN];
    nmk.copy_from_slice(&digest[..NMK_LEN]);
    nmk
}

// nid: network identifier nmk: network membership key
// The NMK is hashed 5 times without salt. The NID keeps the leftmost
// 52 bits of the digest: 6 full bytes plus the high nibble of byte 6,
// which moves to the low nibble of the last NID byte. The security
// level sits in the two bits above.
pub fn mk_nid_with_level(nmk: &SlacNmk, level: u8) -> SlacNid {
    let digest = pbkdf1_sha256(&[&nmk[..]], NID_HASH_ROUNDS);

    let mut nid: SlacNid = [0; NID_LEN];
    nid[..NID_LEN - 1].copy_from_slice(&digest[..NID_LEN - 1]);
    nid[NID_LEN - 1] = level | (digest[NID_LEN - 1] >> NID_MOST_SIGNIFICANT_BYTE_SHIFT);

    tracing::debug!(nid = %byte_to_hexa(&nid), "slac:mk_nid_from_nmk");
    nid
}

// nid used by SLAC: simple-connect security level
pub fn mk_nid_from_nmk(nmk: &SlacNmk) -> SlacNid {
    mk_nid_with_level(nmk, NID_SECURITY_LEVEL_SIMPLE_CONNECT)
}

#[cfg(test)]
mod tests {
    use super::*;

    // open-plc-utils default key set
    const HOMEPLUG_AV_NMK: SlacNmk = [
        0x50, 0xD3, 0xE4, 0x93, 0x3F, 0x85, 0x5B, 0x70, 0x40, 0x78, 0x4D, 0xF8, 0x15, 0xAA, 0x8D,
        0xB7,
    ];

    #[test]
    fn nmk_known_answer() {
        assert_eq!(mk_nmk_hs(b"HomePlugAV"), HOMEPLUG_AV_NMK);
    }

    #[test]
    fn nmk_empty_passphrase() {
        assert_eq!(
            mk_nmk_hs(b""),
            [
                0x4b, 0x0d, 0x73, 0x14, 0x72, 0xcd, 0x35, 0x33, 0x12, 0xd8, 0x30, 0x13, 0x38, 0xb8,
                0xa8, 0x0d
            ]
        );
    }

    #[test]
    fn nid_known_answer() {
        assert_eq!(
            mk_nid_from_nmk(&HOMEPLUG_AV_NMK),
            [0xB0, 0xF2, 0xE6, 0x95, 0x66, 0x6B, 0x03]
        );
    }

    #[test]
    fn nid_security_level_only_touches_level_bits() {
        let simple = mk_nid_from_nmk(&HOMEPLUG_AV_NMK);
        let secure = mk_nid_with_level(&HOMEPLUG_AV_NMK, NID_SECURITY_LEVEL_SECURE);
        assert_eq!(simple[..6], secure[..6]);
        assert_eq!(secure[6], simple[6] | 0x10);
        assert_eq!(secure[6] & 0x0F, simple[6] & 0x0F);
    }

    #[test]
    fn pbkdf1_single_round_is_plain_sha256() {
        let digest: [u8; 32] = Sha256::digest(b"abc").into();
        assert_eq!(pbkdf1_sha256(&[&b"a"[..], &b"bc"[..]], 1), digest);
    }
}
