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
 */

use proptest::prelude::*;
use slac::prelude::*;

fn any_layout() -> impl Strategy<Value = MmeLayout> {
    prop_oneof![Just(MmeLayout::Vendor), Just(MmeLayout::GreenPhy)]
}

#[test]
fn layout_sizes() {
    assert_eq!(MmeLayout::Vendor.header_len(), 17);
    assert_eq!(MmeLayout::GreenPhy.header_len(), 19);
    assert_eq!(MmeLayout::Vendor.max_payload_len(), 1497);
    assert_eq!(MmeLayout::GreenPhy.max_payload_len(), 1495);
    assert_eq!(MmeLayout::try_from(0), Ok(MmeLayout::Vendor));
    assert_eq!(MmeLayout::try_from(1), Ok(MmeLayout::GreenPhy));
}

#[test]
fn set_key_request_frame() {
    let config = SlacKeyConfig::from_json(r#"{"protocol":1, "passphrase":"HomePlugAV"}"#).unwrap();
    let nmk = config.get_nmk().unwrap();
    let nid = config.get_nid().unwrap();

    // |KeyType|MyNonce|YourNonce|PID|PRN|PMN|CCoCap|NID|NewEKS|NewKey|
    let mut payload = vec![0x01, 0, 0, 0, 0, 0, 0, 0, 0, 0x04, 0, 0, 0, 0x00];
    payload.extend_from_slice(&nid);
    payload.push(0x01);
    payload.extend_from_slice(&nmk);
    assert_eq!(payload.len(), 38);

    let mut msg = HomeplugMessage::with_layout(config.get_layout().unwrap());
    msg.set_ethernet_header(Some(&ATHEROS_ADDR), None).unwrap();
    msg.set_payload(&payload, MMTYPE_CM_SET_KEY | MMTYPE_MODE_REQ)
        .unwrap();

    assert!(msg.is_valid());
    assert!(!msg.keep_source_mac());
    // 19 + 38 bytes, padded up to the minimum frame
    assert_eq!(msg.get_raw_msg_len(), MME_MIN_LENGTH);
    assert_eq!(&msg.get_payload().unwrap()[22..38], &nmk[..]);
    assert!(msg.get_payload().unwrap()[38..].iter().all(|byte| *byte == 0));
}

proptest! {
    #[test]
    fn payload_len_and_validity(layout in any_layout(), len in 0usize..1495) {
        let mut msg = HomeplugMessage::with_layout(layout);
        let payload = vec![0xA5; len];
        msg.set_payload(&payload, MMTYPE_CM_ATTEN_PROFILE).unwrap();

        prop_assert!(msg.is_valid());
        prop_assert_eq!(msg.get_raw_msg_len(), (layout.header_len() + len).max(MME_MIN_LENGTH));
        prop_assert_eq!(&msg.get_payload().unwrap()[..len], &payload[..]);
    }

    #[test]
    fn mmtype_roundtrip(layout in any_layout(), mmtype in any::<u16>()) {
        let mut msg = HomeplugMessage::with_layout(layout);
        msg.set_payload(&[], mmtype).unwrap();
        prop_assert_eq!(msg.get_message_type(), Ok(mmtype));
        prop_assert_eq!(msg.get_raw_msg()[15], mmtype as u8);
        prop_assert_eq!(msg.get_raw_msg()[16], (mmtype >> 8) as u8);
    }

    #[test]
    fn unsupported_version_never_falls_back(version in 2u8..=255) {
        let mut msg = HomeplugMessage::new(version);
        let expected = Err(SlacError::UnsupportedVersion(version));

        prop_assert_eq!(msg.set_ethernet_header(Some(&BROADCAST_ADDR), None), expected.clone());
        prop_assert_eq!(msg.set_payload(&[0; 8], MMTYPE_CM_SET_KEY), expected.clone());
        prop_assert_eq!(msg.get_message_type(), Err(SlacError::UnsupportedVersion(version)));
        prop_assert_eq!(msg.get_source_mac(), Err(SlacError::UnsupportedVersion(version)));
        prop_assert_eq!(msg.get_raw_msg_len(), 0);
        prop_assert!(!msg.is_valid());
    }

    #[test]
    fn source_mac_flag(layout in any_layout(), mac in any::<[u8; ETHER_ADDR_LEN]>()) {
        let mut msg = HomeplugMessage::with_layout(layout);
        msg.set_ethernet_header(None, None).unwrap();
        prop_assert!(!msg.keep_source_mac());

        msg.set_ethernet_header(None, Some(&mac)).unwrap();
        prop_assert!(msg.keep_source_mac());
        prop_assert_eq!(msg.get_source_mac(), Ok(mac));

        // dropping it later clears the flag but keeps the bytes
        msg.set_ethernet_header(Some(&BROADCAST_ADDR), None).unwrap();
        prop_assert!(!msg.keep_source_mac());
        prop_assert_eq!(msg.get_source_mac(), Ok(mac));
        prop_assert_eq!(msg.get_destination_mac(), Ok(BROADCAST_ADDR));
    }
}
