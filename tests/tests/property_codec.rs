//! Property-based tests for the hex codec, buffers and request ingestion

use acvp_api::{BufferError, CapacityBuffer, ErrorKind};
use acvp_common::{bin_to_hex, hex_to_bin, CodecError};
use acvp_engine::VectorSetProcessor;
use proptest::prelude::*;
use serde_json::json;

proptest! {
    #[test]
    fn decode_recovers_encoded_bytes(bytes in prop::collection::vec(any::<u8>(), 0..=256)) {
        let hex = bin_to_hex(&bytes, 512).unwrap();
        prop_assert_eq!(hex.len(), bytes.len() * 2);
        prop_assert!(!hex.chars().any(|c| c.is_ascii_lowercase()));

        let buf = hex_to_bin(&hex.to_lowercase(), 256).unwrap();
        prop_assert_eq!(buf.as_slice(), &bytes[..]);
        prop_assert_eq!(buf.capacity(), 256);
    }

    #[test]
    fn oversized_input_is_rejected(bytes in prop::collection::vec(any::<u8>(), 1..=128), slack in 1usize..64) {
        let capacity = bytes.len().saturating_sub(slack);
        let hex = hex::encode(&bytes);
        prop_assert_eq!(
            hex_to_bin(&hex, capacity).unwrap_err(),
            CodecError::Buffer(BufferError::CapacityExceeded { requested: bytes.len(), capacity })
        );
        prop_assert!(bin_to_hex(&bytes, capacity * 2).is_err());
    }

    #[test]
    fn arbitrary_strings_never_panic(s in ".{0,64}", capacity in 0usize..40) {
        if let Ok(buf) = hex_to_bin(&s, capacity) {
            prop_assert_eq!(buf.len() * 2, s.len());
            prop_assert!(buf.len() <= capacity);
        }
    }

    #[test]
    fn failed_write_leaves_buffer_untouched(
        first in prop::collection::vec(any::<u8>(), 0..=16),
        second in prop::collection::vec(any::<u8>(), 17..=32),
    ) {
        let mut buf = CapacityBuffer::try_with_capacity(16).unwrap();
        buf.write(&first).unwrap();
        prop_assert!(buf.write(&second).is_err());
        prop_assert_eq!(buf.as_slice(), &first[..]);
    }

    #[test]
    fn hash_requests_fail_cleanly(msg in "[0-9a-fA-FxG ]{0,40}", len in 0u64..400) {
        let registry = acvp_iut::registry().unwrap();
        let request = json!({
            "algorithm": "SHA2-256",
            "testGroups": [{ "tgId": 1, "testType": "AFT", "tests": [{ "tcId": 1, "msg": msg, "len": len }] }]
        });
        match VectorSetProcessor::new(registry).process(&request) {
            Ok(doc) => {
                prop_assert_eq!(len % 8, 0);
                prop_assert!(len / 8 <= msg.len() as u64 / 2);
                prop_assert_eq!(doc.test_count(), 1);
            }
            Err(e) => prop_assert!(
                matches!(e.kind(), ErrorKind::MalformedRequest | ErrorKind::CryptoModuleFailure),
                "{}", e
            ),
        }
    }
}
