#![no_main]

use libfuzzer_sys::fuzz_target;
use dervalue::{Asn1Value, BitString, OctetString, Utf8String};

fuzz_target!(|data: &[u8]| {
    if let Ok(mut value) = BitString::load(data) {
        if value.bits().is_ok() {
            assert_eq!(value.force_dump().unwrap().as_ref(), data);
        }
    }
    if let Ok(mut value) = OctetString::load(data) {
        assert_eq!(value.force_dump().unwrap().as_ref(), data);
    }
    if let Ok(mut value) = Utf8String::load(data) {
        if value.as_str().is_ok() {
            assert_eq!(value.force_dump().unwrap().as_ref(), data);
        }
    }
});
