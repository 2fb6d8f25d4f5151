#![no_main]

use libfuzzer_sys::fuzz_target;
use dervalue::{Asn1Value, ObjectIdentifier, Oid};

fuzz_target!(|data: &[u8]| {
    let value = match ObjectIdentifier::load(data) {
        Ok(value) => value,
        Err(_) => return,
    };
    if let Ok(oid) = value.oid() {
        let text = oid.to_string();
        let parsed: Oid = text.parse().unwrap();
        assert_eq!(&parsed, oid);
        assert_eq!(
            ObjectIdentifier::new(parsed).dump().unwrap().as_ref(), data
        );
    }
});
