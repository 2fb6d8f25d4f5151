#![no_main]

use libfuzzer_sys::fuzz_target;
use dervalue::{Asn1Value, Integer};

fuzz_target!(|data: &[u8]| {
    let int = match Integer::load(data) {
        Ok(int) => int,
        Err(_) => return,
    };
    assert_eq!(int.dump().unwrap().as_ref(), data);
    if let Ok(value) = int.value() {
        // A decodable integer is minimal, so encoding it again must
        // reproduce the input.
        assert_eq!(Integer::new(value.clone()).dump().unwrap().as_ref(), data);
        let _ = int.to_i64();
    }
});
