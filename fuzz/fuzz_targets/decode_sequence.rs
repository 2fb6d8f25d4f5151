#![no_main]

use libfuzzer_sys::fuzz_target;
use dervalue::{
    Asn1Value, Discriminant, Field, OpenType, SequenceSpec, Spec, Tag, Value,
};

static ITEMS: Spec = Spec::SequenceOf(&Spec::Any);

static ATTRIBUTE: SequenceSpec = SequenceSpec {
    name: "Attribute",
    fields: &[
        Field::new("type", Spec::Oid),
        Field::new("label", Spec::Utf8String).implicit(Tag::ctx(0)).optional(),
        Field::new("value", Spec::Any),
        Field::new("extra", Spec::SequenceOf(&ITEMS)).optional(),
    ],
    open_type: Some(OpenType {
        discriminant: "type",
        dependent: "value",
        types: &[
            (Discriminant::Oid("1.2.3"), Spec::Integer),
            (Discriminant::Oid("2.3.4"), Spec::OctetString),
        ],
        fallback: Some(Spec::Any),
    }),
};

fuzz_target!(|data: &[u8]| {
    let value = match Value::load(Spec::Sequence(&ATTRIBUTE), data) {
        Ok(value) => value,
        Err(_) => return,
    };
    let _ = value.to_native();
    assert_eq!(value.dump().unwrap().as_ref(), data);
});
