#![no_main]
use attrs_hwsim::POLICY;
use libfuzzer_sys::fuzz_target;
use tlv_hwsim::{decode, encode, ValidationMode};

fuzz_target!(|data: Vec<u8>| {
    if let Ok(table) = decode(&data, &POLICY, ValidationMode::Liberal) {
        // Re-encoding may legitimately fail (a decoded string can lose the NUL that kept it
        // within its length bounds), but anything that encodes must decode back unchanged.
        if let Ok(encoded) = encode(&table, &POLICY, data.len().max(4096)) {
            let table2 = decode(&encoded, &POLICY, ValidationMode::Liberal)
                .expect("Roundtrip failed: encoder produced an undecodable window");
            assert_eq!(table, table2);

            let encoded2 = encode(&table2, &POLICY, encoded.len()).unwrap();
            assert_eq!(encoded, encoded2);
        }
    }
});
