#![no_main]
use arbitrary::Arbitrary;
use attrs_hwsim::POLICY;
use libfuzzer_sys::fuzz_target;
use tlv_hwsim::{decode, ValidationMode};

#[derive(Arbitrary, Debug)]
struct FuzzInput<'a> {
    strict: bool,
    window: &'a [u8],
}

fuzz_target!(|input: FuzzInput| {
    let mode = if input.strict {
        ValidationMode::Strict
    } else {
        ValidationMode::Liberal
    };
    let result = decode(input.window, &POLICY, mode);

    // A strict walk that ends on a broken record fails the same way liberally.
    if let (ValidationMode::Strict, Err(e)) = (mode, &result) {
        if e.is_structural() {
            assert_eq!(
                decode(input.window, &POLICY, ValidationMode::Liberal).err(),
                Some(*e)
            );
        }
    }

    // Whatever strict accepts, liberal accepts unchanged.
    if let (ValidationMode::Strict, Ok(table)) = (mode, &result) {
        assert_eq!(
            decode(input.window, &POLICY, ValidationMode::Liberal).as_ref(),
            Ok(table)
        );
    }
});
