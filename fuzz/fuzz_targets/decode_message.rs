#![no_main]
use attrs_hwsim::{decode_message, decode_self_encoded, Message, YawmdRxInfo, YawmdTxInfo};
use libfuzzer_sys::fuzz_target;

fn views(message: &Message<'_>) {
    let _ = YawmdTxInfo::from_message(message);
    let _ = YawmdRxInfo::from_message(message);
}

fuzz_target!(|data: Vec<u8>| {
    if let Ok(message) = decode_message(&data) {
        views(&message);
    }
    if let Ok(message) = decode_self_encoded(&data) {
        views(&message);
    }
});
