#![no_main]
use alf_game::replay::ReplayLog;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Feed arbitrary bytes to ReplayLog::from_bytes.
    // Must not panic -- returning Err is fine.
    if let Ok(log) = ReplayLog::from_bytes(data) {
        // Whatever decodes must encode again.
        let _ = log.to_bytes().expect("decoded log must re-encode");
    }
});
