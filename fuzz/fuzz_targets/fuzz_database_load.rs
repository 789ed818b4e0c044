#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // This should never crash or panic, even on garbage input
    if let Ok(db) = ipdb::Database::from_bytes(data.to_vec()) {
        for language in db.languages() {
            let _ = db.lookup("1.2.3.4", language);
            let _ = db.lookup("2001:db8::1", language);
        }
    }
});
