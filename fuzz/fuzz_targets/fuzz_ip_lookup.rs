#![no_main]
use libfuzzer_sys::fuzz_target;

/// Minimal dual-stack database: one node whose branches are both leaves.
fn database() -> ipdb::Database {
    let node_count = 1u32;
    let mut blob = vec![0u8; 8];
    blob.extend_from_slice(&7u16.to_be_bytes());
    blob.extend_from_slice(b"A\tB\tC\tD");

    let mut body = Vec::new();
    body.extend_from_slice(&(node_count + 8).to_be_bytes());
    body.extend_from_slice(&(node_count + 8).to_be_bytes());
    body.extend_from_slice(&blob);

    let meta = format!(
        r#"{{"build":0,"ip_version":3,"languages":{{"CN":0,"EN":2}},"node_count":{},"total_size":{},"fields":["a","b"]}}"#,
        node_count,
        body.len()
    );
    let mut data = (meta.len() as u32).to_be_bytes().to_vec();
    data.extend_from_slice(meta.as_bytes());
    data.extend_from_slice(&body);

    ipdb::Database::from_bytes(data).expect("valid fuzz database")
}

fuzz_target!(|data: &[u8]| {
    // Tests address parsing edge cases, malformed IPs, etc.
    if let Ok(s) = std::str::from_utf8(data) {
        let db = database();
        let _ = db.lookup(s, "CN");
        let _ = db.lookup(s, "EN");
    }
});
