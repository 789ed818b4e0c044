//! End-to-end lookup behavior against generated ipdb files

mod common;

use common::{city_dual, city_v4, FixtureBuilder, CITY_FIELDS};
use ipdb::{Database, IpdbError};
use std::net::IpAddr;

fn strings(values: &[&str]) -> Option<Vec<String>> {
    Some(values.iter().map(|s| s.to_string()).collect())
}

#[test]
fn test_city_lookup() {
    let db = Database::from_bytes(city_v4()).unwrap();

    let result = db.lookup("123.123.123.123", "CN").unwrap();
    assert_eq!(result, strings(&["中国", "北京", "北京"]));

    // Every value is present, even when empty
    let result = db.lookup("1.2.3.4", "CN").unwrap().unwrap();
    assert_eq!(result.len(), db.fields().len());
    assert_eq!(result, vec!["澳大利亚", "", ""]);
}

#[test]
fn test_metadata_accessors() {
    let db = Database::from_bytes(city_v4()).unwrap();

    assert!(db.supports_ipv4());
    assert!(!db.supports_ipv6());
    assert_eq!(db.build_time(), 1547017060);
    assert_eq!(db.fields(), CITY_FIELDS);
    assert_eq!(db.languages(), vec!["CN"]);
}

#[test]
fn test_not_found() {
    let db = Database::from_bytes(city_v4()).unwrap();

    assert_eq!(db.lookup("9.9.9.9", "CN").unwrap(), None);
    assert_eq!(db.lookup("123.124.0.1", "CN").unwrap(), None);
    assert_eq!(db.lookup("8.8.8.9", "CN").unwrap(), None);
}

#[test]
fn test_unknown_language_is_silent() {
    let db = Database::from_bytes(city_v4()).unwrap();

    for addr in ["123.123.123.123", "9.9.9.9", "not-an-ip", "2001:db8::1"] {
        assert_eq!(db.lookup(addr, "EN").unwrap(), None, "{}", addr);
    }
}

#[test]
fn test_malformed_address() {
    let db = Database::from_bytes(city_v4()).unwrap();

    for addr in ["not-an-ip", "", "1.2.3", "1.2.3.4.5", "300.1.1.1", "1:2:3"] {
        let err = db.lookup(addr, "CN").unwrap_err();
        assert!(err.is_ip_format(), "{} -> {:?}", addr, err);
    }
}

#[test]
fn test_ipv6_unsupported() {
    let db = Database::from_bytes(city_v4()).unwrap();

    let err = db.lookup("2001:250::1", "CN").unwrap_err();
    assert_eq!(err, IpdbError::IpFormat("no support ipv6".to_string()));

    // Mapped addresses are IPv6 text and are rejected the same way
    assert!(db.lookup("::ffff:123.123.1.1", "CN").is_err());
}

#[test]
fn test_languages_select_blocks() {
    let db = Database::from_bytes(city_dual()).unwrap();
    assert_eq!(db.languages(), vec!["CN", "EN"]);

    assert_eq!(
        db.lookup("123.123.1.1", "CN").unwrap(),
        strings(&["中国", "北京", "北京"])
    );
    assert_eq!(
        db.lookup("123.123.1.1", "EN").unwrap(),
        strings(&["China", "Beijing", "Beijing"])
    );
}

#[test]
fn test_ipv6_lookup() {
    let db = Database::from_bytes(city_dual()).unwrap();
    assert!(db.supports_ipv4() && db.supports_ipv6());

    assert_eq!(
        db.lookup("2400:cb00:2048::1", "EN").unwrap(),
        strings(&["United States", "California", "San Francisco"])
    );
    assert_eq!(
        db.lookup("2001:250:ffff::", "EN").unwrap(),
        strings(&["China", "", ""])
    );
    assert_eq!(db.lookup("2001:db8::1", "EN").unwrap(), None);
    assert_eq!(db.lookup("::1", "EN").unwrap(), None);
}

#[test]
fn test_mapped_address_matches_ipv4() {
    let db = Database::from_bytes(city_dual()).unwrap();

    let v4 = db.lookup("123.123.200.7", "EN").unwrap();
    let mapped = db.lookup("::ffff:123.123.200.7", "EN").unwrap();
    assert!(v4.is_some());
    assert_eq!(v4, mapped);
}

#[test]
fn test_lookup_ip() {
    let db = Database::from_bytes(city_dual()).unwrap();

    let addr: IpAddr = "123.123.0.1".parse().unwrap();
    assert_eq!(
        db.lookup_ip(addr, "EN").unwrap(),
        db.lookup("123.123.0.1", "EN").unwrap()
    );
}

#[test]
fn test_shared_leaf_has_identical_text() {
    let db = Database::from_bytes(city_v4()).unwrap();

    // 8.8.8.8/32 and 8.8.4.0/24 carry the same text and share one record
    let a = db.lookup("8.8.8.8", "CN").unwrap();
    let b = db.lookup("8.8.4.200", "CN").unwrap();
    assert_eq!(a, b);

    let first = db.lookup("123.123.0.0", "CN").unwrap();
    let last = db.lookup("123.123.255.255", "CN").unwrap();
    assert_eq!(first, last);
}

#[test]
fn test_lookup_info_and_map() {
    let db = Database::from_bytes(city_dual()).unwrap();

    let info = db.lookup_info("123.123.1.1", "EN").unwrap().unwrap();
    assert_eq!(info.country_name(), "China");
    assert_eq!(info.region_name(), "Beijing");
    assert_eq!(info.city_name(), "Beijing");
    assert_eq!(info.isp_domain(), "");

    let map = db.lookup_map("2400:cb00::1", "CN").unwrap().unwrap();
    assert_eq!(map["city_name"], "旧金山");

    assert!(db.lookup_info("9.9.9.9", "EN").unwrap().is_none());
}

#[test]
fn test_networks_v4() {
    let db = Database::from_bytes(city_v4()).unwrap();

    let networks = db.networks("CN").unwrap();
    let cidrs: Vec<String> = networks.iter().map(|n| n.cidr()).collect();
    assert_eq!(
        cidrs,
        vec!["1.2.3.0/24", "8.8.4.0/24", "8.8.8.8/32", "123.123.0.0/16"]
    );
    assert_eq!(networks[3].values, vec!["中国", "北京", "北京"]);
}

#[test]
fn test_networks_dual_stack() {
    let db = Database::from_bytes(city_dual()).unwrap();

    let cidrs: Vec<String> = db
        .networks("EN")
        .unwrap()
        .iter()
        .map(|n| n.cidr())
        .collect();
    assert_eq!(
        cidrs,
        vec![
            "123.123.0.0/16",
            "::ffff:123.123.0.0/112",
            "2001:250::/32",
            "2400:cb00::/32",
        ]
    );
}

#[test]
fn test_multiline_tabs_in_last_column() {
    // More tabs than columns: the surplus stays in the final column
    let mut builder = FixtureBuilder::new(1, &["CN"], &["a", "b"]);
    builder.insert_raw("10.0.0.0/8", "x\ty\tz");
    let db = Database::from_bytes(builder.build()).unwrap();

    assert_eq!(db.lookup("10.1.1.1", "CN").unwrap(), strings(&["x", "y\tz"]));
}

#[test]
fn test_short_record_is_invalid_format() {
    let mut builder = FixtureBuilder::new(1, &["CN", "EN"], &["a", "b"]);
    builder.insert_raw("10.0.0.0/8", "only\tthree\tcolumns");
    let db = Database::from_bytes(builder.build()).unwrap();

    assert_eq!(db.lookup("10.0.0.1", "CN").unwrap(), strings(&["only", "three"]));
    assert!(matches!(
        db.lookup("10.0.0.1", "EN"),
        Err(IpdbError::InvalidFormat(_))
    ));
}

#[test]
fn test_concurrent_lookups() {
    let db = std::sync::Arc::new(Database::from_bytes(city_dual()).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let db = db.clone();
            std::thread::spawn(move || {
                for j in 0..256 {
                    let addr = format!("123.123.{}.{}", i, j);
                    let values = db.lookup(&addr, "EN").unwrap().unwrap();
                    assert_eq!(values[0], "China");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
