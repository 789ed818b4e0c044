//! Test fixture: writes small, valid ipdb files
//!
//! Networks are inserted into a trie over the 128-bit IPv6 space; IPv4
//! networks go under `::ffff:0:0/96`. Identical record texts share one
//! blob entry. The blob starts with one 8-byte pseudo node whose branches
//! both point back at `node_count`, so a walk that reaches `node_count`
//! stays there and ends as "not found".

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::IpAddr;

#[derive(Clone, Copy)]
enum Slot {
    Empty,
    Node(usize),
    Record(usize),
}

pub struct FixtureBuilder {
    build: u64,
    ip_version: u16,
    languages: Vec<String>,
    fields: Vec<String>,
    nodes: Vec<[Slot; 2]>,
    records: Vec<String>,
    record_index: HashMap<String, usize>,
}

impl FixtureBuilder {
    /// `languages` are laid out in the given order, one block of
    /// `fields.len()` columns each
    pub fn new(ip_version: u16, languages: &[&str], fields: &[&str]) -> Self {
        Self {
            build: 1547017060,
            ip_version,
            languages: languages.iter().map(|s| s.to_string()).collect(),
            fields: fields.iter().map(|s| s.to_string()).collect(),
            nodes: vec![[Slot::Empty, Slot::Empty]],
            records: Vec::new(),
            record_index: HashMap::new(),
        }
    }

    pub fn build_time(mut self, build: u64) -> Self {
        self.build = build;
        self
    }

    /// Insert a network given as CIDR text, with one value list per language
    pub fn insert(&mut self, cidr: &str, values: &[&[&str]]) -> &mut Self {
        let text = values
            .iter()
            .map(|block| block.join("\t"))
            .collect::<Vec<_>>()
            .join("\t");
        self.insert_raw(cidr, &text)
    }

    /// Insert a network with literal record text
    pub fn insert_raw(&mut self, cidr: &str, text: &str) -> &mut Self {
        let (addr, prefix) = cidr.split_once('/').unwrap_or((cidr, ""));
        let addr: IpAddr = addr.parse().expect("fixture address");
        let (key, prefix_len) = match addr {
            IpAddr::V4(v4) => {
                let len: usize = if prefix.is_empty() { 32 } else { prefix.parse().unwrap() };
                ((0xffffu128 << 32) | u32::from(v4) as u128, len + 96)
            }
            IpAddr::V6(v6) => {
                let len: usize = if prefix.is_empty() { 128 } else { prefix.parse().unwrap() };
                (u128::from(v6), len)
            }
        };
        assert!(prefix_len > 0, "fixture networks need a non-zero prefix");

        let record = match self.record_index.get(text) {
            Some(&idx) => idx,
            None => {
                self.records.push(text.to_string());
                self.record_index.insert(text.to_string(), self.records.len() - 1);
                self.records.len() - 1
            }
        };

        let mut node = 0usize;
        for depth in 0..prefix_len {
            let bit = ((key >> (127 - depth)) & 1) as usize;
            if depth == prefix_len - 1 {
                self.nodes[node][bit] = Slot::Record(record);
                break;
            }
            node = match self.nodes[node][bit] {
                Slot::Node(next) => next,
                Slot::Empty => {
                    self.nodes.push([Slot::Empty, Slot::Empty]);
                    let next = self.nodes.len() - 1;
                    self.nodes[node][bit] = Slot::Node(next);
                    next
                }
                Slot::Record(_) => panic!("fixture networks must not nest"),
            };
        }
        self
    }

    /// Serialize to ipdb bytes
    pub fn build(&self) -> Vec<u8> {
        let node_count = self.nodes.len() as u32;

        // Pseudo node at the start of the blob: both branches -> node_count
        let mut blob = Vec::new();
        blob.extend_from_slice(&node_count.to_be_bytes());
        blob.extend_from_slice(&node_count.to_be_bytes());

        let mut offsets = Vec::with_capacity(self.records.len());
        for text in &self.records {
            offsets.push(blob.len() as u32);
            blob.extend_from_slice(&(text.len() as u16).to_be_bytes());
            blob.extend_from_slice(text.as_bytes());
        }

        let mut body = Vec::new();
        for node in &self.nodes {
            for slot in node {
                let value = match *slot {
                    Slot::Empty => node_count,
                    Slot::Node(idx) => idx as u32,
                    Slot::Record(idx) => node_count + offsets[idx],
                };
                body.extend_from_slice(&value.to_be_bytes());
            }
        }
        body.extend_from_slice(&blob);

        let languages = self
            .languages
            .iter()
            .enumerate()
            .map(|(i, code)| format!("\"{}\":{}", code, i * self.fields.len()))
            .collect::<Vec<_>>()
            .join(",");
        let fields = self
            .fields
            .iter()
            .map(|f| format!("\"{}\"", f))
            .collect::<Vec<_>>()
            .join(",");
        let meta = format!(
            "{{\"build\":{},\"ip_version\":{},\"languages\":{{{}}},\"node_count\":{},\"total_size\":{},\"fields\":[{}]}}",
            self.build,
            self.ip_version,
            languages,
            node_count,
            body.len(),
            fields
        );

        let mut data = (meta.len() as u32).to_be_bytes().to_vec();
        data.extend_from_slice(meta.as_bytes());
        data.extend_from_slice(&body);
        data
    }
}

pub const CITY_FIELDS: &[&str] = &["country_name", "region_name", "city_name"];

/// IPv4 city database with a single CN language block
pub fn city_v4() -> Vec<u8> {
    let mut builder = FixtureBuilder::new(1, &["CN"], CITY_FIELDS);
    builder
        .insert("123.123.0.0/16", &[&["中国", "北京", "北京"]])
        .insert("1.2.3.0/24", &[&["澳大利亚", "", ""]])
        .insert("8.8.8.8/32", &[&["GOOGLE.COM", "GOOGLE.COM", ""]])
        .insert("8.8.4.0/24", &[&["GOOGLE.COM", "GOOGLE.COM", ""]]);
    builder.build()
}

/// Dual-stack database with CN and EN blocks
pub fn city_dual() -> Vec<u8> {
    let mut builder = FixtureBuilder::new(3, &["CN", "EN"], CITY_FIELDS);
    builder
        .insert(
            "123.123.0.0/16",
            &[&["中国", "北京", "北京"], &["China", "Beijing", "Beijing"]],
        )
        .insert(
            "2001:250::/32",
            &[&["中国", "", ""], &["China", "", ""]],
        )
        .insert(
            "2400:cb00::/32",
            &[&["美国", "加利福尼亚州", "旧金山"], &["United States", "California", "San Francisco"]],
        );
    builder.build()
}
