//! Named-field view over a lookup result
//!
//! A lookup yields bare column values in header field order. [`LocationInfo`]
//! pairs them with the field names and offers accessors for the field names
//! that ipdb city, district and IDC databases ship with. Fields a database
//! does not carry read as the empty string.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Ordered field name / value pairs for one address and language
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationInfo {
    entries: Vec<(String, String)>,
}

macro_rules! field_accessors {
    ($($(#[$doc:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name(&self) -> &str {
                self.value(stringify!($name))
            }
        )*
    };
}

impl LocationInfo {
    /// Pair field names with values; extra names or values are dropped
    pub fn new<S: AsRef<str>>(fields: &[S], values: Vec<String>) -> Self {
        let entries = fields
            .iter()
            .map(|f| f.as_ref().to_string())
            .zip(values)
            .collect();
        Self { entries }
    }

    /// Value of a field, if the database carries it
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    fn value(&self, field: &str) -> &str {
        self.get(field).unwrap_or("")
    }

    /// Iterate `(field, value)` pairs in header order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no fields are present
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert into an unordered name -> value map
    pub fn into_map(self) -> HashMap<String, String> {
        self.entries.into_iter().collect()
    }

    field_accessors!(
        /// Country name
        country_name,
        /// Region or province name
        region_name,
        /// City name
        city_name,
        /// Domain of the address owner
        owner_domain,
        /// Domain of the ISP
        isp_domain,
        /// Latitude, as stored
        latitude,
        /// Longitude, as stored
        longitude,
        /// Time zone name
        timezone,
        /// UTC offset, as stored
        utc_offset,
        /// Chinese administrative division code
        china_admin_code,
        /// International dialing code
        idd_code,
        /// ISO 3166-1 alpha-2 country code
        country_code,
        /// Continent code
        continent_code,
        /// IDC / hosting marker
        idc,
        /// Mobile base station marker
        base_station,
        /// ISO 3166-1 alpha-3 country code
        country_code3,
        /// European Union membership flag
        european_union,
        /// Currency code
        currency_code,
        /// Currency name
        currency_name,
        /// Anycast marker
        anycast,
    );
}

impl fmt::Display for LocationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("\t")?;
            }
            write!(f, "{}:{}", name, value)?;
        }
        Ok(())
    }
}

impl Serialize for LocationInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
