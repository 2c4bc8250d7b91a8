//! Subscription filter (NIP-01 `REQ` filter).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Filter as delivered to the read hook.
///
/// Tag conditions (`"#e": [...]`, `"#p": [...]`) are collected into `tags`
/// keyed by the letter without the `#`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kinds: Vec<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(flatten, with = "tag_map")]
    pub tags: BTreeMap<String, Vec<String>>,
}

impl Filter {
    pub fn with_kinds(mut self, kinds: &[u16]) -> Self {
        self.kinds.extend_from_slice(kinds);
        self
    }

    pub fn with_tag(mut self, letter: &str, values: &[&str]) -> Self {
        self.tags
            .insert(letter.to_string(), values.iter().map(|s| s.to_string()).collect());
        self
    }
}

mod tag_map {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(tags: &BTreeMap<String, Vec<String>>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let prefixed: BTreeMap<String, &Vec<String>> =
            tags.iter().map(|(k, v)| (format!("#{k}"), v)).collect();
        prefixed.serialize(s)
    }

    pub fn deserialize<'de, D>(d: D) -> Result<BTreeMap<String, Vec<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: BTreeMap<String, serde_json::Value> = BTreeMap::deserialize(d)?;
        let mut out = BTreeMap::new();
        for (k, v) in raw {
            // unknown non-tag keys are ignored, as relays do
            let Some(letter) = k.strip_prefix('#') else { continue };
            let values: Vec<String> =
                serde_json::from_value(v).map_err(serde::de::Error::custom)?;
            out.insert(letter.to_string(), values);
        }
        Ok(out)
    }
}
