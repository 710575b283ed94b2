//! Asset requests and their fingerprints.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// The kind of visual asset a slide asks for. The kind alone selects the provider chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Chart,
    Image,
    Diagram,
    Avatar,
    StockPhoto,
    /// Frames exported from a design tool and synced to disk.
    DesignExport,
}

impl AssetKind {
    pub const ALL: [AssetKind; 6] = [
        AssetKind::Chart,
        AssetKind::Image,
        AssetKind::Diagram,
        AssetKind::Avatar,
        AssetKind::StockPhoto,
        AssetKind::DesignExport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Chart => "chart",
            AssetKind::Image => "image",
            AssetKind::Diagram => "diagram",
            AssetKind::Avatar => "avatar",
            AssetKind::StockPhoto => "stock_photo",
            AssetKind::DesignExport => "design_export",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific request payload. Opaque to the pipeline and handed to providers verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(BTreeMap<String, Value>);

impl Parameters {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical JSON form: sorted keys, no insignificant whitespace.
    pub fn to_canonical_json(&self) -> String {
        let items: Vec<String> = self
            .0
            .iter()
            .map(|(k, v)| format!("{}:{}", quote(k), to_canonical_json(v)))
            .collect();
        format!("{{{}}}", items.join(","))
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_json())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A request for one visual asset. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRequest {
    pub kind: AssetKind,
    #[serde(default)]
    pub parameters: Parameters,
    /// Where the resolved bytes are written.
    #[serde(rename = "target")]
    pub target_path: PathBuf,
}

impl AssetRequest {
    pub fn new(kind: AssetKind, parameters: Parameters, target_path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            parameters,
            target_path: target_path.into(),
        }
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    /// Deterministic identity of this request, derived from kind, parameters and target path.
    pub fn fingerprint(&self) -> Fingerprint {
        let target = self
            .target_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let canonical = format!(
            "{{\"kind\":{},\"parameters\":{},\"target_path\":{}}}",
            quote(self.kind.as_str()),
            self.parameters.to_canonical_json(),
            quote(&target)
        );
        let digest = Sha256::digest(canonical.as_bytes());
        Fingerprint(format!("{:x}", digest))
    }
}

/// Hex-encoded SHA-256 of a request's canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex digits, enough to tell requests apart in logs.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serializes a JSON value with object keys sorted and no redundant whitespace.
pub fn to_canonical_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(to_canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(map) => {
            let tree: BTreeMap<&String, String> =
                map.iter().map(|(k, v)| (k, to_canonical_json(v))).collect();
            let items: Vec<String> = tree
                .into_iter()
                .map(|(k, v)| format!("{}:{}", quote(k), v))
                .collect();
            format!("{{{}}}", items.join(","))
        }
    }
}

fn quote(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}
