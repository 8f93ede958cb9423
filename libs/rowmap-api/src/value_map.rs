use std::fmt;

use crate::error::ValueMapError;

/// Value-translation table: raw text of a scanned value → replacement text.
///
/// Entries keep declaration order, so error messages list keys the way they
/// were written. Tables are small; lookup is a linear scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueMap {
    entries: Vec<(String, String)>,
}

impl ValueMap {
    /// Parse the textual form `"k1:v1,k2:v2"`.
    ///
    /// Whitespace around entries, keys and values is trimmed; empty entries
    /// are skipped. Only the first `:` splits an entry, so values may contain `:`.
    pub fn parse(spec: &str) -> Result<Self, ValueMapError> {
        let mut pairs = Vec::new();
        for item in spec.split(',').map(str::trim).filter(|item| !item.is_empty()) {
            let (key, value) = item
                .split_once(':')
                .ok_or_else(|| ValueMapError::MissingSeparator(item.to_string()))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(ValueMapError::EmptyKey(item.to_string()));
            }
            pairs.push((key.to_string(), value.trim().to_string()));
        }
        Self::from_pairs(pairs)
    }

    /// Build from explicit pairs. Keys must be unique and non-empty.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self, ValueMapError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries: Vec<(String, String)> = Vec::new();
        for (key, value) in pairs {
            let key = key.into();
            if key.is_empty() {
                return Err(ValueMapError::EmptyKey(key));
            }
            if entries.iter().any(|(k, _)| *k == key) {
                return Err(ValueMapError::DuplicateKey(key));
            }
            entries.push((key, value.into()));
        }
        if entries.is_empty() {
            return Err(ValueMapError::Empty);
        }
        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for ValueMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{k}:{v}")?;
        }
        Ok(())
    }
}
