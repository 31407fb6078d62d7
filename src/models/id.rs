use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier assigned by the backend.
///
/// Opaque to this crate: the backend hands out integers for most records
/// and strings for some, so both are accepted and written back unchanged.
/// Only its presence or absence carries meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Int(i64),
    Text(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Int(n) => write!(f, "{}", n),
            Id::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Id::Int(value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::Text(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_numbers_and_strings() {
        let ids: Vec<Id> = serde_json::from_str(r#"[5, "a1b2"]"#).unwrap();
        assert_eq!(ids, vec![Id::Int(5), Id::from("a1b2")]);
        assert_eq!(serde_json::to_string(&ids).unwrap(), r#"[5,"a1b2"]"#);
    }

    #[test]
    fn displays_for_url_paths() {
        assert_eq!(format!("/levels/{}", Id::Int(9)), "/levels/9");
        assert_eq!(format!("/levels/{}", Id::from("x-1")), "/levels/x-1");
    }
}
