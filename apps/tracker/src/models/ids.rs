use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Backend identifiers arrive either as JSON numbers (auto-increment rows) or
/// as strings (UUID rows). The wire form is kept so it round-trips
/// unchanged when echoed back in a write.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{n}"),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<i64>() {
            Ok(n) => EntityId::Number(n),
            Err(_) => EntityId::Text(s.to_string()),
        })
    }
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub EntityId);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map($name)
            }
        }

        impl From<i64> for $name {
            fn from(n: i64) -> Self {
                $name(EntityId::Number(n))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(EntityId::Text(s.to_string()))
            }
        }
    };
}

entity_id!(
    /// Candidate row id.
    CandidateId
);
entity_id!(
    /// Requirement (job posting) id.
    RequirementId
);
entity_id!(
    /// Stage id, unique within one requirement's pipeline.
    StageId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_id_stays_numeric_on_the_wire() {
        let id: CandidateId = serde_json::from_str("42").unwrap();
        assert_eq!(id, CandidateId::from(42));
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
    }

    #[test]
    fn test_uuid_id_stays_text() {
        let raw = "\"6f1c2a9e-8d5b-4a41-9d0e-1f7f3c2b9a10\"";
        let id: RequirementId = serde_json::from_str(raw).unwrap();
        assert!(matches!(id.0, EntityId::Text(_)));
        assert_eq!(serde_json::to_string(&id).unwrap(), raw);
    }

    #[test]
    fn test_parse_from_cli_argument() {
        assert_eq!("7".parse::<RequirementId>().unwrap(), RequirementId::from(7));
        assert_eq!(
            "req-7".parse::<RequirementId>().unwrap(),
            RequirementId::from("req-7")
        );
    }
}
