//! Serde helpers for SurrealDB record ids.

use serde::{Deserialize, Deserializer, Serializer};

/// Accepts either a plain string id or a SurrealDB `Thing` (`{tb, id}`)
/// and normalizes it to the bare string form used on the wire.
pub mod record_id {
    use super::*;

    pub fn serialize<S>(id: &str, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(id)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum IdValue {
            String(String),
            Thing { tb: String, id: serde_json::Value },
        }

        match IdValue::deserialize(deserializer)? {
            IdValue::String(s) => Ok(strip_table_prefix(&s)),
            IdValue::Thing { tb: _, id } => match id {
                serde_json::Value::String(s) => Ok(s),
                serde_json::Value::Number(n) => Ok(n.to_string()),
                // SurrealDB may wrap string ids as {"String": "..."}
                serde_json::Value::Object(map) => Ok(map
                    .values()
                    .next()
                    .and_then(|v| v.as_str())
                    .map(String::from)
                    .unwrap_or_default()),
                other => Ok(other.to_string()),
            },
        }
    }

    fn strip_table_prefix(id: &str) -> String {
        match id.split_once(':') {
            Some((_, bare)) => bare.trim_matches('`').to_string(),
            None => id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Doc {
        #[serde(with = "super::record_id")]
        id: String,
    }

    #[test]
    fn plain_string_id_passes_through() {
        let doc: Doc = serde_json::from_str(r#"{"id": "abc-123"}"#).unwrap();
        assert_eq!(doc.id, "abc-123");
    }

    #[test]
    fn table_prefixed_id_is_stripped() {
        let doc: Doc = serde_json::from_str(r#"{"id": "news:abc-123"}"#).unwrap();
        assert_eq!(doc.id, "abc-123");
    }

    #[test]
    fn thing_id_is_normalized() {
        let doc: Doc =
            serde_json::from_str(r#"{"id": {"tb": "news", "id": {"String": "abc-123"}}}"#).unwrap();
        assert_eq!(doc.id, "abc-123");
    }
}
