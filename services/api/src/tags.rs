//! services/api/src/tags.rs
//!
//! The single place where journal tags cross a text boundary. Stored tags are
//! a JSON array in a text column; request bodies may carry either a real array
//! or a string holding one (or a plain comma-separated list). Both collapse
//! into `Tags` here and nowhere else.

use mindmatters_core::domain::Tags;
use serde::{Deserialize, Deserializer};
use tracing::warn;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTags {
    List(Vec<String>),
    Text(String),
}

/// Encodes tags for the storage column.
pub fn encode(tags: &Tags) -> String {
    serde_json::to_string(tags.as_slice()).unwrap_or_else(|_| "[]".to_string())
}

/// Decodes the storage column. An unreadable value yields no tags.
pub fn decode_stored(raw: Option<&str>) -> Tags {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Tags::default();
    };
    match serde_json::from_str::<RawTags>(raw) {
        Ok(RawTags::List(list)) => Tags::new(list),
        // Doubly-encoded arrays have been seen in older rows.
        Ok(RawTags::Text(inner)) => decode_text(&inner),
        Err(e) => {
            warn!("Discarding unreadable stored tags: {}", e);
            Tags::default()
        }
    }
}

fn decode_text(text: &str) -> Tags {
    match serde_json::from_str::<Vec<String>>(text) {
        Ok(list) => Tags::new(list),
        Err(_) => Tags::from_comma_list(text),
    }
}

/// `serde(deserialize_with)` helper for request bodies. Missing or `null`
/// means no tags.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Tags, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawTags>::deserialize(deserializer)? {
        None => Tags::default(),
        Some(RawTags::List(list)) => Tags::new(list),
        Some(RawTags::Text(text)) => decode_text(&text),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "deserialize")]
        tags: Tags,
    }

    fn body(json: &str) -> Tags {
        serde_json::from_str::<Body>(json).unwrap().tags
    }

    #[test]
    fn storage_keeps_order() {
        let tags = Tags::new(["work", "sleep"]);
        let stored = encode(&tags);
        assert_eq!(stored, r#"["work","sleep"]"#);
        assert_eq!(decode_stored(Some(&stored)), tags);
    }

    #[test]
    fn array_tags_are_stored_exactly_as_sent() {
        let sent = body(r#"{"tags":[" work","","Sleep"]}"#);
        assert_eq!(sent.as_slice(), [" work", "", "Sleep"]);
        assert_eq!(decode_stored(Some(&encode(&sent))), sent);
    }

    #[test]
    fn stored_nulls_and_garbage_are_empty() {
        assert!(decode_stored(None).is_empty());
        assert!(decode_stored(Some("")).is_empty());
        assert!(decode_stored(Some("{not json")).is_empty());
    }

    #[test]
    fn doubly_encoded_stored_tags_are_unwrapped() {
        let stored = serde_json::to_string(r#"["a","b"]"#).unwrap();
        assert_eq!(decode_stored(Some(&stored)).as_slice(), ["a", "b"]);
    }

    #[test]
    fn request_accepts_every_shape() {
        assert_eq!(body(r#"{"tags":["work","sleep"]}"#).as_slice(), ["work", "sleep"]);
        assert_eq!(body(r#"{"tags":"[\"work\",\"sleep\"]"}"#).as_slice(), ["work", "sleep"]);
        assert_eq!(body(r#"{"tags":"work, sleep ,"}"#).as_slice(), ["work", "sleep"]);
        assert!(body(r#"{"tags":null}"#).is_empty());
        assert!(body(r#"{"tags":" , "}"#).is_empty());
        assert!(body(r#"{}"#).is_empty());
    }
}
