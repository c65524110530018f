use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tag every edited record carries; marks it as touched by the vocabulary.
pub const SENTINEL_TAG: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Alternate-resolution rendition of a photo.
pub struct ImageSource {
    pub src: String,
    pub width: u32,
    pub height: u32,
    /// Fields this tool does not model, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One entry of the gallery file.
pub struct Photo {
    pub id: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_set: Option<Vec<ImageSource>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub fixed: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Photo {
    /// Creates a record whose tag list holds only the sentinel.
    #[cfg(test)]
    pub fn new(id: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            alt: String::new(),
            group: None,
            tags: vec![SENTINEL_TAG.to_string()],
            width: None,
            height: None,
            src: src.into(),
            src_set: None,
            fixed: false,
            extra: Map::new(),
        }
    }

    #[cfg(test)]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self.ensure_sentinel();
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Inserts the sentinel at the front if it is missing. Returns true when
    /// the record had to be repaired.
    pub fn ensure_sentinel(&mut self) -> bool {
        if self.has_tag(SENTINEL_TAG) {
            return false;
        }
        self.tags.insert(0, SENTINEL_TAG.to_string());
        true
    }

    /// Copy of this record flagged as already reviewed.
    pub fn marked_fixed(&self) -> Self {
        Self {
            fixed: true,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_photo_carries_sentinel_only() {
        let p = Photo::new("p1", "/photos/p1.jpg");
        assert_eq!(p.tags, vec!["all".to_string()]);
        assert!(!p.fixed);
    }

    #[test]
    fn with_tags_puts_missing_sentinel_first() {
        let p = Photo::new("p1", "a.jpg").with_tags(["nature", "urban"]);
        assert_eq!(p.tags, vec!["all", "nature", "urban"]);

        let q = Photo::new("p2", "b.jpg").with_tags(["nature", "all"]);
        assert_eq!(q.tags, vec!["nature", "all"]);
    }

    #[test]
    fn deserializes_full_gallery_record() {
        let json = r#"{
            "id": "p1",
            "alt": "Harbour",
            "group": "trip",
            "tags": ["all", "nature"],
            "width": 4000,
            "height": 3000,
            "src": "/photos/p1.jpg",
            "srcSet": [{ "src": "/photos/p1-800.jpg", "width": 800, "height": 600 }],
            "fixed": true
        }"#;
        let p: Photo = serde_json::from_str(json).unwrap();
        assert_eq!(p.group.as_deref(), Some("trip"));
        assert_eq!(p.src_set.as_ref().map(Vec::len), Some(1));
        assert!(p.fixed);
    }

    #[test]
    fn unset_optional_fields_stay_out_of_output() {
        let json = serde_json::to_value(Photo::new("p1", "a.jpg")).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("fixed"));
        assert!(!obj.contains_key("srcSet"));
        assert!(!obj.contains_key("group"));

        let fixed = serde_json::to_value(Photo::new("p1", "a.jpg").marked_fixed()).unwrap();
        assert_eq!(fixed["fixed"], serde_json::Value::Bool(true));
    }

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let json = r#"{
            "id": "p1",
            "src": "/photos/p1.jpg",
            "caption": "keep me",
            "srcSet": [{ "src": "/photos/p1-800.webp", "width": 800, "height": 600, "format": "webp" }]
        }"#;
        let p: Photo = serde_json::from_str(json).unwrap();
        assert_eq!(p.extra["caption"], "keep me");

        let out = serde_json::to_value(p.marked_fixed()).unwrap();
        assert_eq!(out["caption"], "keep me");
        assert_eq!(out["srcSet"][0]["format"], "webp");
        assert_eq!(out["fixed"], true);
    }

    #[test]
    fn missing_tags_and_fixed_default() {
        let p: Photo = serde_json::from_str(r#"{"id":"x","src":"x.jpg"}"#).unwrap();
        assert!(p.tags.is_empty());
        assert!(!p.fixed);
    }
}
