//! Incoming photo set and the single-image selection rule.
//!
//! Clients send a mapping from camera-position label ("front", "side", ...)
//! to a base64-encoded photo. Exactly one photo is forwarded upstream:
//! `front` wins, then `side`, then the first remaining label in
//! lexicographic order.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::RelayError;

pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// One photo as sent by the client. Image content is passed through
/// unvalidated; only presence of the base64 payload is checked.
#[derive(Debug, Clone, Deserialize)]
pub struct Photo {
    #[serde(default)]
    pub base64: Option<String>,

    #[serde(rename = "mimeType", default)]
    pub mime_type: Option<String>,
}

/// Camera-position label -> photo. BTreeMap keeps the fallback selection
/// deterministic (lexicographic key order) regardless of client key order.
pub type PhotoSet = BTreeMap<String, Photo>;

/// The one image forwarded to the vision API.
#[derive(Debug, Clone)]
pub struct SelectedImage {
    pub label: String,
    pub base64: String,
    pub mime_type: String,
}

impl SelectedImage {
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }
}

/// Pick the photo to forward: `front`, else `side`, else the
/// lexicographically first remaining entry.
fn select_photo(photos: &PhotoSet) -> Option<(&String, &Photo)> {
    photos
        .get_key_value("front")
        .or_else(|| photos.get_key_value("side"))
        .or_else(|| photos.iter().next())
}

/// Select one photo and extract its image data.
///
/// Selection happens before extraction: if `front` is present but carries no
/// base64 payload, the request fails rather than falling through to `side`.
pub fn select_image(photos: &PhotoSet) -> Result<SelectedImage, RelayError> {
    let (label, photo) = select_photo(photos).ok_or(RelayError::NoValidImage)?;

    let base64 = photo
        .base64
        .as_deref()
        .filter(|data| !data.is_empty())
        .ok_or(RelayError::NoValidImage)?;

    Ok(SelectedImage {
        label: label.clone(),
        base64: base64.to_string(),
        mime_type: photo
            .mime_type
            .clone()
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(base64: &str) -> Photo {
        Photo {
            base64: Some(base64.to_string()),
            mime_type: None,
        }
    }

    fn set(entries: &[(&str, Photo)]) -> PhotoSet {
        entries
            .iter()
            .map(|(label, p)| (label.to_string(), p.clone()))
            .collect()
    }

    #[test]
    fn front_wins_over_side() {
        let photos = set(&[("side", photo("SIDE")), ("front", photo("FRONT"))]);
        let image = select_image(&photos).unwrap();
        assert_eq!(image.label, "front");
        assert_eq!(image.base64, "FRONT");
    }

    #[test]
    fn side_wins_when_front_is_absent() {
        let photos = set(&[("back", photo("BACK")), ("side", photo("SIDE"))]);
        let image = select_image(&photos).unwrap();
        assert_eq!(image.label, "side");
    }

    #[test]
    fn fallback_is_lexicographically_first() {
        let photos = set(&[("zoom", photo("Z")), ("back", photo("B")), ("chin", photo("C"))]);
        let image = select_image(&photos).unwrap();
        assert_eq!(image.label, "back");
        assert_eq!(image.base64, "B");
    }

    #[test]
    fn empty_set_has_no_valid_image() {
        let photos = PhotoSet::new();
        assert!(matches!(
            select_image(&photos),
            Err(RelayError::NoValidImage)
        ));
    }

    #[test]
    fn selected_entry_without_data_does_not_fall_through() {
        // front is selected even though only side carries data
        let photos = set(&[
            (
                "front",
                Photo {
                    base64: None,
                    mime_type: Some("image/png".to_string()),
                },
            ),
            ("side", photo("SIDE")),
        ]);
        assert!(matches!(
            select_image(&photos),
            Err(RelayError::NoValidImage)
        ));
    }

    #[test]
    fn empty_base64_counts_as_missing() {
        let photos = set(&[("front", photo(""))]);
        assert!(matches!(
            select_image(&photos),
            Err(RelayError::NoValidImage)
        ));
    }

    #[test]
    fn mime_type_defaults_to_jpeg() {
        let photos = set(&[("front", photo("DATA"))]);
        let image = select_image(&photos).unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.data_uri(), "data:image/jpeg;base64,DATA");
    }

    #[test]
    fn explicit_mime_type_is_kept() {
        let photos = set(&[(
            "front",
            Photo {
                base64: Some("DATA".to_string()),
                mime_type: Some("image/png".to_string()),
            },
        )]);
        let image = select_image(&photos).unwrap();
        assert_eq!(image.data_uri(), "data:image/png;base64,DATA");
    }
}
