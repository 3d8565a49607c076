//! Encoding of stored records: the settings JSON body and project paths.

use std::path::Path;

use serde_json::Value;

use pulsar_core::{Settings, SettingsPatch};

use crate::error::StorageError;

/// Serializes the full record, extra keys included.
pub fn encode_settings(settings: &Settings) -> Result<String, StorageError> {
    Ok(serde_json::to_string(settings)?)
}

/// Parses a stored body into a patch.
///
/// The body must be a JSON object; missing keys are fine, known keys with the
/// wrong type are not.
pub fn decode_settings(body: &str) -> Result<SettingsPatch, StorageError> {
    let value: Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(StorageError::CorruptRecord {
            reason: format!("settings body is not a JSON object: {body}"),
        });
    }
    Ok(serde_json::from_value(value)?)
}

/// The text form a project path is stored under.
///
/// Rejects paths that would not come back unchanged from a lossy conversion.
pub fn path_text(path: &Path) -> Result<&str, StorageError> {
    path.to_str().ok_or_else(|| StorageError::InvalidPath {
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsar_core::Theme;

    #[test]
    fn test_decode_partial_record() {
        let patch = decode_settings(r#"{"theme":"light"}"#).unwrap();
        assert_eq!(patch.theme, Some(Theme::Light));
        assert_eq!(patch.php_path, None);
    }

    #[test]
    fn test_decode_rejects_non_objects() {
        assert!(matches!(
            decode_settings("[1, 2]"),
            Err(StorageError::CorruptRecord { .. })
        ));
        assert!(matches!(
            decode_settings("not json"),
            Err(StorageError::Serialization(_))
        ));
        assert!(matches!(
            decode_settings(r#"{"theme": 3}"#),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn test_path_text_accepts_utf8() {
        assert_eq!(path_text(Path::new("/srv/café")).unwrap(), "/srv/café");
    }

    #[cfg(unix)]
    #[test]
    fn test_path_text_rejects_non_utf8() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"/srv/shop-\xff"));
        assert!(matches!(
            path_text(path),
            Err(StorageError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_encode_then_decode_keeps_extra_keys() {
        let settings = Settings::default().merge(
            SettingsPatch::new().with_extra("editorFontSize", serde_json::json!(13)),
        );
        let body = encode_settings(&settings).unwrap();
        let back = Settings::from_persisted(decode_settings(&body).unwrap());
        assert_eq!(back, settings);
    }
}
