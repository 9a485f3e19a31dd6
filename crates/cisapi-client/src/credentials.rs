//! INI credential file.
//!
//! Each section is a stage and holds one API key pair:
//!
//! ```ini
//! [default]
//! API_KEY=...
//! API_ID=...
//!
//! [staging]
//! API_KEY=...
//! API_ID=...
//! ```

use std::path::Path;

use ini::Ini;
use log::debug;
use secrecy::ExposeSecret;

use cisapi_common::Credentials;

use crate::error::ApiError;

const API_KEY: &str = "API_KEY";
const API_ID: &str = "API_ID";

/// Loads the credentials for `stage` from the file at `path`.
///
/// # Errors
///
/// - [`ApiError::ConfigNotFound`] if the file is missing, unreadable or not valid INI
/// - [`ApiError::ConfigStageMissing`] if there is no `stage` section, or it
///   lacks `API_KEY` or `API_ID`
pub fn load(path: impl AsRef<Path>, stage: &str) -> Result<Credentials, ApiError> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(ApiError::ConfigNotFound {
            path: path.to_path_buf(),
            reason: "file does not exist".to_string(),
        });
    }

    let ini = Ini::load_from_file(path).map_err(|e| ApiError::ConfigNotFound {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let stage_missing = || ApiError::ConfigStageMissing {
        path: path.to_path_buf(),
        stage: stage.to_string(),
    };

    let section = ini.section(Some(stage)).ok_or_else(stage_missing)?;
    let api_key = section.get(API_KEY).ok_or_else(stage_missing)?;
    let api_id = section.get(API_ID).ok_or_else(stage_missing)?;

    debug!("Loaded credentials for stage '{stage}' from {}", path.display());
    Ok(Credentials::new(api_key, api_id))
}

/// Writes `credentials` as the only section of the file at `path`.
///
/// Any existing content, including other stages, is replaced.
///
/// # Errors
///
/// Returns [`ApiError::ConfigWrite`] if the file cannot be written.
pub fn save(path: impl AsRef<Path>, credentials: &Credentials, stage: &str) -> Result<(), ApiError> {
    let path = path.as_ref();

    let mut ini = Ini::new();
    ini.with_section(Some(stage))
        .set(API_KEY, credentials.api_key().expose_secret())
        .set(API_ID, credentials.api_id());

    ini.write_to_file(path).map_err(|source| ApiError::ConfigWrite {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Wrote credentials for stage '{stage}' to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use std::fs;

    use super::*;
    use cisapi_common::DEFAULT_STAGE;

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CIS_API_CREDS.txt");

        save(&path, &Credentials::new("key-1", "id-1"), DEFAULT_STAGE).unwrap();
        let loaded = load(&path, DEFAULT_STAGE).unwrap();

        assert_eq!(loaded.api_key().expose_secret(), "key-1");
        assert_eq!(loaded.api_id(), "id-1");
    }

    #[test]
    fn reads_named_stage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creds.ini");
        fs::write(
            &path,
            "[default]\nAPI_KEY=dk\nAPI_ID=di\n\n[staging]\nAPI_KEY=sk\nAPI_ID=si\n",
        )
        .unwrap();

        let staging = load(&path, "staging").unwrap();
        assert_eq!(staging.api_key().expose_secret(), "sk");
        assert_eq!(staging.api_id(), "si");
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path().join("nope.txt"), DEFAULT_STAGE).unwrap_err();
        assert!(matches!(err, ApiError::ConfigNotFound { .. }));
    }

    #[test]
    fn directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path(), DEFAULT_STAGE).unwrap_err();
        assert!(matches!(err, ApiError::ConfigNotFound { .. }));
    }

    #[test]
    fn missing_stage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creds.ini");
        fs::write(&path, "[default]\nAPI_KEY=k\nAPI_ID=i\n").unwrap();

        let err = load(&path, "production").unwrap_err();
        assert!(
            matches!(err, ApiError::ConfigStageMissing { ref stage, .. } if stage == "production")
        );
    }

    #[test]
    fn incomplete_stage_counts_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creds.ini");
        fs::write(&path, "[default]\nAPI_KEY=k\n").unwrap();

        let err = load(&path, DEFAULT_STAGE).unwrap_err();
        assert!(matches!(err, ApiError::ConfigStageMissing { .. }));
    }

    #[test]
    fn save_overwrites_other_stages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creds.ini");

        save(&path, &Credentials::new("a", "a-id"), "staging").unwrap();
        save(&path, &Credentials::new("b", "b-id"), DEFAULT_STAGE).unwrap();

        assert!(load(&path, DEFAULT_STAGE).is_ok());
        assert!(matches!(
            load(&path, "staging").unwrap_err(),
            ApiError::ConfigStageMissing { .. }
        ));
    }
}
