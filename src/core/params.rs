use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Interpolation;

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

/// Letterbox parameters suitable for config files and CLI presets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LetterboxParams {
    pub target_h: usize,
    pub target_w: usize,
    /// Fraction of the scaled height where the crop window starts
    pub shift_h: f64,
    /// Fraction of the scaled width where the crop window starts
    pub shift_w: f64,
    pub interpolation: Interpolation,
}

impl Default for LetterboxParams {
    fn default() -> Self {
        Self {
            target_h: 192,
            target_w: 640,
            shift_h: 0.0,
            shift_w: 0.0,
            interpolation: Interpolation::Area,
        }
    }
}

impl LetterboxParams {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        read_json(path)
    }
}

/// Where pretrained models are cached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchParams {
    pub models_dir: PathBuf,
}

impl Default for FetchParams {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("models"),
        }
    }
}

impl FetchParams {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        read_json(path)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"target_h": 320, "target_w": 1024, "interpolation": "lanczos"}}"#)
            .expect("write params");

        let params = LetterboxParams::from_json_file(file.path()).expect("parse params");
        assert_eq!(params.target_h, 320);
        assert_eq!(params.target_w, 1024);
        assert_eq!(params.shift_h, 0.0);
        assert_eq!(params.interpolation, Interpolation::Lanczos);
    }

    #[test]
    fn fetch_params_load_models_dir() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"models_dir": "/data/pretrained"}}"#).expect("write params");
        let params = FetchParams::from_json_file(file.path()).expect("parse params");
        assert_eq!(params.models_dir, PathBuf::from("/data/pretrained"));

        let mut empty = tempfile::NamedTempFile::new().expect("temp file");
        write!(empty, "{{}}").expect("write params");
        assert_eq!(
            FetchParams::from_json_file(empty.path()).expect("parse params"),
            FetchParams::default()
        );
    }

    #[test]
    fn missing_params_file_reports_path() {
        let err = LetterboxParams::from_json_file(Path::new("/nonexistent/params.json")).unwrap_err();
        assert!(matches!(err, Error::ReadFile { .. }));
    }
}
