//! Shared types and enums used across depthprep.
//! Includes `Interpolation`, `SceneCondition` and the pretrained `ModelName` registry keys.
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    Nearest,
    Bilinear,
    Cubic,
    /// Box-filter area averaging, the usual choice for downscaling
    #[default]
    Area,
    Lanczos,
}

impl std::fmt::Display for Interpolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Interpolation::Nearest => "nearest",
            Interpolation::Bilinear => "bilinear",
            Interpolation::Cubic => "cubic",
            Interpolation::Area => "area",
            Interpolation::Lanczos => "lanczos",
        };
        write!(f, "{}", s)
    }
}

/// A scene condition a dataset sample can be retained for.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneCondition {
    Day,
    Night,
    Rain,
}

impl SceneCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            SceneCondition::Day => "day",
            SceneCondition::Night => "night",
            SceneCondition::Rain => "rain",
        }
    }
}

impl std::fmt::Display for SceneCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SceneCondition {
    type Err = crate::Error;

    /// Tokens are matched exactly; `"Day"` or `"fog"` are not conditions.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(SceneCondition::Day),
            "night" => Ok(SceneCondition::Night),
            "rain" => Ok(SceneCondition::Rain),
            other => Err(crate::Error::InvalidArgument {
                arg: "scene_condition",
                value: other.to_string(),
            }),
        }
    }
}

/// Pretrained depth models available for download.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Debug, Serialize, Deserialize)]
pub enum ModelName {
    #[value(name = "mono_640x192")]
    #[serde(rename = "mono_640x192")]
    Mono640x192,
    #[value(name = "stereo_640x192")]
    #[serde(rename = "stereo_640x192")]
    Stereo640x192,
    #[value(name = "mono+stereo_640x192")]
    #[serde(rename = "mono+stereo_640x192")]
    MonoStereo640x192,
    #[value(name = "mono_no_pt_640x192")]
    #[serde(rename = "mono_no_pt_640x192")]
    MonoNoPt640x192,
    #[value(name = "stereo_no_pt_640x192")]
    #[serde(rename = "stereo_no_pt_640x192")]
    StereoNoPt640x192,
    #[value(name = "mono+stereo_no_pt_640x192")]
    #[serde(rename = "mono+stereo_no_pt_640x192")]
    MonoStereoNoPt640x192,
    #[value(name = "mono_1024x320")]
    #[serde(rename = "mono_1024x320")]
    Mono1024x320,
    #[value(name = "stereo_1024x320")]
    #[serde(rename = "stereo_1024x320")]
    Stereo1024x320,
    #[value(name = "mono+stereo_1024x320")]
    #[serde(rename = "mono+stereo_1024x320")]
    MonoStereo1024x320,
}

impl ModelName {
    pub const ALL: [ModelName; 9] = [
        ModelName::Mono640x192,
        ModelName::Stereo640x192,
        ModelName::MonoStereo640x192,
        ModelName::MonoNoPt640x192,
        ModelName::StereoNoPt640x192,
        ModelName::MonoStereoNoPt640x192,
        ModelName::Mono1024x320,
        ModelName::Stereo1024x320,
        ModelName::MonoStereo1024x320,
    ];

    /// Registry key, also the name of the model's directory and archive stem.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelName::Mono640x192 => "mono_640x192",
            ModelName::Stereo640x192 => "stereo_640x192",
            ModelName::MonoStereo640x192 => "mono+stereo_640x192",
            ModelName::MonoNoPt640x192 => "mono_no_pt_640x192",
            ModelName::StereoNoPt640x192 => "stereo_no_pt_640x192",
            ModelName::MonoStereoNoPt640x192 => "mono+stereo_no_pt_640x192",
            ModelName::Mono1024x320 => "mono_1024x320",
            ModelName::Stereo1024x320 => "stereo_1024x320",
            ModelName::MonoStereo1024x320 => "mono+stereo_1024x320",
        }
    }
}

impl std::fmt::Display for ModelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModelName {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelName::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| crate::Error::InvalidArgument {
                arg: "model_name",
                value: s.to_string(),
            })
    }
}
