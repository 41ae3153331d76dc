use crate::model::ice::IcePolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<u32>,
}

/// What the capture primitive is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConstraints {
    pub video: VideoConstraints,
    pub audio: bool,
}

impl CaptureConstraints {
    pub fn is_unconstrained(&self) -> bool {
        self.video == VideoConstraints::default()
    }
}

/// Named capture + ICE presets offered to the sharer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CapturePreset {
    #[default]
    Balanced,
    Performance,
    HighQuality,
    BalancedLanOnly,
    PerformanceLanOnly,
    HighQualityLanOnly,
}

impl CapturePreset {
    pub const ALL: [CapturePreset; 6] = [
        CapturePreset::Balanced,
        CapturePreset::Performance,
        CapturePreset::HighQuality,
        CapturePreset::BalancedLanOnly,
        CapturePreset::PerformanceLanOnly,
        CapturePreset::HighQualityLanOnly,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CapturePreset::Balanced => "balanced",
            CapturePreset::Performance => "performance",
            CapturePreset::HighQuality => "highQuality",
            CapturePreset::BalancedLanOnly => "balancedLanOnly",
            CapturePreset::PerformanceLanOnly => "performanceLanOnly",
            CapturePreset::HighQualityLanOnly => "highQualityLanOnly",
        }
    }

    pub fn constraints(&self) -> CaptureConstraints {
        let video = match self {
            CapturePreset::Balanced | CapturePreset::BalancedLanOnly => VideoConstraints {
                height: Some(720),
                frame_rate: Some(30),
            },
            CapturePreset::Performance | CapturePreset::PerformanceLanOnly => VideoConstraints {
                height: Some(480),
                frame_rate: Some(60),
            },
            CapturePreset::HighQuality | CapturePreset::HighQualityLanOnly => {
                VideoConstraints::default()
            }
        };
        CaptureConstraints { video, audio: true }
    }

    pub fn ice_policy(&self) -> IcePolicy {
        match self {
            CapturePreset::Balanced | CapturePreset::Performance | CapturePreset::HighQuality => {
                IcePolicy::Stun
            }
            _ => IcePolicy::LanOnly,
        }
    }
}

impl FromStr for CapturePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CapturePreset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown preset '{}'", s))
    }
}

impl fmt::Display for CapturePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
