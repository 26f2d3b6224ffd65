use super::super::domain::UnknownOption;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Named scoring presets. Both historical formulas are kept so either
/// dashboard can reproduce its published numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPreset {
    /// Preset A: speed, static acceptance proxy, volume capped at 30 points.
    #[serde(alias = "a")]
    Acceptance,
    /// Preset B: speed, AI match rating, volume capped at 20 points.
    #[default]
    #[serde(alias = "b")]
    MatchQuality,
}

impl ScoringPreset {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Acceptance => "acceptance",
            Self::MatchQuality => "match_quality",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Acceptance => "Preset A (acceptance)",
            Self::MatchQuality => "Preset B (match quality)",
        }
    }

    pub const fn quality_source(self) -> QualitySource {
        match self {
            Self::Acceptance => QualitySource::StaticAcceptance,
            Self::MatchQuality => QualitySource::MatchScores,
        }
    }

    pub const fn weights(self) -> ScoringWeights {
        match self {
            Self::Acceptance => ScoringWeights {
                speed: 0.4,
                quality: 0.3,
                volume_points_per_job: 10,
                volume_cap: 30,
            },
            Self::MatchQuality => ScoringWeights {
                speed: 0.4,
                quality: 0.4,
                volume_points_per_job: 2,
                volume_cap: 20,
            },
        }
    }
}

impl FromStr for ScoringPreset {
    type Err = UnknownOption;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "a" | "acceptance" => Ok(Self::Acceptance),
            "b" | "match_quality" | "match-quality" => Ok(Self::MatchQuality),
            _ => Err(UnknownOption::new("scoring preset", value)),
        }
    }
}

/// Which figure feeds the quality term of the composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualitySource {
    /// 100 when the sourcer submitted anyone, 0 otherwise. No rejection data
    /// exists behind this figure.
    StaticAcceptance,
    /// Mean of the usable AI match scores across the sourcer's candidates.
    MatchScores,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub speed: f64,
    pub quality: f64,
    pub volume_points_per_job: u32,
    pub volume_cap: u32,
}

/// Engine configuration: the weights and quality figure used for the composite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceConfig {
    pub preset: ScoringPreset,
    pub weights: ScoringWeights,
    pub quality_source: QualitySource,
}

impl PerformanceConfig {
    pub const fn from_preset(preset: ScoringPreset) -> Self {
        Self {
            preset,
            weights: preset.weights(),
            quality_source: preset.quality_source(),
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self::from_preset(ScoringPreset::default())
    }
}
