use serde::Deserialize;

use crate::error::InvalidConfigError;
use crate::preprocess::Stage;
use crate::StageError;

/// Knobs for the preprocessing chain. Stages run in the order
/// downsample, clamp outliers, normalize, invert; disabled stages are skipped.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PreprocessConfig {
    /// Block edge for block-mean reduction; `1` keeps the grid as is.
    #[serde(default = "default_downsample_factor")]
    pub downsample_factor: usize,
    #[serde(default = "default_true")]
    pub clamp_outliers: bool,
    #[serde(default = "default_outlier_sigma")]
    pub outlier_sigma: f32,
    #[serde(default = "default_true")]
    pub normalize: bool,
    #[serde(default)]
    pub normalize_target: NormalizeTarget,
    #[serde(default = "default_true")]
    pub invert: bool,
}

/// Ceiling that normalization rescales the grid maximum to.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum NormalizeTarget {
    /// The grid's row count, so heights stay in proportion to the grid footprint.
    #[default]
    Rows,
    Value(f32),
}

fn default_downsample_factor() -> usize {
    16
}
fn default_outlier_sigma() -> f32 {
    3.0
}
fn default_true() -> bool {
    true
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            downsample_factor: default_downsample_factor(),
            clamp_outliers: true,
            outlier_sigma: default_outlier_sigma(),
            normalize: true,
            normalize_target: NormalizeTarget::Rows,
            invert: true,
        }
    }
}

impl PreprocessConfig {
    /// Every stage disabled: the processed grid equals the input.
    pub fn passthrough() -> Self {
        Self {
            downsample_factor: 1,
            clamp_outliers: false,
            normalize: false,
            invert: false,
            ..Self::default()
        }
    }

    /// Checks every enabled knob before any work is done.
    pub fn validate(&self) -> Result<(), StageError> {
        if self.downsample_factor == 0 {
            return Err(StageError::new(
                Stage::Downsample,
                InvalidConfigError::new("downsample_factor", 0, "must be at least 1"),
            ));
        }
        if self.clamp_outliers {
            check_sigma(self.outlier_sigma).map_err(|e| StageError::new(Stage::ClampOutliers, e))?;
        }
        if self.normalize {
            if let NormalizeTarget::Value(t) = self.normalize_target {
                check_target(t).map_err(|e| StageError::new(Stage::Normalize, e))?;
            }
        }
        Ok(())
    }
}

pub(crate) fn check_sigma(sigma: f32) -> Result<(), InvalidConfigError> {
    if sigma.is_finite() && sigma > 0.0 {
        Ok(())
    } else {
        Err(InvalidConfigError::new(
            "outlier_sigma",
            sigma,
            "must be finite and greater than zero",
        ))
    }
}

pub(crate) fn check_target(target: f32) -> Result<(), InvalidConfigError> {
    if target.is_finite() && target > 0.0 {
        Ok(())
    } else {
        Err(InvalidConfigError::new(
            "normalize_target",
            target,
            "must be finite and greater than zero",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GridError;

    #[test]
    fn default_chain_enables_every_stage() {
        let cfg = PreprocessConfig::default();
        assert_eq!(cfg.downsample_factor, 16);
        assert_eq!(cfg.outlier_sigma, 3.0);
        assert_eq!(cfg.normalize_target, NormalizeTarget::Rows);
        assert!(cfg.clamp_outliers && cfg.normalize && cfg.invert);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: PreprocessConfig = toml::from_str(
            r#"
            downsample_factor = 4
            invert = false
            normalize_target = { value = 12.5 }
            "#,
        )
        .unwrap();
        assert_eq!(cfg.downsample_factor, 4);
        assert!(!cfg.invert);
        assert_eq!(cfg.normalize_target, NormalizeTarget::Value(12.5));
        assert_eq!(cfg.outlier_sigma, 3.0);

        let rows: PreprocessConfig = toml::from_str(r#"normalize_target = "rows""#).unwrap();
        assert_eq!(rows.normalize_target, NormalizeTarget::Rows);
    }

    #[test]
    fn validate_names_the_stage() {
        let cfg = PreprocessConfig {
            downsample_factor: 0,
            ..PreprocessConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.stage, Stage::Downsample);
        assert!(matches!(err.source, GridError::InvalidConfig(_)));

        let cfg = PreprocessConfig {
            outlier_sigma: 0.0,
            ..PreprocessConfig::default()
        };
        assert_eq!(cfg.validate().unwrap_err().stage, Stage::ClampOutliers);

        // A disabled stage does not care about its knob
        let cfg = PreprocessConfig {
            clamp_outliers: false,
            outlier_sigma: -1.0,
            ..PreprocessConfig::default()
        };
        assert!(cfg.validate().is_ok());

        let cfg = PreprocessConfig {
            normalize_target: NormalizeTarget::Value(f32::NAN),
            ..PreprocessConfig::default()
        };
        assert_eq!(cfg.validate().unwrap_err().stage, Stage::Normalize);
    }
}
