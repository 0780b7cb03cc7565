//! Pure grid transforms. Each takes a grid by reference and returns a new one.

use log::{debug, warn};

use crate::config::{NormalizeTarget, PreprocessConfig, check_sigma, check_target};
use crate::error::{DataError, GridError, GridWarning, InvalidConfigError};
use crate::grid::HeightGrid;
use crate::StageError;

/// Preprocessing step, used to attribute failures.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Stage {
    Downsample,
    ClampOutliers,
    Normalize,
    Invert,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Downsample => "downsample",
            Stage::ClampOutliers => "clamp_outliers",
            Stage::Normalize => "normalize",
            Stage::Invert => "invert",
        };
        f.write_str(s)
    }
}

/// Output of [`preprocess`].
#[derive(Clone, Debug)]
pub struct Preprocessed {
    pub grid: HeightGrid,
    pub warnings: Vec<GridWarning>,
}

/// Replaces each `factor x factor` block with its mean.
/// Cells past the last full block on either axis are dropped.
pub fn downsample(grid: &HeightGrid, factor: usize) -> Result<HeightGrid, GridError> {
    if factor == 0 {
        return Err(InvalidConfigError::new("downsample_factor", 0, "must be at least 1").into());
    }
    if factor == 1 {
        return Ok(grid.clone());
    }
    let out_rows = grid.rows() / factor;
    let out_cols = grid.cols() / factor;
    if out_rows == 0 || out_cols == 0 {
        // No full block fits on at least one axis
        return Err(DataError::Empty {
            rows: out_rows,
            cols: out_cols,
        }
        .into());
    }
    let inv = 1.0 / (factor * factor) as f64;
    let mut out = Vec::with_capacity(out_rows * out_cols);
    for br in 0..out_rows {
        for bc in 0..out_cols {
            let mut sum = 0.0f64;
            for row in br * factor..(br + 1) * factor {
                let line = grid.row(row);
                sum += line[bc * factor..(bc + 1) * factor]
                    .iter()
                    .map(|&v| v as f64)
                    .sum::<f64>();
            }
            out.push((sum * inv) as f32);
        }
    }
    debug!(
        "downsample {}x{} -> {}x{} (factor {})",
        grid.rows(),
        grid.cols(),
        out_rows,
        out_cols,
        factor
    );
    Ok(HeightGrid::new(out_rows, out_cols, out)?)
}

/// Lower and upper clamp bounds `mean ∓ sigma * std` of `grid` (population std).
pub fn clamp_bounds(grid: &HeightGrid, sigma: f32) -> (f64, f64) {
    let m = grid.mean();
    let s = grid.std_dev();
    let sigma = sigma as f64;
    (m - sigma * s, m + sigma * s)
}

/// Clamps every value to [`clamp_bounds`] of the input grid in a single pass.
/// Values already inside the bounds come back bit-identical.
pub fn clamp_outliers(grid: &HeightGrid, sigma: f32) -> Result<HeightGrid, GridError> {
    check_sigma(sigma)?;
    let (lo, hi) = clamp_bounds(grid, sigma);
    let mut clamped = 0usize;
    let out = grid.map(|v| {
        let c = (v as f64).clamp(lo, hi) as f32;
        if c != v {
            clamped += 1;
        }
        c
    })?;
    debug!(
        "clamp_outliers sigma={} bounds=[{:.4}, {:.4}] clamped={}",
        sigma, lo, hi, clamped
    );
    Ok(out)
}

/// Scales the grid so its maximum lands on `target`.
///
/// A grid without a positive maximum cannot be scaled; it is returned
/// unchanged together with [`GridWarning::DegenerateNormalize`].
pub fn normalize(
    grid: &HeightGrid,
    target: NormalizeTarget,
) -> Result<(HeightGrid, Option<GridWarning>), GridError> {
    let target = match target {
        NormalizeTarget::Rows => grid.rows() as f32,
        NormalizeTarget::Value(t) => {
            check_target(t)?;
            t
        }
    };
    let max = grid.max();
    if max <= 0.0 {
        let warning = GridWarning::DegenerateNormalize { max };
        warn!("{}", warning);
        return Ok((grid.clone(), Some(warning)));
    }
    let factor = target / max;
    debug!("normalize max={} target={} factor={}", max, target, factor);
    Ok((grid.map(|v| v * factor)?, None))
}

/// Flips high and low: every value becomes `max - v`.
pub fn invert(grid: &HeightGrid) -> Result<HeightGrid, GridError> {
    let max = grid.max();
    Ok(grid.map(|v| max - v)?)
}

/// Runs the configured chain. The first failing stage aborts the whole run.
pub fn preprocess(grid: &HeightGrid, cfg: &PreprocessConfig) -> Result<Preprocessed, StageError> {
    cfg.validate()?;
    let mut warnings = Vec::new();
    let mut g = downsample(grid, cfg.downsample_factor)
        .map_err(|e| StageError::new(Stage::Downsample, e))?;
    if cfg.clamp_outliers {
        g = clamp_outliers(&g, cfg.outlier_sigma)
            .map_err(|e| StageError::new(Stage::ClampOutliers, e))?;
    }
    if cfg.normalize {
        let (n, w) = normalize(&g, cfg.normalize_target)
            .map_err(|e| StageError::new(Stage::Normalize, e))?;
        g = n;
        warnings.extend(w);
    }
    if cfg.invert {
        g = invert(&g).map_err(|e| StageError::new(Stage::Invert, e))?;
    }
    Ok(Preprocessed { grid: g, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[f32]]) -> HeightGrid {
        HeightGrid::from_rows(rows).unwrap()
    }

    #[test]
    fn downsample_4x4_by_2_takes_block_means() {
        let g = grid(&[
            &[1.0, 3.0, 10.0, 20.0],
            &[5.0, 7.0, 30.0, 40.0],
            &[0.0, 0.0, 2.0, 2.0],
            &[0.0, 4.0, 2.0, 6.0],
        ]);
        let d = downsample(&g, 2).unwrap();
        assert_eq!((d.rows(), d.cols()), (2, 2));
        assert_eq!(d.values(), &[4.0, 25.0, 1.0, 3.0]);
    }

    #[test]
    fn downsample_drops_partial_blocks() {
        let g = HeightGrid::from_fn(5, 7, |r, c| (r * 7 + c) as f32).unwrap();
        let d = downsample(&g, 2).unwrap();
        assert_eq!((d.rows(), d.cols()), (2, 3));
        // Block (1, 2) covers rows 2..4, cols 4..6
        let expect = (18.0 + 19.0 + 25.0 + 26.0) / 4.0;
        assert_eq!(d.get(1, 2), expect);
    }

    #[test]
    fn downsample_rejects_bad_factor() {
        let g = HeightGrid::filled(3, 3, 1.0).unwrap();
        assert!(matches!(downsample(&g, 0), Err(GridError::InvalidConfig(_))));
        assert_eq!(
            downsample(&g, 4),
            Err(GridError::Data(DataError::Empty { rows: 0, cols: 0 }))
        );
        let wide = HeightGrid::filled(2, 8, 1.0).unwrap();
        assert_eq!(
            downsample(&wide, 4),
            Err(GridError::Data(DataError::Empty { rows: 0, cols: 2 }))
        );
        assert_eq!(downsample(&g, 1).unwrap(), g);
    }

    #[test]
    fn clamp_caps_a_spike_at_the_upper_bound() {
        let mut vals = vec![10.0f32; 256];
        for (i, v) in vals.iter_mut().enumerate() {
            *v += (i % 7) as f32 * 0.5;
        }
        vals[37] = 1000.0;
        let g = HeightGrid::new(16, 16, vals).unwrap();
        let (lo, hi) = clamp_bounds(&g, 3.0);
        let c = clamp_outliers(&g, 3.0).unwrap();
        assert_eq!(c.get(2, 5), hi as f32);
        assert!(c.get(2, 5) < 1000.0);
        assert!(lo < 10.0);
        // Inliers are untouched
        assert_eq!(c.get(0, 0), 10.0);
        assert_eq!(c.get(0, 3), 11.5);
    }

    #[test]
    fn clamp_lone_spike_single_pass() {
        // mean 1, population std 3: the spike stops at m + s
        let mut vals = vec![0.0f32; 9];
        vals.push(10.0);
        let g = HeightGrid::new(2, 5, vals).unwrap();
        assert_eq!(clamp_bounds(&g, 1.0), (-2.0, 4.0));
        let c = clamp_outliers(&g, 1.0).unwrap();
        assert_eq!(c.get(1, 4), 4.0);
        assert!(c.values()[..9].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn clamp_small_sigma_uses_input_statistics() {
        let g = grid(&[&[0.0, 1.0], &[0.0, 1.0]]);
        let c = clamp_outliers(&g, 0.5).unwrap();
        assert_eq!(c.values(), &[0.25, 0.75, 0.25, 0.75]);
    }

    #[test]
    fn clamp_rejects_bad_sigma() {
        let g = HeightGrid::filled(2, 2, 1.0).unwrap();
        for s in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(clamp_outliers(&g, s), Err(GridError::InvalidConfig(_))));
        }
    }

    #[test]
    fn clamp_constant_grid_is_identity() {
        let g = HeightGrid::filled(4, 5, 2.25).unwrap();
        assert_eq!(clamp_outliers(&g, 3.0).unwrap(), g);
    }

    #[test]
    fn normalize_scales_max_to_target() {
        let g = grid(&[&[1.0, 2.0], &[4.0, 0.0], &[3.0, 2.0]]);
        let (n, w) = normalize(&g, NormalizeTarget::Rows).unwrap();
        assert!(w.is_none());
        assert_eq!(n.max(), 3.0);
        assert_eq!(n.get(0, 0), 0.75);

        let (n, _) = normalize(&g, NormalizeTarget::Value(100.0)).unwrap();
        assert_eq!(n.get(1, 0), 100.0);
        assert_eq!(n.get(0, 1), 50.0);
    }

    #[test]
    fn normalize_all_zero_is_unchanged_with_warning() {
        let g = HeightGrid::filled(3, 3, 0.0).unwrap();
        let (n, w) = normalize(&g, NormalizeTarget::Rows).unwrap();
        assert_eq!(n, g);
        assert!(n.values().iter().all(|v| !v.is_nan()));
        assert_eq!(w, Some(GridWarning::DegenerateNormalize { max: 0.0 }));
    }

    #[test]
    fn normalize_all_negative_is_unchanged_with_warning() {
        let g = grid(&[&[-3.0, -1.0], &[-2.0, -0.5]]);
        let (n, w) = normalize(&g, NormalizeTarget::Rows).unwrap();
        assert_eq!(n, g);
        assert_eq!(w, Some(GridWarning::DegenerateNormalize { max: -0.5 }));
    }

    #[test]
    fn normalize_rejects_bad_target() {
        let g = HeightGrid::filled(1, 1, 1.0).unwrap();
        assert!(matches!(
            normalize(&g, NormalizeTarget::Value(0.0)),
            Err(GridError::InvalidConfig(_))
        ));
    }

    #[test]
    fn normalize_overflow_is_reported_with_cell() {
        let g = grid(&[&[f32::MIN_POSITIVE * 1e-3, 0.0]]);
        let err = normalize(&g, NormalizeTarget::Value(f32::MAX)).unwrap_err();
        assert!(matches!(err, GridError::Data(DataError::NonFinite { row: 0, col: 0, .. })));
    }

    #[test]
    fn invert_flips_against_max() {
        let g = grid(&[&[1.0, 5.0], &[3.0, 0.0]]);
        let i = invert(&g).unwrap();
        assert_eq!(i.values(), &[4.0, 0.0, 2.0, 5.0]);
    }

    #[test]
    fn chain_reports_failing_stage() {
        let g = HeightGrid::filled(4, 4, 1.0).unwrap();
        let cfg = PreprocessConfig {
            downsample_factor: 8,
            ..PreprocessConfig::default()
        };
        let err = preprocess(&g, &cfg).unwrap_err();
        assert_eq!(err.stage, Stage::Downsample);
        assert!(matches!(err.source, GridError::Data(DataError::Empty { .. })));
    }

    #[test]
    fn chain_collects_degenerate_warning() {
        let g = HeightGrid::filled(4, 4, 0.0).unwrap();
        let cfg = PreprocessConfig {
            downsample_factor: 2,
            ..PreprocessConfig::default()
        };
        let out = preprocess(&g, &cfg).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.grid, HeightGrid::filled(2, 2, 0.0).unwrap());
    }

    #[test]
    fn chain_depth_to_height() {
        // Far points (large depth) end up low after inversion
        let g = grid(&[&[4.0, 2.0], &[2.0, 1.0]]);
        let cfg = PreprocessConfig {
            downsample_factor: 1,
            clamp_outliers: false,
            normalize_target: NormalizeTarget::Value(8.0),
            ..PreprocessConfig::default()
        };
        let out = preprocess(&g, &cfg).unwrap();
        assert_eq!(out.grid.values(), &[0.0, 4.0, 4.0, 6.0]);
        assert!(out.warnings.is_empty());
    }
}
