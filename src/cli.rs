use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use heightmesh_grid::NormalizeTarget;
use heightmesh_mesh::PipelineConfig;

#[derive(Parser, Debug)]
#[command(name = "heightmesh")]
#[command(about = "Turn a height or depth grid into a closed, printable mesh", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a binary STL from a 2-D .npy grid
    Build(BuildArgs),
    /// Print shape and value statistics of a .npy grid
    Stats {
        input: PathBuf,
        /// Downsample by this block size before measuring
        #[arg(long)]
        factor: Option<usize>,
    },
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    pub input: PathBuf,

    #[arg(short, long)]
    pub output: PathBuf,

    /// TOML pipeline config; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub factor: Option<usize>,

    /// Outlier threshold in standard deviations
    #[arg(long)]
    pub sigma: Option<f32>,

    #[arg(long)]
    pub no_clamp: bool,

    /// `rows` or a fixed height
    #[arg(long, value_parser = parse_target)]
    pub target: Option<NormalizeTarget>,

    #[arg(long)]
    pub no_normalize: bool,

    #[arg(long)]
    pub no_invert: bool,

    /// Generate faces on all cores
    #[arg(long)]
    pub parallel: bool,
}

fn parse_target(s: &str) -> Result<NormalizeTarget, String> {
    if s.eq_ignore_ascii_case("rows") {
        return Ok(NormalizeTarget::Rows);
    }
    s.parse::<f32>()
        .map(NormalizeTarget::Value)
        .map_err(|_| format!("expected `rows` or a number, got `{s}`"))
}

impl BuildArgs {
    pub fn apply(&self, cfg: &mut PipelineConfig) {
        let pre = &mut cfg.preprocess;
        if let Some(f) = self.factor {
            pre.downsample_factor = f;
        }
        if let Some(s) = self.sigma {
            pre.outlier_sigma = s;
        }
        if let Some(t) = self.target {
            pre.normalize_target = t;
        }
        if self.no_clamp {
            pre.clamp_outliers = false;
        }
        if self.no_normalize {
            pre.normalize = false;
        }
        if self.no_invert {
            pre.invert = false;
        }
        if self.parallel {
            cfg.parallel = true;
        }
    }
}
