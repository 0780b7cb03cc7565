#![forbid(unsafe_code)]

mod cli;

use std::error::Error;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use heightmesh_grid::downsample;
use heightmesh_mesh::{FaceOrigin, PipelineConfig, build_mesh};
use log::{error, info, warn};

use cli::{BuildArgs, Cli, Command};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Build(args) => run_build(&args),
        Command::Stats { input, factor } => run_stats(&input, factor),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            let mut source = e.source();
            while let Some(s) = source {
                error!("  caused by: {}", s);
                source = s.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run_build(args: &BuildArgs) -> Result<(), Box<dyn Error>> {
    let mut cfg = match &args.config {
        Some(path) => heightmesh_io::load_config_from_path(path)?,
        None => PipelineConfig::default(),
    };
    args.apply(&mut cfg);

    let grid = heightmesh_io::load_grid(&args.input)?;
    info!(
        "loaded {} ({}x{})",
        args.input.display(),
        grid.rows(),
        grid.cols()
    );
    let report = build_mesh(&grid, &cfg)?;
    for w in &report.warnings {
        warn!("{}", w);
    }
    let mesh = &report.mesh;
    info!(
        "{}x{} grid -> {} triangles (tiles {}, walls {}, floor {})",
        report.rows,
        report.cols,
        mesh.triangle_count(),
        mesh.count_of(FaceOrigin::Tile),
        mesh.count_of(FaceOrigin::Wall),
        mesh.count_of(FaceOrigin::Floor)
    );
    heightmesh_io::stl::save(mesh, &args.output)?;
    Ok(())
}

fn run_stats(input: &Path, factor: Option<usize>) -> Result<(), Box<dyn Error>> {
    let mut grid = heightmesh_io::load_grid(input)?;
    if let Some(f) = factor {
        grid = downsample(&grid, f)?;
    }
    println!("shape: {}x{}", grid.rows(), grid.cols());
    println!("min:   {}", grid.min());
    println!("max:   {}", grid.max());
    println!("mean:  {:.4}", grid.mean());
    println!("std:   {:.4}", grid.std_dev());
    Ok(())
}
