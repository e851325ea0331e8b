use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use kira_tsnrqc::cli::{Cli, Commands, InputArgs};
use kira_tsnrqc::ctx::Ctx;
use kira_tsnrqc::io;
use kira_tsnrqc::metrics::spatial_extent;
use kira_tsnrqc::metrics::weisskoff::roi_window;
use kira_tsnrqc::pipeline::Pipeline;
use kira_tsnrqc::pipeline::stage0_scaffold::Stage0Scaffold;
use kira_tsnrqc::pipeline::stage1_input::Stage1Input;
use kira_tsnrqc::pipeline::stage2_voxel_stats::Stage2VoxelStats;
use kira_tsnrqc::pipeline::stage3_centroid::Stage3Centroid;
use kira_tsnrqc::pipeline::stage4_weisskoff::Stage4Weisskoff;
use kira_tsnrqc::pipeline::stage5_report::Stage5Report;
use kira_tsnrqc::pipeline::stage6_output::Stage6Output;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let mut ctx = ctx_from_inputs(args.inputs, args.out, args.outbase);
            ctx.discard_vol = args.discard_vol;
            ctx.save_all_outputs = args.save_all_outputs;
            ctx.write_tsv = args.tsv;
            ctx.threads = args.threads;
            if args.threads > 1 && !cfg!(feature = "mt") {
                ctx.warnings.push(format!(
                    "--threads {} ignored: built without feature 'mt'",
                    args.threads
                ));
            }

            let pipeline = Pipeline::new(vec![
                Box::new(Stage0Scaffold::new()),
                Box::new(Stage1Input::new()),
                Box::new(Stage2VoxelStats::new()),
                Box::new(Stage3Centroid::new()),
                Box::new(Stage4Weisskoff::new()),
                Box::new(Stage5Report::new()),
                Box::new(Stage6Output::new()),
            ]);
            pipeline.run(&mut ctx)?;

            print_summary(&ctx)?;
        }
        Commands::Validate(args) => {
            let mut ctx = ctx_from_inputs(args.inputs, PathBuf::from("."), None);

            let pipeline = Pipeline::new(vec![
                Box::new(Stage1Input::new()),
                Box::new(Stage3Centroid::new()),
            ]);
            pipeline.run(&mut ctx)?;

            print_validate_summary(&ctx)?;
        }
    }

    Ok(())
}

fn ctx_from_inputs(inputs: InputArgs, out: PathBuf, outbase: Option<String>) -> Ctx {
    let mut ctx = Ctx::new(
        inputs.input,
        inputs.noise,
        inputs.mask,
        out,
        outbase,
        env!("CARGO_PKG_VERSION"),
    );
    ctx.roi_size = inputs.roi_size;
    ctx
}

fn print_summary(ctx: &Ctx) -> Result<()> {
    let summary = io::summary::format_summary(ctx)?;
    print!("{}", summary);
    print_warnings(ctx);
    Ok(())
}

fn print_validate_summary(ctx: &Ctx) -> Result<()> {
    let series = ctx.series()?;
    let trajectory = ctx
        .trajectory
        .as_ref()
        .context("centroid trajectory missing")?;
    let reference = trajectory.reference;
    roi_window(reference, ctx.roi_size, spatial_extent(series))
        .with_context(|| format!("--roi-size {} does not fit the volume", ctx.roi_size))?;

    let shape = series.shape();
    println!("kira-tsnrqc validate ok");
    println!(
        "shape: {}x{}x{}x{}",
        shape[0], shape[1], shape[2], shape[3]
    );
    println!(
        "reference centroid: ({}, {}, {})",
        reference[0], reference[1], reference[2]
    );
    println!("roi size: {}", ctx.roi_size);
    println!(
        "tissue voxels: {}",
        ctx.report.input_meta.tissue_voxels.unwrap_or(0)
    );
    print_warnings(ctx);
    Ok(())
}

fn print_warnings(ctx: &Ctx) {
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
}
