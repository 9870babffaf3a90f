use std::{env, fs, path::PathBuf, process};

use anyhow::Context;
use serde::Serialize;

use jma2rig::{
    Keyframe, KeyframeBuffer, RetargetOptions, RetargetReport, RetargetStatus, TargetSkeleton,
    import_animation, retarget_animation, strip_node_prefix,
};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        process::exit(1);
    }
}

#[derive(Serialize)]
struct OutputDocument<'a> {
    report: &'a RetargetReport,
    keyframes: Vec<Keyframe>,
}

fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        eprintln!("Usage: jma2rig <input.jma> <target.glb> <output.json>");
        process::exit(2);
    }

    let input = PathBuf::from(&args[1]);
    let target = PathBuf::from(&args[2]);
    let output = PathBuf::from(&args[3]);

    let document = import_animation(&input)?;
    println!(
        "Animation: {} (version {}, {} nodes, {} frames @ {} fps)",
        document.name,
        document.format_version,
        document.nodes.len(),
        document.frame_count,
        document.frames_per_second
    );

    let skeleton = TargetSkeleton::from_gltf(&target, None)?;
    println!("Target skeleton: {} bones", skeleton.bones.len());

    let mut buffer = KeyframeBuffer::new();
    let report = retarget_animation(
        &document,
        &skeleton,
        &strip_node_prefix,
        &RetargetOptions::default(),
        &mut buffer,
    );

    if report.status == RetargetStatus::NothingToRetarget {
        eprintln!("No animation nodes matched the target skeleton; nothing to retarget.");
    }
    println!(
        "Bound bones: {} (skipped nodes: {})",
        report.bound_bones.len(),
        report.unmatched_nodes.len()
    );
    for issue in &report.issues {
        eprintln!("[{:?}] {}", issue.severity, issue.message);
    }

    let output_document = OutputDocument {
        report: &report,
        keyframes: buffer.into_sorted(),
    };
    let json = serde_json::to_string_pretty(&output_document)
        .context("failed to serialize keyframe output")?;
    fs::write(&output, json)
        .with_context(|| format!("failed to write keyframe output: {}", output.display()))?;

    println!("Wrote {}", output.display());

    Ok(())
}
