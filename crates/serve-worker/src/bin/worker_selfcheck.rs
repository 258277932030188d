use std::path::Path;

use serve_models::{FramePose, Landmark, LandmarkSample, PoseSequence};
use serve_worker::WorkerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = WorkerConfig::from_env();

    println!(
        "worker-selfcheck: starting with input_dir={} output_dir={}",
        config.input_dir.display(),
        config.output_dir.display()
    );
    ensure_input_dir(&config.input_dir).await?;
    ensure_output_dir(&config.output_dir).await?;
    ensure_analysis(&config)?;

    println!("worker-selfcheck: ok");
    Ok(())
}

async fn ensure_input_dir(path: &Path) -> anyhow::Result<()> {
    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| anyhow::anyhow!("input dir {} not readable: {}", path.display(), e))?;
    if !meta.is_dir() {
        return Err(anyhow::anyhow!("input path {} is not a directory", path.display()));
    }
    Ok(())
}

async fn ensure_output_dir(path: &Path) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(path).await?;
    let probe = path.join(".selfcheck");
    tokio::fs::write(&probe, b"ok").await?;
    tokio::fs::remove_file(&probe).await?;
    Ok(())
}

/// Build the configured analyzer and run it on a short synthetic clip.
fn ensure_analysis(config: &WorkerConfig) -> anyhow::Result<()> {
    let analyzer = config.analyzer()?;
    let frames = (0..30u64)
        .map(|i| {
            let t = i as f64;
            FramePose::detected(
                i,
                t / 30.0,
                [
                    (Landmark::RightWrist, LandmarkSample::new(0.6, 0.5 - 0.01 * t)),
                    (Landmark::LeftWrist, LandmarkSample::new(0.4, 0.4 - 0.005 * t)),
                ],
            )
        })
        .collect();
    let analysis = analyzer.try_analyze(&PoseSequence::new(frames))?;
    println!(
        "worker-selfcheck: analysis ok, {} phases, overall {:.2}",
        analysis.serve_phases.len(),
        analysis.overall_score
    );
    Ok(())
}
