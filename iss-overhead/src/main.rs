use iss_overhead::config;
use iss_overhead::PassPipeline;

use anyhow::Result;
use chrono::Local;
use iss_common::PassEvent;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = config::read_config()?;

    // Initialize logging
    let _logging_guard = iss_overhead::logging::init_logging(
        config.log_dir.as_deref().map(std::path::Path::new),
        "iss-overhead",
        &config.log_level,
    )?;

    let config_file = config::config_path();
    if config_file.exists() {
        tracing::debug!("Loaded config from {}", config_file.display());
    } else {
        tracing::debug!("No config file at {}, using defaults", config_file.display());
    }

    tracing::info!(
        ip_url = %config.ip_url,
        geo_base_url = %config.geo_base_url,
        pass_base_url = %config.pass_base_url,
        pass_count = config.pass_count,
        "ISS overhead lookup starting"
    );

    let pipeline = PassPipeline::from_config(config)?;

    // Returned errors are printed by the runtime; the pipeline logs only the stage
    let passes = pipeline.next_passes().await?;

    if passes.is_empty() {
        println!("No upcoming passes predicted for this location");
    }

    for pass in &passes {
        println!(
            "Next pass at {} for {} seconds",
            format_rise_time(pass),
            pass.duration
        );
    }

    Ok(())
}

fn format_rise_time(pass: &PassEvent) -> String {
    match pass.rise_time() {
        Some(rise) => rise.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S %Z").to_string(),
        None => format!("unix time {}", pass.risetime),
    }
}
