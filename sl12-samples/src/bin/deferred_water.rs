use sl12_crate_tools::init_log::init_log;
use sl12_crate_tools::resource::Sl12Path;
use sl12_samples::config::DeferredWaterConfig;
use sl12_samples::deferred_water;

fn main() -> anyhow::Result<()> {
    init_log();

    let config_path = Sl12Path::config_path("sl12-samples", "deferred_water.toml");
    let config = if config_path.exists() {
        DeferredWaterConfig::from_file(&config_path)?
    } else {
        log::warn!("config not found at {:?}, using defaults", config_path);
        DeferredWaterConfig::default()
    };
    log::info!("deferred water config: {:?}", config);

    let reports = deferred_water::run(&config)?;
    let total_barriers: usize = reports.iter().map(|report| report.barrier_count).sum();
    log::info!("ran {} frames, {} barriers in total", reports.len(), total_barriers);
    Ok(())
}
