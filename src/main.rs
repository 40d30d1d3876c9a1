use anyhow::anyhow;
use anyhow::Result;
use std::env;
use tilegen::split_label;
use tilegen::Catalog;
use tilegen::Model;
use tilegen::Outcome;
use tracing::error;
use tracing::info;
use tracing_log::LogTracer;
use tracing_subscriber::EnvFilter;

fn print_map(model: &Model) {
    info!("map:");
    let samples = model.render();
    for y in 0..model.height() {
        let mut output = String::new();
        for x in 0..model.width() {
            let cell = match samples[x + y * model.width()].and_then(split_label) {
                Some((rotation, base)) => {
                    format!("{rotation}{}", base.chars().next().unwrap_or('?'))
                }
                None => "..".to_string(),
            };
            output = format!("{}{:>4}", output, cell);
        }
        info!("        {}", output);
    }
}

/// Routes `log` records and `tracing` events to stderr, filtered by `RUST_LOG`
/// (default `info`).
fn setup_logging() -> Result<()> {
    LogTracer::init()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_level(true)
            .finish(),
    )?;

    anyhow::Ok(())
}

fn main() -> Result<()> {
    setup_logging()?;

    let args: Vec<String> = env::args().collect();
    anyhow::ensure!(
        args.len() >= 4,
        "usage: {} <catalog.json> <width> <height> [seed] [subset]",
        args.first().map(String::as_str).unwrap_or("tilegen")
    );

    let filename = &args[1];
    let width = args[2].parse::<usize>()?;
    let height = args[3].parse::<usize>()?;
    let seed = match args.get(4) {
        Some(seed) => seed.parse::<u64>()?,
        None => 0,
    };
    let subset = args.get(5).map(String::as_str).unwrap_or("");

    let periodic = env::var("TILEGEN_PERIODIC").map(|x| x == "1").unwrap_or(false);
    let tries = match env::var("TILEGEN_TRIES") {
        Ok(tries) => tries.parse::<usize>()?,
        Err(_) => 10,
    };

    info!("filename: {filename}");

    let catalog: Catalog = serde_json::from_slice(&std::fs::read(filename)?)?;
    let mut model = Model::build(&catalog, subset, width, height, periodic)?;

    for attempt in 0..tries {
        // seed 0 keeps drawing from system entropy
        let seed = if seed == 0 { 0 } else { seed.wrapping_add(attempt as u64) };

        match model.run(seed, 0) {
            Outcome::Complete => {
                info!("solved on attempt {attempt} with seed {seed}");
                print_map(&model);
                return anyhow::Ok(());
            }
            outcome => {
                error!("attempt {attempt} with seed {seed}: {outcome:?}");
                model.print_wave();
            }
        }
    }

    Err(anyhow!("no solution after {tries} attempts"))
}
