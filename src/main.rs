use std::env;
use std::fs;
use std::sync::Arc;

use vgen::{
    ApiConfig, ControllerConfig, DisplaySink, GenerationController, ImageData, ProgressState,
    Result, Showcase, StudioClient, SubmitOutcome, VgenError,
};

/// Console rendering surface: progress goes to the log, result images go to
/// disk. Each controller gets its own sink instance.
struct ConsoleSink {
    name: &'static str,
}

impl ConsoleSink {
    fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self { name })
    }
}

impl DisplaySink for ConsoleSink {
    fn set_busy(&self, busy: bool) {
        log::debug!("[{}] trigger {}", self.name, if busy { "disabled" } else { "enabled" });
    }

    fn set_progress(&self, state: &ProgressState) {
        log::info!("[{}] {} ... {}%", self.name, state.label, state.percent);
    }

    fn render_image(&self, image: &ImageData) -> Result<()> {
        image.decode()?;
        let filename = format!(
            "vgen_{}_{}.png",
            self.name,
            chrono::Utc::now().timestamp()
        );
        fs::write(&filename, &image.bytes)
            .map_err(|e| VgenError::RenderError(format!("failed to save image: {}", e)))?;
        log::info!("[{}] 💾 Image saved to: {}", self.name, filename);
        Ok(())
    }

    fn show_error(&self, message: &str) {
        log::error!("[{}] Error generating image: {}", self.name, message);
    }

    fn show_elapsed(&self, seconds: f64) {
        log::info!("[{}] ⏱️  Generated in {:.2}s", self.name, seconds);
    }

    fn clear(&self) {
        log::debug!("[{}] result area cleared", self.name);
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded successfully"),
        Err(_) => log::warn!("⚠️  No .env file found, using system environment variables"),
    }

    vgen::logger::init_with_config(
        vgen::logger::LoggerConfig::development().with_level(vgen::logger::LogLevel::Debug),
    )?;

    let config = ApiConfig::from_env();
    log::info!("⚙️  Configuration loaded:");
    log::info!("   Base URL: {}", config.base_url);
    log::info!("   Fast endpoint: {}", config.fast_endpoint);
    log::info!("   Quality endpoint: {}", config.quality_endpoint);
    log::info!("   Timeout: {}s", config.timeout.as_secs());

    let client = StudioClient::new(config)?;

    log::info!("🔍 Checking service reachability...");
    if client.health().await {
        log::info!("✅ Generation service is up");
    } else {
        log::warn!("⚠️  Generation service is not reachable; submissions will fail");
    }

    let fast = GenerationController::new(
        client.clone(),
        ControllerConfig::fast(),
        ConsoleSink::new("fast"),
    );
    let quality = GenerationController::new(
        client.clone(),
        ControllerConfig::quality(),
        ConsoleSink::new("quality"),
    );

    // An attached image rides along with every submission until cleared.
    if let Ok(path) = env::var("VGEN_IMAGE") {
        match ImageData::from_file(&path) {
            Ok(image) => {
                log::info!("🖼️  Attaching {} ({} bytes)", path, image.len());
                fast.attach_image(image.clone());
                quality.attach_image(image);
            }
            Err(e) => log::error!("❌ Could not read {}: {}", path, e),
        }
    }

    let prompt = env::var("VGEN_PROMPT")
        .unwrap_or_else(|_| "A serene landscape with mountains and a lake at sunset".to_string());
    log::info!("📝 Prompt: {}", prompt);

    // Both profiles run concurrently; each controller owns its own display.
    let run_timer = vgen::logger::timer("fast + quality generation");
    let (fast_outcome, quality_outcome) =
        tokio::join!(fast.submit(&prompt), quality.submit(&prompt));
    run_timer.stop();

    report("fast", &fast_outcome);
    report("quality", &quality_outcome);

    log::info!("🖼️  Showcase entries:");
    let showcase = Showcase::default();
    for item in showcase.items() {
        log::info!(
            "   #{} \"{}\" (fast {} / quality {})",
            item.id,
            item.prompt,
            item.fast_time,
            item.quality_time
        );
    }

    Ok(())
}

fn report(name: &str, outcome: &SubmitOutcome) {
    match outcome {
        SubmitOutcome::Completed(result) => log::info!(
            "✅ {} generation succeeded in {:.2}s ({} bytes)",
            name,
            result.elapsed_seconds,
            result.image.len()
        ),
        SubmitOutcome::Failed(message) => {
            log::error!("❌ {} generation failed: {}", name, message)
        }
        SubmitOutcome::RejectedEmptyInput => {
            log::warn!("⚠️  {} submission rejected: empty input", name)
        }
        SubmitOutcome::RejectedBusy => {
            log::warn!("⚠️  {} submission rejected: already in flight", name)
        }
    }
}
