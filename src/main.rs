use anyhow::Context;
use clap::Parser;
use portfolio_page::core::interactions::PageEvent;
use portfolio_page::domain::model::LoadOutcome;
use portfolio_page::utils::error::ErrorSeverity;
use portfolio_page::utils::{logger, validation::Validate};
use portfolio_page::{CliConfig, LocalStorage, PageRenderer};

fn read_events(path: &str) -> anyhow::Result<Vec<PageEvent>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading page events from {}", path))?;
    let events = serde_json::from_str(&raw)
        .with_context(|| format!("parsing page events in {}", path))?;
    Ok(events)
}

fn log_outcome(collection: &str, outcome: &LoadOutcome) {
    match outcome {
        LoadOutcome::Mounted { entries } => {
            tracing::info!("✅ {}: rendered {} entries", collection, entries)
        }
        LoadOutcome::NoContainer => {
            tracing::info!("➖ {}: page has no container, skipped", collection)
        }
        LoadOutcome::Failed { reason } => {
            tracing::warn!("⚠️ {}: showing fallback message ({})", collection, reason)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting portfolio-page");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let events = match &config.events {
        Some(path) => read_events(path)?,
        None => Vec::new(),
    };

    let site = LocalStorage::new(config.site_dir.clone());
    let output = LocalStorage::new(config.output_path.clone());
    let output_filename = config.output_filename.clone();
    let interactions = config.interactions;

    let result: portfolio_page::Result<String> = async {
        let renderer = PageRenderer::new(site, output, config)
            .with_interactions(interactions)
            .load_icon_file()?;

        let mut page = renderer.render().await?;
        log_outcome("projects", &page.report.projects);
        log_outcome("skills", &page.report.skills);

        if !events.is_empty() {
            renderer.interact(&mut page.document, &events);
        }

        renderer.write_output(&output_filename, &page.document).await
    }
    .await;

    match result {
        Ok(output_path) => {
            tracing::info!("📁 Page written to: {}", output_path);
            println!("✅ Page rendered successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Render failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
