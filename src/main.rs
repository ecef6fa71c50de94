use chrono::{Local, NaiveDateTime, NaiveTime};
use clap::Parser;
use serde::Serialize;
use std::time::Duration;
use walk_planner::domain::itinerary::TimetableEntry;
use walk_planner::utils::error::ErrorSeverity;
use walk_planner::utils::{logger, validation::Validate};
use walk_planner::{
    CliConfig, ComposeRequest, CsvCatalogSource, GeodesicDistanceProvider, HttpEmbedder,
    Itinerary, PlannerConfig, PlannerError, RouteComposer,
};

#[derive(Serialize)]
struct PlanOutput<'a> {
    itinerary: &'a Itinerary,
    departure: NaiveDateTime,
    finishes_at: NaiveDateTime,
    timetable: Vec<TimetableEntry>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting walk-planner");
    tracing::info!("📁 Loading configuration from: {}", cli.config);

    let mut config = match PlannerConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };
    if let Some(catalog) = &cli.catalog {
        config.catalog.path = catalog.clone();
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match run(&cli, &config).await {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            tracing::error!(
                "❌ Route composition failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2, // 可重試
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

async fn run(cli: &CliConfig, config: &PlannerConfig) -> walk_planner::Result<String> {
    let start = config.start_region().parse_start(&cli.start)?;
    let (min_hours, max_hours) = config.window_hours(cli.min_hours, cli.max_hours);
    let departure = departure_time(cli.depart_at.as_deref())?;

    let places = CsvCatalogSource::new(&config.catalog.path)
        .with_region(config.catalog_region())
        .load()?;

    let embedding = &config.embedding;
    let mut embedder = HttpEmbedder::new(
        embedding.endpoint.clone(),
        Duration::from_secs(embedding.timeout_seconds.unwrap_or(30)),
    )?;
    if let Some(model) = &embedding.model {
        embedder = embedder.with_model(model.clone());
    }
    if let Some(api_key) = &embedding.api_key {
        embedder = embedder.with_api_key(api_key.clone());
    }
    if let Some(batch_size) = embedding.batch_size {
        embedder = embedder.with_batch_size(batch_size);
    }

    let composer = RouteComposer::new(embedder, GeodesicDistanceProvider::new())
        .with_walking_model(config.walking_model()?);
    let catalog = composer.index_catalog(places).await?;

    let request = ComposeRequest {
        interests: config.interests_or_default(cli.interests.as_deref()),
        min_hours,
        max_hours,
        start,
    };
    tracing::info!(
        "🎯 Interests: '{}', window {}-{} h",
        request.interests,
        min_hours,
        max_hours
    );

    let itinerary = composer.compose(&catalog, &request).await?;
    let output = PlanOutput {
        itinerary: &itinerary,
        departure,
        finishes_at: itinerary.finishes_at(departure),
        timetable: itinerary.timetable(departure),
    };

    Ok(serde_json::to_string_pretty(&output)?)
}

fn departure_time(depart_at: Option<&str>) -> walk_planner::Result<NaiveDateTime> {
    let now = Local::now().naive_local();
    match depart_at {
        None => Ok(now),
        Some(raw) => NaiveTime::parse_from_str(raw.trim(), "%H:%M")
            .map(|time| now.date().and_time(time))
            .map_err(|e| PlannerError::InvalidConfigValueError {
                field: "depart_at".to_string(),
                value: raw.to_string(),
                reason: format!("Expected HH:MM: {}", e),
            }),
    }
}
