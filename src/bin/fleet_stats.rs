//! Loads one page of the vehicle collection and logs the dashboard figures for it.
//!
//! Usage: `fleet_stats [search] [page]`. The token is read from `APP_TOKEN`.

use std::env;

use dotenvy::dotenv;

use pushkind_fleet::models::config::ConsoleConfig;
use pushkind_fleet::repository::HttpVehicleRepository;
use pushkind_fleet::services::list_controller::{FetchOutcome, VehicleListController};

#[tokio::main]
async fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match ConsoleConfig::load() {
        Ok(config) => config,
        Err(err) => {
            log::error!("Error loading console config: {}", err);
            std::process::exit(1);
        }
    };

    let Some(credential) = config.credential() else {
        log::error!("No token configured; set APP_TOKEN");
        std::process::exit(1);
    };

    let repo = match HttpVehicleRepository::from_config(&config) {
        Ok(repo) => repo,
        Err(err) => {
            log::error!("Error creating vehicle repository: {}", err);
            std::process::exit(1);
        }
    };

    let mut args = env::args().skip(1);
    let search = args.next().unwrap_or_default();
    let page = args.next().and_then(|raw| raw.parse::<usize>().ok());

    let controller = VehicleListController::new(repo).with_credential(credential);

    if let Err(err) = controller.search(&search).await {
        log::error!("Error loading vehicles: {}", err);
        std::process::exit(1);
    }

    if let Some(page) = page.filter(|&page| page != 1) {
        match controller.go_to_page(page).await {
            Ok(FetchOutcome::OutOfRange) => {
                log::warn!(
                    "Page {} is out of range, showing page 1 of {}",
                    page,
                    controller.page_count()
                );
            }
            Ok(_) => {}
            Err(err) => {
                log::error!("Error loading page {}: {}", page, err);
                std::process::exit(1);
            }
        }
    }

    let view = controller.view();
    if view.is_empty() {
        log::info!("No vehicles match {:?}", view.search);
        return;
    }

    let stats = view.projections.summary;
    log::info!(
        "Page {}/{}: {} of {} vehicles, {} brands, {} active, {} variants, {} transmissions",
        view.page,
        view.page_count,
        stats.total_vehicles,
        view.total_count,
        stats.total_brands,
        stats.active_vehicles,
        stats.variants,
        stats.transmissions
    );
    for (status, count) in view.projections.by_status.entries() {
        log::info!("  status {status}: {count}");
    }
    for entry in &view.projections.by_type {
        log::info!("  type {}: {}", entry.category, entry.count);
    }
    for point in &view.projections.time_series {
        log::info!("  added {}: {}", point.date, point.count);
    }
}
