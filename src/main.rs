use clap::Parser;
use hospinav::config::toml_config::TomlConfig;
use hospinav::core::{geo, search};
use hospinav::utils::{logger, validation::Validate};
use hospinav::{
    CliConfig, ConfigProvider, Coordinates, ErrorKind, FixedLocationProvider, HttpFacilityDirectory,
    OrsRoutingProvider, PermissionState, SessionCoordinator, SessionHandle, SessionState,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting hospinav");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if config.routing_api_key.is_empty() {
        if let Ok(key) = std::env::var("ORS_API_KEY") {
            config.routing_api_key = key;
        }
    }

    let provider: Box<dyn ConfigProvider> = match &config.config_file {
        Some(path) => {
            let file_config = TomlConfig::from_file(path)?;
            if let Err(e) = file_config.validate() {
                tracing::error!("❌ Configuration validation failed: {}", e);
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
            tracing::info!("Loaded session settings from {}", path);
            Box::new(file_config)
        }
        None => {
            if let Err(e) = config.validate() {
                tracing::error!("❌ Configuration validation failed: {}", e);
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
            Box::new(config.clone())
        }
    };

    let timeout = Duration::from_secs(provider.request_timeout_secs());
    let directory = HttpFacilityDirectory::new(provider.facility_base_url(), timeout)?;

    if let Some(facility_id) = config.facility_id.as_deref() {
        return inspect_facility(&directory, facility_id, provider.device_position()).await;
    }

    if provider.routing_api_key().is_empty() {
        tracing::warn!("🔶 No directions API key configured; travel times will be unavailable");
    }
    let routing = OrsRoutingProvider::new(
        provider.routing_base_url(),
        provider.routing_api_key(),
        timeout,
    )?;
    let location = FixedLocationProvider::new(provider.device_position());

    let handle =
        SessionCoordinator::new(Arc::new(directory), Arc::new(location), Arc::new(routing))
            .mount();
    if !config.query.is_empty() {
        handle.on_search_text_changed(&config.query);
    }

    let state = handle.settled().await;
    let state = if state.nearest.is_some() && state.route.is_none() {
        route_settled(&handle, state).await
    } else {
        state
    };

    report(&state, provider.default_region());

    if config.snapshot_json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    }

    handle.shutdown().await;
    Ok(())
}

/// The route request starts after the nearest facility is known, so give it
/// its own settling window past the loading phase.
async fn route_settled(handle: &SessionHandle, fallback: SessionState) -> SessionState {
    let mut rx = handle.subscribe();
    let outcome = tokio::time::timeout(Duration::from_secs(30), async move {
        loop {
            let snapshot = rx.borrow_and_update().clone();
            let done = snapshot.nearest.is_none()
                || snapshot.route.is_some()
                || snapshot.last_error == Some(ErrorKind::RouteUnavailable);
            if done {
                return snapshot;
            }
            if rx.changed().await.is_err() {
                return snapshot;
            }
        }
    })
    .await;

    match outcome {
        Ok(state) => state,
        Err(_) => {
            tracing::warn!("🔶 Directions request did not settle in time");
            fallback
        }
    }
}

fn report(state: &SessionState, default_region: Coordinates) {
    println!("✅ Session ready: {} facilities loaded", state.facilities.len());

    let visible = search::filter(&state.facilities, &state.search_query);
    if !state.search_query.trim().is_empty() {
        println!(
            "🔍 {} of {} match \"{}\"",
            visible.len(),
            state.facilities.len(),
            state.search_query
        );
    }
    for facility in &visible {
        let city = &facility.address().city;
        if city.is_empty() {
            println!("   - {}", facility.name);
        } else {
            println!("   - {} ({})", facility.name, city);
        }
    }

    match state.current_location {
        Some(position) => {
            println!("📥 Device position: ({}, {})", position.latitude, position.longitude)
        }
        None => println!(
            "🔶 No device position; map centered on the default region ({}, {})",
            default_region.latitude, default_region.longitude
        ),
    }

    if state.permission_state == PermissionState::Denied {
        println!("🔶 Location permission denied; nearest-facility guidance is off");
    }

    if let Some(nearest) = &state.nearest {
        println!(
            "📊 Nearest facility: {} ({:.2} km away)",
            nearest.facility.name,
            nearest.distance_meters / 1000.0
        );
        match &state.route {
            Some(route) => println!(
                "📊 Estimated travel time: {} min ({} waypoints)",
                route.duration_minutes,
                route.path.len()
            ),
            None => println!("🔶 No route available"),
        }
    }

    if let Some(error) = state.last_error {
        println!("🔶 Last error: {:?}", error);
    }
}

async fn inspect_facility(
    directory: &HttpFacilityDirectory,
    facility_id: &str,
    origin: Option<Coordinates>,
) -> Result<(), Box<dyn std::error::Error>> {
    use hospinav::domain::model::weekday_label;
    use hospinav::FacilityDirectory;

    let facility = directory.fetch_by_id(facility_id).await?;

    println!("✅ {} ({})", facility.name, facility.id);
    if !facility.description.is_empty() {
        println!("   {}", facility.description);
    }
    if !facility.services.is_empty() {
        println!("   Services: {}", facility.services.join(", "));
    }
    let address = facility.address();
    if !address.street.is_empty() {
        println!(
            "   Address: {}, {} {}, {}",
            address.street, address.city, address.postal_code, address.state
        );
    }
    if !facility.contact.phone.is_empty() {
        println!("   Phone: {}", facility.contact.phone);
    }
    if !facility.contact.email.is_empty() {
        println!("   Email: {}", facility.contact.email);
    }
    if !facility.operating_hours.is_empty() {
        println!("   Operating hours:");
        for (day, hours) in facility.operating_hours.iter() {
            println!("     {:<10} {} - {}", weekday_label(day), hours.open, hours.close);
        }
    }
    if let (Some(origin), Some(position)) = (origin, facility.coordinates()) {
        println!(
            "   Distance: {:.2} km",
            geo::distance_meters(origin, position) / 1000.0
        );
    }

    Ok(())
}
