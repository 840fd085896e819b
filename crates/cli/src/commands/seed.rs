use crate::commands::CommandResult;
use grocery_core::config::{AppConfig, LoadOptions};
use grocery_db::repositories::JsonFileCustomerRepository;
use grocery_db::{DemoSeedDataset, SeedResult};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "seed",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "seed",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let repository = JsonFileCustomerRepository::new(config.storage.path.clone());
    let result = runtime.block_on(async {
        let seed_result = DemoSeedDataset::load(&repository)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 4u8))?;

        let verification = DemoSeedDataset::verify(&repository)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), 5u8))?;

        if verification.all_present {
            Ok(seed_result)
        } else {
            let missing = verification
                .checks
                .iter()
                .filter_map(|(name, present)| (!present).then_some(*name))
                .collect::<Vec<_>>();
            Err(("seed_verification", missing_message(&missing), 5u8))
        }
    });

    match result {
        Ok(seed_result) => CommandResult::success("seed", summary(&seed_result)),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

fn summary(result: &SeedResult) -> String {
    let mut lines = vec![format!(
        "demo customers ready: {} added, {} already present",
        result.added.len(),
        result.skipped.len()
    )];
    lines.extend(
        result.added.iter().map(|record| format!("  - added {}: {}", record.id, record.name)),
    );
    lines.extend(result.skipped.iter().map(|name| format!("  - kept {name}")));
    lines.join("\n")
}

fn missing_message(missing: &[&str]) -> String {
    if missing.is_empty() {
        "Some demo customers failed to load".to_string()
    } else {
        format!("Seed verification failed for customers: {}", missing.join(", "))
    }
}
