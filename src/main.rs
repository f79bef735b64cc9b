use clap::Parser;
use stock_checker::adapters::cron::{self, CronEntry};
use stock_checker::utils::{log_maintenance, logger, validation::Validate};
use stock_checker::{
    ChromiumSession, CheckerConfig, CliArgs, JsonStatusStore, NtfyNotifier, RunMode,
    StockCheckWorkflow,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let log_file = args.log_file.clone().unwrap_or_else(logger::default_log_file);
    logger::init_cli_logger(args.verbose, &log_file)?;

    let config = match CheckerConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config.display(), e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    match args.mode() {
        RunMode::SetupCron => manage_schedule(&args, &config, true).await,
        RunMode::RemoveCron => manage_schedule(&args, &config, false).await,
        RunMode::ShowStatus => {
            show_status(&config).await;
            Ok(())
        }
        RunMode::Check { headless, quiet } => run_check(config, headless, quiet).await,
    }
}

async fn run_check(config: CheckerConfig, headless: bool, quiet: bool) -> anyhow::Result<()> {
    if !quiet {
        println!("Product Stock Checker");
        println!("Checking stock for location: {}", config.product.location_code);
        println!("{}", "-".repeat(50));
    }

    log_maintenance::clean_cron_log(
        &config.storage.cron_log_file,
        config.storage.cron_log_max_bytes,
    );

    let notifier = NtfyNotifier::new(&config.notification)?;
    let store = JsonStatusStore::new(config.storage.status_file.clone());

    let session =
        match ChromiumSession::launch(&config.browser, headless || config.browser.headless).await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!("✗ {}", e);
                tracing::error!("💡 {}", e.recovery_suggestion());
                std::process::exit(1);
            }
        };

    let workflow = StockCheckWorkflow::new(config, notifier, store);
    let result = workflow.run(session).await;

    if !result.is_success() {
        if !quiet {
            eprintln!("\n❌ Stock check failed due to errors");
            if let Some(failure) = &result.failure {
                eprintln!("   {}", failure);
            }
        }
        std::process::exit(1);
    }

    if !quiet {
        println!("\n✅ Stock check completed: {}", result.status);
    }
    Ok(())
}

async fn show_status(config: &CheckerConfig) {
    let store = JsonStatusStore::new(config.storage.status_file.clone());
    match store.read_record().await {
        Ok(Some(record)) => {
            println!("📊 Current Stock Status:");
            println!("  Status: {}", record.status);
            println!("  Pincode: {}", record.pincode);
            println!("  Last Checked: {}", record.timestamp.to_rfc3339());
            println!("  Product URL: {}", record.product_url);
        }
        Ok(None) => println!("❌ No status file found. Run a stock check first."),
        Err(e) => println!("❌ Error reading status: {}", e),
    }
}

async fn manage_schedule(args: &CliArgs, config: &CheckerConfig, install: bool) -> anyhow::Result<()> {
    let entry = CronEntry {
        schedule: config.schedule.cron_expression.clone(),
        working_dir: std::env::current_dir()?,
        executable: std::env::current_exe()?,
        config: cron::absolute(&args.config)?,
        log_file: cron::absolute(&config.storage.cron_log_file)?,
    };

    let outcome = if install {
        cron::install(&entry).await
    } else {
        cron::remove(&entry).await
    };

    match outcome {
        Ok(true) if install => {
            println!("✅ Cron job added successfully!");
            println!("📅 Schedule: {}", entry.schedule);
            println!("📁 Logs will be saved in: {}", entry.log_file.display());
        }
        Ok(true) => println!("✅ Cron job removed successfully!"),
        Ok(false) if install => println!("✓ Cron job already exists"),
        Ok(false) => println!("ℹ️ No matching cron job found"),
        Err(e) => {
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }
    Ok(())
}
