use clap::Parser;
use small_models::app::console;
use small_models::utils::{logger, validation::Validate};
use small_models::{CliConfig, MemoryStorage, ModelRegistry, SeedConfig};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 載入種子資料（若有）
    let seed = match &config.seed {
        Some(path) => match SeedConfig::from_file(path) {
            Ok(seed) => seed,
            Err(e) => {
                eprintln!("❌ Failed to load seed file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => SeedConfig::default(),
    };

    // 初始化日誌
    let verbose = config.verbose || seed.logging.verbose;
    if config.json_logs || seed.logging.json {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting small-models CLI");
    if verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let registry = ModelRegistry::default();

    // 驗證配置
    if let Err(e) = config
        .validate()
        .and_then(|_| seed.validate_against(&registry))
    {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let storage = MemoryStorage::new();
    storage.load_records(&registry, seed.records)?;

    match console::execute(&config.command, &registry, &storage) {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
        }
        Err(e) => {
            tracing::error!("❌ Command failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    }

    Ok(())
}
