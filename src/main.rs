use bcra_etl::adapters::TemplateParameterResolver;
use bcra_etl::config::load_input_items;
use bcra_etl::core::ParameterResolver;
use bcra_etl::domain::catalog::variable_options;
use bcra_etl::domain::node::bcra_node_description;
use bcra_etl::utils::error::ErrorSeverity;
use bcra_etl::utils::{logger, validation::Validate};
use bcra_etl::{CliConfig, EtlEngine, EtlError, LocalStorage, ReqwestTransport};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.list_variables {
        for entry in variable_options() {
            println!("{:>4}  {}", entry.value, entry.name);
        }
        return Ok(());
    }

    if cli.describe {
        println!("{}", serde_json::to_string_pretty(&bcra_node_description())?);
        return Ok(());
    }

    // 先載入設定，日誌選項可能來自設定檔
    let config = cli.resolve_run_config();
    let (verbose, json_logs) = match &config {
        Ok(c) => (cli.verbose || c.verbose_logging(), cli.log_json || c.json_logging()),
        Err(_) => (cli.verbose, cli.log_json),
    };
    if json_logs {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting bcra-etl");

    let config = match config.and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if verbose {
        tracing::debug!("Run config: {:?}", config);
    }

    let items = match &cli.input {
        Some(path) => match load_input_items(path) {
            Ok(items) => items,
            Err(e) => {
                eprintln!("❌ Failed to load input items '{}': {}", path, e);
                std::process::exit(1);
            }
        },
        None => config.input_items(),
    };

    let item_count = items.len();
    let resolver = TemplateParameterResolver::new(config.parameters.clone(), items)?;

    let transport = ReqwestTransport::new()?;
    let storage = LocalStorage::new(config.output.path.clone());
    let engine = EtlEngine::from_config(transport, storage, &config);

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No requests will be sent");
        perform_dry_run(&engine, item_count, &resolver);
        return Ok(());
    }

    match engine.run(item_count, &resolver).await {
        Ok(report) => {
            tracing::info!(
                "✅ Processed {} item(s) into {} record(s), {} error record(s)",
                item_count,
                report.records.len(),
                report.error_count
            );
            for path in &report.output_files {
                println!("📁 Output saved to: {}", path);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Batch failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

            let exit_code = match (&e, e.severity()) {
                (EtlError::NodeApiError { .. }, _) => 2,
                (_, ErrorSeverity::Critical) => 3,
                _ => 1,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn perform_dry_run(
    engine: &EtlEngine<ReqwestTransport, LocalStorage>,
    item_count: usize,
    resolver: &TemplateParameterResolver,
) {
    let processor = engine.processor();

    for index in 0..item_count {
        let request = resolver
            .resolve(index)
            .and_then(|params| processor.build_request(&params));

        match request {
            Ok(request) => {
                let query: Vec<String> = request
                    .query
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect();
                println!(
                    "[{}] {} {}?{}",
                    index,
                    request.method.as_str(),
                    request.url,
                    query.join("&")
                );
            }
            Err(e) => println!("[{}] ❌ {}", index, e),
        }
    }
}
