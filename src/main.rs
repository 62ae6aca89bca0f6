use anyhow::Context;
use clap::Parser;
use gpa_tracker::core::report;
use gpa_tracker::utils::error::ErrorSeverity;
use gpa_tracker::utils::{logger, validation::Validate};
use gpa_tracker::{CliConfig, GpaEngine, GpaError, Session};
use std::io::Write;

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting gpa-tracker");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match run(&config) {
        Ok(output) => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(output.as_bytes())
                .context("failed to write report to stdout")?;
            stdout.flush().context("failed to flush stdout")?;
        }
        Err(e) => {
            tracing::error!(
                "gpa-tracker failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn run(config: &CliConfig) -> Result<String, GpaError> {
    let registry = config.load_registry()?;
    tracing::info!(
        "Catalog '{}' ({}): {} subjects, {} credits",
        registry.name(),
        registry.semester(),
        registry.subjects().len(),
        registry.total_credits()
    );

    let mut engine = GpaEngine::new(registry);
    for (code, label) in config.grade_assignments()? {
        if config.strict {
            engine.set_grade_strict(&code, &label)?;
        } else {
            engine.set_grade(&code, &label)?;
        }
    }

    if config.interactive {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        Session::new(&mut engine, config.strict).run(stdin.lock(), &mut stdout)?;
    }

    tracing::info!(
        "GPA {} over {} graded subjects",
        engine.compute_gpa(),
        engine.graded_count()
    );

    let mut output = report::render(&engine, config.report_format()?)?;
    if !output.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}
