//! The update command: settings, fetcher, engine, summary.

use colored::Colorize;

use modsync_core::{RunStatus, Settings, SyncEngine, SyncOptions, SyncReport, fetcher_for};
use modsync_fs::NormalizedPath;

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Run one update and return the process exit code.
pub fn run_update(cli: &Cli) -> Result<i32> {
    let root = NormalizedPath::new(&cli.root);
    if !root.is_dir() {
        return Err(CliError::user(format!(
            "Root directory does not exist: {}",
            root
        )));
    }

    let settings = resolve_settings(cli, &root)?;
    let Some(source) = settings.source.as_deref() else {
        return Err(CliError::user(
            "No source configured. Pass --source or set `source` in modsync.toml",
        ));
    };
    tracing::debug!(source = %source, "Using source");

    let fetcher = fetcher_for(source, settings.timeout())?;
    let engine = SyncEngine::new(root, &settings, fetcher)?;
    let report = engine.run(&options_from(cli))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    Ok(report.exit_code())
}

/// Settings file (explicit or `<root>/modsync.toml`) with CLI overrides applied.
fn resolve_settings(cli: &Cli, root: &NormalizedPath) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(&NormalizedPath::new(path))?,
        None => Settings::load(root)?,
    };
    if let Some(source) = &cli.source {
        settings.source = Some(source.clone());
    }
    if let Some(secs) = cli.timeout {
        settings.timeout_secs = secs;
    }
    Ok(settings)
}

fn options_from(cli: &Cli) -> SyncOptions {
    SyncOptions {
        dry_run: cli.nomod,
        skip_revision: cli.skiprev,
        force: cli.force,
    }
}

fn print_summary(report: &SyncReport) {
    let prefix = if report.dry_run {
        format!("{} ", "[dry run]".yellow())
    } else {
        String::new()
    };

    if report.status == RunStatus::UpToDate {
        println!(
            "{}{} Up to date (revision {})",
            prefix,
            "OK".green().bold(),
            report.local_revision
        );
        return;
    }

    let updated = report.count("updated") + report.count("forced-redownload");
    let backed_up = report.count("backed-up-only");
    let unchanged = report.count("skipped-unchanged");
    let failed = report.failed_count();

    let marker = if failed > 0 {
        "FAILED".red().bold()
    } else {
        "OK".green().bold()
    };
    println!(
        "{}{} Revision {} -> {}: {} updated, {} backed up, {} unchanged, {} failed",
        prefix,
        marker,
        report.local_revision,
        report.remote_revision,
        updated,
        backed_up,
        unchanged,
        failed
    );

    for file in report.files.iter().filter(|f| f.outcome.is_failure()) {
        println!("   {} {} ({})", "!".red(), file.path.cyan(), file.outcome.label());
    }
    if backed_up > 0 && !report.dry_run {
        println!(
            "Run {} to apply the {} file(s) that were only backed up.",
            "modsync --skiprev".cyan(),
            backed_up
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["modsync"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_options_from_flags() {
        let options = options_from(&parse(&["--nomod", "--force"]));
        assert!(options.dry_run);
        assert!(options.force);
        assert!(!options.skip_revision);
        assert!(options.bypasses_revision_gate());
    }

    #[test]
    fn test_root_settings_file_is_read() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("modsync.toml"),
            "source = \"https://example.com/pack/\"\ntimeout_secs = 5\n",
        )
        .unwrap();
        let root = NormalizedPath::new(temp.path());

        let settings = resolve_settings(&parse(&[]), &root).unwrap();

        assert_eq!(settings.source.as_deref(), Some("https://example.com/pack/"));
        assert_eq!(settings.timeout_secs, 5);
    }

    #[test]
    fn test_cli_overrides_settings_file() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("modsync.toml"),
            "source = \"https://example.com/pack/\"\n",
        )
        .unwrap();
        let root = NormalizedPath::new(temp.path());

        let settings =
            resolve_settings(&parse(&["--source", "/srv/mirror", "--timeout", "9"]), &root).unwrap();

        assert_eq!(settings.source.as_deref(), Some("/srv/mirror"));
        assert_eq!(settings.timeout_secs, 9);
    }

    #[test]
    fn test_explicit_json_config() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("settings.json");
        fs::write(&config, r#"{"source": "/srv/mirror", "backup_dir": "orig"}"#).unwrap();
        let root = NormalizedPath::new(temp.path());
        let config_arg = config.to_string_lossy().to_string();

        let settings = resolve_settings(&parse(&["--config", &config_arg]), &root).unwrap();

        assert_eq!(settings.backup_dir, "orig");
        assert_eq!(settings.manifest_name, "modfilelist.txt");
    }

    #[test]
    fn test_missing_source_is_user_error() {
        let temp = TempDir::new().unwrap();
        let root_arg = temp.path().to_string_lossy().to_string();

        let err = run_update(&parse(&["--root", &root_arg])).unwrap_err();

        assert!(matches!(err, CliError::User { .. }));
    }
}
