// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Loading order:
//! 1. TOML file (base values, defaults when no file exists)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{
    validate_config, ConfigError, ConfigResult, FailurePolicy, NeuromorphConfig, SomaRadiusMode,
};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file searched for in the working directory
pub const CONFIG_FILE_NAME: &str = "neuromorph.toml";

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "NEUROMORPH_CONFIG_PATH";

/// Find the configuration file
///
/// Search order:
/// 1. `NEUROMORPH_CONFIG_PATH` environment variable (the file must exist)
/// 2. Current working directory: `./neuromorph.toml`
///
/// Returns `Ok(None)` when no file is found and none was requested.
pub fn find_config_file() -> ConfigResult<Option<PathBuf>> {
    if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(Some(path));
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by {} not found: {}",
            CONFIG_PATH_ENV,
            path.display()
        )));
    }

    if let Ok(cwd) = env::current_dir() {
        let path = cwd.join(CONFIG_FILE_NAME);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    Ok(None)
}

/// Load configuration
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for one and fall
///   back to defaults.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if an explicit config file is missing, contains invalid TOML, or the final
/// configuration fails validation
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<NeuromorphConfig> {
    let config_file = match config_path {
        Some(path) if !path.exists() => {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file()?,
    };

    let mut config = match config_file {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            toml::from_str(&content)?
        }
        None => NeuromorphConfig::default(),
    };

    apply_environment_overrides(&mut config);

    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    validate_config(&config)?;
    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `NEUROMORPH_RECENTER` -> `conversion.recenter`
/// - `NEUROMORPH_WRITE_BINARY` -> `conversion.write_binary`
/// - `NEUROMORPH_SOMA_RADIUS` -> `conversion.soma_radius`
/// - `NEUROMORPH_SOMA_RADIUS_MODE` -> `conversion.soma_radius_mode`
/// - `NEUROMORPH_ON_ERROR` -> `batch.on_error`
/// - `NEUROMORPH_LOG_LEVEL` -> `logging.level`
///
/// Values that do not parse are ignored.
pub fn apply_environment_overrides(config: &mut NeuromorphConfig) {
    let overrides: HashMap<String, String> = [
        ("recenter", "NEUROMORPH_RECENTER"),
        ("write_binary", "NEUROMORPH_WRITE_BINARY"),
        ("soma_radius", "NEUROMORPH_SOMA_RADIUS"),
        ("soma_radius_mode", "NEUROMORPH_SOMA_RADIUS_MODE"),
        ("on_error", "NEUROMORPH_ON_ERROR"),
        ("log_level", "NEUROMORPH_LOG_LEVEL"),
    ]
    .into_iter()
    .filter_map(|(key, var)| env::var(var).ok().map(|value| (key.to_string(), value)))
    .collect();

    apply_cli_overrides(config, &overrides);
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"recenter": "true", "soma_radius": "7.5"}`)
pub fn apply_cli_overrides(config: &mut NeuromorphConfig, cli_args: &HashMap<String, String>) {
    // Conversion settings
    if let Some(value) = cli_args.get("recenter").and_then(|v| parse_bool(v)) {
        config.conversion.recenter = value;
    }
    if let Some(value) = cli_args.get("write_binary").and_then(|v| parse_bool(v)) {
        config.conversion.write_binary = value;
    }
    if let Some(value) = cli_args.get("soma_radius") {
        if let Ok(radius) = value.parse::<f32>() {
            config.conversion.soma_radius = radius;
        }
    }
    if let Some(value) = cli_args.get("soma_radius_mode") {
        match value.to_lowercase().as_str() {
            "fixed" => config.conversion.soma_radius_mode = SomaRadiusMode::Fixed,
            "mean_distance" => config.conversion.soma_radius_mode = SomaRadiusMode::MeanDistance,
            _ => {}
        }
    }
    if let Some(value) = cli_args.get("include_soma_center").and_then(|v| parse_bool(v)) {
        config.conversion.include_soma_center = value;
    }

    // Batch settings
    if let Some(value) = cli_args.get("on_error") {
        if let Ok(policy) = value.parse::<FailurePolicy>() {
            config.batch.on_error = policy;
        }
    }

    // Logging settings
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = cli_args.get("log_skipped_sections").and_then(|v| parse_bool(v)) {
        config.logging.log_skipped_sections = value;
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ALL_VARS: [&str; 7] = [
        CONFIG_PATH_ENV,
        "NEUROMORPH_RECENTER",
        "NEUROMORPH_WRITE_BINARY",
        "NEUROMORPH_SOMA_RADIUS",
        "NEUROMORPH_SOMA_RADIUS_MODE",
        "NEUROMORPH_ON_ERROR",
        "NEUROMORPH_LOG_LEVEL",
    ];

    fn clear_env() {
        for var in ALL_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_env();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom.toml");
        File::create(&config_path).unwrap();

        env::set_var(CONFIG_PATH_ENV, config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var(CONFIG_PATH_ENV);

        assert_eq!(result.unwrap(), Some(config_path));
    }

    #[test]
    fn test_missing_env_config_file_is_an_error() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_env();
        env::set_var(CONFIG_PATH_ENV, "/definitely/not/here/neuromorph.toml");
        let result = find_config_file();
        env::remove_var(CONFIG_PATH_ENV);
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_minimal_config() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_env();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[conversion]").unwrap();
        writeln!(file, "recenter = true").unwrap();
        writeln!(file, "soma_radius_mode = \"mean_distance\"").unwrap();
        writeln!(file, "[batch]").unwrap();
        writeln!(file, "on_error = \"abort\"").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();

        assert!(config.conversion.recenter);
        assert!(config.conversion.write_binary);
        assert_eq!(config.conversion.soma_radius_mode, SomaRadiusMode::MeanDistance);
        assert_eq!(config.batch.on_error, FailurePolicy::Abort);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_env();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[conversion\nrecenter = ").unwrap();
        assert!(matches!(
            load_config(Some(&config_path), None),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_env();
        let mut config = NeuromorphConfig::default();

        env::set_var("NEUROMORPH_RECENTER", "yes");
        env::set_var("NEUROMORPH_SOMA_RADIUS", "7.5");
        env::set_var("NEUROMORPH_ON_ERROR", "abort");

        apply_environment_overrides(&mut config);
        clear_env();

        assert!(config.conversion.recenter);
        assert_eq!(config.conversion.soma_radius, 7.5);
        assert_eq!(config.batch.on_error, FailurePolicy::Abort);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = NeuromorphConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("write_binary".to_string(), "false".to_string());
        cli_args.insert("log_skipped_sections".to_string(), "1".to_string());
        cli_args.insert("soma_radius".to_string(), "not-a-number".to_string());

        apply_cli_overrides(&mut config, &cli_args);

        assert!(!config.conversion.write_binary);
        assert!(config.logging.log_skipped_sections);
        assert_eq!(config.conversion.soma_radius, 5.0);
    }

    #[test]
    fn test_override_precedence() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_env();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[conversion]").unwrap();
        writeln!(file, "soma_radius = 3.0").unwrap();
        writeln!(file, "[logging]").unwrap();
        writeln!(file, "level = \"warn\"").unwrap();

        env::set_var("NEUROMORPH_SOMA_RADIUS", "4.0");
        env::set_var("NEUROMORPH_LOG_LEVEL", "debug");

        let mut cli_args = HashMap::new();
        cli_args.insert("soma_radius".to_string(), "6.0".to_string());

        let config = load_config(Some(&config_path), Some(&cli_args)).unwrap();
        clear_env();

        // CLI wins for radius, env wins for level (no CLI override)
        assert_eq!(config.conversion.soma_radius, 6.0);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_env();
        let mut cli_args = HashMap::new();
        cli_args.insert("soma_radius".to_string(), "-1".to_string());
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).unwrap();

        assert!(matches!(
            load_config(Some(&config_path), Some(&cli_args)),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
