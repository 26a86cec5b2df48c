//! Loader for the movement tuning RON file.

use bevy::prelude::*;
use ron::Options;
use std::fs;
use std::path::{Path, PathBuf};

use super::config::MovementConfig;

/// Where the tuning file is read from at startup.
#[derive(Resource, Debug, Clone)]
pub struct MovementConfigPath(pub PathBuf);

impl Default for MovementConfigPath {
    fn default() -> Self {
        Self(PathBuf::from("assets/config/movement.ron"))
    }
}

/// Error type for tuning load failures.
#[derive(Debug)]
pub struct ConfigLoadError {
    pub file: String,
    pub message: String,
}

impl std::fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

/// Parse tuning from RON text. Missing fields fall back to their defaults.
pub fn parse_movement_config(source: &str, contents: &str) -> Result<MovementConfig, ConfigLoadError> {
    let config: MovementConfig = ron_options()
        .from_str(contents)
        .map_err(|e| ConfigLoadError {
            file: source.to_string(),
            message: format!("Parse error: {}", e),
        })?;

    let problems = config.validate();
    if problems.is_empty() {
        Ok(config)
    } else {
        let message = problems
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Err(ConfigLoadError {
            file: source.to_string(),
            message: format!("Invalid values: {}", message),
        })
    }
}

pub fn load_movement_config(path: &Path) -> Result<MovementConfig, ConfigLoadError> {
    let file_name = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|e| ConfigLoadError {
        file: file_name.clone(),
        message: format!("IO error: {}", e),
    })?;

    parse_movement_config(&file_name, &contents)
}

/// Replace the default tuning with the file contents, keeping defaults on failure.
pub(crate) fn apply_movement_config_file(
    path: Res<MovementConfigPath>,
    mut config: ResMut<MovementConfig>,
) {
    match load_movement_config(&path.0) {
        Ok(loaded) => {
            info!(
                "Loaded movement config from {}: jump_velocity={:.1}, gravity={:.1}",
                path.0.display(),
                loaded.initial_jump_velocity(),
                loaded.gravity()
            );
            *config = loaded;
        }
        Err(e) => {
            warn!("{}; using default movement config", e);
        }
    }
}
