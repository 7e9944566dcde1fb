use std::fs;
use std::path::PathBuf;
use directories::ProjectDirs;
use serde::{Serialize, Deserialize};
use tracing::{info, warn};

const SETTINGS_FILE: &str = "simulation.toml";

// =============================================================================
// Simulation Configuration
// =============================================================================

/// Constants driving collision response and integration. Built once at
/// startup and passed by reference into the simulation; nothing mutates it
/// while the frame loop runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSettings {
    /// Contact radius for ball-ball and ball-dozer tests.
    pub collision_radius: f32,
    /// Contact radius of the goal cylinders.
    pub score_collision_radius: f32,
    /// Downward z displacement applied to airborne balls each frame.
    pub gravity: f32,
    /// Reserved; not applied anywhere yet.
    pub air_damping: f32,
    /// Multiplicative speed decay per frame, must stay in (0, 1).
    pub friction: f32,
    /// Multiplier on the dozer-to-ball velocity response.
    pub push_scale: f32,
    /// Arena half-extent along x; beyond this velocity.x is reflected inward.
    pub arena_half_x: f32,
    /// Arena half-extent along y.
    pub arena_half_y: f32,
    /// Speed set on a dozer while a drive flag is held.
    pub drive_speed: f32,
    /// Heading increment per active turn flag per frame.
    pub turn_step: f32,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            collision_radius: 0.15,
            score_collision_radius: 0.4,
            gravity: 0.0098,
            air_damping: -1.0,
            friction: 0.9,
            push_scale: 100.0,
            arena_half_x: 2.86,
            arena_half_y: 1.9,
            drive_speed: 0.01,
            turn_step: 0.01,
        }
    }
}

fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "dozerball")
        .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
}

/// Load settings from the platform config directory, falling back to
/// defaults when the file is absent or unreadable.
pub fn load_settings() -> SimSettings {
    let Some(path) = settings_path() else {
        warn!("No config directory available, using default settings");
        return SimSettings::default();
    };

    match fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(settings) => {
                info!("Loaded simulation settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}, using defaults", path, e);
                SimSettings::default()
            }
        },
        Err(_) => {
            info!("No settings file at {:?}, using defaults", path);
            SimSettings::default()
        }
    }
}

/// Persist settings as TOML in the platform config directory.
pub fn save_settings(settings: &SimSettings) -> std::io::Result<()> {
    let Some(path) = settings_path() else {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no config directory available",
        ));
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(settings)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
    fs::write(&path, contents)?;
    info!("Saved simulation settings to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let settings = SimSettings::default();
        assert_eq!(settings.collision_radius, 0.15);
        assert_eq!(settings.score_collision_radius, 0.4);
        assert_eq!(settings.gravity, 0.0098);
        assert_eq!(settings.friction, 0.9);
        assert!(settings.friction > 0.0 && settings.friction < 1.0);
        assert_eq!(settings.push_scale, 100.0);
        assert_eq!(settings.arena_half_x, 2.86);
        assert_eq!(settings.arena_half_y, 1.9);
    }

    #[test]
    fn test_toml_round_trip() {
        let settings = SimSettings::default();
        let serialized = toml::to_string_pretty(&settings).unwrap();
        let restored: SimSettings = toml::from_str(&serialized).unwrap();
        assert_eq!(restored.collision_radius, settings.collision_radius);
        assert_eq!(restored.gravity, settings.gravity);
        assert_eq!(restored.push_scale, settings.push_scale);
        assert_eq!(restored.turn_step, settings.turn_step);
    }
}
