use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::VenueType;
use crate::domain::catalog::{DEFAULT_BUFFER, DEFAULT_SITE_HEIGHT, DEFAULT_SITE_WIDTH};
use crate::geometry::Unit;
use crate::layout::{DEFAULT_ATTEMPTS, LayoutParams, OverlapTest};

fn default_width() -> f64 {
    DEFAULT_SITE_WIDTH
}
fn default_height() -> f64 {
    DEFAULT_SITE_HEIGHT
}
fn default_buffer() -> f64 {
    DEFAULT_BUFFER
}
fn default_attempts() -> usize {
    DEFAULT_ATTEMPTS
}
fn default_inset_sampling() -> bool {
    true
}
fn default_text_height() -> f64 {
    4.0
}
fn default_schemes() -> usize {
    1
}
fn default_verbose() -> bool {
    false
}

/// Site geometry. `boundary` wins over `dxf`, which wins over the rectangle.
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub boundary: Option<Vec<(f64, f64)>>,
    #[serde(default)]
    pub dxf: Option<PathBuf>,
    /// Douglas-Peucker tolerance applied to DXF outlines, 0 disables
    #[serde(default)]
    pub simplify: f64,
    #[serde(default)]
    pub unit: Unit,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            boundary: None,
            dxf: None,
            simplify: 0.0,
            unit: Unit::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LayoutConfig {
    #[serde(default = "default_buffer")]
    pub buffer: f64,
    #[serde(default)]
    pub max_rotation: f64,
    #[serde(default = "default_attempts")]
    pub attempts: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_inset_sampling")]
    pub inset_sampling: bool,
    #[serde(default)]
    pub oriented_overlap: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            buffer: default_buffer(),
            max_rotation: 0.0,
            attempts: default_attempts(),
            seed: None,
            inset_sampling: default_inset_sampling(),
            oriented_overlap: false,
        }
    }
}

impl LayoutConfig {
    pub fn to_params(&self) -> LayoutParams {
        LayoutParams {
            buffer: self.buffer,
            max_rotation_degrees: self.max_rotation,
            attempts_per_instance: self.attempts,
            seed: self.seed,
            inset_sampling: self.inset_sampling,
            check_containment: true,
            overlap: if self.oriented_overlap {
                OverlapTest::Oriented
            } else {
                OverlapTest::BoundingBox
            },
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    /// Unit written to CAD files; defaults to the site unit
    #[serde(default)]
    pub unit: Option<Unit>,
    /// DXF label height in site units
    #[serde(default = "default_text_height")]
    pub text_height: f64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            unit: None,
            text_height: default_text_height(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub export: ExportConfig,
    /// Custom catalog; replaces the standard courts when non-empty
    #[serde(default)]
    pub venues: Vec<VenueType>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default = "default_schemes")]
    pub schemes: usize,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            layout: LayoutConfig::default(),
            export: ExportConfig::default(),
            venues: Vec::new(),
            output: None,
            schemes: default_schemes(),
            verbose: default_verbose(),
        }
    }
}

impl FileConfig {
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("courtplan.toml"));
    paths.push(PathBuf::from(".courtplan.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("courtplan").join("config.toml"));
        paths.push(config_dir.join("courtplan.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".courtplan.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Orientation;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();

        assert_eq!(config.site.width, 250.0);
        assert_eq!(config.site.height, 180.0);
        assert_eq!(config.site.unit, Unit::Meters);
        assert!(config.venues.is_empty());
        assert_eq!(config.schemes, 1);
        assert!(!config.verbose);
        assert_eq!(config.layout.to_params(), LayoutParams::default());
    }

    #[test]
    fn test_full_file() {
        let config: FileConfig = toml::from_str(
            r##"
            schemes = 4

            [site]
            boundary = [[0.0, 0.0], [120.0, 0.0], [120.0, 60.0], [0.0, 90.0]]
            unit = "ft"

            [layout]
            buffer = 2.5
            max_rotation = 15
            seed = 42
            inset_sampling = false
            oriented_overlap = true

            [export]
            unit = "mm"

            [[venues]]
            name = "tennis"
            width = 23.77
            height = 10.97
            count = 2
            orientation = "north-south"

            [[venues]]
            name = "kiosk"
            width = 4
            height = 4
            count = 6
            color = "#ff7f0e"
            "##,
        )
        .unwrap();

        assert_eq!(config.site.boundary.as_ref().unwrap().len(), 4);
        assert_eq!(config.site.unit, Unit::Feet);
        assert_eq!(config.export.unit, Some(Unit::Millimeters));
        assert_eq!(config.export.text_height, 4.0);
        assert_eq!(config.schemes, 4);

        let params = config.layout.to_params();
        assert_eq!(params.buffer, 2.5);
        assert_eq!(params.max_rotation_degrees, 15.0);
        assert_eq!(params.seed, Some(42));
        assert!(!params.inset_sampling);
        assert_eq!(params.overlap, OverlapTest::Oriented);

        assert_eq!(config.venues.len(), 2);
        assert_eq!(config.venues[0].orientation, Orientation::NorthSouth);
        assert_eq!(config.venues[1].orientation, Orientation::Free);
        assert_eq!(config.venues[1].color, "#ff7f0e");
    }

    #[test]
    fn test_default_matches_empty_file() {
        let config = FileConfig::default();
        assert_eq!(config.schemes, 1);
        assert_eq!(config.site.width, 250.0);
        assert_eq!(config.layout.to_params(), LayoutParams::default());
    }

    #[test]
    fn test_config_paths_prefer_working_directory() {
        let paths = get_config_paths();
        assert_eq!(paths[0], PathBuf::from("courtplan.toml"));
        assert_eq!(paths[1], PathBuf::from(".courtplan.toml"));
    }
}
