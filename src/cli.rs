// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::config::{AppConfig, ControlsConfig, WindowConfig};
use crate::scenes::Preset;

#[derive(Parser, Debug, Clone)]
#[command(name = "vista")]
#[command(about = "3D scene playground", long_about = None)]
pub struct Cli {
    /// Scene to open (see --list)
    #[arg(long, default_value = "basics")]
    pub scene: Preset,

    /// Window width in logical pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Window height in logical pixels
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Start with the debug panel hidden (H toggles it)
    #[arg(long = "no-debug-panel", default_value = "false")]
    pub no_debug_panel: bool,

    /// Turn off orbit camera controls
    #[arg(long = "no-orbit", default_value = "false")]
    pub no_orbit: bool,

    /// Present without waiting for vsync
    #[arg(long = "no-vsync", default_value = "false")]
    pub no_vsync: bool,

    /// Directory textures are loaded from
    #[arg(long, default_value = "assets")]
    pub assets: PathBuf,

    /// Print the available scenes and exit
    #[arg(long)]
    pub list: bool,
}

impl Cli {
    pub fn into_config(self) -> AppConfig {
        let window = WindowConfig::default()
            .with_title(&format!("vista - {}", self.scene))
            .with_size(self.width, self.height)
            .with_vsync(!self.no_vsync);
        let controls = if self.no_orbit {
            ControlsConfig::default().without_orbit()
        } else {
            ControlsConfig::default()
        };

        AppConfig::default()
            .with_preset(self.scene)
            .with_window(window)
            .with_controls(controls)
            .with_debug_panel(!self.no_debug_panel)
            .with_asset_root(self.assets)
    }
}

/// One line per preset, for `--list`
pub fn preset_listing() -> String {
    Preset::ALL
        .iter()
        .map(|p| format!("{:<12} {}", p.name(), p.description()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Cli::try_parse_from(["vista"]).unwrap().into_config();
        assert_eq!(config.preset, Preset::Basics);
        assert_eq!((config.window.width, config.window.height), (800, 600));
        assert!(config.debug_panel);
        assert!(config.controls.orbit);
    }

    #[test]
    fn test_flags_override_config() {
        let config = Cli::try_parse_from([
            "vista",
            "--scene",
            "shadows",
            "--width",
            "1280",
            "--no-debug-panel",
            "--no-orbit",
        ])
        .unwrap()
        .into_config();
        assert_eq!(config.preset, Preset::Shadows);
        assert_eq!(config.window.width, 1280);
        assert!(!config.debug_panel);
        assert!(!config.controls.orbit);
        assert_eq!(config.window.title, "vista - shadows");
    }

    #[test]
    fn test_unknown_scene_is_rejected() {
        assert!(Cli::try_parse_from(["vista", "--scene", "teapot"]).is_err());
    }

    #[test]
    fn test_listing_names_every_preset() {
        let listing = preset_listing();
        assert_eq!(listing.lines().count(), Preset::ALL.len());
        assert!(listing.contains("particles"));
    }
}
