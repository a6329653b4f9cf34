//! Settings file.
//!
//! Settings live in `settings.toml` in the platform config directory:
//! - macOS: ~/Library/Application Support/org.qa-dashboard.tdv/
//! - Windows: %APPDATA%/qa-dashboard/tdv/config/
//! - Linux: ~/.config/tdv/
//!
//! Command-line flags override anything set here.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use tdv_export::{HeaderColor, PdfStyle};

const APP_QUALIFIER: &str = "org";
const APP_ORG: &str = "qa-dashboard";
const APP_NAME: &str = "tdv";
const CONFIG_FILENAME: &str = "settings.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub view: ViewSettings,
    pub export: ExportSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewSettings {
    /// Rows per page for every screen; unset keeps each screen's own size.
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportSettings {
    pub directory: Option<PathBuf>,
    /// Forces the filename date suffix on or off for every screen.
    pub date_suffix: Option<bool>,
    /// PDF table header colour as `#RRGGBB`.
    pub header_color: Option<String>,
}

impl Settings {
    pub fn parse(content: &str) -> Result<Self> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.view.page_size == Some(0) {
            bail!("view.page_size must be greater than zero");
        }
        self.pdf_style()?;
        Ok(())
    }

    pub fn pdf_style(&self) -> Result<PdfStyle> {
        let mut style = PdfStyle::default();
        if let Some(color) = &self.export.header_color {
            style.header_color = color
                .parse::<HeaderColor>()
                .with_context(|| format!("export.header_color {color:?}"))?;
        }
        Ok(style)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Path of the default settings file, if the platform has a config directory.
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Load settings from an explicit path, or from the default location.
///
/// An explicit file must exist and parse. A missing default file gives the
/// defaults; an unreadable one is reported and ignored.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        let content = fs::read_to_string(path)
            .with_context(|| format!("read settings file {}", path.display()))?;
        let settings = Settings::parse(&content)
            .with_context(|| format!("parse settings file {}", path.display()))?;
        info!(path = %path.display(), "loaded settings");
        return Ok(settings);
    }

    let Some(path) = settings_path() else {
        warn!("could not determine settings path, using defaults");
        return Ok(Settings::default());
    };
    Ok(load_default(&path))
}

fn load_default(path: &Path) -> Settings {
    match fs::read_to_string(path) {
        Ok(content) => match Settings::parse(&content) {
            Ok(settings) => {
                info!(path = %path.display(), "loaded settings");
                settings
            }
            Err(error) => {
                warn!(path = %path.display(), error = %format!("{error:#}"), "ignoring invalid settings file");
                Settings::default()
            }
        },
        Err(error) if error.kind() == ErrorKind::NotFound => Settings::default(),
        Err(error) => {
            warn!(path = %path.display(), %error, "could not read settings file, using defaults");
            Settings::default()
        }
    }
}
