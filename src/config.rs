//! Runtime configuration.
//!
//! A [`Config`] is loaded once (usually from YAML), wrapped in an `Arc` and
//! handed to every work order. Nothing in it changes after load.
//!
//! ```yaml
//! data_dir: /srv/twois/data
//! spreadsheet_template: /srv/twois/TWOIS_template.xlsx
//! default_site: VB
//! default_special: S
//! default_type: OTH
//! default_building: 1768
//! default_room: 6
//! primary_user:
//!   name: Brian Cobb
//!   email: brian.cobb@example.com
//!   group: SA
//!   technician: true
//!   bems: 1234567
//! people: []
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::{Error, Result};
use crate::model::{Group, Person, Site, Special, WorkOrderType};

/// Valid building numbers.
pub const BUILDING_RANGE: std::ops::RangeInclusive<u32> = 10..=99999;
/// Valid room numbers.
pub const ROOM_RANGE: std::ops::RangeInclusive<u32> = 1..=999;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root holding `in_progress/`, `complete/` and `templates/`
    pub data_dir: PathBuf,
    /// Spreadsheet used for brand new work orders; built-in sheet if unset
    pub spreadsheet_template: Option<PathBuf>,
    /// Site used when a value is missing or unrecognized
    pub default_site: Site,
    /// Special used when a value is missing or unrecognized
    pub default_special: Special,
    /// Type used when a value is missing or unrecognized
    pub default_type: WorkOrderType,
    /// Building used when a value is missing or out of range
    pub default_building: u32,
    /// Room used when a value is missing or out of range
    pub default_room: u32,
    /// The person running the tool; default creator of new records
    pub primary_user: Person,
    /// Everyone else on the roster
    pub people: Vec<Person>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            spreadsheet_template: None,
            default_site: Site::VB,
            default_special: Special::S,
            default_type: WorkOrderType::OTH,
            default_building: 1768,
            default_room: 6,
            primary_user: Person::new("Primary User", "", Group::SA, true, None),
            people: Vec::new(),
        }
    }
}

impl Config {
    /// Load and validate a YAML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        debug!(path = %path.display(), data_dir = %config.data_dir.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse and validate YAML text. Missing keys take their defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Config = serde_saphyr::from_str(text)
            .map_err(|e| Error::Config(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_saphyr::to_string(self)
            .map_err(|e| Error::Config(format!("Failed to serialize configuration: {}", e)))
    }

    /// Same configuration rooted at another data directory.
    pub fn with_data_dir<P: Into<PathBuf>>(mut self, data_dir: P) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Reject defaults that the bounds checks would themselves refuse.
    pub fn validate(&self) -> Result<()> {
        if !BUILDING_RANGE.contains(&self.default_building) {
            return Err(Error::Config(format!(
                "default_building {} outside {:?}",
                self.default_building, BUILDING_RANGE
            )));
        }
        if !ROOM_RANGE.contains(&self.default_room) {
            return Err(Error::Config(format!(
                "default_room {} outside {:?}",
                self.default_room, ROOM_RANGE
            )));
        }
        Ok(())
    }

    /// Directory of records that are pending or approved but not complete.
    pub fn in_progress_dir(&self) -> PathBuf {
        self.data_dir.join("in_progress")
    }

    /// Root of the dated completion tree.
    pub fn complete_dir(&self) -> PathBuf {
        self.data_dir.join("complete")
    }

    /// Directory of reusable record templates.
    pub fn template_dir(&self) -> PathBuf {
        self.data_dir.join("templates")
    }

    /// Create the three data directories.
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [self.in_progress_dir(), self.complete_dir(), self.template_dir()] {
            fs::create_dir_all(&dir)?;
        }
        Ok(())
    }

    /// Primary user followed by the rest of the roster.
    pub fn everyone(&self) -> impl Iterator<Item = &Person> {
        std::iter::once(&self.primary_user).chain(self.people.iter())
    }
}
