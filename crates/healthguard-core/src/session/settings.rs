use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use crate::error::Result;
use crate::storage::{Config, ReminderConfig};

/// Where the controller reads (and writes back) reminder settings.
///
/// `load` is called on every use, so external edits are picked up without
/// any caching. It never fails: missing or invalid values become defaults.
pub trait SettingsSource {
    fn load(&self) -> ReminderConfig;

    fn save(&self, config: &ReminderConfig) -> Result<()>;
}

/// Settings kept in memory, shared with whoever holds the other handle.
impl SettingsSource for RefCell<ReminderConfig> {
    fn load(&self) -> ReminderConfig {
        self.borrow().validated()
    }

    fn save(&self, config: &ReminderConfig) -> Result<()> {
        *self.borrow_mut() = *config;
        Ok(())
    }
}

impl<T: SettingsSource + ?Sized> SettingsSource for Rc<T> {
    fn load(&self) -> ReminderConfig {
        (**self).load()
    }

    fn save(&self, config: &ReminderConfig) -> Result<()> {
        (**self).save(config)
    }
}

/// The `[reminder]` table of a TOML config file, re-read on every load.
#[derive(Debug, Clone)]
pub struct FileSettings {
    path: PathBuf,
}

impl FileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Settings at the default config location.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(Config::path()?))
    }
}

impl SettingsSource for FileSettings {
    fn load(&self) -> ReminderConfig {
        match Config::load_from(&self.path) {
            Ok(cfg) => cfg.reminder.validated(),
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "using default reminder settings");
                ReminderConfig::default()
            }
        }
    }

    fn save(&self, config: &ReminderConfig) -> Result<()> {
        let mut cfg = Config::load_from(&self.path).unwrap_or_default();
        cfg.reminder = *config;
        cfg.save_to(&self.path)?;
        tracing::info!(path = %self.path.display(), "saved reminder settings");
        Ok(())
    }
}
