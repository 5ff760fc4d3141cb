// Registries over the persistent store
//
// The `Panel` aggregate owns the durable pieces (store + icon library) and
// hands out short-lived registries borrowing them. `Panel` lives behind one
// mutex in Tauri managed state, which serializes every mutation: there is
// never more than one in-flight write, so a delete and a save to the same
// id cannot interleave.

pub mod buttons;
pub mod settings;

pub use buttons::{ButtonAction, ButtonConfig, ButtonRegistry, IconSpec, StoredIcon, SystemAction};
pub use settings::{GridDimensions, PanelSettings, SettingsRegistry};

use std::path::Path;

use crate::constants::{ICONS_FOLDER, STORE_FILENAME};
use crate::icons::IconLibrary;
use crate::store::PersistentStore;

/// Milliseconds since the Unix epoch, the `updatedAt` clock.
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub struct Panel {
    store: PersistentStore,
    icons: IconLibrary,
}

impl Panel {
    /// Open the panel state rooted at the app config and data directories.
    /// The store file is read eagerly; the icon directory is created lazily
    /// on first upload.
    pub fn open(config_dir: &Path, data_dir: &Path) -> Self {
        Self {
            store: PersistentStore::open(&config_dir.join(STORE_FILENAME)),
            icons: IconLibrary::new(data_dir.join(ICONS_FOLDER)),
        }
    }

    pub fn buttons(&mut self) -> ButtonRegistry<'_> {
        ButtonRegistry::new(&mut self.store, &self.icons)
    }

    pub fn settings(&mut self) -> SettingsRegistry<'_> {
        SettingsRegistry::new(&mut self.store)
    }

    pub fn icons(&self) -> &IconLibrary {
        &self.icons
    }
}
