// Super Panel Constants
// Defaults mirror what the UI assumes. Do not change without updating the frontend.

// Persistent store
pub const STORE_FILENAME: &str = "super-panel-config.json";
pub const BUTTONS_KEY: &str = "buttons";
pub const SETTINGS_KEY: &str = "settings";

// Icon assets
pub const ICONS_FOLDER: &str = "icons";
pub const MAX_ICON_BYTES: usize = 512 * 1024; // 512 KiB decoded payload cap

// Accepted upload mime types and the extension each maps to
pub const ICON_MIME_TYPES: [(&str, &str); 5] = [
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/jpg", "jpg"),
    ("image/svg+xml", "svg"),
    ("image/x-icon", "ico"),
];

// Default button template
pub const DEFAULT_BUTTON_LABEL: &str = "New Button";
pub const DEFAULT_BUTTON_EMOJI: &str = "⚡";
pub const DEFAULT_BUTTON_COLOR: &str = "#00d9ff";

// Settings defaults
pub const DEFAULT_THEME: &str = "rgb-dark";
pub const DEFAULT_METRICS_REFRESH_MS: u64 = 2000;
pub const DEFAULT_GRID_ROWS: u32 = 3;
pub const DEFAULT_GRID_COLUMNS: u32 = 4;

// Grid dimension bounds
pub const GRID_MIN: u32 = 1;
pub const GRID_MAX: u32 = 10;
