use std::path::PathBuf;
use std::str::FromStr;

/// Window and scene settings.
///
/// # Default Values
///
/// | Field          | Default               | Environment override  |
/// |----------------|-----------------------|-----------------------|
/// | `title`        | "Deskscape"           |                       |
/// | `width`        | 1028                  | `DESKSCAPE_WIDTH`     |
/// | `height`       | 720                   | `DESKSCAPE_HEIGHT`    |
/// | `texture_dir`  | `resources/textures`  | `DESKSCAPE_TEXTURES`  |
/// | `clear_color`  | (0.43, 0.71, 0.72)    |                       |
/// | `camera_speed` | 50                    |                       |
/// | `sector_count` | 50                    | `DESKSCAPE_SECTORS`   |
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub texture_dir: PathBuf,
    pub clear_color: [f64; 3],
    pub camera_speed: f32,
    /// Subdivision of every round surface in the composites.
    pub sector_count: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Deskscape".to_string(),
            width: 1028,
            height: 720,
            texture_dir: PathBuf::from("resources/textures"),
            clear_color: [0.43, 0.71, 0.72],
            camera_speed: 50.0,
            sector_count: 50,
        }
    }
}

impl AppConfig {
    pub const MIN_SECTORS: u32 = 3;

    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by any valid `DESKSCAPE_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn texture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.texture_dir = dir.into();
        self
    }

    pub fn clear_color(mut self, r: f64, g: f64, b: f64) -> Self {
        self.clear_color = [r, g, b];
        self
    }

    pub fn camera_speed(mut self, speed: f32) -> Self {
        self.camera_speed = speed;
        self
    }

    pub fn sector_count(mut self, sectors: u32) -> Self {
        self.sector_count = sectors;
        self
    }

    /// Applies overrides from `lookup`. Values that fail to parse or are out of range are
    /// logged and skipped.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup("DESKSCAPE_TEXTURES") {
            self.texture_dir = PathBuf::from(dir);
        }
        if let Some(sectors) = parse_var(&lookup, "DESKSCAPE_SECTORS", Self::MIN_SECTORS) {
            self.sector_count = sectors;
        }
        if let Some(width) = parse_var(&lookup, "DESKSCAPE_WIDTH", 1) {
            self.width = width;
        }
        if let Some(height) = parse_var(&lookup, "DESKSCAPE_HEIGHT", 1) {
            self.height = height;
        }
        self
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, min: T) -> Option<T>
where
    T: FromStr + PartialOrd + std::fmt::Display,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) if value >= min => Some(value),
        Ok(value) => {
            log::warn!("ignoring {key}={value}: must be at least {min}");
            None
        }
        Err(_) => {
            log::warn!("ignoring {key}={raw:?}: not a number");
            None
        }
    }
}
