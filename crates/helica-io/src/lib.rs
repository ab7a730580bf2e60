#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod error;
pub use error::IoError;

/// Export of helical axis sets to text tables.
pub mod export;

/// Marker recordings and their conversion to poses.
pub mod marker;

/// `<name>_pos.txt` / `<name>_rot.txt` pose files.
pub mod pose_txt;

/// Scene folders.
pub mod scene;

/// The `settings.txt` file.
pub mod settings;

/// Whitespace separated numeric tables.
pub mod table;

pub use export::{export_axis_set, ExportFilter, RateBounds};
pub use scene::{load_scene, Scene, SceneObject};
pub use settings::{read_settings, Settings};
