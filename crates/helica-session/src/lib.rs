#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod error;
pub use error::SessionError;

/// Correlation color slot allocation.
pub mod palette;

/// Picking objects for new axis sets.
pub mod selection;

/// The event-driven session tying everything together.
pub mod session;

/// Looping time window over the animation steps.
pub mod time_window;

pub use palette::Palette;
pub use selection::{PickCompleted, Selection, SelectionState};
pub use session::{axis_set_name, Event, Response, Session};
pub use time_window::TimeWindow;
