//! Chart subsystem for coinlens: surface lifecycle and the data controller.

pub mod controller;
pub mod surface;
pub mod text;

pub use controller::{spawn_history_fetch, ChartController, ChartEvent};
pub use surface::{ChartSurface, SurfaceBackend, SurfaceConfig, SurfaceError};
pub use text::TextBackend;
