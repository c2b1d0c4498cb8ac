//! Presentation-ready projections of the state tree. Screens read these
//! instead of poking at slices directly.

pub mod navigation_view_model;
pub mod settings_view_model;

pub use navigation_view_model::{NavigationMetrics, NavigationViewModel};
pub use settings_view_model::{ConnectionChip, SettingsMetrics, SettingsViewModel};
