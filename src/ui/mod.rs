pub mod dialogs;
pub mod gauge;
pub mod hud;
pub mod panel;
pub mod scatter;

pub use dialogs::{FileDialogs, SummaryDialog};
pub use gauge::{GaugeConfig, GaugeWidget};
pub use hud::Hud;
pub use panel::TripPanel;
pub use scatter::{ScatterConfig, ScatterWidget};
