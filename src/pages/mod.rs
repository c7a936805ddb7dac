//! The kiosk's page set — one polling loop per mutually-exclusive UI mode.
//!
//! * [`SystemMonitorPage`] — robot telemetry stats table.
//! * [`ObjectDetectorPage`] — live detection boxes + spoken announcements.
//! * [`GestureSpellerPage`] — fingerspelling reader with the
//!   [`SpellerMachine`] state machine.
//! * [`VisionQaPage`] — spoken questions answered about the current view.
//!
//! [`all_pages`] builds the static set handed to the scheduler at startup.

pub mod detector;
pub mod monitor;
pub mod speller;
pub mod vqa;

pub use detector::ObjectDetectorPage;
pub use monitor::SystemMonitorPage;
pub use speller::{GestureSpellerPage, SpellerAction, SpellerMachine, SpellerState};
pub use vqa::VisionQaPage;

use std::sync::Arc;

use crate::scheduler::Page;

/// The full static page set, created once at startup.
pub fn all_pages() -> Vec<Arc<dyn Page>> {
    vec![
        Arc::new(SystemMonitorPage),
        Arc::new(ObjectDetectorPage),
        Arc::new(GestureSpellerPage),
        Arc::new(VisionQaPage),
    ]
}
