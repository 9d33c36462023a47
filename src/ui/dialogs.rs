use imgui::{Condition, Ui};
use rfd::FileDialog;
use std::path::PathBuf;

use crate::core::JourneyInformation;
use crate::playback::PlaybackSummary;

/// File dialog helper for telemetry datasets
pub struct FileDialogs;

impl FileDialogs {
    /// Open a file dialog for selecting a recorded journey
    pub fn open_telemetry_file() -> Option<PathBuf> {
        FileDialog::new()
            .add_filter("Telemetry Files", &["json", "csv"])
            .add_filter("All Files", &["*"])
            .set_title("Open Telemetry Recording")
            .pick_file()
    }
}

/// End-of-journey summary, shown while the driver reports it visible
pub struct SummaryDialog;

impl SummaryDialog {
    /// Summary rows: journey entries first, then playback statistics
    pub fn rows(
        journey: &JourneyInformation,
        summary: Option<&PlaybackSummary>,
    ) -> Vec<(String, String)> {
        let mut rows = journey.entries();
        if let Some(summary) = summary {
            rows.push(("Samples played".to_string(), summary.samples_played.to_string()));
            rows.push(("Samples recorded".to_string(), summary.dataset_len.to_string()));
            rows.push((
                "Replay time".to_string(),
                format!("{:.1}s", summary.elapsed().num_milliseconds() as f64 / 1000.0),
            ));
            rows.push((
                "Finished".to_string(),
                summary.finished_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            ));
        }
        rows
    }

    /// Draw the dialog; returns true on the frame the user closes it
    pub fn render(
        ui: &Ui,
        journey: &JourneyInformation,
        summary: Option<&PlaybackSummary>,
    ) -> bool {
        let mut closed = false;
        ui.window("Journey Summary")
            .size([420.0, 320.0], Condition::FirstUseEver)
            .position_pivot([0.5, 0.5])
            .focused(true)
            .collapsible(false)
            .build(|| {
                ui.text("Playback complete");
                ui.separator();

                if journey.is_empty() {
                    ui.text_disabled("No journey information");
                }
                for (key, value) in Self::rows(journey, summary) {
                    ui.text_colored([0.7, 0.7, 0.7, 1.0], format!("{}:", key));
                    ui.same_line_with_pos(160.0);
                    ui.text(value);
                }

                ui.separator();
                if ui.button("Close") {
                    closed = true;
                }
            });

        closed
    }
}
