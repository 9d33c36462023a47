use imgui::{Condition, Ui, WindowFlags};

use crate::core::HudCounters;

/// Overlay with the shell's read/write counters and the playback index
pub struct Hud;

impl Hud {
    pub fn lines(counters: &HudCounters, index: usize) -> [String; 3] {
        [
            format!("Writes: {}", counters.write_count),
            format!("Reads: {}", counters.read_count),
            format!("Index: {}", index),
        ]
    }

    pub fn render(ui: &Ui, counters: &HudCounters, index: usize) {
        ui.window("HUD")
            .position([20.0, 40.0], Condition::FirstUseEver)
            .bg_alpha(0.35)
            .flags(
                WindowFlags::NO_DECORATION
                    | WindowFlags::ALWAYS_AUTO_RESIZE
                    | WindowFlags::NO_FOCUS_ON_APPEARING
                    | WindowFlags::NO_NAV,
            )
            .build(|| {
                for line in Self::lines(counters, index) {
                    ui.text_colored([0.2, 0.8, 0.2, 1.0], line);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines() {
        let counters = HudCounters { write_count: 4, read_count: 4000 };
        assert_eq!(Hud::lines(&counters, 17), ["Writes: 4", "Reads: 4000", "Index: 17"]);
    }
}
