use imgui::Ui;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::core::{Channel, Reading};

/// Arc segments from low to high
pub const SEGMENT_COLORS: [[f32; 4]; 5] = [
    [0.0, 0.5, 0.0, 1.0],  // green
    [0.2, 0.8, 0.2, 1.0],  // limegreen
    [1.0, 1.0, 0.0, 1.0],  // yellow
    [1.0, 0.65, 0.0, 1.0], // orange
    [1.0, 0.0, 0.0, 1.0],  // red
];

const GAUGE_HEIGHT: f32 = 200.0;
const ARC_STEPS: usize = 12;
const ARC_THICKNESS: f32 = 18.0;

/// Range and units of one gauge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeConfig {
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub units: String,
}

impl GaugeConfig {
    pub fn new(label: &str, min: f64, max: f64, units: &str) -> Self {
        Self {
            label: label.to_string(),
            min,
            max,
            units: units.to_string(),
        }
    }

    pub fn temperature() -> Self {
        Self::new("Temperature", 0.0, 100.0, "Fahrenheit")
    }

    pub fn pressure() -> Self {
        Self::new("Pressure", 90.0, 105.0, "kPa")
    }

    pub fn speed() -> Self {
        Self::new("Speed", 20000.0, 40000.0, "km/h")
    }

    /// Position of `value` within the range, clamped to 0..=1
    pub fn fraction(&self, value: f64) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 || !value.is_finite() {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0) as f32
    }

    /// Text under the dial, e.g. `Speed: 27654.32 km/h`
    pub fn caption(&self, reading: Option<&Reading>) -> String {
        let value = reading.map_or("-", |r| r.text.as_str());
        format!("{}: {} {}", self.label, value, self.units)
    }
}

/// Point on the upper half circle; 0 is the left end, 1 the right end
fn arc_point(center: [f32; 2], radius: f32, fraction: f32) -> [f32; 2] {
    let angle = PI + fraction * PI;
    [center[0] + radius * angle.cos(), center[1] + radius * angle.sin()]
}

/// Speedometer-style dial for one channel
pub struct GaugeWidget {
    config: GaugeConfig,
    channel: Channel,
}

impl GaugeWidget {
    pub fn new(config: GaugeConfig, channel: Channel) -> Self {
        Self { config, channel }
    }

    pub fn set_config(&mut self, config: GaugeConfig) {
        self.config = config;
    }

    pub fn render(&self, ui: &Ui, reading: Option<&Reading>) {
        let width = ui.content_region_avail()[0].max(80.0);
        let origin = ui.cursor_screen_pos();
        let radius = (width / 2.0 - ARC_THICKNESS).min(GAUGE_HEIGHT - 50.0).max(10.0);
        let center = [origin[0] + width / 2.0, origin[1] + radius + ARC_THICKNESS];

        let draw_list = ui.get_window_draw_list();

        draw_list
            .add_rect(origin, [origin[0] + width, origin[1] + GAUGE_HEIGHT], [0.0, 0.0, 0.0, 1.0])
            .filled(true)
            .build();

        let segment = 1.0 / SEGMENT_COLORS.len() as f32;
        for (i, color) in SEGMENT_COLORS.iter().enumerate() {
            let start = i as f32 * segment;
            let points: Vec<[f32; 2]> = (0..=ARC_STEPS)
                .map(|step| arc_point(center, radius, start + segment * step as f32 / ARC_STEPS as f32))
                .collect();
            draw_list
                .add_polyline(points, *color)
                .thickness(ARC_THICKNESS)
                .build();
        }

        if let Some(reading) = reading {
            let tip = arc_point(center, radius - ARC_THICKNESS, self.config.fraction(reading.value));
            draw_list
                .add_line(center, tip, [0.9, 0.9, 0.9, 1.0])
                .thickness(3.0)
                .build();
        }
        draw_list
            .add_circle(center, 6.0, [0.9, 0.9, 0.9, 1.0])
            .filled(true)
            .build();

        let min_label = format!("{}", self.config.min);
        let max_label = format!("{}", self.config.max);
        let label_y = center[1] + 8.0;
        draw_list.add_text([center[0] - radius - ARC_THICKNESS / 2.0, label_y], [0.6, 0.6, 0.6, 1.0], &min_label);
        draw_list.add_text([center[0] + radius - ARC_THICKNESS, label_y], [0.6, 0.6, 0.6, 1.0], &max_label);

        ui.dummy([width, GAUGE_HEIGHT - 30.0]);
        ui.text_colored([0.2, 0.8, 0.2, 1.0], self.config.caption(reading));
        ui.text_disabled(format!("Apollo Table: {}", self.channel.source_table()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_clamps() {
        let speed = GaugeConfig::speed();
        assert_eq!(speed.fraction(20000.0), 0.0);
        assert_eq!(speed.fraction(30000.0), 0.5);
        assert_eq!(speed.fraction(40000.0), 1.0);
        assert_eq!(speed.fraction(50000.0), 1.0);
        assert_eq!(speed.fraction(-5.0), 0.0);
        assert_eq!(speed.fraction(f64::NAN), 0.0);
    }

    #[test]
    fn test_degenerate_range() {
        let config = GaugeConfig::new("Flat", 5.0, 5.0, "u");
        assert_eq!(config.fraction(5.0), 0.0);
    }

    #[test]
    fn test_caption() {
        let config = GaugeConfig::temperature();
        let reading = Reading::with_precision(72.3456, 4);
        assert_eq!(config.caption(Some(&reading)), "Temperature: 72.35 Fahrenheit");
        assert_eq!(config.caption(None), "Temperature: - Fahrenheit");
    }

    #[test]
    fn test_arc_endpoints() {
        let left = arc_point([100.0, 100.0], 50.0, 0.0);
        let top = arc_point([100.0, 100.0], 50.0, 0.5);
        let right = arc_point([100.0, 100.0], 50.0, 1.0);
        assert!((left[0] - 50.0).abs() < 1e-3 && (left[1] - 100.0).abs() < 1e-3);
        assert!((top[0] - 100.0).abs() < 1e-3 && (top[1] - 50.0).abs() < 1e-3);
        assert!((right[0] - 150.0).abs() < 1e-3 && (right[1] - 100.0).abs() < 1e-3);
    }
}
