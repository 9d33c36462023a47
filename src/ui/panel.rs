use imgui::{Condition, Ui};
use tokio::sync::watch;

use crate::core::{Channel, DisplaySample};
use crate::ui::gauge::{GaugeConfig, GaugeWidget};
use crate::ui::scatter::{ScatterConfig, ScatterWidget};

/// The four-column trip view: three gauges and the position plot.
///
/// Reads whatever the playback driver last published; it holds no playback
/// state of its own.
pub struct TripPanel {
    samples: watch::Receiver<DisplaySample>,
    temperature: GaugeWidget,
    speed: GaugeWidget,
    pressure: GaugeWidget,
    position: ScatterWidget,
}

impl TripPanel {
    pub fn new(samples: watch::Receiver<DisplaySample>) -> Self {
        Self {
            samples,
            temperature: GaugeWidget::new(GaugeConfig::temperature(), Channel::Temperature),
            speed: GaugeWidget::new(GaugeConfig::speed(), Channel::Speed),
            pressure: GaugeWidget::new(GaugeConfig::pressure(), Channel::Pressure),
            position: ScatterWidget::new(ScatterConfig::default()),
        }
    }

    pub fn configure(
        &mut self,
        temperature: GaugeConfig,
        speed: GaugeConfig,
        pressure: GaugeConfig,
        position: ScatterConfig,
    ) {
        self.temperature.set_config(temperature);
        self.speed.set_config(speed);
        self.pressure.set_config(pressure);
        self.position.set_config(position);
    }

    /// Latest sample, marking it as seen
    pub fn snapshot(&mut self) -> DisplaySample {
        self.samples.borrow_and_update().clone()
    }

    pub fn render(&mut self, ui: &Ui, opened: &mut bool) {
        let sample = self.snapshot();

        ui.window("Trip")
            .size([1100.0, 320.0], Condition::FirstUseEver)
            .position([20.0, 520.0], Condition::FirstUseEver)
            .opened(opened)
            .build(|| {
                if let Some(_table) = ui.begin_table("trip_gauges", 4) {
                    ui.table_next_column();
                    self.temperature.render(ui, sample.temperature.as_ref());
                    ui.table_next_column();
                    self.speed.render(ui, sample.speed.as_ref());
                    ui.table_next_column();
                    self.pressure.render(ui, sample.pressure.as_ref());
                    ui.table_next_column();
                    self.position.render(ui, &sample.location);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Location, TimeSeries};
    use crate::playback::{PlaybackDriver, TerminalIndex};

    #[test]
    fn test_panel_sees_published_samples() {
        let series = TimeSeries::new(
            vec![55.55555],
            vec![100.0],
            vec![31234.56789],
            vec![Location::new(11000.0, 14000.0, 0.0)],
        )
        .unwrap();
        let mut driver = PlaybackDriver::new(series.into(), TerminalIndex::default());
        let mut panel = TripPanel::new(driver.subscribe());

        assert_eq!(panel.snapshot(), DisplaySample::default());

        driver.set_playing(true);
        driver.tick();

        let sample = panel.snapshot();
        assert_eq!(sample.temperature.unwrap().text, "55.56");
        assert_eq!(sample.speed.unwrap().text, "31234.57");
        assert_eq!(sample.location, Location::new(11000.0, 14000.0, 0.0));
        assert_eq!(sample.index, 1);
    }
}
