use imgui::Ui;
use serde::{Deserialize, Serialize};

use crate::core::{Channel, Location};

const PLOT_HEIGHT: f32 = 170.0;
const GRID_LINES: usize = 5;
const POINT_RADIUS: f32 = 7.0;
const GRID_COLOR: [f32; 4] = [0.0, 0.5, 0.0, 1.0];
const POINT_COLOR: [f32; 4] = [0.0, 0.5, 0.0, 1.0];
const POINT_HOVER_COLOR: [f32; 4] = [0.29, 0.75, 0.75, 1.0];

/// Fixed axis ranges of the position plot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterConfig {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            x_min: 10000.0,
            x_max: 15000.0,
            y_min: 10000.0,
            y_max: 15000.0,
        }
    }
}

impl ScatterConfig {
    /// Normalized plot coordinates, y growing upwards. `None` when off the axes.
    pub fn normalize(&self, location: &Location) -> Option<[f32; 2]> {
        let x = (location.x_coordinate - self.x_min) / (self.x_max - self.x_min);
        let y = (location.y_coordinate - self.y_min) / (self.y_max - self.y_min);
        let on_axis = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        (on_axis(x) && on_axis(y)).then(|| [x as f32, y as f32])
    }
}

/// Single-point scatter plot of the current x/y position
pub struct ScatterWidget {
    config: ScatterConfig,
}

impl ScatterWidget {
    pub fn new(config: ScatterConfig) -> Self {
        Self { config }
    }

    pub fn set_config(&mut self, config: ScatterConfig) {
        self.config = config;
    }

    pub fn render(&self, ui: &Ui, location: &Location) {
        let width = ui.content_region_avail()[0].max(80.0);
        let pos_min = ui.cursor_screen_pos();
        let pos_max = [pos_min[0] + width, pos_min[1] + PLOT_HEIGHT];
        let size = [width, PLOT_HEIGHT];

        let draw_list = ui.get_window_draw_list();
        draw_list.add_rect(pos_min, pos_max, [0.0, 0.0, 0.0, 1.0]).filled(true).build();

        for i in 0..=GRID_LINES {
            let t = i as f32 / GRID_LINES as f32;
            let x = pos_min[0] + t * size[0];
            let y = pos_min[1] + t * size[1];
            draw_list.add_line([x, pos_min[1]], [x, pos_max[1]], GRID_COLOR).build();
            draw_list.add_line([pos_min[0], y], [pos_max[0], y], GRID_COLOR).build();
        }

        if let Some([nx, ny]) = self.config.normalize(location) {
            let point = [pos_min[0] + nx * size[0], pos_max[1] - ny * size[1]];
            let mouse = ui.io().mouse_pos;
            let hovered = (mouse[0] - point[0]).hypot(mouse[1] - point[1]) <= POINT_RADIUS + 3.0;
            let color = if hovered { POINT_HOVER_COLOR } else { POINT_COLOR };
            draw_list.add_circle(point, POINT_RADIUS, color).filled(true).build();
        }

        ui.dummy(size);
        ui.text(format!("X: {}", location.x_coordinate));
        ui.same_line_with_pos(90.0);
        ui.text(format!("Y: {}", location.y_coordinate));
        ui.text_disabled(format!("Apollo Table: {}", Channel::Location.source_table()));
    }
}
