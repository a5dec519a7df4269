use std::path::PathBuf;

use egui::{Align2, Color32, FontId, Shape, Stroke};

use crate::config::StarMapConfig;
use crate::icons::{IconFactory, MarkerIcon};
use crate::models::{load_catalog, sample_catalog, StarSystem};
use crate::spatial::SystemGrid;
use crate::ui::MapView;

const BACKGROUND: Color32 = Color32::from_rgb(5, 8, 20);
const NEIGHBOR_LINE: Color32 = Color32::from_rgb(90, 120, 200);

#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct StarMapApp {
    config: StarMapConfig,
    view: MapView,

    #[serde(skip)]
    catalog_path: Option<PathBuf>,
    #[serde(skip)]
    systems: Vec<StarSystem>,
    #[serde(skip)]
    grid: SystemGrid,
    #[serde(skip)]
    icons: Option<IconFactory>,
    #[serde(skip)]
    markers: Vec<MarkerIcon>,
    #[serde(skip)]
    selected: Option<usize>,
    #[serde(skip)]
    neighbors: Vec<u32>,
    #[serde(skip)]
    status: String,
    #[serde(skip)]
    markers_dirty: bool,
    #[serde(skip)]
    fit_pending: bool,
}

impl Default for StarMapApp {
    fn default() -> Self {
        let config = StarMapConfig::default();
        let grid = SystemGrid::new(config.cell_size);
        Self {
            config,
            view: MapView::default(),
            catalog_path: None,
            systems: Vec::new(),
            grid,
            icons: None,
            markers: Vec::new(),
            selected: None,
            neighbors: Vec::new(),
            status: String::new(),
            markers_dirty: true,
            fit_pending: true,
        }
    }
}

impl StarMapApp {
    pub fn new(cc: &eframe::CreationContext<'_>, catalog_path: Option<PathBuf>) -> Self {
        let mut app: StarMapApp = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        app.icons = Some(IconFactory::new(&cc.egui_ctx));
        app.catalog_path = catalog_path;
        app.reload();
        app
    }

    /// Reloads the catalog (file or sample) and rebuilds everything derived from it.
    fn reload(&mut self) {
        self.systems = match &self.catalog_path {
            Some(path) => match load_catalog(path) {
                Ok(systems) => {
                    self.status = format!("{} systems from {}", systems.len(), path.display());
                    systems
                }
                Err(err) => {
                    log::error!("{err}, falling back to sample catalog");
                    self.status = format!("{err}");
                    self.sample()
                }
            },
            None => {
                self.status = format!("Sample catalog (seed {})", self.config.sample_seed);
                self.sample()
            }
        };
        self.selected = None;
        self.neighbors.clear();
        self.rebuild_grid();
        if let Some(icons) = &mut self.icons {
            icons.release_cache();
        }
        self.markers_dirty = true;
        self.fit_pending = true;
    }

    fn sample(&self) -> Vec<StarSystem> {
        sample_catalog(
            self.config.sample_seed,
            self.config.sample_count,
            self.config.sample_extent,
        )
    }

    fn rebuild_grid(&mut self) {
        if self.grid.cell_size() != self.config.cell_size {
            self.grid = SystemGrid::new(self.config.cell_size);
        }
        self.grid.rebuild(&self.systems);
        self.refresh_neighbors();
    }

    fn ensure_markers(&mut self, ctx: &egui::Context) {
        if !self.markers_dirty {
            return;
        }
        let icons = self.icons.get_or_insert_with(|| IconFactory::new(ctx));
        self.markers = self
            .systems
            .iter()
            .map(|s| icons.create_icon(s.power_state, s.controlling_power.as_deref()))
            .collect();
        log::debug!(
            "Built {} markers with {} materials",
            self.markers.len(),
            icons.cached_materials()
        );
        self.markers_dirty = false;
    }

    fn select(&mut self, idx: Option<usize>) {
        self.selected = idx;
        self.refresh_neighbors();
    }

    fn refresh_neighbors(&mut self) {
        self.neighbors.clear();
        let Some(system) = self.selected.and_then(|idx| self.systems.get(idx)) else {
            return;
        };
        let selected = self.selected;
        self.neighbors = self
            .grid
            .query_within(&self.systems, system.position, self.config.neighbor_radius)
            .into_iter()
            .filter(|&idx| Some(idx as usize) != selected)
            .collect();
    }

    fn controls_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Catalog");
        ui.label(self.status.as_str());
        ui.horizontal(|ui| {
            ui.label("Sample seed");
            ui.add(egui::DragValue::new(&mut self.config.sample_seed).speed(1));
        });
        ui.add(
            egui::Slider::new(&mut self.config.sample_count, 10..=20_000)
                .logarithmic(true)
                .text("Sample size"),
        );
        if ui.button("Reload").clicked() {
            self.reload();
        }

        ui.separator();
        ui.heading("Spatial grid");
        if ui
            .add(egui::Slider::new(&mut self.config.cell_size, 5.0..=200.0).text("Cell size"))
            .changed()
        {
            self.rebuild_grid();
        }
        let (cells, indexed, max_per_cell) = self.grid.stats();
        ui.label(format!(
            "{indexed} systems in {cells} cells (max {max_per_cell} per cell)"
        ));
        if ui
            .add(
                egui::Slider::new(&mut self.config.neighbor_radius, 1.0..=300.0)
                    .text("Neighbor radius"),
            )
            .changed()
        {
            self.refresh_neighbors();
        }

        ui.separator();
        ui.heading("Markers");
        ui.add(egui::Slider::new(&mut self.config.marker_size, 2.0..=20.0).text("Marker size"));
        if let Some(icons) = &self.icons {
            ui.label(format!("{} cached materials", icons.cached_materials()));
        }

        ui.separator();
        ui.heading("Selection");
        let Some(system) = self.selected.and_then(|idx| self.systems.get(idx)) else {
            ui.label("Click a system to select it");
            return;
        };
        ui.label(system.display_name());
        ui.label(format!(
            "({:.1}, {:.1}, {:.1})",
            system.position.x, system.position.y, system.position.z
        ));
        ui.label(format!(
            "{} {}",
            system.power_state,
            system.controlling_power.as_deref().unwrap_or("")
        ));
        let position = system.position;
        if ui.button("Center on selection").clicked() {
            self.view.focus(position);
        }

        ui.label(format!("{} neighbors", self.neighbors.len()));
        egui::ScrollArea::vertical().show(ui, |ui| {
            let mut clicked = None;
            for &idx in &self.neighbors {
                let neighbor = &self.systems[idx as usize];
                let text = format!(
                    "{} ({:.1})",
                    neighbor.display_name(),
                    neighbor.position.distance(position)
                );
                if ui.selectable_label(false, text).clicked() {
                    clicked = Some(idx as usize);
                }
            }
            if clicked.is_some() {
                self.select(clicked);
            }
        });
    }

    fn map_ui(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;

        if self.fit_pending {
            self.view.fit(rect, &self.systems);
            self.fit_pending = false;
        }
        self.view.handle_input(ui, &response);

        painter.rect_filled(rect, 0.0, BACKGROUND);

        // order 0: map geometry
        let mut shapes: Vec<(i32, Shape)> = Vec::new();
        if let Some(selected) = self.selected.and_then(|idx| self.systems.get(idx)) {
            let from = self.view.to_screen(rect, selected.position);
            for &idx in &self.neighbors {
                let to = self.view.to_screen(rect, self.systems[idx as usize].position);
                let line = Shape::line_segment([from, to], Stroke::new(1.0, NEIGHBOR_LINE));
                shapes.push((0, line));
            }
        }

        let pointer = response.hover_pos();
        let mut hovered: Option<(usize, f32)> = None;
        let visible = rect.expand(self.config.marker_size * 2.0);
        for (idx, (system, marker)) in self.systems.iter().zip(&self.markers).enumerate() {
            if !system.position.is_finite() {
                continue;
            }
            let pos = self.view.to_screen(rect, system.position);
            if !visible.contains(pos) {
                continue;
            }
            let shape = marker.to_shape(pos, self.config.marker_size);
            shapes.push((marker.render_order, shape));

            if let Some(pointer) = pointer {
                let dist = pointer.distance(pos);
                if dist <= self.config.hover_radius && hovered.is_none_or(|(_, d)| dist < d) {
                    hovered = Some((idx, dist));
                }
            }
        }

        shapes.sort_by_key(|(order, _)| *order);
        painter.extend(shapes.into_iter().map(|(_, shape)| shape));

        if let Some(selected) = self.selected.and_then(|idx| self.systems.get(idx)) {
            let pos = self.view.to_screen(rect, selected.position);
            painter.circle_stroke(
                pos,
                self.config.marker_size * 1.5,
                Stroke::new(1.5, Color32::WHITE),
            );
        }

        if let Some((idx, _)) = hovered {
            let system = &self.systems[idx];
            let pos = self.view.to_screen(rect, system.position);
            painter.text(
                pos + egui::vec2(8.0, -8.0),
                Align2::LEFT_BOTTOM,
                format!("{} [{}]", system.display_name(), system.power_state),
                FontId::proportional(13.0),
                Color32::WHITE,
            );
        }

        if response.clicked() {
            self.select(hovered.map(|(idx, _)| idx));
        }
    }
}

impl eframe::App for StarMapApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_markers(ctx);

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.heading("Star map");
            ui.label(format!(
                "{} systems | zoom {:.2} | drag to pan, scroll to zoom",
                self.systems.len(),
                self.view.zoom
            ));
        });

        egui::SidePanel::left("controls").show(ctx, |ui| {
            self.controls_ui(ui);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::default())
            .show(ctx, |ui| {
                self.map_ui(ui);
            });

        if ctx.input(|i| {
            i.key_pressed(egui::Key::R) && i.modifiers.matches_logically(egui::Modifiers::CTRL)
        }) {
            self.reload();
        }
    }
}
