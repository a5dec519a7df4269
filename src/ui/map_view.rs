//! 星图视图状态
//!
//! 俯视投影：地图坐标 (x, z) 映射到屏幕平面，y 轴被忽略。

use egui::{Pos2, Rect, Response, Ui, Vec2};
use serde::{Deserialize, Serialize};

use crate::models::{Point3, StarSystem};

const MIN_ZOOM: f32 = 0.01;
const MAX_ZOOM: f32 = 100.0;

/// 平移和缩放状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapView {
    /// 视口中心对应的地图坐标 (x, z)
    pub center: Pos2,
    /// 每个地图单位对应的屏幕点数
    pub zoom: f32,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: Pos2::ZERO,
            zoom: 0.5,
        }
    }
}

impl MapView {
    /// 将地图坐标转换为屏幕坐标
    pub fn to_screen(&self, rect: Rect, point: Point3) -> Pos2 {
        rect.center() + (Vec2::new(point.x, point.z) - self.center.to_vec2()) * self.zoom
    }

    /// 将屏幕坐标转换为地图平面坐标 (x, z)
    pub fn to_map(&self, rect: Rect, screen_pos: Pos2) -> Pos2 {
        self.center + (screen_pos - rect.center()) / self.zoom
    }

    /// 按屏幕位移平移视图
    pub fn pan(&mut self, screen_delta: Vec2) {
        self.center -= screen_delta / self.zoom;
    }

    /// 以屏幕上的某点为锚点缩放，锚点下的地图位置保持不变
    pub fn zoom_at(&mut self, rect: Rect, anchor: Pos2, factor: f32) {
        let before = self.to_map(rect, anchor);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let after = self.to_map(rect, anchor);
        self.center += before - after;
    }

    /// 将视图中心移动到某个星系
    pub fn focus(&mut self, point: Point3) {
        if point.is_finite() {
            self.center = Pos2::new(point.x, point.z);
        }
    }

    /// 调整视图使所有星系可见
    pub fn fit(&mut self, rect: Rect, systems: &[StarSystem]) {
        let mut bounds = Rect::NOTHING;
        for system in systems.iter().filter(|s| s.position.is_finite()) {
            bounds.extend_with(Pos2::new(system.position.x, system.position.z));
        }
        if !bounds.is_positive() {
            if bounds.is_finite() {
                self.center = bounds.center();
            }
            return;
        }

        self.center = bounds.center();
        let zoom_x = rect.width() / bounds.width();
        let zoom_y = rect.height() / bounds.height();
        // 留出边距
        self.zoom = (zoom_x.min(zoom_y) * 0.9).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// 处理拖拽平移和滚轮缩放
    pub fn handle_input(&mut self, ui: &Ui, response: &Response) {
        if response.dragged() {
            self.pan(response.drag_delta());
        }

        if !response.hovered() {
            return;
        }

        let (scroll, zoom_delta, pointer) =
            ui.input(|i| (i.smooth_scroll_delta, i.zoom_delta(), i.pointer.hover_pos()));
        let mut factor = zoom_delta;
        if scroll.y != 0.0 {
            factor *= (scroll.y * 0.002).exp();
        }
        if factor != 1.0 {
            if let Some(anchor) = pointer {
                self.zoom_at(response.rect, anchor, factor);
            }
        }
    }
}
