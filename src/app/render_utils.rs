use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use impact_graph::layout::{Emphasis, ViewportController};

/// Logical-to-screen mapping for one frame.
#[derive(Clone, Copy)]
pub(super) struct ScreenMap<'a> {
    rect: Rect,
    viewport: &'a ViewportController,
    pixels_per_unit: f32,
}

impl<'a> ScreenMap<'a> {
    pub(super) fn new(rect: Rect, viewport: &'a ViewportController) -> Self {
        let units = viewport.viewport().units_per_pixel(rect.size());
        Self {
            rect,
            viewport,
            pixels_per_unit: if units > 0.0 { 1.0 / units } else { 1.0 },
        }
    }

    pub(super) fn point(&self, logical: Vec2) -> Pos2 {
        self.rect.min + self.viewport.pixel_at(Pos2::ZERO + logical).to_vec2()
    }

    pub(super) fn length(&self, logical: f32) -> f32 {
        logical * self.pixels_per_unit
    }

    pub(super) fn scale(&self) -> f32 {
        self.pixels_per_unit
    }
}

pub(super) fn rgb(color: [u8; 3]) -> Color32 {
    Color32::from_rgb(color[0], color[1], color[2])
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

pub(super) fn emphasised(color: Color32, emphasis: Emphasis) -> Color32 {
    match emphasis {
        Emphasis::Normal | Emphasis::Neighbor => color,
        Emphasis::Focus => blend_color(color, Color32::from_rgb(255, 214, 150), 0.35),
        Emphasis::Faded => with_alpha(blend_color(color, Color32::from_gray(30), 0.55), 90),
    }
}

pub(super) fn edge_stroke(weight: f32, emphasis: Emphasis, scale: f32) -> Stroke {
    let width = ((0.6 + weight * 0.35) * scale.sqrt()).clamp(0.5, 5.0);
    match emphasis {
        Emphasis::Normal => Stroke::new(width, Color32::from_rgba_unmultiplied(150, 150, 150, 120)),
        Emphasis::Neighbor | Emphasis::Focus => {
            Stroke::new(width * 1.6, Color32::from_rgb(241, 146, 94))
        }
        Emphasis::Faded => Stroke::new(width * 0.7, Color32::from_rgba_unmultiplied(80, 86, 96, 50)),
    }
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, map: &ScreenMap<'_>) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(246, 243, 238));

    let step = map.length(100.0).max(20.0);
    let origin = map.point(Vec2::ZERO);
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(120, 110, 100, 28));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let bounds = Rect::from_two_pos(start, end).expand(padding);
    rect.intersects(bounds)
}
