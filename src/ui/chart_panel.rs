use std::f32::consts::FRAC_PI_2;

use eframe::egui;

use crate::config::ChartLayout;
use crate::data::record::{Attribute, Axis, Dataset};
use crate::render::scene::{AxisLabel, Scene, Tick};
use crate::state::chart_state::AxisSelection;
use crate::state::theme::Theme;
use crate::ui::tooltip::{self, Tooltip};

/// Actions the chart panel can request from the app.
pub enum ChartAction {
    None,
    SelectAttribute(Attribute),
}

/// Paint the scene and handle label clicks and hover.
/// Returns the requested action and the screen rect used by the chart.
pub fn show_chart_panel(
    ui: &mut egui::Ui,
    scene: &Scene,
    dataset: &Dataset,
    selection: &AxisSelection,
    layout: &ChartLayout,
    theme: Theme,
) -> (ChartAction, egui::Rect) {
    let mut action = ChartAction::None;

    let size = egui::vec2(layout.svg_width as f32, layout.svg_height as f32);
    let (total_rect, response) = ui.allocate_exact_size(size, egui::Sense::hover());
    let origin = total_rect.min + egui::vec2(layout.margin.left as f32, layout.margin.top as f32);
    let to_screen = |p: [f64; 2]| origin + egui::vec2(p[0] as f32, p[1] as f32);

    let painter = ui.painter_at(total_rect);
    painter.rect_filled(total_rect, 0.0, theme.plot_bg());

    draw_axes(&painter, scene, origin, theme);

    // --- Marks ---
    let font = egui::FontId::proportional(10.0);
    for mark in &scene.marks {
        let center = to_screen(mark.center);
        let radius = mark.radius as f32;
        painter.circle_filled(center, radius, theme.mark_fill());
        painter.circle_stroke(center, radius, egui::Stroke::new(1.0, theme.mark_stroke()));
        painter.text(
            center,
            egui::Align2::CENTER_CENTER,
            &mark.text,
            font.clone(),
            theme.mark_text(),
        );
    }

    // --- Axis labels ---
    for label in scene.x_labels.iter().chain(&scene.y_labels) {
        if let Some(attribute) = draw_axis_label(ui, &painter, label, to_screen(label.anchor), theme) {
            action = ChartAction::SelectAttribute(attribute);
        }
    }

    // --- Tooltip ---
    if let Some(pointer) = response.hover_pos() {
        let local = pointer - origin;
        if let Some(tip) = tooltip::hover(scene, dataset, selection, [local.x as f64, local.y as f64]) {
            draw_tooltip(&painter, &tip, to_screen(tip.anchor), layout, theme);
        }
    }

    (action, total_rect)
}

fn draw_axes(painter: &egui::Painter, scene: &Scene, origin: egui::Pos2, theme: Theme) {
    let axis_color = theme.axis_color();
    let stroke = egui::Stroke::new(1.0, axis_color);
    let font = egui::FontId::proportional(10.0);
    let width = scene.width as f32;
    let height = scene.height as f32;

    let bottom_left = origin + egui::vec2(0.0, height);
    painter.line_segment([bottom_left, bottom_left + egui::vec2(width, 0.0)], stroke);
    painter.line_segment([origin, bottom_left], stroke);

    let tick_color = |tick: &Tick| axis_color.gamma_multiply(tick.opacity as f32);

    for tick in &scene.x_ticks {
        let x = origin.x + tick.position as f32;
        let color = tick_color(tick);
        painter.line_segment(
            [egui::pos2(x, bottom_left.y), egui::pos2(x, bottom_left.y + 6.0)],
            egui::Stroke::new(1.0, color),
        );
        painter.text(
            egui::pos2(x, bottom_left.y + 9.0),
            egui::Align2::CENTER_TOP,
            &tick.label,
            font.clone(),
            color,
        );
    }

    for tick in &scene.y_ticks {
        let y = origin.y + tick.position as f32;
        let color = tick_color(tick);
        painter.line_segment(
            [egui::pos2(origin.x - 6.0, y), egui::pos2(origin.x, y)],
            egui::Stroke::new(1.0, color),
        );
        painter.line_segment(
            [egui::pos2(origin.x, y), egui::pos2(origin.x + width, y)],
            egui::Stroke::new(1.0, theme.grid_color().gamma_multiply(tick.opacity as f32)),
        );
        painter.text(
            egui::pos2(origin.x - 9.0, y),
            egui::Align2::RIGHT_CENTER,
            &tick.label,
            font.clone(),
            color,
        );
    }
}

/// Draw one clickable label. Returns its attribute when an inactive label was clicked.
fn draw_axis_label(
    ui: &mut egui::Ui,
    painter: &egui::Painter,
    label: &AxisLabel,
    anchor: egui::Pos2,
    theme: Theme,
) -> Option<Attribute> {
    let color = if label.active { theme.active_label() } else { theme.inactive_label() };
    let galley = painter.layout_no_wrap(
        label.text.to_string(),
        egui::FontId::proportional(13.0),
        color,
    );
    let size = galley.size();

    let rotated = label.attribute.axis() == Axis::Y;
    let hit_rect = if rotated {
        egui::Rect::from_center_size(anchor, egui::vec2(size.y, size.x))
    } else {
        egui::Rect::from_center_size(anchor, size)
    };

    if rotated {
        let pos = anchor + egui::vec2(-size.y / 2.0, size.x / 2.0);
        painter.add(egui::epaint::TextShape::new(pos, galley, color).with_angle(-FRAC_PI_2));
    } else {
        painter.galley(hit_rect.min, galley, color);
    }

    // Underline the active label.
    if label.active {
        let stroke = egui::Stroke::new(1.0, color);
        if rotated {
            painter.vline(hit_rect.right() + 1.0, hit_rect.y_range(), stroke);
        } else {
            painter.hline(hit_rect.x_range(), hit_rect.bottom() + 1.0, stroke);
        }
    }

    let response = ui.interact(
        hit_rect,
        ui.id().with(("axis_label", label.attribute.column())),
        egui::Sense::click(),
    );
    if !label.active && response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
    (response.clicked() && !label.active).then_some(label.attribute)
}

fn draw_tooltip(
    painter: &egui::Painter,
    tip: &Tooltip,
    mark_center: egui::Pos2,
    layout: &ChartLayout,
    theme: Theme,
) {
    let font = egui::FontId::proportional(11.0);
    let galley = painter.layout_no_wrap(tip.text(), font, theme.tooltip_text());
    let text_size = galley.size();
    let radius = layout.mark_radius as f32;

    painter.circle_stroke(mark_center, radius, egui::Stroke::new(2.0, theme.active_label()));

    // Centred above the mark, then shifted by the configured offset.
    let [dx, dy] = layout.tooltip_offset;
    let top_left = egui::pos2(
        mark_center.x - text_size.x / 2.0 + dx as f32,
        mark_center.y - radius - text_size.y + dy as f32,
    );
    let bg_rect = egui::Rect::from_min_size(
        top_left - egui::vec2(6.0, 4.0),
        text_size + egui::vec2(12.0, 8.0),
    );
    painter.rect_filled(bg_rect, 4.0, theme.tooltip_bg());
    painter.galley(top_left, galley, theme.tooltip_text());
}
