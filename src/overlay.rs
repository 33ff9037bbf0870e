//! Egui chrome: labels, instruction and task bars, zoom readout, info panel.
//!
//! The overlay only reads a [`FramePlan`] and returns [`OverlayAction`]s;
//! the app applies them through the controller like any key press.

use egui::{Align2, Color32, FontId, Pos2, Rect, Stroke, Vec2 as EVec2};

use crate::controller::{FramePlan, Highlight, Mutation};
use crate::input::Command;
use crate::object::ObjectKind;

const NAME_SIZE: f32 = 14.0 * 1.27;
const CLASS_SIZE: f32 = 14.0;
const NAME_COLOR: Color32 = Color32::from_rgb(255, 255, 0);
const CLASS_COLOR: Color32 = Color32::from_rgba_premultiplied(230, 230, 230, 230);

const INFO_TEXT: &str = "Point Zer0 is a procedural sky you can pan forever.\n\n\
Drag to pan, release to coast. Arrows/WASD pan, +/- zoom, H recenters.\n\
1-6 create a nebula, galaxy, black hole, star cluster, pulsar or quasar under the pointer.\n\
Click an object to select it. E cycles size, R density, T hue, ` deletes.\n\
Esc restarts the sky. Ctrl+S exports the whole map.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    CreateAtCentre(ObjectKind),
    Run(Command),
}

#[derive(Debug, Default)]
pub struct OverlayState {
    pub show_info: bool,
}

/// Draw the overlay for one frame. `has_selection` gates the task bar's
/// per-object buttons.
pub fn draw(
    ctx: &egui::Context,
    plan: &FramePlan,
    state: &mut OverlayState,
    has_selection: bool,
) -> Vec<OverlayAction> {
    let mut actions = Vec::new();
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Background,
        egui::Id::new("canvas_labels"),
    ));

    // Plan coordinates are physical pixels, egui paints in points
    let scale = 1.0 / ctx.pixels_per_point();
    if let Some(hover) = &plan.hover {
        paint_label(&painter, hover, scale);
    }
    if let Some(sel) = &plan.selection {
        if sel.show_label {
            paint_label(&painter, sel, scale);
        }
    }
    paint_zoom_readout(&painter, plan, scale);

    egui::SidePanel::left("instructions")
        .resizable(false)
        .show(ctx, |ui| {
            ui.heading("Create");
            for (i, kind) in ObjectKind::ALL.iter().enumerate() {
                if ui.button(format!("{} {}", i + 1, kind.label())).clicked() {
                    actions.push(OverlayAction::CreateAtCentre(*kind));
                }
            }
            ui.separator();
            let (lon, lat) = plan.pointer_geo;
            ui.monospace(format!("Lon: {:.2}°\nLat: {:.2}°", lon, lat));
        });

    egui::TopBottomPanel::bottom("task_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let per_object = [
                ("Size (E)", Command::Cycle(Mutation::Size)),
                ("Density (R)", Command::Cycle(Mutation::Density)),
                ("Color (T)", Command::Cycle(Mutation::Hue)),
                ("Delete (`)", Command::DeleteSelected),
            ];
            for (text, command) in per_object {
                if ui.add_enabled(has_selection, egui::Button::new(text)).clicked() {
                    actions.push(OverlayAction::Run(command));
                }
            }
            ui.separator();
            for (text, command) in [
                ("Save (Ctrl+S)", Command::Export),
                ("Restart (Esc)", Command::Restart),
                ("Info (I)", Command::ToggleInfo),
            ] {
                if ui.button(text).clicked() {
                    actions.push(OverlayAction::Run(command));
                }
            }
        });
    });

    if state.show_info {
        let mut open = true;
        egui::Window::new("Point Zer0")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, EVec2::ZERO)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(INFO_TEXT);
            });
        state.show_info = open;
    }

    actions
}

fn to_points(x: f32, y: f32, scale: f32) -> Pos2 {
    Pos2::new(x * scale, y * scale)
}

fn paint_label(painter: &egui::Painter, highlight: &Highlight, scale: f32) {
    let at = to_points(highlight.outline.label_at.x, highlight.outline.label_at.y, scale);
    let outline = Color32::from_rgba_premultiplied(0, 0, 0, 220);
    // Cheap text outline: four offset copies under the name
    for d in [EVec2::new(-1.5, 0.0), EVec2::new(1.5, 0.0), EVec2::new(0.0, -1.5), EVec2::new(0.0, 1.5)] {
        painter.text(at + d, Align2::LEFT_TOP, &highlight.name, FontId::monospace(NAME_SIZE), outline);
    }
    painter.text(at, Align2::LEFT_TOP, &highlight.name, FontId::monospace(NAME_SIZE), NAME_COLOR);
    painter.text(
        at + EVec2::new(0.0, NAME_SIZE),
        Align2::LEFT_TOP,
        highlight.class_label(),
        FontId::monospace(CLASS_SIZE),
        CLASS_COLOR,
    );
}

fn paint_zoom_readout(painter: &egui::Painter, plan: &FramePlan, scale: f32) {
    let bar = &plan.zoom_bar;
    let font = FontId::monospace(11.0);
    let color = Color32::from_gray(200);
    let right = |y: f32| to_points(bar.x - 14.0, y, scale);
    painter.text(right(bar.top), Align2::RIGHT_CENTER, "min", font.clone(), color);
    painter.text(right(bar.top + bar.height), Align2::RIGHT_CENTER, "max", font.clone(), color);
    painter.text(
        right(bar.y_at(plan.zoom_bar_fraction)),
        Align2::RIGHT_CENTER,
        format!("{:.2}x", plan.zoom),
        font,
        NAME_COLOR,
    );
    let grab = Rect::from_min_max(
        to_points(bar.x - 12.0, bar.top, scale),
        to_points(bar.x + 12.0, bar.top + bar.height, scale),
    );
    painter.rect_stroke(grab, 2.0, Stroke::new(1.0, Color32::from_white_alpha(30)), egui::StrokeKind::Inside);
}
