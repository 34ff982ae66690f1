//! egui overlay: crosshair, ball status, session counters.

use crate::game::GameState;

/// Draw the HUD overlay.
pub fn draw_hud(ctx: &egui::Context, game: &GameState, fps: f64) {
    egui::Area::new(egui::Id::new("scoreboard"))
        .fixed_pos(egui::pos2(10.0, 10.0))
        .show(ctx, |ui| {
            ui.visuals_mut().override_text_color = Some(egui::Color32::WHITE);

            ui.label(
                egui::RichText::new(format!(
                    "Throws {}   Recalls {}   Drops {}",
                    game.throws, game.recalls, game.drops
                ))
                .size(22.0)
                .strong(),
            );

            let (status, color) = if game.ball.is_flying() {
                ("Ball in the air", egui::Color32::YELLOW)
            } else {
                ("Ball in hand", egui::Color32::LIGHT_GREEN)
            };
            ui.label(egui::RichText::new(status).size(16.0).color(color));

            ui.add_space(4.0);
            let p = game.camera.position;
            ui.label(
                egui::RichText::new(format!(
                    "{:.0} FPS | pos ({:.1}, {:.1}) | yaw {:.0}° pitch {:.0}°",
                    fps,
                    p.x,
                    p.z,
                    game.camera.yaw().rem_euclid(360.0),
                    game.camera.pitch()
                ))
                .size(13.0)
                .color(egui::Color32::LIGHT_GRAY),
            );
            ui.label(
                egui::RichText::new("WASD/Arrows: Move | Mouse: Look | LMB: Throw | RMB: Recall | Esc: Quit")
                    .size(11.0)
                    .color(egui::Color32::GRAY),
            );
        });

    // Crosshair at screen center
    let center = ctx.screen_rect().center();
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Foreground,
        egui::Id::new("crosshair"),
    ));
    let stroke = egui::Stroke::new(1.5, egui::Color32::from_white_alpha(200));
    let arm = 7.0;
    painter.line_segment(
        [center - egui::vec2(arm, 0.0), center + egui::vec2(arm, 0.0)],
        stroke,
    );
    painter.line_segment(
        [center - egui::vec2(0.0, arm), center + egui::vec2(0.0, arm)],
        stroke,
    );
}
