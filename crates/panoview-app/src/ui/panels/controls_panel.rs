//! Player overlay: back button, status text, and the bottom control bar
//! (play/pause, restart, seek, fullscreen, stereo). Pure signal emitters —
//! state changes travel through egui temp data back to the app.

use egui::{Align2, Context, RichText, Vec2};

use crate::player::{Phase, PlayerInfo};
use crate::ui::theme::{self, ThemeMode};

pub fn draw_player_overlay(ctx: &Context, info: &PlayerInfo, theme: ThemeMode) {
    let tc = theme.colors();

    // Back navigation is always reachable, even on a failed mount.
    egui::Area::new(egui::Id::new("player-back"))
        .anchor(Align2::LEFT_TOP, Vec2::new(16.0, 16.0))
        .show(ctx, |ui| {
            if ui
                .button(RichText::new("← Back").size(theme::BODY_SIZE))
                .clicked()
            {
                ctx.data_mut(|d| d.insert_temp(egui::Id::new("navigate_back"), true));
            }
        });

    match info.phase {
        Phase::Loading => {
            status_text(ctx, &tc, "Loading video…", tc.text_secondary);
        }
        Phase::Failed => {
            let message = info
                .failure
                .clone()
                .unwrap_or_else(|| "playback failed".into());
            status_text(ctx, &tc, &message, tc.error);
        }
        Phase::Ready => {
            if info.controls_visible {
                control_bar(ctx, info, theme);
            }
        }
    }
}

fn status_text(ctx: &Context, tc: &theme::ThemeColors, message: &str, color: egui::Color32) {
    egui::Area::new(egui::Id::new("player-status"))
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(tc.panel)
                .corner_radius(egui::CornerRadius::same(theme::PANEL_ROUNDING))
                .inner_margin(egui::Margin::same(16))
                .show(ui, |ui| {
                    ui.label(RichText::new(message).size(theme::BODY_SIZE).color(color));
                });
        });
}

fn control_bar(ctx: &Context, info: &PlayerInfo, theme: ThemeMode) {
    let tc = theme.colors();

    egui::Area::new(egui::Id::new("player-controls"))
        .anchor(Align2::CENTER_BOTTOM, Vec2::new(0.0, -32.0))
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(tc.panel)
                .corner_radius(egui::CornerRadius::same(theme::PANEL_ROUNDING))
                .inner_margin(egui::Margin::symmetric(16, 10))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        let play_label = if info.playing { "Pause" } else { "Play" };
                        if ui
                            .button(RichText::new(play_label).size(theme::BODY_SIZE))
                            .clicked()
                        {
                            ctx.data_mut(|d| {
                                d.insert_temp(egui::Id::new("player_play_pause"), true);
                            });
                        }
                        if ui
                            .button(RichText::new("Restart").size(theme::BODY_SIZE))
                            .clicked()
                        {
                            ctx.data_mut(|d| d.insert_temp(egui::Id::new("player_restart"), true));
                        }

                        ui.label(
                            RichText::new(format_time(info.position_secs))
                                .size(theme::SMALL_SIZE)
                                .color(tc.text_secondary),
                        );
                        let mut seek = info.seek_value;
                        ui.spacing_mut().slider_width = theme::SEEK_SLIDER_WIDTH;
                        let slider = ui.add(
                            egui::Slider::new(&mut seek, 0.0..=100.0)
                                .step_by(0.1)
                                .show_value(false),
                        );
                        if slider.changed() {
                            ctx.data_mut(|d| d.insert_temp(egui::Id::new("player_seek"), seek));
                        }
                        ui.label(
                            RichText::new(format_time(info.duration_secs))
                                .size(theme::SMALL_SIZE)
                                .color(tc.text_secondary),
                        );

                        let fs_label = if info.fullscreen {
                            "Exit fullscreen"
                        } else {
                            "Fullscreen"
                        };
                        if ui
                            .button(RichText::new(fs_label).size(theme::BODY_SIZE))
                            .clicked()
                        {
                            ctx.data_mut(|d| {
                                d.insert_temp(egui::Id::new("toggle_fullscreen"), true);
                            });
                        }
                    });
                });
        });

    // Stereo entry sits apart, bottom-right, once a rendering context exists.
    if let Some(stereo) = info.stereo {
        egui::Area::new(egui::Id::new("player-stereo"))
            .anchor(Align2::RIGHT_BOTTOM, Vec2::new(-16.0, -16.0))
            .show(ctx, |ui| {
                let label = if stereo { "Exit VR" } else { "Enter VR" };
                if ui
                    .button(RichText::new(label).size(theme::BODY_SIZE).color(tc.accent))
                    .clicked()
                {
                    ctx.data_mut(|d| d.insert_temp(egui::Id::new("toggle_stereo"), true));
                }
            });
    }
}

/// mm:ss for the transport readout.
fn format_time(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_formatting() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(5.4), "0:05");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(600.0), "10:00");
        assert_eq!(format_time(-3.0), "0:00");
    }
}
