//! Catalog screen: header plus a row of thumbnail cards. Clicks are handed
//! to the app through egui temp data.

use std::collections::HashMap;
use std::path::Path;

use egui::{Color32, Context, CornerRadius, RichText, TextureHandle, TextureOptions, Vec2};

use crate::catalog::Catalog;
use crate::ui::theme::{self, ThemeMode};

/// Thumbnail textures, decoded lazily on first draw. `None` marks a failed
/// load so it is not retried every frame.
#[derive(Default)]
pub struct ThumbnailCache {
    textures: HashMap<usize, Option<TextureHandle>>,
}

impl ThumbnailCache {
    fn get_or_load(
        &mut self,
        ctx: &Context,
        index: usize,
        path: Option<&Path>,
    ) -> Option<TextureHandle> {
        self.textures
            .entry(index)
            .or_insert_with(|| path.and_then(|p| load_thumbnail(ctx, index, p)))
            .clone()
    }
}

fn load_thumbnail(ctx: &Context, index: usize, path: &Path) -> Option<TextureHandle> {
    let img = match image::open(path) {
        Ok(img) => img.to_rgba8(),
        Err(e) => {
            log::warn!("thumbnail {} unreadable: {e}", path.display());
            return None;
        }
    };
    let size = [img.width() as usize, img.height() as usize];
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &img.into_raw());
    Some(ctx.load_texture(format!("thumb-{index}"), color_image, TextureOptions::LINEAR))
}

pub fn draw_catalog(
    ctx: &Context,
    catalog: &Catalog,
    cache: &mut ThumbnailCache,
    theme: ThemeMode,
) {
    let tc = theme.colors();

    egui::CentralPanel::default()
        .frame(egui::Frame::new().fill(tc.canvas))
        .show(ctx, |ui| {
            ui.add_space(24.0);
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new("panoview")
                        .size(theme::HEADING_SIZE * 1.4)
                        .color(tc.accent)
                        .strong(),
                );
                ui.label(
                    RichText::new("Panoramic video experiences")
                        .size(theme::BODY_SIZE)
                        .color(tc.text_secondary),
                );
            });
            ui.add_space(32.0);

            ui.horizontal_wrapped(|ui| {
                ui.add_space(24.0);
                for (index, entry) in catalog.entries.iter().enumerate() {
                    let thumb = cache.get_or_load(
                        ctx,
                        index,
                        entry
                            .thumbnail
                            .as_ref()
                            .map(|t| catalog.resolve(t))
                            .as_deref(),
                    );
                    entry_card(ui, ctx, catalog, entry, thumb.as_ref(), &tc);
                }
            });

            ui.add_space(24.0);
            ui.horizontal(|ui| {
                ui.add_space(24.0);
                if ui.button(RichText::new("Open file…").size(theme::SMALL_SIZE)).clicked() {
                    ctx.data_mut(|d| d.insert_temp(egui::Id::new("browse_video"), true));
                }
                if ui
                    .button(
                        RichText::new(format!("Theme: {}", theme.display_name()))
                            .size(theme::SMALL_SIZE),
                    )
                    .clicked()
                {
                    ctx.data_mut(|d| d.insert_temp(egui::Id::new("set_theme"), theme.toggle()));
                }
            });
        });
}

fn entry_card(
    ui: &mut egui::Ui,
    ctx: &Context,
    catalog: &Catalog,
    entry: &crate::catalog::CatalogEntry,
    thumb: Option<&TextureHandle>,
    tc: &crate::ui::theme::ThemeColors,
) {
    egui::Frame::new()
        .fill(tc.card_bg)
        .stroke(egui::Stroke::new(1.0, tc.card_border))
        .corner_radius(CornerRadius::same(theme::CARD_ROUNDING))
        .inner_margin(egui::Margin::same(10))
        .show(ui, |ui| {
            ui.vertical(|ui| {
                ui.set_width(theme::THUMBNAIL_SIZE.x);
                let clicked = match thumb {
                    Some(texture) => ui
                        .add(
                            egui::Image::new(texture)
                                .fit_to_exact_size(theme::THUMBNAIL_SIZE)
                                .corner_radius(CornerRadius::same(theme::WIDGET_ROUNDING))
                                .sense(egui::Sense::click()),
                        )
                        .clicked(),
                    None => {
                        // Placeholder card when the thumbnail is missing.
                        let (rect, response) = ui.allocate_exact_size(
                            Vec2::new(theme::THUMBNAIL_SIZE.x, theme::THUMBNAIL_SIZE.y),
                            egui::Sense::click(),
                        );
                        ui.painter().rect_filled(
                            rect,
                            CornerRadius::same(theme::WIDGET_ROUNDING),
                            Color32::from_gray(0x30),
                        );
                        ui.painter().text(
                            rect.center(),
                            egui::Align2::CENTER_CENTER,
                            "360°",
                            egui::FontId::proportional(theme::HEADING_SIZE),
                            tc.text_secondary,
                        );
                        response.clicked()
                    }
                };
                ui.add_space(6.0);
                let button_clicked = ui
                    .add_sized(
                        [theme::THUMBNAIL_SIZE.x, 28.0],
                        egui::Button::new(
                            RichText::new(&entry.title)
                                .size(theme::BODY_SIZE)
                                .color(tc.text_primary),
                        ),
                    )
                    .clicked();

                if (clicked || button_clicked) && entry.is_playable() {
                    let path = catalog.resolve(&entry.video);
                    ctx.data_mut(|d| {
                        d.insert_temp(
                            egui::Id::new("open_video"),
                            path.to_string_lossy().into_owned(),
                        );
                    });
                }
            });
        });
}
