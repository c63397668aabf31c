//! Exchange logo textures.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Edge length of a logo in the profile selector
pub const ICON_SIZE: f32 = 16.0;

/// Loads logo images once and keeps their textures alive.
///
/// Images that fail to decode are remembered as missing so they are not
/// retried every frame.
#[derive(Default)]
pub struct IconCache {
    textures: HashMap<PathBuf, Option<egui::TextureHandle>>,
}

impl IconCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn load(ctx: &egui::Context, path: &Path) -> Option<egui::TextureHandle> {
        let image = match image::open(path) {
            Ok(image) => image.to_rgba8(),
            Err(e) => {
                log::warn!("Failed to load icon {:?}: {}", path, e);
                return None;
            }
        };
        let size = [image.width() as usize, image.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
        Some(ctx.load_texture(
            path.to_string_lossy(),
            color_image,
            egui::TextureOptions::LINEAR,
        ))
    }

    /// Texture for `path`, loading it on first use
    pub fn texture(&mut self, ctx: &egui::Context, path: &Path) -> Option<&egui::TextureHandle> {
        self.textures
            .entry(path.to_path_buf())
            .or_insert_with(|| Self::load(ctx, path))
            .as_ref()
    }

    /// Draw the icon for `path`, or an empty square of the same size
    pub fn show(&mut self, ui: &mut egui::Ui, path: &Path) {
        let size = egui::vec2(ICON_SIZE, ICON_SIZE);
        match self.texture(ui.ctx(), path) {
            Some(texture) => {
                let sized = egui::load::SizedTexture::new(texture.id(), size);
                ui.add(egui::Image::from_texture(sized));
            }
            None => {
                ui.allocate_space(size);
            }
        }
    }
}
