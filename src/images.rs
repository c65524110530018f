use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::mpsc,
};

use anyhow::Context;
use image::DynamicImage;

/// Longest edge for the main viewer.
pub const PREVIEW_MAX: u32 = 1920;
/// Longest edge for grid thumbnails.
pub const THUMB_SIZE: u32 = 300;

/// Where a photo reference points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLocation {
    Remote(String),
    Local(PathBuf),
}

/// Resolves `src` against the asset root. References are site-absolute in
/// the gallery file, so a leading slash is relative to the root.
pub fn resolve(src: &str, asset_root: &Path) -> ImageLocation {
    if src.starts_with("http://") || src.starts_with("https://") {
        return ImageLocation::Remote(src.to_string());
    }
    let relative = src.trim_start_matches('/');
    ImageLocation::Local(asset_root.join(relative))
}

/// Fetches and decodes an image, downscaled to `max_edge`.
pub fn open_image(
    location: &ImageLocation,
    http: &reqwest::blocking::Client,
    max_edge: u32,
) -> anyhow::Result<DynamicImage> {
    let img = match location {
        ImageLocation::Local(path) => {
            image::open(path).with_context(|| format!("failed to open {}", path.display()))?
        }
        ImageLocation::Remote(url) => {
            let bytes = http
                .get(url)
                .send()
                .and_then(|r| r.error_for_status())
                .and_then(|r| r.bytes())
                .with_context(|| format!("failed to fetch {}", url))?;
            image::load_from_memory(&bytes)
                .with_context(|| format!("failed to decode {}", url))?
        }
    };
    if img.width() > max_edge || img.height() > max_edge {
        Ok(img.thumbnail(max_edge, max_edge))
    } else {
        Ok(img)
    }
}

enum ImageSlot {
    Loading,
    Ready(egui::TextureHandle),
    Failed,
}

struct Decoded {
    src: String,
    rgba: Option<(Vec<u8>, usize, usize)>,
}

/// Textures keyed by photo reference, decoded on background threads.
pub struct ImageCache {
    asset_root: PathBuf,
    max_edge: u32,
    http: reqwest::blocking::Client,
    slots: HashMap<String, ImageSlot>,
    tx: mpsc::SyncSender<Decoded>,
    rx: mpsc::Receiver<Decoded>,
}

impl ImageCache {
    pub fn new(asset_root: PathBuf, max_edge: u32, http: reqwest::blocking::Client) -> Self {
        let (tx, rx) = mpsc::sync_channel(64);
        Self {
            asset_root,
            max_edge,
            http,
            slots: HashMap::new(),
            tx,
            rx,
        }
    }

    /// Moves finished decodes into textures.
    pub fn poll(&mut self, ctx: &egui::Context) {
        while let Ok(Decoded { src, rgba }) = self.rx.try_recv() {
            let slot = match rgba {
                Some((data, w, h)) => {
                    let img = egui::ColorImage::from_rgba_unmultiplied([w, h], &data);
                    ImageSlot::Ready(ctx.load_texture(&src, img, egui::TextureOptions::LINEAR))
                }
                None => ImageSlot::Failed,
            };
            self.slots.insert(src, slot);
        }
    }

    /// Texture for `src`, queueing a decode on first request.
    pub fn texture(&mut self, src: &str, ctx: &egui::Context) -> Option<egui::TextureHandle> {
        match self.slots.get(src) {
            Some(ImageSlot::Ready(tex)) => return Some(tex.clone()),
            Some(ImageSlot::Loading) => return None,
            Some(ImageSlot::Failed) => return None,
            None => {}
        }
        self.slots.insert(src.to_string(), ImageSlot::Loading);

        let location = resolve(src, &self.asset_root);
        let http = self.http.clone();
        let max_edge = self.max_edge;
        let tx = self.tx.clone();
        let ctx2 = ctx.clone();
        let src = src.to_string();
        std::thread::spawn(move || {
            let rgba = match open_image(&location, &http, max_edge) {
                Ok(img) => {
                    let rgba = img.to_rgba8();
                    let w = rgba.width() as usize;
                    let h = rgba.height() as usize;
                    Some((rgba.into_raw(), w, h))
                }
                Err(err) => {
                    tracing::warn!("image load failed: {:#}", err);
                    None
                }
            };
            let _ = tx.send(Decoded { src, rgba });
            ctx2.request_repaint();
        });
        None
    }

    pub fn failed(&self, src: &str) -> bool {
        matches!(self.slots.get(src), Some(ImageSlot::Failed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    #[test]
    fn site_absolute_refs_resolve_under_root() {
        assert_eq!(
            resolve("/photos/p1.jpg", Path::new("/srv/public")),
            ImageLocation::Local(PathBuf::from("/srv/public/photos/p1.jpg"))
        );
        assert_eq!(
            resolve("p1.jpg", Path::new("assets")),
            ImageLocation::Local(PathBuf::from("assets/p1.jpg"))
        );
    }

    #[test]
    fn urls_stay_remote() {
        assert_eq!(
            resolve("https://cdn.example.com/p1.jpg", Path::new("/srv")),
            ImageLocation::Remote("https://cdn.example.com/p1.jpg".to_string())
        );
    }

    #[test]
    fn local_images_are_downscaled_to_max_edge() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        ImageBuffer::from_pixel(64, 32, Rgba([10u8, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let http = reqwest::blocking::Client::new();
        let img = open_image(&ImageLocation::Local(path), &http, 16).unwrap();
        assert_eq!((img.width(), img.height()), (16, 8));
    }

    #[test]
    fn missing_local_image_is_an_error() {
        let http = reqwest::blocking::Client::new();
        let err = open_image(
            &ImageLocation::Local(PathBuf::from("/nonexistent/p.jpg")),
            &http,
            THUMB_SIZE,
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/p.jpg"));
    }
}
