mod app;
mod config;
mod grid;
mod images;
mod navigator;
mod persist;
mod photo;
mod preview;
mod session;
mod store;
mod tagging;
mod viewer;

use app::PhototagApp;
use config::AppConfig;
use persist::{FileSink, GallerySink, HttpSink, SaveQueue};
use session::Session;
use store::Gallery;

fn build_sink(
    config: &AppConfig,
    gallery_path: &std::path::Path,
    http: &reqwest::blocking::Client,
) -> Box<dyn GallerySink> {
    match config.save_endpoint(std::env::var(config::SAVE_ENDPOINT_ENV).ok()) {
        Some(url) => Box::new(HttpSink::new(url, http.clone())),
        None => Box::new(FileSink::new(gallery_path)),
    }
}

fn fail(message: &str, err: anyhow::Error) -> ! {
    tracing::error!("{}: {:#}", message, err);
    eprintln!("phototag: {}: {:#}", message, err);
    std::process::exit(2);
}

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = AppConfig::load();
    let gallery_path = config.gallery_path(std::env::var(config::GALLERY_ENV).ok());
    let asset_root = config.asset_root(&gallery_path);

    let gallery = Gallery::load(&gallery_path).unwrap_or_else(|err| fail("cannot load gallery", err));
    let http = persist::http_client().unwrap_or_else(|err| fail("cannot build http client", err));
    let sink = build_sink(&config, &gallery_path, &http);
    eprintln!(
        "phototag: {} photo(s) from {}, saving to {}",
        gallery.len(),
        gallery_path.display(),
        sink.describe()
    );
    let session = Session::new(gallery, SaveQueue::spawn(sink, config.save_delay()));

    let viewer = viewer::Viewer::new(asset_root.clone(), http.clone());
    let grid = grid::Grid::new(asset_root, http, config.row_height());

    let width = config.window_width.unwrap_or(1400.0);
    let height = config.window_height.unwrap_or(900.0);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Phototag")
            .with_app_id("phototag")
            .with_inner_size([width, height]),
        ..Default::default()
    };

    eframe::run_native(
        "phototag",
        native_options,
        Box::new(|cc| Ok(Box::new(PhototagApp::new(cc, config, session, viewer, grid)))),
    )
}

#[cfg(test)]
mod tests {
    use super::build_sink;
    use crate::config::AppConfig;
    use crate::persist::http_client;

    #[test]
    fn configured_endpoint_selects_http_sink() {
        let config = AppConfig {
            save_endpoint: Some("http://localhost:5173/save-gallery".to_string()),
            ..Default::default()
        };
        let sink = build_sink(&config, std::path::Path::new("gallery.json"), &http_client().unwrap());
        if std::env::var(crate::config::SAVE_ENDPOINT_ENV).is_err() {
            assert_eq!(sink.describe(), "http://localhost:5173/save-gallery");
        }
    }

    #[test]
    fn file_sink_is_the_default() {
        if std::env::var(crate::config::SAVE_ENDPOINT_ENV).is_ok() {
            return;
        }
        let sink = build_sink(
            &AppConfig::default(),
            std::path::Path::new("gallery.json"),
            &http_client().unwrap(),
        );
        assert_eq!(sink.describe(), "gallery.json");
    }
}
