use std::sync::mpsc::{self, Receiver};

use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use eframe::egui;
use reqwest::blocking::Client;

/// Texture for the current scene. `data:` URIs decode inline; remote
/// placeholders download on a background thread.
pub struct SceneImage {
    url: Option<String>,
    texture: Option<egui::TextureHandle>,
    pending: Option<Receiver<Result<egui::ColorImage>>>,
    client: Client,
}

impl Default for SceneImage {
    fn default() -> Self {
        Self {
            url: None,
            texture: None,
            pending: None,
            client: Client::new(),
        }
    }
}

impl SceneImage {
    pub fn texture(&self) -> Option<&egui::TextureHandle> {
        self.texture.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn sync(&mut self, ctx: &egui::Context, url: Option<&str>) {
        if url != self.url.as_deref() {
            self.url = url.map(str::to_string);
            self.texture = None;
            self.pending = None;

            match url {
                Some(u) if u.starts_with("data:") => match decode_data_uri(u) {
                    Ok(img) => self.set_texture(ctx, img),
                    Err(e) => tracing::warn!(error = %e, "could not decode scene image"),
                },
                Some(u) => self.fetch(ctx, u),
                None => {}
            }
        }

        self.poll(ctx);
    }

    fn fetch(&mut self, ctx: &egui::Context, url: &str) {
        let (tx, rx) = mpsc::channel();
        let client = self.client.clone();
        let url = url.to_string();
        let ctx = ctx.clone();

        std::thread::spawn(move || {
            let result = client
                .get(&url)
                .send()
                .and_then(|r| r.error_for_status())
                .and_then(|r| r.bytes())
                .map_err(anyhow::Error::from)
                .and_then(|bytes| decode_image_bytes(&bytes));
            let _ = tx.send(result);
            ctx.request_repaint();
        });

        self.pending = Some(rx);
    }

    fn poll(&mut self, ctx: &egui::Context) {
        let Some(rx) = &self.pending else {
            return;
        };

        match rx.try_recv() {
            Ok(Ok(img)) => {
                self.pending = None;
                self.set_texture(ctx, img);
            }
            Ok(Err(e)) => {
                self.pending = None;
                tracing::warn!(error = %e, "could not load scene image");
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => self.pending = None,
        }
    }

    fn set_texture(&mut self, ctx: &egui::Context, img: egui::ColorImage) {
        self.texture = Some(ctx.load_texture("scene", img, egui::TextureOptions::LINEAR));
    }
}

pub fn decode_data_uri(uri: &str) -> Result<egui::ColorImage> {
    let (_, payload) = uri
        .split_once(";base64,")
        .ok_or_else(|| anyhow!("not a base64 data URI"))?;
    let bytes = STANDARD.decode(payload.trim()).context("bad base64 payload")?;
    decode_image_bytes(&bytes)
}

pub fn decode_image_bytes(bytes: &[u8]) -> Result<egui::ColorImage> {
    let img = image::load_from_memory(bytes)?.to_rgba8();
    let (w, h) = img.dimensions();
    Ok(egui::ColorImage::from_rgba_unmultiplied(
        [w as usize, h as usize],
        img.as_raw(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([200, 10, 10, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_base64_data_uri() {
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(tiny_png()));
        let img = decode_data_uri(&uri).unwrap();
        assert_eq!(img.size, [3, 2]);
    }

    #[test]
    fn rejects_non_base64_uri() {
        assert!(decode_data_uri("data:image/png,raw").is_err());
        assert!(decode_data_uri("data:image/png;base64,@@@").is_err());
    }
}
