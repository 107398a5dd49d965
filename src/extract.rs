use std::collections::HashSet;

use image::{DynamicImage, GenericImageView, imageops::FilterType};
use kmeans_colors::get_kmeans;
use palette::{IntoColor, Lab, Srgb};

use crate::bitmap::Bitmap;
use crate::color::Color;

/// Suggest up to `n_colors` palette entries for `bitmap` with k-means in
/// Lab space.
///
/// Fully transparent pixels are ignored. When `downscale` is given the
/// image is first shrunk (nearest neighbour) so its longest side is that
/// many pixels. The seed is fixed, so results are reproducible. Entries
/// come back deduplicated in centroid order.
pub fn extract_palette(bitmap: &Bitmap, n_colors: usize, downscale: Option<u32>) -> Vec<Color> {
    if n_colors == 0 {
        return Vec::new();
    }

    let img = DynamicImage::ImageRgba8(bitmap.to_image());
    let working_img = match downscale {
        Some(scale) if scale > 0 => {
            let (orig_w, orig_h) = img.dimensions();
            let max_side = orig_w.max(orig_h) as f32;
            let ratio = scale as f32 / max_side;
            let w = ((orig_w as f32) * ratio).round().max(1.0) as u32;
            let h = ((orig_h as f32) * ratio).round().max(1.0) as u32;
            DynamicImage::ImageRgba8(image::imageops::resize(&img, w, h, FilterType::Nearest))
        }
        _ => img,
    };

    let raw = working_img.to_rgba8().into_raw();

    let mut lab_pixels: Vec<Lab> = Vec::new();
    let mut distinct = HashSet::new();
    for chunk in raw.chunks_exact(4) {
        if chunk[3] == 0 {
            continue;
        }
        distinct.insert([chunk[0], chunk[1], chunk[2]]);
        let srgb = Srgb::<u8>::new(chunk[0], chunk[1], chunk[2]);
        lab_pixels.push(srgb.into_linear().into_color());
    }

    if lab_pixels.is_empty() {
        log::debug!("No opaque pixels to extract a palette from");
        return Vec::new();
    }

    // k-means++ seeding needs at least k distinct points.
    let k = n_colors.min(distinct.len());
    let kmeans = get_kmeans(k, 20, 1e-4, false, &lab_pixels, 0);

    let mut colors: Vec<Color> = Vec::with_capacity(kmeans.centroids.len());
    for &lab in &kmeans.centroids {
        let rgb_f32: Srgb<f32> = Srgb::from_linear(lab.into_color());
        let color = Color::from(rgb_f32.into_format::<u8>());
        if !colors.contains(&color) {
            colors.push(color);
        }
    }
    log::debug!("Extracted {} palette colors (k = {k})", colors.len());
    colors
}
