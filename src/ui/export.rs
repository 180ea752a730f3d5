use std::path::Path;

use eframe::egui;

/// RGBA pixels of a captured region.
pub struct CapturedImage {
    pub rgba: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

/// Crop a window screenshot to `rect` (in points). `None` keeps the whole image.
pub fn crop_screenshot(
    image: &egui::ColorImage,
    rect: Option<egui::Rect>,
    pixels_per_point: f32,
) -> CapturedImage {
    let full_w = image.width();
    let full_h = image.height();

    let (x0, y0, x1, y1) = match rect {
        Some(rect) => (
            ((rect.left() * pixels_per_point).max(0.0) as usize).min(full_w),
            ((rect.top() * pixels_per_point).max(0.0) as usize).min(full_h),
            ((rect.right() * pixels_per_point).ceil() as usize).min(full_w),
            ((rect.bottom() * pixels_per_point).ceil() as usize).min(full_h),
        ),
        None => (0, 0, full_w, full_h),
    };

    let width = x1.saturating_sub(x0);
    let height = y1.saturating_sub(y0);
    let mut rgba = Vec::with_capacity(width * height * 4);
    for row in y0..y1 {
        for col in x0..x1 {
            let c = image.pixels[row * full_w + col];
            rgba.extend_from_slice(&[c.r(), c.g(), c.b(), c.a()]);
        }
    }
    CapturedImage { rgba, width, height }
}

pub fn save_png(path: &Path, captured: CapturedImage) -> Result<(), String> {
    let img = image::RgbaImage::from_raw(captured.width as u32, captured.height as u32, captured.rgba)
        .ok_or_else(|| "Captured image has an invalid size".to_string())?;
    img.save(path).map_err(|e| format!("Failed to save image: {e}"))?;
    tracing::info!("Saved chart image to {:?}", path);
    Ok(())
}

pub fn copy_to_clipboard(captured: CapturedImage) -> Result<(), String> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| format!("Failed to access clipboard: {e}"))?;
    clipboard
        .set_image(arboard::ImageData {
            width: captured.width,
            height: captured.height,
            bytes: std::borrow::Cow::Owned(captured.rgba),
        })
        .map_err(|e| format!("Failed to copy to clipboard: {e}"))?;
    tracing::info!("Copied chart image to clipboard");
    Ok(())
}
