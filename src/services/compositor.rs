//! Banner compositor service
//!
//! Renders the final banner: the product photo resized to the canvas, the
//! logo pasted through its own alpha channel, and the headline and
//! description drawn as outlined text. The result is saved to disk and
//! returned base64-encoded.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use base64::Engine;
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::imageops::FilterType;
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use rusttype::{point, Font, Scale};
use tracing::{debug, info, warn};
use crate::config::{BannerConfig, TextColorPolicy};
use crate::models::{BannerPayload, Layout};
use crate::utils::errors::CompositeError;
use crate::utils::helpers::parse_hex_color;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const JPEG_QUALITY: u8 = 90;

/// Fonts tried when the configured font cannot be loaded
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Font used to draw banner text
#[derive(Clone)]
pub enum BannerFont {
    TrueType(Arc<Font<'static>>),
    /// Built-in 8x8 bitmap font scaled to the requested size
    Bitmap,
}

impl std::fmt::Debug for BannerFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BannerFont::TrueType(_) => write!(f, "BannerFont::TrueType"),
            BannerFont::Bitmap => write!(f, "BannerFont::Bitmap"),
        }
    }
}

impl BannerFont {
    /// Load the configured font, then system fonts, then the built-in bitmap font
    pub fn load(font_path: Option<&str>) -> Self {
        let configured = font_path.into_iter();
        for path in configured.chain(SYSTEM_FONT_CANDIDATES.iter().copied()) {
            if let Some(font) = Self::from_file(path) {
                info!(font = path, "Loaded banner font");
                return font;
            }
        }

        warn!(font = ?font_path, "No TrueType font available, using built-in bitmap font");
        BannerFont::Bitmap
    }

    /// Load a TrueType font file, `None` when missing or unparsable
    pub fn from_file(path: impl AsRef<Path>) -> Option<Self> {
        let bytes = std::fs::read(path.as_ref()).ok()?;
        Font::try_from_vec(bytes).map(|font| BannerFont::TrueType(Arc::new(font)))
    }

    /// Rasterize `text` with its top-left corner at (`x`, `y`)
    ///
    /// The mask is padded by `pad` pixels on every side so it can be dilated,
    /// and never extends more than `pad` pixels past a canvas of size `clip`.
    fn rasterize(&self, text: &str, size: f32, x: i64, y: i64, pad: i64, clip: (i64, i64)) -> TextMask {
        match self {
            BannerFont::TrueType(font) => rasterize_truetype(font, text, size, x, y, pad, clip),
            BannerFont::Bitmap => rasterize_bitmap(text, size, x, y, pad, clip),
        }
    }
}

/// Glyph coverage over a rectangle of canvas coordinates
#[derive(Debug, Clone)]
struct TextMask {
    left: i64,
    top: i64,
    width: i64,
    height: i64,
    coverage: Vec<f32>,
}

impl TextMask {
    fn new(left: i64, top: i64, width: i64, height: i64) -> Self {
        let (width, height) = (width.max(0), height.max(0));
        Self {
            left,
            top,
            width,
            height,
            coverage: vec![0.0; (width * height) as usize],
        }
    }

    /// Mask over the given rectangle intersected with the canvas grown by `pad`
    fn clipped(left: i64, top: i64, width: i64, height: i64, clip: (i64, i64), pad: i64) -> Self {
        let right = (left + width).min(clip.0 + pad);
        let bottom = (top + height).min(clip.1 + pad);
        let (left, top) = (left.max(-pad), top.max(-pad));
        Self::new(left, top, right - left, bottom - top)
    }

    fn index(&self, mx: i64, my: i64) -> Option<usize> {
        if mx < 0 || my < 0 || mx >= self.width || my >= self.height {
            return None;
        }
        Some((my * self.width + mx) as usize)
    }

    /// Record coverage at absolute canvas coordinates
    fn add(&mut self, px: i64, py: i64, value: f32) {
        if let Some(idx) = self.index(px - self.left, py - self.top) {
            self.coverage[idx] = self.coverage[idx].max(value.clamp(0.0, 1.0));
        }
    }

    fn get(&self, mx: i64, my: i64) -> f32 {
        self.index(mx, my).map(|idx| self.coverage[idx]).unwrap_or(0.0)
    }

    /// Grow the covered area by a disc of `radius` pixels
    fn dilate(&self, radius: i64) -> TextMask {
        if radius <= 0 {
            return self.clone();
        }

        let offsets: Vec<(i64, i64)> = (-radius..=radius)
            .flat_map(|dy| (-radius..=radius).map(move |dx| (dx, dy)))
            .filter(|(dx, dy)| dx * dx + dy * dy <= radius * radius)
            .collect();

        let mut out = TextMask::new(self.left, self.top, self.width, self.height);
        for my in 0..self.height {
            for mx in 0..self.width {
                let value = offsets
                    .iter()
                    .map(|(dx, dy)| self.get(mx - dx, my - dy))
                    .fold(0.0_f32, f32::max);
                out.coverage[(my * self.width + mx) as usize] = value;
            }
        }
        out
    }

    /// Alpha-blend `color` onto the canvas wherever the mask has coverage
    fn blend_onto(&self, canvas: &mut RgbImage, color: Rgba<u8>) {
        for my in 0..self.height {
            for mx in 0..self.width {
                let alpha = self.coverage[(my * self.width + mx) as usize];
                if alpha <= 0.0 {
                    continue;
                }
                let (px, py) = (self.left + mx, self.top + my);
                if px < 0 || py < 0 || px >= canvas.width() as i64 || py >= canvas.height() as i64 {
                    continue;
                }
                let dst = canvas.get_pixel_mut(px as u32, py as u32);
                *dst = blend(*dst, color, alpha);
            }
        }
    }
}

fn blend(dst: Rgb<u8>, src: Rgba<u8>, alpha: f32) -> Rgb<u8> {
    let inv = 1.0 - alpha;
    let mix = |s: u8, d: u8| (s as f32 * alpha + d as f32 * inv).round() as u8;
    Rgb([mix(src.0[0], dst.0[0]), mix(src.0[1], dst.0[1]), mix(src.0[2], dst.0[2])])
}

fn rasterize_truetype(
    font: &Font<'static>,
    text: &str,
    size: f32,
    x: i64,
    y: i64,
    pad: i64,
    clip: (i64, i64),
) -> TextMask {
    let scale = Scale::uniform(size);
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<_> = font
        .layout(text, scale, point(x as f32, y as f32 + v_metrics.ascent))
        .collect();

    let advance = glyphs
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width - x as f32)
        .unwrap_or(0.0);
    // Overhanging glyphs (italics, wide serifs) can extend past the advance
    let overhang = (size / 4.0).ceil() as i64;
    let width = advance.ceil() as i64 + 2 * (pad + overhang);
    let height = (v_metrics.ascent - v_metrics.descent).ceil() as i64 + 2 * (pad + overhang);

    let mut mask = TextMask::clipped(x - pad - overhang, y - pad - overhang, width, height, clip, pad);
    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            if bb.min.x as i64 > clip.0 + pad {
                break;
            }
            glyph.draw(|gx, gy, value| {
                mask.add(bb.min.x as i64 + gx as i64, bb.min.y as i64 + gy as i64, value);
            });
        }
    }
    mask
}

fn bitmap_glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn rasterize_bitmap(text: &str, size: f32, x: i64, y: i64, pad: i64, clip: (i64, i64)) -> TextMask {
    let cell = ((size / 8.0).round() as i64).max(1);
    let glyph_width = 8 * cell;
    let count = text.chars().count() as i64;

    let mut mask = TextMask::clipped(
        x - pad,
        y - pad,
        count * glyph_width + 2 * pad,
        glyph_width + 2 * pad,
        clip,
        pad,
    );
    for (i, ch) in text.chars().enumerate() {
        let origin_x = x + i as i64 * glyph_width;
        if origin_x > clip.0 + pad {
            break;
        }
        for (row, bits) in bitmap_glyph(ch).iter().enumerate() {
            for col in 0..8 {
                if bits & (1 << col) == 0 {
                    continue;
                }
                let cell_x = origin_x + col as i64 * cell;
                let cell_y = y + row as i64 * cell;
                for dy in 0..cell {
                    for dx in 0..cell {
                        mask.add(cell_x + dx, cell_y + dy, 1.0);
                    }
                }
            }
        }
    }
    mask
}

/// Paste `overlay` at (`x`, `y`) using its alpha channel as the mask
///
/// Pixels falling outside the canvas are clipped.
pub fn paste_with_alpha(canvas: &mut RgbImage, overlay: &RgbaImage, x: u32, y: u32) {
    for oy in 0..overlay.height() {
        for ox in 0..overlay.width() {
            let pixel = overlay.get_pixel(ox, oy);
            let alpha = pixel.0[3] as f32 / 255.0;
            if alpha <= 0.0 {
                continue;
            }
            let (bx, by) = (x as u64 + ox as u64, y as u64 + oy as u64);
            if bx >= canvas.width() as u64 || by >= canvas.height() as u64 {
                continue;
            }
            let dst = canvas.get_pixel_mut(bx as u32, by as u32);
            *dst = blend(*dst, *pixel, alpha);
        }
    }
}

/// Banner compositor
///
/// Clones share one save lock, so concurrent renders never interleave
/// writes to the output file.
#[derive(Debug, Clone)]
pub struct BannerCompositor {
    config: BannerConfig,
    logo_path: PathBuf,
    font: BannerFont,
    save_lock: Arc<Mutex<()>>,
}

impl BannerCompositor {
    /// Create a compositor, resolving the font once up front
    pub fn new(config: BannerConfig, logo_path: impl Into<PathBuf>) -> Self {
        let font = BannerFont::load(config.font_path.as_deref());
        Self::with_font(config, logo_path, font)
    }

    pub fn with_font(config: BannerConfig, logo_path: impl Into<PathBuf>, font: BannerFont) -> Self {
        Self {
            config,
            logo_path: logo_path.into(),
            font,
            save_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Colour for overlaid text under the configured policy
    pub fn text_color(&self, layout: &Layout) -> Rgba<u8> {
        let fallback = parse_hex_color(&self.config.fallback_text_color).unwrap_or(WHITE);
        match self.config.text_color_policy {
            TextColorPolicy::Fixed => fallback,
            TextColorPolicy::Suggested => parse_hex_color(&layout.text_color).unwrap_or_else(|| {
                debug!(suggested = %layout.text_color, "Unusable suggested text color, using fallback");
                fallback
            }),
        }
    }

    /// Render the banner on the blocking pool, bounded by the configured timeout
    pub async fn composite(
        &self,
        base_image: &Path,
        headline: &str,
        description: &str,
        layout: &Layout,
    ) -> Result<BannerPayload, CompositeError> {
        let compositor = self.clone();
        let base_image = base_image.to_path_buf();
        let headline = headline.to_string();
        let description = description.to_string();
        let layout = layout.clone();
        let cancelled = Arc::new(AtomicBool::new(false));
        let task_cancelled = cancelled.clone();

        let task = tokio::task::spawn_blocking(move || {
            compositor.render_unless_cancelled(&base_image, &headline, &description, &layout, &task_cancelled)
        });

        match tokio::time::timeout(Duration::from_secs(self.config.timeout_seconds), task).await {
            Err(_) => {
                // The blocking render keeps running; stop it from saving a stale banner
                cancelled.store(true, Ordering::SeqCst);
                Err(CompositeError::Timeout)
            }
            Ok(Err(join_error)) => Err(CompositeError::Task(join_error.to_string())),
            Ok(Ok(result)) => result,
        }
    }

    /// Render, save and encode the banner synchronously
    pub fn render(
        &self,
        base_image: &Path,
        headline: &str,
        description: &str,
        layout: &Layout,
    ) -> Result<BannerPayload, CompositeError> {
        self.render_unless_cancelled(base_image, headline, description, layout, &AtomicBool::new(false))
    }

    fn render_unless_cancelled(
        &self,
        base_image: &Path,
        headline: &str,
        description: &str,
        layout: &Layout,
        cancelled: &AtomicBool,
    ) -> Result<BannerPayload, CompositeError> {
        info!(image = %base_image.display(), headline = headline, "Compositing banner");

        let canvas = self.compose(base_image, headline, description, layout)?;
        let jpeg = encode_jpeg(&canvas)?;
        let saved_path = self.save(&jpeg, cancelled)?;

        Ok(BannerPayload {
            base64: base64::engine::general_purpose::STANDARD.encode(&jpeg),
            saved_path: saved_path.display().to_string(),
        })
    }

    /// Build the banner canvas in memory
    pub fn compose(
        &self,
        base_image: &Path,
        headline: &str,
        description: &str,
        layout: &Layout,
    ) -> Result<RgbImage, CompositeError> {
        let base = image::open(base_image).map_err(|source| CompositeError::BaseImage {
            path: base_image.display().to_string(),
            source,
        })?;
        let mut canvas = image::imageops::resize(
            &base.to_rgb8(),
            self.config.width,
            self.config.height,
            FilterType::CatmullRom,
        );
        debug!(width = canvas.width(), height = canvas.height(), "Base image loaded");

        let logo = image::open(&self.logo_path).map_err(|source| CompositeError::Logo {
            path: self.logo_path.display().to_string(),
            source,
        })?;
        let logo = image::imageops::resize(
            &logo.to_rgba8(),
            self.config.logo_size,
            self.config.logo_size,
            FilterType::CatmullRom,
        );
        paste_with_alpha(&mut canvas, &logo, layout.logo_placement.x, layout.logo_placement.y);
        debug!(x = layout.logo_placement.x, y = layout.logo_placement.y, "Logo pasted");

        let fill = self.text_color(layout);
        let stroke = parse_hex_color(&self.config.stroke_color).unwrap_or(BLACK);
        let x = layout.text_placement.x as i64;
        let y = layout.text_placement.y as i64;

        self.draw_outlined(&mut canvas, headline, self.config.headline_size, x, y, fill, stroke);
        self.draw_outlined(
            &mut canvas,
            description,
            self.config.description_size,
            x,
            y + self.config.description_offset as i64,
            fill,
            stroke,
        );

        Ok(canvas)
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_outlined(
        &self,
        canvas: &mut RgbImage,
        text: &str,
        size: f32,
        x: i64,
        y: i64,
        fill: Rgba<u8>,
        stroke: Rgba<u8>,
    ) {
        if text.is_empty() {
            return;
        }

        let stroke_width = self.config.stroke_width as i64;
        let clip = (canvas.width() as i64, canvas.height() as i64);
        let mask = self.font.rasterize(text, size, x, y, stroke_width, clip);
        if stroke_width > 0 {
            mask.dilate(stroke_width).blend_onto(canvas, stroke);
        }
        mask.blend_onto(canvas, fill);
    }

    /// Replace the output file with `jpeg`: written beside it, then renamed over it
    fn save(&self, jpeg: &[u8], cancelled: &AtomicBool) -> Result<PathBuf, CompositeError> {
        let path = PathBuf::from(&self.config.output_path);
        let save_error = |source| CompositeError::Save {
            path: path.display().to_string(),
            source,
        };

        let _guard = self.save_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if cancelled.load(Ordering::SeqCst) {
            warn!(path = %path.display(), "Render finished after timeout, banner not saved");
            return Err(CompositeError::Timeout);
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(save_error)?;
        }
        let tmp_path = temp_path_for(&path);
        let mut file = std::fs::File::create(&tmp_path).map_err(save_error)?;
        file.write_all(jpeg).map_err(save_error)?;
        drop(file);
        std::fs::rename(&tmp_path, &path).map_err(save_error)?;

        info!(path = %path.display(), bytes = jpeg.len(), "Banner saved");
        Ok(path)
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

fn encode_jpeg(canvas: &RgbImage) -> Result<Vec<u8>, CompositeError> {
    let mut bytes = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
    encoder
        .encode(canvas.as_raw(), canvas.width(), canvas.height(), image::ColorType::Rgb8)
        .map_err(CompositeError::Encode)?;
    Ok(bytes)
}
