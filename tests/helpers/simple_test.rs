//! Simple test infrastructure for basic testing
//!
//! Temporary asset directories with real product images and a logo, plus
//! settings pointing at them.

use std::path::{Path, PathBuf};
use std::sync::Once;
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use banner_buddy::config::Settings;

static INIT: Once = Once::new();

/// Initialize test environment
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt::try_init();
    });
}

/// Temporary assets directory for one test
pub struct TestAssets {
    pub temp_dir: tempfile::TempDir,
}

impl TestAssets {
    /// Create product images with the given filenames plus `logo.png`
    pub fn new(product_images: &[&str]) -> Self {
        init_test_env();

        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let assets = Self { temp_dir };

        for (i, name) in product_images.iter().enumerate() {
            assets.write_product_image(name, 320 + 40 * i as u32, 240);
        }
        assets.write_logo();
        assets
    }

    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn logo_path(&self) -> PathBuf {
        self.dir().join("logo.png")
    }

    pub fn output_path(&self) -> PathBuf {
        self.dir().join("out").join("final_banner.jpg")
    }

    /// Write a gradient product photo of the given size
    pub fn write_product_image(&self, name: &str, width: u32, height: u32) -> PathBuf {
        let image = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 96])
        });
        let path = self.dir().join(name);
        image.save(&path).expect("Failed to save product image");
        path
    }

    /// Red square logo with a transparent border
    fn write_logo(&self) {
        let logo = RgbaImage::from_fn(50, 50, |x, y| {
            if (10..40).contains(&x) && (10..40).contains(&y) {
                Rgba([220, 20, 20, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        logo.save(self.logo_path()).expect("Failed to save logo");
    }

    /// Settings wired to this assets directory
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        settings.bot.token = "12345:test_token".to_string();
        settings.model.api_key = "test-key".to_string();
        settings.catalog.assets_dir = self.dir().display().to_string();
        settings.catalog.logo_path = self.logo_path().display().to_string();
        settings.banner.output_path = self.output_path().display().to_string();
        settings.banner.font_path = None;
        settings
    }
}
