//! Banner compositor tests

mod helpers;

use assert_matches::assert_matches;
use base64::Engine;
use banner_buddy::config::TextColorPolicy;
use banner_buddy::models::{Layout, Placement};
use banner_buddy::services::{BannerCompositor, BannerFont};
use banner_buddy::utils::errors::CompositeError;
use helpers::*;

fn layout() -> Layout {
    Layout {
        text_placement: Placement { x: 30, y: 25 },
        text_color: "#00FF00".to_string(),
        logo_placement: Placement { x: 780, y: 20 },
    }
}

fn compositor(assets: &TestAssets) -> BannerCompositor {
    BannerCompositor::with_font(assets.settings().banner, assets.logo_path(), BannerFont::Bitmap)
}

#[tokio::test]
async fn test_banner_is_resized_saved_and_encoded() {
    let assets = TestAssets::new(&[]);
    let base = assets.write_product_image("tall.jpg", 300, 600);

    let banner = compositor(&assets)
        .composite(&base, "Summer Sale", "Everything must go", &layout())
        .await
        .unwrap();

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(&banner.base64)
        .unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (900, 450));

    assert_eq!(banner.saved_path, assets.output_path().display().to_string());
    assert_eq!(std::fs::read(assets.output_path()).unwrap(), bytes);
}

#[tokio::test]
async fn test_second_banner_overwrites_first() {
    let assets = TestAssets::new(&[]);
    let first = assets.write_product_image("a.jpg", 400, 200);
    let second = assets.write_product_image("b.jpg", 200, 400);
    let compositor = compositor(&assets);

    let one = compositor.composite(&first, "One", "First", &layout()).await.unwrap();
    let two = compositor.composite(&second, "Two", "Second", &layout()).await.unwrap();

    assert_eq!(one.saved_path, two.saved_path);
    let on_disk = std::fs::read(assets.output_path()).unwrap();
    let expected = base64::engine::general_purpose::STANDARD.decode(&two.base64).unwrap();
    assert_eq!(on_disk, expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_banners_leave_one_whole_file() {
    let assets = TestAssets::new(&[]);
    let wide = assets.write_product_image("wide.jpg", 800, 200);
    let tall = assets.write_product_image("tall.jpg", 200, 800);
    let compositor = compositor(&assets);
    let other = compositor.clone();

    for _ in 0..4 {
        let layout_a = layout();
        let layout_b = layout();
        let (a, b) = tokio::join!(
            compositor.composite(&wide, "Chat A", "First banner", &layout_a),
            other.composite(&tall, "Chat B", "Second banner", &layout_b),
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        let on_disk = std::fs::read(assets.output_path()).unwrap();
        let decode = |payload: &str| base64::engine::general_purpose::STANDARD.decode(payload).unwrap();
        assert!(on_disk == decode(&a.base64) || on_disk == decode(&b.base64));

        let decoded = image::load_from_memory(&on_disk).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (900, 450));
    }

    let leftovers: Vec<_> = std::fs::read_dir(assets.output_path().parent().unwrap())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, vec![std::ffi::OsString::from("final_banner.jpg")]);
}

#[test]
fn test_logo_is_pasted_through_alpha() {
    let assets = TestAssets::new(&[]);
    let base = assets.write_product_image("plain.jpg", 900, 450);
    let mut layout = layout();
    layout.logo_placement = Placement { x: 400, y: 300 };

    let canvas = compositor(&assets)
        .compose(&base, "", "", &layout)
        .unwrap();

    // 50px logo scaled to 100px: opaque red core, transparent border
    let core = canvas.get_pixel(450, 350);
    assert!(core[0] > 180 && core[1] < 80 && core[2] < 80, "core {:?}", core);

    let border = canvas.get_pixel(405, 305);
    assert!(border[0] < 200 || border[1] > 80, "border {:?}", border);
}

#[test]
fn test_suggested_color_policy_uses_layout_color() {
    let assets = TestAssets::new(&[]);
    let mut config = assets.settings().banner;
    config.text_color_policy = TextColorPolicy::Suggested;
    let compositor = BannerCompositor::with_font(config, assets.logo_path(), BannerFont::Bitmap);

    assert_eq!(compositor.text_color(&layout()).0, [0, 255, 0, 255]);
}

#[tokio::test]
async fn test_missing_base_image() {
    let assets = TestAssets::new(&[]);

    let err = compositor(&assets)
        .composite(&assets.dir().join("nope.jpg"), "H", "D", &layout())
        .await
        .unwrap_err();

    assert_matches!(err, CompositeError::BaseImage { .. });
    assert!(!assets.output_path().exists());
}

#[tokio::test]
async fn test_missing_logo() {
    let assets = TestAssets::new(&[]);
    let base = assets.write_product_image("base.jpg", 300, 300);
    std::fs::remove_file(assets.logo_path()).unwrap();

    let err = compositor(&assets)
        .composite(&base, "H", "D", &layout())
        .await
        .unwrap_err();

    assert_matches!(err, CompositeError::Logo { .. });
}
