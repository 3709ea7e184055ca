use device_telemetry::icon::{
    cache_file_name, AdaptiveIconDrawable, ColorDrawable, IconCache, IconRenderer, IconResource,
};
use image::{Rgba, RgbaImage};
use std::fs;

fn adaptive(size: i32) -> IconResource {
    IconResource::vector(AdaptiveIconDrawable {
        background: [0x20, 0x40, 0x60, 0xff],
        foreground: [0xff, 0xcc, 0x00, 0xff],
        intrinsic: Some((size, size)),
    })
}

#[test]
fn test_zero_intrinsic_size_renders_48_square() {
    let renderer = IconRenderer::default();
    let zero = IconResource::vector(ColorDrawable::new([10, 20, 30, 255]).with_size(0, 0));
    let none = IconResource::vector(ColorDrawable::new([10, 20, 30, 255]));

    for resource in [zero, none] {
        let bitmap = renderer.render(&resource).expect("must not fail");
        assert_eq!(bitmap.dimensions(), (48, 48));
        assert_eq!(*bitmap.get_pixel(0, 0), Rgba([10, 20, 30, 255]));
    }
}

#[test]
fn test_persisting_twice_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let cache = IconCache::new(dir.path().join("app_icons"), IconRenderer::default());
    let resource = adaptive(108);

    let first = cache.materialize(&resource, "com.app.browser").unwrap();
    let first_bytes = fs::read(&first).unwrap();

    let second = cache.materialize(&resource, "com.app.browser").unwrap();
    let second_bytes = fs::read(&second).unwrap();

    assert_eq!(first, second);
    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn test_cache_dir_created_lazily_with_sanitized_name() {
    let dir = tempfile::tempdir().unwrap();
    let icon_dir = dir.path().join("nested").join("app_icons");
    let cache = IconCache::new(&icon_dir, IconRenderer::default());
    assert!(!icon_dir.exists());

    let path = cache.persist(&RgbaImage::new(4, 4), "com.example.child_track").unwrap();

    assert!(icon_dir.is_dir());
    assert_eq!(path, icon_dir.join("com_example_child_track.png"));
    assert_eq!(cache_file_name("com.example.child_track"), "com_example_child_track.png");

    // No temp files left behind
    let entries: Vec<_> = fs::read_dir(&icon_dir).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_regenerates_after_cache_purge() {
    let dir = tempfile::tempdir().unwrap();
    let icon_dir = dir.path().join("app_icons");
    let cache = IconCache::new(&icon_dir, IconRenderer::default());
    let resource = adaptive(72);

    let path = cache.materialize(&resource, "com.a").unwrap();
    let before = fs::read(&path).unwrap();

    fs::remove_dir_all(&icon_dir).unwrap();

    let path = cache.materialize(&resource, "com.a").unwrap();
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn test_io_failure_yields_none() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where the cache directory should be
    let blocker = dir.path().join("app_icons");
    fs::write(&blocker, b"not a directory").unwrap();

    let cache = IconCache::new(&blocker, IconRenderer::default());
    assert_eq!(cache.persist(&RgbaImage::new(2, 2), "com.a"), None);
}

#[test]
fn test_cached_file_decodes_to_rendered_pixels() {
    let dir = tempfile::tempdir().unwrap();
    let cache = IconCache::new(dir.path(), IconRenderer::default());
    let resource = adaptive(30);

    let path = cache.materialize(&resource, "com.a").unwrap();
    let decoded = image::open(&path).unwrap().to_rgba8();
    let rendered = IconRenderer::default().render(&resource).unwrap().into_owned();

    assert_eq!(decoded.dimensions(), (30, 30));
    assert_eq!(decoded, rendered);
}

#[test]
fn test_inline_is_deterministic_and_downsampled() {
    let renderer = IconRenderer::default();
    let resource = IconResource::Raster(RgbaImage::from_pixel(192, 192, Rgba([1, 2, 3, 255])));

    let a = renderer.inline(&resource).unwrap();
    let b = renderer.inline(&resource).unwrap();
    assert_eq!(a, b);

    use base64::Engine as _;
    let png = base64::engine::general_purpose::STANDARD.decode(&a).unwrap();
    let img = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (64, 64));
}
