//! Compositing scenarios across the renderer and frame loop

use gridscene_render::{
    unit_square, DrawMode, DrawableObject, FrameLoop, Renderer, RendererConfig, Vec2, Vec3, Vec4,
};

const GREY: Vec4 = Vec4::rgba(125.0, 125.0, 125.0, 1.0);
const ORANGE: Vec4 = Vec4::rgba(200.0, 150.0, 0.0, 1.0);

fn tile(id: &str, x: f32, y: f32, color: Vec4) -> DrawableObject {
    DrawableObject::new(id, Vec2::new(x, y), unit_square(), color)
}

#[test]
fn test_grid_strokes_match_board_dimensions() {
    // 4 rows, 5 columns at 100 px per cell
    let config = RendererConfig::for_board(500, 400, 4, 5, Vec4::WHITE);
    let renderer = Renderer::new(config, Vec::new()).unwrap();
    let background = renderer.background();

    let horizontal: Vec<u32> = (0..400)
        .filter(|&y| background.pixel(50, y).map_or(false, |p| p[3] > 0))
        .collect();
    let vertical: Vec<u32> = (0..500)
        .filter(|&x| background.pixel(x, 50).map_or(false, |p| p[3] > 0))
        .collect();

    assert_eq!(horizontal, vec![100, 200, 300]);
    assert_eq!(vertical, vec![100, 200, 300, 400]);
    // thin lines are faint
    assert!(background.pixel(50, 100).unwrap()[3] < 255);
}

#[test]
fn test_static_layer_survives_every_frame() {
    let config = RendererConfig::for_board(100, 100, 2, 2, Vec4::WHITE);
    let mut renderer = Renderer::new(config, vec![tile("block-0", 0.0, 0.0, GREY)]).unwrap();
    renderer.add(tile("box-0", 0.0, 0.0, ORANGE)).unwrap();

    renderer.render();
    assert_eq!(renderer.visible().pixel(20, 20), Some([200, 150, 0, 255]));

    renderer.remove("box-0").unwrap();
    renderer.render();
    assert_eq!(renderer.visible().pixel(20, 20), Some([125, 125, 125, 255]));
}

#[test]
fn test_late_static_object_never_appears() {
    let config = RendererConfig::for_board(100, 100, 2, 2, Vec4::WHITE);
    let mut renderer = Renderer::new(config, Vec::new()).unwrap();
    renderer.render();
    let snapshot = renderer.background().data().to_vec();

    renderer.add_static(tile("target-0", 1.0, 1.0, GREY)).unwrap();
    for _ in 0..3 {
        renderer.render();
        assert_eq!(renderer.visible().pixel(75, 75), Some([0, 0, 0, 0]));
    }
    assert_eq!(renderer.background().data(), &snapshot[..]);
}

#[test]
fn test_outline_twin_draws_over_box() {
    let config = RendererConfig::for_board(100, 100, 2, 2, Vec4::WHITE);
    let mut renderer = Renderer::new(config, Vec::new()).unwrap();
    let cross = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
    ];
    renderer.add(tile("box-0", 0.0, 0.0, ORANGE)).unwrap();
    renderer
        .add(DrawableObject::new("box-line-0", Vec2::ZERO, cross, Vec4::BLACK).with_mode(DrawMode::Stroked))
        .unwrap();
    renderer.render();

    // diagonal of the cross is black, off-diagonal stays box colored
    assert_eq!(renderer.visible().pixel(25, 25), Some([0, 0, 0, 255]));
    assert_eq!(renderer.visible().pixel(10, 30), Some([200, 150, 0, 255]));
}

#[test]
fn test_composited_output_shows_background_color() {
    let config = RendererConfig::for_board(10, 10, 1, 1, Vec4::WHITE);
    let mut renderer = Renderer::new(config, Vec::new()).unwrap();
    renderer.render();
    let rgba = renderer.visible().composited_rgba();
    assert_eq!(rgba.len(), 10 * 10 * 4);
    assert!(rgba.chunks_exact(4).all(|px| px == [255, 255, 255, 255]));
}

#[test]
fn test_loop_stopped_from_callback_renders_once() {
    let config = RendererConfig::for_board(20, 20, 2, 2, Vec4::WHITE);
    let mut frames = FrameLoop::new(Renderer::new(config, Vec::new()).unwrap());
    let handle = frames.handle();
    frames.start(move || handle.stop()).unwrap();

    assert!(frames.tick());
    assert!(!frames.tick());
    assert_eq!(frames.renderer().frames_rendered(), 1);
}

#[test]
fn test_oversized_object_renders_in_bounded_time() {
    let config = RendererConfig::for_board(100, 100, 2, 2, Vec4::WHITE);
    let mut renderer = Renderer::new(config, Vec::new()).unwrap();
    renderer
        .add(tile("wide", 0.0, 0.0, ORANGE).with_scale(Vec2::new(1.0e7, 1.0)))
        .unwrap();
    renderer
        .add(
            tile("wide-line", 0.0, 1.0, GREY)
                .with_scale(Vec2::new(1.0e7, 1.0))
                .with_mode(DrawMode::Stroked),
        )
        .unwrap();

    let start = std::time::Instant::now();
    renderer.render();
    assert!(start.elapsed() < std::time::Duration::from_secs(2));
    assert_eq!(renderer.visible().pixel(90, 20), Some([200, 150, 0, 255]));
}
