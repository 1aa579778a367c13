//! Drawing into a bound handle with embedded-graphics
#![cfg(feature = "graphics")]

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use epaper_binder::{Color, FrameBuffer, RawConfig, Registry, configure};

fn draw_red_box(fb: &mut FrameBuffer) {
    let _ = Rectangle::new(Point::new(10, 10), Size::new(20, 5))
        .into_styled(PrimitiveStyle::with_fill(Color::Red))
        .draw(fb);
}

fn description(model: &str) -> RawConfig {
    RawConfig::new()
        .model(model)
        .dc_pin(17)
        .reset_pin(16)
        .busy_pin(4)
        .mosi_pin(23)
        .lambda(draw_red_box)
}

#[test]
fn test_draw_target_size_follows_rotation() {
    let raw = description("gdey075t7").rotation(270);
    let handle = configure(&raw, &Registry::builtin(), &mut ()).unwrap();
    assert_eq!(handle.frame_buffer().size(), Size::new(480, 800));
}

#[test]
fn test_red_on_three_color_panel() {
    let raw = description("gdew042z15");
    let mut handle = configure(&raw, &Registry::builtin(), &mut ()).unwrap();
    handle.render();
    let fb = handle.frame_buffer();
    assert_eq!(fb.pixel(10, 10), Some(Color::Red));
    assert_eq!(fb.pixel(29, 14), Some(Color::Red));
    assert_eq!(fb.pixel(30, 14), Some(Color::White));
    assert!(
        fb.red_plane()
            .is_some_and(|plane| plane.iter().any(|byte| *byte != 0))
    );
}

#[test]
fn test_red_on_black_white_panel() {
    let raw = description("gdeh029a1");
    let mut handle = configure(&raw, &Registry::builtin(), &mut ()).unwrap();
    handle.render();
    assert_eq!(handle.frame_buffer().pixel(15, 12), Some(Color::Black));
    assert_eq!(handle.frame_buffer().red_plane(), None);
}

#[test]
fn test_drawing_outside_is_clipped() {
    let mut fb = FrameBuffer::new(&epaper_binder::panel::e0213a09(), Default::default());
    let before = fb.clone();
    let _ = Rectangle::new(Point::new(-50, -50), Size::new(10, 10))
        .into_styled(PrimitiveStyle::with_fill(Color::Black))
        .draw(&mut fb);
    assert_eq!(fb, before);
}
