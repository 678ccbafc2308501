use sketch_ngin::{
    color::{Color, PAPER_COLORS, RISO_COLORS},
    easing::Easing,
    settings::{ContextKind, Dimensions, PaperOrientation, PaperSize, SketchSettings},
};

use crate::common::test_utils::assert_close;

mod common;

#[test]
fn paper_sizes_follow_pixels_per_inch() {
    let letter = SketchSettings {
        dimensions: Dimensions::Paper(PaperSize::Letter, PaperOrientation::Portrait),
        pixels_per_inch: 300.0,
        ..Default::default()
    };
    assert_eq!(letter.pixel_size((10, 10)), (2550, 3300));

    let landscape = SketchSettings {
        dimensions: Dimensions::Paper(PaperSize::Letter, PaperOrientation::Landscape),
        ..letter.clone()
    };
    assert_eq!(landscape.pixel_size((10, 10)), (3300, 2550));
}

#[test]
fn window_sketches_take_the_surface_size() {
    let settings = SketchSettings::default();
    assert_eq!(settings.pixel_size((640, 480)), (640, 480));
    let fixed = SketchSettings {
        dimensions: Dimensions::Pixels(1024, 1024),
        ..Default::default()
    };
    assert_eq!(fixed.pixel_size((640, 480)), (1024, 1024));
}

#[test]
fn duration_implies_animation() {
    let still = SketchSettings::default();
    assert!(!still.is_animated());
    let timed = SketchSettings {
        duration: Some(5.0),
        ..Default::default()
    };
    assert!(timed.is_animated());
}

#[test]
fn invalid_settings_are_rejected() {
    assert!(SketchSettings::default().validate().is_ok());
    let cases = [
        SketchSettings {
            context: ContextKind::Canvas2d,
            ..Default::default()
        },
        SketchSettings {
            duration: Some(0.0),
            ..Default::default()
        },
        SketchSettings {
            fps: 0,
            ..Default::default()
        },
        SketchSettings {
            pixels_per_inch: -1.0,
            ..Default::default()
        },
        SketchSettings {
            dimensions: Dimensions::Pixels(0, 10),
            ..Default::default()
        },
    ];
    for settings in cases {
        assert!(settings.validate().is_err(), "{:?}", settings);
    }
}

#[test]
fn every_palette_entry_parses() {
    for swatch in RISO_COLORS.iter().chain(PAPER_COLORS) {
        assert!(Color::parse(swatch.hex).is_ok(), "{} {}", swatch.name, swatch.hex);
    }
}

#[test]
fn colors_parse_from_hex_and_names() -> anyhow::Result<()> {
    assert_eq!(Color::parse("#fff")?, Color::WHITE);
    assert_eq!(Color::parse("#000000")?, Color::BLACK);
    assert_eq!(Color::parse("Tomato")?, Color::rgb(1.0, 99.0 / 255.0, 71.0 / 255.0));
    assert!(Color::parse("#12345").is_err());
    assert!(Color::parse("#gggggg").is_err());
    assert!(Color::parse("chartreuse").is_err());
    Ok(())
}

#[test]
fn hsl_matches_known_colors() {
    let red = Color::hsl(0.0, 1.0, 0.5);
    assert_close(red.r, 1.0, 1e-6);
    assert_close(red.g, 0.0, 1e-6);
    assert_close(red.b, 0.0, 1e-6);
    let gray = Color::hsl(200.0, 0.0, 0.95);
    assert_eq!(gray, Color::rgb(0.95, 0.95, 0.95));
}

#[test]
fn linear_conversion_keeps_endpoints() {
    assert_eq!(Color::BLACK.to_linear(), [0.0, 0.0, 0.0]);
    let [r, g, b] = Color::WHITE.to_linear();
    assert_close(r, 1.0, 1e-6);
    assert_close(g, 1.0, 1e-6);
    assert_close(b, 1.0, 1e-6);
    assert!(Color::rgb(0.5, 0.5, 0.5).to_linear()[0] < 0.5);
}

#[test]
fn easing_curves_span_unit_interval() {
    for easing in [Easing::Linear, Easing::ExpoOut, Easing::ExpoIn, Easing::CubicInOut] {
        assert_close(easing.apply(0.0), 0.0, 1e-3);
        assert_close(easing.apply(1.0), 1.0, 1e-6);
        assert_close(easing.apply(2.0), 1.0, 1e-6);
        let mut last = easing.apply(0.0);
        for step in 1..=50 {
            let value = easing.apply(step as f32 / 50.0);
            assert!(value >= last, "{:?} decreases at step {}", easing, step);
            last = value;
        }
    }
}
