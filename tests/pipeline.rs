//! End-to-end checks of resolve, validate and bind against the built-in registry

use core::time::Duration;

use epaper_binder::validate::{validate, validate_cadence_option};
use epaper_binder::{
    Advisory, Attachment, BindError, CapabilityClass, Color, ConfigError, Error, FrameBuffer,
    ModelEntry, Page, RawConfig, Registry, RenderStrategy, ValidationOutcome, bind, configure,
    panel,
};

fn draw_frame(fb: &mut FrameBuffer) {
    for x in 0..fb.width() {
        fb.set_pixel(x, 0, Color::Black);
    }
}

fn draw_nothing(_: &mut FrameBuffer) {}

fn description(model: &str) -> RawConfig {
    RawConfig::new()
        .id("epd")
        .model(model)
        .dc_pin(17)
        .reset_pin(16)
        .busy_pin(4)
        .mosi_pin(23)
}

#[test]
fn test_every_builtin_model_binds() {
    let registry = Registry::builtin();
    for id in registry.all_model_ids() {
        let handle = configure(&description(id), &registry, &mut ()).unwrap();
        let entry = registry.lookup(id).unwrap();
        assert_eq!(handle.model(), id);
        assert_eq!(*handle.panel(), (entry.constructor)());
        assert_eq!(
            handle.frame_buffer().as_bytes().len(),
            handle.panel().buffer_size()
        );
    }
}

#[test]
fn test_cadence_attached_for_class_c() {
    let registry = Registry::builtin();
    let raw = description("e0213a09").full_update_every(5);

    let config = raw.resolve(&registry).unwrap();
    assert_eq!(validate(&registry, &config), Ok(ValidationOutcome::Ok));

    let handle = bind(&registry, config).unwrap();
    assert_eq!(handle.full_update_every(), Some(5));
    assert!(handle.attachments().contains(&Attachment::FullUpdateEvery));
}

#[test]
fn test_cadence_advisory_for_class_b() {
    let registry = Registry::builtin();
    let raw = description("gdew042z15").full_update_every(5);

    let mut advisories: Vec<Advisory> = Vec::new();
    let handle = configure(&raw, &registry, &mut advisories).unwrap();

    assert_eq!(
        advisories,
        vec![Advisory::Cadence {
            model: "gdew042z15",
            supported: vec![
                "depg0420",
                "e0213a09",
                "gdeh029a1",
                "gdem029t94",
                "gdeq0426t82",
                "gdew029t5d",
                "gdew042m01",
                "gdey029z95",
                "gdey075t7",
                "p750057-mf1-a",
            ],
        }]
    );
    assert_eq!(handle.capability_class(), CapabilityClass::B);
    assert_eq!(handle.full_update_every(), None);
    assert!(!handle.attachments().contains(&Attachment::FullUpdateEvery));
}

#[test]
fn test_advisory_lists_every_non_class_b_model() {
    let registry = Registry::builtin();
    let outcome = validate_cadence_option(&registry, "gdew042z15", true).unwrap();
    let expected = registry.model_ids_where(|class| class != CapabilityClass::B);
    assert!(matches!(
        outcome.advisory(),
        Some(Advisory::Cadence { supported, .. }) if *supported == expected
    ));
}

#[test]
fn test_validation_without_cadence_is_silent() {
    let registry = Registry::builtin();
    for id in registry.all_model_ids() {
        assert_eq!(
            validate_cadence_option(&registry, id, false),
            Ok(ValidationOutcome::Ok)
        );
    }
}

#[test]
fn test_unknown_model_rejected_before_binding() {
    let result = configure(&description("gdew0154"), &Registry::builtin(), &mut ());
    assert_eq!(
        result.map(|_| ()),
        Err(Error::Config(ConfigError::UnknownModel {
            model: "gdew0154".to_string()
        }))
    );
}

#[test]
fn test_reset_duration_limit() {
    let registry = Registry::builtin();

    let raw = description("gdey075t7").reset_duration("500ms");
    let handle = configure(&raw, &registry, &mut ()).unwrap();
    assert_eq!(handle.reset_duration(), Some(Duration::from_millis(500)));
    assert_eq!(handle.attachments().last(), Some(&Attachment::ResetDuration));

    let result = description("gdey075t7")
        .reset_duration("501ms")
        .resolve(&registry);
    assert!(matches!(
        result,
        Err(ConfigError::OutOfRangeValue {
            field: "reset_duration",
            value: 501,
            ..
        })
    ));
}

#[test]
fn test_pages_and_lambda_conflict() {
    let raw = description("gdey075t7")
        .lambda(draw_nothing)
        .page(Page::new("main", draw_frame));
    assert_eq!(
        raw.resolve(&Registry::builtin()),
        Err(ConfigError::ConflictingRenderStrategy)
    );
}

#[test]
fn test_writer_runs_on_render() {
    let raw = description("gdew042m01").lambda(draw_frame);
    let mut handle = configure(&raw, &Registry::builtin(), &mut ()).unwrap();
    handle.render();
    let fb = handle.frame_buffer();
    assert_eq!(fb.pixel(0, 0), Some(Color::Black));
    assert_eq!(fb.pixel(399, 0), Some(Color::Black));
    assert_eq!(fb.pixel(0, 1), Some(Color::White));
}

#[test]
fn test_resolving_twice_binds_equal_handles() {
    let registry = Registry::builtin();
    let raw = description("gdeq0426t82")
        .full_update_every(12)
        .reset_duration(Duration::from_millis(2))
        .page(Page::new("clock", draw_frame))
        .page(Page::new("weather", draw_nothing));

    let first = raw.resolve(&registry).unwrap();
    let second = raw.resolve(&registry).unwrap();
    assert_eq!(first, second);
    assert!(matches!(
        first.render,
        Some(RenderStrategy::StaticPages(ref pages)) if pages.len() == 2
    ));

    assert_eq!(bind(&registry, first).unwrap(), bind(&registry, second).unwrap());
}

#[test]
fn test_class_a_entry_is_a_bind_fault() {
    static LEGACY: [ModelEntry; 2] = [
        ModelEntry::new("gdeh0154d67", CapabilityClass::A, panel::gdeh029a1),
        ModelEntry::new("gdeh029a1", CapabilityClass::C, panel::gdeh029a1),
    ];
    let registry = Registry::new(&LEGACY);

    let mut advisories: Vec<Advisory> = Vec::new();
    let result = configure(
        &description("gdeh0154d67").full_update_every(3),
        &registry,
        &mut advisories,
    );
    assert!(advisories.is_empty());
    assert_eq!(
        result.map(|_| ()),
        Err(Error::Bind(BindError::UnsupportedCapabilityClass {
            model: "gdeh0154d67",
            class: CapabilityClass::A,
        }))
    );

    assert!(configure(&description("gdeh029a1"), &registry, &mut ()).is_ok());
}
