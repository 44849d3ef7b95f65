use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn wire_shape_uses_type_and_params() {
    let e = Effect::new(
        EffectKind::Chase(ChaseParams {
            speed: Speed::Fast,
            direction: ChaseDirection::Forward,
        }),
        vec!["Arch".to_owned()],
        0.5,
        1.0,
        "#FF0000",
    );
    assert_eq!(
        serde_json::to_value(&e).unwrap(),
        json!({
            "type": "chase",
            "models": ["Arch"],
            "startTime": 0.5,
            "endTime": 1.0,
            "color": "#FF0000",
            "params": {"speed": "fast", "direction": "forward"}
        })
    );

    let fill = Effect::new(EffectKind::Fill, vec![], 0.0, 1.0, "#00FF00");
    assert_eq!(serde_json::to_value(&fill).unwrap()["params"], json!({}));

    let pulse = Effect::new(
        EffectKind::Pulse(PulseParams {
            intensity: Some(Intensity::Medium),
            submodel: None,
        }),
        vec![],
        0.0,
        1.0,
        "#00FF00",
    );
    assert_eq!(
        serde_json::to_value(&pulse).unwrap()["params"],
        json!({"intensity": "medium"})
    );
}

#[test]
fn missing_or_null_params_take_defaults() {
    let e: Effect = serde_json::from_value(json!({
        "type": "sparkle",
        "models": ["Tree"],
        "startTime": 1.0,
        "endTime": 1.2,
        "color": "#FFFFFF"
    }))
    .unwrap();
    assert_eq!(e.kind, EffectKind::Sparkle(SparkleParams::default()));

    let e: Effect = serde_json::from_value(json!({
        "type": "chase",
        "models": [],
        "startTime": 0.0,
        "endTime": 1.0,
        "color": "#FFFFFF",
        "params": null
    }))
    .unwrap();
    assert_eq!(e.kind, EffectKind::Chase(ChaseParams::default()));
}

#[test]
fn unknown_param_keys_are_tolerated_but_bad_values_are_not() {
    let e: Effect = serde_json::from_value(json!({
        "type": "fade",
        "models": ["A"],
        "startTime": 0.0,
        "endTime": 2.0,
        "color": "#123456",
        "params": {"direction": "out-in"}
    }))
    .unwrap();
    assert_eq!(e.kind, EffectKind::Fade);

    let bad = serde_json::from_value::<Effect>(json!({
        "type": "chase",
        "models": ["A"],
        "startTime": 0.0,
        "endTime": 2.0,
        "color": "#123456",
        "params": {"speed": "warp"}
    }));
    let err = bad.unwrap_err().to_string();
    assert!(err.contains("invalid chase params"), "{err}");

    let unknown_type = serde_json::from_value::<Effect>(json!({
        "type": "strobe",
        "models": [],
        "startTime": 0.0,
        "endTime": 1.0,
        "color": "#123456"
    }));
    assert!(unknown_type.is_err());
}

#[test]
fn degenerate_windows() {
    let mk = |s: f64, e: f64| Effect::new(EffectKind::Fill, vec![], s, e, "#FFFFFF");
    assert!(!mk(0.0, 1.0).is_degenerate());
    assert!(mk(1.0, 1.0).is_degenerate());
    assert!(mk(2.0, 1.0).is_degenerate());
    assert!(mk(f64::NAN, 1.0).is_degenerate());
    assert_eq!(mk(0.5, 2.0).duration(), 1.5);
    assert_eq!(SparkleDensity::High.probability(), 0.3);
    assert_eq!(SparkleDensity::Low.probability(), 0.15);
}
