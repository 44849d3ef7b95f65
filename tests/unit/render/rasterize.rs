use super::*;
use crate::constraints::Speed;
use crate::effect::{PulseParams, SparkleDensity};
use pretty_assertions::assert_eq;

fn model(name: &str, start: u32, count: u32) -> Model {
    Model {
        name: name.to_owned(),
        start_channel: start,
        channel_count: count,
        ..Model::default()
    }
}

fn layout(models: Vec<Model>, total_channels: u32) -> Layout {
    Layout {
        models,
        total_channels,
        ..Layout::default()
    }
}

fn on(kind: EffectKind, models: &[&str], start: f64, end: f64, color: &str) -> Effect {
    Effect::new(
        kind,
        models.iter().map(|m| (*m).to_owned()).collect(),
        start,
        end,
        color,
    )
}

#[test]
fn pulse_ramps_up_holds_and_ramps_down() {
    let layout = layout(vec![model("Star", 1, 3)], 3);
    let effects = [on(
        EffectKind::Pulse(PulseParams::default()),
        &["Star"],
        0.0,
        1.0,
        "#00FF00",
    )];
    let buf = render(&effects, &layout, 1.0);

    assert_eq!(buf.frame_count(), 20);
    assert_eq!(buf.frame(0), Some(&[0, 0, 0][..]));
    assert_eq!(buf.frame(10), Some(&[0, 255, 0][..]));
    let last = buf.frame(19).unwrap();
    assert!(last[1] > 0 && last[1] < 255, "frame 19 green = {}", last[1]);
    assert_eq!((last[0], last[2]), (0, 0));
}

#[test]
fn pulse_lights_every_triplet() {
    let layout = layout(vec![model("Arch", 1, 12)], 12);
    let pulse = EffectKind::Pulse(PulseParams::default());
    let effects = [on(pulse, &["Arch"], 0.0, 1.0, "#FF0000")];
    let buf = render(&effects, &layout, 1.0);
    let lit = [255, 0, 0, 255, 0, 0, 255, 0, 0, 255, 0, 0];
    assert_eq!(buf.frame(10).unwrap(), &lit);
}

#[test]
fn fill_covers_models_and_leaves_other_channels_dark() {
    let layout = layout(vec![model("A", 1, 6), model("B", 7, 3)], 12);
    let effects = [on(EffectKind::Fill, &["A", "B"], 0.0, 2.0, "#102030")];
    let buf = render(&effects, &layout, 2.0);

    assert_eq!(buf.frame_count(), 40);
    for frame in buf.frames() {
        assert_eq!(frame, &vec![16, 32, 48, 16, 32, 48, 16, 32, 48, 0, 0, 0]);
    }
}

#[test]
fn fill_is_idempotent() {
    let layout = layout(vec![model("A", 1, 6)], 6);
    let fill = on(EffectKind::Fill, &["A"], 0.0, 1.0, "#ABCDEF");
    let once = render(std::slice::from_ref(&fill), &layout, 1.0);
    let twice = render(&[fill.clone(), fill], &layout, 1.0);
    assert_eq!(once, twice);
}

#[test]
fn later_effect_wins_where_windows_overlap() {
    let layout = layout(vec![model("A", 1, 3)], 3);
    let effects = [
        on(EffectKind::Fill, &["A"], 0.0, 2.0, "#FF0000"),
        on(EffectKind::Fill, &["A"], 0.5, 1.5, "#0000FF"),
    ];
    let buf = render(&effects, &layout, 2.0);

    for (i, frame) in buf.frames().iter().enumerate() {
        let expected: &[u8] = if (10..30).contains(&i) {
            &[0, 0, 255]
        } else {
            &[255, 0, 0]
        };
        assert_eq!(frame.as_slice(), expected, "frame {i}");
    }
}

#[test]
fn fade_ramps_linearly() {
    let layout = layout(vec![model("A", 1, 3)], 3);
    let effects = [on(EffectKind::Fade, &["A"], 0.0, 1.0, "#C8C8C8")];
    let buf = render(&effects, &layout, 1.0);
    assert_eq!(buf.frame(0), Some(&[0, 0, 0][..]));
    assert_eq!(buf.frame(10), Some(&[100, 100, 100][..]));
    assert!(buf.frame(19).unwrap()[0] > buf.frame(18).unwrap()[0]);
}

#[test]
fn chase_lights_head_and_dims_neighbours() {
    let layout = layout(vec![model("Line", 1, 15)], 15);
    let effects = [on(
        EffectKind::Chase(ChaseParams::default()),
        &["Line"],
        0.0,
        1.0,
        "#C80000",
    )];
    let buf = render(&effects, &layout, 1.0);

    // Head at pixel 0, neighbours wrap to pixel 4 and pixel 1.
    assert_eq!(
        buf.frame(0).unwrap(),
        &[200, 0, 0, 100, 0, 0, 0, 0, 0, 0, 0, 0, 100, 0, 0]
    );
}

#[test]
fn chase_keeps_untouched_pixels() {
    let layout = layout(vec![model("Line", 1, 15)], 15);
    let chase = EffectKind::Chase(ChaseParams::default());
    let effects = [
        on(EffectKind::Fill, &["Line"], 0.0, 1.0, "#000010"),
        on(chase, &["Line"], 0.0, 1.0, "#C80000"),
    ];
    let buf = render(&effects, &layout, 1.0);
    assert_eq!(&buf.frame(0).unwrap()[6..9], &[0, 0, 16]);
}

#[test]
fn chase_head_position() {
    let medium = ChaseParams::default();
    let fast = ChaseParams {
        speed: Speed::Fast,
        ..ChaseParams::default()
    };
    let reverse = ChaseParams {
        direction: ChaseDirection::Reverse,
        ..ChaseParams::default()
    };

    assert_eq!(chase_head(0.0, medium, 0), None);
    assert_eq!(chase_head(0.0, medium, 4), Some(0));
    assert_eq!(chase_head(0.5, medium, 4), Some(2));
    assert_eq!(chase_head(0.5, fast, 4), Some(0));
    assert_eq!(chase_head(0.75, fast, 4), Some(2));
    assert_eq!(chase_head(0.0, reverse, 4), Some(3));
    assert_eq!(chase_head(-0.1, medium, 4), Some(3));
    assert_eq!(chase_head(f64::NAN, medium, 4), Some(0));
}

#[test]
fn single_pixel_chase_keeps_full_centre() {
    let layout = layout(vec![model("Dot", 1, 3)], 3);
    let chase = EffectKind::Chase(ChaseParams::default());
    let effects = [on(chase, &["Dot"], 0.0, 1.0, "#FF0000")];
    let buf = render(&effects, &layout, 1.0);
    assert!(buf.frames().iter().all(|f| f.as_slice() == [255, 0, 0]));
}

#[test]
fn sparkle_density_is_roughly_respected() {
    let layout = layout(vec![model("Net", 1, 3000)], 3000);
    let sparkle = |density| {
        [on(
            EffectKind::Sparkle(SparkleParams { density }),
            &["Net"],
            0.0,
            0.5,
            "#FFFFFF",
        )]
    };

    let cases = [
        (SparkleDensity::High, 0.2, 0.4),
        (SparkleDensity::Low, 0.08, 0.22),
    ];
    for (density, lo, hi) in cases {
        let buf = render(&sparkle(density), &layout, 0.5);
        for frame in buf.frames() {
            let lit = frame.chunks(3).filter(|px| px[0] == 255).count() as f64 / 1000.0;
            assert!(lit > lo && lit < hi, "{density:?}: lit share {lit}");
        }
    }
}

#[test]
fn rendering_is_deterministic() {
    let layout = layout(vec![model("Net", 1, 300), model("Tree", 301, 30)], 330);
    let sparkle = EffectKind::Sparkle(SparkleParams::default());
    let chase = EffectKind::Chase(ChaseParams::default());
    let effects = [
        on(sparkle, &["Net", "Tree"], 0.0, 3.0, "#FFAA00"),
        on(chase, &["Tree"], 1.0, 2.5, "#00AAFF"),
    ];
    let a = render(&effects, &layout, 3.0);
    let b = render(&effects, &layout, 3.0);
    assert_eq!(a, b);
}

#[test]
fn out_of_range_writes_are_clipped() {
    // Model runs past the frame: channels 10..15 against a width of 12.
    let layout = layout(vec![model("Overhang", 10, 6)], 12);
    let effects = [on(EffectKind::Fill, &["Overhang"], 0.0, 0.5, "#010203")];
    let buf = render(&effects, &layout, 0.5);
    assert!(buf.frames().iter().all(|f| f.len() == 12));
    assert_eq!(&buf.frame(0).unwrap()[9..], &[1, 2, 3]);
}

#[test]
fn malformed_color_renders_white() {
    let layout = layout(vec![model("A", 1, 3)], 3);
    let effects = [on(EffectKind::Fill, &["A"], 0.0, 0.5, "red")];
    let buf = render(&effects, &layout, 0.5);
    assert_eq!(buf.frame(0), Some(&[255, 255, 255][..]));
}

#[test]
fn unknown_targets_and_degenerate_windows_are_skipped() {
    let layout = layout(vec![model("A", 1, 3)], 3);
    let effects = [
        on(EffectKind::Fill, &["Ghost"], 0.0, 1.0, "#FF0000"),
        on(EffectKind::Fill, &["A"], 0.8, 0.2, "#FF0000"),
        on(EffectKind::Fill, &["A"], 0.5, 0.5, "#FF0000"),
        on(EffectKind::Fill, &["A", "Ghost"], 0.0, 0.1, "#00FF00"),
    ];
    let (buf, stats) = render_with_stats(&effects, &layout, 1.0, SEQUENCE_FPS);
    assert_eq!(
        stats,
        RenderStats {
            effects_total: 4,
            effects_rendered: 1,
            effects_skipped: 3,
        }
    );
    assert_eq!(buf.frame(0), Some(&[0, 255, 0][..]));
    assert_eq!(buf.stats().active_frames, 2);
}

#[test]
fn effects_past_the_end_count_as_skipped() {
    let layout = layout(vec![model("A", 1, 3)], 3);
    let effects = [
        on(EffectKind::Fill, &["A"], 50.0, 60.0, "#FF0000"),
        on(EffectKind::Fill, &["A"], 0.51, 0.54, "#FF0000"),
    ];
    let (buf, stats) = render_with_stats(&effects, &layout, 1.0, SEQUENCE_FPS);
    assert_eq!(
        stats,
        RenderStats {
            effects_total: 2,
            effects_rendered: 0,
            effects_skipped: 2,
        }
    );
    assert_eq!(buf.stats().active_frames, 0);
}

#[test]
fn windows_are_clipped_to_the_buffer() {
    let layout = layout(vec![model("A", 1, 3)], 3);
    let effects = [
        on(EffectKind::Fill, &["A"], -1.0, 0.5, "#FF0000"),
        on(EffectKind::Fill, &["A"], 0.9, 5.0, "#0000FF"),
    ];
    let buf = render(&effects, &layout, 1.0);
    assert_eq!(buf.frame_count(), 20);
    assert_eq!(buf.frame(0), Some(&[255, 0, 0][..]));
    assert_eq!(buf.frame(10), Some(&[0, 0, 0][..]));
    assert_eq!(buf.frame(19), Some(&[0, 0, 255][..]));
}

#[test]
fn odd_durations_allocate_sensibly() {
    let layout = layout(vec![model("A", 1, 3)], 3);
    assert_eq!(render(&[], &layout, 1.01).frame_count(), 21);
    assert_eq!(render(&[], &layout, 0.0).frame_count(), 0);
    assert_eq!(render(&[], &layout, -3.0).frame_count(), 0);
    assert_eq!(render(&[], &layout, f64::NAN).frame_count(), 0);
    assert_eq!(render(&[], &layout, f64::INFINITY).frame_count(), 0);
}

#[test]
fn frame_rate_is_configurable() {
    let layout = layout(vec![model("A", 1, 3)], 3);
    let effects = [on(EffectKind::Fill, &["A"], 0.0, 0.5, "#FF0000")];
    let (buf, _) = render_with_stats(&effects, &layout, 1.0, Fps::new(40, 1).unwrap());
    assert_eq!(buf.frame_count(), 40);
    assert_eq!(buf.stats().active_frames, 20);
}

#[test]
fn envelope_shape() {
    assert_eq!(pulse_envelope(0.0), 0.0);
    assert!((pulse_envelope(0.1) - 0.5).abs() < 1e-12);
    assert_eq!(pulse_envelope(0.2), 1.0);
    assert_eq!(pulse_envelope(0.8), 1.0);
    assert!((pulse_envelope(0.9) - 0.5).abs() < 1e-9);
}
