use super::*;
use anyhow::anyhow;

struct Failing;

impl ConstraintParser for Failing {
    fn parse(&self, _: &str, _: &Layout, _: &SongAnalysis) -> anyhow::Result<Constraints> {
        Err(anyhow!("upstream timeout"))
    }
}

impl RationaleWriter for Failing {
    fn rationale(&self, _: &Constraints, _: &SongAnalysis, _: Strategy) -> anyhow::Result<String> {
        Err(anyhow!("upstream timeout"))
    }
}

struct Fixed(&'static str);

impl RationaleWriter for Fixed {
    fn rationale(&self, _: &Constraints, _: &SongAnalysis, _: Strategy) -> anyhow::Result<String> {
        Ok(self.0.to_owned())
    }
}

fn song() -> SongAnalysis {
    SongAnalysis {
        title: "Jingle Bells".to_owned(),
        bpm: 120.0,
        duration: 30.0,
        ..SongAnalysis::default()
    }
}

#[test]
fn parser_failure_yields_fallback_constraints() {
    let c = resolve_constraints(&Failing, "make it pop", &Layout::default(), &song());
    assert_eq!(c, Constraints::fallback());
    assert_eq!(c.mood, "festive");
    assert!(c.spatial_focus.is_empty());
    assert_eq!(c.color_palette, ["#FF0000", "#00FF00", "#FFFFFF"]);
}

#[test]
fn rationale_failure_yields_fallback_text() {
    let c = Constraints::fallback();
    let text = resolve_rationale(&Failing, &c, &song(), Strategy::Energy);
    let expected = concat!(
        "This energy variant brings your vision to life with festive patterns ",
        "synced to Jingle Bells's 120 BPM rhythm."
    );
    assert_eq!(text, expected);

    let writer = Fixed("  Bright and bold.\n");
    let text = resolve_rationale(&writer, &c, &song(), Strategy::Elegant);
    assert_eq!(text, "Bright and bold.");
}

#[test]
fn reply_parsing_strips_code_fences() {
    let body = concat!(
        r#"{"mood":"calm","intensity":"low","spatialFocus":["Mega Tree"],"#,
        r##""colorPalette":["#0000FF"],"speed":"slow"}"##
    );
    let plain = parse_constraints_reply(body).unwrap();
    assert_eq!(plain.intensity, Intensity::Low);
    assert_eq!(plain.speed, Speed::Slow);
    assert_eq!(plain.spatial_focus, ["Mega Tree"]);

    let fenced = format!("```json\n{body}\n```");
    assert_eq!(parse_constraints_reply(&fenced).unwrap(), plain);

    let bare_fence = format!("```\n{body}\n```");
    assert_eq!(parse_constraints_reply(&bare_fence).unwrap(), plain);

    assert!(parse_constraints_reply("not json").is_err());
}

#[test]
fn speed_multipliers() {
    assert_eq!(Speed::Slow.multiplier(), 0.5);
    assert_eq!(Speed::Medium.multiplier(), 1.0);
    assert_eq!(Speed::Fast.multiplier(), 2.0);
}
