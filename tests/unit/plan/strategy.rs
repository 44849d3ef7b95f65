use super::*;

#[test]
fn parses_case_insensitively() {
    assert_eq!("energy".parse::<Strategy>().unwrap(), Strategy::Energy);
    assert_eq!(" Elegant ".parse::<Strategy>().unwrap(), Strategy::Elegant);
    assert_eq!("BALANCED".parse::<Strategy>().unwrap(), Strategy::Balanced);
    assert!(matches!(
        "chaotic".parse::<Strategy>(),
        Err(LightshowError::Validation(_))
    ));
}

#[test]
fn names_follow_variant_order() {
    let names: Vec<_> = Strategy::ALL.iter().map(|s| s.display_name()).collect();
    assert_eq!(
        names,
        ["Maximum Energy", "Elegant Subtlety", "Creative Balance"]
    );
    assert_eq!(Strategy::Balanced.to_string(), "balanced");
    assert_eq!(
        serde_json::to_value(Strategy::Elegant).unwrap(),
        serde_json::json!("elegant")
    );
    assert!(Strategy::Balanced.description().contains("submodels"));
}
