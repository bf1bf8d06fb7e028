use std::{fs, path::PathBuf};

use ergrade::{
    GradingConfig, RuleConfig, RuleId,
    config::{QuantityConfig, UsageConfig},
    diagram::Cardinality,
};
use uuid::Uuid;

fn temp_file(extension: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("ergrade-config-{}.{extension}", Uuid::new_v4()));
    fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn properties_files_are_read() {
    let path = temp_file(
        "properties",
        "# quantities\n\
         entity_quantity = 2, 4, 1.5\n\
         ! usage\n\
         RELATIONSHIP_CARDINALITY_USAGE: zero_or_many,one\n\
         \n\
         SINGLE_COMPONENT = disable\n",
    );
    let config = GradingConfig::load(&path).expect("load properties");
    let _ = fs::remove_file(&path);

    assert_eq!(
        config.resolve(RuleId::EntityQuantity),
        Ok(Some(RuleConfig::Quantity(QuantityConfig {
            points: 1.5,
            min:    2,
            max:    4,
        })))
    );
    assert!(config.is_disabled(RuleId::SingleComponent));
    assert_eq!(config.resolve(RuleId::SingleComponent), Ok(None));
    // The last token is always the points, so `one` is not a cardinality here.
    assert!(config.resolve(RuleId::RelationshipCardinalityUsage).is_err());
}

#[test]
fn json_files_are_read() {
    let path = temp_file(
        "json",
        r#"{
            "ATTRIBUTE_CARDINALITY_USAGE": "all,2",
            "NOT_A_RULE": "1"
        }"#,
    );
    let config = GradingConfig::load(&path).expect("load json");
    let _ = fs::remove_file(&path);

    assert_eq!(config.unknown_keys(), vec!["NOT_A_RULE"]);
    assert_eq!(
        config.resolve(RuleId::AttributeCardinalityUsage),
        Ok(Some(RuleConfig::CardinalityUsage(UsageConfig {
            points:   2.0,
            expected: vec![
                Cardinality::ZeroOrOne,
                Cardinality::ZeroOrMany,
                Cardinality::OneOrMany,
            ],
        })))
    );
}

#[test]
fn missing_files_are_reported() {
    let path = std::env::temp_dir().join(format!("ergrade-missing-{}.json", Uuid::new_v4()));
    let err = GradingConfig::load(&path).expect_err("missing file");
    assert!(err.to_string().contains("Could not read configuration"));
}

#[test]
fn defaults_round_trip_through_properties() {
    let defaults = GradingConfig::defaults();
    let path = temp_file("properties", &defaults.to_properties());
    let loaded = GradingConfig::load(&path).expect("load defaults");
    let _ = fs::remove_file(&path);

    assert_eq!(loaded, defaults);
    for rule in RuleId::ALL {
        assert_eq!(loaded.resolve(rule), GradingConfig::new().resolve(rule), "{rule}");
    }
}
