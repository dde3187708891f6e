//! Tests for configuration validation

use std::time::Duration;

use festival_scheduler::config::FestivalConfig;

fn valid() -> FestivalConfig {
    FestivalConfig {
        acoustic_stages: 2,
        electric_stages: 1,
        coordinators: 2,
        min_performance_ms: 100,
        max_performance_ms: 300,
        max_wait_ms: 500,
        join_bonus_ms: 50,
        collection_ms: 10,
    }
}

#[test]
fn test_festival_config_validation() {
    assert!(valid().validate().is_ok());
}

#[test]
fn test_festival_config_rejects_no_stages() {
    let cfg = FestivalConfig {
        acoustic_stages: 0,
        electric_stages: 0,
        ..valid()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_festival_config_single_kind_is_enough() {
    let cfg = FestivalConfig {
        electric_stages: 0,
        ..valid()
    };
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_festival_config_rejects_zero_coordinators() {
    let cfg = FestivalConfig {
        coordinators: 0,
        ..valid()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_festival_config_rejects_zero_wait() {
    let cfg = FestivalConfig {
        max_wait_ms: 0,
        ..valid()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_festival_config_rejects_inverted_range() {
    let cfg = FestivalConfig {
        min_performance_ms: 400,
        ..valid()
    };
    let err = cfg.validate().unwrap_err();
    assert!(err.contains("min_performance_ms"));
}

#[test]
fn test_festival_config_from_json() {
    let json = r#"{
        "acoustic_stages": 1,
        "electric_stages": 2,
        "coordinators": 3,
        "min_performance_ms": 2000,
        "max_performance_ms": 5000,
        "max_wait_ms": 4000
    }"#;
    let cfg = FestivalConfig::from_json_str(json).unwrap();
    let limits = cfg.limits();
    assert_eq!(limits.total_stages(), 3);
    assert_eq!(limits.coordinators, 3);
    assert_eq!(limits.max_wait, Duration::from_secs(4));
    assert_eq!(limits.join_bonus, Duration::from_secs(2));
}

#[test]
fn test_festival_config_from_json_rejects_invalid() {
    let json = r#"{"acoustic_stages":0,"electric_stages":0,"coordinators":1,
        "min_performance_ms":1,"max_performance_ms":2,"max_wait_ms":3}"#;
    assert!(FestivalConfig::from_json_str(json).is_err());
    assert!(FestivalConfig::from_json_str("{not json").unwrap_err().starts_with("parse error"));
}

#[test]
fn test_festival_config_round_trips_through_serde() {
    let cfg = valid();
    let json = serde_json::to_string(&cfg).unwrap();
    assert_eq!(FestivalConfig::from_json_str(&json).unwrap(), cfg);
}

#[test]
fn test_festival_config_from_env_defaults() {
    // Assumes no FESTIVAL_* variables in the test environment.
    let cfg = FestivalConfig::from_env().unwrap();
    assert!(cfg.validate().is_ok());
}
