use std::fs;
use std::path::PathBuf;

use basemodel::{FieldSpec, ModelConfig, ModelError, ModelType, Value};
use serde_json::json;

fn temp_config(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("basemodel_{}_{}.toml", name, std::process::id()));
    fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn loads_from_a_file() {
    let path = temp_config("file", "prefix = \"$\"\nkey_field = \"uuid\"\n");
    let config = ModelConfig::load(Some(path.as_path())).expect("config");
    assert_eq!(config.prefix, "$");
    assert_eq!(config.key_field, "uuid");
    assert!(config.observer.is_none());
    let _ = fs::remove_file(&path);
}

#[test]
fn file_values_are_validated() {
    let path = temp_config("empty_prefix", "prefix = \"\"\n");
    let err = ModelConfig::load(Some(path.as_path())).unwrap_err();
    assert!(matches!(err, ModelError::Config(_)));
    let _ = fs::remove_file(&path);
}

#[test]
fn missing_file_is_a_config_error() {
    let path = std::env::temp_dir().join("basemodel_does_not_exist.toml");
    let err = ModelConfig::load(Some(path.as_path())).unwrap_err();
    assert!(matches!(err, ModelError::Config(_)));
}

#[test]
fn custom_prefix_addresses_slots() {
    let counter = ModelType::builder("Counter")
        .field("count", FieldSpec::Number)
        .config(ModelConfig::default().with_prefix("$"))
        .build()
        .expect("counter type");
    let model = counter.instantiate();
    model.set("$count", "7");
    assert_eq!(model.get("$count"), Value::from("7"));
    assert_eq!(model.get("count"), Value::Number(7.0));
    model.set("_count", 1);
    assert_eq!(model.get("count"), Value::Number(7.0));
    assert!(model.to_object().contains_key("_count"));
}

#[test]
fn custom_key_field() {
    let doc = ModelType::builder("Doc")
        .field("uuid", FieldSpec::String)
        .config(ModelConfig::default().with_key_field("uuid"))
        .build()
        .expect("doc type");
    let wrapped = doc.wrap(Value::from(json!({"uuid": "abc"})));
    assert_eq!(wrapped.as_model().expect("model").key(), Ok("abc".to_owned()));
    assert!(!doc.wrap(Value::from(json!({"id": 1}))).is_model_of(&doc));
}

#[test]
fn invalid_config_fails_the_build() {
    let err = ModelType::builder("Broken")
        .config(ModelConfig::default().with_key_field(""))
        .build()
        .unwrap_err();
    assert!(matches!(err, ModelError::Config(_)));
}
