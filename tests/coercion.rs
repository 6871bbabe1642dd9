use basemodel::{FieldSpec, ModelClass, ModelType, Value};

fn record_type() -> ModelClass {
    ModelType::builder("Record")
        .field("flag", FieldSpec::Boolean)
        .field("count", FieldSpec::Number)
        .field("title", FieldSpec::String)
        .build()
        .expect("record type")
}

#[test]
fn declared_types_read_back_unchanged() {
    let record = record_type().instantiate();
    record.set("count", 5);
    record.set("title", "hello");
    record.set("flag", true);
    assert_eq!(record.get("count"), Value::Number(5.0));
    assert_eq!(record.get("title"), Value::from("hello"));
    assert_eq!(record.get("flag"), Value::Bool(true));
}

#[test]
fn other_types_are_coerced_on_write() {
    let record = record_type().instantiate();
    record.set("title", 5);
    assert_eq!(record.get("title"), Value::from("5"));
    record.set("count", " 12.5 ");
    assert_eq!(record.get("count"), Value::Number(12.5));
    record.set("count", "abc");
    assert!(record.get("count").as_f64().expect("number").is_nan());
    record.set("title", Value::Null);
    assert_eq!(record.get("title"), Value::from("null"));
}

#[test]
fn boolean_table() {
    let record = record_type().instantiate();
    let cases = [
        (Value::from(0), false),
        (Value::from("0"), false),
        (Value::from(1), true),
        (Value::from("1"), true),
        (Value::from(-1), true),
        (Value::from(""), false),
        (Value::Null, false),
        (Value::Undefined, false),
        (Value::from("2"), true),
    ];
    for (input, expected) in cases {
        record.set("flag", input.clone());
        assert_eq!(record.get("flag"), Value::Bool(expected), "input {:?}", input);
    }
}

#[test]
fn unset_fields_read_through_their_coercion() {
    let record = record_type().instantiate();
    assert_eq!(record.get("flag"), Value::Undefined);
    assert!(record.get("count").as_f64().expect("number").is_nan());
    assert_eq!(record.get("title"), Value::from("undefined"));
}

#[test]
fn prefixed_name_reaches_the_raw_slot() {
    let record = record_type().instantiate();
    record.set("_count", "7");
    assert_eq!(record.get("_count"), Value::from("7"));
    assert_eq!(record.get("count"), Value::Number(7.0));
    record.set("count", "8");
    assert_eq!(record.get("_count"), Value::Number(8.0));
}
