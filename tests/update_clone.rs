use basemodel::{FieldSpec, Fields, ModelClass, ModelError, ModelType, Value};
use serde_json::json;

fn setup() -> (ModelClass, ModelClass) {
    let person = ModelType::builder("Person")
        .field("name", FieldSpec::String)
        .build()
        .expect("person type");
    let tag = ModelType::builder("Tag")
        .field("label", FieldSpec::String)
        .build()
        .expect("tag type");
    let task = ModelType::builder("Task")
        .field("id", FieldSpec::Number)
        .field("title", FieldSpec::String)
        .field("owner", FieldSpec::Model(person.clone()))
        .field("tags", FieldSpec::Array(tag))
        .base_url("/tasks/{id}")
        .build()
        .expect("task type");
    (person, task)
}

#[test]
fn update_keeps_nested_identity() {
    let (person, task) = setup();
    let owner = person.create(Value::from(json!({"name": "X"})));
    let model = task.create(Value::from(json!({"id": 1, "title": "t"})));
    model.set("owner", owner.clone());
    let returned = model.update(&Value::from(json!({"owner": {"name": "Y"}, "title": 3})));
    assert!(returned.ptr_eq(&model));
    assert!(model.get("owner").as_model().expect("model").ptr_eq(&owner));
    assert_eq!(owner.get("name"), Value::from("Y"));
    assert_eq!(model.get("title"), Value::from("3"));
}

#[test]
fn update_assigns_when_there_is_no_nested_instance() {
    let (person, task) = setup();
    let model = task.instantiate();
    model.update(&Value::from(json!({"owner": {"name": "Z"}, "extra": true})));
    assert!(model.get("owner").is_model_of(&person));
    assert_eq!(model.get("owner").member("name"), Value::from("Z"));
    assert_eq!(model.get("extra"), Value::Bool(true));
}

#[test]
fn clone_is_a_new_instance_sharing_nested_ones() {
    let (_, task) = setup();
    let model = task.create(Value::from(json!({
        "id": 2,
        "title": "write",
        "owner": {"name": "Ann"},
        "tags": [{"label": "a"}]
    })));
    model.set("extra", 1);
    let copy = model.clone_instance();
    assert!(!copy.ptr_eq(&model));
    assert!(copy.is_instance_of(&task));
    assert!(copy.get("owner").as_model().expect("owner").ptr_eq(model.get("owner").as_model().expect("owner")));
    assert_eq!(copy.get("tags").member("0"), model.get("tags").member("0"));
    assert_eq!(copy.get("extra"), Value::Number(1.0));
    assert_eq!(copy.to_object(), model.to_object());

    copy.set("title", "changed");
    assert_eq!(model.get("title"), Value::from("write"));
}

#[test]
fn serialize_uses_the_declared_field_list() {
    let record = ModelType::builder("Record")
        .field("id", FieldSpec::Number)
        .field("title", FieldSpec::String)
        .field("secret", FieldSpec::String)
        .fields(Fields::fixed(["id", "title"]))
        .build()
        .expect("record type");
    let model = record.create(Value::from(json!({"id": 5, "title": "t", "secret": "s"})));
    assert_eq!(model.serialize(), Value::from(json!({"id": 5, "title": "t"})));

    let computed = ModelType::builder("Computed")
        .field("id", FieldSpec::Number)
        .fields(Fields::Computed(|| vec!["id".to_owned(), "missing".to_owned()]))
        .build()
        .expect("computed type");
    let model = computed.create(Value::from(json!({"id": 6})));
    let view = model.serialize();
    assert_eq!(view.member("id"), Value::Number(6.0));
    assert!(view.as_object().expect("object").contains_key("missing"));
}

#[test]
fn serialize_without_field_list_is_the_instance() {
    let (_, task) = setup();
    let model = task.instantiate();
    assert!(matches!(model.serialize(), Value::Model(m) if m.ptr_eq(&model)));
}

#[test]
fn key_requires_an_id() {
    let plain = ModelType::builder("Plain").build().expect("plain type");
    let model = plain.instantiate();
    assert_eq!(model.key(), Err(ModelError::KeyUndefined { field: "id".into() }));
    model.set("id", 7);
    assert_eq!(model.key(), Ok("7".to_owned()));
    model.set("id", Value::Null);
    assert_eq!(model.key(), Ok("null".to_owned()));
}

#[test]
fn href_formats_the_base_url() {
    let (_, task) = setup();
    let model = task.create(Value::from(json!({"id": 7, "title": "x"})));
    assert_eq!(model.href(), Ok(Some("/tasks/7".to_owned())));
    model.set("baseUrl", "/t/{id}/{title}");
    assert_eq!(model.href(), Ok(Some("/t/7/x".to_owned())));
    model.set("baseUrl", 5);
    assert_eq!(model.href(), Err(ModelError::TemplateNotString));

    let plain = ModelType::builder("Plain").build().expect("plain type");
    assert_eq!(plain.instantiate().href(), Ok(None));
}
