//! Dotted-path traversal behind alias fields.

use tracing::{trace, warn};

use crate::model::Model;
use crate::observer::{dispatch, MutationObserver, SetTarget};
use crate::value::{array_index, Object, Value};

/// Reads `path` starting at `model`. A missing value at any step makes the
/// whole read come back as the empty string.
pub(crate) fn read(model: &Model, path: &str) -> Value {
    let mut current = Value::Model(model.clone());
    for segment in path.split('.') {
        let next = current.member(segment);
        if next.is_nullish() {
            trace!(path, segment, "alias path unresolved");
            return Value::String(String::new());
        }
        current = next;
    }
    current
}

/// Writes `value` at `path` starting at `model`, creating empty objects for
/// falsy intermediates. All writes go through the type's observer.
///
/// Plain objects and arrays are values, so a write below one of them is made on
/// a copy that is then stored back on the model. The observer sees the member
/// writes on the copy followed by that store, keyed by the raw member name
/// (`_list` for a declared `list` field).
pub(crate) fn write(model: &Model, path: &str, value: Value) {
    let segments: Vec<&str> = path.split('.').collect();
    let observer = model.class().config().observer.clone();
    write_model(model, &segments, value, observer.as_deref());
}

fn write_model(model: &Model, segments: &[&str], value: Value, observer: Option<&dyn MutationObserver>) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };
    if rest.is_empty() {
        dispatch(observer, SetTarget::Model(model), head, value);
        return;
    }
    // an intermediate alias continues along its own path
    if let Some(alias) = model.alias_path(head) {
        let expanded: Vec<&str> = alias.split('.').chain(rest.iter().copied()).collect();
        write_model(model, &expanded, value, observer);
        return;
    }
    if !model.get(head).is_truthy() {
        dispatch(observer, SetTarget::Model(model), head, Value::Object(Object::new()));
    }
    match model.get(head) {
        Value::Model(child) => write_model(&child, rest, value, observer),
        mut node @ (Value::Object(_) | Value::Array(_)) => {
            // work on a detached copy so no borrow of `model` is held meanwhile,
            // then put it back uncoerced through the observer as well
            write_value(&mut node, rest, value, observer);
            dispatch(observer, SetTarget::Model(model), &model.raw_name(head), node);
        }
        other => warn!(segment = head, value = %other, "alias path runs through a primitive, write dropped"),
    }
}

fn write_value(node: &mut Value, segments: &[&str], value: Value, observer: Option<&dyn MutationObserver>) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };
    if let Value::Model(model) = node {
        let model = model.clone();
        write_model(&model, segments, value, observer);
        return;
    }
    if rest.is_empty() {
        match SetTarget::container(node) {
            Some(target) => dispatch(observer, target, head, value),
            None => warn!(segment = head, "alias path runs through a primitive, write dropped"),
        }
        return;
    }
    if !node.member(head).is_truthy() {
        if let Some(target) = SetTarget::container(node) {
            dispatch(observer, target, head, Value::Object(Object::new()));
        }
    }
    match member_mut(node, head) {
        Some(next) => write_value(next, rest, value, observer),
        None => warn!(segment = head, "alias path runs through a primitive, write dropped"),
    }
}

fn member_mut<'a>(node: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    match node {
        Value::Object(map) => map.get_mut(key),
        Value::Array(items) => array_index(key).and_then(move |i| items.get_mut(i)),
        _ => None,
    }
}
