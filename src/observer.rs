//! Write hook for alias paths.
//!
//! Every write performed while walking an alias path (intermediate objects as
//! well as the final member) is handed to a [`MutationObserver`] so that an
//! external reactivity layer can see it happen. Without an observer the write is
//! a plain assignment, see [`SetTarget::assign`].

use tracing::warn;

use crate::model::Model;
use crate::value::{array_index, Object, Value};

/// Largest run of `undefined` holes an index write may open past the end of an
/// array.
pub const MAX_ARRAY_GAP: usize = 4096;

/// The container a path write lands on.
pub enum SetTarget<'a> {
    Model(&'a Model),
    Object(&'a mut Object),
    Array(&'a mut Vec<Value>),
}

impl<'a> SetTarget<'a> {
    /// Set `key` on the target. Models assign through their accessors.
    pub fn assign(self, key: &str, value: Value) {
        match self {
            SetTarget::Model(model) => model.set(key, value),
            SetTarget::Object(map) => {
                map.insert(key, value);
            }
            SetTarget::Array(items) => match array_index(key) {
                Some(index) if index > items.len() + MAX_ARRAY_GAP => {
                    warn!(key, len = items.len(), "array index too far past the end, write dropped");
                }
                Some(index) => {
                    if index >= items.len() {
                        items.resize(index + 1, Value::Undefined);
                    }
                    items[index] = value;
                }
                None => warn!(key, "arrays only take index members, write dropped"),
            },
        }
    }
    pub(crate) fn container(node: &'a mut Value) -> Option<Self> {
        match node {
            Value::Model(model) => Some(SetTarget::Model(model)),
            Value::Object(map) => Some(SetTarget::Object(map)),
            Value::Array(items) => Some(SetTarget::Array(items)),
            _ => None,
        }
    }
    pub fn kind(&self) -> &'static str {
        match self {
            SetTarget::Model(_) => "model",
            SetTarget::Object(_) => "object",
            SetTarget::Array(_) => "array",
        }
    }
}

pub trait MutationObserver {
    /// Set `key` on `target` to `value` in a way external bindings can observe.
    /// Implementations are expected to end up calling [`SetTarget::assign`].
    fn set_and_notify(&self, target: SetTarget<'_>, key: &str, value: Value);
}

/// Observer that only assigns.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectAssignment;

impl MutationObserver for DirectAssignment {
    fn set_and_notify(&self, target: SetTarget<'_>, key: &str, value: Value) {
        target.assign(key, value);
    }
}

pub(crate) fn dispatch(observer: Option<&dyn MutationObserver>, target: SetTarget<'_>, key: &str, value: Value) {
    match observer {
        Some(observer) => observer.set_and_notify(target, key, value),
        None => target.assign(key, value),
    }
}
