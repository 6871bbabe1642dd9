use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::error::{ModelError, Result};
use crate::value::Value;

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{([A-Za-z0-9_]+)\}").unwrap();
}

/// Replaces every `{name}` in `template` with `data[name]` in string form.
/// Marks without a value render as `undefined`.
///
/// `data` may be an object, an array (marks are indices) or a model (marks
/// resolve through its accessors).
pub fn format(template: &Value, data: &Value) -> Result<String> {
    let Value::String(template) = template else {
        return Err(ModelError::TemplateNotString);
    };
    if !matches!(data, Value::Object(_) | Value::Array(_) | Value::Model(_)) {
        return Err(ModelError::DataNotObject);
    }
    Ok(PLACEHOLDER
        .replace_all(template, |caps: &Captures| data.member(&caps[1]).to_js_string())
        .into_owned())
}
