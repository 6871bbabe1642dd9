// used to print out readable forms of a field descriptor
use std::fmt;

use crate::error::{ModelError, Result};
use crate::model::ModelClass;

// ------------- FieldSpec -------------
/// The declared shape of one model attribute.
#[derive(Clone)]
pub enum FieldSpec {
    Boolean,
    Number,
    String,
    /// A single nested instance of the given type.
    Model(ModelClass),
    /// An ordered sequence of instances of the given type.
    Array(ModelClass),
    /// No storage, reads and writes go through a dotted path on the instance.
    Alias(String),
    /// A single nested instance of the type declaring the field, for trees
    /// such as a comment with a parent comment.
    SelfModel,
    /// An ordered sequence of instances of the type declaring the field.
    SelfArray,
}

impl FieldSpec {
    pub fn alias(path: impl Into<String>) -> Self {
        FieldSpec::Alias(path.into())
    }
    pub fn is_alias(&self) -> bool {
        matches!(self, FieldSpec::Alias(_))
    }
}
impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldSpec::Boolean => write!(f, "Boolean"),
            FieldSpec::Number => write!(f, "Number"),
            FieldSpec::String => write!(f, "String"),
            FieldSpec::Model(class) => write!(f, "{}", class.name()),
            FieldSpec::Array(class) => write!(f, "[{}]", class.name()),
            FieldSpec::Alias(path) => write!(f, "{:?}", path),
            FieldSpec::SelfModel => write!(f, "Self"),
            FieldSpec::SelfArray => write!(f, "[Self]"),
        }
    }
}

// ------------- Schema -------------
/// Ordered mapping from public field name to its descriptor. Declaring a name
/// twice replaces the earlier descriptor in place.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    fields: Vec<(String, FieldSpec)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.insert(name, spec);
        self
    }
    pub fn insert(&mut self, name: impl Into<String>, spec: FieldSpec) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = spec,
            None => self.fields.push((name, spec)),
        }
    }
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, spec)| spec)
    }
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(n, spec)| (n.as_str(), spec))
    }
    pub fn len(&self) -> usize {
        self.fields.len()
    }
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, FieldSpec)> for Schema {
    fn from_iter<I: IntoIterator<Item = (S, FieldSpec)>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for (name, spec) in iter {
            schema.insert(name, spec);
        }
        schema
    }
}

/// A declared name must not also be reachable as the slot name of another
/// declared field, e.g. `_title` next to `title` with the default prefix.
pub(crate) fn check_prefix<'a>(names: impl IntoIterator<Item = &'a str> + Clone, prefix: &str) -> Result<()> {
    for name in names.clone() {
        if let Some(stripped) = name.strip_prefix(prefix) {
            if names.clone().into_iter().any(|other| other == stripped) {
                return Err(ModelError::PrefixCollision {
                    field: name.to_owned(),
                    prefix: prefix.to_owned(),
                });
            }
        }
    }
    Ok(())
}

// ------------- Fields -------------
/// Field list used by the serialize view of a model type.
#[derive(Clone)]
pub enum Fields {
    Fixed(Vec<String>),
    Computed(fn() -> Vec<String>),
}

impl Fields {
    pub fn fixed<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Fields::Fixed(names.into_iter().map(Into::into).collect())
    }
    pub fn names(&self) -> Vec<String> {
        match self {
            Fields::Fixed(names) => names.clone(),
            Fields::Computed(produce) => produce(),
        }
    }
}
impl fmt::Debug for Fields {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Fields::Fixed(names) => f.debug_tuple("Fixed").field(names).finish(),
            Fields::Computed(_) => f.debug_tuple("Computed").finish(),
        }
    }
}
