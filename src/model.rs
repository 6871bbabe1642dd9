//! Model types and model instances.
//!
//! A [`ModelType`] plays the part of a concrete model class: it owns the schema
//! that its constructor installs, the optional serialize field list, an
//! optional base URL template and the [`ModelConfig`]. Types are shared as
//! [`ModelClass`] (`Rc<ModelType>`), and nested field descriptors refer to them
//! directly.
//!
//! A [`Model`] is a handle to one instance. Cloning the handle (`Clone`) gives
//! another reference to the *same* instance, which is how nested instances keep
//! their identity; [`Model::clone_instance`] creates a new one.
//!
//! Every instance carries
//! * an accessor table, interpreted by [`Model::get`] and [`Model::set`],
//! * a backing store with one slot per non-alias field,
//! * the schema last passed to [`Model::define`],
//! * ad hoc attributes for keys nothing was declared for.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::error::{ModelError, Result};
use crate::format::format;
use crate::path;
use crate::schema::{check_prefix, FieldSpec, Fields, Schema};
use crate::settings::ModelConfig;
use crate::value::{KeyHasher, Object, Value};

/// Attribute names never exported by [`Model::to_object`].
pub const PRIVATE_NAMES: [&str; 3] = ["__props__", "__private__", "__ob__"];

pub type ModelClass = Rc<ModelType>;

// ------------- ModelType -------------
#[derive(Debug)]
pub struct ModelType {
    name: String,
    schema: Schema,
    fields: Option<Fields>,
    base_url: Option<String>,
    config: ModelConfig,
}

impl ModelType {
    pub fn builder(name: impl Into<String>) -> ModelTypeBuilder {
        ModelTypeBuilder {
            name: name.into(),
            schema: Schema::new(),
            fields: None,
            base_url: None,
            config: ModelConfig::default(),
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
    pub fn fields(&self) -> Option<&Fields> {
        self.fields.as_ref()
    }
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// The constructor: installs the schema, then applies `init` if it is truthy.
    pub fn create(self: &Rc<Self>, init: impl Into<Value>) -> Model {
        let model = Model(Rc::new(RefCell::new(Instance {
            class: Rc::clone(self),
            props: Schema::new(),
            accessors: HashMap::default(),
            slots: Object::new(),
            attrs: Object::new(),
        })));
        model.install(&self.schema);
        let init = init.into();
        if init.is_truthy() {
            model.init(&init);
        }
        debug!(model = %self.name, "instance constructed");
        model
    }
    pub fn instantiate(self: &Rc<Self>) -> Model {
        self.create(Value::Undefined)
    }

    /// Constructs an instance from `obj` when it carries a value for the
    /// configured key field, and hands `obj` back untouched otherwise.
    pub fn wrap(self: &Rc<Self>, obj: Value) -> Value {
        let key_field = self.config.key_field.clone();
        self.wrap_by(obj, &key_field)
    }
    pub fn wrap_by(self: &Rc<Self>, obj: Value, key_field: &str) -> Value {
        if obj.member(key_field).is_undefined() {
            return obj;
        }
        Value::Model(self.create(obj))
    }
    /// Constructs an instance from every element of an array. Anything else is
    /// handed back untouched.
    pub fn wrap_array(self: &Rc<Self>, arr: Value) -> Value {
        match arr {
            Value::Array(items) => Value::Array(
                items.into_iter().map(|item| Value::Model(self.create(item))).collect(),
            ),
            other => other,
        }
    }
    pub fn format(template: &Value, data: &Value) -> Result<String> {
        format(template, data)
    }
}

pub struct ModelTypeBuilder {
    name: String,
    schema: Schema,
    fields: Option<Fields>,
    base_url: Option<String>,
    config: ModelConfig,
}

impl ModelTypeBuilder {
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.schema.insert(name, spec);
        self
    }
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }
    pub fn fields(mut self, fields: Fields) -> Self {
        self.fields = Some(fields);
        self
    }
    pub fn base_url(mut self, template: impl Into<String>) -> Self {
        self.base_url = Some(template.into());
        self
    }
    pub fn config(mut self, config: ModelConfig) -> Self {
        self.config = config;
        self
    }
    pub fn build(self) -> Result<ModelClass> {
        self.config.validate()?;
        check_prefix(self.schema.names().collect::<Vec<_>>(), &self.config.prefix)?;
        Ok(Rc::new(ModelType {
            name: self.name,
            schema: self.schema,
            fields: self.fields,
            base_url: self.base_url,
            config: self.config,
        }))
    }
}

// ------------- Model -------------
struct Instance {
    class: ModelClass,
    props: Schema,
    accessors: HashMap<String, FieldSpec, KeyHasher>,
    slots: Object,
    attrs: Object,
}

impl Instance {
    fn install_field(&mut self, name: &str, spec: FieldSpec) {
        // an accessor replaces a plain attribute of the same name
        self.attrs.remove(name);
        match spec {
            FieldSpec::Alias(_) => {
                self.slots.remove(name);
            }
            FieldSpec::Array(_) | FieldSpec::SelfArray => {
                self.slots.insert(name, Value::Array(Vec::new()));
            }
            _ => {
                if !self.slots.contains_key(name) {
                    self.slots.insert(name, Value::Undefined);
                }
            }
        }
        self.accessors.insert(name.to_owned(), spec);
    }

    /// `<prefix><field>` addresses the slot of `field` directly.
    fn slot_name<'a>(&self, name: &'a str) -> Option<&'a str> {
        let field = name.strip_prefix(self.class.config.prefix.as_str())?;
        match self.accessors.get(field) {
            Some(spec) if !spec.is_alias() => Some(field),
            _ => None,
        }
    }
    fn slot(&self, field: &str) -> Value {
        self.slots.get(field).cloned().unwrap_or_default()
    }
}

#[derive(Clone)]
pub struct Model(Rc<RefCell<Instance>>);

impl Model {
    pub fn class(&self) -> ModelClass {
        Rc::clone(&self.0.borrow().class)
    }
    pub fn is_instance_of(&self, class: &ModelClass) -> bool {
        Rc::ptr_eq(&self.0.borrow().class, class)
    }
    /// Same instance, not merely equal contents.
    pub fn ptr_eq(&self, other: &Model) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
    /// The schema last installed by [`Model::define`].
    pub fn schema(&self) -> Schema {
        self.0.borrow().props.clone()
    }
    /// Whether `field` owns a slot in the backing store.
    pub fn has_slot(&self, field: &str) -> bool {
        self.0.borrow().slots.contains_key(field)
    }

    /// Installs an accessor for every field of `schema`, records `schema` as the
    /// instance's schema and then applies `init` if it is truthy.
    pub fn define(&self, schema: &Schema, init: Option<&Value>) -> Result<()> {
        {
            let inner = self.0.borrow();
            let mut names: Vec<&str> = schema.names().collect();
            names.extend(inner.accessors.keys().map(String::as_str).filter(|n| !schema.contains(n)));
            check_prefix(names, &inner.class.config.prefix)?;
        }
        self.install(schema);
        if let Some(init) = init {
            if init.is_truthy() {
                self.init(init);
            }
        }
        Ok(())
    }
    /// Installs a single accessor without touching the recorded schema.
    pub fn define_property(&self, name: &str, spec: FieldSpec) {
        self.0.borrow_mut().install_field(name, spec);
    }
    /// Installs an alias accessor for `name` that resolves through `path`.
    pub fn translate_property(&self, name: &str, path: &str) {
        self.define_property(name, FieldSpec::alias(path));
    }
    fn install(&self, schema: &Schema) {
        let mut inner = self.0.borrow_mut();
        for (name, spec) in schema.iter() {
            inner.install_field(name, spec.clone());
        }
        inner.props = schema.clone();
        debug!(model = %inner.class.name, fields = schema.len(), "schema installed");
    }

    pub fn get(&self, name: &str) -> Value {
        let spec = {
            let inner = self.0.borrow();
            if let Some(field) = inner.slot_name(name) {
                return inner.slot(field);
            }
            match inner.accessors.get(name) {
                Some(spec) => spec.clone(),
                None => return inner.attrs.get(name).cloned().unwrap_or_default(),
            }
        };
        match spec {
            FieldSpec::Boolean | FieldSpec::Model(_) | FieldSpec::SelfModel => self.0.borrow().slot(name),
            FieldSpec::Number => Value::Number(self.0.borrow().slot(name).to_number()),
            FieldSpec::String => Value::String(self.0.borrow().slot(name).to_js_string()),
            FieldSpec::Array(class) => self.get_array(name, &class),
            FieldSpec::SelfArray => self.get_array(name, &self.class()),
            FieldSpec::Alias(path) => path::read(self, &path),
        }
    }

    pub fn set(&self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        let spec = {
            let mut inner = self.0.borrow_mut();
            if let Some(field) = inner.slot_name(name) {
                inner.slots.insert(field, value);
                return;
            }
            match inner.accessors.get(name) {
                Some(spec) => spec.clone(),
                None => {
                    inner.attrs.insert(name, value);
                    return;
                }
            }
        };
        match spec {
            FieldSpec::Boolean => {
                let n = value.to_number();
                self.store(name, Value::Bool(n != 0.0 && !n.is_nan()));
            }
            FieldSpec::Number => self.store(name, Value::Number(value.to_number())),
            FieldSpec::String => self.store(name, Value::String(value.to_js_string())),
            FieldSpec::Model(class) => self.set_model(name, &class, value),
            FieldSpec::SelfModel => self.set_model(name, &self.class(), value),
            FieldSpec::Array(class) => self.set_array(name, &class, value),
            FieldSpec::SelfArray => self.set_array(name, &self.class(), value),
            FieldSpec::Alias(path) => path::write(self, &path, value),
        }
    }

    fn get_array(&self, name: &str, class: &ModelClass) -> Value {
        let current = self.0.borrow().slot(name);
        let wrapped = match &current {
            Value::Array(items) => items.iter().all(|item| item.is_model_of(class)),
            _ => true,
        };
        if wrapped {
            return current;
        }
        self.set_array(name, class, current);
        self.0.borrow().slot(name)
    }
    fn set_model(&self, name: &str, class: &ModelClass, value: Value) {
        let value = if !value.is_truthy() || value.is_model_of(class) {
            value
        } else {
            Value::Model(class.create(value))
        };
        self.store(name, value);
    }

    fn set_array(&self, name: &str, class: &ModelClass, value: Value) {
        let Value::Array(items) = value else {
            warn!(field = name, "{} must be an Array", name);
            return;
        };
        let items = items
            .into_iter()
            .map(|item| if item.is_model_of(class) { item } else { Value::Model(class.create(item)) })
            .collect();
        self.store(name, Value::Array(items));
    }
    fn store(&self, field: &str, value: Value) {
        self.0.borrow_mut().slots.insert(field, value);
    }

    pub(crate) fn alias_path(&self, name: &str) -> Option<String> {
        match self.0.borrow().accessors.get(name) {
            Some(FieldSpec::Alias(path)) => Some(path.clone()),
            _ => None,
        }
    }
    /// The member name that writes `name`'s backing value as is: the slot
    /// name for declared fields, `name` itself for ad hoc attributes.
    pub(crate) fn raw_name(&self, name: &str) -> String {
        let inner = self.0.borrow();
        if inner.slot_name(name).is_none() && inner.accessors.contains_key(name) {
            format!("{}{}", inner.class.config.prefix, name)
        } else {
            name.to_owned()
        }
    }

    /// Assigns every own entry of `values` through [`Model::set`].
    pub fn init(&self, values: &Value) {
        for (key, value) in values.own_entries() {
            self.set(&key, value);
        }
    }

    /// Merges `values` into the instance. Nested instances are updated in
    /// place instead of being replaced.
    pub fn update(&self, values: &Value) -> Model {
        for (key, value) in values.own_entries() {
            match self.get(&key) {
                Value::Model(nested) => {
                    nested.update(&value);
                }
                _ => self.set(&key, value),
            }
        }
        self.clone()
    }

    /// Shallow snapshot of the instance's own attributes: the public value of
    /// every slotted field, then the ad hoc attributes.
    pub fn own_entries(&self) -> Vec<(String, Value)> {
        let (fields, attrs): (Vec<String>, Vec<(String, Value)>) = {
            let inner = self.0.borrow();
            (
                inner.slots.keys().map(str::to_owned).collect(),
                inner.attrs.iter().map(|(k, v)| (k.to_owned(), v.clone())).collect(),
            )
        };
        fields
            .into_iter()
            .map(|field| {
                let value = self.get(&field);
                (field, value)
            })
            .chain(attrs)
            .collect()
    }

    /// A new instance of the same type, initialized from
    /// [`Model::own_entries`]. Nested instances are shared, not copied.
    pub fn clone_instance(&self) -> Model {
        let snapshot: Object = self.own_entries().into_iter().collect();
        self.class().create(Value::Object(snapshot))
    }

    /// The type's field list as an object, or the instance itself when the
    /// type declares none.
    pub fn serialize(&self) -> Value {
        let class = self.class();
        match class.fields() {
            Some(fields) => Value::Object(
                fields
                    .names()
                    .into_iter()
                    .map(|field| {
                        let value = self.get(&field);
                        (field, value)
                    })
                    .collect(),
            ),
            None => Value::Model(self.clone()),
        }
    }

    /// Plain-object export: schema fields, then other own attributes, with
    /// nested instances exported recursively.
    pub fn to_object(&self) -> Object {
        let keys = {
            let inner = self.0.borrow();
            let prefix = inner.class.config.prefix.as_str();
            let mut keys: Vec<String> = inner.props.names().map(str::to_owned).collect();
            let orphans = inner
                .slots
                .keys()
                .filter(|field| !inner.props.contains(field))
                .map(|field| format!("{prefix}{field}"));
            let others: Vec<String> = inner.attrs.keys().map(str::to_owned).chain(orphans).collect();
            for name in others {
                let stripped = name.strip_prefix(prefix).unwrap_or(&name);
                if !keys.iter().any(|k| k == stripped) && !PRIVATE_NAMES.contains(&name.as_str()) {
                    keys.push(name);
                }
            }
            keys
        };
        keys.into_iter()
            .map(|key| {
                let value = export(self.get(&key));
                (key, value)
            })
            .collect()
    }

    /// The instance's key field in string form.
    pub fn key(&self) -> Result<String> {
        let field = self.class().config().key_field.clone();
        match self.get(&field) {
            Value::Undefined => Err(ModelError::KeyUndefined { field }),
            value => Ok(value.to_js_string()),
        }
    }

    /// `baseUrl` (the instance attribute, else the type's base URL) formatted
    /// with the instance's own fields. `None` when there is no base URL.
    pub fn href(&self) -> Result<Option<String>> {
        let base_url = match self.get("baseUrl") {
            value if value.is_truthy() => value,
            _ => match self.class().base_url() {
                Some(template) if !template.is_empty() => Value::from(template),
                _ => return Ok(None),
            },
        };
        format(&base_url, &Value::Model(self.clone())).map(Some)
    }
}

fn export(value: Value) -> Value {
    match value {
        Value::Model(model) => Value::Object(model.to_object()),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| match item {
                    Value::Model(model) => Value::Object(model.to_object()),
                    other => other,
                })
                .collect(),
        ),
        other => other,
    }
}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}
impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(inner) => f
                .debug_struct("Model")
                .field("type", &inner.class.name)
                .field("slots", &inner.slots)
                .field("attrs", &inner.attrs)
                .finish(),
            Err(_) => f.debug_struct("Model").finish_non_exhaustive(),
        }
    }
}
