//! Basemodel – a lightweight model layer for plain data records.
//!
//! Application code declares typed, nested and array-valued fields on a model
//! type and gets coercion, wrapping of nested data, path aliases, plain-object
//! export and cloning for free. There is no persistence and no I/O; the whole
//! crate is the property-binding behaviour of the model instances.
//!
//! * A [`schema::Schema`] maps field names to [`schema::FieldSpec`]s:
//!   `Boolean`, `Number`, `String`, a nested model type, an array of a nested
//!   model type (possibly the declaring type itself, for trees), or an alias
//!   (a dotted path elsewhere in the same instance).
//! * A [`model::ModelType`] owns the schema its constructor installs, plus the
//!   [`settings::ModelConfig`] (backing-store prefix, key field, observer).
//! * A [`model::Model`] is a shared handle to one instance. All reads and
//!   writes go through [`model::Model::get`] and [`model::Model::set`], which
//!   interpret the instance's accessor table.
//! * A [`value::Value`] is the loosely typed datum flowing through accessors.
//!
//! ## Modules
//! * [`value`] – Dynamic values, ordered objects and loose coercions.
//! * [`schema`] – Field descriptors, schemas and serialize field lists.
//! * [`model`] – Model types and instances.
//! * [`observer`] – The write hook used by alias paths.
//! * [`format`] – `{name}` template substitution.
//! * [`settings`] – Type-level configuration and its loading.
//! * [`logging`] – Subscriber setup for the `tracing` output of the engine.
//!
//! ## Coercion
//! | Declared | Read | Write |
//! |---|---|---|
//! | `Boolean` | stored value | truthiness of the numeric form |
//! | `Number` | numeric form of the stored value | numeric form |
//! | `String` | string form of the stored value | string form |
//!
//! So `"0"` written to a `Boolean` field reads back `false`, and `5` written to
//! a `String` field reads back `"5"`.
//!
//! ## Quick Start
//! ```
//! use basemodel::{FieldSpec, ModelType, Value};
//! use serde_json::json;
//!
//! let owner = ModelType::builder("Owner")
//!     .field("name", FieldSpec::String)
//!     .build()
//!     .unwrap();
//! let task = ModelType::builder("Task")
//!     .field("id", FieldSpec::Number)
//!     .field("done", FieldSpec::Boolean)
//!     .field("owner", FieldSpec::Model(owner.clone()))
//!     .field("label", FieldSpec::alias("meta.label"))
//!     .build()
//!     .unwrap();
//!
//! let t = task.create(Value::from(json!({"id": "7", "done": "0", "owner": {"name": "Ann"}})));
//! assert_eq!(t.get("id"), Value::Number(7.0));
//! assert_eq!(t.get("done"), Value::Bool(false));
//! assert!(t.get("owner").is_model_of(&owner));
//! assert_eq!(t.get("label"), Value::from(""));
//! t.set("label", "urgent");
//! assert_eq!(t.get("meta").member("label"), Value::from("urgent"));
//! assert_eq!(t.key().unwrap(), "7");
//! ```
//!
//! ## Status
//! Single-threaded by construction: model handles are `Rc`-based and not `Send`.

pub mod error;
pub mod format;
pub mod logging;
pub mod model;
pub mod observer;
mod path;
pub mod schema;
pub mod settings;
pub mod value;

pub use error::{ModelError, Result};
pub use model::{Model, ModelClass, ModelType};
pub use observer::{DirectAssignment, MutationObserver, SetTarget};
pub use schema::{FieldSpec, Fields, Schema};
pub use settings::ModelConfig;
pub use value::{Object, Value};
