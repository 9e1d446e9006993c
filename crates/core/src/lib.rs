//! Core library for Multitype values.
//!
//! [`Value`] is a tagged dynamic value (integer, double, boolean, string,
//! list, string-keyed map or `None`) meant for configuration options. The
//! crate keeps three error policies apart: ordering and arithmetic on
//! incompatible tags return an error, the `as_*` accessors quietly fall back
//! to zero values, and [`Value::parse`] turns anything it cannot read into
//! `None`. [`OptionStore`] builds a keyed option registry on top of the text
//! format.

pub mod config;
pub mod error;
pub mod ops;
pub mod options;
pub mod text;
pub mod value;

pub use config::StoreConfig;
pub use error::{MultitypeError, Result};
pub use ops::Operator;
pub use options::OptionStore;
pub use value::{Tag, Value};
