//! Column bindings for tabular export.
//!
//! A record type registers its fields once, each with optional
//! [`ColumnMeta`] (column index, title, display order, groups). This crate
//! turns that registration into the two views an export pipeline needs:
//!
//! - [`IndexBinding`]: column position → field,
//! - [`TitleBinding`]: column title → field,
//!
//! and caches both per type in a [`Resolver`]. Cached entries hold the type
//! weakly, so short-lived types do not accumulate.
//!
//! ```
//! use sheetbind::{ColumnMeta, RecordType, resolve_index_binding, resolve_title_binding};
//!
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! let person = RecordType::builder::<Person>("Person")
//!     .column("name", ColumnMeta::new().index(0).title("Name"), |p: &Person| &p.name)
//!     .column("age", ColumnMeta::new().index(1).title("Age"), |p: &Person| &p.age)
//!     .build()
//!     .unwrap();
//!
//! let by_index = resolve_index_binding(&person).unwrap();
//! assert_eq!(by_index.get(1).unwrap().name(), "age");
//!
//! let by_title = resolve_title_binding(&person).unwrap();
//! assert_eq!(by_title.get("Name").unwrap().name(), "name");
//! ```

pub mod accessor;
pub mod cache;
pub mod descriptor;
pub mod discovery;
pub mod error;
pub mod groups;
pub mod meta;
pub mod record;
pub mod resolver;
pub mod sorter;

pub use accessor::get_value;
pub use cache::{CachePolicy, MetadataCache, WeakCache};
pub use descriptor::{Accessor, FieldDescriptor};
pub use discovery::{FieldContainer, discover};
pub use error::{AccessError, ConfigError, Error, Result};
pub use groups::is_included;
pub use meta::{ColumnMeta, GroupTag};
pub use record::{ExcelRecord, RecordShape, RecordType, RecordTypeBuilder};
pub use resolver::{
    IndexBinding, Resolver, ResolverConfig, TitleBinding, index_binding_of, resolve_index_binding,
    resolve_title_binding, select_fields, title_binding_of,
};
pub use sorter::{compare_fields, sort_fields};

// Re-export for convenience
pub use sheetbind_common::{CellValue, ToCellValue, ValueKind};

#[cfg(feature = "derive")]
pub use sheetbind_macros::ExcelRecord;

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
    pub use std::sync::Arc;
}
