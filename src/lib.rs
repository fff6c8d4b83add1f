//! XMP Property Tree
//!
//! An in-memory typed property model for XMP-style metadata: namespace
//! qualified keys, structured (scalar, bag, sequence, language-alternative)
//! value types, and a static schema registry consulted when properties are
//! inserted.
//!
//! ## Features
//!
//! - **Typed Scalars**: Text, Boolean, Integer, Date, URL with a canonical
//!   textual form and a lossless round trip
//! - **Structured Values**: bags (idempotent adds), sequences (ordered,
//!   duplicates kept) and language alternatives with an `x-default` entry
//! - **Schema Registry**: namespace URI + preferred prefix to declared
//!   property kinds, built-in catalog plus configuration-driven additions
//! - **Strict or Lenient Validation**: kind conflicts fail or are logged,
//!   selected per tree
//! - **Stable Listings**: properties iterate in insertion order so
//!   re-serialization is reproducible
//!
//! ## Architecture
//!
//! ```text
//! RightsSchema (accessor facade)        parser / serializer (external)
//!        │                                        │
//!        └──────────────┬─────────────────────────┘
//!                       ▼
//!                 PropertyTree ──── validates against ───▶ SchemaRegistry
//!                       │
//!                       ▼
//!                 PropertyNode (Scalar | Bag | Sequence | LangAlt)
//!                       │
//!                       ▼
//!                  XmpValue (ValueCodec)
//! ```

pub mod config;
pub mod error;
pub mod name;
pub mod node;
pub mod registry;
pub mod rights;
pub mod tree;
pub mod value;

pub use config::{ValidationMode, XmpConfig};
pub use error::{DecodeError, DecodeErrorKind, Result, XmpError};
pub use name::{QualifiedName, PREFIX_SEPARATOR};
pub use node::{PropertyNode, StructuralKind, DEFAULT_LANG};
pub use registry::{SchemaDescriptor, SchemaRegistry};
pub use rights::RightsSchema;
pub use tree::PropertyTree;
pub use value::{ScalarKind, XmpValue};
