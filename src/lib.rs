//! # UML Ingest Core
//!
//! A format-detecting deserialization pipeline and canonical UML model
//! builder for EA-XMI, Papyrus (split XMI + notation) and StarUML MDJ
//! export files.
//!
//! This crate provides:
//! - **Model**: a canonical, format-independent in-memory UML model
//!   (classifiers, features, relationships, sequence-diagram
//!   interactions, packages and diagrams)
//! - **Pipeline**: a lazy, pull-based pipe tree that detects a source
//!   document's format and hands batches of parsed data down to the
//!   strategy that knows how to build canonical entities from them
//! - **Id Resolver**: deferred cross-reference resolution, so an
//!   entity referencing an id not yet seen is registered once its
//!   target appears, in any order the source happens to list them
//! - **Builder**: a fluent, fallible construction API wrapping the
//!   resolver and the canonical model's owning element store
//! - **Strategies**: one per supported dialect, each owning its format
//!   detection and its processing pipeline
//!
//! ## Design Principles
//!
//! 1. **Composition over inheritance**: canonical entities embed shared
//!    core structs and implement shared traits, rather than sitting in
//!    a class hierarchy.
//! 2. **Explicit over magic**: configuration lookups, strategy
//!    registration and dynamic construction are plain, inspectable
//!    Rust, not metaprogramming.
//! 3. **Fail loud on malformed input, fail quiet on wrong format**:
//!    format detection and parsing are deliberately different error
//!    paths (see [`errors::TranslationError`]).
//! 4. **Order matters**: enumeration literals, operation parameters
//!    and interaction message order all mirror the order they were
//!    declared in the source document, upheld by construction rather
//!    than a post-hoc sort.

#![warn(missing_docs)]

pub mod builder;
pub mod config;
pub mod data_source;
pub mod errors;
pub mod external;
pub mod facade;
pub mod id_resolver;
pub mod model;
pub mod pipeline;
pub mod strategy;

pub use builder::UmlModelBuilder;
pub use data_source::DataSource;
pub use errors::{TranslationError, TranslationResult};
pub use facade::Deserializer;
pub use id_resolver::IdResolver;
