//! Per-format configuration: dialect-specific tag/attribute names
//! looked up through an explicit, lazily-evaluated key path.
//!
//! Grounded on `core/configuration/config_proxy.py`'s `ConfigProxy` and
//! the per-format constant tables (`core/deserialization/formats/*/`).
//! Python builds the key path by recording attribute/item accesses
//! through `__getattr__`/`__getitem__` on a class whose metaclass
//! intercepts them; Rust has no such hook, so [`ConfigPath`] builds the
//! same path explicitly through `.field()`/`.index()` calls, and
//! [`ConfigNamespace::resolve`] walks it against a concrete namespace.

mod namespace;
mod path;

pub use namespace::ConfigNamespace;
pub use path::ConfigPath;
