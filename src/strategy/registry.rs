//! Strategy lookup, by explicit format or by detection.
//!
//! Grounded on `DeserializationStrategyFactory` in
//! `core/deserialization/factory.py`, which keeps a class-level
//! registry of `(SupportedFormat, DeserializationStrategyFactoryInterface)`
//! pairs built once at import time. The redesign notes call that module
//! level global out ("Global mutable state") -- here the registry is an
//! explicit value a caller constructs and owns, with
//! [`StrategyRegistry::with_builtin_strategies`] as the equivalent of
//! the Python module's import-time registration.

use std::cell::Cell;

use crate::data_source::DataSource;
use crate::errors::{TranslationError, TranslationResult};
use crate::strategy::{EaXmiStrategy, PapyrusStrategy, StarUmlStrategy, Strategy, SupportedFormat};

/// Holds the strategies available for a translation, and picks one by
/// explicit format or by running every registered strategy's
/// detection pipe in registration order.
///
/// Registration is only open before the first dispatch
/// ([`Self::strategy_for`] or [`Self::detect`]): once a registry has
/// started picking strategies for callers, it is read-mostly for the
/// rest of its life.
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn Strategy>>,
    dispatched: Cell<bool>,
}

impl StrategyRegistry {
    /// An empty registry with nothing registered.
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
            dispatched: Cell::new(false),
        }
    }

    /// A registry carrying the three dialects this crate ships with,
    /// mirroring `DeserializationStrategyFactory`'s import-time
    /// registration of the EA-XMI, Papyrus and StarUML MDJ factories.
    pub fn with_builtin_strategies() -> Self {
        Self {
            strategies: vec![Box::new(EaXmiStrategy::new()), Box::new(PapyrusStrategy::new()), Box::new(StarUmlStrategy::new())],
            dispatched: Cell::new(false),
        }
    }

    /// Add a strategy to the registry, in addition to (or replacing the
    /// slot of) a future builtin. Registration order is detection
    /// order. Fails once this registry has dispatched at least once.
    pub fn register_strategy(&mut self, strategy: Box<dyn Strategy>) -> TranslationResult<()> {
        if self.dispatched.get() {
            return Err(TranslationError::Configuration(
                "cannot register a strategy after the registry has started dispatching".to_string(),
            ));
        }
        self.strategies.push(strategy);
        Ok(())
    }

    /// The strategy registered for `format`, regardless of content.
    pub fn strategy_for(&self, format: SupportedFormat) -> TranslationResult<&dyn Strategy> {
        self.dispatched.set(true);
        self.strategies
            .iter()
            .find(|s| s.supported_format() == format)
            .map(|s| s.as_ref())
            .ok_or(TranslationError::NoStrategyAvailable)
    }

    /// Detect which registered strategy matches `source`'s content.
    /// Exactly one strategy accepting the source is success; none
    /// accepting is [`TranslationError::NoStrategyAvailable`]; more
    /// than one is [`TranslationError::AmbiguousFormat`] -- detection
    /// never falls back to "first match wins".
    pub fn detect(&self, source: &DataSource) -> TranslationResult<&dyn Strategy> {
        self.dispatched.set(true);
        let mut matches = Vec::new();
        for strategy in &self.strategies {
            if strategy.can_deserialize(source)? {
                matches.push(strategy.as_ref());
            }
        }
        match matches.len() {
            0 => Err(TranslationError::NoStrategyAvailable),
            1 => Ok(matches[0]),
            _ => Err(TranslationError::AmbiguousFormat {
                candidates: matches.iter().map(|s| s.name().to_string()).collect(),
            }),
        }
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_builtin_strategies()
    }
}
