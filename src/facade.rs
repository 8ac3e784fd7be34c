//! The small in-process entry point callers actually reach for.
//!
//! Grounded on `ModelDeserializer` in
//! `core/deserialization/deserializer.py`: `deserialize` there accepts
//! any mix of file paths, in-memory batches and already-wrapped
//! `DataSource`s, normalises them through an `InputProcessor`, then for
//! each source picks a strategy (via the factory) and calls
//! `retrieve_model`. The one deliberate behavioural change is that the
//! Python version yields one `IUmlModel` per source; here every source
//! in a single [`Deserializer::translate`] call is folded into the
//! *same* [`UmlModelBuilder`] before a single final `build()`, because
//! Papyrus needs its `.uml` and `.notation` pair to share one model
//! because Papyrus needs its `.uml` and `.notation` pair to share a model.
//!
//! There is no `InputProcessor`/`ExtensionsManager`/`kink`-DI
//! equivalent: `StrategyRegistry::with_builtin_strategies` is the
//! import-time registration those did reflectively, done explicitly
//! instead (see `strategy/registry.rs`).

use tracing::{debug, info};

use crate::builder::UmlModelBuilder;
use crate::data_source::DataSource;
use crate::errors::TranslationResult;
use crate::model::Model;
use crate::strategy::{StrategyRegistry, SupportedFormat};

/// Translates one or more [`DataSource`]s into a canonical [`Model`],
/// dispatching each source to a detected or pinned [`crate::strategy::Strategy`].
///
/// A `Deserializer` can be reused across translations: [`Self::clear`]
/// resets it to the state of a freshly constructed one.
pub struct Deserializer {
    registry: StrategyRegistry,
}

impl Deserializer {
    /// A deserializer carrying the three builtin strategies.
    pub fn new() -> Self {
        Self {
            registry: StrategyRegistry::with_builtin_strategies(),
        }
    }

    /// A deserializer over a caller-supplied registry, for tests or a
    /// deployment that only wants a subset of the builtin strategies.
    pub fn with_registry(registry: StrategyRegistry) -> Self {
        Self { registry }
    }

    /// Register an additional strategy, in place of calling
    /// [`Self::with_registry`] up front. Fails once this deserializer
    /// has translated at least once (see [`StrategyRegistry::register_strategy`]).
    pub fn register_strategy(&mut self, strategy: Box<dyn crate::strategy::Strategy>) -> TranslationResult<()> {
        self.registry.register_strategy(strategy)
    }

    /// Drop any strategies registered beyond the three builtins.
    ///
    /// Every [`Self::translate`] call already builds and consumes its
    /// own [`UmlModelBuilder`], so no model state survives between
    /// calls to begin with -- the registry is the only thing a
    /// `Deserializer` carries across translations, and this is its
    /// reset.
    pub fn clear(&mut self) {
        self.registry = StrategyRegistry::with_builtin_strategies();
    }

    /// Translate `sources` into a model named `model_id`, pinning the
    /// dialect to `format` when given rather than running detection.
    ///
    /// Every source is processed into the same [`UmlModelBuilder`] in
    /// the order given, so a
    /// reference in the second source to an id the first source
    /// defined resolves; `build()` is only called once every source
    /// has been processed, fatally failing on any reference that never
    /// resolved anywhere in the batch.
    pub fn translate(
        &self,
        model_id: impl Into<String>,
        sources: impl IntoIterator<Item = DataSource>,
        format: Option<SupportedFormat>,
    ) -> TranslationResult<Model> {
        let mut builder = UmlModelBuilder::new(model_id);
        for source in sources {
            let strategy = match format {
                Some(format) => self.registry.strategy_for(format)?,
                None => {
                    debug!("no format pinned, running detection");
                    self.registry.detect(&source)?
                }
            };
            info!(strategy = strategy.name(), "processing data source");
            strategy.process(&source, &mut builder)?;
        }
        builder.finish_strict()
    }

    /// Alias for [`Self::translate`], named to match the collaborator
    /// contract some callers expect of a deserialization facade.
    pub fn deserialize(
        &self,
        model_id: impl Into<String>,
        sources: impl IntoIterator<Item = DataSource>,
        format: Option<SupportedFormat>,
    ) -> TranslationResult<Model> {
        self.translate(model_id, sources, format)
    }

    /// The registry this deserializer dispatches against.
    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }
}

impl Default for Deserializer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NamedElement;

    #[test]
    fn test_translate_pinned_format_builds_model() {
        let xml = r#"<xmi:XMI xmi:version="2.1" xmlns:xmi="http://schema.omg.org/spec/XMI/2.1" xmlns:uml="http://schema.omg.org/spec/UML/2.1">
            <xmi:Documentation exporter="Enterprise Architect" exporterVersion="6.5"/>
            <uml:Model name="Model">
                <packagedElement xmi:type="uml:Class" xmi:id="cls-1" name="Car"/>
            </uml:Model>
        </xmi:XMI>"#;
        let deserializer = Deserializer::new();
        let source = DataSource::from_str(xml);
        let model = deserializer
            .translate("model-1", vec![source], Some(SupportedFormat::EaXmi))
            .unwrap();
        assert_eq!(model.elements.classes.len(), 1);
        assert_eq!(model.elements.classes[0].borrow().name(), Some("Car"));
    }

    #[test]
    fn test_translate_detects_format_when_unpinned() {
        let json = r#"{"_type": "UMLModel", "_id": "m1", "name": "Model", "ownedElements": [
            {"_type": "UMLClass", "_id": "cls-1", "name": "Car"}
        ]}"#;
        let deserializer = Deserializer::new();
        let source = DataSource::from_str(json);
        let model = deserializer.translate("model-1", vec![source], None).unwrap();
        assert_eq!(model.elements.classes.len(), 1);
    }

    #[test]
    fn test_translate_folds_multiple_sources_into_one_model() {
        let uml = r#"<xmi:XMI xmi:version="2.1" xmlns:xmi="http://schema.omg.org/spec/XMI/2.1" xmlns:uml="http://www.eclipse.org/uml2/5.0.0/UML">
            <uml:Model xmi:id="model" name="Model">
                <packagedElement xmi:type="uml:Class" xmi:id="cls-car" name="Car"/>
            </uml:Model>
        </xmi:XMI>"#;
        let notation = r#"<notation:Diagram xmi:id="diagram-1" name="CarDiagram" type="PapyrusUMLClassDiagram" xmlns:xmi="http://www.omg.org/XMI" xmlns:notation="http://www.eclipse.org/gmf/runtime/1.0.2/notation">
            <children xmi:id="shape-1" element="cls-car"/>
        </notation:Diagram>"#;
        let deserializer = Deserializer::new();
        let sources = vec![DataSource::from_str(uml), DataSource::from_str(notation)];
        let model = deserializer
            .translate("model-1", sources, Some(SupportedFormat::Papyrus))
            .unwrap();
        assert_eq!(model.elements.classes.len(), 1);
        assert_eq!(model.diagrams.class_diagrams.len(), 1);
        assert_eq!(model.diagrams.class_diagrams[0].elements.element_ids, vec!["cls-car".to_string()]);
    }

    #[test]
    fn test_translate_unsupported_format_errors() {
        let deserializer = Deserializer::new();
        let source = DataSource::from_str("not a uml document at all");
        let err = deserializer.translate("model-1", vec![source], None).unwrap_err();
        assert!(matches!(err, crate::errors::TranslationError::NoStrategyAvailable));
    }
}
