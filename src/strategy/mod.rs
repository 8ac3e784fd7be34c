//! One [`Strategy`] per supported source dialect, each owning its own
//! format detection and processing pipe network.

mod ea_xmi;
mod papyrus;
mod registry;
mod staruml;

pub use ea_xmi::EaXmiStrategy;
pub use papyrus::PapyrusStrategy;
pub use registry::StrategyRegistry;
pub use staruml::StarUmlStrategy;

use crate::builder::UmlModelBuilder;
use crate::data_source::DataSource;
use crate::errors::TranslationResult;
use crate::pipeline::{FormatDetectionPipe, Pipe, PipeNode};

/// A source dialect this crate can read. Used to pin a strategy rather
/// than probing every registered one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedFormat {
    /// Enterprise Architect's XMI 2.1 export
    EaXmi,
    /// Eclipse Papyrus split `.uml`/`.notation` export
    Papyrus,
    /// StarUML's native `.mdj` JSON export
    StarUml,
}

/// A per-format orchestrator bundling parsing, detection and
/// processing. Each registered strategy is a stateless
/// value: all mutable translation state lives in the [`UmlModelBuilder`]
/// passed to [`Strategy::process`].
pub trait Strategy {
    /// The format this strategy reads.
    fn supported_format(&self) -> SupportedFormat;

    /// A short, stable name for diagnostics and registry lookups.
    fn name(&self) -> &'static str;

    /// Whether `source`'s content matches this strategy's dialect.
    /// Runs this strategy's detection pipe but discards any entities
    /// it would have constructed -- detection never mutates `builder`.
    fn can_deserialize(&self, source: &DataSource) -> TranslationResult<bool>;

    /// Parse `source` and register every canonical entity it describes
    /// with `builder`. Does not call [`UmlModelBuilder::build`] -- the
    /// facade drives that once every source in a translation has been
    /// processed, so cross-document references (Papyrus) still resolve.
    fn process(&self, source: &DataSource, builder: &mut UmlModelBuilder) -> TranslationResult<()>;

    /// The pipe [`Self::can_deserialize`] runs, wrapped so its
    /// fallibility collapses to a plain boolean. Built fresh per call
    /// since the pipe tree owns no translation state of its own.
    fn detection_pipe(&self) -> FormatDetectionPipe<Box<dyn Pipe>>;

    /// The pipe tree [`Self::process`] runs `source`'s root batch
    /// through. Built fresh per call for the same reason.
    fn processing_pipe(&self) -> PipeNode;
}
