//! The lazy, pull-based pipe tree that turns a raw document into
//! canonical model entities.

mod batch;
mod json;
mod pipe;
mod xml;

pub use batch::DataBatch;
pub use json::{array_of, flatten_reference, optional_str, required_str};
pub use pipe::{FormatDetectionPipe, Pipe, PipeNode};
pub use xml::{
    attributes_of, children_of, children_with_tag, map_value_from_key, parse_xml_to_value, tag_of,
    AttributeCondition, ATTRIBUTES_KEY, CHILDREN_KEY, TAG_KEY, TEXT_KEY,
};
