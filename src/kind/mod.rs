//! Bidirectional integer ↔ tagged-enum codecs for every closed kind
//! enumeration the schema persists, plus the two cross-mappings
//! (`SymbolKind → NodeKind`, `ReferenceKind → EdgeKind`) that let the
//! writer façade accept client-facing kinds without exposing storage ints.

mod definition;
mod edge;
mod element_component;
mod location;
mod node;
mod reference;
mod symbol;

pub use definition::DefinitionKind;
pub use edge::EdgeKind;
pub use element_component::ElementComponentKind;
pub use location::LocationKind;
pub use node::NodeKind;
pub use reference::ReferenceKind;
pub use symbol::SymbolKind;
