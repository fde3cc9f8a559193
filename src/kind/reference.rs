use super::edge::EdgeKind;

/// Kind of reference a client can record via `IndexWriter::record_reference`.
///
/// Like `SymbolKind`, `ReferenceKind` is a client-facing alias with no
/// integer encoding of its own — it is translated to an `EdgeKind` before
/// it ever reaches storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    TypeUsage,
    Usage,
    Call,
    Inheritance,
    Override,
    TypeArgument,
    TemplateSpecialization,
    Include,
    Import,
    MacroUsage,
    AnnotationUsage,
}

impl ReferenceKind {
    /// Total mapping — every `ReferenceKind` variant has a defined `EdgeKind`.
    pub fn to_edge_kind(self) -> EdgeKind {
        match self {
            ReferenceKind::TypeUsage => EdgeKind::TypeUsage,
            ReferenceKind::Usage => EdgeKind::Usage,
            ReferenceKind::Call => EdgeKind::Call,
            ReferenceKind::Inheritance => EdgeKind::Inheritance,
            ReferenceKind::Override => EdgeKind::Override,
            ReferenceKind::TypeArgument => EdgeKind::TypeArgument,
            ReferenceKind::TemplateSpecialization => EdgeKind::TemplateSpecialization,
            ReferenceKind::Include => EdgeKind::Include,
            ReferenceKind::Import => EdgeKind::Import,
            ReferenceKind::MacroUsage => EdgeKind::MacroUsage,
            ReferenceKind::AnnotationUsage => EdgeKind::AnnotationUsage,
        }
    }
}
