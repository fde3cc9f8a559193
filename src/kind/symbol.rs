use super::node::NodeKind;

/// Kind of symbol a client can record via `IndexWriter::record_symbol_kind`.
///
/// `SymbolKind` carries no integer encoding of its own — it exists only to
/// be translated to a `NodeKind`, which is what actually gets persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Type,
    BuiltinType,
    Module,
    Namespace,
    Package,
    Struct,
    Class,
    Interface,
    Annotation,
    GlobalVariable,
    Field,
    Function,
    Method,
    Enum,
    EnumConstant,
    Typedef,
    TypeParameter,
    Macro,
    Union,
}

impl SymbolKind {
    /// Total mapping — every `SymbolKind` variant has a defined `NodeKind`.
    pub fn to_node_kind(self) -> NodeKind {
        match self {
            SymbolKind::Type => NodeKind::Type,
            SymbolKind::BuiltinType => NodeKind::BuiltinType,
            SymbolKind::Module => NodeKind::Module,
            SymbolKind::Namespace => NodeKind::Namespace,
            SymbolKind::Package => NodeKind::Package,
            SymbolKind::Struct => NodeKind::Struct,
            SymbolKind::Class => NodeKind::Class,
            SymbolKind::Interface => NodeKind::Interface,
            SymbolKind::Annotation => NodeKind::Annotation,
            SymbolKind::GlobalVariable => NodeKind::GlobalVariable,
            SymbolKind::Field => NodeKind::Field,
            SymbolKind::Function => NodeKind::Function,
            SymbolKind::Method => NodeKind::Method,
            SymbolKind::Enum => NodeKind::Enum,
            SymbolKind::EnumConstant => NodeKind::EnumConstant,
            SymbolKind::Typedef => NodeKind::Typedef,
            SymbolKind::TypeParameter => NodeKind::TypeParameter,
            SymbolKind::Macro => NodeKind::Macro,
            SymbolKind::Union => NodeKind::Union,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_maps_to_a_distinct_node_kind() {
        let variants = [
            SymbolKind::Type,
            SymbolKind::BuiltinType,
            SymbolKind::Module,
            SymbolKind::Namespace,
            SymbolKind::Package,
            SymbolKind::Struct,
            SymbolKind::Class,
            SymbolKind::Interface,
            SymbolKind::Annotation,
            SymbolKind::GlobalVariable,
            SymbolKind::Field,
            SymbolKind::Function,
            SymbolKind::Method,
            SymbolKind::Enum,
            SymbolKind::EnumConstant,
            SymbolKind::Typedef,
            SymbolKind::TypeParameter,
            SymbolKind::Macro,
            SymbolKind::Union,
        ];
        let mut seen = std::collections::HashSet::new();
        for v in variants {
            assert!(seen.insert(v.to_node_kind().to_i32()));
        }
    }

    #[test]
    fn struct_maps_to_node_struct() {
        assert_eq!(SymbolKind::Struct.to_node_kind(), NodeKind::Struct);
    }
}
