/// Kind of a node, encoded as a bit position in the on-disk `node.type` column.
///
/// The integer values are part of the on-disk format — never renumber an
/// existing variant, only append.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Unknown,
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
    File,
    Macro,
    Union,
}

impl NodeKind {
    pub fn to_i32(self) -> i32 {
        match self {
            NodeKind::Unknown => 1 << 0,
            NodeKind::Type => 1 << 1,
            NodeKind::BuiltinType => 1 << 2,
            NodeKind::Module => 1 << 3,
            NodeKind::Namespace => 1 << 4,
            NodeKind::Package => 1 << 5,
            NodeKind::Struct => 1 << 6,
            NodeKind::Class => 1 << 7,
            NodeKind::Interface => 1 << 8,
            NodeKind::Annotation => 1 << 9,
            NodeKind::GlobalVariable => 1 << 10,
            NodeKind::Field => 1 << 11,
            NodeKind::Function => 1 << 12,
            NodeKind::Method => 1 << 13,
            NodeKind::Enum => 1 << 14,
            NodeKind::EnumConstant => 1 << 15,
            NodeKind::Typedef => 1 << 16,
            NodeKind::TypeParameter => 1 << 17,
            NodeKind::File => 1 << 18,
            NodeKind::Macro => 1 << 19,
            NodeKind::Union => 1 << 20,
        }
    }

    /// Unknown integers decode to `NodeKind::Unknown` rather than failing —
    /// `node.type` has a sentinel, unlike `LocationKind`.
    pub fn from_i32(v: i32) -> NodeKind {
        const VARIANTS: &[NodeKind] = &[
            NodeKind::Unknown,
            NodeKind::Type,
            NodeKind::BuiltinType,
            NodeKind::Module,
            NodeKind::Namespace,
            NodeKind::Package,
            NodeKind::Struct,
            NodeKind::Class,
            NodeKind::Interface,
            NodeKind::Annotation,
            NodeKind::GlobalVariable,
            NodeKind::Field,
            NodeKind::Function,
            NodeKind::Method,
            NodeKind::Enum,
            NodeKind::EnumConstant,
            NodeKind::Typedef,
            NodeKind::TypeParameter,
            NodeKind::File,
            NodeKind::Macro,
            NodeKind::Union,
        ];
        VARIANTS
            .iter()
            .copied()
            .find(|k| k.to_i32() == v)
            .unwrap_or(NodeKind::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_is_bit_zero() {
        assert_eq!(NodeKind::Unknown.to_i32(), 1);
    }

    #[test]
    fn union_is_bit_twenty() {
        assert_eq!(NodeKind::Union.to_i32(), 1 << 20);
    }

    #[test]
    fn round_trips_every_variant() {
        let variants = [
            NodeKind::Unknown,
            NodeKind::Type,
            NodeKind::BuiltinType,
            NodeKind::Module,
            NodeKind::Namespace,
            NodeKind::Package,
            NodeKind::Struct,
            NodeKind::Class,
            NodeKind::Interface,
            NodeKind::Annotation,
            NodeKind::GlobalVariable,
            NodeKind::Field,
            NodeKind::Function,
            NodeKind::Method,
            NodeKind::Enum,
            NodeKind::EnumConstant,
            NodeKind::Typedef,
            NodeKind::TypeParameter,
            NodeKind::File,
            NodeKind::Macro,
            NodeKind::Union,
        ];
        for kind in variants {
            assert_eq!(NodeKind::from_i32(kind.to_i32()), kind);
        }
    }

    #[test]
    fn unknown_integer_decodes_to_unknown() {
        assert_eq!(NodeKind::from_i32(1 << 30), NodeKind::Unknown);
    }
}
