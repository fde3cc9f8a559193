/// Kind of an edge, encoded as a bit position in the on-disk `edge.type` column.
///
/// `1 << 10` is intentionally unused — a gap left by the on-disk format this
/// crate is compatible with. Do not fill it in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Unknown,
    Member,
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

impl EdgeKind {
    pub fn to_i32(self) -> i32 {
        match self {
            EdgeKind::Unknown => 0,
            EdgeKind::Member => 1 << 0,
            EdgeKind::TypeUsage => 1 << 1,
            EdgeKind::Usage => 1 << 2,
            EdgeKind::Call => 1 << 3,
            EdgeKind::Inheritance => 1 << 4,
            EdgeKind::Override => 1 << 5,
            EdgeKind::TypeArgument => 1 << 6,
            EdgeKind::TemplateSpecialization => 1 << 7,
            EdgeKind::Include => 1 << 8,
            EdgeKind::Import => 1 << 9,
            EdgeKind::MacroUsage => 1 << 11,
            EdgeKind::AnnotationUsage => 1 << 12,
        }
    }

    pub fn from_i32(v: i32) -> EdgeKind {
        const VARIANTS: &[EdgeKind] = &[
            EdgeKind::Member,
            EdgeKind::TypeUsage,
            EdgeKind::Usage,
            EdgeKind::Call,
            EdgeKind::Inheritance,
            EdgeKind::Override,
            EdgeKind::TypeArgument,
            EdgeKind::TemplateSpecialization,
            EdgeKind::Include,
            EdgeKind::Import,
            EdgeKind::MacroUsage,
            EdgeKind::AnnotationUsage,
        ];
        VARIANTS
            .iter()
            .copied()
            .find(|k| k.to_i32() == v)
            .unwrap_or(EdgeKind::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_is_zero() {
        assert_eq!(EdgeKind::Unknown.to_i32(), 0);
    }

    #[test]
    fn gap_at_bit_ten_is_unused() {
        assert_eq!(EdgeKind::from_i32(1 << 10), EdgeKind::Unknown);
    }

    #[test]
    fn macro_usage_and_annotation_usage_bits() {
        assert_eq!(EdgeKind::MacroUsage.to_i32(), 1 << 11);
        assert_eq!(EdgeKind::AnnotationUsage.to_i32(), 1 << 12);
    }

    #[test]
    fn round_trips_every_variant() {
        let variants = [
            EdgeKind::Member,
            EdgeKind::TypeUsage,
            EdgeKind::Usage,
            EdgeKind::Call,
            EdgeKind::Inheritance,
            EdgeKind::Override,
            EdgeKind::TypeArgument,
            EdgeKind::TemplateSpecialization,
            EdgeKind::Include,
            EdgeKind::Import,
            EdgeKind::MacroUsage,
            EdgeKind::AnnotationUsage,
        ];
        for kind in variants {
            assert_eq!(EdgeKind::from_i32(kind.to_i32()), kind);
        }
    }
}
