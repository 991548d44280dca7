//! Case-insensitive lookup of closed enumerations from JSON string tags.
//!
//! Every tagged enumeration reserves two leading variants: index 0 is
//! "unspecified" (never produced by a lookup, only the default of a value
//! that was never examined) and index 1 is "unknown" (examined, but no tag
//! matched). Keeping the two apart lets callers tell a missing decision from
//! an unrecognized one.

/// A closed enumeration whose variants are named by string tags.
pub trait Tagged: Copy + Eq + Sized + 'static {
    /// All variants in declaration order.
    const VARIANTS: &'static [Self];
    /// Canonical tag of each variant, index-aligned with [`Tagged::VARIANTS`].
    const TAGS: &'static [&'static str];

    /// Position of this variant in [`Tagged::VARIANTS`].
    fn index(self) -> usize;

    /// Canonical tag of this variant.
    fn tag(self) -> &'static str {
        Self::TAGS[self.index()]
    }

    /// The never-examined default.
    fn unspecified() -> Self {
        Self::VARIANTS[0]
    }

    /// The examined-but-unrecognized fallback.
    fn unknown() -> Self {
        Self::VARIANTS[1]
    }

    /// Look up a variant by tag, ignoring ASCII case. Falls back to
    /// [`Tagged::unknown`]; never returns [`Tagged::unspecified`].
    fn from_tag(tag: &str) -> Self {
        Self::TAGS
            .iter()
            .zip(Self::VARIANTS)
            .skip(2)
            .find(|(name, _)| name.eq_ignore_ascii_case(tag))
            .map_or_else(Self::unknown, |(_, variant)| *variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ComponentKind;
    use crate::request::HttpMethod;

    fn check_alignment<T: Tagged + std::fmt::Debug>() {
        assert_eq!(T::VARIANTS.len(), T::TAGS.len());
        for (i, v) in T::VARIANTS.iter().enumerate() {
            assert_eq!(v.index(), i, "{v:?} is out of order");
        }
    }

    #[test]
    fn tag_tables_are_index_aligned() {
        check_alignment::<ComponentKind>();
        check_alignment::<HttpMethod>();
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(ComponentKind::from_tag("textinput"), ComponentKind::TextInput);
        assert_eq!(ComponentKind::from_tag("VIEW"), ComponentKind::View);
        assert_eq!(HttpMethod::from_tag("patch"), HttpMethod::Patch);
    }

    #[test]
    fn lookup_never_yields_unspecified() {
        assert_eq!(
            ComponentKind::from_tag("Unspecified"),
            ComponentKind::Unknown
        );
        assert_eq!(ComponentKind::from_tag(""), ComponentKind::Unknown);
        assert_eq!(HttpMethod::from_tag("Unspecified"), HttpMethod::Unknown);
        assert_eq!(HttpMethod::from_tag("FETCH"), HttpMethod::Unknown);
    }

    #[test]
    fn tag_round_trips_through_lookup() {
        for kind in &ComponentKind::VARIANTS[2..] {
            assert_eq!(ComponentKind::from_tag(kind.tag()), *kind);
        }
    }
}
