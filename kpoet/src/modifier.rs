//! Declaration modifiers.

use std::collections::BTreeSet;

use kpoet_codegen::{CodeWriter, Error, Result};

/// A Kotlin modifier keyword.
///
/// Variants are declared in the conventional modifier order, which is also
/// the order they are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KModifier {
    Public,
    Protected,
    Private,
    Internal,
    Expect,
    Actual,
    Final,
    Open,
    Abstract,
    Sealed,
    Const,
    External,
    Override,
    Lateinit,
    Tailrec,
    Vararg,
    Suspend,
    Inner,
    Enum,
    Annotation,
    Value,
    Fun,
    Companion,
    Inline,
    Noinline,
    Crossinline,
    Infix,
    Operator,
    Data,
}

impl KModifier {
    pub const VISIBILITY: [KModifier; 4] = [Self::Public, Self::Protected, Self::Private, Self::Internal];

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
            Self::Internal => "internal",
            Self::Expect => "expect",
            Self::Actual => "actual",
            Self::Final => "final",
            Self::Open => "open",
            Self::Abstract => "abstract",
            Self::Sealed => "sealed",
            Self::Const => "const",
            Self::External => "external",
            Self::Override => "override",
            Self::Lateinit => "lateinit",
            Self::Tailrec => "tailrec",
            Self::Vararg => "vararg",
            Self::Suspend => "suspend",
            Self::Inner => "inner",
            Self::Enum => "enum",
            Self::Annotation => "annotation",
            Self::Value => "value",
            Self::Fun => "fun",
            Self::Companion => "companion",
            Self::Inline => "inline",
            Self::Noinline => "noinline",
            Self::Crossinline => "crossinline",
            Self::Infix => "infix",
            Self::Operator => "operator",
            Self::Data => "data",
        }
    }

    pub fn is_visibility(self) -> bool {
        Self::VISIBILITY.contains(&self)
    }
}

/// An ordered modifier set.
pub type Modifiers = BTreeSet<KModifier>;

/// Write `modifiers` followed by spaces. `public` is written when it was
/// requested explicitly, or when it is implicit and nothing overrides it.
/// Other implicit modifiers are left out.
pub(crate) fn emit_modifiers(out: &mut CodeWriter, modifiers: &Modifiers, implicit: &Modifiers) -> Result<()> {
    if should_emit_public(modifiers, implicit) {
        out.emit(KModifier::Public.keyword())?;
        out.emit(" ")?;
    }
    for modifier in modifiers
        .iter()
        .filter(|modifier| **modifier != KModifier::Public && !implicit.contains(modifier))
    {
        out.emit(modifier.keyword())?;
        out.emit(" ")?;
    }
    Ok(())
}

fn should_emit_public(modifiers: &Modifiers, implicit: &Modifiers) -> bool {
    if modifiers.contains(&KModifier::Public) {
        return true;
    }
    if !implicit.contains(&KModifier::Public) || modifiers.contains(&KModifier::Override) {
        return false;
    }
    !modifiers.iter().any(|modifier| modifier.is_visibility())
}

/// Reject sets naming more than one visibility.
pub(crate) fn require_single_visibility(owner: &str, modifiers: &Modifiers) -> Result<()> {
    let visibilities: Vec<&str> = modifiers
        .iter()
        .filter(|modifier| modifier.is_visibility())
        .map(|modifier| modifier.keyword())
        .collect();
    if visibilities.len() > 1 {
        return Err(Error::invalid_spec(format!(
            "{owner} has conflicting visibility modifiers: {}",
            visibilities.join(", ")
        )));
    }
    Ok(())
}

/// Reject modifiers outside `allowed`.
pub(crate) fn require_allowed(owner: &str, modifiers: &Modifiers, allowed: &[KModifier]) -> Result<()> {
    let unexpected: Vec<&str> = modifiers
        .iter()
        .filter(|modifier| !allowed.contains(modifier))
        .map(|modifier| modifier.keyword())
        .collect();
    if !unexpected.is_empty() {
        return Err(Error::invalid_spec(format!(
            "modifiers [{}] are not allowed on {owner}",
            unexpected.join(", ")
        )));
    }
    Ok(())
}

pub(crate) fn set<const N: usize>(modifiers: [KModifier; N]) -> Modifiers {
    modifiers.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(modifiers: &[KModifier], implicit: &[KModifier]) -> String {
        let modifiers = modifiers.iter().copied().collect();
        let implicit = implicit.iter().copied().collect();
        CodeWriter::render_standalone(|out| emit_modifiers(out, &modifiers, &implicit)).unwrap()
    }

    #[test]
    fn test_emission_order() {
        assert_eq!(
            render(&[KModifier::Data, KModifier::Internal, KModifier::Open], &[]),
            "internal open data "
        );
        assert_eq!(
            render(&[KModifier::Inline, KModifier::Suspend, KModifier::Override], &[]),
            "override suspend inline "
        );
    }

    #[test]
    fn test_implicit_public() {
        assert_eq!(render(&[], &[KModifier::Public]), "public ");
        assert_eq!(render(&[KModifier::Private], &[KModifier::Public]), "private ");
        assert_eq!(render(&[KModifier::Override], &[KModifier::Public]), "override ");
        assert_eq!(render(&[KModifier::Public, KModifier::Override], &[KModifier::Public]), "public override ");
        assert_eq!(render(&[], &[]), "");
    }

    #[test]
    fn test_implicit_modifiers_are_hidden() {
        assert_eq!(
            render(&[KModifier::Abstract], &[KModifier::Public, KModifier::Abstract]),
            "public "
        );
    }

    #[test]
    fn test_conflicting_visibility() {
        let modifiers = set([KModifier::Private, KModifier::Internal]);
        let err = require_single_visibility("function taco", &modifiers).unwrap_err();
        assert_eq!(
            err.to_string(),
            "function taco has conflicting visibility modifiers: private, internal"
        );
        assert!(require_single_visibility("x", &set([KModifier::Private])).is_ok());
    }

    #[test]
    fn test_allowed_modifiers() {
        let modifiers = set([KModifier::Vararg, KModifier::Open]);
        let err = require_allowed("parameters", &modifiers, &[KModifier::Vararg]).unwrap_err();
        assert!(matches!(err, Error::InvalidSpec(_)));
        assert!(err.to_string().contains("[open]"));
    }
}
