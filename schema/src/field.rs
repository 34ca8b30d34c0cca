//! Field kinds, modifiers and definitions.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The kind of a search parameter, carrying its default value.
///
/// The kind fixes which codec handles the field; it is chosen when the schema
/// is declared, never inferred from a runtime value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum FieldKind {
    /// Free text, optionally restricted to a set of options.
    String { default: String },

    /// Integer, optionally bounded.
    Number { default: i64 },

    /// `true` / `false`.
    Boolean { default: bool },

    /// Ordered list of filter expressions, one URL pair per entry.
    Filters { default: Vec<String> },

    /// Pass-through string with no validation.
    Opaque { default: String },
}

impl FieldKind {
    /// Returns a short, stable name for the kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::String { .. } => "string",
            Self::Number { .. } => "number",
            Self::Boolean { .. } => "boolean",
            Self::Filters { .. } => "filters",
            Self::Opaque { .. } => "opaque",
        }
    }
}

/// Flags fixed at declaration time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Modifiers {
    /// The decoded value is always the default.
    pub enforced: bool,
    /// Kept out of the browser-visible URL.
    pub hidden: bool,
    /// Kept out of delta (shareable) output.
    pub ignored: bool,
    /// Absence decodes to null instead of the default.
    pub nullable: bool,
}

/// A field definition: kind, constraints and modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldDef {
    pub kind: FieldKind,
    /// Lower bound (numbers only).
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub min: Option<i64>,
    /// Upper bound (numbers only).
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub max: Option<i64>,
    /// Allowed values (strings only).
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub options: Option<Vec<String>>,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub modifiers: Modifiers,
}

impl FieldDef {
    /// Creates a definition of the given kind with no constraints or modifiers.
    #[must_use]
    pub const fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            min: None,
            max: None,
            options: None,
            modifiers: Modifiers {
                enforced: false,
                hidden: false,
                ignored: false,
                nullable: false,
            },
        }
    }

    /// Creates a string field.
    #[must_use]
    pub fn string(default: impl Into<String>) -> Self {
        Self::new(FieldKind::String {
            default: default.into(),
        })
    }

    /// Creates a number field.
    #[must_use]
    pub const fn number(default: i64) -> Self {
        Self::new(FieldKind::Number { default })
    }

    /// Creates a boolean field.
    #[must_use]
    pub const fn boolean(default: bool) -> Self {
        Self::new(FieldKind::Boolean { default })
    }

    /// Creates a filters (string list) field.
    #[must_use]
    pub fn filters<I, S>(default: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(FieldKind::Filters {
            default: default.into_iter().map(Into::into).collect(),
        })
    }

    /// Creates an opaque pass-through field.
    #[must_use]
    pub fn opaque(default: impl Into<String>) -> Self {
        Self::new(FieldKind::Opaque {
            default: default.into(),
        })
    }

    /// Marks the field as enforced.
    #[must_use]
    pub fn enforced(mut self) -> Self {
        self.modifiers.enforced = true;
        self
    }

    /// Marks the field as hidden.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.modifiers.hidden = true;
        self
    }

    /// Marks the field as ignored.
    #[must_use]
    pub fn ignored(mut self) -> Self {
        self.modifiers.ignored = true;
        self
    }

    /// Marks the field as nullable.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.modifiers.nullable = true;
        self
    }

    /// Sets the lower bound.
    #[must_use]
    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    /// Sets the upper bound.
    #[must_use]
    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    /// Restricts a string field to the given values.
    #[must_use]
    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }
}

/// A named field, as stored in a [`Schema`](crate::Schema).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Field {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub def: FieldDef,
}

impl Field {
    /// Creates a named field.
    #[must_use]
    pub fn new(name: impl Into<String>, def: FieldDef) -> Self {
        Self {
            name: name.into(),
            def,
        }
    }
}

/// Shorthand for [`FieldDef::string`].
#[must_use]
pub fn string(default: impl Into<String>) -> FieldDef {
    FieldDef::string(default)
}

/// Shorthand for [`FieldDef::number`].
#[must_use]
pub const fn number(default: i64) -> FieldDef {
    FieldDef::number(default)
}

/// Shorthand for [`FieldDef::boolean`].
#[must_use]
pub const fn boolean(default: bool) -> FieldDef {
    FieldDef::boolean(default)
}

/// Shorthand for [`FieldDef::filters`].
#[must_use]
pub fn filters<I, S>(default: I) -> FieldDef
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    FieldDef::filters(default)
}

/// Shorthand for [`FieldDef::opaque`].
#[must_use]
pub fn opaque(default: impl Into<String>) -> FieldDef {
    FieldDef::opaque(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_kind_constructors() {
        assert!(matches!(string("x").kind, FieldKind::String { .. }));
        assert!(matches!(number(1).kind, FieldKind::Number { default: 1 }));
        assert!(matches!(
            boolean(true).kind,
            FieldKind::Boolean { default: true }
        ));
        assert!(matches!(
            filters(["a"]).kind,
            FieldKind::Filters { ref default } if default == &["a".to_string()]
        ));
        assert!(matches!(opaque("").kind, FieldKind::Opaque { .. }));
    }

    #[test]
    fn field_def_default_modifiers() {
        let field = FieldDef::number(25);
        assert_eq!(field.modifiers, Modifiers::default());
        assert_eq!(field.min, None);
        assert_eq!(field.max, None);
    }

    #[test]
    fn modifiers_chain() {
        let field = number(25).min(0).max(500).enforced().ignored();
        assert!(field.modifiers.enforced);
        assert!(field.modifiers.ignored);
        assert!(!field.modifiers.hidden);
        assert!(!field.modifiers.nullable);
        assert_eq!(field.min, Some(0));
        assert_eq!(field.max, Some(500));

        let field = boolean(false).hidden().ignored().nullable();
        assert!(field.modifiers.hidden);
        assert!(field.modifiers.nullable);
    }

    #[test]
    fn string_options() {
        let field = string("asc").options(["asc", "desc"]);
        assert_eq!(
            field.options,
            Some(vec!["asc".to_string(), "desc".to_string()])
        );
    }

    #[test]
    fn kind_names() {
        assert_eq!(string("").kind.name(), "string");
        assert_eq!(number(0).kind.name(), "number");
        assert_eq!(boolean(false).kind.name(), "boolean");
        assert_eq!(filters(Vec::<String>::new()).kind.name(), "filters");
        assert_eq!(opaque("").kind.name(), "opaque");
    }
}
