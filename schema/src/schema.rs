//! Schema definitions and validation.

use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{SchemaError, SchemaResult};
use crate::{Field, FieldDef, FieldKind};

/// A parameter schema: fields in declaration order.
///
/// Declaration order is the processing order for every conversion, so two
/// equal schemas always serialize a given object to the same query string.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    /// Creates a schema from fields after validation.
    pub fn new(fields: Vec<Field>) -> SchemaResult<Self> {
        let schema = Self { fields };
        schema.validate()?;
        Ok(schema)
    }

    /// Creates a schema builder.
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder { fields: Vec::new() }
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the schema declares no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a field definition by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.def)
    }

    /// Returns `true` if `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates over field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    /// Validates schema invariants.
    pub fn validate(&self) -> SchemaResult<()> {
        let mut names = HashSet::new();
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(SchemaError::EmptyFieldName);
            }
            if !names.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    name: field.name.clone(),
                });
            }
            validate_field(field)?;
        }
        Ok(())
    }
}

/// Builder for `Schema`.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<Field>,
}

impl SchemaBuilder {
    /// Adds a field definition.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        self.fields.push(Field::new(name, def));
        self
    }

    /// Builds the schema after validation.
    pub fn build(self) -> SchemaResult<Schema> {
        Schema::new(self.fields)
    }
}

/// Declares a schema through a builder closure.
///
/// ```
/// use schema::{create_search_params, filters, number, string};
///
/// let schema = create_search_params(|p| {
///     p.field("query", string(""))
///         .field("rows", number(25).min(0).enforced())
///         .field("filters", filters(Vec::<String>::new()))
/// })
/// .unwrap();
/// assert_eq!(schema.len(), 3);
/// ```
pub fn create_search_params<F>(build: F) -> SchemaResult<Schema>
where
    F: FnOnce(SchemaBuilder) -> SchemaBuilder,
{
    build(Schema::builder()).build()
}

fn validate_field(field: &Field) -> SchemaResult<()> {
    let def = &field.def;
    let not_applicable = |constraint: &'static str| SchemaError::ConstraintNotApplicable {
        field: field.name.clone(),
        constraint,
        kind: def.kind.name(),
    };

    match &def.kind {
        FieldKind::Number { default } => {
            if let (Some(min), Some(max)) = (def.min, def.max) {
                if min > max {
                    return Err(SchemaError::InvalidBounds {
                        field: field.name.clone(),
                        min,
                        max,
                    });
                }
            }
            let below = def.min.is_some_and(|min| *default < min);
            let above = def.max.is_some_and(|max| *default > max);
            if below || above {
                return Err(SchemaError::DefaultOutOfBounds {
                    field: field.name.clone(),
                    default: *default,
                });
            }
        }
        _ => {
            if def.min.is_some() {
                return Err(not_applicable("min"));
            }
            if def.max.is_some() {
                return Err(not_applicable("max"));
            }
        }
    }

    match (&def.kind, &def.options) {
        (_, None) => {}
        (FieldKind::String { default }, Some(options)) => {
            if options.is_empty() {
                return Err(SchemaError::EmptyOptions {
                    field: field.name.clone(),
                });
            }
            if !options.contains(default) {
                return Err(SchemaError::DefaultNotInOptions {
                    field: field.name.clone(),
                    default: default.clone(),
                });
            }
        }
        (_, Some(_)) => return Err(not_applicable("options")),
    }
    Ok(())
}
