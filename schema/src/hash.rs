//! Deterministic schema hashing.

use blake3::Hasher;

use crate::{FieldDef, FieldKind, Modifiers, Schema};

/// Computes a deterministic hash of a schema.
///
/// Covers field order, names, kinds, defaults, constraints and modifiers.
#[must_use]
pub fn schema_hash(schema: &Schema) -> u64 {
    let mut hasher = Hasher::new();
    write_len(&mut hasher, schema.fields.len());

    for field in &schema.fields {
        write_str(&mut hasher, &field.name);
        write_def(&mut hasher, &field.def);
    }

    let hash = hasher.finalize();
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(prefix)
}

fn write_def(hasher: &mut Hasher, def: &FieldDef) {
    match &def.kind {
        FieldKind::String { default } => {
            write_u8(hasher, 0);
            write_str(hasher, default);
        }
        FieldKind::Number { default } => {
            write_u8(hasher, 1);
            write_i64(hasher, *default);
        }
        FieldKind::Boolean { default } => {
            write_u8(hasher, 2);
            write_u8(hasher, u8::from(*default));
        }
        FieldKind::Filters { default } => {
            write_u8(hasher, 3);
            write_len(hasher, default.len());
            for entry in default {
                write_str(hasher, entry);
            }
        }
        FieldKind::Opaque { default } => {
            write_u8(hasher, 4);
            write_str(hasher, default);
        }
    }

    write_opt_i64(hasher, def.min);
    write_opt_i64(hasher, def.max);
    match &def.options {
        Some(options) => {
            write_u8(hasher, 1);
            write_len(hasher, options.len());
            for option in options {
                write_str(hasher, option);
            }
        }
        None => write_u8(hasher, 0),
    }
    write_modifiers(hasher, def.modifiers);
}

fn write_modifiers(hasher: &mut Hasher, modifiers: Modifiers) {
    let bits = u8::from(modifiers.enforced)
        | u8::from(modifiers.hidden) << 1
        | u8::from(modifiers.ignored) << 2
        | u8::from(modifiers.nullable) << 3;
    write_u8(hasher, bits);
}

fn write_opt_i64(hasher: &mut Hasher, value: Option<i64>) {
    match value {
        Some(value) => {
            write_u8(hasher, 1);
            write_i64(hasher, value);
        }
        None => write_u8(hasher, 0),
    }
}

fn write_str(hasher: &mut Hasher, value: &str) {
    write_len(hasher, value.len());
    hasher.update(value.as_bytes());
}

fn write_len(hasher: &mut Hasher, len: usize) {
    hasher.update(&(len as u64).to_le_bytes());
}

fn write_u8(hasher: &mut Hasher, value: u8) {
    hasher.update(&[value]);
}

fn write_i64(hasher: &mut Hasher, value: i64) {
    hasher.update(&value.to_le_bytes());
}
