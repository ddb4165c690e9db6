//! The schema walker: binds every included field of a struct from one source.

use tracing::{debug, trace};

use crate::coerce::{coerce, Coerced, Rejection};
use crate::error::Error;
use crate::key::KeyPath;
use crate::schema::{Configuration, FieldDescriptor, Schema};
use crate::source::ParsingCompanion;
use crate::value::RawValue;

/// Raw-value access for a single source, keyed by the path of resolved keys.
pub trait Lookup {
    /// The raw value stored under `path`, if any.
    ///
    /// An error means a value exists but can't be read; it is reported as
    /// unparsable for the field being bound.
    fn lookup(&self, path: &KeyPath) -> Result<Option<RawValue>, String>;

    /// `path` spelled the way this source spells keys, for logs and errors.
    fn render(&self, path: &KeyPath) -> String {
        path.to_string()
    }
}

pub(crate) struct Walker<'a, 'b> {
    pub(crate) companion: &'a ParsingCompanion<'b>,
    pub(crate) lookup: &'a dyn Lookup,
}

impl Walker<'_, '_> {
    /// Walks `target` below `prefix`, returning how many values the source supplied.
    pub(crate) fn walk(
        &self,
        prefix: &KeyPath,
        target: &mut dyn Configuration,
    ) -> Result<usize, Error> {
        let schema = target.schema();
        let mut applied = 0;

        for (index, field) in schema.fields.iter().enumerate() {
            if !self.companion.include_field(field) {
                continue;
            }

            let key = self
                .companion
                .resolve_key(field)
                .ok_or(Error::MissingKey {
                    structure: schema.name,
                    field: field.name,
                })?;
            let path = prefix.child(&key);
            let rendered = self.lookup.render(&path);

            let slot = target
                .field_mut(index)
                .ok_or_else(|| invalid_target(&schema, field, "no accessor for this field"))?;

            let found = self
                .lookup
                .lookup(&path)
                .map_err(|reason| Error::Unparsable {
                    field: field.name,
                    key: rendered.clone(),
                    expected: field.ty,
                    reason,
                })?
                .filter(|raw| !raw.is_unset());
            trace!(field = field.name, key = %rendered, found = found.is_some(), "looked up key");
            let from_source = found.is_some();
            // Defaults only fill zero fields so a later pass can't clobber an earlier source.
            let raw = found.or_else(|| {
                field
                    .default_literal()
                    .filter(|_| slot.is_zero())
                    .map(RawValue::text)
            });

            let coerced = coerce(field.ty, raw.as_ref()).map_err(|rejection| match rejection {
                Rejection::Unparsable(reason) => Error::Unparsable {
                    field: field.name,
                    key: rendered.clone(),
                    expected: field.ty,
                    reason,
                },
                Rejection::Unsupported => Error::UnsupportedType {
                    field: field.name,
                    key: rendered.clone(),
                    ty: field.ty,
                },
            })?;

            match coerced {
                None => {}
                Some(Coerced::Scalar(value)) => {
                    slot.assign(value).map_err(|value| {
                        invalid_target(
                            &schema,
                            field,
                            &format!("field rejected a value coerced for its own type: {value:?}"),
                        )
                    })?;
                    if from_source {
                        applied += 1;
                        debug!(field = field.name, key = %rendered, "bound value");
                    } else {
                        debug!(field = field.name, key = %rendered, "bound default value");
                    }
                }
                Some(Coerced::Recurse) => {
                    let was_zero = slot.is_zero();
                    let nested = slot.as_configuration().ok_or_else(|| {
                        invalid_target(&schema, field, "struct field exposes no nested configuration")
                    })?;
                    let nested_applied = self.walk(&path, nested)?;

                    // Keep unset optional structs unset when nothing below them was found.
                    if nested_applied == 0 && was_zero && field.ty.is_pointer() {
                        slot.clear();
                    }
                    applied += nested_applied;
                }
            }

            if self.companion.enforces_required() && field.required && slot.is_zero() {
                return Err(Error::ValueNotSet {
                    field: field.name,
                    key: rendered,
                    expected: field.ty,
                });
            }
        }

        Ok(applied)
    }
}

fn invalid_target(schema: &Schema, field: &FieldDescriptor, reason: &str) -> Error {
    Error::InvalidTarget {
        structure: schema.name,
        reason: format!("field `{}`: {reason}", field.name),
    }
}
