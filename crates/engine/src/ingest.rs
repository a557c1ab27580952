//! Schema-driven ingestion of group and test-case JSON

use acvp_api::{Error, FieldSet, FieldValue, Location, Result};
use acvp_common::codec::{hex_to_bin, CodecError};
use acvp_common::json::{self, JsonKindError};
use serde_json::{Map, Value};

use crate::schema::{FieldKind, FieldSpec, Presence};

/// Decode every field named by `specs` out of `obj`
///
/// Fields the schema does not name are ignored. `flags` holds the group's
/// already-ingested fields, consulted for conditional presence.
pub fn ingest(
    obj: &Map<String, Value>,
    specs: &[FieldSpec],
    flags: &FieldSet,
    capacity: usize,
    at: Location,
) -> Result<FieldSet> {
    let mut fields = FieldSet::new();
    for spec in specs {
        match decode(obj, spec, flags, capacity, at)? {
            Some(value) => fields.insert(spec.name, value),
            None if is_required(spec.presence, flags) => return Err(Error::missing(at, spec.name)),
            None => {}
        }
    }
    Ok(fields)
}

fn is_required(presence: Presence, flags: &FieldSet) -> bool {
    match presence {
        Presence::Required => true,
        Presence::Optional => false,
        Presence::RequiredUnless(flag) => flags.bool(flag) != Some(true),
    }
}

fn decode(
    obj: &Map<String, Value>,
    spec: &FieldSpec,
    flags: &FieldSet,
    capacity: usize,
    at: Location,
) -> Result<Option<FieldValue>> {
    let kind_err = |e: JsonKindError| Error::malformed(at.with_field(spec.name), e.to_string());

    let value = match spec.kind {
        FieldKind::Hex => match json::get_str(obj, spec.name).map_err(kind_err)? {
            Some(s) => Some(FieldValue::Hex(decode_hex(s, capacity, at.with_field(spec.name))?)),
            None => None,
        },
        FieldKind::Str => json::get_str(obj, spec.name)
            .map_err(kind_err)?
            .map(|s| FieldValue::Str(s.to_owned())),
        FieldKind::Choice(options) => match json::get_str(obj, spec.name).map_err(kind_err)? {
            Some(s) if options.contains(&s) => Some(FieldValue::Str(s.to_owned())),
            Some(s) => {
                return Err(Error::invalid(
                    at.with_field(spec.name),
                    format!("'{}' is not one of {:?}", s, options),
                ))
            }
            None => None,
        },
        FieldKind::Int => json::get_u64(obj, spec.name).map_err(kind_err)?.map(FieldValue::Int),
        FieldKind::Bool => json::get_bool(obj, spec.name).map_err(kind_err)?.map(FieldValue::Bool),
        FieldKind::Records(nested) => match json::get_array(obj, spec.name).map_err(kind_err)? {
            Some(items) => {
                let mut records = Vec::with_capacity(items.len());
                for item in items {
                    let record = json::as_object(item, spec.name).map_err(kind_err)?;
                    records.push(ingest(record, nested, flags, capacity, at)?);
                }
                Some(FieldValue::Records(records))
            }
            None => None,
        },
    };
    Ok(value)
}

fn decode_hex(s: &str, capacity: usize, at: Location) -> Result<acvp_api::CapacityBuffer> {
    hex_to_bin(s, capacity).map_err(|e| match e {
        CodecError::InvalidHex(e) => Error::malformed(at, format!("invalid hex: {}", e)),
        CodecError::Buffer(e) => e.into_error(at),
    })
}
