use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::model::Entity;

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("unknown field '{0}'")]
    Unknown(String),

    #[error("field '{0}' is managed by the server")]
    ReadOnly(String),

    #[error("field '{field}' expects a number, got '{value}'")]
    InvalidNumber { field: String, value: String },

    #[error("field '{field}' expects true or false, got '{value}'")]
    InvalidBool { field: String, value: String },

    #[error("field '{0}' is not a single value")]
    NotScalar(String),

    #[error("form state does not serialize to an object")]
    NotAnObject,

    #[error("invalid form state: {0}")]
    Serde(#[from] serde_json::Error),
}

fn to_object<E: Entity>(entity: &E) -> Result<Map<String, Value>, FieldError> {
    match serde_json::to_value(entity)? {
        Value::Object(map) => Ok(map),
        _ => Err(FieldError::NotAnObject),
    }
}

/// Builds a request body holding exactly `fields` of the form, in order.
pub fn project<E: Entity>(entity: &E, fields: &[&str]) -> Result<Value, FieldError> {
    let mut source = to_object(entity)?;
    let mut body = Map::new();
    for field in fields {
        let value = source
            .remove(*field)
            .ok_or_else(|| FieldError::Unknown(field.to_string()))?;
        body.insert(field.to_string(), value);
    }
    Ok(Value::Object(body))
}

/// Copies each field of a server payload into the matching form slot. Keys the
/// form does not know are ignored; slots missing from the payload keep their
/// current value.
pub fn merge_into<E: Entity>(form: &mut E, payload: Value) -> Result<(), FieldError> {
    let Value::Object(incoming) = payload else {
        return Err(FieldError::NotAnObject);
    };
    let mut current = to_object(form)?;
    for (key, value) in incoming {
        if key == "id" || current.contains_key(&key) {
            current.insert(key, value);
        }
    }
    *form = serde_json::from_value(Value::Object(current))?;
    Ok(())
}

/// Sets the form slot at `path` (dotted for nested objects) from user text.
/// The text is coerced to the JSON type the slot currently holds so numbers
/// stay numbers on the wire.
pub fn set_field<E: Entity>(form: &mut E, path: &str, raw: &str) -> Result<(), FieldError> {
    let path = path.trim();
    let root_key = path.split('.').next().unwrap_or_default();
    if E::DESCRIPTOR.read_only_fields.contains(&root_key) || path == "id" {
        return Err(FieldError::ReadOnly(path.to_string()));
    }

    let mut root = Value::Object(to_object(form)?);
    let mut slot = &mut root;
    for segment in path.split('.') {
        slot = slot
            .as_object_mut()
            .and_then(|map| map.get_mut(segment))
            .ok_or_else(|| FieldError::Unknown(path.to_string()))?;
    }
    *slot = coerce(path, slot, raw)?;

    *form = serde_json::from_value(root)?;
    Ok(())
}

fn coerce(field: &str, slot: &Value, raw: &str) -> Result<Value, FieldError> {
    let trimmed = raw.trim();
    match slot {
        Value::String(_) => Ok(Value::String(raw.to_string())),
        Value::Number(n) if n.is_f64() => parse_float(field, trimmed),
        Value::Number(_) => trimmed
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| FieldError::InvalidNumber {
                field: field.to_string(),
                value: raw.to_string(),
            }),
        Value::Bool(_) => trimmed
            .parse::<bool>()
            .map(Value::Bool)
            .map_err(|_| FieldError::InvalidBool {
                field: field.to_string(),
                value: raw.to_string(),
            }),
        // Unset optional slot: empty clears it, numeric text stays numeric.
        Value::Null => {
            if trimmed.is_empty() || trimmed == "null" {
                Ok(Value::Null)
            } else if let Ok(v) = trimmed.parse::<i64>() {
                Ok(Value::from(v))
            } else if trimmed.parse::<f64>().is_ok() {
                parse_float(field, trimmed)
            } else {
                Ok(Value::String(raw.to_string()))
            }
        }
        Value::Array(_) | Value::Object(_) => Err(FieldError::NotScalar(field.to_string())),
    }
}

fn parse_float(field: &str, raw: &str) -> Result<Value, FieldError> {
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| FieldError::InvalidNumber {
            field: field.to_string(),
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Clinic, Product, Rating, RatingKind};
    use serde_json::json;

    #[test]
    fn numbers_stay_numbers() {
        let mut product = Product::default();
        set_field(&mut product, "stock", "12").unwrap();
        set_field(&mut product, "precio", "99.5").unwrap();
        let body = project(&product, Product::DESCRIPTOR.update_fields).unwrap();
        assert_eq!(body["stock"], json!(12));
        assert_eq!(body["precio"], json!(99.5));
    }

    #[test]
    fn integer_slot_rejects_text() {
        let mut product = Product::default();
        let err = set_field(&mut product, "stock", "doce").unwrap_err();
        assert!(matches!(err, FieldError::InvalidNumber { .. }));
    }

    #[test]
    fn unknown_and_read_only_fields_are_rejected() {
        let mut clinic = Clinic::default();
        assert!(matches!(
            set_field(&mut clinic, "color", "x"),
            Err(FieldError::Unknown(_))
        ));
        assert!(matches!(
            set_field(&mut clinic, "avg_ratings.promedio_inst", "4"),
            Err(FieldError::ReadOnly(_))
        ));
        assert!(matches!(
            set_field(&mut clinic, "id", "4"),
            Err(FieldError::ReadOnly(_))
        ));
    }

    #[test]
    fn optional_kind_accepts_text() {
        let mut rating = Rating::default();
        set_field(&mut rating, "tipo", "medicos").unwrap();
        assert_eq!(rating.kind, Some(RatingKind::Medical));
    }

    #[test]
    fn merge_keeps_slots_missing_from_payload() {
        let mut clinic = Clinic {
            website: "https://old".to_string(),
            ..Clinic::default()
        };
        merge_into(&mut clinic, json!({"id": 7, "nombre": "A", "extra": true})).unwrap();
        assert_eq!(clinic.id, Some(7));
        assert_eq!(clinic.name, "A");
        assert_eq!(clinic.website, "https://old");
    }

    #[test]
    fn projection_omits_id_even_when_loaded() {
        let clinic = Clinic {
            id: Some(3),
            ..Clinic::default()
        };
        let body = project(&clinic, Clinic::DESCRIPTOR.create_fields).unwrap();
        assert!(body.get("id").is_none());
        assert!(body.get("avg_ratings").is_some());
    }
}
