//! Typed access to fields of a JSON request body

use serde_json::{Map, Value};

use super::{join_categories, ValidationError};

/// Borrowed view over a JSON object body.
///
/// A field that is absent or `null` counts as missing.
#[derive(Debug, Clone, Copy)]
pub struct BodyFields<'a> {
    body: &'a Map<String, Value>,
}

impl<'a> BodyFields<'a> {
    pub fn new(body: &'a Map<String, Value>) -> Self {
        Self { body }
    }

    fn value(&self, field: &str) -> Option<&'a Value> {
        self.body.get(field).filter(|v| !v.is_null())
    }

    pub fn required_str(&self, field: &'static str) -> Result<String, ValidationError> {
        self.optional_str(field)?
            .ok_or(ValidationError::MissingField { field })
    }

    pub fn optional_str(&self, field: &'static str) -> Result<Option<String>, ValidationError> {
        match self.value(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(ValidationError::InvalidType {
                field,
                expected: "a string",
            }),
        }
    }

    /// Required string that may also arrive under a legacy name.
    pub fn required_str_or(
        &self,
        field: &'static str,
        alias: &'static str,
    ) -> Result<String, ValidationError> {
        match self.optional_str(field)? {
            Some(s) => Ok(s),
            None => self
                .optional_str(alias)?
                .ok_or(ValidationError::MissingField { field }),
        }
    }

    pub fn required_bool(&self, field: &'static str) -> Result<bool, ValidationError> {
        let value = self.value(field).ok_or(ValidationError::MissingField { field })?;
        value.as_bool().ok_or(ValidationError::InvalidType {
            field,
            expected: "a boolean",
        })
    }

    pub fn required_i32(&self, field: &'static str) -> Result<i32, ValidationError> {
        let value = self.value(field).ok_or(ValidationError::MissingField { field })?;
        value
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or(ValidationError::InvalidType {
                field,
                expected: "a 32-bit integer",
            })
    }

    /// Categories as their stored comma-joined string.
    pub fn required_categories(&self, field: &'static str) -> Result<String, ValidationError> {
        let value = self.value(field).ok_or(ValidationError::MissingField { field })?;
        join_categories(value).ok_or(ValidationError::InvalidType {
            field,
            expected: "a string or a list of strings",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test body must be an object"),
        }
    }

    #[test]
    fn missing_and_null_are_missing() {
        let body = object(json!({"title": null}));
        let fields = BodyFields::new(&body);

        assert_eq!(
            fields.required_str("title"),
            Err(ValidationError::MissingField { field: "title" })
        );
        assert_eq!(
            fields.required_bool("prod"),
            Err(ValidationError::MissingField { field: "prod" })
        );
    }

    #[test]
    fn wrong_types_are_rejected() {
        let body = object(json!({"title": 3, "prod": "yes", "order": 1.5}));
        let fields = BodyFields::new(&body);

        assert!(matches!(
            fields.required_str("title"),
            Err(ValidationError::InvalidType { field: "title", .. })
        ));
        assert!(matches!(
            fields.required_bool("prod"),
            Err(ValidationError::InvalidType { field: "prod", .. })
        ));
        assert!(matches!(
            fields.required_i32("order"),
            Err(ValidationError::InvalidType { field: "order", .. })
        ));
    }

    #[test]
    fn order_must_fit_i32() {
        let body = object(json!({"order": 4_000_000_000_i64}));
        assert!(BodyFields::new(&body).required_i32("order").is_err());

        let body = object(json!({"order": -3}));
        assert_eq!(BodyFields::new(&body).required_i32("order"), Ok(-3));
    }

    #[test]
    fn alias_is_used_when_primary_absent() {
        let body = object(json!({"body": "<p>hi</p>"}));
        let fields = BodyFields::new(&body);
        assert_eq!(
            fields.required_str_or("content", "body"),
            Ok("<p>hi</p>".to_string())
        );

        let empty = Map::new();
        assert_eq!(
            BodyFields::new(&empty).required_str_or("content", "body"),
            Err(ValidationError::MissingField { field: "content" })
        );
    }

    #[test]
    fn categories_accept_list_or_string() {
        let body = object(json!({"a": ["x", "y"], "b": "x,y", "c": 7}));
        let fields = BodyFields::new(&body);

        assert_eq!(fields.required_categories("a"), Ok("x,y".to_string()));
        assert_eq!(fields.required_categories("b"), Ok("x,y".to_string()));
        assert!(fields.required_categories("c").is_err());
    }
}
