use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};
use tracing::debug;

use super::{FieldType, RawResponse, ResponseSchema};
use crate::{FailureKind, FieldFailure, ResponseModel, ValidationError};

const ROOT: &str = "$";

/// Validates a payload against a schema and re-keys it by declared names.
///
/// Every failure is collected: a missing required field, a value that cannot be
/// converted to its declared type (nested objects and array items included),
/// or a payload that is not an object. Converted values are returned, e.g. a
/// number declared as a string is re-keyed as a string.
/// Optional fields that are absent or `null` are left out of the result.
///
/// # Errors
///
/// Returns a [`ValidationError`] listing all the failures.
pub fn decode_value(
    schema: &ResponseSchema,
    payload: &Value,
) -> Result<Map<String, Value>, ValidationError> {
    let mut failures = Vec::new();
    let result = decode_object(schema, payload, &FieldPath::default(), &mut failures);

    if !failures.is_empty() {
        return Err(ValidationError { failures });
    }
    Ok(result)
}

/// Validates a payload against the schema of `T`, then deserializes it.
///
/// # Errors
///
/// Returns a [`ValidationError`] if the payload does not match the schema,
/// or if the validated payload cannot be deserialized into `T`.
pub fn decode<T>(payload: &Value) -> Result<T, ValidationError>
where
    T: ResponseModel,
{
    decode_with(T::schema(), payload)
}

/// Validates a payload against a schema, then deserializes it.
///
/// # Errors
///
/// See [`decode`].
pub fn decode_with<T>(schema: &ResponseSchema, payload: &Value) -> Result<T, ValidationError>
where
    T: DeserializeOwned,
{
    let object = decode_value(schema, payload)?;
    debug!(fields = object.len(), "payload validated");

    serde_path_to_error::deserialize(Value::Object(object)).map_err(|err| {
        let path = err.path().to_string();
        let field = if path == "." { ROOT.to_string() } else { path };
        ValidationError {
            failures: vec![FieldFailure {
                alias: field.clone(),
                field,
                kind: FailureKind::Malformed {
                    message: err.into_inner().to_string(),
                },
            }],
        }
    })
}

/// Parses the body of a response as JSON and decodes it.
///
/// The status code is not checked: an error body usually fails validation.
///
/// # Errors
///
/// Returns a [`ValidationError`] if the body is not JSON, or see [`decode`].
pub fn decode_response<T>(response: &RawResponse) -> Result<T, ValidationError>
where
    T: ResponseModel,
{
    let payload = response.json().map_err(|err| ValidationError {
        failures: vec![FieldFailure {
            field: ROOT.to_string(),
            alias: ROOT.to_string(),
            kind: FailureKind::Malformed {
                message: format!("body is not valid JSON: {err}"),
            },
        }],
    })?;
    decode(&payload)
}

#[derive(Debug, Clone, Default)]
struct FieldPath {
    field: String,
    alias: String,
}

impl FieldPath {
    fn child(&self, name: &str, alias: &str) -> Self {
        let join = |parent: &str, child: &str| {
            if parent.is_empty() {
                child.to_string()
            } else {
                format!("{parent}.{child}")
            }
        };
        Self {
            field: join(&self.field, name),
            alias: join(&self.alias, alias),
        }
    }

    fn index(&self, index: usize) -> Self {
        Self {
            field: format!("{}[{index}]", self.field),
            alias: format!("{}[{index}]", self.alias),
        }
    }

    fn failure(&self, kind: FailureKind) -> FieldFailure {
        let or_root = |path: &str| {
            if path.is_empty() {
                ROOT.to_string()
            } else {
                path.to_string()
            }
        };
        FieldFailure {
            field: or_root(&self.field),
            alias: or_root(&self.alias),
            kind,
        }
    }
}

fn decode_object(
    schema: &ResponseSchema,
    value: &Value,
    path: &FieldPath,
    failures: &mut Vec<FieldFailure>,
) -> Map<String, Value> {
    let mut result = Map::new();
    let Value::Object(object) = value else {
        failures.push(path.failure(FailureKind::Invalid {
            expected: "object".to_string(),
            found: describe(value),
        }));
        return result;
    };

    for field in schema.fields() {
        let path = path.child(field.name(), field.wire_alias());
        match object.get(field.wire_alias()) {
            None | Some(Value::Null) if !field.is_required() => {}
            None => failures.push(path.failure(FailureKind::Missing)),
            Some(value) => {
                if let Some(value) = decode_field(field.field_type(), value, &path, failures) {
                    result.insert(field.name().to_string(), value);
                }
            }
        }
    }

    result
}

fn decode_field(
    field_type: &FieldType,
    value: &Value,
    path: &FieldPath,
    failures: &mut Vec<FieldFailure>,
) -> Option<Value> {
    match (field_type, value) {
        (FieldType::Any, _) => Some(value.clone()),
        (FieldType::Object(schema), Value::Object(_)) => {
            let before = failures.len();
            let object = decode_object(schema, value, path, failures);
            (failures.len() == before).then_some(Value::Object(object))
        }
        (FieldType::Array(item_type), Value::Array(items)) => {
            let before = failures.len();
            let items: Vec<_> = items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| decode_field(item_type, item, &path.index(index), failures))
                .collect();
            (failures.len() == before).then_some(Value::Array(items))
        }
        _ => {
            let converted = convert(field_type, value);
            if converted.is_none() {
                failures.push(path.failure(FailureKind::Invalid {
                    expected: field_type.to_string(),
                    found: describe(value),
                }));
            }
            converted
        }
    }
}

/// Converts a scalar to the declared type, `None` if it is not convertible.
///
/// Numbers and booleans become strings, numeric strings become numbers,
/// and `"true"`/`"false"` (also `yes`/`no`, `on`/`off`, `1`/`0`) become booleans.
/// A fractional number is never truncated to an integer.
fn convert(field_type: &FieldType, value: &Value) -> Option<Value> {
    match (field_type, value) {
        (FieldType::String, Value::String(_))
        | (FieldType::Number, Value::Number(_))
        | (FieldType::Boolean, Value::Bool(_)) => Some(value.clone()),
        (FieldType::String, Value::Number(number)) => Some(Value::String(number.to_string())),
        (FieldType::String, Value::Bool(flag)) => Some(Value::String(flag.to_string())),
        (FieldType::Integer, Value::Number(number)) => {
            (number.is_i64() || number.is_u64()).then(|| value.clone())
        }
        (FieldType::Integer, Value::String(text)) => parse_integer(text.trim()),
        (FieldType::Number, Value::String(text)) => {
            let text = text.trim();
            parse_integer(text).or_else(|| {
                text.parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
            })
        }
        (FieldType::Boolean, Value::String(text)) => parse_boolean(text.trim()).map(Value::Bool),
        (FieldType::Boolean, Value::Number(number)) => match number.as_u64() {
            Some(0) => Some(Value::Bool(false)),
            Some(1) => Some(Value::Bool(true)),
            _ => None,
        },
        (FieldType::Enum(values), Value::String(text)) => {
            values.contains(text).then(|| value.clone())
        }
        _ => None,
    }
}

fn parse_integer(text: &str) -> Option<Value> {
    text.parse::<i64>()
        .map(Value::from)
        .or_else(|_| text.parse::<u64>().map(Value::from))
        .ok()
}

fn parse_boolean(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "on" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Array(items) => format!("array of {} item(s)", items.len()),
        Value::Object(_) => "object".to_string(),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use http::{HeaderMap, StatusCode};
    use rstest::rstest;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::ResponseField;

    fn owner_schema() -> ResponseSchema {
        ResponseSchema::builder()
            .field(ResponseField::required("name", FieldType::String).alias("Name"))
            .field(ResponseField::optional("email", FieldType::String))
            .build()
            .expect("valid schema")
    }

    fn repository_schema() -> ResponseSchema {
        ResponseSchema::builder()
            .field(ResponseField::required("id", FieldType::Integer))
            .field(
                ResponseField::required("state", FieldType::one_of(["active", "archived"]))
                    .alias("State"),
            )
            .field(ResponseField::required("owner", FieldType::Object(owner_schema())).alias("Owner"))
            .field(ResponseField::optional(
                "tags",
                FieldType::array_of(FieldType::String),
            ))
            .field(ResponseField::optional("stars", FieldType::Number))
            .build()
            .expect("valid schema")
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Owner {
        name: String,
        email: Option<String>,
    }

    #[derive(Debug, PartialEq, Deserialize)]
    #[serde(rename_all = "lowercase")]
    enum State {
        Active,
        Archived,
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Repository {
        id: u64,
        state: State,
        owner: Owner,
        #[serde(default)]
        tags: Vec<String>,
        stars: Option<f64>,
    }

    #[test]
    fn should_rekey_payload_by_declared_names() {
        let payload = json!({
            "id": 42,
            "State": "active",
            "Owner": {"Name": "Alice", "email": null},
            "tags": ["rust"],
            "extra": "ignored"
        });

        let object = decode_value(&repository_schema(), &payload).expect("valid payload");

        assert_eq!(
            Value::Object(object),
            json!({
                "id": 42,
                "state": "active",
                "owner": {"name": "Alice"},
                "tags": ["rust"]
            })
        );
    }

    #[test]
    fn should_decode_typed_value() {
        let payload = json!({
            "id": 42,
            "State": "archived",
            "Owner": {"Name": "Alice"},
            "stars": 4.5
        });

        let repository: Repository =
            decode_with(&repository_schema(), &payload).expect("valid payload");

        assert_eq!(
            repository,
            Repository {
                id: 42,
                state: State::Archived,
                owner: Owner {
                    name: "Alice".to_string(),
                    email: None,
                },
                tags: vec![],
                stars: Some(4.5),
            }
        );
    }

    #[test]
    fn should_collect_every_failure() {
        let payload = json!({
            "id": 4.2,
            "State": "deleted",
            "Owner": {"email": "alice@example.com"},
            "tags": ["rust", {"name": "web"}]
        });

        let error = decode_value(&repository_schema(), &payload).expect_err("should fail");

        insta::assert_snapshot!(error, @r#"
        Response validation failed for 4 field(s)
          - id (id): expected integer, found 4.2
          - state (State): expected one of ["active", "archived"], found "deleted"
          - owner.name (Owner.Name): missing
          - tags[1] (tags[1]): expected string, found object
        "#);
    }

    #[rstest]
    #[case::number_to_string(FieldType::String, json!(42), json!("42"))]
    #[case::float_to_string(FieldType::String, json!(4.5), json!("4.5"))]
    #[case::boolean_to_string(FieldType::String, json!(true), json!("true"))]
    #[case::string_to_integer(FieldType::Integer, json!("7"), json!(7))]
    #[case::negative_string_to_integer(FieldType::Integer, json!(" -3 "), json!(-3))]
    #[case::string_to_number(FieldType::Number, json!("4.5"), json!(4.5))]
    #[case::integral_string_to_number(FieldType::Number, json!("7"), json!(7))]
    #[case::string_to_boolean(FieldType::Boolean, json!("true"), json!(true))]
    #[case::no_to_boolean(FieldType::Boolean, json!("No"), json!(false))]
    #[case::one_to_boolean(FieldType::Boolean, json!(1), json!(true))]
    fn should_convert_to_declared_type(
        #[case] field_type: FieldType,
        #[case] value: Value,
        #[case] expected: Value,
    ) {
        let schema = ResponseSchema::builder()
            .field(ResponseField::required("value", field_type).alias("Value"))
            .build()
            .expect("valid schema");

        let object = decode_value(&schema, &json!({"Value": value})).expect("convertible");

        assert_eq!(object.get("value"), Some(&expected));
    }

    #[rstest]
    #[case::word_to_integer(FieldType::Integer, json!("abc"))]
    #[case::fraction_to_integer(FieldType::Integer, json!("4.2"))]
    #[case::float_to_integer(FieldType::Integer, json!(4.2))]
    #[case::nan_to_number(FieldType::Number, json!("NaN"))]
    #[case::word_to_boolean(FieldType::Boolean, json!("maybe"))]
    #[case::two_to_boolean(FieldType::Boolean, json!(2))]
    #[case::object_to_string(FieldType::String, json!({"a": 1}))]
    #[case::number_to_enum(FieldType::one_of(["1", "2"]), json!(1))]
    fn should_reject_unconvertible_value(#[case] field_type: FieldType, #[case] value: Value) {
        let schema = ResponseSchema::builder()
            .field(ResponseField::required("value", field_type))
            .build()
            .expect("valid schema");

        let error = decode_value(&schema, &json!({"value": value})).expect_err("should fail");

        assert!(matches!(
            error.failures[0].kind,
            FailureKind::Invalid { .. }
        ));
    }

    #[test]
    fn should_decode_converted_payload() {
        #[derive(Debug, Deserialize)]
        struct Stream {
            stroom: String,
            count: u32,
        }
        let schema = ResponseSchema::builder()
            .field(ResponseField::required("stroom", FieldType::String).alias("Meldingen stroom"))
            .field(ResponseField::required("count", FieldType::Integer))
            .build()
            .expect("valid schema");

        let stream: Stream =
            decode_with(&schema, &json!({"Meldingen stroom": 42, "count": "7"})).expect("decoded");

        assert_eq!(stream.stroom, "42");
        assert_eq!(stream.count, 7);
    }

    #[test]
    fn should_report_missing_required_fields() {
        let error = decode_value(&repository_schema(), &json!({})).expect_err("should fail");

        let fields: Vec<_> = error.fields().collect();
        assert_eq!(fields, vec!["id", "state", "owner"]);
        assert!(error.failures.iter().all(|f| f.kind == FailureKind::Missing));
    }

    #[test]
    fn should_reject_null_for_required_field() {
        let payload = json!({"id": null, "State": "active", "Owner": {"Name": "Alice"}});

        let error = decode_value(&repository_schema(), &payload).expect_err("should fail");

        assert_eq!(
            error.failures[0].kind,
            FailureKind::Invalid {
                expected: "integer".to_string(),
                found: "null".to_string(),
            }
        );
    }

    #[test]
    fn should_reject_non_object_payload() {
        let error =
            decode_value(&repository_schema(), &json!([1, 2, 3])).expect_err("should fail");

        insta::assert_snapshot!(error, @r"
        Response validation failed for 1 field(s)
          - $ ($): expected object, found array of 3 item(s)
        ");
    }

    #[test]
    fn should_report_deserialization_failure() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Narrow {
            id: u8,
        }
        let schema = ResponseSchema::builder()
            .field(ResponseField::required("id", FieldType::Integer))
            .build()
            .expect("valid schema");

        let error = decode_with::<Narrow>(&schema, &json!({"id": 1000})).expect_err("should fail");

        assert_eq!(error.fields().collect::<Vec<_>>(), vec!["id"]);
        assert!(matches!(
            error.failures[0].kind,
            FailureKind::Malformed { .. }
        ));
    }

    #[test]
    fn should_report_body_that_is_not_json() {
        impl ResponseModel for Repository {
            fn schema() -> &'static ResponseSchema {
                static SCHEMA: std::sync::LazyLock<ResponseSchema> =
                    std::sync::LazyLock::new(repository_schema);
                &SCHEMA
            }
        }
        let response = RawResponse::new(
            StatusCode::BAD_GATEWAY,
            HeaderMap::new(),
            "<html>Bad Gateway</html>",
        );

        let error = decode_response::<Repository>(&response).expect_err("should fail");

        assert!(error.contains("$"));
    }
}
