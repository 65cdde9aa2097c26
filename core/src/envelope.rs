//! Response wrapper for the provider's JSON envelopes.
//!
//! The provider nests every payload under a named key: `{"domain": {...}}`
//! for a single resource, `{"domains": [...]}` for a collection. Deletes
//! answer 204 with an empty body.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::http::HttpResponse;

/// A raw provider response awaiting interpretation.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    inner: HttpResponse,
}

impl ApiResponse {
    pub fn new(inner: HttpResponse) -> Self {
        Self { inner }
    }

    pub fn status(&self) -> u16 {
        self.inner.status
    }

    /// Decode the object stored under `key`.
    pub fn into_entity<T: DeserializeOwned>(self, key: &str) -> Result<T> {
        let value = self.take_key(key)?;
        if !value.is_object() {
            return Err(ApiError::data_format(format!(
                "`{key}` in response envelope is not an object"
            )));
        }
        decode(value, key)
    }

    /// Decode every element of the array stored under `key`, keeping the
    /// provider's order.
    pub fn into_collection<T: DeserializeOwned>(self, key: &str) -> Result<Vec<T>> {
        match self.take_key(key)? {
            Value::Array(items) => items.into_iter().map(|item| decode(item, key)).collect(),
            _ => Err(ApiError::data_format(format!(
                "`{key}` in response envelope is not an array"
            ))),
        }
    }

    /// Succeed only on 204. `what` names the resource in the error message.
    pub fn expect_deleted(self, what: &str) -> Result<bool> {
        if self.inner.status == 204 {
            return Ok(true);
        }
        tracing::debug!(status = self.inner.status, what, "delete was not acknowledged");
        Err(ApiError::ApiAction(format!("The {what} could not be deleted!")))
    }

    fn take_key(self, key: &str) -> Result<Value> {
        check_status(&self.inner)?;
        let envelope: Value = serde_json::from_str(&self.inner.body)
            .map_err(|e| ApiError::data_format(format!("malformed response body: {e}")))?;
        match envelope {
            Value::Object(mut map) => map.remove(key).ok_or_else(|| {
                ApiError::data_format(format!("missing `{key}` in response envelope"))
            }),
            _ => Err(ApiError::data_format("response envelope is not a JSON object")),
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value, key: &str) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ApiError::data_format(format!("invalid `{key}`: {e}")))
}

/// Map non-2xx status codes to `ApiError::Http` before any decoding.
fn check_status(response: &HttpResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Domain, Record};

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse::new(HttpResponse::new(status, body))
    }

    #[test]
    fn status_is_the_transport_status() {
        assert_eq!(response(204, "").status(), 204);
        assert_eq!(response(422, r#"{"id":"unprocessable_entity"}"#).status(), 422);
    }

    #[test]
    fn collection_keeps_provider_order() {
        let domains: Vec<Domain> = response(200, r#"{"domains":[{"name":"a.com"},{"name":"b.com"}]}"#)
            .into_collection("domains")
            .unwrap();
        assert_eq!(domains.len(), 2);
        assert_eq!(domains[0].name(), "a.com");
        assert_eq!(domains[1].name(), "b.com");
    }

    #[test]
    fn collection_does_not_dedupe() {
        let domains: Vec<Domain> = response(200, r#"{"domains":[{"name":"a.com"},{"name":"a.com"}],"meta":{"total":2}}"#)
            .into_collection("domains")
            .unwrap();
        assert_eq!(domains.len(), 2);
    }

    #[test]
    fn empty_collection() {
        let records: Vec<Record> = response(200, r#"{"domain_records":[]}"#)
            .into_collection("domain_records")
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn singular_envelope_missing_key_is_data_format() {
        let err = response(200, r#"{"domains":{"name":"a.com"}}"#)
            .into_entity::<Domain>("domain")
            .unwrap_err();
        assert!(matches!(err, ApiError::DataFormat(ref msg) if msg.contains("`domain`")));
    }

    #[test]
    fn entity_missing_required_field_names_it() {
        let err = response(200, r#"{"domain_record":{"id":1,"type":"A","name":"www"}}"#)
            .into_entity::<Record>("domain_record")
            .unwrap_err();
        assert!(matches!(err, ApiError::DataFormat(ref msg) if msg.contains("`data`")));
    }

    #[test]
    fn wrong_shapes_are_data_format() {
        assert!(matches!(
            response(200, r#"{"domain":[]}"#).into_entity::<Domain>("domain"),
            Err(ApiError::DataFormat(_))
        ));
        assert!(matches!(
            response(200, r#"{"domains":{}}"#).into_collection::<Domain>("domains"),
            Err(ApiError::DataFormat(_))
        ));
        assert!(matches!(
            response(200, "[1,2]").into_collection::<Domain>("domains"),
            Err(ApiError::DataFormat(_))
        ));
        assert!(matches!(
            response(200, "not json").into_entity::<Domain>("domain"),
            Err(ApiError::DataFormat(_))
        ));
    }

    #[test]
    fn error_status_is_reported_before_decoding() {
        let err = response(500, "internal error").into_entity::<Domain>("domain").unwrap_err();
        match err {
            ApiError::Http { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "internal error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn delete_requires_204() {
        assert!(response(204, "").expect_deleted("domain").unwrap());

        let err = response(200, r#"{"ok":true}"#).expect_deleted("domain").unwrap_err();
        assert!(matches!(err, ApiError::ApiAction(ref msg) if msg == "The domain could not be deleted!"));

        let err = response(404, "").expect_deleted("domain record").unwrap_err();
        assert!(matches!(err, ApiError::ApiAction(ref msg) if msg == "The domain record could not be deleted!"));
    }
}
