use serde::{Deserialize, Serialize};

/// Successful ingestion response. The backend returns more fields about the
/// stored original; `publicId` is the contract, the rest is carried along
/// untyped.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IngestResponse {
    pub(crate) public_id: String,

    #[serde(flatten)]
    pub(crate) extra: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_response_keeps_unknown_fields() {
        let response: IngestResponse =
            serde_json::from_str(r#"{"publicId":"abc123","bytes":1024,"format":"png"}"#).unwrap();
        assert_eq!(response.public_id, "abc123");
        assert_eq!(response.extra["bytes"], 1024);
    }
}
