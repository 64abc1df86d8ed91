//! change.org metrics over the public GraphQL proxy

use anyhow::{anyhow, bail, Context};
use serde::{Deserialize, Serialize};
use sigsheet::{Metrics, MetricsFetcher};
use tracing::debug;

const ENDPOINT: &str = "https://www.change.org/api-proxy/graphql?op=PetitionDetailsPageStats";
const OPERATION: &str = "PetitionDetailsPageStats";
const QUERY: &str = "query PetitionDetailsPageStats($petitionSlugOrId: String!) { petitionStats: petitionBySlugOrId(slugOrId: $petitionSlugOrId) {signatureState {signatureCount { displayed } signatureGoal { displayed } } }}";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Operation<'a> {
    operation_name: &'a str,
    variables: Variables<'a>,
    query: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Variables<'a> {
    petition_slug_or_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct OperationResult {
    data: Data,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Data {
    petition_stats: PetitionStats,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PetitionStats {
    signature_state: SignatureState,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignatureState {
    signature_count: Displayed,
    signature_goal: Displayed,
}

#[derive(Debug, Deserialize)]
struct Displayed {
    displayed: i64,
}

/// Batched request body asking for the stats of one petition
fn request_body(petition: &str) -> serde_json::Value {
    serde_json::json!([Operation {
        operation_name: OPERATION,
        variables: Variables {
            petition_slug_or_id: petition,
        },
        query: QUERY,
    }])
}

/// Read the displayed figures out of a batched GraphQL response
fn decode_metrics(body: &str) -> anyhow::Result<Metrics> {
    let results: Vec<OperationResult> = serde_json::from_str(body)
        .with_context(|| format!("Unexpected response body: {}", body))?;
    match results.as_slice() {
        [result] => {
            let state = &result.data.petition_stats.signature_state;
            Ok(Metrics::new(
                state.signature_count.displayed,
                state.signature_goal.displayed,
            ))
        }
        _ => bail!(
            "Expected exactly one result, got {}: {}",
            results.len(),
            body
        ),
    }
}

/// Fetches signature counts from change.org
pub struct ChangeOrgFetcher {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl ChangeOrgFetcher {
    pub fn new(client: reqwest::blocking::Client) -> Self {
        Self {
            client,
            endpoint: ENDPOINT.to_string(),
        }
    }

    fn fetch_inner(&self, petition: &str) -> anyhow::Result<Metrics> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .header("x-requested-with", "http-link")
            .json(&request_body(petition))
            .send()
            .context("Sending GraphQL request")?;

        let status = response.status();
        let body = response.text().context("Reading GraphQL response")?;
        debug!(%status, bytes = body.len(), "metrics response");
        if status != reqwest::StatusCode::OK {
            return Err(anyhow!("Unexpected status {}: {}", status, body));
        }
        decode_metrics(&body)
    }
}

impl MetricsFetcher for ChangeOrgFetcher {
    fn fetch(&self, petition: &str) -> sigsheet::Result<Metrics> {
        self.fetch_inner(petition).map_err(sigsheet::Error::fetch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_body() {
        let body = request_body("save-the-bees");
        assert_eq!(body[0]["operationName"], "PetitionDetailsPageStats");
        assert_eq!(body[0]["variables"]["petitionSlugOrId"], "save-the-bees");
        assert!(body[0]["query"]
            .as_str()
            .unwrap()
            .contains("signatureGoal { displayed }"));
    }

    #[test]
    fn test_decode_metrics() {
        let body = r#"[{"data":{"petitionStats":{"signatureState":{
            "signatureCount":{"displayed":12345},
            "signatureGoal":{"displayed":20000}}}}}]"#;
        assert_eq!(decode_metrics(body).unwrap(), Metrics::new(12345, 20000));
    }

    #[test]
    fn test_decode_rejects_other_shapes() {
        assert!(decode_metrics("[]").is_err());
        assert!(decode_metrics(r#"{"errors":[]}"#).is_err());

        let err = decode_metrics("not json").unwrap_err();
        assert!(format!("{:#}", err).contains("not json"));
    }
}
