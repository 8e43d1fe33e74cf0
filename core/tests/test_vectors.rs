//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use provider_core::{
    HttpMethod, HttpRequest, HttpResponse, Identifier, ListParams, ProviderConfig, ProviderError,
    ReferenceParams, RestClient,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:8080/rest";

fn client() -> RestClient {
    RestClient::new(ProviderConfig::rest(BASE_URL))
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated_response(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn ids(case: &Value) -> Vec<Identifier> {
    serde_json::from_value(case["ids"].clone()).unwrap()
}

fn id(case: &Value) -> Identifier {
    serde_json::from_value(case["id"].clone()).unwrap()
}

fn verify_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: url");

    let expected_headers: Vec<(String, String)> = expected["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");

    match expected.get("body") {
        Some(body) => {
            let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn verify_outcome(name: &str, case: &Value, result: Result<Value, ProviderError>) {
    if let Some(expected_error) = case.get("expected_error") {
        let err = result.unwrap_err();
        let matched = match expected_error.as_str().unwrap() {
            "Http" => matches!(err, ProviderError::Http { .. }),
            "UnsupportedResponse" => matches!(err, ProviderError::UnsupportedResponse { .. }),
            "Deserialization" => matches!(err, ProviderError::Deserialization(_)),
            other => panic!("{name}: unknown expected_error: {other}"),
        };
        assert!(matched, "{name}: expected {expected_error}, got {err:?}");
    } else {
        assert_eq!(result.unwrap(), case["expected_result"], "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// List and reference list
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let raw = include_str!("../../test-vectors/list.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let resource = case["resource"].as_str().unwrap();

        let req = match case["operation"].as_str().unwrap() {
            "get_list" => {
                let params: ListParams = serde_json::from_value(case["params"].clone()).unwrap();
                c.build_get_list(resource, &params).unwrap()
            }
            "get_many_reference" => {
                let params: ReferenceParams =
                    serde_json::from_value(case["params"].clone()).unwrap();
                c.build_get_many_reference(resource, &params).unwrap()
            }
            other => panic!("{name}: unexpected operation {other}"),
        };
        verify_request(name, &req, &case["expected_request"]);

        let result = c
            .parse_list(simulated_response(case))
            .map(|list| serde_json::to_value(list).unwrap());
        verify_outcome(name, case, result);
    }
}

// ---------------------------------------------------------------------------
// Record operations
// ---------------------------------------------------------------------------

#[test]
fn record_test_vectors() {
    let raw = include_str!("../../test-vectors/records.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let resource = case["resource"].as_str().unwrap();
        let data = &case["data"];

        let req = match case["operation"].as_str().unwrap() {
            "get_one" => c.build_get_one(resource, &id(case)),
            "get_many" => c.build_get_many(resource, &ids(case)),
            "create" => c.build_create(resource, data).unwrap(),
            "update" => c.build_update(resource, &id(case), data).unwrap(),
            "update_many" => c.build_update_many(resource, &ids(case), data).unwrap(),
            "delete" => c.build_delete(resource, &id(case)),
            "delete_many" => c.build_delete_many(resource, &ids(case)),
            other => panic!("{name}: unexpected operation {other}"),
        };
        verify_request(name, &req, &case["expected_request"]);

        let result = c
            .parse_data(simulated_response(case))
            .map(|result| serde_json::to_value(result).unwrap());
        verify_outcome(name, case, result);
    }
}
