//! Verify request building against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector names a method, path and params, and describes the request the
//! client must build from them (or the error it must refuse with). Bodies are
//! compared as parsed JSON, not raw strings, so key order does not matter.

use feedlr::{Client, Error, HttpMethod, RequestSpec, SANDBOX_ENDPOINT};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> Client {
    Client::builder()
        .oauth_access_token("vector-token")
        .endpoint(BASE_URL)
        .build()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn spec_from(case: &serde_json::Value) -> RequestSpec {
    let method = parse_method(case["method"].as_str().unwrap());
    let mut spec = RequestSpec::new(method, case["path"].as_str().unwrap());
    if let Some(params) = case.get("params") {
        spec = spec.params(params.clone());
    }
    spec
}

#[test]
fn request_test_vectors() {
    let raw = include_str!("../test-vectors/requests.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let result = c.build_request(&spec_from(case));

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error.as_str().unwrap() {
                "TypeConversion" => {
                    assert!(matches!(err, Error::TypeConversion { .. }), "{name}: expected TypeConversion")
                }
                other => panic!("{name}: unknown expected_error: {other}"),
            }
            continue;
        }

        let req = result.unwrap();
        let expected_req = &case["expected_request"];
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");

        let expected_query: Vec<(String, Option<String>)> = expected_req["query"]
            .as_array()
            .unwrap()
            .iter()
            .map(|pair| {
                let arr = pair.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().map(str::to_string))
            })
            .collect();
        assert_eq!(req.query, expected_query, "{name}: query");

        match &expected_req["body"] {
            serde_json::Value::Null => assert!(req.body.is_none(), "{name}: body should be None"),
            expected_body => {
                let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
                assert_eq!(&body, expected_body, "{name}: body");
            }
        }

        assert_eq!(req.header("Authorization"), Some("OAuth vector-token"), "{name}: auth header");
        assert_eq!(req.header("Accept"), Some("application/json"), "{name}: accept header");
    }
}

#[test]
fn tag_entries_body_is_exact() {
    let spec = RequestSpec::put("/tags/t1").params(serde_json::json!({"entryIds": ["e1", "e2"]}));
    let req = client().build_request(&spec).unwrap();
    assert_eq!(req.body.as_deref(), Some(r#"{"entryIds":["e1","e2"]}"#));
}

#[test]
fn sandbox_client_never_targets_production() {
    let c = Client::sandbox("sandbox-token");
    for spec in [
        RequestSpec::get("/tags"),
        RequestSpec::put("/tags/t1").params(serde_json::json!({"entryIds": ["e1"]})),
        RequestSpec::delete("/tags/t1/e1"),
        RequestSpec::post("/enterprise/triggers").params(serde_json::json!({"type": "NewAnnotation"})),
    ] {
        let req = c.build_request(&spec).unwrap();
        assert!(
            req.url.starts_with(&format!("{SANDBOX_ENDPOINT}/v3/")),
            "unexpected url {}",
            req.url
        );
        assert!(!req.url.contains("cloud.feedly.com"));
    }
    assert_eq!(c.endpoint(), SANDBOX_ENDPOINT);
}
