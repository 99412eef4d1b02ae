use crate::e2e::helpers;

use helpers::mock_provider::{Reply, Route};
use helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_the_first_suggestion(ctx: &TestContext) {
    ctx.provider.script(
        Route::Transliteration,
        vec![Reply::json(json!([
            "SUCCESS",
            [["namaste", ["నమస్తే", "నమస్టే"], [], { "candidate_type": [0, 0] }]]
        ]))],
    );

    let response = ctx
        .client
        .get("/api/transliterate?text=namaste")
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.as_ref().unwrap()["result"], "నమస్తే");

    let lookups = ctx.provider.lookups();
    assert_eq!(lookups.len(), 1);
    assert_eq!(lookups[0]["text"], "namaste");
    assert_eq!(lookups[0]["itc"], "te-t-i0-und");
    assert_eq!(lookups[0]["num"], "1");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_echo_the_input_when_there_is_no_suggestion(ctx: &TestContext) {
    ctx.provider.script(
        Route::Transliteration,
        vec![Reply::json(json!(["FAILED_TO_PROCESS", []]))],
    );

    let response = ctx
        .client
        .get("/api/transliterate?text=xyzzy")
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.as_ref().unwrap()["result"], "xyzzy");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_blank_text(ctx: &TestContext) {
    for path in ["/api/transliterate", "/api/transliterate?text=%20%20"] {
        let response = ctx.client.get(path).await.unwrap();

        response
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_error_message("Text required");
    }

    assert_eq!(ctx.provider.calls(Route::Transliteration), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_a_failed_lookup_as_bad_gateway(ctx: &TestContext) {
    ctx.provider.script(
        Route::Transliteration,
        vec![Reply::with_status(500, "backend error")],
    );

    let response = ctx
        .client
        .get("/api/transliterate?text=namaste")
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_error_message("Transliteration lookup failed");
}

#[tokio::test]
async fn it_should_serve_repeated_lookups_from_cache_when_enabled() {
    let ctx = TestContext::with_overrides(&[("TRANSLITERATION_CACHE_ENABLED", "true")])
        .await
        .unwrap();
    ctx.provider.script(
        Route::Transliteration,
        vec![Reply::json(json!(["SUCCESS", [["amma", ["అమ్మ"]]]]))],
    );

    for _ in 0..3 {
        let response = ctx.client.get("/api/transliterate?text=amma").await.unwrap();
        response.assert_status(StatusCode::OK);
        assert_eq!(response.body.as_ref().unwrap()["result"], "అమ్మ");
    }

    assert_eq!(ctx.provider.calls(Route::Transliteration), 1);

    ctx.shutdown.cancel();
}
