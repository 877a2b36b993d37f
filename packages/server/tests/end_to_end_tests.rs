mod common;

use axum::{body::Body, http::Request, http::StatusCode};
use common::harness::{send, TestHarness};
use menu_scraper::kernel::USER_AGENT;
use test_context::test_context;

// =============================================================================
// Tests: Full pipeline against stub site and stub Gemini
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn test_scrape_rebuilds_nested_menu(ctx: &TestHarness) {
    let (status, body) = ctx.scrape(&[ctx.site_url("/luigis")]).await;

    assert_eq!(status, StatusCode::OK);
    let result = &body["results"][0];
    assert_eq!(result["success"], true, "unexpected failure: {}", result);

    let data = &result["data"];
    assert_eq!(data["restaurant_name"], "Luigi's Trattoria");
    assert!(data["last_updated"].as_str().unwrap().ends_with('Z'));

    let menus = data["menus"].as_array().unwrap();
    assert_eq!(menus.len(), 2);
    assert_eq!(menus[0]["menu_name"], "Dinner");
    assert_eq!(menus[1]["menu_name"], "Lunch");

    let pasta = &menus[0]["sections"][0];
    assert_eq!(pasta["section_name"], "Pasta");
    assert_eq!(pasta["items"][0]["name"], "Carbonara");
    assert_eq!(pasta["items"][1]["name"], "Cacio e Pepe");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_fetch_identifies_as_menu_bot(ctx: &TestHarness) {
    ctx.scrape(&[ctx.site_url("/luigis"), ctx.site_url("/gone")]).await;

    let agents = ctx.site_user_agents();
    assert_eq!(agents.len(), 2);
    assert!(agents.iter().all(|agent| agent == USER_AGENT));
    assert_eq!(USER_AGENT, "Mozilla/5.0 (compatible; MenuBot/1.0)");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_model_request_carries_key_schema_and_sampling(ctx: &TestHarness) {
    ctx.scrape(&[ctx.site_url("/luigis")]).await;

    let calls = ctx.model_calls();
    assert_eq!(calls.len(), 1);
    let call = &calls[0];

    assert!(call.path.ends_with(":generateContent"));
    assert_eq!(call.api_key.as_deref(), Some(common::harness::STUB_API_KEY));

    let config = &call.body["generationConfig"];
    assert_eq!(config["responseMimeType"], "application/json");
    assert_eq!(config["topK"], 1);
    assert_eq!(config["maxOutputTokens"], 16384);
    assert!((config["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
    assert_eq!(config["responseSchema"]["type"], "OBJECT");

    assert!(call.body["systemInstruction"]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .contains("ABSOLUTE price"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_structured_page_and_fenced_answer(ctx: &TestHarness) {
    let (_, body) = ctx.scrape(&[ctx.site_url("/structured")]).await;

    let result = &body["results"][0];
    assert_eq!(result["success"], true, "unexpected failure: {}", result);
    assert_eq!(result["data"]["restaurant_name"], "Blue Door Bistro");

    let prompt = ctx.model_calls()[0].body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(prompt.contains("JSON-LD"));
    assert!(!prompt.contains("ignored body"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_mixed_batch_isolates_failures(ctx: &TestHarness) {
    let urls = vec![
        ctx.site_url("/slow"),
        ctx.site_url("/luigis"),
        ctx.site_url("/gone"),
        ctx.site_url("/broken"),
        "ftp://menus.example/list".to_string(),
    ];

    let (status, body) = ctx.scrape(&urls).await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), urls.len());
    for (result, url) in results.iter().zip(&urls) {
        assert_eq!(result["url"], url.as_str());
    }

    let error = |i: usize| results[i]["error"].as_str().unwrap().to_string();

    assert_eq!(results[0]["success"], false);
    assert!(error(0).contains("timed out"), "{}", error(0));

    assert_eq!(results[1]["success"], true);

    assert!(error(2).contains("HTTP 410"), "{}", error(2));
    assert!(error(3).starts_with("failed to parse model response"), "{}", error(3));
    assert!(error(4).starts_with("invalid URL"), "{}", error(4));

    // Fetch failures never reach the model
    assert_eq!(ctx.model_calls().len(), 2);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_ready_with_full_config(ctx: &TestHarness) {
    let request = Request::builder().uri("/ready").body(Body::empty()).unwrap();

    let (status, body) = send(ctx.app.clone(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Service is ready");
}
