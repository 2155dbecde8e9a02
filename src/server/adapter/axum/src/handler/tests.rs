/* src/server/adapter/axum/src/handler/tests.rs */

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use pseo_server::SiteServer;
use pseo_server::pseo_engine::{Category, ContentBlock, Locale, SitemapConfig};
use serde_json::{Value, json};
use tower::ServiceExt;

use super::build_router;

fn server(base_url: &str) -> SiteServer {
  let blocks: Vec<ContentBlock> = serde_json::from_value(json!([
    {"id": "faq-rates", "type": "faq", "title": "How fresh are rates?", "body": "Every minute.",
     "weight": 50, "reviewed": true, "locale": "en", "constraints": {"slots": ["faq"]}}
  ]))
  .unwrap();
  let categories: Vec<Category> = serde_json::from_value(json!([{
    "id": "currency", "slug": "currency", "name": "Currency Converter",
    "urlPattern": ":base-:quote", "templateType": "converter",
    "locales": ["en"], "isActive": true
  }]))
  .unwrap();
  let locales: Vec<Locale> = serde_json::from_value(json!([
    {"code": "en", "name": "English", "nativeName": "English", "isDefault": true}
  ]))
  .unwrap();
  SiteServer::new(base_url)
    .build_salt("test")
    .blocks(blocks)
    .categories(categories)
    .locales(locales)
    .sitemap(SitemapConfig { sample_identifiers: 3, ..SitemapConfig::new(base_url) })
}

fn router() -> axum::Router {
  build_router(server("https://example.com").into_parts())
}

async fn send(router: axum::Router, request: Request<Body>) -> (StatusCode, String) {
  let response = router.oneshot(request).await.unwrap();
  let status = response.status();
  let bytes = response.into_body().collect().await.unwrap().to_bytes();
  (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn get(router: axum::Router, uri: &str) -> (StatusCode, String) {
  send(router, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn get_json(router: axum::Router, uri: &str) -> (StatusCode, Value) {
  let (status, body) = get(router, uri).await;
  (status, serde_json::from_str(&body).unwrap())
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
  Request::builder()
    .method(method)
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(body.to_string()))
    .unwrap()
}

#[tokio::test]
async fn sitemap_index_is_xml() {
  let response =
    router().oneshot(Request::get("/sitemap.xml").body(Body::empty()).unwrap()).await.unwrap();
  assert_eq!(response.status(), StatusCode::OK);
  assert_eq!(response.headers()[header::CONTENT_TYPE], "application/xml");
  assert_eq!(response.headers()[header::CACHE_CONTROL], "public, max-age=3600, s-maxage=3600");
  let bytes = response.into_body().collect().await.unwrap().to_bytes();
  let body = String::from_utf8(bytes.to_vec()).unwrap();
  assert!(body.contains("<sitemapindex"));
  assert!(body.contains("<loc>https://example.com/sitemaps/sitemap-0.xml</loc>"));
}

#[tokio::test]
async fn sitemap_chunks_by_filename() {
  let (status, body) = get(router(), "/sitemaps/sitemap-0.xml").await;
  assert_eq!(status, StatusCode::OK);
  assert!(body.contains("<loc>https://example.com/currency/usd-eur</loc>"));

  let (status, _) = get(router(), "/sitemaps/sitemap-1.xml").await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _) = get(router(), "/sitemaps/other.xml").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) = get(router(), "/sitemaps/sitemap-00.xml").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sitemap_failure_is_json_with_details() {
  let router = build_router(server("not-a-url").into_parts());
  let (status, body) = get_json(router, "/sitemap.xml").await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(body["ok"], false);
  assert_eq!(body["error"]["message"], "Sitemap validation failed");
  assert!(!body["error"]["details"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn robots_lists_sitemaps() {
  let (status, body) = get(router(), "/robots.txt").await;
  assert_eq!(status, StatusCode::OK);
  assert!(body.starts_with("User-agent: *\nAllow: /\n"));
  assert!(body.contains("Sitemap: https://example.com/sitemaps/sitemap-0.xml"));
}

#[tokio::test]
async fn page_view_json() {
  let (status, body) = get_json(router(), "/api/page/en/currency/usd-eur").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["ok"], true);
  assert_eq!(body["data"]["path"], "/currency/usd-eur");
  assert_eq!(body["data"]["seo"]["canonical"], "https://example.com/currency/usd-eur");
  assert_eq!(body["data"]["slots"]["faq"][0]["id"], "faq-rates");

  let crumbs = body["data"]["seo"]["breadcrumbs"].as_array().unwrap();
  assert_eq!(crumbs.len(), 3);
  assert_eq!(crumbs[1]["url"], "https://example.com/currency");
  assert_eq!(crumbs[2]["name"], "usd - eur");
  let json_ld = &body["data"]["seo"]["jsonLd"];
  assert_eq!(json_ld["webPage"]["@type"], "WebPage");
  assert_eq!(json_ld["breadcrumb"]["@type"], "BreadcrumbList");
  assert_eq!(json_ld["categorySpecific"]["@type"], "WebApplication");

  let (status, body) = get_json(router(), "/api/page/currency/usd-eur").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["identifier"]["locale"], "en");

  let (status, body) = get_json(router(), "/api/page/en/currency/usdeur").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn page_with_multi_segment_identifier() {
  let categories: Vec<Category> = serde_json::from_value(json!([
    {"id": "currency", "slug": "currency", "name": "Currency Converter",
     "urlPattern": ":base-:quote", "templateType": "converter",
     "locales": ["en"], "isActive": true},
    {"id": "banks", "slug": "banks", "name": "Bank Branches",
     "urlPattern": ":country/branch/:code", "templateType": "directory",
     "locales": ["en"], "isActive": true}
  ]))
  .unwrap();
  let router = build_router(server("https://example.com").categories(categories).into_parts());

  for uri in ["/api/page/en/banks/fr/branch/BNPAFRPP", "/api/page/banks/fr/branch/BNPAFRPP"] {
    let (status, body) = get_json(router.clone(), uri).await;
    assert_eq!(status, StatusCode::OK, "{uri}");
    assert_eq!(body["data"]["path"], "/banks/fr/branch/BNPAFRPP");
    assert_eq!(body["data"]["identifier"]["params"]["country"], "fr");
    assert_eq!(body["data"]["identifier"]["params"]["code"], "BNPAFRPP");
  }

  let (status, _) = get_json(router, "/api/page/en/banks/fr/BNPAFRPP").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_block_lifecycle() {
  let router = router();
  let new_block = json!({
    "id": "cta-alerts", "type": "cta", "title": "Set an alert", "body": "Get notified.",
    "weight": 20, "reviewed": false, "locale": "en", "constraints": {"slots": ["cta"]}
  });
  let (status, body) =
    send(router.clone(), json_request("POST", "/api/admin/blocks", &new_block)).await;
  assert_eq!(status, StatusCode::CREATED, "{body}");

  let (status, body) = get_json(router.clone(), "/api/admin/blocks?type=cta").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["total"], 1);

  let (_, body) = get_json(router.clone(), "/api/admin/blocks?reviewed=true").await;
  assert_eq!(body["data"]["blocks"][0]["id"], "faq-rates");

  let duplicate = json_request("POST", "/api/admin/blocks", &new_block);
  let (status, _) = send(router.clone(), duplicate).await;
  assert_eq!(status, StatusCode::CONFLICT);

  let delete = Request::delete("/api/admin/blocks/cta-alerts").body(Body::empty()).unwrap();
  let (status, _) = send(router.clone(), delete).await;
  assert_eq!(status, StatusCode::OK);
  let (status, _) = get(router, "/api/admin/blocks/cta-alerts").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_rejects_invalid_block() {
  let bad = json!({"id": "Bad Id", "type": "faq", "title": "", "body": "x", "weight": 0});
  let (status, body) = send(router(), json_request("POST", "/api/admin/blocks", &bad)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  let body: Value = serde_json::from_str(&body).unwrap();
  assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
  assert!(body["error"]["details"].as_array().unwrap().len() >= 2);

  let (status, _) = send(router(), json_request("POST", "/api/admin/blocks", &json!("nope"))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_locales_and_categories() {
  let router = router();
  let fr = json!({"code": "fr", "name": "French", "nativeName": "Français"});
  let (status, _) = send(router.clone(), json_request("POST", "/api/admin/locales", &fr)).await;
  assert_eq!(status, StatusCode::CREATED);

  let default = Request::post("/api/admin/locales/fr/default").body(Body::empty()).unwrap();
  let (status, _) = send(router.clone(), default).await;
  assert_eq!(status, StatusCode::OK);

  let (_, body) = get_json(router.clone(), "/api/admin/locales").await;
  assert_eq!(body["data"]["total"], 2);
  let defaults: Vec<&Value> =
    body["data"]["locales"].as_array().unwrap().iter().filter(|l| l["isDefault"] == true).collect();
  assert_eq!(defaults.len(), 1);
  assert_eq!(defaults[0]["code"], "fr");

  let (_, body) = get_json(router, "/api/admin/categories").await;
  assert_eq!(body["data"]["total"], 1);
  assert_eq!(body["data"]["categories"][0]["slug"], "currency");
}

#[tokio::test]
async fn ops_report() {
  let (status, body) = get_json(router(), "/api/ops/sitemaps/validate").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["validation"]["valid"], true);
  // 3 identifiers + 1 category index page
  assert_eq!(body["data"]["statistics"]["totalUrls"], 4);
  assert_eq!(body["data"]["chunks"][0]["sampleUrls"].as_array().unwrap().len(), 3);

  let (_, body) = get_json(router(), "/api/ops/sitemaps/list").await;
  assert_eq!(body["data"][0]["filename"], "sitemap-0.xml");

  let (_, body) = get_json(router(), "/api/ops/blocks/stats").await;
  assert_eq!(body["data"]["total"], 1);
}

#[tokio::test]
async fn ops_seo_audit_flags_missing_titles() {
  let (status, body) = get_json(router(), "/api/ops/seo/validate").await;
  assert_eq!(status, StatusCode::OK);
  let pages = body["data"]["pages"].as_array().unwrap();
  assert_eq!(pages.len(), 3);
  assert_eq!(pages[0]["path"], "/currency/usd-eur");
  // no title or description templates configured
  assert_eq!(pages[0]["validation"]["errors"], json!(["Missing title"]));
  assert_eq!(pages[0]["validation"]["score"], 60);
  assert_eq!(body["data"]["averageScore"], 60);
  assert_eq!(body["data"]["consistency"]["valid"], true);
  assert!(body["data"]["unresolved"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn ops_seo_check_on_supplied_pages() {
  let page = json!({
    "path": "/guides/swift",
    "title": "What is a SWIFT code?",
    "description": "Everything you need to know about SWIFT codes and international wires.",
    "canonical": "https://example.com/guides/swift",
    "jsonLd": [{"@context": "https://schema.org", "@type": "Article"}],
    "breadcrumbs": [
      {"name": "Home", "url": "https://example.com"},
      {"name": "Guides", "url": "https://example.com/guides"}
    ]
  });
  let mut copy = page.clone();
  copy["path"] = json!("/guides/swift-copy");
  let body = json!([page, copy]);
  let (status, body) =
    send(router(), json_request("POST", "/api/ops/seo/validate", &body)).await;
  assert_eq!(status, StatusCode::OK, "{body}");
  let body: Value = serde_json::from_str(&body).unwrap();
  assert_eq!(body["data"]["results"][0]["score"], 100);
  assert_eq!(body["data"]["consistency"]["valid"], false);
  assert_eq!(
    body["data"]["consistency"]["duplicateTitles"],
    json!(["what is a swift code? (used on: /guides/swift, /guides/swift-copy)"])
  );

  let (status, _) =
    send(router(), json_request("POST", "/api/ops/seo/validate", &json!({"no": "list"}))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}
