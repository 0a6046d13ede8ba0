//! Router tests driven in-process with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use chrono::Utc;
use rand::{SeedableRng, rngs::StdRng};
use roster_core::{
  seed::{SeedConfig, generate},
  store::HiringStore,
};
use roster_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::{ApiError, api_router};

async fn app() -> (Router, Arc<SqliteStore>) {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  (api_router(store.clone()), store)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = app
    .clone()
    .oneshot(builder.body(body).unwrap())
    .await
    .unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

async fn create_job(app: &Router, title: &str) -> Value {
  let (status, job) = send(app, "POST", "/jobs", Some(json!({ "title": title }))).await;
  assert_eq!(status, StatusCode::CREATED);
  job
}

async fn create_candidate(app: &Router, job_id: &str, name: &str) -> Value {
  let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
  let (status, c) = send(
    app,
    "POST",
    "/candidates",
    Some(json!({ "name": name, "email": email, "jobId": job_id })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  c
}

// ─── Jobs ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_job_returns_camel_case_job() {
  let (app, _) = app().await;
  let (status, job) = send(
    &app,
    "POST",
    "/jobs",
    Some(json!({
      "title": "Senior  Rust Engineer",
      "tags": ["Rust", "Remote"],
      "requirements": ["5 years of Rust"],
    })),
  )
  .await;

  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(job["slug"], "senior-rust-engineer");
  assert_eq!(job["status"], "active");
  assert_eq!(job["order"], 0);
  assert!(job["createdAt"].is_string());
  assert!(job.get("description").is_none());
}

#[tokio::test]
async fn blank_title_is_a_field_error() {
  let (app, _) = app().await;
  let (status, body) = send(
    &app,
    "POST",
    "/jobs",
    Some(json!({ "title": "  ", "tags": ["ok", " "] })),
  )
  .await;

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["fields"]["title"], "Title is required");
  assert_eq!(body["fields"]["tags"], "All tags must be filled");
}

#[tokio::test]
async fn list_jobs_with_empty_filters_and_pagination() {
  let (app, _) = app().await;
  for title in ["Backend Engineer", "Designer", "Data Engineer"] {
    create_job(&app, title).await;
  }

  let (status, page) = send(&app, "GET", "/jobs?search=&status=&page=1&pageSize=2", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(page["data"].as_array().unwrap().len(), 2);
  assert_eq!(page["pagination"]["total"], 3);
  assert_eq!(page["pagination"]["totalPages"], 2);

  let (_, page) = send(&app, "GET", "/jobs?search=engineer&sort=title", None).await;
  let titles: Vec<_> = page["data"]
    .as_array()
    .unwrap()
    .iter()
    .map(|j| j["title"].as_str().unwrap().to_owned())
    .collect();
  assert_eq!(titles, ["Backend Engineer", "Data Engineer"]);

  let (status, body) = send(&app, "GET", "/jobs?pageSize=0", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["fields"]["pageSize"].is_string());
}

#[tokio::test]
async fn archive_toggle_and_delete() {
  let (app, _) = app().await;
  let job = create_job(&app, "Designer").await;
  let uri = format!("/jobs/{}", job["id"].as_str().unwrap());

  let (status, updated) = send(&app, "PATCH", &uri, Some(json!({ "status": "archived" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(updated["status"], "archived");

  let (_, archived) = send(&app, "GET", "/jobs?status=archived", None).await;
  assert_eq!(archived["pagination"]["total"], 1);

  let (status, _) = send(&app, "DELETE", &uri, None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, body) = send(&app, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].is_string());
  let (status, _) = send(&app, "DELETE", &uri, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reorder_keeps_orders_unique_and_increasing() {
  let (app, _) = app().await;
  let mut ids = Vec::new();
  for title in ["a", "b", "c", "d", "e"] {
    ids.push(create_job(&app, title).await["id"].as_str().unwrap().to_owned());
  }

  let (status, moved) = send(
    &app,
    "PATCH",
    &format!("/jobs/{}/reorder", ids[3]),
    Some(json!({ "fromOrder": 3, "toOrder": 1 })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(moved["order"], 1);

  let (_, page) = send(&app, "GET", "/jobs?pageSize=50", None).await;
  let orders: Vec<i64> = page["data"]
    .as_array()
    .unwrap()
    .iter()
    .map(|j| j["order"].as_i64().unwrap())
    .collect();
  assert!(orders.windows(2).all(|w| w[0] < w[1]));
  assert_eq!(page["data"][1]["id"], ids[3].as_str());
}

#[tokio::test]
async fn reorder_with_stale_from_order_conflicts() {
  let (app, _) = app().await;
  create_job(&app, "a").await;
  let b = create_job(&app, "b").await;

  let (status, _) = send(
    &app,
    "PATCH",
    &format!("/jobs/{}/reorder", b["id"].as_str().unwrap()),
    Some(json!({ "fromOrder": 0, "toOrder": 1 })),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);

  let (status, _) = send(
    &app,
    "PATCH",
    &format!("/jobs/{}/reorder", Uuid::new_v4()),
    Some(json!({ "fromOrder": 0, "toOrder": 1 })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn job_search_ignores_tag_list_punctuation() {
  let (app, _) = app().await;
  send(
    &app,
    "POST",
    "/jobs",
    Some(json!({ "title": "Plain", "tags": ["Rust", "Go"] })),
  )
  .await;

  for needle in ["%22", "%2C", "%5B"] {
    let (status, page) = send(&app, "GET", &format!("/jobs?search={needle}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["pagination"]["total"], 0, "{needle} matched");
  }
  let (_, page) = send(&app, "GET", "/jobs?search=GO", None).await;
  assert_eq!(page["pagination"]["total"], 1);
}

#[test]
fn store_domain_errors_keep_their_status() {
  use axum::response::IntoResponse as _;
  use roster_core::Error as CoreError;
  use roster_store_sqlite::Error as StoreError;

  let status = |e: StoreError| ApiError::store(e).into_response().status();
  let id = Uuid::new_v4();
  assert_eq!(status(CoreError::JobNotFound(id).into()), StatusCode::NOT_FOUND);
  assert_eq!(
    status(CoreError::OrderMismatch { id, expected: 1, actual: 2 }.into()),
    StatusCode::CONFLICT
  );
  assert_eq!(
    status(StoreError::DateParse("yesterday".into())),
    StatusCode::INTERNAL_SERVER_ERROR
  );
}

// ─── Malformed requests ──────────────────────────────────────────────────────

#[tokio::test]
async fn malformed_body_is_a_json_bad_request() {
  let (app, _) = app().await;
  let (status, body) = send(&app, "POST", "/jobs", Some(json!({}))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("title"));

  let job = create_job(&app, "a").await;
  let (status, body) = send(
    &app,
    "PATCH",
    &format!("/jobs/{}/reorder", job["id"].as_str().unwrap()),
    Some(json!({ "fromOrder": "first" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn malformed_query_and_path_are_json_bad_requests() {
  let (app, _) = app().await;
  for uri in ["/candidates?stage=interview", "/jobs?page=two", "/jobs/not-a-uuid"] {
    let (status, body) = send(&app, "GET", uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    assert!(body["error"].is_string(), "{uri}");
  }
}

// ─── Candidates ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn stage_change_appends_one_timeline_event() {
  let (app, _) = app().await;
  let job = create_job(&app, "SRE").await;
  let c = create_candidate(&app, job["id"].as_str().unwrap(), "Ada Lovelace").await;
  let uri = format!("/candidates/{}", c["id"].as_str().unwrap());

  send(&app, "PATCH", &uri, Some(json!({ "stage": "screen" }))).await;
  let (_, before) = send(&app, "GET", &format!("{uri}/timeline"), None).await;

  let (status, updated) = send(
    &app,
    "PATCH",
    &uri,
    Some(json!({ "stage": "tech", "note": "Moved to Technical" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(updated["stage"], "tech");

  let (_, after) = send(&app, "GET", &format!("{uri}/timeline"), None).await;
  let before = before.as_array().unwrap();
  let after = after.as_array().unwrap();
  assert_eq!(after.len(), before.len() + 1);

  let last = after.last().unwrap();
  assert_eq!(last["stage"], "tech");
  assert_eq!(last["note"], "Moved to Technical");
  let prev = before.last().unwrap()["timestamp"].as_str().unwrap();
  let prev = chrono::DateTime::parse_from_rfc3339(prev).unwrap();
  let next = chrono::DateTime::parse_from_rfc3339(last["timestamp"].as_str().unwrap()).unwrap();
  assert!(next >= prev);
}

#[tokio::test]
async fn candidate_validation_and_missing_resources() {
  let (app, _) = app().await;
  let (status, body) = send(
    &app,
    "POST",
    "/candidates",
    Some(json!({ "name": "", "email": "nope", "jobId": Uuid::new_v4() })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["fields"]["name"], "Name is required");
  assert_eq!(body["fields"]["email"], "A valid email is required");
  assert_eq!(body["fields"]["jobId"], "Job does not exist");

  let missing = format!("/candidates/{}", Uuid::new_v4());
  let (status, _) = send(&app, "GET", &missing, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  let (status, _) = send(&app, "GET", &format!("{missing}/timeline"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  let (status, _) = send(&app, "PATCH", &missing, Some(json!({ "stage": "hired" }))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn notes_patch_persists_without_an_event() {
  let (app, _) = app().await;
  let job = create_job(&app, "SRE").await;
  let c = create_candidate(&app, job["id"].as_str().unwrap(), "Grace Hopper").await;
  let uri = format!("/candidates/{}", c["id"].as_str().unwrap());

  let (status, updated) = send(&app, "PATCH", &uri, Some(json!({ "notes": "Strong" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(updated["notes"], "Strong");

  let (_, timeline) = send(&app, "GET", &format!("{uri}/timeline"), None).await;
  assert_eq!(timeline.as_array().unwrap().len(), 1);
}

// ─── Assessments ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn assessment_put_then_get_returns_the_same_tree() {
  let (app, _) = app().await;
  let job = create_job(&app, "SRE").await;
  let job_id = job["id"].as_str().unwrap();
  let uri = format!("/assessments/{job_id}");

  let (status, _) = send(&app, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let sections = json!([{
    "id": Uuid::new_v4(),
    "title": "Basics",
    "questions": [{
      "id": Uuid::new_v4(),
      "type": "short-text",
      "question": "Rate yourself",
      "required": true,
      "min": 1,
      "max": 10,
      "maxLength": 200,
    }],
  }]);
  let now = Utc::now();
  let doc = json!({
    "id": Uuid::new_v4(),
    "jobId": Uuid::new_v4(),
    "title": "Screening",
    "sections": sections,
    "createdAt": now,
    "updatedAt": now,
  });

  let (status, saved) = send(&app, "PUT", &uri, Some(doc)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(saved["jobId"], job_id);

  let (status, fetched) = send(&app, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(fetched["sections"], sections);
  assert_eq!(fetched["sections"][0]["questions"][0]["min"], 1);

  let (status, _) = send(
    &app,
    "PUT",
    &format!("/assessments/{}", Uuid::new_v4()),
    Some(fetched),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── End to end ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn seeded_board_matches_fixture_sizes() {
  let (app, store) = app().await;
  let mut rng = StdRng::seed_from_u64(2024);
  store
    .load_fixture(generate(&SeedConfig::default(), &mut rng, Utc::now()))
    .await
    .unwrap();

  let (_, stats) = send(&app, "GET", "/stats", None).await;
  assert_eq!(stats["totalJobs"], 25);
  assert_eq!(stats["totalCandidates"], 1000);

  let (_, jobs) = send(&app, "GET", "/jobs", None).await;
  assert_eq!(jobs["pagination"]["total"], 25);
  assert_eq!(jobs["pagination"]["totalPages"], 3);

  let (_, page) = send(&app, "GET", "/candidates?pageSize=1000", None).await;
  assert_eq!(page["pagination"]["total"], 1000);
  let candidates = page["data"].as_array().unwrap();
  assert_eq!(candidates.len(), 1000);

  let stages = ["applied", "screen", "tech", "offer", "hired", "rejected"];
  for c in candidates.iter().step_by(37) {
    let stage = c["stage"].as_str().unwrap();
    let index = stages.iter().position(|s| *s == stage).unwrap();
    let (_, events) = send(
      &app,
      "GET",
      &format!("/candidates/{}/timeline", c["id"].as_str().unwrap()),
      None,
    )
    .await;
    assert_eq!(events.as_array().unwrap().len(), index + 1);
  }

  let (_, hired) = send(&app, "GET", "/candidates?stage=hired&pageSize=1000", None).await;
  assert!(
    hired["data"]
      .as_array()
      .unwrap()
      .iter()
      .all(|c| c["stage"] == "hired")
  );
  assert_eq!(hired["pagination"]["total"], stats["hiredCandidates"]);

  let (_, assessment) = send(
    &app,
    "GET",
    &format!("/assessments/{}", jobs["data"][0]["id"].as_str().unwrap()),
    None,
  )
  .await;
  assert_eq!(assessment["sections"].as_array().unwrap().len(), 2);
}
