//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{SubsecRound as _, Utc};
use rand::{SeedableRng, rngs::StdRng};
use roster_core::{
  Error as CoreError,
  assessment::{Assessment, QuestionKind},
  candidate::{CandidatePatch, NewCandidate, Stage},
  job::{JobPatch, JobSort, JobStatus, NewJob},
  page::PageRequest,
  seed::{SeedConfig, generate},
  store::{CandidateQuery, HiringStore, JobQuery},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_job(title: &str, tags: &[&str]) -> NewJob {
  NewJob {
    title:        title.into(),
    description:  None,
    requirements: vec![],
    tags:         tags.iter().map(|t| (*t).to_owned()).collect(),
  }
}

fn new_candidate(job_id: Uuid, name: &str, email: &str) -> NewCandidate {
  NewCandidate {
    name: name.into(),
    email: email.into(),
    job_id,
    stage: Stage::Applied,
    notes: None,
  }
}

async fn seeded(s: &SqliteStore, config: SeedConfig) {
  let mut rng = StdRng::seed_from_u64(42);
  s.load_fixture(generate(&config, &mut rng, Utc::now()))
    .await
    .unwrap();
}

async fn orders(s: &SqliteStore) -> Vec<(String, i64)> {
  let query = JobQuery { page: PageRequest::new(Some(1), Some(100)), ..JobQuery::default() };
  s.list_jobs(&query)
    .await
    .unwrap()
    .data
    .into_iter()
    .map(|j| (j.title, j.order))
    .collect()
}

// ─── Jobs ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_job_appends_to_the_board() {
  let s = store().await;
  let a = s.create_job(new_job("Backend Engineer", &["Rust"])).await.unwrap();
  let b = s.create_job(new_job("Data Analyst", &[])).await.unwrap();

  assert_eq!(a.order, 0);
  assert_eq!(b.order, 1);
  assert_eq!(a.slug, "backend-engineer");
  assert_eq!(a.status, JobStatus::Active);

  let fetched = s.get_job(a.id).await.unwrap().unwrap();
  assert_eq!(fetched, a);
}

#[tokio::test]
async fn get_job_missing_returns_none() {
  let s = store().await;
  assert!(s.get_job(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_jobs_filters_and_paginates() {
  let s = store().await;
  s.create_job(new_job("Senior Backend Engineer", &["Rust", "Remote"])).await.unwrap();
  let archived = s.create_job(new_job("Frontend Developer", &["TypeScript"])).await.unwrap();
  s.create_job(new_job("Platform Engineer", &["Kubernetes"])).await.unwrap();
  s.update_job(archived.id, JobPatch::status(JobStatus::Archived))
    .await
    .unwrap();

  let by_title = s
    .list_jobs(&JobQuery { search: Some("ENGINEER".into()), ..JobQuery::default() })
    .await
    .unwrap();
  assert_eq!(by_title.pagination.total, 2);

  let by_tag = s
    .list_jobs(&JobQuery { search: Some("typescript".into()), ..JobQuery::default() })
    .await
    .unwrap();
  assert_eq!(by_tag.data.len(), 1);
  assert_eq!(by_tag.data[0].id, archived.id);

  let active = s
    .list_jobs(&JobQuery { status: Some(JobStatus::Active), ..JobQuery::default() })
    .await
    .unwrap();
  assert_eq!(active.pagination.total, 2);

  let second_page = s
    .list_jobs(&JobQuery {
      page: PageRequest::new(Some(2), Some(2)),
      ..JobQuery::default()
    })
    .await
    .unwrap();
  assert_eq!(second_page.data.len(), 1);
  assert_eq!(second_page.data[0].title, "Platform Engineer");
  assert_eq!(second_page.pagination.total_pages, 2);
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
  let s = store().await;
  s.create_job(new_job("QA Lead", &[])).await.unwrap();
  let page = s
    .list_jobs(&JobQuery { search: Some("%".into()), ..JobQuery::default() })
    .await
    .unwrap();
  assert!(page.data.is_empty());
}

#[tokio::test]
async fn search_matches_tag_values_not_their_encoding() {
  let s = store().await;
  s.create_job(new_job("Plain", &["Rust", "Go"])).await.unwrap();

  for needle in ["\"", ",", "[", "]"] {
    let page = s
      .list_jobs(&JobQuery { search: Some(needle.into()), ..JobQuery::default() })
      .await
      .unwrap();
    assert_eq!(page.pagination.total, 0, "{needle:?} matched");
  }

  let page = s
    .list_jobs(&JobQuery { search: Some("rus".into()), ..JobQuery::default() })
    .await
    .unwrap();
  assert_eq!(page.data.len(), 1);
}

#[tokio::test]
async fn search_ignores_case_beyond_ascii() {
  let s = store().await;
  let job = s.create_job(new_job("Élite Guard", &["Ünicode"])).await.unwrap();
  s.create_candidate(new_candidate(job.id, "Øyvind Ångström", "oa@example.com"))
    .await
    .unwrap();

  for needle in ["élite", "ÉLITE", "ünicode"] {
    let page = s
      .list_jobs(&JobQuery { search: Some(needle.into()), ..JobQuery::default() })
      .await
      .unwrap();
    assert_eq!(page.data.len(), 1, "{needle:?} missed");
  }

  let query = CandidateQuery {
    search: Some("øyvind ångström".into()),
    ..CandidateQuery::default()
  };
  let page = s.list_candidates(&query).await.unwrap();
  assert_eq!(page.data.len(), 1);
}

#[tokio::test]
async fn list_jobs_sorts_by_title() {
  let s = store().await;
  s.create_job(new_job("zeta", &[])).await.unwrap();
  s.create_job(new_job("Alpha", &[])).await.unwrap();
  s.create_job(new_job("mid", &[])).await.unwrap();

  let page = s
    .list_jobs(&JobQuery { sort: JobSort::Title, ..JobQuery::default() })
    .await
    .unwrap();
  let titles: Vec<_> = page.data.iter().map(|j| j.title.as_str()).collect();
  assert_eq!(titles, ["Alpha", "mid", "zeta"]);
}

#[tokio::test]
async fn update_job_reslugs_and_keeps_order() {
  let s = store().await;
  s.create_job(new_job("First", &[])).await.unwrap();
  let job = s.create_job(new_job("Second", &[])).await.unwrap();

  let patch = JobPatch { title: Some("Staff Engineer".into()), ..JobPatch::default() };
  let updated = s.update_job(job.id, patch).await.unwrap().unwrap();
  assert_eq!(updated.slug, "staff-engineer");
  assert_eq!(updated.order, 1);
  assert!(updated.updated_at >= job.updated_at);

  let missing = s.update_job(Uuid::new_v4(), JobPatch::default()).await.unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn delete_job_leaves_candidates_behind() {
  let s = store().await;
  let job = s.create_job(new_job("Designer", &[])).await.unwrap();
  let c = s
    .create_candidate(new_candidate(job.id, "Ada Lovelace", "ada@example.com"))
    .await
    .unwrap();

  assert!(s.delete_job(job.id).await.unwrap());
  assert!(!s.delete_job(job.id).await.unwrap());
  assert!(s.get_candidate(c.id).await.unwrap().is_some());
}

// ─── Reordering ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn reorder_down_the_board_shifts_the_range_up() {
  let s = store().await;
  for title in ["a", "b", "c", "d", "e"] {
    s.create_job(new_job(title, &[])).await.unwrap();
  }
  let page = s.list_jobs(&JobQuery::default()).await.unwrap();
  let d = &page.data[3];

  let moved = s.reorder_job(d.id, 3, 1).await.unwrap();
  assert_eq!(moved.order, 1);

  let after = orders(&s).await;
  let titles: Vec<_> = after.iter().map(|(t, _)| t.as_str()).collect();
  assert_eq!(titles, ["a", "d", "b", "c", "e"]);
  let values: Vec<_> = after.iter().map(|(_, o)| *o).collect();
  assert_eq!(values, [0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn reorder_up_the_board_shifts_the_range_down() {
  let s = store().await;
  for title in ["a", "b", "c", "d"] {
    s.create_job(new_job(title, &[])).await.unwrap();
  }
  let page = s.list_jobs(&JobQuery::default()).await.unwrap();
  s.reorder_job(page.data[0].id, 0, 2).await.unwrap();

  let after = orders(&s).await;
  assert_eq!(after, [
    ("b".to_owned(), 0),
    ("c".to_owned(), 1),
    ("a".to_owned(), 2),
    ("d".to_owned(), 3),
  ]);
}

#[tokio::test]
async fn reorder_rejects_stale_from_order() {
  let s = store().await;
  s.create_job(new_job("a", &[])).await.unwrap();
  let b = s.create_job(new_job("b", &[])).await.unwrap();

  let err = s.reorder_job(b.id, 0, 1).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(CoreError::OrderMismatch { expected: 0, actual: 1, .. })
  ));

  let err = s.reorder_job(Uuid::new_v4(), 0, 1).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::JobNotFound(_))));

  let unchanged: Vec<_> = orders(&s).await.into_iter().map(|(_, o)| o).collect();
  assert_eq!(unchanged, [0, 1]);
}

#[tokio::test]
async fn reorder_to_same_position_is_a_no_op() {
  let s = store().await;
  let a = s.create_job(new_job("a", &[])).await.unwrap();
  let moved = s.reorder_job(a.id, 0, 0).await.unwrap();
  assert_eq!(moved.order, 0);
}

// ─── Candidates ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_candidate_records_first_event() {
  let s = store().await;
  let job = s.create_job(new_job("SRE", &[])).await.unwrap();
  let c = s
    .create_candidate(new_candidate(job.id, "Grace Hopper", "grace@example.com"))
    .await
    .unwrap();

  let events = s.timeline(c.id).await.unwrap();
  assert_eq!(events.len(), 1);
  assert_eq!(events[0].stage, Stage::Applied);
  assert_eq!(events[0].timestamp, c.applied_at);
}

#[tokio::test]
async fn stage_change_appends_exactly_one_event() {
  let s = store().await;
  let job = s.create_job(new_job("SRE", &[])).await.unwrap();
  let c = s
    .create_candidate(new_candidate(job.id, "Linus T", "linus@example.com"))
    .await
    .unwrap();

  s.update_candidate(c.id, CandidatePatch::stage(Stage::Screen))
    .await
    .unwrap();
  let patch = CandidatePatch {
    stage: Some(Stage::Tech),
    note: Some("Moved to tech".into()),
    ..CandidatePatch::default()
  };
  let updated = s.update_candidate(c.id, patch).await.unwrap().unwrap();
  assert_eq!(updated.stage, Stage::Tech);

  let events = s.timeline(c.id).await.unwrap();
  let stages: Vec<_> = events.iter().map(|e| e.stage).collect();
  assert_eq!(stages, [Stage::Applied, Stage::Screen, Stage::Tech]);
  assert!(events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
  assert_eq!(events[2].note.as_deref(), Some("Moved to tech"));
}

#[tokio::test]
async fn same_stage_or_notes_only_patch_appends_nothing() {
  let s = store().await;
  let job = s.create_job(new_job("SRE", &[])).await.unwrap();
  let c = s
    .create_candidate(new_candidate(job.id, "Ken T", "ken@example.com"))
    .await
    .unwrap();

  s.update_candidate(c.id, CandidatePatch::stage(Stage::Applied))
    .await
    .unwrap();
  let updated = s
    .update_candidate(c.id, CandidatePatch::notes("Great portfolio"))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.notes.as_deref(), Some("Great portfolio"));
  assert_eq!(s.timeline(c.id).await.unwrap().len(), 1);

  let cleared = s
    .update_candidate(c.id, CandidatePatch::notes(""))
    .await
    .unwrap()
    .unwrap();
  assert!(cleared.notes.is_none());
}

#[tokio::test]
async fn event_after_future_dated_history_is_not_earlier() {
  let s = store().await;
  let mut rng = StdRng::seed_from_u64(3);
  let future = (Utc::now() + chrono::Duration::days(2)).trunc_subsecs(6);
  let config = SeedConfig { jobs: 1, candidates: 1, assessments: 0 };
  let data = generate(&config, &mut rng, future);
  let candidate = data.candidates[0].clone();
  let latest = data.timeline.iter().map(|e| e.timestamp).max().unwrap();
  s.load_fixture(data).await.unwrap();

  let target = Stage::ALL
    .into_iter()
    .find(|st| *st != candidate.stage)
    .unwrap();
  s.update_candidate(candidate.id, CandidatePatch::stage(target))
    .await
    .unwrap();

  let events = s.timeline(candidate.id).await.unwrap();
  let last = events.last().unwrap();
  assert_eq!(last.stage, target);
  assert!(last.timestamp >= latest);
}

#[tokio::test]
async fn update_missing_candidate_returns_none() {
  let s = store().await;
  let result = s
    .update_candidate(Uuid::new_v4(), CandidatePatch::stage(Stage::Hired))
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn list_candidates_filters_by_stage_job_and_search() {
  let s = store().await;
  let job = s.create_job(new_job("SRE", &[])).await.unwrap();
  let other = s.create_job(new_job("PM", &[])).await.unwrap();
  let ada = s
    .create_candidate(new_candidate(job.id, "Ada Lovelace", "ada@example.com"))
    .await
    .unwrap();
  s.create_candidate(new_candidate(job.id, "Alan Turing", "alan@example.com"))
    .await
    .unwrap();
  s.create_candidate(new_candidate(other.id, "Grace Hopper", "grace@navy.mil"))
    .await
    .unwrap();
  s.update_candidate(ada.id, CandidatePatch::stage(Stage::Hired))
    .await
    .unwrap();

  let hired = s
    .list_candidates(&CandidateQuery { stage: Some(Stage::Hired), ..CandidateQuery::default() })
    .await
    .unwrap();
  assert_eq!(hired.pagination.total, 1);
  assert_eq!(hired.data[0].id, ada.id);

  let for_job = s
    .list_candidates(&CandidateQuery { job_id: Some(job.id), ..CandidateQuery::default() })
    .await
    .unwrap();
  assert_eq!(for_job.pagination.total, 2);

  let by_email = s
    .list_candidates(&CandidateQuery { search: Some("NAVY".into()), ..CandidateQuery::default() })
    .await
    .unwrap();
  assert_eq!(by_email.data.len(), 1);
  assert_eq!(by_email.data[0].name, "Grace Hopper");
}

// ─── Assessments ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn assessment_round_trip_preserves_created_at() {
  let s = store().await;
  let job = s.create_job(new_job("SRE", &[])).await.unwrap();
  assert!(s.get_assessment(job.id).await.unwrap().is_none());

  let mut draft = Assessment::draft(job.id, Utc::now());
  let section = draft.add_section();
  let question = draft.add_question(section).unwrap();
  {
    let q = draft.question_mut(section, question).unwrap();
    q.set_kind(QuestionKind::SingleChoice);
    q.set_options_text("Yes\nNo\n");
  }
  let saved = s.save_assessment(draft.clone()).await.unwrap();
  assert_eq!(saved.sections, draft.sections);

  // Switching kind keeps the options around.
  let mut edited = saved.clone();
  edited
    .question_mut(section, question)
    .unwrap()
    .set_kind(QuestionKind::ShortText);
  edited.created_at = Utc::now() + chrono::Duration::days(1);
  let resaved = s.save_assessment(edited).await.unwrap();

  assert_eq!(resaved.id, saved.id);
  assert_eq!(resaved.created_at, saved.created_at);
  let q = &resaved.sections[0].questions[0];
  assert_eq!(q.kind, QuestionKind::ShortText);
  assert_eq!(q.options.as_deref(), Some(&["Yes".to_owned(), "No".to_owned()][..]));
}

// ─── Fixtures and stats ──────────────────────────────────────────────────────

#[tokio::test]
async fn load_fixture_replaces_everything() {
  let s = store().await;
  s.create_job(new_job("Leftover", &[])).await.unwrap();
  assert_eq!(s.stats().await.unwrap().total_jobs, 1);

  seeded(&s, SeedConfig::default()).await;

  let stats = s.stats().await.unwrap();
  assert_eq!(stats.total_jobs, 25);
  assert_eq!(stats.total_candidates, 1000);
  assert!(stats.active_jobs <= 25);

  let leftover = s
    .list_jobs(&JobQuery { search: Some("Leftover".into()), ..JobQuery::default() })
    .await
    .unwrap();
  assert_eq!(leftover.pagination.total, 0);

  let values: Vec<_> = orders(&s).await.into_iter().map(|(_, o)| o).collect();
  assert_eq!(values, (0..25).collect::<Vec<_>>());
}

#[tokio::test]
async fn seeded_timelines_walk_the_funnel() {
  let s = store().await;
  seeded(&s, SeedConfig { jobs: 5, candidates: 40, assessments: 2 }).await;

  let page = s
    .list_candidates(&CandidateQuery {
      page: PageRequest::new(Some(1), Some(40)),
      ..CandidateQuery::default()
    })
    .await
    .unwrap();
  assert_eq!(page.data.len(), 40);
  for c in &page.data {
    let events = s.timeline(c.id).await.unwrap();
    assert_eq!(events.len(), c.stage.index() + 1);
    assert_eq!(events.last().map(|e| e.stage), Some(c.stage));
  }

  let hired = s.stats().await.unwrap().hired_candidates;
  let filtered = s
    .list_candidates(&CandidateQuery { stage: Some(Stage::Hired), ..CandidateQuery::default() })
    .await
    .unwrap();
  assert_eq!(filtered.pagination.total, hired);
}
