//! Fixture generation for a fresh board.
//!
//! Produces jobs, candidates with a timeline that walks the funnel up to
//! their current stage, and sample assessments for the first few jobs.

use chrono::{DateTime, Duration, Utc};
use rand::{Rng, seq::SliceRandom};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  assessment::{Assessment, Question, QuestionKind, Section},
  candidate::{Candidate, Stage, TimelineEvent},
  job::{Job, JobStatus, slugify},
};

const JOB_TITLES: [&str; 25] = [
  "Senior Backend Engineer",
  "Frontend Developer",
  "Site Reliability Engineer",
  "Data Engineer",
  "Product Designer",
  "Engineering Manager",
  "Security Analyst",
  "Mobile Developer",
  "Machine Learning Engineer",
  "QA Automation Engineer",
  "Technical Writer",
  "Solutions Architect",
  "Database Administrator",
  "DevOps Engineer",
  "Product Manager",
  "Customer Success Engineer",
  "Platform Engineer",
  "UX Researcher",
  "Embedded Systems Engineer",
  "Data Analyst",
  "Infrastructure Engineer",
  "Release Manager",
  "Support Engineer",
  "Network Engineer",
  "Developer Advocate",
];

const TAGS: [&str; 20] = [
  "Rust", "Go", "TypeScript", "Python", "Kubernetes", "AWS", "Postgres",
  "Remote", "Hybrid", "On-site", "Full-time", "Contract", "Senior", "Junior",
  "Lead", "Backend", "Frontend", "Security", "Data", "Mobile",
];

const FIRST_NAMES: [&str; 24] = [
  "Ada", "Alan", "Grace", "Linus", "Barbara", "Ken", "Margaret", "Dennis",
  "Frances", "Edsger", "Radia", "Donald", "Sophie", "Tim", "Hedy", "John",
  "Katherine", "Niklaus", "Shafi", "Leslie", "Anita", "Bjarne", "Karen",
  "Guido",
];

const LAST_NAMES: [&str; 24] = [
  "Lovelace", "Turing", "Hopper", "Torvalds", "Liskov", "Thompson", "Hamilton",
  "Ritchie", "Allen", "Dijkstra", "Perlman", "Knuth", "Wilson", "Berners-Lee",
  "Lamarr", "McCarthy", "Johnson", "Wirth", "Goldwasser", "Lamport", "Borg",
  "Stroustrup", "Jones", "Rossum",
];

const REQUIREMENTS: [&str; 4] = [
  "Proven experience in a similar role",
  "3+ years of professional experience",
  "Strong written and verbal communication",
  "Comfortable owning work end to end",
];

// ─── Configuration ───────────────────────────────────────────────────────────

/// How much fixture data to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
  pub jobs:        usize,
  pub candidates:  usize,
  /// Number of leading jobs that receive a sample assessment.
  pub assessments: usize,
}

impl Default for SeedConfig {
  fn default() -> Self { Self { jobs: 25, candidates: 1000, assessments: 3 } }
}

/// Everything [`crate::store::HiringStore::load_fixture`] writes.
#[derive(Debug, Clone, Default)]
pub struct SeedData {
  pub jobs:        Vec<Job>,
  pub candidates:  Vec<Candidate>,
  pub timeline:    Vec<TimelineEvent>,
  pub assessments: Vec<Assessment>,
}

// ─── Generation ──────────────────────────────────────────────────────────────

fn random_id(rng: &mut impl Rng) -> Uuid {
  uuid::Builder::from_random_bytes(rng.r#gen()).into_uuid()
}

/// Generate a fixture. Deterministic for a given `rng` state and `now`.
pub fn generate(
  config: &SeedConfig,
  rng: &mut impl Rng,
  now: DateTime<Utc>,
) -> SeedData {
  let jobs: Vec<Job> = (0..config.jobs).map(|i| seed_job(i, rng, now)).collect();

  let mut candidates = Vec::with_capacity(config.candidates);
  let mut timeline = Vec::new();
  if !jobs.is_empty() {
    for _ in 0..config.candidates {
      let job_id = jobs[rng.gen_range(0..jobs.len())].id;
      let candidate = seed_candidate(job_id, rng, now);
      timeline.extend(history_for(&candidate, rng));
      candidates.push(candidate);
    }
  }

  let assessments = jobs
    .iter()
    .take(config.assessments)
    .map(|job| sample_assessment(job, rng, now))
    .collect();

  SeedData { jobs, candidates, timeline, assessments }
}

fn seed_job(i: usize, rng: &mut impl Rng, now: DateTime<Utc>) -> Job {
  let base = JOB_TITLES[i % JOB_TITLES.len()];
  let round = i / JOB_TITLES.len();
  let title = if round == 0 {
    base.to_owned()
  } else {
    format!("{base} {}", round + 1)
  };

  let tag_count = rng.gen_range(1..=5);
  let tags = TAGS
    .choose_multiple(rng, tag_count)
    .map(|t| (*t).to_owned())
    .collect();

  Job {
    id: random_id(rng),
    slug: slugify(&title),
    status: if rng.gen_bool(0.7) {
      JobStatus::Active
    } else {
      JobStatus::Archived
    },
    tags,
    order: i as i64,
    description: Some(format!(
      "We are hiring a {title} to join a small team that ships often and \
       owns its work in production."
    )),
    requirements: Some(REQUIREMENTS.iter().map(|r| (*r).to_owned()).collect()),
    created_at: now - Duration::seconds(rng.gen_range(0..365 * 24 * 3600)),
    updated_at: now,
    title,
  }
}

fn seed_candidate(job_id: Uuid, rng: &mut impl Rng, now: DateTime<Utc>) -> Candidate {
  let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Ada");
  let last = LAST_NAMES.choose(rng).copied().unwrap_or("Lovelace");
  let stage = Stage::ALL[rng.gen_range(0..Stage::ALL.len())];

  // Leave room for one day per funnel step before `now`.
  let days_ago = rng.gen_range(Stage::ALL.len() as i64..90);
  let applied_at = now - Duration::days(days_ago) - Duration::seconds(rng.gen_range(0..86_400));

  Candidate {
    id: random_id(rng),
    name: format!("{first} {last}"),
    email: format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
    stage,
    job_id,
    applied_at,
    updated_at: now,
    notes: rng
      .gen_bool(0.3)
      .then(|| "Strong references from previous team".to_owned()),
  }
}

/// One event per funnel step up to and including the candidate's stage,
/// a day apart starting at `applied_at`.
fn history_for(candidate: &Candidate, rng: &mut impl Rng) -> Vec<TimelineEvent> {
  Stage::ALL[..=candidate.stage.index()]
    .iter()
    .enumerate()
    .map(|(i, &stage)| TimelineEvent {
      id: random_id(rng),
      candidate_id: candidate.id,
      stage,
      timestamp: candidate.applied_at + Duration::days(i as i64),
      note: None,
    })
    .collect()
}

fn question(
  rng: &mut impl Rng,
  kind: QuestionKind,
  text: &str,
  configure: impl FnOnce(&mut Question),
) -> Question {
  let mut q = Question {
    id: random_id(rng),
    kind,
    question: text.to_owned(),
    ..Question::new()
  };
  configure(&mut q);
  q
}

fn sample_assessment(job: &Job, rng: &mut impl Rng, now: DateTime<Utc>) -> Assessment {
  let experience = Section {
    id:        random_id(rng),
    title:     "Experience".into(),
    questions: vec![
      question(
        rng,
        QuestionKind::SingleChoice,
        "How many years of professional experience do you have?",
        |q| {
          q.options = Some(
            ["0-1 years", "2-3 years", "4-5 years", "6+ years"]
              .map(str::to_owned)
              .to_vec(),
          )
        },
      ),
      question(
        rng,
        QuestionKind::MultiChoice,
        "Which of these have you used in production?",
        |q| {
          q.options = Some(
            ["Rust", "Go", "TypeScript", "Python", "Kubernetes", "Postgres"]
              .map(str::to_owned)
              .to_vec(),
          )
        },
      ),
      question(
        rng,
        QuestionKind::ShortText,
        "Describe the project you are most proud of",
        |q| q.max_length = Some(500),
      ),
      question(
        rng,
        QuestionKind::LongText,
        "How would you approach an outage in a system you did not build?",
        |q| q.max_length = Some(1000),
      ),
      question(
        rng,
        QuestionKind::Numeric,
        "Rate your experience with distributed systems (1-10)",
        |q| {
          q.min = Some(1);
          q.max = Some(10);
        },
      ),
    ],
  };

  let collaboration = Section {
    id:        random_id(rng),
    title:     "Collaboration".into(),
    questions: vec![
      question(
        rng,
        QuestionKind::SingleChoice,
        "How do you prefer to receive feedback?",
        |q| {
          q.options = Some(
            ["In code review", "One-on-one", "In writing", "Whatever works"]
              .map(str::to_owned)
              .to_vec(),
          )
        },
      ),
      question(
        rng,
        QuestionKind::LongText,
        "Tell us about a disagreement with a teammate and how it resolved",
        |q| q.max_length = Some(800),
      ),
    ],
  };

  Assessment {
    id:         random_id(rng),
    job_id:     job.id,
    title:      format!("{} Assessment", job.title),
    sections:   vec![experience, collaboration],
    created_at: now,
    updated_at: now,
  }
}
