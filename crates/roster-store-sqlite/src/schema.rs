//! SQL schema for the Roster SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- sort_order is kept duplicate-free by the store, not by a UNIQUE
-- constraint: a reorder shifts a range in one UPDATE and SQLite checks
-- uniqueness row by row.
CREATE TABLE IF NOT EXISTS jobs (
    job_id       TEXT PRIMARY KEY,
    title        TEXT NOT NULL,
    slug         TEXT NOT NULL,
    status       TEXT NOT NULL,            -- 'active' | 'archived'
    tags         TEXT NOT NULL DEFAULT '[]',
    sort_order   INTEGER NOT NULL,
    description  TEXT,
    requirements TEXT,                     -- JSON array or NULL
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

-- job_id is a back-reference only; deleting a job leaves its candidates.
CREATE TABLE IF NOT EXISTS candidates (
    candidate_id TEXT PRIMARY KEY,
    name         TEXT NOT NULL,
    email        TEXT NOT NULL,
    stage        TEXT NOT NULL,
    job_id       TEXT NOT NULL,
    applied_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL,
    notes        TEXT
);

-- Strictly append-only.
-- No UPDATE or DELETE is ever issued against this table outside of seeding.
CREATE TABLE IF NOT EXISTS candidate_timeline (
    event_id     TEXT PRIMARY KEY,
    candidate_id TEXT NOT NULL REFERENCES candidates(candidate_id),
    stage        TEXT NOT NULL,
    recorded_at  TEXT NOT NULL,
    note         TEXT
);

CREATE TABLE IF NOT EXISTS assessments (
    assessment_id TEXT PRIMARY KEY,
    job_id        TEXT NOT NULL UNIQUE,
    title         TEXT NOT NULL,
    sections_json TEXT NOT NULL,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS assessment_responses (
    response_id   TEXT PRIMARY KEY,
    assessment_id TEXT NOT NULL,
    candidate_id  TEXT NOT NULL,
    answers_json  TEXT NOT NULL,
    submitted_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS jobs_order_idx          ON jobs(sort_order);
CREATE INDEX IF NOT EXISTS candidates_job_idx      ON candidates(job_id);
CREATE INDEX IF NOT EXISTS candidates_stage_idx    ON candidates(stage);
CREATE INDEX IF NOT EXISTS timeline_candidate_idx  ON candidate_timeline(candidate_id);

PRAGMA user_version = 1;
";
