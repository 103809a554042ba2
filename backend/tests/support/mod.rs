#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use section_overlap::db::{
    CatalogRepository, FullRepository, MaterializationRecord, OverlapBatch, OverlapRepository,
    RepositoryResult,
};
use section_overlap::models::{
    Catalog, OverlapPair, ScheduledInterval, SectionKey, SectionRow, Term, TimeSlotRow, Weekday,
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores variables on unwind and serializes access to process-global env
/// vars, since tests in one binary run in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

// ==================== Fixtures ====================

pub fn key(course: &str, section: &str) -> SectionKey {
    SectionKey::new(course, section, 2017, Term::Fall).unwrap()
}

pub fn key_in(course: &str, section: &str, year: i32, term: Term) -> SectionKey {
    SectionKey::new(course, section, year, term).unwrap()
}

/// Fall 2017 interval for `course`-`section`.
pub fn interval(course: &str, section: &str, day: Weekday, start: u16, end: u16) -> ScheduledInterval {
    ScheduledInterval::new(key(course, section), day, start, end).unwrap()
}

pub fn section(course: &str, sec: &str, semester: &str, year: i32, slot: &str) -> SectionRow {
    SectionRow {
        course_id: course.to_string(),
        sec_id: sec.to_string(),
        semester: semester.to_string(),
        year,
        building: None,
        room_number: None,
        time_slot_id: Some(slot.to_string()),
    }
}

pub fn slot(id: &str, day: &str, start: (i32, i32), end: (i32, i32)) -> TimeSlotRow {
    TimeSlotRow {
        time_slot_id: id.to_string(),
        day: day.to_string(),
        start_hr: start.0,
        start_min: start.1,
        end_hr: end.0,
        end_min: end.1,
    }
}

/// Small catalog producing exactly three overlap rows:
/// - CPSC-237-002 and CPSC-240-001 on M and on W, 10:00-10:15
/// - HIST-101-001 and MATH-201-001 on T, 13:30-14:00
///
/// MATH-101-001 touches CPSC-237-002 without overlapping, and the Spring
/// section shares a slot with a Fall one.
pub fn university_catalog() -> Catalog {
    Catalog::new(
        vec![
            section("CPSC-237", "002", "Fall", 2017, "A"),
            section("CPSC-240", "001", "Fall", 2017, "B"),
            section("MATH-101", "001", "Fall", 2017, "C"),
            section("HIST-101", "001", "Fall", 2017, "D"),
            section("MATH-201", "001", "Fall", 2017, "E"),
            section("CPSC-240", "001", "Spring", 2018, "A"),
        ],
        vec![
            slot("A", "M", (9, 0), (10, 15)),
            slot("A", "W", (9, 0), (10, 15)),
            slot("B", "M", (10, 0), (10, 45)),
            slot("B", "W", (10, 0), (10, 45)),
            slot("C", "M", (8, 0), (9, 0)),
            slot("D", "T", (13, 0), (14, 0)),
            slot("E", "T", (13, 30), (14, 45)),
        ],
    )
}

// ==================== Repository wrappers ====================

/// Reports the relation as missing no matter what, which is what a run sees
/// when another run populates the relation right after its status check.
pub struct StaleStatus<R: ?Sized>(pub Arc<R>);

#[async_trait]
impl<R: FullRepository + ?Sized> CatalogRepository for StaleStatus<R> {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.0.health_check().await
    }

    async fn load_scheduled_intervals(&self) -> RepositoryResult<Vec<ScheduledInterval>> {
        self.0.load_scheduled_intervals().await
    }
}

#[async_trait]
impl<R: FullRepository + ?Sized> OverlapRepository for StaleStatus<R> {
    async fn materialization_status(&self) -> RepositoryResult<Option<MaterializationRecord>> {
        Ok(None)
    }

    async fn persist_overlaps(
        &self,
        batch: &OverlapBatch,
    ) -> RepositoryResult<MaterializationRecord> {
        self.0.persist_overlaps(batch).await
    }

    async fn fetch_overlaps(&self) -> RepositoryResult<Vec<OverlapPair>> {
        self.0.fetch_overlaps().await
    }

    async fn clear_overlaps(&self) -> RepositoryResult<usize> {
        self.0.clear_overlaps().await
    }
}
