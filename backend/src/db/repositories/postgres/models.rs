use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{Integer, Text};

use super::schema::{overlap_materializations, overlapping_sections};
use crate::db::models::MaterializationRecord;
use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult};
use crate::models::{
    parse_hhmm, IntervalError, OverlapPair, ScheduledInterval, SectionKey, Term, Weekday,
};

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = overlapping_sections)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OverlapRow {
    pub day: String,
    pub course_id_1: String,
    pub sec_id_1: String,
    pub year_1: i32,
    pub semester_1: String,
    pub course_id_2: String,
    pub sec_id_2: String,
    pub year_2: i32,
    pub semester_2: String,
    pub overlap_time_start: String,
    pub overlap_time_end: String,
}

impl From<&OverlapPair> for OverlapRow {
    fn from(pair: &OverlapPair) -> Self {
        Self {
            day: pair.day.code().to_string(),
            course_id_1: pair.interval_a.course_id().to_string(),
            sec_id_1: pair.interval_a.section_id().to_string(),
            year_1: pair.interval_a.year(),
            semester_1: pair.interval_a.term().as_str().to_string(),
            course_id_2: pair.interval_b.course_id().to_string(),
            sec_id_2: pair.interval_b.section_id().to_string(),
            year_2: pair.interval_b.year(),
            semester_2: pair.interval_b.term().as_str().to_string(),
            overlap_time_start: pair.overlap_start(),
            overlap_time_end: pair.overlap_end(),
        }
    }
}

impl OverlapRow {
    pub fn into_pair(self) -> Result<OverlapPair, IntervalError> {
        let day: Weekday = self.day.parse()?;
        let term_a: Term = self.semester_1.parse()?;
        let term_b: Term = self.semester_2.parse()?;
        let interval_a = SectionKey::new(self.course_id_1, self.sec_id_1, self.year_1, term_a)?;
        let interval_b = SectionKey::new(self.course_id_2, self.sec_id_2, self.year_2, term_b)?;
        Ok(OverlapPair {
            day,
            year: self.year_1,
            term: term_a,
            interval_a,
            interval_b,
            overlap_start_minute: parse_hhmm(&self.overlap_time_start)?,
            overlap_end_minute: parse_hhmm(&self.overlap_time_end)?,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = overlap_materializations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MaterializationRow {
    pub scope: String,
    pub input_checksum: String,
    pub interval_count: i32,
    pub pair_count: i32,
    pub strategy: String,
    pub materialized_at: DateTime<Utc>,
}

fn count_to_i32(value: usize, field: &str) -> RepositoryResult<i32> {
    i32::try_from(value).map_err(|_| {
        RepositoryError::validation_with_context(
            format!("{} {} does not fit an INTEGER column", field, value),
            ErrorContext::new("persist_overlaps").with_entity("overlap_materializations"),
        )
    })
}

impl MaterializationRow {
    pub fn from_record(record: &MaterializationRecord) -> RepositoryResult<Self> {
        Ok(Self {
            scope: record.scope.clone(),
            input_checksum: record.input_checksum.clone(),
            interval_count: count_to_i32(record.interval_count, "interval_count")?,
            pair_count: count_to_i32(record.pair_count, "pair_count")?,
            strategy: record.strategy.as_str().to_string(),
            materialized_at: record.materialized_at,
        })
    }

    pub fn into_record(self) -> RepositoryResult<MaterializationRecord> {
        let strategy = self.strategy.parse().map_err(|e: String| {
            RepositoryError::internal_with_context(
                e,
                ErrorContext::new("materialization_status")
                    .with_entity("overlap_materializations")
                    .with_entity_id(&self.scope),
            )
        })?;
        Ok(MaterializationRecord {
            scope: self.scope,
            input_checksum: self.input_checksum,
            interval_count: self.interval_count.max(0) as usize,
            pair_count: self.pair_count.max(0) as usize,
            strategy,
            materialized_at: self.materialized_at,
        })
    }
}

/// One meeting occurrence from `section JOIN time_slot`.
///
/// The source keeps years and clock parts as NUMERIC; the query casts them
/// to integers.
#[derive(Debug, Clone, QueryableByName)]
pub struct IntervalSourceRow {
    #[diesel(sql_type = Text)]
    pub course_id: String,
    #[diesel(sql_type = Text)]
    pub sec_id: String,
    #[diesel(sql_type = Text)]
    pub semester: String,
    #[diesel(sql_type = Integer)]
    pub year: i32,
    #[diesel(sql_type = Text)]
    pub day: String,
    #[diesel(sql_type = Integer)]
    pub start_hr: i32,
    #[diesel(sql_type = Integer)]
    pub start_min: i32,
    #[diesel(sql_type = Integer)]
    pub end_hr: i32,
    #[diesel(sql_type = Integer)]
    pub end_min: i32,
}

impl IntervalSourceRow {
    pub fn into_interval(self) -> Result<ScheduledInterval, IntervalError> {
        let term: Term = self.semester.parse()?;
        let key = SectionKey::new(self.course_id, self.sec_id, self.year, term)?;
        let day: Weekday = self.day.parse()?;
        ScheduledInterval::from_clock(
            key,
            day,
            self.start_hr,
            self.start_min,
            self.end_hr,
            self.end_min,
        )
    }
}
