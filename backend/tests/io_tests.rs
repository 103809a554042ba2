//! CSV catalog in, overlap table out.

use std::fs;
use std::path::Path;

use section_overlap::algorithms::DetectionOptions;
use section_overlap::db::{self, LocalRepository};
use section_overlap::io::{export_overlaps, load_catalog, write_table, ExportError};

const SECTIONS: &str = "\
course_id,sec_id,semester,year,building,room_number,time_slot_id
CPSC-237,002,Fall,2017,Watson,120,A
CPSC-240,001,Fall,2017,Taylor,3128,B
MATH-101,001,Fall,2017,Painter,514,C
PHYS-150,001,Fall,2017,,,
";

const TIME_SLOTS: &str = "\
time_slot_id,day,start_hr,start_min,end_hr,end_min
A,M,9,0,10,15
A,W,9,0,10,15
B,W,10,0,10,45
C,M,8,0,9,0
";

fn write_inputs(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let sections = dir.join("section.csv");
    let time_slots = dir.join("time_slot.csv");
    fs::write(&sections, SECTIONS).unwrap();
    fs::write(&time_slots, TIME_SLOTS).unwrap();
    (sections, time_slots)
}

#[tokio::test]
async fn test_csv_catalog_to_exported_table() {
    let dir = tempfile::tempdir().unwrap();
    let (sections, time_slots) = write_inputs(dir.path());

    let catalog = load_catalog(&sections, &time_slots).unwrap();
    assert_eq!(catalog.sections.len(), 4);
    let repo = LocalRepository::with_catalog(catalog);

    let outcome = db::ensure_computed(&repo, &DetectionOptions::default())
        .await
        .unwrap();
    assert_eq!(outcome.record().pair_count, 1);

    let pairs = db::fetch_overlaps(&repo).await.unwrap();
    let output = dir.path().join("overlapping_sections.csv");
    assert_eq!(export_overlaps(&output, &pairs).unwrap(), 1);

    let text = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "day,course_id_1,sec_id_1,year_1,semester_1,course_id_2,sec_id_2,year_2,semester_2,overlap_time_start,overlap_time_end",
            "W,CPSC-237,002,2017,Fall,CPSC-240,001,2017,Fall,10:00,10:15",
        ]
    );
}

#[test]
fn test_empty_relation_exports_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("overlapping_sections.csv");

    assert_eq!(export_overlaps(&output, &[]).unwrap(), 0);
    let text = fs::read_to_string(&output).unwrap();
    assert_eq!(text.lines().count(), 1);
    assert!(text.starts_with("day,course_id_1,"));
}

#[test]
fn test_export_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("no/such/dir/out.csv");

    let err = export_overlaps(&output, &[]).unwrap_err();
    assert!(matches!(err, ExportError::Io(_)));
    assert!(!output.exists());
}

#[test]
fn test_ragged_rows_are_rejected() {
    let rows = vec![vec!["M", "10:00"], vec!["T"]];
    let err = write_table(Vec::new(), &["day", "start"], rows).unwrap_err();
    assert!(matches!(
        err,
        ExportError::SchemaMismatch {
            row: 2,
            expected: 2,
            found: 1
        }
    ));
}

#[test]
fn test_missing_input_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let (sections, _) = write_inputs(dir.path());

    let err = load_catalog(&sections, dir.path().join("absent.csv")).unwrap_err();
    assert!(format!("{err:#}").contains("absent.csv"));
}

#[test]
fn test_malformed_input_row_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let (sections, time_slots) = write_inputs(dir.path());
    fs::write(
        &time_slots,
        "time_slot_id,day,start_hr,start_min,end_hr,end_min\nA,M,nine,0,10,15\n",
    )
    .unwrap();

    let err = load_catalog(&sections, &time_slots).unwrap_err();
    assert!(format!("{err:#}").contains("line 2"));
}
