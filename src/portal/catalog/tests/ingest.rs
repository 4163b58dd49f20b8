use std::io::Cursor;

use crate::portal::catalog::domain::{Category, EducationLevel, EntryKind, Gender};
use crate::portal::catalog::ingest::{drafts_from_reader, CatalogImportError};

const HEADER: &str = "kind,title,description,benefits,application_process,category,gender,state,education,income,marital_status,occupation,disability,age_min,age_max,last_date,active\n";

fn parse(rows: &str) -> Result<Vec<crate::portal::catalog::EntryDraft>, CatalogImportError> {
    drafts_from_reader(Cursor::new(format!("{HEADER}{rows}")))
}

#[test]
fn parses_pipe_separated_cells_into_rule_sets() {
    let drafts = parse(
        "scholarship,National Merit,Merit award,,,general|obc,male|female,Jharkhand,graduate,,,,,18,25,,true\n",
    )
    .expect("seed parses");

    assert_eq!(drafts.len(), 1);
    let draft = &drafts[0];
    assert_eq!(draft.kind, EntryKind::Scholarship);
    assert_eq!(draft.title, "National Merit");
    assert_eq!(
        draft.eligibility.category,
        vec![Category::General, Category::Obc]
    );
    assert_eq!(draft.eligibility.gender, vec![Gender::Male, Gender::Female]);
    assert_eq!(draft.eligibility.state, vec!["Jharkhand"]);
    assert_eq!(draft.eligibility.education, vec![EducationLevel::Graduate]);
    assert_eq!(draft.eligibility.age_min, Some(18));
    assert_eq!(draft.eligibility.age_max, Some(25));
    assert!(draft.is_active);
}

#[test]
fn blank_cells_leave_criteria_unrestricted() {
    let drafts = parse("scheme,Open Scheme,Everyone welcome,,,,,,,,,,,,,,\n").expect("seed parses");

    assert_eq!(drafts.len(), 1);
    assert!(drafts[0].eligibility.is_unrestricted());
    assert!(drafts[0].is_active, "missing active flag defaults to true");
}

#[test]
fn inactive_rows_parse_with_explicit_flag() {
    let drafts =
        parse("scholarship,Closed Award,No longer offered,,,sc|st|ews,,Jharkhand,,,,,,17,28,,false\n")
            .expect("seed parses");

    assert!(!drafts[0].is_active);
    assert_eq!(
        drafts[0].eligibility.category,
        vec![Category::Sc, Category::St, Category::Ews]
    );
}

#[test]
fn unknown_labels_are_rejected_with_the_row_number() {
    let result = parse(
        "scheme,Fine,Fine description,,,,,,,,,,,,,,\nscheme,Broken,Bad category,,,brahmin,,,,,,,,,,,\n",
    );

    match result {
        Err(CatalogImportError::Row { row, message }) => {
            assert_eq!(row, 3);
            assert!(message.contains("brahmin"), "message: {message}");
        }
        other => panic!("expected row error, got {other:?}"),
    }
}

#[test]
fn inverted_age_windows_are_rejected() {
    let result = parse("scheme,Backwards,Window inverted,,,,,,,,,,,30,20,,\n");

    match result {
        Err(CatalogImportError::Row { row, message }) => {
            assert_eq!(row, 2);
            assert!(message.contains("inverted"), "message: {message}");
        }
        other => panic!("expected row error, got {other:?}"),
    }
}

#[test]
fn last_date_must_be_iso_formatted() {
    let result = parse("scheme,Dated,Has a deadline,,,,,,,,,,,,,31-12-2025,\n");
    assert!(matches!(result, Err(CatalogImportError::Row { row: 2, .. })));

    let drafts =
        parse("scheme,Dated,Has a deadline,,,,,,,,,,,,,2025-12-31,\n").expect("seed parses");
    assert!(drafts[0].last_date.is_some());
}
