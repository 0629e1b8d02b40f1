use chrono::{NaiveDate, NaiveTime};
use sheetbind_common::{CellValue, ToCellValue, ValueKind};

#[test]
fn numeric_kinds_cover_integers_and_floats() {
    for kind in [
        <i32 as ToCellValue>::KIND,
        <u64 as ToCellValue>::KIND,
        <f32 as ToCellValue>::KIND,
    ] {
        assert!(kind.is_number(), "{kind} should be numeric");
        assert!(!kind.is_bool());
        assert!(!kind.is_date());
    }
}

#[test]
fn boolean_and_date_predicates() {
    assert!(<bool as ToCellValue>::KIND.is_bool());
    assert!(<NaiveDate as ToCellValue>::KIND.is_date());
    assert!(ValueKind::DateTime.is_date());
    assert!(!<NaiveTime as ToCellValue>::KIND.is_date());
    assert!(!<String as ToCellValue>::KIND.is_number());
}

#[test]
fn values_render_like_cells() {
    let d = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    assert_eq!(d.to_cell_value().to_string(), "2024-03-01");
    assert_eq!(CellValue::Int(3).to_string(), "3");
    assert_eq!(CellValue::Text("x".into()).kind(), ValueKind::Text);
    assert!(CellValue::Empty.is_empty());
}
