use chrono::NaiveDate;
use sheetbind::{
    CellValue, ExcelRecord, GroupTag, Resolver, ValueKind, discover, get_value, index_binding_of,
    title_binding_of,
};
use std::sync::Arc;

#[derive(ExcelRecord)]
struct Entity {
    #[excel(index = 0, title = "Id", order = -1)]
    id: i64,
    #[excel(title = "Created", order = 5)]
    created: NaiveDate,
    note: Option<String>,
}

#[derive(ExcelRecord, Default)]
#[excel(name = "Employee", default)]
struct EmployeeRow {
    #[excel(parent)]
    entity: Entity,
    #[excel(index = 1, title = "Name", groups("hr", "public"))]
    name: String,
    #[excel(index = 2, title = "Salary", groups("hr"))]
    salary: f64,
    #[excel(skip)]
    #[allow(dead_code)]
    scratch: Vec<u8>,
    note: Option<String>,
}

impl Default for Entity {
    fn default() -> Self {
        Self {
            id: 0,
            created: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            note: None,
        }
    }
}

#[derive(ExcelRecord)]
struct Untagged {
    a: u8,
    b: bool,
}

fn employee() -> EmployeeRow {
    EmployeeRow {
        entity: Entity {
            id: 7,
            created: NaiveDate::from_ymd_opt(2023, 5, 17).unwrap(),
            note: Some("from entity".into()),
        },
        name: "Ada".into(),
        salary: 1250.5,
        scratch: vec![1, 2, 3],
        note: None,
    }
}

#[test]
fn derived_type_is_built_once() {
    let a = EmployeeRow::record_type();
    let b = EmployeeRow::record_type();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.name(), "Employee");
    assert_eq!(a.parent().unwrap().name(), "Entity");
}

#[test]
fn discovery_walks_into_the_parent_field() {
    let container = discover(&EmployeeRow::record_type());
    let names: Vec<_> = container.fields().iter().map(|f| f.name().to_string()).collect();
    assert_eq!(names, ["name", "salary", "note", "id", "created", "note"]);
    assert!(container.field("scratch").is_none());
    assert!(container.field("entity").is_none());
    assert_eq!(container.field("salary").unwrap().kind(), ValueKind::Number);
    assert!(container.find("created").unwrap().kind().is_date());
}

#[test]
fn derived_bindings_span_both_levels() {
    let by_index = index_binding_of::<EmployeeRow>().unwrap();
    let indexed: Vec<_> = by_index.iter().map(|(i, f)| (i, f.name())).collect();
    assert_eq!(indexed, [(0, "id"), (1, "name"), (2, "salary")]);

    let by_title = title_binding_of::<EmployeeRow>().unwrap();
    assert_eq!(
        by_title.titles().collect::<Vec<_>>(),
        ["Created", "Id", "Name", "Salary"]
    );
}

#[test]
fn parent_values_read_from_the_derived_record() {
    let by_title = title_binding_of::<EmployeeRow>().unwrap();
    let row = employee();
    let read = |title: &str| get_value(Some(&row), Some(by_title.get(title).unwrap())).unwrap();

    assert_eq!(read("Id"), Some(CellValue::Int(7)));
    assert_eq!(
        read("Created"),
        Some(CellValue::Date(NaiveDate::from_ymd_opt(2023, 5, 17).unwrap()))
    );
    assert_eq!(read("Salary"), Some(CellValue::Number(1250.5)));

    let container = discover(&EmployeeRow::record_type());
    let own_note = container.field("note").unwrap();
    let parent_note = container.parent().unwrap().field("note").unwrap();
    assert_eq!(own_note.read(&row).unwrap(), CellValue::Empty);
    assert_eq!(
        parent_note.read(&row).unwrap(),
        CellValue::Text("from entity".into())
    );
}

#[test]
fn parent_descriptors_reject_the_parent_itself() {
    let container = discover(&EmployeeRow::record_type());
    let id = container.find("id").unwrap();
    let entity = Entity::default();
    assert!(id.read(&entity).is_err());
}

#[test]
fn groups_and_order_select_columns() {
    let record = EmployeeRow::record_type();
    let resolver = Resolver::new();

    let hr = resolver.select_fields(&record, &[GroupTag::from("hr")]);
    assert_eq!(hr.iter().map(|f| f.name()).collect::<Vec<_>>(), ["name", "salary"]);

    let all = resolver.select_fields(&record, &[]);
    let ordered: Vec<_> = all.iter().map(|f| f.name()).collect();
    assert_eq!(ordered, ["id", "name", "salary", "note", "note", "created"]);
}

#[test]
fn untagged_struct_binds_by_position() {
    let by_index = index_binding_of::<Untagged>().unwrap();
    assert_eq!(
        by_index.iter().map(|(i, f)| (i, f.name())).collect::<Vec<_>>(),
        [(0, "a"), (1, "b")]
    );
    assert!(title_binding_of::<Untagged>().is_err());
    let row = Untagged { a: 3, b: true };
    assert_eq!(
        by_index.get(1).unwrap().read(&row).unwrap(),
        CellValue::Boolean(true)
    );
    assert_eq!(row.a, 3);
}

#[test]
fn default_container_attribute_registers_a_constructor() {
    let record = EmployeeRow::record_type();
    assert!(record.is_instantiable());
    let fresh = record.new_instance().unwrap();
    let fresh = fresh.downcast_ref::<EmployeeRow>().unwrap();
    assert_eq!(fresh.name, "");
    assert!(!Untagged::record_type().is_instantiable());
}

#[derive(ExcelRecord)]
struct Ledger {
    #[excel(index = -1, title = "Hidden")]
    hidden: String,
    #[excel(index = 0, title = "Shown")]
    shown: String,
}

#[test]
fn negative_derived_index_binds_by_title_only() {
    let by_index = index_binding_of::<Ledger>().unwrap();
    assert_eq!(by_index.indices().collect::<Vec<_>>(), [0]);
    assert_eq!(by_index.get(0).unwrap().name(), "shown");

    let by_title = title_binding_of::<Ledger>().unwrap();
    assert_eq!(by_title.titles().collect::<Vec<_>>(), ["Hidden", "Shown"]);
    let row = Ledger {
        hidden: "h".into(),
        shown: "s".into(),
    };
    assert_eq!(
        by_title.get("Hidden").unwrap().read(&row).unwrap(),
        CellValue::Text("h".into())
    );
    assert_eq!(row.shown, "s");
}

#[derive(ExcelRecord)]
struct Split {
    #[excel(index = 1)]
    #[excel(title = "Amount", order = 2)]
    amount: i32,
    #[excel(skip)]
    #[excel(skip)]
    #[allow(dead_code)]
    cache: Vec<u8>,
    #[excel]
    label: String,
}

#[test]
fn attributes_merge_and_skip_holds() {
    let container = discover(&Split::record_type());
    let names: Vec<_> = container.fields().iter().map(|f| f.name().to_string()).collect();
    assert_eq!(names, ["amount", "label"]);

    let amount = container.field("amount").unwrap().column().unwrap();
    assert_eq!(amount.column_index(), Some(1));
    assert_eq!(amount.column_title(), Some("Amount"));
    assert_eq!(amount.order, 2);

    let label = container.field("label").unwrap().column().unwrap();
    assert_eq!(label.column_index(), None);
    assert_eq!(label.column_title(), None);

    let by_index = index_binding_of::<Split>().unwrap();
    assert_eq!(by_index.indices().collect::<Vec<_>>(), [1]);
    let row = Split {
        amount: 4,
        cache: Vec::new(),
        label: "x".into(),
    };
    assert_eq!(row.label, "x");
}
