//! # Record mapping integration tests
//!
//! Rows come from the in-memory scanner; destination records are declared
//! with `#[derive(Record)]`.

use rowmap_api::{HasShape, MemoryScanner, Record, Row, ScanError, Shape, Value};
use rowmap_engine::{
    scan_row, MapError, Mapped, MappedRow, MappingConfig, RecordMapper, RowMapper, Semantics,
    StructMapper,
};

#[derive(Debug, Default, Clone, PartialEq, Record)]
struct User {
    id: i64,
    #[column(name = "user_name")]
    name: String,
    email: Option<String>,
    #[column(value_map = "1:ACTIVE,0:INACTIVE")]
    status: String,
    #[column(skip)]
    cached: bool,
}

#[derive(Debug, Default, PartialEq, Record)]
struct Flags {
    #[column(value_map = "Y:true,N:false")]
    enabled: bool,
    #[column(name = "tier", value_map = "gold:3,silver:2")]
    level: Option<u8>,
}

#[derive(Debug, Default, PartialEq, Record)]
struct Keyword {
    r#type: String,
}

fn user_row(status: Value<'static>) -> MemoryScanner {
    MemoryScanner::single(
        ["id", "user_name", "email", "status"],
        vec![
            Value::Int64(1),
            Value::text("alice"),
            Value::text("alice@example.com"),
            status,
        ],
    )
}

fn map_user(scanner: &mut MemoryScanner) -> Result<User, MapError> {
    let mapper = StructMapper::<User>::new(Semantics::Value)?;
    mapper.map(scanner).map(Mapped::into_inner)
}

#[test]
fn direct_fields_round_trip() {
    #[derive(Debug, Default, PartialEq, Record)]
    struct Plain {
        id: i64,
        score: f64,
        label: String,
        note: Option<String>,
        raw: Vec<u8>,
    }

    let mut scanner = MemoryScanner::single(
        ["id", "score", "label", "note", "raw"],
        vec![
            Value::Int64(42),
            Value::Float64(9.5),
            Value::text("x"),
            Value::Null,
            Value::bytes(vec![0u8, 159, 146, 150]),
        ],
    );
    let mapper = StructMapper::<Plain>::new(Semantics::Value).unwrap();
    let plain = mapper.map(&mut scanner).unwrap().into_inner();

    assert_eq!(
        plain,
        Plain {
            id: 42,
            score: 9.5,
            label: "x".into(),
            note: None,
            raw: vec![0, 159, 146, 150],
        }
    );
}

#[test]
fn translated_field_maps_value() {
    let user = map_user(&mut user_row(Value::text("1"))).unwrap();
    assert_eq!(
        user,
        User {
            id: 1,
            name: "alice".into(),
            email: Some("alice@example.com".into()),
            status: "ACTIVE".into(),
            cached: false,
        }
    );

    let user = map_user(&mut user_row(Value::text("0"))).unwrap();
    assert_eq!(user.status, "INACTIVE");
}

#[test]
fn bytes_translate_like_text() {
    let from_bytes = map_user(&mut user_row(Value::bytes(b"1".to_vec()))).unwrap();
    let from_text = map_user(&mut user_row(Value::text("1"))).unwrap();
    assert_eq!(from_bytes, from_text);
}

#[test]
fn translation_miss_reports_value_and_keys() {
    let err = map_user(&mut user_row(Value::text("2"))).unwrap_err();
    match &err {
        MapError::TranslationMiss { field, value, valid_keys } => {
            assert_eq!(field, "status");
            assert_eq!(value, "2");
            assert_eq!(valid_keys, &vec!["1".to_string(), "0".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "failed to map status: no value mapping for '2', want one of [1,0]"
    );
}

#[test]
fn null_translated_value_needs_optional_field() {
    let err = map_user(&mut user_row(Value::Null)).unwrap_err();
    assert!(matches!(err, MapError::CannotAssignNil(ref field) if field == "status"));

    // `level` is optional: a null tier leaves it empty.
    let mut scanner = MemoryScanner::single(
        ["enabled", "tier"],
        vec![Value::text("Y"), Value::Null],
    );
    let mapper = StructMapper::<Flags>::new(Semantics::Value).unwrap();
    let flags = mapper.map(&mut scanner).unwrap().into_inner();
    assert_eq!(flags, Flags { enabled: true, level: None });
}

#[test]
fn null_resets_preset_optional_fields_alike() {
    #[derive(Debug, PartialEq, Record)]
    struct WithDefaults {
        #[column(value_map = "g:3")]
        tier: Option<u8>,
        plain: Option<u8>,
    }

    impl Default for WithDefaults {
        fn default() -> Self {
            Self {
                tier: Some(1),
                plain: Some(1),
            }
        }
    }

    let mut scanner = MemoryScanner::single(["tier", "plain"], vec![Value::Null, Value::Null]);
    let mapper = StructMapper::<WithDefaults>::new(Semantics::Value).unwrap();
    let mapped = mapper.map(&mut scanner).unwrap().into_inner();
    assert_eq!(
        mapped,
        WithDefaults {
            tier: None,
            plain: None
        }
    );
}

#[test]
fn translated_text_converts_to_field_type() {
    let mut scanner = MemoryScanner::single(
        ["ENABLED", "Tier"],
        vec![Value::text("N"), Value::bytes(b"gold".to_vec())],
    );
    let mapper = StructMapper::<Flags>::new(Semantics::Value).unwrap();
    let flags = mapper.map(&mut scanner).unwrap().into_inner();
    assert_eq!(flags, Flags { enabled: false, level: Some(3) });
}

#[test]
fn unmapped_column_is_named() {
    let mut scanner = MemoryScanner::single(
        ["id", "user_name", "nickname"],
        vec![Value::Int64(1), Value::text("a"), Value::text("b")],
    );
    let err = map_user(&mut scanner).unwrap_err();
    assert!(matches!(err, MapError::UnmappedColumn(ref c) if c == "nickname"));
    assert_eq!(err.to_string(), "unable to map column 'nickname' to the result");
}

#[test]
fn columns_match_case_insensitively() {
    let mut scanner = MemoryScanner::single(
        ["ID", "User_Name", "Status"],
        vec![Value::Int64(5), Value::text("bob"), Value::Int64(0)],
    );
    let user = map_user(&mut scanner).unwrap();
    assert_eq!((user.id, user.name.as_str(), user.status.as_str()), (5, "bob", "INACTIVE"));
    assert_eq!(user.email, None);
}

#[test]
fn duplicate_column_for_one_field() {
    let mut scanner = MemoryScanner::single(["id", "ID"], vec![Value::Int64(1), Value::Int64(2)]);
    let err = map_user(&mut scanner).unwrap_err();
    assert!(matches!(err, MapError::DuplicateColumn(ref c) if c == "ID"));
}

#[test]
fn scan_failure_propagates() {
    let mut scanner = MemoryScanner::single(["id"], vec![Value::text("not a number")]);
    let err = map_user(&mut scanner).unwrap_err();
    match err {
        MapError::Scan(ScanError::Convert { column, source }) => {
            assert_eq!(column, "id");
            assert_eq!(source.target, "i64");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn raw_identifier_field_uses_unraw_name() {
    assert_eq!(Keyword::fields()[0].column, "type");
    let mut scanner = MemoryScanner::single(["TYPE"], vec![Value::text("fn")]);
    let mapper = StructMapper::<Keyword>::new(Semantics::Value).unwrap();
    assert_eq!(mapper.map(&mut scanner).unwrap().r#type, "fn");
}

#[test]
fn derive_emits_shape_and_field_specs() {
    assert_eq!(User::shape(), Shape::Record(std::any::type_name::<User>()));
    let columns: Vec<_> = User::fields().iter().map(|f| f.column).collect();
    assert_eq!(columns, vec!["id", "user_name", "email", "status"]);
    assert_eq!(User::fields()[3].value_map, Some("1:ACTIVE,0:INACTIVE"));

    let mut user = User::default();
    assert_eq!(user.slots().len(), 4);
}

#[test]
fn factory_value_and_reference_records() {
    let by_value = RecordMapper::<User>::for_type::<User>().unwrap();
    let by_ref = RecordMapper::<User>::for_type::<Box<User>>().unwrap();
    assert_eq!(by_value.semantics(), Semantics::Value);
    assert_eq!(by_ref.semantics(), Semantics::Reference);

    let value_row = by_value.map(&mut user_row(Value::text("1"))).unwrap();
    let ref_row = by_ref.map(&mut user_row(Value::text("1"))).unwrap();

    let value_record = value_row.into_record().unwrap();
    let ref_record = ref_row.into_record().unwrap();
    assert!(matches!(value_record, Mapped::Value(_)));
    assert!(matches!(ref_record, Mapped::Reference(_)));
    assert_eq!(*value_record, *ref_record);
}

#[test]
fn factory_columnar_destinations() {
    let mapper = RecordMapper::<User>::for_type::<Vec<Value<'static>>>().unwrap();
    assert!(matches!(mapper, RecordMapper::Columnar(_)));

    // Columnar output ignores record metadata entirely.
    let mut scanner = MemoryScanner::single(
        ["anything", "at_all"],
        vec![Value::bytes(b"v".to_vec()), Value::Int64(2)],
    );
    let row = mapper.map(&mut scanner).unwrap();
    assert_eq!(
        row,
        MappedRow::Values(Mapped::Value(vec![Value::text("v"), Value::Int64(2)]))
    );

    let boxed = RecordMapper::<()>::for_type::<Box<Row>>().unwrap();
    let row = boxed.map(&mut scanner).unwrap().into_values().unwrap();
    assert!(row.is_reference());
    assert_eq!(row.len(), 2);
}

#[test]
fn factory_rejects_unsupported_shapes() {
    for shape in [
        Shape::of::<i64>(),
        Shape::of::<String>(),
        Shape::of::<Box<Box<User>>>(),
        Shape::Record("Other"),
    ] {
        let err = RecordMapper::<User>::new(&shape).err().unwrap();
        assert!(
            matches!(err, MapError::UnsupportedDestination(ref s) if *s == shape),
            "{shape}"
        );
    }
    let err = RecordMapper::<User>::for_type::<u8>().err().unwrap();
    assert_eq!(err.to_string(), "unsupported destination: scalar u8");
}

mod billing {
    use rowmap_api::Record;

    #[derive(Debug, Default, Record)]
    pub struct User {
        pub id: i64,
    }
}

#[test]
fn factory_tells_same_named_records_apart() {
    assert_ne!(billing::User::shape(), User::shape());
    let err = RecordMapper::<User>::new(&billing::User::shape()).err().unwrap();
    assert!(matches!(err, MapError::UnsupportedDestination(_)));
    assert!(RecordMapper::<billing::User>::for_type::<billing::User>().is_ok());
}

#[test]
fn factory_if_needed_keeps_existing() {
    let existing = RecordMapper::<User>::for_type::<Box<User>>().unwrap();
    let kept = RecordMapper::if_needed(Some(existing), &Shape::of::<User>()).unwrap();
    assert_eq!(kept.semantics(), Semantics::Reference);

    let built = RecordMapper::<User>::if_needed(None, &Shape::of::<User>()).unwrap();
    assert_eq!(built.semantics(), Semantics::Value);
}

#[test]
fn map_all_maps_rows_in_order() {
    let mut rows = MemoryScanner::new(["id", "user_name", "status"])
        .with_row(vec![Value::Int64(1), Value::text("a"), Value::text("1")])
        .with_row(vec![Value::Int64(2), Value::text("b"), Value::text("0")]);
    let mapper = StructMapper::<User>::new(Semantics::Value).unwrap();

    let users: Vec<User> = mapper
        .map_all(&mut rows)
        .unwrap()
        .into_iter()
        .map(Mapped::into_inner)
        .collect();
    assert_eq!(users.len(), 2);
    assert_eq!((users[0].id, users[0].status.as_str()), (1, "ACTIVE"));
    assert_eq!((users[1].id, users[1].status.as_str()), (2, "INACTIVE"));
}

#[test]
fn map_all_stops_at_first_bad_row() {
    let mut rows = MemoryScanner::new(["id", "status"])
        .with_row(vec![Value::Int64(1), Value::text("1")])
        .with_row(vec![Value::Int64(2), Value::text("9")])
        .with_row(vec![Value::Int64(3), Value::text("0")]);
    let mapper = StructMapper::<User>::new(Semantics::Value).unwrap();

    let err = mapper.map_all(&mut rows).unwrap_err();
    assert!(matches!(err, MapError::TranslationMiss { ref value, .. } if value == "9"));
}

#[test]
fn mapper_reuses_metadata_across_rows() {
    let mapper = StructMapper::<User>::new(Semantics::Reference).unwrap();
    let shared = StructMapper::<User>::with_metadata(mapper.metadata().clone(), Semantics::Value);

    for status in ["1", "0", "1"] {
        let a = mapper.map(&mut user_row(Value::text(status))).unwrap();
        let b = shared.map(&mut user_row(Value::text(status))).unwrap();
        assert!(a.is_reference());
        assert_eq!(*a, *b);
    }
}

#[test]
fn config_overlay_alias_and_value_map() {
    let config = MappingConfig::parse(
        r#"
        [columns.login]
        field = "name"

        [columns.state]
        field = "status"
        value_map = { "A" = "ACTIVE", "I" = "INACTIVE" }
        "#,
    )
    .unwrap();

    let mapper = RecordMapper::<User>::with_config(&Shape::of::<User>(), &config).unwrap();
    let mut scanner = MemoryScanner::single(
        ["id", "login", "state"],
        vec![Value::Int64(7), Value::text("carol"), Value::text("I")],
    );
    let user = mapper
        .map(&mut scanner)
        .unwrap()
        .into_record()
        .unwrap()
        .into_inner();
    assert_eq!((user.id, user.name.as_str(), user.status.as_str()), (7, "carol", "INACTIVE"));

    // The declared column keeps its own table.
    let user = mapper
        .map(&mut user_row(Value::text("1")))
        .unwrap()
        .into_record()
        .unwrap()
        .into_inner();
    assert_eq!(user.status, "ACTIVE");
}

#[test]
fn config_errors_surface_at_construction() {
    let config = MappingConfig::parse("[columns.login]\nfield = \"username\"\n").unwrap();
    let err = RecordMapper::<User>::with_config(&Shape::of::<User>(), &config)
        .err()
        .unwrap();
    assert!(matches!(err, MapError::Config(_)));
}

#[test]
fn scan_row_standalone() {
    let mut scanner = MemoryScanner::single(
        ["a", "b", "c"],
        vec![Value::Int64(1), Value::bytes(b"two".to_vec()), Value::Bool(true)],
    );
    let (values, columns) = scan_row(&mut scanner).unwrap();
    assert_eq!(values.len(), 3);
    assert_eq!(values[1], Value::text("two"));
    assert_eq!(columns, vec!["a", "b", "c"]);
}
