//! End-to-end coercion of sheet rows through a resolved mapping.

use enquete_map::{HeaderError, HeaderIndex, MappingResolver, ResolvedMapping};
use enquete_model::{
    ColumnName, Corporation, DbConfig, Facility, FacilityCode, FieldSpec, IntRange, MappingCatalog,
    MappingScope, Value, ValueType,
};
use enquete_transform::{CharReplacer, RowCoercer, RowError};

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| (*cell).to_string()).collect()
}

fn resolve(catalog: MappingCatalog) -> ResolvedMapping {
    let root = MappingScope::new().with_catalog(catalog);
    let corp = Corporation {
        key: "acme".to_string(),
        db: DbConfig::default(),
        mappings: MappingScope::new(),
        mapping: None,
        facilities: vec![Facility::new("tokyo", FacilityCode::Integer(101), "sheet")],
    };
    MappingResolver::new(&root)
        .resolve(&corp, &corp.facilities[0])
        .expect("root default resolves")
}

fn name_and_age() -> ResolvedMapping {
    resolve(
        MappingCatalog::new("default")
            .with_field(ValueType::String, "name", "氏名")
            .and_then(|c| c.with_field(ValueType::Integer, "age", "年齢"))
            .expect("catalog"),
    )
}

#[test]
fn name_and_age_are_coerced() {
    let mapping = name_and_age();
    let headers = HeaderIndex::new(&row(&["氏名", "年齢"]));

    let record = RowCoercer::default()
        .coerce(&row(&["山田", "30"]), &mapping, &headers)
        .expect("coerced");
    assert_eq!(record.len(), 2);
    assert_eq!(record.get("name"), Some(&Value::Text("山田".to_string())));
    assert_eq!(record.get("age"), Some(&Value::Integer(30)));
}

#[test]
fn empty_age_is_explicit_null() {
    let mapping = name_and_age();
    let headers = HeaderIndex::new(&row(&["氏名", "年齢"]));

    let record = RowCoercer::default()
        .coerce(&row(&["山田", ""]), &mapping, &headers)
        .expect("coerced");
    assert_eq!(record.get("name"), Some(&Value::Text("山田".to_string())));
    assert_eq!(record.get("age"), Some(&Value::Null));
}

#[test]
fn short_rows_read_missing_cells_as_null() {
    let mapping = name_and_age();
    let headers = HeaderIndex::new(&row(&["氏名", "年齢"]));

    let record = RowCoercer::default()
        .coerce(&row(&["山田"]), &mapping, &headers)
        .expect("coerced");
    assert_eq!(record.get("age"), Some(&Value::Null));
}

#[test]
fn non_numeric_age_fails_for_column() {
    let mapping = name_and_age();
    let headers = HeaderIndex::new(&row(&["氏名", "年齢"]));

    let err = RowCoercer::default()
        .coerce(&row(&["山田", "abc"]), &mapping, &headers)
        .unwrap_err();
    match err {
        RowError::Coercion(err) => {
            assert_eq!(err.column, "age");
            assert_eq!(err.header, "年齢");
            assert_eq!(err.value, "abc");
            assert_eq!(err.value_type, ValueType::Integer);
        }
        other => panic!("expected coercion error, got {other:?}"),
    }
}

#[test]
fn unmapped_columns_are_not_passed_through() {
    let mapping = name_and_age();
    let headers = HeaderIndex::new(&row(&["タイムスタンプ", "氏名", "年齢", "備考"]));

    let record = RowCoercer::default()
        .coerce(
            &row(&["2024/04/01 10:00:00", "山田", "30", "特になし"]),
            &mapping,
            &headers,
        )
        .expect("coerced");
    let columns: Vec<&str> = record.iter().map(|(column, _)| column).collect();
    assert_eq!(columns, vec!["age", "name"]);
}

#[test]
fn header_with_trailing_space_does_not_match() {
    let mapping = name_and_age();
    let headers = HeaderIndex::new(&row(&["氏名 ", "年齢"]));

    let err = RowCoercer::default()
        .coerce(&row(&["山田", "30"]), &mapping, &headers)
        .unwrap_err();
    assert_eq!(err, RowError::Header(HeaderError::Missing("氏名".to_string())));
}

#[test]
fn configured_replacement_character_is_used() {
    let mapping = resolve(
        MappingCatalog::new("default")
            .with_field(ValueType::Text, "memo", "備考")
            .expect("catalog"),
    );
    let headers = HeaderIndex::new(&row(&["備考"]));
    let coercer = RowCoercer::new(CharReplacer::for_label("shift_jis", '〓').expect("label"));

    let record = coercer
        .coerce(&row(&["満足です😀"]), &mapping, &headers)
        .expect("coerced");
    assert_eq!(record.get("memo"), Some(&Value::Text("満足です〓".to_string())));
}

fn satisfaction(clamp: Option<IntRange>) -> ResolvedMapping {
    let mut catalog = MappingCatalog::new("default");
    catalog
        .push_field(
            ValueType::Integer,
            FieldSpec::new(ColumnName::new("score").expect("column"), "満足度").with_variant("2"),
        )
        .expect("field");
    if let Some(range) = clamp {
        catalog.set_clamp("2", range);
    }
    resolve(catalog)
}

#[test]
fn integer2_scores_are_bounded_to_percent_by_default() {
    let mapping = satisfaction(None);
    let headers = HeaderIndex::new(&row(&["満足度"]));
    let coercer = RowCoercer::default();

    let record = coercer.coerce(&row(&["250"]), &mapping, &headers).expect("coerced");
    assert_eq!(record.get("score"), Some(&Value::Integer(100)));
    let record = coercer.coerce(&row(&["-3"]), &mapping, &headers).expect("coerced");
    assert_eq!(record.get("score"), Some(&Value::Integer(0)));
}

#[test]
fn declared_clamp_overrides_percent_bounds() {
    let mapping = satisfaction(Some(IntRange::new(1, 5).expect("range")));
    let headers = HeaderIndex::new(&row(&["満足度"]));

    let record = RowCoercer::default()
        .coerce(&row(&["250"]), &mapping, &headers)
        .expect("coerced");
    assert_eq!(record.get("score"), Some(&Value::Integer(5)));
}
