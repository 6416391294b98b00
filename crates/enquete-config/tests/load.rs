//! Tests for loading configuration files from disk.

use std::fs;

use enquete_config::{ConfigError, load_config};
use enquete_model::{FacilityCode, MappingReference, ValueType};

const FULL_CONFIG: &str = r#"
google:
  worksheet: フォームの回答 1
timezone: Asia/Tokyo
encoding: shift_jis
replacement_char: "〓"

mappings:
  default:
    string:
      name: 氏名
      room_number: 部屋番号
    integer:
      age: 年齢
    date:
      start_date: 入居日
  conversion_yesno:
    "Yes": はい
    "No": いいえ

corporations:
  acme:
    db:
      host: db.internal
      port: 5432
      dbname: surveys
      user: importer
      password: hunter2
    mappings:
      seasonal:
        string_yesno:
          revisit: また来たいですか
        datetime:
          answered_at: タイムスタンプ
    facilities:
      tokyo:
        facility_code: 101
        spreadsheet:
          id: sheet-tokyo
          worksheet: 回答
        mapping: seasonal
        table: enquetes_tokyo
        enquete_key_prefix: TKY
      osaka:
        facility_code: "OSK"
        spreadsheet:
          id: sheet-osaka
        delete: false
        imports:
          - default
          - table: enquete_details
            mapping:
              text:
                memo: 備考
"#;

#[test]
fn loads_full_configuration() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("config.yaml");
    fs::write(&path, FULL_CONFIG).expect("write config");

    let config = load_config(&path).expect("load config");

    assert_eq!(config.google.worksheet.as_deref(), Some("フォームの回答 1"));
    assert_eq!(config.timezone.name(), "Asia/Tokyo");
    assert_eq!(config.text.replacement_char, '〓');

    let default = config.mappings.default_catalog().expect("root default");
    assert_eq!(default.type_of("start_date"), Some(ValueType::Date));
    assert_eq!(
        config.mappings.conversion("_yesno").expect("root table").apply("No"),
        "いいえ"
    );

    let acme = config.corporation("acme").expect("acme");
    assert_eq!(acme.db.port, Some(5432));
    assert_eq!(acme.db.password.as_deref(), Some("hunter2"));
    assert!(acme.mappings.catalog("seasonal").is_some());

    let tokyo = acme.facility("tokyo").expect("tokyo");
    assert_eq!(tokyo.facility_code, FacilityCode::Integer(101));
    assert_eq!(tokyo.spreadsheet.worksheet.as_deref(), Some("回答"));
    assert_eq!(tokyo.mapping.as_deref(), Some("seasonal"));
    assert_eq!(tokyo.table.as_ref().expect("table").as_str(), "enquetes_tokyo");
    assert_eq!(tokyo.enquete_key_prefix.as_deref(), Some("TKY"));
    assert!(tokyo.delete);

    let osaka = acme.facility("osaka").expect("osaka");
    assert_eq!(osaka.facility_code, FacilityCode::Text("OSK".to_string()));
    assert!(!osaka.delete);
    let jobs = osaka.import_jobs();
    assert_eq!(jobs.len(), 2);
    assert_eq!(
        jobs[0].mapping,
        Some(MappingReference::Named("default".to_string()))
    );
    match &jobs[1].mapping {
        Some(MappingReference::Inline(catalog)) => {
            assert_eq!(catalog.type_of("memo"), Some(ValueType::Text));
        }
        other => panic!("expected inline catalog, got {other:?}"),
    }
}

#[test]
fn facilities_keep_file_order() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("config.yaml");
    fs::write(&path, FULL_CONFIG).expect("write config");

    let config = load_config(&path).expect("load config");
    let keys: Vec<&str> = config.facilities().map(|(_, f)| f.key.as_str()).collect();
    assert_eq!(keys, vec!["tokyo", "osaka"]);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("absent.yaml");

    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("absent.yaml"));
}

#[test]
fn unknown_catalog_section_is_fatal() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("config.yaml");
    fs::write(
        &path,
        r#"
corporations:
  acme:
    db: {}
    mappings:
      default:
        boolean:
          agreed: 同意
    facilities:
      tokyo:
        facility_code: 1
        spreadsheet: { id: sheet }
"#,
    )
    .expect("write config");

    let err = load_config(&path).unwrap_err();
    assert!(err.to_string().contains("corporations.acme.mappings.default.boolean"));
}

#[test]
fn facility_without_spreadsheet_is_fatal() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("config.yaml");
    fs::write(
        &path,
        "corporations:\n  acme:\n    db: {}\n    facilities:\n      tokyo:\n        facility_code: 1\n",
    )
    .expect("write config");

    let err = load_config(&path).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::MissingKey {
            key: "spreadsheet.id",
            ..
        }
    ));
}
