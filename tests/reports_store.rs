use futures_util::TryStreamExt;
use reports_store::common::context::Context;
use reports_store::common::dialect::StorageType;
use reports_store::common::error::AppError;
use reports_store::common::schema::{self, SchemaChange};
use reports_store::common::sql_value::SqlValue;
use reports_store::common::state::ReportsDb;
use reports_store::repositories::reports::{self, REPORTS_TABLE, ReportColumn};
use reports_store::settings::StorageSettings;
use reports_store::usecases;
use rstest::rstest;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use tempfile::TempDir;

const REPORT_COLUMNS: [&str; 6] = [
    "ReportID",
    "UserID",
    "ReportedID",
    "Message",
    "Position",
    "State",
];

fn sqlite_settings(dir: &TempDir) -> StorageSettings {
    StorageSettings {
        storage_type: "sqlite".to_owned(),
        save_path: dir.path().to_path_buf(),
        ..StorageSettings::default()
    }
}

async fn open(dir: &TempDir) -> ReportsDb {
    ReportsDb::init("Reports", &sqlite_settings(dir))
        .await
        .expect("store should initialize")
}

async fn insert(db: &ReportsDb, user_id: i64, reported_id: i64, message: &str) -> i64 {
    reports::create(db, user_id, reported_id, message.to_owned(), "100,200".to_owned(), 0)
        .await
        .expect("insert should succeed")
        .id
}

async fn column_names(db: &ReportsDb) -> Vec<String> {
    schema::fetch_column_names(db.db(), db.dialect(), "Reports")
        .await
        .unwrap()
}

#[tokio::test]
async fn fresh_store_creates_the_reports_table() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir).await;

    assert!(dir.path().join("Reports.sqlite").exists());
    assert_eq!(column_names(&db).await, REPORT_COLUMNS);

    let (ddl,): (String,) =
        sqlx::query_as("SELECT sql FROM sqlite_master WHERE type = 'table' AND name = 'Reports'")
            .fetch_one(db.db())
            .await
            .unwrap();
    assert!(ddl.contains("\"ReportID\" INTEGER PRIMARY KEY AUTOINCREMENT"));
}

#[rstest]
#[case("pct%20dir")]
#[case("q?mark")]
#[case("hash#dir")]
#[case("with space")]
#[tokio::test]
async fn save_path_is_used_verbatim(#[case] subdir: &str) {
    let dir = TempDir::new().unwrap();
    let save_path = dir.path().join(subdir);
    std::fs::create_dir(&save_path).unwrap();
    let settings = StorageSettings {
        save_path: save_path.clone(),
        ..sqlite_settings(&dir)
    };

    let db = ReportsDb::init("Reports", &settings).await.unwrap();
    insert(&db, 1, 2, "griefing").await;
    db.close().await;

    assert!(save_path.join("Reports.sqlite").exists());
    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries, [std::ffi::OsString::from(subdir)]);
}

#[tokio::test]
async fn report_ids_are_assigned_and_never_reused() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir).await;

    let first = insert(&db, 1, 2, "griefing").await;
    let second = insert(&db, 3, 4, "spam").await;
    assert_eq!((first, second), (1, 2));

    assert!(reports::delete_value(&db, ReportColumn::ReportId, second).await.unwrap());
    let third = insert(&db, 5, 6, "cheating").await;
    assert_eq!(third, 3);
}

#[tokio::test]
async fn ensure_is_idempotent_for_a_matching_table() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir).await;
    let id = insert(&db, 1, 2, "griefing").await;
    db.close().await;

    let db = open(&dir).await;
    let change = schema::ensure_table_structure(db.db(), db.dialect(), &REPORTS_TABLE)
        .await
        .unwrap();
    assert_eq!(change, SchemaChange::Unchanged);
    assert_eq!(column_names(&db).await, REPORT_COLUMNS);

    let report = reports::fetch_one(&db, id).await.unwrap().unwrap();
    assert_eq!(report.message, "griefing");
}

#[tokio::test]
async fn ensure_alters_a_table_with_different_columns() {
    let dir = TempDir::new().unwrap();
    let options = SqliteConnectOptions::new()
        .filename(dir.path().join("Reports.sqlite"))
        .create_if_missing(true);
    let legacy = SqlitePool::connect_with(options).await.unwrap();
    sqlx::query("CREATE TABLE Reports (ReportID INTEGER PRIMARY KEY AUTOINCREMENT, UserID INTEGER, Reason TEXT)")
        .execute(&legacy)
        .await
        .unwrap();
    sqlx::query("INSERT INTO Reports (UserID, Reason) VALUES (42, 'old')")
        .execute(&legacy)
        .await
        .unwrap();
    legacy.close().await;

    let db = open(&dir).await;
    assert_eq!(column_names(&db).await, REPORT_COLUMNS);

    let rows: Vec<(i64, i64)> = sqlx::query_as("SELECT ReportID, UserID FROM Reports")
        .fetch_all(db.db())
        .await
        .unwrap();
    assert_eq!(rows, vec![(1, 42)]);

    let tables: Vec<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name LIKE 'Reports%'")
            .fetch_all(db.db())
            .await
            .unwrap();
    assert_eq!(tables, vec![("Reports".to_owned(),)]);
}

#[tokio::test]
async fn delete_value_reports_whether_a_row_was_removed() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir).await;
    let id = insert(&db, 1, 2, "griefing").await;

    assert!(reports::delete_value(&db, ReportColumn::ReportId, id).await.unwrap());
    assert!(reports::fetch_one(&db, id).await.unwrap().is_none());
    assert!(!reports::delete_value(&db, ReportColumn::ReportId, id).await.unwrap());
}

#[tokio::test]
async fn set_value_reports_whether_a_row_was_changed() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir).await;
    let id = insert(&db, 1, 2, "griefing").await;

    let changed = reports::set_value(&db, ReportColumn::State, 1, ReportColumn::ReportId, id)
        .await
        .unwrap();
    assert!(changed);
    assert_eq!(reports::fetch_one(&db, id).await.unwrap().unwrap().state, 1);

    let changed = reports::set_value(&db, ReportColumn::State, 1, ReportColumn::ReportId, id + 1)
        .await
        .unwrap();
    assert!(!changed);
}

#[tokio::test]
async fn generic_queries_bind_positional_parameters() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir).await;
    insert(&db, 7, 2, "first").await;
    insert(&db, 7, 3, "it's \"quoted\"; DROP TABLE Reports").await;
    insert(&db, 8, 2, "other").await;

    let affected = reports::query(
        &db,
        "UPDATE Reports SET State = ? WHERE UserID = ?",
        &[SqlValue::Int(2), SqlValue::Int(7)],
    )
    .await
    .unwrap();
    assert_eq!(affected, 2);

    let rows = reports::query_reader(
        &db,
        "SELECT ReportedID, Message FROM Reports WHERE State = ? ORDER BY ReportID",
        &[SqlValue::Int(2)],
    )
    .try_collect::<Vec<_>>()
    .await
    .unwrap();
    let messages: Vec<String> = rows
        .iter()
        .map(|row| row.try_get("Message").unwrap())
        .collect();
    assert_eq!(messages, ["first", "it's \"quoted\"; DROP TABLE Reports"]);
    assert_eq!(rows[1].try_get::<i64, _>("ReportedID").unwrap(), 3);

    let by_state = reports::fetch_by_state(&db, 0).await.unwrap();
    assert_eq!(by_state.len(), 1);
    assert_eq!(by_state[0].user_id, 8);
}

#[tokio::test]
async fn backend_errors_propagate() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir).await;

    let res = reports::query(&db, "UPDATE NoSuchTable SET State = ?", &[SqlValue::Int(1)]).await;
    assert!(matches!(res, Err(sqlx::Error::Database(_))));

    let rows = reports::query_reader(&db, "SELECT * FROM NoSuchTable", &[])
        .try_collect::<Vec<_>>()
        .await;
    assert!(rows.is_err());
}

#[tokio::test]
async fn unknown_storage_type_creates_nothing() {
    let dir = TempDir::new().unwrap();
    let settings = StorageSettings {
        storage_type: "postgres".to_owned(),
        ..sqlite_settings(&dir)
    };

    let res = ReportsDb::init("Reports", &settings).await;
    assert!(matches!(res, Err(AppError::StorageInvalidType)));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn malformed_mysql_host_fails_before_connecting() {
    let settings = StorageSettings {
        storage_type: "MySQL".to_owned(),
        mysql_host: "localhost:port".to_owned(),
        ..StorageSettings::default()
    };

    let res = ReportsDb::init("Reports", &settings).await;
    assert!(matches!(res, Err(AppError::StorageNotSetUp)));
}

#[tokio::test]
async fn storage_type_is_exposed() {
    let dir = TempDir::new().unwrap();
    let settings = StorageSettings {
        storage_type: "SQLITE".to_owned(),
        ..sqlite_settings(&dir)
    };
    let db = ReportsDb::init("Reports", &settings).await.unwrap();

    assert_eq!(db.storage_type(), StorageType::Sqlite);
    assert!(!db.is_mysql());
}

#[tokio::test]
async fn usecases_map_missing_reports() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir).await;

    let report = usecases::reports::create(&db, 1, 2, "griefing".to_owned(), "0,0".to_owned(), 0)
        .await
        .unwrap();
    assert_eq!(report.report_id, 1);

    usecases::reports::set_state(&db, report.report_id, 1).await.unwrap();
    let fetched = usecases::reports::fetch_one(&db, report.report_id).await.unwrap();
    assert_eq!(fetched.state, 1);
    assert_eq!(usecases::reports::fetch_all(&db).await.unwrap(), vec![fetched]);

    usecases::reports::delete(&db, report.report_id).await.unwrap();
    assert!(matches!(
        usecases::reports::fetch_one(&db, report.report_id).await,
        Err(AppError::ReportsNotFound)
    ));
    assert!(matches!(
        usecases::reports::delete(&db, report.report_id).await,
        Err(AppError::ReportsNotFound)
    ));
    assert!(matches!(
        usecases::reports::set_state(&db, report.report_id, 2).await,
        Err(AppError::ReportsNotFound)
    ));
}
