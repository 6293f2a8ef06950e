#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Report {
    #[sqlx(rename = "ReportID")]
    pub id: i64,
    #[sqlx(rename = "UserID")]
    pub user_id: i64,
    #[sqlx(rename = "ReportedID")]
    pub reported_id: i64,
    #[sqlx(rename = "Message")]
    pub message: String,
    /// Serialized coordinates, opaque to this crate.
    #[sqlx(rename = "Position")]
    pub position: String,
    #[sqlx(rename = "State")]
    pub state: i64,
}
