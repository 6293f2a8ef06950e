use crate::entities::reports;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub report_id: i64,
    pub user_id: i64,
    pub reported_id: i64,
    pub message: String,
    pub position: String,
    pub state: i64,
}

impl From<reports::Report> for Report {
    fn from(report: reports::Report) -> Self {
        Self {
            report_id: report.id,
            user_id: report.user_id,
            reported_id: report.reported_id,
            message: report.message,
            position: report.position,
            state: report.state,
        }
    }
}
