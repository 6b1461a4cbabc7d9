use serde::Serialize;

use crate::domain::agency::AgencyOverview;

#[derive(Debug, Default)]
pub struct AgenciesQuery {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AgenciesPageData {
    pub agencies: Vec<AgencyOverview>,
    pub active_count: usize,
    pub pending_count: usize,
    pub search_query: Option<String>,
}
