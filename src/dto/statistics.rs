use serde::Serialize;

use crate::domain::statistics::{AgencyPerformance, PlatformStats};

#[derive(Debug, Serialize)]
pub struct StatisticsPageData {
    pub stats: PlatformStats,
    /// Active agencies in percent.
    pub activity_rate: usize,
    pub performance: Vec<AgencyPerformance>,
}
