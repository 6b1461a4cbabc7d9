use crate::domain::agency::Agency;
use crate::domain::subscription::SubscriptionPlan;
use crate::domain::user::User;

pub struct SettingsPageData {
    pub profile: User,
    /// Only agency users have an agency section.
    pub agency: Option<AgencySection>,
}

pub struct AgencySection {
    pub agency: Agency,
    pub template: String,
    pub is_default_template: bool,
    pub preview: String,
    /// Active plans the agency may request.
    pub plans: Vec<SubscriptionPlan>,
    pub current_plan: Option<SubscriptionPlan>,
    pub has_pending_request: bool,
}
