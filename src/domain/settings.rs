use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::AgencyId;
use crate::whatsapp::DEFAULT_TEMPLATE;

/// Per-agency preferences.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AgencySettings {
    pub agency_id: AgencyId,
    /// Custom WhatsApp template; `None` falls back to the default.
    pub whatsapp_template: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl AgencySettings {
    pub fn template(&self) -> &str {
        self.whatsapp_template
            .as_deref()
            .unwrap_or(DEFAULT_TEMPLATE)
    }
}
