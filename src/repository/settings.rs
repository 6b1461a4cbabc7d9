use chrono::Utc;
use diesel::prelude::*;

use crate::domain::settings::AgencySettings;
use crate::domain::types::AgencyId;
use crate::models::settings::{Settings, UpsertSettings};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, SettingsReader, SettingsWriter};

impl SettingsReader for DieselRepository {
    fn get_settings(&self, agency_id: AgencyId) -> RepositoryResult<Option<AgencySettings>> {
        use crate::schema::settings;

        let mut conn = self.conn()?;
        let row = settings::table
            .filter(settings::agency_id.eq(agency_id.get()))
            .select(Settings::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(AgencySettings::try_from).transpose()?)
    }
}

impl SettingsWriter for DieselRepository {
    fn save_whatsapp_template(
        &self,
        agency_id: AgencyId,
        template: Option<String>,
    ) -> RepositoryResult<AgencySettings> {
        use crate::schema::settings;

        let mut conn = self.conn()?;
        let values = UpsertSettings {
            agency_id: agency_id.get(),
            whatsapp_template: template.as_deref(),
            updated_at: Utc::now().naive_utc(),
        };

        let row = diesel::insert_into(settings::table)
            .values(&values)
            .on_conflict(settings::agency_id)
            .do_update()
            .set(&values)
            .returning(Settings::as_returning())
            .get_result(&mut conn)?;

        Ok(AgencySettings::try_from(row)?)
    }
}
