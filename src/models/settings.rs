use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::settings::AgencySettings;
use crate::domain::types::{AgencyId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::settings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Settings {
    pub id: i32,
    pub agency_id: i32,
    pub whatsapp_template: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::settings)]
#[diesel(treat_none_as_null = true)]
pub struct UpsertSettings<'a> {
    pub agency_id: i32,
    pub whatsapp_template: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Settings> for AgencySettings {
    type Error = TypeConstraintError;

    fn try_from(settings: Settings) -> Result<Self, Self::Error> {
        Ok(Self {
            agency_id: AgencyId::new(settings.agency_id)?,
            whatsapp_template: settings.whatsapp_template,
            updated_at: settings.updated_at,
        })
    }
}
