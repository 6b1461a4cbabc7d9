//! Diesel models for agencies.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::agency::{
    Agency as DomainAgency, NewAgency as DomainNewAgency,
    UpdateAgencyInfo as DomainUpdateAgencyInfo,
};
use crate::domain::types::{AgencyId, AgencyName, AgencyStatus, PlanId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::agencies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// Diesel model for [`crate::domain::agency::Agency`].
pub struct Agency {
    pub id: i32,
    pub name: String,
    pub status: String,
    pub subscription_ends: Option<NaiveDate>,
    pub plan_id: Option<i32>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::agencies)]
/// Insertable form of [`Agency`].
pub struct NewAgency<'a> {
    pub name: &'a str,
    pub status: &'a str,
    pub subscription_ends: Option<NaiveDate>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::agencies)]
#[diesel(treat_none_as_null = true)]
/// Contact details update of an [`Agency`].
pub struct UpdateAgencyInfo<'a> {
    pub name: &'a str,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Agency> for DomainAgency {
    type Error = TypeConstraintError;

    fn try_from(agency: Agency) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AgencyId::new(agency.id)?,
            name: AgencyName::new(agency.name)?,
            status: AgencyStatus::try_from(agency.status)?,
            subscription_ends: agency.subscription_ends,
            plan_id: agency.plan_id.map(PlanId::new).transpose()?,
            phone: agency.phone,
            address: agency.address,
            created_at: agency.created_at,
            updated_at: agency.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewAgency> for NewAgency<'a> {
    fn from(agency: &'a DomainNewAgency) -> Self {
        Self {
            name: agency.name.as_str(),
            status: agency.status.as_str(),
            subscription_ends: agency.subscription_ends,
        }
    }
}

impl<'a> From<&'a DomainUpdateAgencyInfo> for UpdateAgencyInfo<'a> {
    fn from(info: &'a DomainUpdateAgencyInfo) -> Self {
        Self {
            name: info.name.as_str(),
            phone: info.phone.as_deref(),
            address: info.address.as_deref(),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}
