use chrono::Utc;
use diesel::prelude::*;

use crate::domain::types::{Email, PersonName, UserId};
use crate::domain::user::{NewUser, User};
use crate::models::user::{NewProfile, Profile};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, UserReader, UserWriter};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        use crate::schema::profiles;

        let mut conn = self.conn()?;
        let profile = profiles::table
            .find(id.get())
            .select(Profile::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(profile.map(User::try_from).transpose()?)
    }

    fn get_user_by_email(&self, email: &Email) -> RepositoryResult<Option<User>> {
        use crate::schema::profiles;

        let mut conn = self.conn()?;
        let profile = profiles::table
            .filter(profiles::email.eq(email.as_str()))
            .select(Profile::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(profile.map(User::try_from).transpose()?)
    }
}

impl UserWriter for DieselRepository {
    fn update_user_name(&self, id: UserId, name: &PersonName) -> RepositoryResult<User> {
        use crate::schema::profiles;

        let mut conn = self.conn()?;
        let profile = diesel::update(profiles::table.find(id.get()))
            .set((
                profiles::name.eq(name.as_str()),
                profiles::updated_at.eq(Utc::now().naive_utc()),
            ))
            .returning(Profile::as_returning())
            .get_result(&mut conn)?;

        Ok(User::try_from(profile)?)
    }

    fn update_user_password(&self, id: UserId, password_hash: &str) -> RepositoryResult<()> {
        use crate::schema::profiles;

        let mut conn = self.conn()?;
        let affected = diesel::update(profiles::table.find(id.get()))
            .set((
                profiles::password_hash.eq(password_hash),
                profiles::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn upsert_super_admin(&self, user: &NewUser) -> RepositoryResult<User> {
        use crate::schema::profiles;

        let mut conn = self.conn()?;
        let insertable = NewProfile {
            agency_id: None,
            ..NewProfile::from(user)
        };

        let profile = diesel::insert_into(profiles::table)
            .values(&insertable)
            .on_conflict(profiles::email)
            .do_update()
            .set((
                profiles::agency_id.eq(None::<i32>),
                profiles::password_hash.eq(insertable.password_hash),
                profiles::name.eq(insertable.name),
                profiles::role.eq(insertable.role),
                profiles::updated_at.eq(Utc::now().naive_utc()),
            ))
            .returning(Profile::as_returning())
            .get_result(&mut conn)?;

        Ok(User::try_from(profile)?)
    }
}
