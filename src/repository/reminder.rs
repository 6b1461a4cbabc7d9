use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::client::Client;
use crate::domain::payment::Payment;
use crate::domain::reminder::{NewReminder, Reminder, ReminderView};
use crate::domain::types::{AgencyId, ReminderId, ReminderStatus};
use crate::models::client::Client as DbClient;
use crate::models::payment::Payment as DbPayment;
use crate::models::reminder::{
    NewReminder as DbNewReminder, Reminder as DbReminder, UpdateReminderStatus,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ReminderReader, ReminderWriter};

type ReminderRow = (DbReminder, Option<DbClient>, Option<DbPayment>);

fn into_view((reminder, client, payment): ReminderRow) -> RepositoryResult<ReminderView> {
    Ok(ReminderView {
        reminder: Reminder::try_from(reminder)?,
        client: client.map(Client::try_from).transpose()?,
        payment: payment.map(Payment::try_from).transpose()?,
    })
}

impl DieselRepository {
    fn load_reminder_views(
        &self,
        agency_id: AgencyId,
        id: Option<ReminderId>,
    ) -> RepositoryResult<Vec<ReminderView>> {
        use crate::schema::{clients, payments, reminders};

        let mut conn = self.conn()?;
        let mut query = reminders::table
            .left_join(clients::table.on(reminders::client_id.eq(clients::id.nullable())))
            .left_join(payments::table.on(reminders::payment_id.eq(payments::id.nullable())))
            .filter(reminders::agency_id.eq(agency_id.get()))
            .order((reminders::send_date.asc(), reminders::id.asc()))
            .select((
                DbReminder::as_select(),
                Option::<DbClient>::as_select(),
                Option::<DbPayment>::as_select(),
            ))
            .into_boxed();

        if let Some(id) = id {
            query = query.filter(reminders::id.eq(id.get()));
        }

        query
            .load::<ReminderRow>(&mut conn)?
            .into_iter()
            .map(into_view)
            .collect()
    }
}

impl ReminderReader for DieselRepository {
    fn get_reminder(
        &self,
        id: ReminderId,
        agency_id: AgencyId,
    ) -> RepositoryResult<Option<ReminderView>> {
        let views = self.load_reminder_views(agency_id, Some(id))?;
        Ok(views.into_iter().next())
    }

    fn list_reminders(&self, agency_id: AgencyId) -> RepositoryResult<Vec<ReminderView>> {
        let mut views = self.load_reminder_views(agency_id, None)?;
        views.sort_by_key(|view| view.reminder.status == ReminderStatus::Completed);
        Ok(views)
    }

    fn count_active_reminders(&self, agency_id: AgencyId) -> RepositoryResult<usize> {
        use crate::schema::reminders;

        let mut conn = self.conn()?;
        let total: i64 = reminders::table
            .filter(reminders::agency_id.eq(agency_id.get()))
            .filter(reminders::status.ne(ReminderStatus::Completed.as_str()))
            .count()
            .get_result(&mut conn)?;

        Ok(usize::try_from(total).unwrap_or(0))
    }
}

impl ReminderWriter for DieselRepository {
    fn create_reminder(&self, reminder: &NewReminder) -> RepositoryResult<Reminder> {
        use crate::schema::reminders;

        let mut conn = self.conn()?;
        let created = diesel::insert_into(reminders::table)
            .values(DbNewReminder::from(reminder))
            .returning(DbReminder::as_returning())
            .get_result(&mut conn)?;

        Ok(Reminder::try_from(created)?)
    }

    fn set_reminder_status(
        &self,
        id: ReminderId,
        agency_id: AgencyId,
        status: ReminderStatus,
        sent_at: Option<NaiveDateTime>,
    ) -> RepositoryResult<Reminder> {
        use crate::schema::reminders;

        let mut conn = self.conn()?;
        let updated = diesel::update(
            reminders::table
                .filter(reminders::id.eq(id.get()))
                .filter(reminders::agency_id.eq(agency_id.get())),
        )
        .set(UpdateReminderStatus {
            status: status.as_str(),
            sent_at,
            updated_at: Utc::now().naive_utc(),
        })
        .returning(DbReminder::as_returning())
        .get_result(&mut conn)?;

        Ok(Reminder::try_from(updated)?)
    }

    fn delete_reminder(&self, id: ReminderId, agency_id: AgencyId) -> RepositoryResult<()> {
        use crate::schema::reminders;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            reminders::table
                .filter(reminders::id.eq(id.get()))
                .filter(reminders::agency_id.eq(agency_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
