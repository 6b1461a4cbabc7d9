use chrono::{NaiveDate, Utc};
use diesel::prelude::*;

use crate::domain::client::Client;
use crate::domain::payment::{NewPayment, Payment, PaymentTotals};
use crate::domain::types::{AgencyId, Amount, PaymentId, PaymentStatus};
use crate::models::client::Client as DbClient;
use crate::models::payment::{CompletePayment, NewPayment as DbNewPayment, Payment as DbPayment};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, PaymentListQuery, PaymentReader, PaymentWriter};

/// Case-insensitive match on the client's name or phone, the amount or the
/// due date.
fn matches_search(payment: &Payment, client: &Client, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    client.name.as_str().to_lowercase().contains(&needle)
        || client.phone.as_str().contains(&needle)
        || payment.amount.to_string().contains(&needle)
        || payment.due_date.to_string().contains(&needle)
}

fn into_domain_rows(rows: Vec<(DbPayment, DbClient)>) -> RepositoryResult<Vec<(Payment, Client)>> {
    rows.into_iter()
        .map(|(payment, client)| -> RepositoryResult<(Payment, Client)> {
            Ok((Payment::try_from(payment)?, Client::try_from(client)?))
        })
        .collect()
}

impl PaymentReader for DieselRepository {
    fn get_payment_by_id(
        &self,
        id: PaymentId,
        agency_id: AgencyId,
    ) -> RepositoryResult<Option<Payment>> {
        use crate::schema::payments;

        let mut conn = self.conn()?;
        let payment = payments::table
            .filter(payments::id.eq(id.get()))
            .filter(payments::agency_id.eq(agency_id.get()))
            .select(DbPayment::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(payment.map(Payment::try_from).transpose()?)
    }

    fn list_payments(
        &self,
        query: PaymentListQuery,
    ) -> RepositoryResult<(usize, Vec<(Payment, Client)>)> {
        use crate::schema::{clients, payments};

        let mut conn = self.conn()?;

        let mut items = payments::table
            .inner_join(clients::table)
            .filter(payments::agency_id.eq(query.agency_id.get()))
            .order((payments::created_at.desc(), payments::id.desc()))
            .select((DbPayment::as_select(), DbClient::as_select()))
            .into_boxed();

        if let Some(status) = query.status {
            items = items.filter(payments::status.eq(status.as_str()));
        }
        if let Some(client_id) = query.client_id {
            items = items.filter(payments::client_id.eq(client_id.get()));
        }

        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty());

        // Search compares formatted amounts and dates, so it filters in memory.
        if let Some(term) = search {
            let matching: Vec<(Payment, Client)> = into_domain_rows(items.load(&mut conn)?)?
                .into_iter()
                .filter(|(payment, client)| matches_search(payment, client, term))
                .collect();
            let total = matching.len();
            let page = match &query.pagination {
                Some(pagination) => pagination.apply(matching),
                None => matching,
            };
            return Ok((total, page));
        }

        let mut count_query = payments::table
            .filter(payments::agency_id.eq(query.agency_id.get()))
            .into_boxed();
        if let Some(status) = query.status {
            count_query = count_query.filter(payments::status.eq(status.as_str()));
        }
        if let Some(client_id) = query.client_id {
            count_query = count_query.filter(payments::client_id.eq(client_id.get()));
        }
        let total: i64 = count_query.count().get_result(&mut conn)?;

        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }

        let rows = into_domain_rows(items.load(&mut conn)?)?;
        Ok((usize::try_from(total).unwrap_or(0), rows))
    }

    fn payment_totals(&self, agency_id: AgencyId) -> RepositoryResult<PaymentTotals> {
        use crate::schema::payments;

        let mut conn = self.conn()?;
        let rows: Vec<(String, i64)> = payments::table
            .filter(payments::agency_id.eq(agency_id.get()))
            .select((payments::status, payments::amount))
            .load(&mut conn)?;

        let mut totals = PaymentTotals::default();
        for (status, amount) in rows {
            match PaymentStatus::try_from(status)? {
                PaymentStatus::Pending => totals.pending_count += 1,
                PaymentStatus::Completed => {
                    totals.completed_count += 1;
                    totals.completed_amount = totals
                        .completed_amount
                        .saturating_add(Amount::from_minor(amount)?);
                }
            }
        }

        Ok(totals)
    }
}

impl PaymentWriter for DieselRepository {
    fn create_payment(&self, payment: &NewPayment) -> RepositoryResult<Payment> {
        use crate::schema::payments;

        let mut conn = self.conn()?;
        let created = diesel::insert_into(payments::table)
            .values(DbNewPayment::from(payment))
            .returning(DbPayment::as_returning())
            .get_result(&mut conn)?;

        Ok(Payment::try_from(created)?)
    }

    fn complete_payment(
        &self,
        id: PaymentId,
        agency_id: AgencyId,
        paid_date: NaiveDate,
    ) -> RepositoryResult<Payment> {
        use crate::schema::payments;

        let mut conn = self.conn()?;
        let updated = diesel::update(
            payments::table
                .filter(payments::id.eq(id.get()))
                .filter(payments::agency_id.eq(agency_id.get())),
        )
        .set(CompletePayment::on(paid_date))
        .returning(DbPayment::as_returning())
        .get_result(&mut conn)?;

        Ok(Payment::try_from(updated)?)
    }

    fn delete_payment(&self, id: PaymentId, agency_id: AgencyId) -> RepositoryResult<()> {
        use crate::schema::{payments, reminders};

        let mut conn = self.conn()?;
        conn.transaction::<_, RepositoryError, _>(|conn| {
            diesel::update(
                reminders::table
                    .filter(reminders::agency_id.eq(agency_id.get()))
                    .filter(reminders::payment_id.eq(id.get())),
            )
            .set((
                reminders::payment_id.eq(None::<i32>),
                reminders::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;

            let deleted = diesel::delete(
                payments::table
                    .filter(payments::id.eq(id.get()))
                    .filter(payments::agency_id.eq(agency_id.get())),
            )
            .execute(conn)?;

            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        })
    }
}
