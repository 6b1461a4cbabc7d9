use std::collections::HashMap;

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::types::{AgencyId, ClientId, PaymentStatus};
use crate::models::client::{
    Client as DbClient, NewClient as DbNewClient, UpdateClient as DbUpdateClient,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    ClientListQuery, ClientReader, ClientWriter, DieselRepository, LIKE_ESCAPE, like_pattern,
};

/// Rows per `INSERT` statement, well below SQLite's bound-parameter limit.
const INSERT_CHUNK_SIZE: usize = 200;

/// Boxed query over an agency's clients with the optional search applied.
fn filtered_clients<'a>(
    agency_id: AgencyId,
    pattern: Option<&'a str>,
) -> crate::schema::clients::BoxedQuery<'a, Sqlite> {
    use crate::schema::clients;

    let mut query = clients::table
        .filter(clients::agency_id.eq(agency_id.get()))
        .into_boxed();

    if let Some(pattern) = pattern {
        query = query.filter(
            clients::name
                .like(pattern)
                .escape(LIKE_ESCAPE)
                .or(clients::phone.like(pattern).escape(LIKE_ESCAPE))
                .or(clients::email.like(pattern).escape(LIKE_ESCAPE)),
        );
    }

    query
}

impl ClientReader for DieselRepository {
    fn get_client_by_id(
        &self,
        id: ClientId,
        agency_id: AgencyId,
    ) -> RepositoryResult<Option<Client>> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let client = clients::table
            .filter(clients::id.eq(id.get()))
            .filter(clients::agency_id.eq(agency_id.get()))
            .select(DbClient::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(client.map(Client::try_from).transpose()?)
    }

    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)> {
        use crate::schema::clients;

        let mut conn = self.conn()?;

        let pattern = like_pattern(query.search.as_deref());

        let total: i64 = filtered_clients(query.agency_id, pattern.as_deref())
            .count()
            .get_result(&mut conn)?;

        let mut items = filtered_clients(query.agency_id, pattern.as_deref())
            .order((clients::created_at.desc(), clients::id.desc()));

        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }

        let clients = items
            .select(DbClient::as_select())
            .load(&mut conn)?
            .into_iter()
            .map(Client::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((usize::try_from(total).unwrap_or(0), clients))
    }

    fn count_clients(&self, agency_id: AgencyId) -> RepositoryResult<usize> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let total: i64 = clients::table
            .filter(clients::agency_id.eq(agency_id.get()))
            .count()
            .get_result(&mut conn)?;

        Ok(usize::try_from(total).unwrap_or(0))
    }

    fn next_payment_dates(
        &self,
        agency_id: AgencyId,
        client_ids: &[ClientId],
    ) -> RepositoryResult<HashMap<ClientId, NaiveDate>> {
        use crate::schema::payments;

        if client_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut conn = self.conn()?;
        let ids: Vec<i32> = client_ids.iter().map(|id| id.get()).collect();

        let due_dates: Vec<(i32, NaiveDate)> = payments::table
            .filter(payments::agency_id.eq(agency_id.get()))
            .filter(payments::client_id.eq_any(&ids))
            .filter(payments::status.eq(PaymentStatus::Pending.as_str()))
            .select((payments::client_id, payments::due_date))
            .load(&mut conn)?;

        let mut next = HashMap::new();
        for (client_id, due_date) in due_dates {
            let client_id = ClientId::new(client_id)?;
            next.entry(client_id)
                .and_modify(|current: &mut NaiveDate| {
                    if due_date < *current {
                        *current = due_date;
                    }
                })
                .or_insert(due_date);
        }

        Ok(next)
    }
}

impl ClientWriter for DieselRepository {
    fn create_clients(&self, new_clients: &[NewClient]) -> RepositoryResult<usize> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let insertables: Vec<DbNewClient> = new_clients.iter().map(DbNewClient::from).collect();

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let mut affected = 0;
            for chunk in insertables.chunks(INSERT_CHUNK_SIZE) {
                affected += diesel::insert_into(clients::table)
                    .values(chunk)
                    .execute(conn)?;
            }
            Ok(affected)
        })
    }

    fn update_client(
        &self,
        id: ClientId,
        agency_id: AgencyId,
        updates: &UpdateClient,
    ) -> RepositoryResult<Client> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let updated = diesel::update(
            clients::table
                .filter(clients::id.eq(id.get()))
                .filter(clients::agency_id.eq(agency_id.get())),
        )
        .set(DbUpdateClient::from(updates))
        .returning(DbClient::as_returning())
        .get_result(&mut conn)?;

        Ok(Client::try_from(updated)?)
    }

    fn delete_client(&self, id: ClientId, agency_id: AgencyId) -> RepositoryResult<()> {
        use crate::schema::{clients, payments, reminders};

        let mut conn = self.conn()?;
        conn.transaction::<_, RepositoryError, _>(|conn| {
            let client_id = id.get();
            let agency_id = agency_id.get();

            diesel::delete(
                reminders::table
                    .filter(reminders::agency_id.eq(agency_id))
                    .filter(reminders::client_id.eq(client_id)),
            )
            .execute(conn)?;

            diesel::delete(
                payments::table
                    .filter(payments::agency_id.eq(agency_id))
                    .filter(payments::client_id.eq(client_id)),
            )
            .execute(conn)?;

            let deleted = diesel::delete(
                clients::table
                    .filter(clients::id.eq(client_id))
                    .filter(clients::agency_id.eq(agency_id)),
            )
            .execute(conn)?;

            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        })
    }
}
