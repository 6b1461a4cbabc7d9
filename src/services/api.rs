use crate::domain::auth::AuthenticatedUser;
use crate::dto::api::{ClientsQuery, ClientsResponse};
use crate::pagination::DEFAULT_ITEMS_PER_PAGE;
use crate::repository::{ClientListQuery, ClientReader};
use crate::services::{ServiceResult, agency_scope, search_term};

/// Returns the filtered list of clients of the user's agency.
pub fn list_clients<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: ClientsQuery,
) -> ServiceResult<ClientsResponse>
where
    R: ClientReader + ?Sized,
{
    let agency_id = agency_scope(user)?;

    let mut query = ClientListQuery::new(agency_id);

    let page = params.page.map(|page| page.max(1));
    if let Some(page) = page {
        query = query.paginate(page, DEFAULT_ITEMS_PER_PAGE);
    }

    if let Some(term) = search_term(params.search) {
        query = query.search(term);
    }

    let (total, clients) = repo.list_clients(query).map_err(|err| {
        log::error!("Failed to list clients of agency {agency_id}: {err}");
        err
    })?;

    Ok(ClientsResponse {
        total,
        page,
        per_page: page.map(|_| DEFAULT_ITEMS_PER_PAGE),
        clients,
    })
}
