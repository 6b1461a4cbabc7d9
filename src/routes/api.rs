use actix_web::{HttpResponse, Responder, get, web};
use serde::Deserialize;

use crate::domain::auth::AuthenticatedUser;
use crate::dto::api::ClientsQuery;
use crate::repository::DieselRepository;
use crate::services::{ServiceError, api as api_service};

#[derive(Deserialize)]
struct ApiV1ClientsQueryParams {
    search: Option<String>,
    page: Option<usize>,
}

#[get("/v1/clients")]
pub async fn api_v1_clients(
    params: web::Query<ApiV1ClientsQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let web::Query(ApiV1ClientsQueryParams { search, page }) = params;

    match api_service::list_clients(repo.get_ref(), &user, ClientsQuery { search, page }) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(err) => {
            log::error!("Failed to list clients: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
