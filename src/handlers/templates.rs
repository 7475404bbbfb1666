use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::template::Template;
use crate::errors::AppError;
use crate::AppState;

use super::blocking_error;

pub(crate) const LIST_DETAIL: &str = "error reading from template repository";
pub(crate) const CREATE_DETAIL: &str = "error creating template in template repository";
pub(crate) const GET_DETAIL: &str = "repo error while getting template by name";

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TemplateBody {
    pub name: String,
    /// Ordered rule objects, stored verbatim; validated when loaded into
    /// the invoicing engine.
    #[schema(value_type = Vec<Object>)]
    pub rules: Vec<Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TemplateSummary {
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TemplateListResponse {
    pub count: usize,
    pub items: Vec<TemplateSummary>,
}

impl From<Template> for TemplateBody {
    fn from(t: Template) -> Self {
        Self {
            name: t.name,
            rules: t.rules,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/v1/templates
#[utoipa::path(
    get,
    path = "/api/v1/templates",
    responses(
        (status = 200, description = "All stored templates", body = TemplateListResponse),
        (status = 507, description = "Template repository failure"),
    ),
    tag = "templates"
)]
pub async fn list_templates(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let repo = state.templates.clone();

    let templates = web::block(move || repo.list())
        .await
        .map_err(blocking_error)?
        .map_err(|e| AppError::from_repo("list", LIST_DETAIL, e))?;

    let items: Vec<TemplateSummary> = templates
        .into_iter()
        .map(|t| TemplateSummary { name: t.name })
        .collect();
    Ok(HttpResponse::Ok().json(TemplateListResponse {
        count: items.len(),
        items,
    }))
}

/// POST /api/v1/templates
#[utoipa::path(
    post,
    path = "/api/v1/templates",
    request_body = TemplateBody,
    responses(
        (status = 201, description = "Template created", body = TemplateBody),
        (status = 409, description = "A template with that name already exists"),
        (status = 507, description = "Template repository failure"),
    ),
    tag = "templates"
)]
pub async fn create_template(
    state: web::Data<AppState>,
    body: web::Json<TemplateBody>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let repo = state.templates.clone();

    let created = web::block(move || repo.create(Template::new(body.name, body.rules)))
        .await
        .map_err(blocking_error)?
        .map_err(|e| AppError::from_repo("create", CREATE_DETAIL, e))?;

    Ok(HttpResponse::Created().json(TemplateBody::from(created)))
}

/// GET /api/v1/template/{name}
#[utoipa::path(
    get,
    path = "/api/v1/template/{name}",
    params(("name" = String, Path, description = "Template name")),
    responses(
        (status = 200, description = "Template found", body = TemplateBody),
        (status = 404, description = "No template with that name"),
        (status = 507, description = "Template repository failure"),
    ),
    tag = "templates"
)]
pub async fn get_template_by_name(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let name = path.into_inner();
    let repo = state.templates.clone();

    let template = web::block(move || repo.get_by_key(&name))
        .await
        .map_err(blocking_error)?
        .map_err(|e| AppError::from_repo("get", GET_DETAIL, e))?;

    match template {
        Some(t) => Ok(HttpResponse::Ok().json(TemplateBody::from(t))),
        None => Err(AppError::NotFound),
    }
}
