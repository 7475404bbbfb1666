use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::engine::context::{InvoiceContext, InvoicedItem};
use crate::engine::rules::Rule;
use crate::engine::InvoicingEngine;
use crate::errors::AppError;
use crate::AppState;

use super::blocking_error;
use super::templates::GET_DETAIL;

// ── Request DTOs ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct InvoiceRequestHeader {
    /// Numeric invoice number, e.g. "42".
    pub number: String,
    pub timestamp: DateTime<Utc>,
    /// Accepted for wire compatibility; the engine consumes the top-level
    /// `items` list.
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub items: Vec<Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InvoiceEntityBank {
    pub iban: String,
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InvoiceTaxInfo {
    pub id: String,
    #[serde(default)]
    pub registration_number: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InvoiceEntity {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub bank: Option<InvoiceEntityBank>,
    pub tax_info: InvoiceTaxInfo,
    #[serde(default)]
    pub admin_location: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InvoiceRequest {
    pub header: InvoiceRequestHeader,
    #[serde(default)]
    pub send_mail: bool,
    #[serde(default)]
    pub address: Option<String>,
    /// Stored rule-set to price the invoice with; the built-in default
    /// rule-set applies when absent.
    #[serde(default)]
    pub template_name: Option<String>,
    pub buyer: InvoiceEntity,
    pub seller: InvoiceEntity,
    pub items: Vec<InvoicedItem>,
}

// ── Handler ──────────────────────────────────────────────────────────────────

/// POST /invoice
///
/// Prices the requested items with the selected rule-set, writes the PDF,
/// and optionally mails it. Request validation happens before any
/// repository, engine, or render work.
#[utoipa::path(
    post,
    path = "/invoice",
    request_body = InvoiceRequest,
    responses(
        (status = 201, description = "Invoice generated", body = InvoiceContext),
        (status = 404, description = "Requested template does not exist"),
        (status = 422, description = "Self-inconsistent request"),
        (status = 502, description = "Invoice generated but mail delivery failed"),
        (status = 507, description = "Template repository failure"),
    ),
    tag = "invoice"
)]
pub async fn generate_invoice(
    state: web::Data<AppState>,
    body: web::Json<InvoiceRequest>,
) -> Result<HttpResponse, AppError> {
    let request = body.into_inner();

    if request.send_mail && request.address.as_deref().map_or(true, str::is_empty) {
        return Err(AppError::Input(
            "Address was not provided but send_mail is set to True.".to_string(),
        ));
    }
    let number: u32 = request.header.number.trim().parse().map_err(|_| {
        AppError::Input(format!(
            "invoice number '{}' is not numeric",
            request.header.number
        ))
    })?;

    let rules = load_rules(&state, request.template_name.as_deref()).await?;

    let engine = InvoicingEngine::new(rules);
    let context = engine.process(number, request.header.timestamp, &request.items);

    let path = state.output_dir.join(context.pdf_file_name());
    {
        let renderer = state.renderer.clone();
        let render_context = context.clone();
        let render_path = path.clone();
        web::block(move || renderer.render(&render_context, &render_path))
            .await
            .map_err(blocking_error)??;
    }
    log::debug!("invoice {} written to {}", number, path.display());

    if request.send_mail {
        let mailer = state.mailer.clone();
        let to = request.address.clone().unwrap_or_default();
        let invoice_number = request.header.number.clone();
        let seller_name = request.seller.name.clone();
        web::block(move || mailer.send_invoice(&to, &invoice_number, &seller_name, &path))
            .await
            .map_err(blocking_error)??;
    }

    Ok(HttpResponse::Created().json(context))
}

/// Load the requested rule-set from the repository, or fall back to the
/// built-in default. Unknown rule names in a stored template fail here,
/// before any rule is applied.
async fn load_rules(
    state: &web::Data<AppState>,
    template_name: Option<&str>,
) -> Result<Vec<Rule>, AppError> {
    let Some(name) = template_name else {
        return Ok(Rule::default_set());
    };

    let repo = state.templates.clone();
    let key = name.to_string();
    let template = web::block(move || repo.get_by_key(&key))
        .await
        .map_err(blocking_error)?
        .map_err(|e| AppError::from_repo("get", GET_DETAIL, e))?
        .ok_or(AppError::NotFound)?;

    Ok(Rule::parse_all(&template.rules)?)
}
