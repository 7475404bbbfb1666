pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use std::path::PathBuf;
use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use db::{create_pool, DbPool};
use domain::ports::{InvoiceRenderer, Mailer, TemplateRepository};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool
        .get()
        .expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

/// Collaborators every handler works against. The repository, renderer,
/// and mailer are trait objects so tests can substitute fakes.
#[derive(Clone)]
pub struct AppState {
    pub templates: Arc<dyn TemplateRepository>,
    pub renderer: Arc<dyn InvoiceRenderer>,
    pub mailer: Arc<dyn Mailer>,
    /// Directory generated PDFs are written to.
    pub output_dir: PathBuf,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::invoice::generate_invoice,
        handlers::templates::list_templates,
        handlers::templates::create_template,
        handlers::templates::get_template_by_name,
    ),
    components(schemas(
        handlers::invoice::InvoiceRequest,
        handlers::invoice::InvoiceRequestHeader,
        handlers::invoice::InvoiceEntity,
        handlers::invoice::InvoiceEntityBank,
        handlers::invoice::InvoiceTaxInfo,
        handlers::templates::TemplateBody,
        handlers::templates::TemplateSummary,
        handlers::templates::TemplateListResponse,
        engine::context::InvoicedItem,
        engine::context::InvoiceLine,
        engine::context::InvoiceHeader,
        engine::context::TaxLine,
        engine::context::InvoiceContext,
    )),
    tags(
        (name = "invoice", description = "Invoice generation"),
        (name = "templates", description = "Rule-set templates"),
    )
)]
pub struct ApiDoc;

/// Route table, shared by `build_server` and the in-process API tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/invoice",
        web::post().to(handlers::invoice::generate_invoice),
    )
    .service(
        web::scope("/api/v1")
            .route(
                "/templates",
                web::get().to(handlers::templates::list_templates),
            )
            .route(
                "/templates",
                web::post().to(handlers::templates::create_template),
            )
            .route(
                "/template/{name}",
                web::get().to(handlers::templates::get_template_by_name),
            ),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
