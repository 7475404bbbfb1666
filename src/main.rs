use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use dotenvy::dotenv;

use invoice_service::config::MailConfig;
use invoice_service::domain::ports::TemplateRepository;
use invoice_service::infrastructure::memory::InMemoryTemplateRepository;
use invoice_service::infrastructure::pdf::PdfInvoiceRenderer;
use invoice_service::infrastructure::smtp::SmtpMailer;
use invoice_service::infrastructure::template_repo::DieselTemplateRepository;
use invoice_service::{build_server, create_pool, run_migrations, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .expect("PORT must be a valid number");
    let output_dir = PathBuf::from(
        env::var("INVOICE_UTILS_OUTPUT_DIR").unwrap_or_else(|_| ".".to_string()),
    );

    let templates: Arc<dyn TemplateRepository> = match env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = create_pool(&url).expect("Failed to create database connection pool");
            run_migrations(&pool);
            Arc::new(DieselTemplateRepository::new(pool))
        }
        Err(_) => {
            log::warn!("DATABASE_URL is not set; templates are stored in memory only");
            Arc::new(InMemoryTemplateRepository::new())
        }
    };

    let mailer = SmtpMailer::new(MailConfig::from_env())
        .expect("Failed to load mail body templates");

    let state = AppState {
        templates,
        renderer: Arc::new(PdfInvoiceRenderer::new()),
        mailer: Arc::new(mailer),
        output_dir,
    };

    log::info!("Starting server at http://{}:{}", host, port);

    build_server(state, &host, port)?.await
}
