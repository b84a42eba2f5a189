use std::sync::Arc;

use echohorn::api::DynAPI;
use echohorn::config::Config;
use echohorn::db::PgStore;
use echohorn::engine::Engine;
use echohorn::error::Error;
use echohorn::notifier::{DisabledMailer, MailSink, Notifier, SmtpMailer};
use echohorn::server::serve;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("echohorn=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let store = PgStore::new(&config.database_url, config.database_max_connections).await?;

    let mailer: Arc<dyn MailSink> = match &config.smtp {
        Some(smtp) => match SmtpMailer::new(smtp) {
            Ok(mailer) => Arc::new(mailer),
            Err(err) => {
                tracing::warn!(error = %err, "invalid SMTP settings, email notifications disabled");
                Arc::new(DisabledMailer)
            }
        },
        None => {
            tracing::warn!("SMTP credentials not set, email notifications disabled");
            Arc::new(DisabledMailer)
        }
    };

    let notifier = Notifier::spawn(mailer, config.admin_email.clone());
    let engine = Engine::new(Arc::new(store), notifier);

    serve(Arc::new(engine) as DynAPI, config.bind_addr).await
}
