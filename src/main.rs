use actix_web::{middleware::Logger, web, App, HttpServer};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use todo_web::{config::Config, routes, TodoStore};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  let config = Config::parse();

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log));
  tracing_subscriber::fmt().with_env_filter(filter).init();

  let store = TodoStore::open(&config.database, config.pool_size)?;
  tracing::info!(database = %config.database.display(), "opened todo store");

  let mut server = HttpServer::new(move || {
    App::new()
      .wrap(Logger::default())
      .app_data(web::Data::new(store.clone()))
      .configure(routes::configure)
  });
  if let Some(workers) = config.workers {
    server = server.workers(workers);
  }

  tracing::info!(bind = %config.bind, "listening");
  server.bind(&config.bind)?.run().await?;

  Ok(())
}
