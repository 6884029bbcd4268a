use std::path::PathBuf;

use clap::Parser;

/// Command line and environment configuration for the server.
#[derive(Debug, Clone, Parser)]
#[command(name = "todo-web", version, about = "A small web TODO list")]
pub struct Config {
  /// Address the HTTP server listens on.
  #[arg(long, env = "TODO_BIND", default_value = "127.0.0.1:8080")]
  pub bind: String,

  /// SQLite database file, created on first start.
  #[arg(long, env = "TODO_DATABASE", default_value = "todo.db")]
  pub database: PathBuf,

  /// Maximum number of pooled database connections.
  #[arg(long, env = "TODO_POOL_SIZE", default_value_t = 8)]
  pub pool_size: u32,

  /// HTTP worker threads; defaults to the number of physical cores.
  #[arg(long, env = "TODO_WORKERS")]
  pub workers: Option<usize>,

  /// Log filter used when RUST_LOG is unset.
  #[arg(long, env = "TODO_LOG", default_value = "info")]
  pub log: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults() {
    let config = Config::try_parse_from(["todo-web"]).unwrap();
    assert_eq!(config.bind, "127.0.0.1:8080");
    assert_eq!(config.database, PathBuf::from("todo.db"));
    assert_eq!(config.pool_size, 8);
    assert_eq!(config.workers, None);
  }

  #[test]
  fn flags_override_defaults() {
    let config = Config::try_parse_from([
      "todo-web",
      "--bind",
      "0.0.0.0:9000",
      "--database",
      "/tmp/t.db",
      "--workers",
      "2",
    ])
    .unwrap();
    assert_eq!(config.bind, "0.0.0.0:9000");
    assert_eq!(config.database, PathBuf::from("/tmp/t.db"));
    assert_eq!(config.workers, Some(2));
  }
}
