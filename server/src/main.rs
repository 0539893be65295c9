use todo_server::{Config, TodoStore};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let store = match &config.data_file {
        Some(path) => TodoStore::open(path).await?,
        None => {
            tracing::warn!("TODO_DATA_FILE not set, todos are kept in memory only");
            TodoStore::new()
        }
    };

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {addr}");
    todo_server::run(listener, todo_server::service(store, &config)).await?;
    Ok(())
}
