use configs::DatabaseConfig;
use mongodb::{
    bson::doc,
    options::ClientOptions,
    Client, Collection, Database,
};
use tracing::info;

use crate::employee::EmployeeDocument;

/// Datastore handle acquired once at startup and released on shutdown.
///
/// `Client` is internally pooled and reference counted, so clones of the
/// collection handle are shared by concurrent requests without extra locking.
#[derive(Clone, Debug)]
pub struct Datastore {
    client: Client,
    database: Database,
    collection: String,
}

impl Datastore {
    /// Build a pooled client from `cfg`, select the database and verify the
    /// connection with a `ping`.
    pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<Self> {
        let mut options = ClientOptions::parse(&cfg.url).await?;
        options.app_name = Some("employee_app".to_string());
        options.connect_timeout = Some(cfg.connect_timeout());
        options.server_selection_timeout = Some(cfg.server_selection_timeout());
        options.max_pool_size = Some(cfg.max_pool_size);
        options.min_pool_size = Some(cfg.min_pool_size);

        let client = Client::with_options(options)?;
        let database = client.database(&cfg.name);
        database.run_command(doc! { "ping": 1 }).await?;
        info!(database = %cfg.name, collection = %cfg.collection, "mongodb_connected");

        Ok(Self { client, database, collection: cfg.collection.clone() })
    }

    pub fn employees(&self) -> Collection<EmployeeDocument> {
        self.database.collection::<EmployeeDocument>(&self.collection)
    }

    /// Close pooled connections. Outstanding handles stop working afterwards.
    pub async fn close(self) {
        self.client.shutdown().await;
        info!("mongodb_disconnected");
    }
}
