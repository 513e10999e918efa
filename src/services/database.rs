use crate::config::Config;
use crate::error::{AppError, Result};
use serde::{de::DeserializeOwned, Serialize};
use surrealdb::engine::remote::http::{Client, Http};
use surrealdb::opt::auth::Root;
use surrealdb::{Response, Surreal};
use tracing::{error, info};

/// Thin wrapper around the SurrealDB HTTP client. All persistence in the
/// service layer goes through this type.
#[derive(Clone)]
pub struct Database {
    client: Surreal<Client>,
    pub config: Config,
}

impl Database {
    pub async fn new(config: &Config) -> Result<Self> {
        info!("Initializing database connection to {}", config.database_url);

        let client = Surreal::new::<Http>(config.database_url.as_str()).await?;
        client
            .signin(Root {
                username: &config.database_username,
                password: &config.database_password,
            })
            .await?;
        client
            .use_ns(&config.database_namespace)
            .use_db(&config.database_name)
            .await?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub async fn verify_connection(&self) -> Result<()> {
        match self.client.query("INFO FOR DB").await {
            Ok(_) => {
                info!("Database connection verified successfully");
                Ok(())
            }
            Err(e) => {
                error!("Failed to verify database connection: {}", e);
                Err(AppError::from(e))
            }
        }
    }

    pub async fn query(&self, sql: &str) -> Result<Response> {
        self.client.query(sql).await.map_err(AppError::from)
    }

    pub async fn query_with_params<P>(&self, sql: &str, params: P) -> Result<Response>
    where
        P: Serialize,
    {
        self.client
            .query(sql)
            .bind(params)
            .await
            .map_err(AppError::from)
    }

    /// Creates a record, using the `id` field of `data` as the record id.
    pub async fn create<T>(&self, table: &str, data: T) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        let created: Vec<T> = self.client.create(table).content(data).await?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| AppError::internal("Failed to create record"))
    }

    pub async fn get_by_id<T>(&self, table: &str, id: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send + Sync,
    {
        self.client.select((table, id)).await.map_err(AppError::from)
    }

    /// Replaces the record content wholesale, the load-mutate-save shape used
    /// by every article mutation.
    pub async fn update_by_id<T>(&self, table: &str, id: &str, data: T) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        self.client
            .update((table, id))
            .content(data)
            .await
            .map_err(AppError::from)
    }

    pub async fn delete_by_id(&self, table: &str, id: &str) -> Result<()> {
        let _: Option<serde_json::Value> =
            self.client.delete((table, id)).await.map_err(AppError::from)?;
        Ok(())
    }

    pub async fn select<T>(&self, table: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send + Sync,
    {
        self.client.select(table).await.map_err(AppError::from)
    }
}
