#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::JwtHandler;
use catalog_service::config::CorsConfig;
use catalog_service::domain::identity::models::Identity;
use catalog_service::domain::identity::models::IdentityId;
use catalog_service::domain::identity::models::Username;
use catalog_service::domain::identity::ports::IdentityRepository;
use catalog_service::domain::identity::service::IdentityService;
use catalog_service::domain::product::models::Product;
use catalog_service::domain::product::models::ProductFilter;
use catalog_service::domain::product::models::ProductId;
use catalog_service::domain::product::ports::ProductRepository;
use catalog_service::domain::product::service::ProductService;
use catalog_service::domain::store::Mutation;
use catalog_service::domain::store::MutationOutcome;
use catalog_service::domain::store::StoreFailure;
use catalog_service::domain::store::TransactionalStore;
use catalog_service::inbound::http::router::create_router;
use catalog_service::outbound::repositories::PostgresIdentityRepository;
use catalog_service::outbound::repositories::PostgresProductRepository;
use catalog_service::outbound::repositories::PostgresStore;
use serde_json::json;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const JWT_ISSUER: &str = "catalog-service-test";
pub const JWT_AUDIENCE: &str = "catalog-clients-test";
pub const JWT_EXPIRATION_HOURS: i64 = 6;

/// Handler configured exactly like the one the test server signs with.
pub fn jwt_handler() -> JwtHandler {
    JwtHandler::new(JWT_SECRET)
        .with_issuer(JWT_ISSUER)
        .with_audience(JWT_AUDIENCE)
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: Option<TestDb>,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    /// Spawn the application backed by in-memory adapters.
    pub async fn spawn() -> Self {
        let store = Arc::new(InMemoryStore::default());

        let authenticator = Arc::new(Authenticator::new(jwt_handler(), JWT_EXPIRATION_HOURS));
        let identity_service = Arc::new(IdentityService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&authenticator),
        ));
        let product_service = Arc::new(ProductService::new(Arc::clone(&store), store));

        let router = create_router(
            identity_service,
            product_service,
            authenticator,
            &CorsConfig::default(),
        );

        Self::serve(router, None).await
    }

    /// Spawn the application against a throwaway PostgreSQL database.
    ///
    /// Returns `None` when `DATABASE_URL` is not set.
    pub async fn spawn_with_postgres() -> Option<Self> {
        let db = TestDb::try_new().await?;

        let store = Arc::new(PostgresStore::new(db.pool.clone()));
        let authenticator = Arc::new(Authenticator::new(jwt_handler(), JWT_EXPIRATION_HOURS));
        let identity_service = Arc::new(IdentityService::new(
            Arc::new(PostgresIdentityRepository::new(db.pool.clone())),
            Arc::clone(&store),
            Arc::clone(&authenticator),
        ));
        let product_service = Arc::new(ProductService::new(
            Arc::new(PostgresProductRepository::new(db.pool.clone())),
            store,
        ));

        let router = create_router(
            identity_service,
            product_service,
            authenticator,
            &CorsConfig::default(),
        );

        Some(Self::serve(router, Some(db)).await)
    }

    async fn serve(router: axum::Router, db: Option<TestDb>) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            db,
            api_client: reqwest::Client::new(),
            jwt_handler: jwt_handler(),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register an identity and return a bearer token for it.
    pub async fn register_and_login(&self, username: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/register")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let response = self
            .post("/api/auth/login")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Missing token")
            .to_string()
    }

    /// Create a product and return its id.
    pub async fn create_product(&self, token: &str, name: &str, price: f64) -> i64 {
        let response = self
            .post_authenticated("/api/products", token)
            .json(&json!({
                "name": name,
                "description": format!("{} description", name),
                "price": price
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"].as_i64().expect("Missing product id")
    }
}

#[derive(Default)]
struct Tables {
    identities: BTreeMap<i64, Identity>,
    products: BTreeMap<i64, Product>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory adapter for every outbound port.
///
/// Mirrors the PostgreSQL adapter: unique usernames, zero-row writes reported as `NoEffect`.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

#[async_trait]
impl IdentityRepository for InMemoryStore {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Identity>, StoreFailure> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .identities
            .values()
            .find(|identity| identity.username == *username)
            .cloned())
    }
}

#[async_trait]
impl TransactionalStore<Identity> for InMemoryStore {
    async fn mutate(
        &self,
        mutation: Mutation<Identity>,
    ) -> Result<MutationOutcome<Identity>, StoreFailure> {
        let mut tables = self.tables.lock().unwrap();
        match mutation {
            Mutation::Insert(draft) => {
                if tables
                    .identities
                    .values()
                    .any(|identity| identity.username == draft.username)
                {
                    return Err(StoreFailure::Conflict(
                        "duplicate key value violates unique constraint".to_string(),
                    ));
                }
                let id = tables.next_id();
                let identity = Identity {
                    id: IdentityId(id),
                    username: draft.username,
                    password: draft.password,
                };
                tables.identities.insert(id, identity.clone());
                Ok(MutationOutcome::Committed(identity))
            }
            Mutation::Update(identity) => match tables.identities.get_mut(&identity.id.0) {
                Some(stored) => {
                    *stored = identity.clone();
                    Ok(MutationOutcome::Committed(identity))
                }
                None => Ok(MutationOutcome::NoEffect),
            },
            Mutation::Delete(identity) => match tables.identities.remove(&identity.id.0) {
                Some(_) => Ok(MutationOutcome::Committed(identity)),
                None => Ok(MutationOutcome::NoEffect),
            },
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreFailure> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.products.get(&id.0).cloned())
    }

    async fn find_matching(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreFailure> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .products
            .values()
            .filter(|product| filter.matches(product))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TransactionalStore<Product> for InMemoryStore {
    async fn mutate(
        &self,
        mutation: Mutation<Product>,
    ) -> Result<MutationOutcome<Product>, StoreFailure> {
        let mut tables = self.tables.lock().unwrap();
        match mutation {
            Mutation::Insert(draft) => {
                let id = tables.next_id();
                let product = Product {
                    id: ProductId(id),
                    name: draft.name,
                    description: draft.description,
                    price: draft.price,
                    created_at: draft.created_at,
                };
                tables.products.insert(id, product.clone());
                Ok(MutationOutcome::Committed(product))
            }
            Mutation::Update(product) => match tables.products.get_mut(&product.id.0) {
                Some(stored) => {
                    *stored = product.clone();
                    Ok(MutationOutcome::Committed(product))
                }
                None => Ok(MutationOutcome::NoEffect),
            },
            Mutation::Delete(product) => match tables.products.remove(&product.id.0) {
                Some(_) => Ok(MutationOutcome::Committed(product)),
                None => Ok(MutationOutcome::NoEffect),
            },
        }
    }
}

/// Test database helper
pub struct TestDb {
    pub pool: PgPool,
    pub db_name: String,
    server_url: String,
}

impl TestDb {
    /// Create a uniquely named database on the server at `DATABASE_URL` and migrate it.
    ///
    /// Returns `None` when `DATABASE_URL` is not set, so suites can skip.
    pub async fn try_new() -> Option<Self> {
        let server_url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                eprintln!("DATABASE_URL not set; skipping PostgreSQL test");
                return None;
            }
        };

        let db_name = format!(
            "test_catalog_service_{}",
            uuid::Uuid::new_v4().to_string().replace('-', "_")
        );

        let mut conn = PgConnection::connect(&server_url)
            .await
            .expect("Failed to connect to Postgres");

        conn.execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to create test database");

        let options = server_url
            .parse::<PgConnectOptions>()
            .expect("Failed to parse DATABASE_URL")
            .database(&db_name);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(Self {
            pool,
            db_name,
            server_url,
        })
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        // Database cleanup happens asynchronously
        let db_name = self.db_name.clone();
        let server_url = self.server_url.clone();
        tokio::spawn(async move {
            if let Ok(mut conn) = PgConnection::connect(&server_url).await {
                let _ = conn
                    .execute(
                        format!(
                            r#"SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}';"#,
                            db_name
                        )
                        .as_str(),
                    )
                    .await;

                let _ = conn
                    .execute(format!(r#"DROP DATABASE IF EXISTS "{}";"#, db_name).as_str())
                    .await;
            }
        });
    }
}
