//! Typed Rust client for the Traceforce control-plane API.
//!
//! The control plane manages hosting environments, the datalakes and source
//! apps deployed into them, connections, and the links between source apps and
//! datalakes. Every kind is served through the same generic
//! [`ResourceClient`], so create / list / get / update / delete behave
//! identically across kinds.
//!
//! # Example
//!
//! ```no_run
//! use traceforce::models::{
//!     CloudProvider, CreateHostingEnvironmentRequest, HostingEnvironmentType,
//!     InfrastructureMetadata, PostConnectionRequest,
//! };
//! use traceforce::{Client, ClientOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(&std::env::var("TRACEFORCE_API_KEY")?, None, ClientOptions::default())?;
//!
//! let env = client
//!     .hosting_environments()
//!     .create(&CreateHostingEnvironmentRequest {
//!         name: "prod".to_string(),
//!         kind: HostingEnvironmentType::CustomerManaged,
//!         cloud_provider: Some(CloudProvider::Gcp),
//!         native_id: "my-project".to_string(),
//!     })
//!     .await?;
//!
//! let metadata = InfrastructureMetadata {
//!     terraform_module_versions: r#"{"datalake":"1.4.0"}"#.to_string(),
//!     control_plane_aws_account_id: None,
//!     control_plane_role_name: None,
//! };
//! let env = client
//!     .hosting_environments()
//!     .post_connection(&env.id, &PostConnectionRequest::new(metadata))
//!     .await?;
//! println!("{} is {}", env.name, env.status);
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All operations return `Result<T, ClientError>`. Invalid identifiers and
//! payloads fail before any request is made; the client never retries.
//!
//! ```no_run
//! # use traceforce::{Client, ClientError};
//! # async fn example(client: Client, id: &str) -> Result<(), ClientError> {
//! match client.datalakes().get(id).await {
//!     Ok(datalake) => println!("Found: {}", datalake.name),
//!     Err(e) if e.is_not_found() => println!("Datalake not found"),
//!     Err(e) => println!("Error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod models;
pub mod resource;

pub use api::client::{Client, ClientOptions, DEFAULT_BASE_URL};
pub use api::error::{ApiError, ClientError, Result, TransportError, ValidationError};
pub use resource::{HasStatus, Lifecycle, Resource, ResourceClient, Updatable};
pub use tokio_util::sync::CancellationToken;
