//! Resource schemas
//!
//! One module per resource kind: the response type, its create/update
//! payloads, its status machine and any kind-specific operations.

mod connection;
mod datalake;
mod hosting_environment;
mod link;
mod source_app;

pub use connection::{Connection, ConnectionStatus, CreateConnectionRequest, UpdateConnectionRequest};
pub use datalake::{
    CreateDatalakeRequest, Datalake, DatalakeStatus, DatalakeType, UpdateDatalakeRequest,
};
pub use hosting_environment::{
    CloudProvider, CreateHostingEnvironmentRequest, HostingEnvironment, HostingEnvironmentStatus,
    HostingEnvironmentType, InfrastructureMetadata, PostConnectionRequest,
    UpdateHostingEnvironmentRequest,
};
pub use link::{CreateSourceAppDatalakeLinkRequest, SourceAppDatalakeLink};
pub use source_app::{
    CreateSourceAppRequest, SourceApp, SourceAppStatus, SourceAppType, UpdateSourceAppRequest,
};
