//! Docker images and containers.
//!
//! - `container`: the domain objects shown in the dashboard
//! - `row`: pure mapping from an object to a list row
//! - `backend`: the contract the dashboard talks to
//! - `discovery`: the Docker CLI implementation of that contract

pub mod backend;
pub mod container;
pub mod discovery;
pub mod row;

pub use backend::{BackendError, DockerBackend, LogFeed, LogLines, LogStop};
pub use container::{DockerContainer, DockerImage, DomainObject, SHORT_ID_LEN, short_id};
pub use discovery::DockerCli;
pub use row::{CellKind, ColumnWidth, Row, RowCell, format_relative, render_row};
