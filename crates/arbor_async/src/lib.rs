//! # Arbor Async
//!
//! Asynchronous operation façade for the Arbor coordination client.
//!
//! The façade wraps a synchronous [`OperationExecutor`] and exposes:
//! - fluent builders (`create`, `delete`, `set_data`, `check_exists`) whose
//!   terminal calls return an [`AsyncHandle`]
//! - transaction operation builders that compile to inert
//!   [`TransactionUnit`](arbor_proto::TransactionUnit)s, committed together
//!   with [`AsyncClient::transaction`]
//! - an [`UnhandledErrorListener`] sink for failures no caller observed
//!
//! ## Example
//!
//! ```ignore
//! use arbor_async::{AsyncClient, MockExecutor};
//! use arbor_proto::CreateMode;
//!
//! let client = AsyncClient::new(MockExecutor::new());
//! let path = client
//!     .create()
//!     .with_mode(CreateMode::EphemeralSequential)
//!     .for_path_with_data("/election/n-", "candidate")?
//!     .await?;
//!
//! let txn = client.transaction_op();
//! let units = vec![
//!     txn.check().with_version(3).for_path("/config")?,
//!     txn.set_data().for_path("/config", "v4")?,
//! ];
//! let results = client.transaction(units)?.await?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod bridge;
mod client;
mod compile;
mod config;
mod create;
mod delete;
mod error;
mod executor;
mod exists;
mod handle;
mod listener;
mod set_data;
mod transaction_op;

pub use bridge::CompletionBridge;
pub use client::AsyncClient;
pub use compile::{
    CreateConfig, DeleteConfig, ExistsConfig, SetDataConfig, TxnCreateConfig, TxnTemplate,
};
pub use config::{ClientConfig, Dispatch};
pub use create::AsyncCreateBuilder;
pub use delete::AsyncDeleteBuilder;
pub use error::{ArborError, ArborResult, ErrorClass};
pub use executor::{MockExecutor, OperationExecutor, OperationResult};
pub use exists::AsyncExistsBuilder;
pub use handle::AsyncHandle;
pub use listener::{LoggingListener, RecordingListener, UnhandledErrorListener};
pub use set_data::AsyncSetDataBuilder;
pub use transaction_op::{
    TransactionCheckBuilder, TransactionCreateBuilder, TransactionDeleteBuilder, TransactionOp,
    TransactionSetDataBuilder,
};
