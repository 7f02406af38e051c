//! The transport seam between the engine and the server.

use async_trait::async_trait;
use thiserror::Error;

use crate::wire::{
  AnalysisRequest,
  AnalysisResponse,
  SearchFailurePayload,
  SearchRequest,
  SearchResults,
};

/// Failure of one search call as seen by the transport.
#[derive(Debug, Error)]
pub enum SearchCallError {
  /// The server answered with a structured error body (query rejected).
  #[error("{}", .0.message)]
  Rejected(SearchFailurePayload),
  /// The call never produced a structured answer (network, 5xx, bad JSON).
  #[error(transparent)]
  Transport(#[from] anyhow::Error),
}

/// The two server calls the engine makes. Implementations own the HTTP
/// stack (or are test doubles); the engine only ever sees this contract.
#[async_trait]
pub trait QueryClient: Send + Sync {
  /// `POST analyze-query`. A transport or server failure is an `Err` and is
  /// never surfaced to the user; suggestions are best-effort.
  async fn analyze(&self, request: AnalysisRequest) -> anyhow::Result<AnalysisResponse>;

  /// Submit a search for one page of results.
  async fn search(&self, request: SearchRequest) -> Result<SearchResults, SearchCallError>;
}
