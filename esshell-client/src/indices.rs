//! Index administration operations.

use crate::error::Result;
use crate::executor::RequestExecutor;
use crate::json::JsonSerializer;
use crate::request::*;
use tracing::info;

/// Index administration facade.
///
/// Every operation comes in a shorthand form taking names, and a `_request`
/// form taking a fully configured request. An empty index list means every
/// index.
pub struct IndicesClient<S> {
    executor: RequestExecutor<S>,
}

impl<S> Clone for IndicesClient<S> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
        }
    }
}

impl<S: JsonSerializer> IndicesClient<S> {
    pub(crate) fn new(executor: RequestExecutor<S>) -> Self {
        Self { executor }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Create an index from a raw JSON body.
    pub fn create_index(&self, index: &str, source: &str) -> Result<S::Output> {
        self.create_index_request(CreateIndexRequest::new(index).source(source))
    }

    /// Create an index from a native structured body.
    pub fn create_index_json(&self, index: &str, source: &S::Input) -> Result<S::Output> {
        let source = self.executor.serializer().json_to_string(source, false)?;
        self.create_index(index, &source)
    }

    /// Create an index.
    pub fn create_index_request(&self, request: CreateIndexRequest) -> Result<S::Output> {
        info!("Creating index: {}", request.index);
        self.executor.execute(request)
    }

    /// Delete an index.
    pub fn delete_index(&self, index: &str) -> Result<S::Output> {
        self.delete_index_request(DeleteIndexRequest::new(index))
    }

    /// Delete indices.
    pub fn delete_index_request(&self, request: DeleteIndexRequest) -> Result<S::Output> {
        info!("Deleting index: {}", request.indices);
        self.executor.execute(request)
    }

    /// Open a closed index.
    pub fn open_index(&self, index: &str) -> Result<S::Output> {
        self.open_index_request(OpenIndexRequest::new(index))
    }

    /// Open indices.
    pub fn open_index_request(&self, request: OpenIndexRequest) -> Result<S::Output> {
        info!("Opening index: {}", request.indices);
        self.executor.execute(request)
    }

    /// Close an open index.
    pub fn close_index(&self, index: &str) -> Result<S::Output> {
        self.close_index_request(CloseIndexRequest::new(index))
    }

    /// Close indices.
    pub fn close_index_request(&self, request: CloseIndexRequest) -> Result<S::Output> {
        info!("Closing index: {}", request.indices);
        self.executor.execute(request)
    }

    // =========================================================================
    // Maintenance
    // =========================================================================

    /// Flush indices.
    pub fn flush(&self, indices: &[&str]) -> Result<S::Output> {
        self.flush_request(FlushRequest::new(Indices::of(indices.iter().copied())))
    }

    /// Flush with options.
    pub fn flush_request(&self, request: FlushRequest) -> Result<S::Output> {
        self.executor.execute(request)
    }

    /// Refresh indices.
    pub fn refresh(&self, indices: &[&str]) -> Result<S::Output> {
        self.refresh_request(RefreshRequest::new(Indices::of(indices.iter().copied())))
    }

    /// Refresh with a configured request.
    pub fn refresh_request(&self, request: RefreshRequest) -> Result<S::Output> {
        self.executor.execute(request)
    }

    /// Optimize indices.
    pub fn optimize(&self, indices: &[&str]) -> Result<S::Output> {
        self.optimize_request(OptimizeRequest::new(Indices::of(indices.iter().copied())))
    }

    /// Optimize with options.
    pub fn optimize_request(&self, request: OptimizeRequest) -> Result<S::Output> {
        info!("Optimizing index: {}", request.indices);
        self.executor.execute(request)
    }

    /// Status of indices.
    pub fn status(&self, indices: &[&str]) -> Result<S::Output> {
        self.status_request(StatusRequest::new(Indices::of(indices.iter().copied())))
    }

    /// Status with a configured request.
    pub fn status_request(&self, request: StatusRequest) -> Result<S::Output> {
        self.executor.execute(request)
    }

    // =========================================================================
    // Listings
    // =========================================================================

    /// Mappings of indices.
    pub fn get_mapping(&self, indices: &[&str]) -> Result<S::Output> {
        self.get_mapping_request(GetMappingRequest::new(Indices::of(indices.iter().copied())))
    }

    /// Mappings, filtered by a configured request.
    pub fn get_mapping_request(&self, request: GetMappingRequest) -> Result<S::Output> {
        self.executor.execute(request)
    }

    /// Settings of indices.
    pub fn get_settings(&self, indices: &[&str]) -> Result<S::Output> {
        self.get_settings_request(GetSettingsRequest::new(Indices::of(indices.iter().copied())))
    }

    /// Settings with a configured request.
    pub fn get_settings_request(&self, request: GetSettingsRequest) -> Result<S::Output> {
        self.executor.execute(request)
    }

    /// Warmers of indices, optionally filtered by a name glob.
    pub fn get_warmer(&self, indices: &[&str], name: Option<&str>) -> Result<S::Output> {
        let mut request = GetWarmerRequest::new(Indices::of(indices.iter().copied()));
        if let Some(name) = name {
            request = request.name(name);
        }
        self.get_warmer_request(request)
    }

    /// Warmers with a configured request.
    pub fn get_warmer_request(&self, request: GetWarmerRequest) -> Result<S::Output> {
        self.executor.execute(request)
    }
}
