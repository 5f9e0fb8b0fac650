use tracing::debug;

use super::{ComputeBackend, Operation};
use crate::error::Result;

/// Scoped execution session for one operation.
///
/// The backend session is released when the guard is dropped, including on
/// early return when a timed trial fails.
pub struct Session<B: ComputeBackend> {
    inner: B::Session,
    operation: Operation,
}

impl<B: ComputeBackend> Session<B> {
    pub fn open(ctx: &B::Context, operation: Operation) -> Result<Self> {
        let inner = B::open_session(ctx)?;
        debug!(backend = B::NAME, %operation, "Opened session");
        Ok(Self { inner, operation })
    }

    pub fn get(&self) -> &B::Session {
        &self.inner
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }
}

impl<B: ComputeBackend> Drop for Session<B> {
    fn drop(&mut self) {
        debug!(backend = B::NAME, operation = %self.operation, "Releasing session");
    }
}
