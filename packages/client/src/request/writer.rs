use super::ClientRequest;
use crate::error::Result;
use crate::formats::Formats;

/// The parameter bag of an operation.
///
/// Generated parameter types implement this to place their values on the
/// request as path, query, header, form or body params.
pub trait ClientRequestWriter: Send + Sync {
    /// # Errors
    ///
    /// Any error is passed through to the caller of `submit` unchanged.
    fn write_to_request(&self, request: &mut ClientRequest, formats: &Formats) -> Result<()>;
}

impl<F> ClientRequestWriter for F
where
    F: Fn(&mut ClientRequest, &Formats) -> Result<()> + Send + Sync,
{
    fn write_to_request(&self, request: &mut ClientRequest, formats: &Formats) -> Result<()> {
        self(request, formats)
    }
}

/// Writer for operations without parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoParams;

impl ClientRequestWriter for NoParams {
    fn write_to_request(&self, _request: &mut ClientRequest, _formats: &Formats) -> Result<()> {
        Ok(())
    }
}
