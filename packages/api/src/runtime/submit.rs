//! The `submit` pipeline: negotiate, build, send, decode

use std::sync::Arc;

use http::header::{ACCEPT, CONTENT_TYPE};
use http::uri::{Authority, Scheme};
use http::{Request, Response, Uri};
use http_body_util::BodyExt;
use oasrt_client::auth::ClientAuthInfoWriter;
use oasrt_client::error::{self, Result};
use oasrt_client::media::{self, Consumer};
use oasrt_client::transport::{self, Body};
use oasrt_client::{ClientRequest, ClientResponse, Context, ResponseReader, dump, scheme};

use super::Runtime;
use crate::ClientOperation;

impl Runtime {
    /// Execute `operation` and decode its response.
    ///
    /// The request body media type is the first non-empty entry of the
    /// operation's consumes list, else the runtime default. The response is
    /// decoded with the consumer registered for its `Content-Type`, falling
    /// back to a `*/*` consumer. The reader's result is returned unchanged and
    /// the response body is closed before this returns.
    ///
    /// An operation context is used as-is. Without one, the runtime context
    /// (or a background one) gets the request timeout layered on; a zero
    /// timeout adds no deadline. The context covers the whole exchange,
    /// including the response body read.
    ///
    /// # Errors
    ///
    /// - parameter writer and auth errors, unchanged
    /// - `NoProducer` before any network activity when the request media
    ///   type has no producer and is not a form type
    /// - `Dump` when debug tracing cannot render the request
    /// - `Transport` for network, TLS, cancellation and deadline failures
    /// - `ContentType` / `NoConsumer` from response negotiation
    pub async fn submit<R: ResponseReader>(&self, operation: &ClientOperation<R>) -> Result<R::Output> {
        let mut request = ClientRequest::new(
            operation.method.clone(),
            operation.path_pattern.clone(),
            Arc::clone(&operation.params),
        )?;
        request.set_header_param(ACCEPT.as_str(), &operation.produces_media_types)?;

        let auth = operation
            .auth_info
            .as_ref()
            .or(self.default_authentication.as_ref())
            .map(|auth| &**auth as &dyn ClientAuthInfoWriter);

        let media_type = operation
            .consumes_media_types
            .iter()
            .find(|mt| !mt.is_empty())
            .map_or(self.default_media_type.as_str(), String::as_str);

        if !self.producers.contains_key(media_type) && !media::is_form_media_type(media_type) {
            return Err(error::no_producer(media_type, self.producers.keys()));
        }

        let wire = request.build_http(media_type, &self.base_path, &self.producers, &self.formats, auth)?;
        let wire = self.with_origin(wire, &operation.schemes)?;

        let client = self.client();
        let client = operation.client.as_ref().unwrap_or(client);

        if self.debug {
            let dumped = dump::dump_request(&wire)?;
            self.logger.debugf(format_args!("{dumped}\n"));
        }

        let (ctx, _cancel_on_return) = match &operation.context {
            Some(ctx) => ctx.with_cancel(),
            None => {
                let parent = self.context.clone().unwrap_or_else(Context::background);
                let timeout = request.timeout();
                if timeout.is_zero() {
                    parent.with_cancel()
                } else {
                    parent.with_timeout(timeout)
                }
            }
        };

        let url = oasrt_client::Url::parse(&wire.uri().to_string()).ok();
        let exchange = async {
            let response = client.execute(wire.map(transport::full)).await?;
            self.receive(response, &operation.reader).await
        };
        ctx.run(exchange).await.map_err(|e| match &url {
            Some(url) => error::transport(e).with_url(url.clone()),
            None => error::transport(e),
        })?
    }

    /// Trace, negotiate and read one response. The body is closed on return.
    async fn receive<R: ResponseReader>(&self, response: Response<Body>, reader: &R) -> Result<R::Output> {
        let response = if self.debug {
            self.trace_response(response).await?
        } else {
            response
        };
        let mut response = ClientResponse::new(response);

        let content_type = match response.headers().get(CONTENT_TYPE) {
            Some(value) => value.to_str().map_err(error::content_type)?.to_owned(),
            None => String::new(),
        };
        let content_type = if content_type.is_empty() {
            self.default_media_type.clone()
        } else {
            content_type
        };
        let parsed = media::parse_media_type(&content_type)?;

        let consumer: &dyn Consumer = self
            .consumers
            .get(&parsed)
            .or_else(|| self.consumers.get(media::WILDCARD_MIME))
            .map(|consumer| &**consumer)
            .ok_or_else(|| error::no_consumer(&content_type))?;

        let result = reader.read_response(&mut response, consumer).await;
        drop(response);
        result
    }

    /// Point a path-only request at the runtime host over the picked scheme.
    fn with_origin<B>(&self, request: Request<B>, operation_schemes: &[String]) -> Result<Request<B>> {
        let (mut parts, body) = request.into_parts();
        let mut uri = parts.uri.into_parts();
        uri.scheme = Some(
            scheme::pick_scheme(&self.schemes, operation_schemes)
                .parse::<Scheme>()
                .map_err(error::builder)?,
        );
        uri.authority = Some(self.host.parse::<Authority>().map_err(error::builder)?);
        parts.uri = Uri::from_parts(uri).map_err(error::builder)?;
        Ok(Request::from_parts(parts, body))
    }

    /// Log the response and hand back an equivalent one with the body buffered.
    async fn trace_response(&self, response: Response<Body>) -> Result<Response<Body>> {
        let (parts, body) = response.into_parts();
        let bytes = body.collect().await.map_err(error::dump)?.to_bytes();
        self.logger
            .debugf(format_args!("{}\n", dump::dump_response(&parts, &bytes)));
        Ok(Response::from_parts(parts, transport::full(bytes)))
    }
}
