//! Hyper integration helpers.

use std::{future::Future, pin::Pin, sync::Arc};

use base64::Engine as _;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{service::Service, Request, Response, StatusCode};

use crate::{ObjectStore, UploadLedger, UploadRequest, UploadResponse, Uploader};

/// Boxed error type used by [`UploadService`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service wrapper answering every request through [`Uploader::handle`].
pub struct UploadService<S, L> {
    uploader: Arc<Uploader<S, L>>,
}

impl<S, L> Clone for UploadService<S, L> {
    fn clone(&self) -> Self {
        Self {
            uploader: Arc::clone(&self.uploader),
        }
    }
}

impl<S, L> std::fmt::Debug for UploadService<S, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadService")
            .field("uploader", &"<uploader>")
            .finish()
    }
}

impl<S, L> UploadService<S, L> {
    /// Creates a new Hyper service around a configured uploader.
    pub fn new(uploader: Arc<Uploader<S, L>>) -> Self {
        Self { uploader }
    }
}

impl<S, L, ReqBody> Service<Request<ReqBody>> for UploadService<S, L>
where
    S: ObjectStore,
    L: UploadLedger,
    ReqBody: hyper::body::Body<Data = Bytes> + Send + 'static,
    ReqBody::Error: std::error::Error + Send + Sync + 'static,
{
    type Response = Response<Full<Bytes>>;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, request: Request<ReqBody>) -> Self::Future {
        let uploader = Arc::clone(&self.uploader);

        Box::pin(async move {
            let request = upload_request_from_http(request).await?;
            let response = uploader.handle(&request).await;
            into_http_response(response)
        })
    }
}

/// Collects a Hyper request into an [`UploadRequest`] envelope.
///
/// Bodies that are not valid UTF-8 are carried base64-encoded.
pub async fn upload_request_from_http<B>(request: Request<B>) -> Result<UploadRequest, BoxError>
where
    B: hyper::body::Body<Data = Bytes> + Send + 'static,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let (parts, body) = request.into_parts();

    let headers = parts
        .headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_owned(), value.to_owned()))
        })
        .collect();

    let bytes = body.collect().await.map_err(into_box_error)?.to_bytes();
    let (is_base64_encoded, body) = match String::from_utf8(bytes.to_vec()) {
        Ok(text) => (false, text),
        Err(_) => (
            true,
            base64::engine::general_purpose::STANDARD.encode(&bytes),
        ),
    };

    Ok(UploadRequest {
        is_base64_encoded,
        headers,
        body,
    })
}

/// Converts an [`UploadResponse`] envelope into a Hyper response.
pub fn into_http_response(response: UploadResponse) -> Result<Response<Full<Bytes>>, BoxError> {
    let status = StatusCode::from_u16(response.status_code).map_err(into_box_error)?;
    let mut builder = Response::builder().status(status);
    for (name, value) in &response.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder
        .body(Full::new(Bytes::from(response.body)))
        .map_err(into_box_error)
}

fn into_box_error<E>(err: E) -> BoxError
where
    E: std::error::Error + Send + Sync + 'static,
{
    Box::new(err)
}
