#![allow(missing_docs)]

use std::sync::Arc;

use bytes::Bytes;
use formdrop::{hyper::UploadService, DiskStore, MemoryLedger, UploaderBuilder};
use http_body_util::Full;
use hyper::{header, server::conn::http1, service::Service, Request};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let store = DiskStore::builder()
        .destination(std::env::temp_dir().join("formdrop-hyper-upload"))
        .build()?;

    let uploader = Arc::new(
        UploaderBuilder::new()
            .bucket("uploads")
            .build_with_ledger(store, MemoryLedger::new())?,
    );
    let service = UploadService::new(Arc::clone(&uploader));

    if std::env::args().any(|arg| arg == "--serve") {
        let listener = TcpListener::bind("127.0.0.1:3000").await?;
        println!("listening on http://127.0.0.1:3000");
        loop {
            let (stream, _) = listener.accept().await?;
            let service = service.clone();
            tokio::spawn(async move {
                if let Err(err) = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await
                {
                    eprintln!("connection error: {err}");
                }
            });
        }
    }

    let mut body = Vec::new();
    body.extend_from_slice(b"--BOUND\r\n");
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"file\"; filename=\"song.mp3\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: audio/mpeg\r\n\r\n");
    body.extend_from_slice(&[0x49, 0x44, 0x33, 0x03, 0x00, 0xff]);
    body.extend_from_slice(b"\r\n--BOUND--\r\n");

    let request = Request::builder()
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=BOUND")
        .body(Full::new(Bytes::from(body)))?;

    let response = service.call(request).await?;
    println!("upload status: {}", response.status());
    println!("ledger: {:?}", uploader.ledger().records().await);
    Ok(())
}
