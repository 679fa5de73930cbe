//! DandiApiClient over HttpTransport against a local responder.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

use serde_json::json;
use spimio_dandi::{
    ArchiveClient, ArchiveSession, DandiApiClient, DandiError, DandiPathExt, Dandiset, DandisetId, HttpTransport,
    SessionError, Transport,
};
use url::Url;

const ASSETS: [(&str, &str); 4] = [
    ("a1", "sub-01/ses-1/sample-1_chunk-1.h5"),
    ("a2", "sub-01/ses-1/sample-1_chunk-1.json"),
    ("a3", "sub-010/ses-1/sample-1_chunk-1.h5"),
    ("a4", "dataset_description.json"),
];

const PAGE: usize = 2;

struct Reply {
    status: u16,
    location: Option<String>,
    body: String,
}

impl Reply {
    fn json(value: serde_json::Value) -> Self {
        Self { status: 200, location: None, body: value.to_string() }
    }

    fn redirect(location: String) -> Self {
        Self { status: 302, location: Some(location), body: String::new() }
    }

    fn status(status: u16) -> Self {
        Self { status, location: None, body: String::new() }
    }
}

/// Answers like a small DANDI API with one dandiset, `000026`.
fn route(base: &str, target: &str) -> Reply {
    let url = Url::parse(&format!("{base}{target}")).unwrap();
    let query = |key: &str| url.query_pairs().find(|(k, _)| k == key).map(|(_, v)| v.into_owned());
    let segments: Vec<_> = url.path_segments().unwrap().filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        ["api", "dandisets", "000026"] => Reply::json(json!({
            "identifier": "000026",
            "most_recent_published_version": {"version": "0.230101.0000"},
            "draft_version": {"version": "draft"}
        })),
        ["api", "dandisets", "000026", "versions", "draft" | "0.230101.0000"] => {
            Reply::json(json!({"name": "test"}))
        }
        ["api", "dandisets", "000026", "versions", _, "assets"] => {
            let prefix = query("path").unwrap_or_default();
            let page: usize = query("page").map(|p| p.parse().unwrap()).unwrap_or(1);
            let matching: Vec<_> = ASSETS
                .iter()
                .filter(|(_, path)| path.starts_with(&prefix))
                .collect();
            let results: Vec<_> = matching
                .iter()
                .skip((page - 1) * PAGE)
                .take(PAGE)
                .map(|(id, path)| json!({"asset_id": id, "path": path, "size": 100}))
                .collect();
            let next = (page * PAGE < matching.len()).then(|| {
                let mut next = url.clone();
                next.query_pairs_mut().append_pair("page", &(page + 1).to_string());
                next.to_string()
            });
            Reply::json(json!({"count": matching.len(), "next": next, "results": results}))
        }
        ["api", "assets", id, "download"] => {
            Reply::redirect(format!("/blobs/{id}?X-Amz-Signature=secret"))
        }
        ["blobs", id] => Reply::json(json!({"blob": id})),
        ["private"] => Reply::status(403),
        _ => Reply::status(404),
    }
}

/// Serve `route` on a loopback port until the test process exits.
fn serve() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let served = base.clone();
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            if reader.read_line(&mut request_line).is_err() {
                continue;
            }
            loop {
                let mut header = String::new();
                match reader.read_line(&mut header) {
                    Ok(0) | Err(_) => break,
                    Ok(_) if header == "\r\n" => break,
                    Ok(_) => {}
                }
            }

            let mut parts = request_line.split_whitespace();
            let method = parts.next().unwrap_or_default();
            let target = parts.next().unwrap_or("/");
            let reply = route(&served, target);
            let body = if method == "HEAD" { "" } else { reply.body.as_str() };

            let mut head = format!(
                "HTTP/1.1 {} Reply\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
                reply.status,
                body.len()
            );
            if let Some(location) = &reply.location {
                head.push_str(&format!("Location: {location}\r\n"));
            }
            head.push_str("\r\n");
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body.as_bytes());
        }
    });
    base
}

fn client(base: &str) -> DandiApiClient {
    DandiApiClient::with_api_url(format!("{base}/api"), Arc::new(HttpTransport::new()))
}

#[test]
fn browse_published_version() {
    let base = serve();
    let dandiset = Dandiset::open(&client(&base), "26", None).unwrap();
    assert_eq!(dandiset.identifier(), "000026");
    assert_eq!(dandiset.version_id(), Some("0.230101.0000"));

    let root = dandiset.root();
    let names: Vec<_> = root.iterdir().unwrap().iter().map(|p| p.to_string()).collect();
    assert_eq!(names, ["sub-01", "sub-010", "dataset_description.json"]);

    let found: Vec<_> = root
        .glob("sub-01/*/*.h5")
        .unwrap()
        .iter()
        .map(|p| p.to_string())
        .collect();
    assert_eq!(found, ["sub-01/ses-1/sample-1_chunk-1.h5"]);
}

#[test]
fn explicit_version_must_exist() {
    let base = serve();
    let client = client(&base);
    assert!(client.get_dandiset(&DandisetId::from(26u32), Some("draft")).is_ok());
    assert!(matches!(
        client.get_dandiset(&DandisetId::from(26u32), Some("9.9")),
        Err(SessionError::UnknownDandiset(label)) if label == "000026@9.9"
    ));
    assert!(matches!(
        client.get_dandiset(&DandisetId::from(99u32), None),
        Err(SessionError::UnknownDandiset(id)) if id == "000099"
    ));
}

#[test]
fn asset_urls_resolve_to_blobs() {
    let base = serve();
    let transport = HttpTransport::new();
    let dandiset = Dandiset::open(&client(&base), 26u32, Some("draft")).unwrap();
    let path = dandiset.path("sub-01/ses-1/sample-1_chunk-1.json");

    let download = path.download_url().unwrap();
    assert_eq!(download, format!("{base}/api/assets/a2/download/"));
    assert_eq!(path.s3_url(&transport).unwrap(), format!("{base}/blobs/a2"));

    let body: serde_json::Value = serde_json::from_slice(&transport.fetch(&download).unwrap()).unwrap();
    assert_eq!(body, json!({"blob": "a2"}));
}

#[test]
fn directories_have_no_asset() {
    let base = serve();
    let dandiset = Dandiset::open(&client(&base), 26u32, None).unwrap();
    assert!(matches!(
        dandiset.path("sub-01").download_url(),
        Err(DandiError::NotAFile(_))
    ));
    assert!(matches!(
        dandiset.session().get_asset_by_path("sub-01"),
        Err(SessionError::NotFound(p)) if p == "sub-01"
    ));
}

#[test]
fn status_codes_map_to_errors() {
    let base = serve();
    let transport = HttpTransport::new();
    assert!(matches!(
        transport.fetch(&format!("{base}/nowhere")),
        Err(SessionError::NotFound(_))
    ));
    assert!(matches!(
        transport.fetch(&format!("{base}/private")),
        Err(SessionError::PermissionDenied(_))
    ));
    assert!(matches!(
        transport.resolve(&format!("{base}/private")),
        Err(SessionError::PermissionDenied(_))
    ));
    let plain = format!("{base}/blobs/a1");
    assert_eq!(transport.resolve(&plain).unwrap(), plain);
}
