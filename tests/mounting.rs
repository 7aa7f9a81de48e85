//! Integration tests for base-path mounting: the dual exposure, the
//! bare-prefix redirect, and uniform behavior through both access
//! paths.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use portico::alias::registry::{AliasRegistry, AliasSource, FileSource, VipSource};
use portico::config::Settings;
use portico::server::{self, AppState};
use tempfile::TempDir;

fn public_fixture() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("index.html"),
        "<!doctype html><title>portico</title>",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("codemeta.json"),
        r#"{
            "name": "portico",
            "version": "0.1.0",
            "author": "Ada Lovelace",
            "dateModified": "2026-05-01"
        }"#,
    )
    .unwrap();
    dir
}

fn test_settings(public_dir: PathBuf) -> Settings {
    Settings {
        host: "127.0.0.1".into(),
        port: 0,
        base_path: Some("/svc".into()),
        public_dir,
        well_known_dir: PathBuf::from("well-known"),
        session_secret: None,
        documentation_url: "https://portico.readthedocs.io/en/latest".into(),
        input_format: "json".into(),
        output_format: "json".into(),
        vip_routes: vec!["human".into(), "monkey".into()],
        plugin_urls: vec![],
        max_body: 1_048_576,
    }
}

async fn start_server(settings: Settings) -> (SocketAddr, tokio::sync::oneshot::Sender<()>) {
    let sources: Vec<Box<dyn AliasSource>> = vec![
        Box::new(VipSource::new(settings.vip_routes.clone())),
        Box::new(FileSource::new(settings.public_dir.join("aliases.json"))),
    ];
    let registry = AliasRegistry::from_sources(&sources).await.unwrap();
    let state = Arc::new(AppState::new(settings, registry));
    let app = server::build_app(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        })
        .await
        .unwrap();
    });

    state.mark_ready();
    (addr, shutdown_tx)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

fn location(resp: &reqwest::Response) -> &str {
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("redirect without location header")
}

#[tokio::test]
async fn bare_base_path_redirects_to_trailing_slash() {
    let public = public_fixture();
    let (addr, shutdown) = start_server(test_settings(public.path().into())).await;

    let resp = client()
        .get(format!("http://{addr}/svc"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 307);
    assert_eq!(location(&resp), "/svc/");

    let _ = shutdown.send(());
}

#[tokio::test]
async fn both_mounts_reach_the_identical_handler() {
    let public = public_fixture();
    let (addr, shutdown) = start_server(test_settings(public.path().into())).await;
    let client = client();

    let prefixed = client
        .get(format!("http://{addr}/svc/peek/human"))
        .send()
        .await
        .unwrap();
    let root = client
        .get(format!("http://{addr}/peek/human"))
        .send()
        .await
        .unwrap();

    assert_eq!(prefixed.status(), root.status());
    let prefixed_body: serde_json::Value = prefixed.json().await.unwrap();
    let root_body: serde_json::Value = root.json().await.unwrap();
    assert_eq!(prefixed_body, root_body);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn vip_redirect_targets_the_prefixed_alias_router() {
    let public = public_fixture();
    let (addr, shutdown) = start_server(test_settings(public.path().into())).await;
    let client = client();

    // The target carries the base path through either access path
    for path in ["/svc/human", "/human"] {
        let resp = client
            .get(format!("http://{addr}{path}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 307, "status for {path}");
        assert_eq!(location(&resp), "/svc/go/human", "target for {path}");
    }

    let _ = shutdown.send(());
}

#[tokio::test]
async fn gateway_endpoints_answer_under_both_mounts() {
    let public = public_fixture();
    let (addr, shutdown) = start_server(test_settings(public.path().into())).await;
    let client = client();

    for path in ["/ready", "/svc/ready"] {
        let resp = client
            .get(format!("http://{addr}{path}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 204, "readiness via {path}");
    }

    let root: serde_json::Value = client
        .get(format!("http://{addr}/about"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let prefixed: serde_json::Value = client
        .get(format!("http://{addr}/svc/about"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(root, prefixed);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn legacy_rewrite_applies_under_the_prefix_mount() {
    let public = public_fixture();
    let (addr, shutdown) = start_server(test_settings(public.path().into())).await;
    let client = client();

    let resp = client
        .get(format!("http://{addr}/svc/plugin"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn legacy_redirect_target_carries_the_base_path() {
    let public = public_fixture();
    let (addr, shutdown) = start_server(test_settings(public.path().into())).await;
    let client = client();

    // Either access path redirects to the base-prefixed canonical shape
    for path in ["/preview/human", "/svc/preview/human"] {
        let resp = client
            .get(format!("http://{addr}{path}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 308, "status for {path}");
        assert_eq!(location(&resp), "/svc/peek/human", "target for {path}");
    }

    let _ = shutdown.send(());
}

#[tokio::test]
async fn static_assets_resolve_under_both_mounts() {
    let public = public_fixture();
    let (addr, shutdown) = start_server(test_settings(public.path().into())).await;
    let client = client();

    for path in ["/index.html", "/svc/index.html"] {
        let resp = client
            .get(format!("http://{addr}{path}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200, "asset via {path}");
        assert!(resp.text().await.unwrap().contains("portico"));
    }

    let _ = shutdown.send(());
}
