//! Release fetching through a shared download cache.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use cnb_harness::HarnessError;
use cnb_harness::application::DownloadCache;

use crate::mocks::{FakeDocker, FakeHttp, harness, harness_error, tar_gz};

const RELEASE: &str = "https://api.github.com/repos/cloudfoundry/nodejs-cnb/releases/latest";
const ASSET: &str = "https://github.com/cloudfoundry/nodejs-cnb/releases/download/v1.2.3/nodejs-cnb.tgz";
const TARBALL: &str = "https://api.github.com/repos/cloudfoundry/nodejs-cnb/tarball/v1.2.3";

fn release_body() -> Vec<u8> {
    serde_json::json!({
        "tag_name": "v1.2.3",
        "assets": [{ "browser_download_url": ASSET }],
        "tarball_url": TARBALL,
    })
    .to_string()
    .into_bytes()
}

fn http() -> FakeHttp {
    FakeHttp::new()
        .route(RELEASE, 200, &release_body())
        .route(ASSET, 200, &tar_gz(&[("buildpack.toml", b"[buildpack]\nid = \"nodejs\"\n")]))
        .route(
            TARBALL,
            200,
            &tar_gz(&[("cloudfoundry-nodejs-cnb-4f2e1a/README.md", b"# nodejs-cnb\n")]),
        )
}

#[tokio::test]
async fn concurrent_fetches_download_once() {
    let h = harness(FakeDocker::new(), http());

    let (first, second) = tokio::join!(
        h.latest_release_asset("nodejs-cnb", 0),
        h.latest_release_asset("nodejs-cnb", 0),
    );
    let (first, second) = (first.unwrap(), second.unwrap());

    assert_eq!(h.http().hits(ASSET), 1);
    assert_eq!(h.http().hits(RELEASE), 2);
    assert_ne!(first, second, "each caller gets its own extraction");
    assert_eq!(
        std::fs::read(first.join("buildpack.toml")).unwrap(),
        std::fs::read(second.join("buildpack.toml")).unwrap()
    );
    std::fs::remove_dir_all(first).unwrap();
    std::fs::remove_dir_all(second).unwrap();
}

#[tokio::test]
async fn shared_cache_spans_harnesses() {
    let cache = DownloadCache::new();
    let a = harness(FakeDocker::new(), http()).with_cache(cache.clone());
    let b = harness(FakeDocker::new(), http()).with_cache(cache.clone());

    let dir_a = a.latest_release_asset("nodejs-cnb", 0).await.unwrap();
    let dir_b = b.latest_release_asset("nodejs-cnb", 0).await.unwrap();

    assert_eq!(a.http().hits(ASSET) + b.http().hits(ASSET), 1);
    assert_eq!(cache.len(), 1);
    std::fs::remove_dir_all(dir_a).unwrap();
    std::fs::remove_dir_all(dir_b).unwrap();
}

#[tokio::test]
async fn source_and_asset_are_cached_apart() {
    let h = harness(FakeDocker::new(), http());
    let asset = h.latest_release_asset("nodejs-cnb", 0).await.unwrap();
    let source = h.latest_source("nodejs-cnb").await.unwrap();

    assert!(asset.join("buildpack.toml").is_file());
    assert!(source.join("cloudfoundry-nodejs-cnb-4f2e1a/README.md").is_file());
    assert_eq!(h.cache().len(), 2);
    std::fs::remove_dir_all(asset).unwrap();
    std::fs::remove_dir_all(source).unwrap();
}

#[tokio::test]
async fn missing_release_is_reported() {
    let h = harness(
        FakeDocker::new(),
        FakeHttp::new().route(RELEASE, 404, br#"{"message":"Not Found"}"#),
    );
    let err = h
        .latest_release_asset("nodejs-cnb", 0)
        .await
        .expect_err("404");
    assert_eq!(
        harness_error(&err),
        &HarnessError::ReleaseNotFound {
            package: "nodejs-cnb".to_string()
        }
    );
}

#[tokio::test]
async fn unreachable_download_is_transport_error() {
    let h = harness(
        FakeDocker::new(),
        FakeHttp::new().route(RELEASE, 200, &release_body()),
    );
    let err = h
        .latest_release_asset("nodejs-cnb", 0)
        .await
        .expect_err("no route to asset");
    assert!(matches!(harness_error(&err), HarnessError::Transport(_)));
    assert!(h.cache().is_empty());
}

#[tokio::test]
async fn explicit_download_uses_given_key() {
    let h = harness(FakeDocker::new(), http());
    let dir = h
        .download_and_extract(ASSET, "nodejs-cnb", "v1.2.3")
        .await
        .unwrap();
    let again = h
        .download_and_extract(ASSET, "nodejs-cnb", "v1.2.3")
        .await
        .unwrap();
    assert_eq!(h.http().hits(ASSET), 1);
    std::fs::remove_dir_all(dir).unwrap();
    std::fs::remove_dir_all(again).unwrap();
}
