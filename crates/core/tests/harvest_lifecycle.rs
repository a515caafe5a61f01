//! Harvest lifecycle integration tests.
//!
//! These tests drive complete runs through the coordinator:
//! identifiers -> lookup -> record -> persist -> summary

use std::path::Path;
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use tokio::sync::mpsc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use harvester_core::{
    lookup::LookupOutcome,
    testing::{fixtures, MockFetcher, MockLookup},
    FetchConfig, HarvestConfig, HarvestProgress, Harvester, HttpFileFetcher, HttpLookupClient,
    LookupConfig, StopMode,
};

/// Test helper owning the output directory and the mocks.
struct TestHarness {
    lookup: MockLookup,
    fetcher: MockFetcher,
    temp_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        Self {
            lookup: MockLookup::new(),
            fetcher: MockFetcher::new(),
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    fn output_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    fn config(&self, workers: usize, quota: usize) -> HarvestConfig {
        HarvestConfig {
            output_dir: self.output_dir().to_path_buf(),
            workers,
            quota,
            ..Default::default()
        }
    }

    fn harvester(&self, config: HarvestConfig) -> Harvester<MockLookup, MockFetcher> {
        Harvester::new(config, self.lookup.clone(), self.fetcher.clone())
    }

    fn read(&self, name: &str) -> Vec<u8> {
        std::fs::read(self.output_dir().join(name))
            .unwrap_or_else(|e| panic!("expected {} to exist: {}", name, e))
    }

    fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.output_dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

#[tokio::test]
async fn test_quota_of_one_stops_after_first_found() {
    let harness = TestHarness::new();
    harness
        .lookup
        .set_outcome(
            "A",
            fixtures::found(vec![
                fixtures::url_file(0, "https://files.test/a/photo.jpg"),
                fixtures::inline_file(1, b"hello"),
            ]),
        )
        .await;
    harness.lookup.set_outcome("B", LookupOutcome::NoFiles).await;
    harness.lookup.set_outcome("C", LookupOutcome::NoFiles).await;
    harness
        .fetcher
        .set_response("https://files.test/a/photo.jpg", b"jpeg-bytes".to_vec())
        .await;

    let summary = harness
        .harvester(harness.config(3, 1))
        .run(fixtures::work_orders(&["A", "B", "C"]))
        .await
        .unwrap();

    assert_eq!(summary.found, 1);
    assert!(summary.quota_reached);
    assert!((1..=3).contains(&summary.processed));
    assert_eq!(summary.files_written, 2);
    assert_eq!(harness.read("A_0.jpg"), b"jpeg-bytes");
    assert_eq!(harness.read("A_1.bin"), b"hello");
}

#[tokio::test]
async fn test_unavailable_lookup_is_counted_not_fatal() {
    let harness = TestHarness::new();
    harness
        .lookup
        .set_outcome("X", fixtures::unavailable_status(500))
        .await;
    harness
        .lookup
        .set_outcome("Y", fixtures::found(vec![fixtures::inline_file(0, b"y")]))
        .await;

    let summary = harness
        .harvester(harness.config(2, 0))
        .run(fixtures::work_orders(&["X", "Y"]))
        .await
        .unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.found, 1);
    assert_eq!(summary.unavailable, 1);
    assert!(!summary.quota_reached);
    assert_eq!(harness.file_names(), vec!["Y_0.bin"]);
}

#[tokio::test]
async fn test_bad_files_are_skipped_siblings_written() {
    let harness = TestHarness::new();
    harness
        .lookup
        .set_outcome(
            "Y",
            fixtures::found(vec![
                harvester_core::FileDescriptor::from_content(0, "!!!not base64"),
                fixtures::url_file(1, "https://files.test/missing.pdf"),
                harvester_core::FileDescriptor::empty(2),
                fixtures::inline_file(3, b"ok"),
            ]),
        )
        .await;

    let summary = harness
        .harvester(harness.config(1, 0))
        .run(fixtures::work_orders(&["Y"]))
        .await
        .unwrap();

    assert_eq!(summary.files_written, 1);
    assert_eq!(summary.files_skipped, 2);
    assert_eq!(summary.files_empty, 1);
    assert_eq!(harness.file_names(), vec!["Y_3.bin"]);
}

#[tokio::test]
async fn test_progress_observations_are_consistent() {
    let harness = TestHarness::new();
    let ids = ["W1", "W2", "W3", "W4", "W5", "W6"];
    for (i, id) in ids.iter().enumerate() {
        if i % 2 == 0 {
            harness
                .lookup
                .set_outcome(*id, fixtures::found(vec![fixtures::inline_file(0, b"x")]))
                .await;
        }
        harness
            .lookup
            .set_delay(*id, Duration::from_millis(5 * (ids.len() - i) as u64))
            .await;
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<HarvestProgress>();
    let summary = harness
        .harvester(harness.config(3, 0))
        .with_progress(tx)
        .run(fixtures::work_orders(&ids))
        .await
        .unwrap();

    let mut observed = Vec::new();
    while let Ok(progress) = rx.try_recv() {
        assert!(progress.found <= progress.processed);
        observed.push(progress);
    }

    let mut processed: Vec<usize> = observed.iter().map(|p| p.processed).collect();
    processed.sort_unstable();
    assert_eq!(processed, (1..=ids.len()).collect::<Vec<_>>());

    // Observations are emitted under the lock, so arrival order is counter order.
    let arrival: Vec<usize> = observed.iter().map(|p| p.processed).collect();
    assert_eq!(arrival, processed);

    assert_eq!(summary.processed, ids.len());
    assert_eq!(summary.found, 3);
}

#[tokio::test]
async fn test_cancel_mode_drops_queued_work_orders() {
    let harness = TestHarness::new();
    harness
        .lookup
        .set_outcome("A", fixtures::found(vec![fixtures::inline_file(0, b"a")]))
        .await;
    for id in ["B", "C", "D"] {
        harness
            .lookup
            .set_outcome(id, fixtures::found(vec![fixtures::inline_file(0, b"z")]))
            .await;
    }

    let config = HarvestConfig {
        stop_mode: StopMode::Cancel,
        ..harness.config(1, 1)
    };
    let summary = harness
        .harvester(config)
        .run(fixtures::work_orders(&["A", "B", "C", "D"]))
        .await
        .unwrap();

    assert_eq!(harness.lookup.calls().await, fixtures::work_orders(&["A"]));
    assert_eq!(summary.processed, 1);
    assert_eq!(harness.file_names(), vec!["A_0.bin"]);
}

#[tokio::test]
async fn test_rerun_overwrites_with_same_files() {
    let harness = TestHarness::new();
    harness
        .lookup
        .set_outcome(
            "R",
            fixtures::found(vec![
                fixtures::url_file(0, "https://files.test/r.png?sig=abc"),
                fixtures::inline_file(1, b"inline"),
            ]),
        )
        .await;
    harness
        .fetcher
        .set_response("https://files.test/r.png?sig=abc", b"png".to_vec())
        .await;

    let first = harness
        .harvester(harness.config(2, 0))
        .run(fixtures::work_orders(&["R"]))
        .await
        .unwrap();
    let names_after_first = harness.file_names();

    let second = harness
        .harvester(harness.config(2, 0))
        .run(fixtures::work_orders(&["R"]))
        .await
        .unwrap();

    assert_eq!(names_after_first, vec!["R_0.png", "R_1.bin"]);
    assert_eq!(harness.file_names(), names_after_first);
    assert_eq!(first.files_written, second.files_written);
    assert_eq!(harness.read("R_0.png"), b"png");
}

#[tokio::test]
async fn test_run_from_source_applies_skip() {
    let harness = TestHarness::new();
    let list = harness.output_dir().join("workorders.txt");
    std::fs::write(&list, "S1\n\n  S2  \nS3\n").unwrap();

    let config = HarvestConfig {
        identifiers_path: list,
        output_dir: harness.output_dir().join("out"),
        skip: 1,
        ..harness.config(2, 0)
    };
    let summary = harness.harvester(config).run_from_source().await.unwrap();

    assert_eq!(summary.total, 2);
    let mut calls = harness.lookup.calls().await;
    calls.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    assert_eq!(calls, fixtures::work_orders(&["S2", "S3"]));
}

#[tokio::test]
async fn test_identifiers_never_escape_output_dir() {
    let root = TempDir::new().unwrap();
    let out = root.path().join("out");
    let absolute = root.path().join("escaped").to_string_lossy().into_owned();

    let lookup = MockLookup::new();
    for id in [absolute.as_str(), "../sibling", "ok"] {
        lookup
            .set_outcome(id, fixtures::found(vec![fixtures::inline_file(0, b"data")]))
            .await;
    }

    let config = HarvestConfig {
        output_dir: out.clone(),
        workers: 2,
        quota: 0,
        ..Default::default()
    };
    let summary = Harvester::new(config, lookup, MockFetcher::new())
        .run(fixtures::work_orders(&[absolute.as_str(), "../sibling", "ok"]))
        .await
        .unwrap();

    assert_eq!(summary.found, 3);
    assert_eq!(summary.files_written, 1);
    assert_eq!(summary.files_skipped, 2);

    let mut entries: Vec<String> = std::fs::read_dir(root.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    entries.sort();
    assert_eq!(entries, vec!["out"]);
    assert_eq!(std::fs::read(out.join("ok_0.bin")).unwrap(), b"data");
}

#[tokio::test]
async fn test_end_to_end_over_http() {
    let api = MockServer::start().await;
    let files = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/WO-1"))
        .and(header("x-api-key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"FileUrl": format!("{}/blob/site.jpeg", files.uri())},
                {"FileContent": "aGVsbG8="},
                {"Name": "no payload"}
            ]
        })))
        .mount(&api)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/WO-2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&api)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/WO-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"files": []})))
        .mount(&api)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/WO-4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"FileContent": "d29ybGQ="}
        ])))
        .mount(&api)
        .await;
    Mock::given(method("GET"))
        .and(path("/blob/site.jpeg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg".to_vec()))
        .mount(&files)
        .await;

    let lookup =
        HttpLookupClient::new(LookupConfig::new(format!("{}/api/", api.uri()), "secret")).unwrap();
    let fetcher = HttpFileFetcher::new(FetchConfig::default()).unwrap();
    let config = HarvestConfig {
        output_dir: temp_dir.path().join("downloaded"),
        workers: 4,
        quota: 0,
        ..Default::default()
    };

    let summary = Harvester::new(config, lookup, fetcher)
        .run(fixtures::work_orders(&["WO-1", "WO-2", "WO-3", "WO-4"]))
        .await
        .unwrap();

    assert_eq!(summary.processed, 4);
    assert_eq!(summary.found, 2);
    assert_eq!(summary.unavailable, 1);
    assert_eq!(summary.files_written, 3);
    assert_eq!(summary.files_empty, 1);

    let out = temp_dir.path().join("downloaded");
    assert_eq!(std::fs::read(out.join("WO-1_0.jpeg")).unwrap(), b"jpeg");
    assert_eq!(std::fs::read(out.join("WO-1_1.bin")).unwrap(), b"hello");
    assert!(!out.join("WO-1_2.bin").exists());
    assert_eq!(std::fs::read(out.join("WO-4_0.bin")).unwrap(), b"world");
}
