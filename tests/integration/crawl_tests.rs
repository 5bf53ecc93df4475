//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the stock-photo sites and run the
//! full coordinator end-to-end against a temporary output root.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use stock_scraper::config::{Config, CrawlerConfig, OutputConfig};
use stock_scraper::crawler::{image_file_name, Coordinator};
use stock_scraper::{ScraperError, SiteId, SiteStatus};
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration enabling `sites`, all pointed at `origin`
fn create_test_config(root: &Path, origin: &str, sites: &[SiteId], target: u32) -> Config {
    let mut enabled = BTreeMap::new();
    let mut origins = BTreeMap::new();
    for site in SiteId::ALL {
        enabled.insert(site.key().to_string(), sites.contains(&site));
    }
    for site in sites {
        origins.insert(site.key().to_string(), origin.to_string());
    }

    Config {
        crawler: CrawlerConfig {
            target_images: target,
            retry_attempts: 2,
            retry_delay_secs: 0,
            request_timeout_secs: 5,
            max_skipped_pages: 3,
            user_agent: "TestBot/1.0".to_string(),
        },
        output: OutputConfig {
            root: root.display().to_string(),
        },
        sites: enabled,
        origins,
    }
}

fn getty_page(base: &str, thumbs: &[&str], next: Option<&str>) -> String {
    let mut html = String::from("<html><body><div class=\"gallery\">");
    for thumb in thumbs {
        html.push_str(&format!(
            r#"<article class="mosaic-asset" data-thumb-url="{base}/img/{thumb}.jpg">
                 <a href="/detail/{thumb}">{thumb}</a>
               </article>"#
        ));
    }
    html.push_str("</div>");
    if let Some(next) = next {
        html.push_str(&format!(r#"<a id="next-gallery-page" href="{next}">Next</a>"#));
    }
    html.push_str("</body></html>");
    html
}

fn istock_page(base: &str, thumbs: &[&str]) -> String {
    let mut html = String::from("<html><body>");
    for thumb in thumbs {
        html.push_str(&format!(
            r#"<div data-testid="gallery-mosaic-asset">
                 <a href="/photo/{thumb}"><img data-src="{base}/img/{thumb}.jpg"></a>
               </div>"#
        ));
    }
    html.push_str("</body></html>");
    html
}

fn grid_page(base: &str, container: &str, thumbs: &[&str]) -> String {
    let mut html = String::from("<html><body>");
    for thumb in thumbs {
        html.push_str(&format!(
            r#"<div {container}>
                 <a class="js-search-result-thumbnail" href="/image/{thumb}"><img src="{base}/img/{thumb}.jpg"></a>
               </div>"#
        ));
    }
    html.push_str("</body></html>");
    html
}

fn shutterstock_page(base: &str, thumbs: &[&str]) -> String {
    grid_page(
        base,
        r#"data-automation="AssetGrids_GridItemContainer_div""#,
        thumbs,
    )
}

fn adobe_page(base: &str, thumbs: &[&str]) -> String {
    grid_page(base, r#"class="search-result-cell""#, thumbs)
}

/// Serves a small JPEG-like payload for every /img/*.jpg request
async fn mount_images(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/img/[^/]+\.jpg$"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0]))
        .mount(server)
        .await;
}

#[derive(Debug)]
struct Row {
    rank: u32,
    image_url: String,
    info_url: String,
    download_file: PathBuf,
    stock: String,
}

fn read_ledger(path: &Path) -> (Vec<String>, Vec<Row>) {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open ledger");
    let header = reader
        .headers()
        .expect("Failed to read header")
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|r| {
            let r = r.expect("Failed to read row");
            Row {
                rank: r[0].parse().expect("rank is numeric"),
                image_url: r[1].to_string(),
                info_url: r[2].to_string(),
                download_file: PathBuf::from(&r[3]),
                stock: r[4].to_string(),
            }
        })
        .collect();
    (header, rows)
}

#[tokio::test]
async fn test_duplicate_results_ranked_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/photos/german"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(getty_page(&base_url, &["u1", "u2", "u2", "u3"], None))
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;
    mount_images(&mock_server).await;

    let out = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(out.path(), &base_url, &[SiteId::GettyImages], 100);
    let coordinator = Coordinator::new(config, "german").expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Crawl failed");

    let ledger_path = out.path().join("german").join("german_image_list.csv");
    assert_eq!(report.ledger_path, ledger_path);

    let (header, rows) = read_ledger(&ledger_path);
    assert_eq!(
        header,
        vec!["rank_pos", "image_url", "image_info_url", "download_file", "stock"]
    );
    assert_eq!(rows.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(rows[0].image_url, format!("{}/img/u1.jpg", base_url));
    assert_eq!(rows[1].image_url, format!("{}/img/u2.jpg", base_url));
    assert_eq!(rows[2].image_url, format!("{}/img/u3.jpg", base_url));
    assert_eq!(rows[0].info_url, format!("{}/detail/u1", base_url));

    let site_dir = out.path().join("german").join("getty-images");
    for row in &rows {
        assert_eq!(row.stock, "getty-images");
        assert_eq!(
            row.download_file,
            site_dir.join(image_file_name(&row.image_url))
        );
        assert!(row.download_file.exists(), "missing {:?}", row.download_file);
    }

    let getty = &report.sites[0];
    assert_eq!(getty.status, SiteStatus::Done);
    assert_eq!(getty.images_recorded, 3);
    assert_eq!(getty.images_downloaded, 3);
}

#[tokio::test]
async fn test_existing_ledger_refused() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let out = TempDir::new().expect("Failed to create temp dir");
    let query_dir = out.path().join("german");
    std::fs::create_dir_all(&query_dir).expect("Failed to create query dir");
    let ledger_path = query_dir.join("german_image_list.csv");
    std::fs::write(&ledger_path, "keep me\n").expect("Failed to write ledger");

    let config = create_test_config(
        out.path(),
        &mock_server.uri(),
        &[SiteId::GettyImages, SiteId::IStock],
        10,
    );
    let coordinator = Coordinator::new(config, "german").expect("Failed to create coordinator");
    let err = coordinator.run().await.expect_err("Crawl should refuse to start");

    match err {
        ScraperError::LedgerAlreadyExists { path } => assert_eq!(path, ledger_path),
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(
        std::fs::read_to_string(&ledger_path).expect("ledger readable"),
        "keep me\n"
    );
    assert!(!query_dir.join("getty-images").exists());
    assert!(!query_dir.join("istock").exists());
}

#[tokio::test]
async fn test_existing_image_not_downloaded_again() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/photos/german"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(getty_page(&base_url, &["old", "new"], None)),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/old.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1, 2, 3]))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/new.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![4, 5, 6]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let out = TempDir::new().expect("Failed to create temp dir");
    let site_dir = out.path().join("german").join("getty-images");
    std::fs::create_dir_all(&site_dir).expect("Failed to create site dir");
    let old_file = site_dir.join(image_file_name(&format!("{}/img/old.jpg", base_url)));
    std::fs::write(&old_file, b"from an earlier run").expect("Failed to seed image");

    let config = create_test_config(out.path(), &base_url, &[SiteId::GettyImages], 10);
    let coordinator = Coordinator::new(config, "german").expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Crawl failed");

    // The existing image is still recorded, just not fetched
    let (_, rows) = read_ledger(&coordinator.ledger_path());
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].download_file, old_file);
    assert_eq!(
        std::fs::read(&old_file).expect("image readable"),
        b"from an earlier run"
    );

    let getty = &report.sites[0];
    assert_eq!(getty.images_already_present, 1);
    assert_eq!(getty.images_downloaded, 1);
}

#[tokio::test]
async fn test_failed_page_after_good_page_is_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/search/german"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(shutterstock_page(&base_url, &["a", "b"])),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/german"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(502))
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/german"))
        .and(query_param("page", "3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(shutterstock_page(&base_url, &["c"])),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/german"))
        .and(query_param("page", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_string(shutterstock_page(&base_url, &[])))
        .mount(&mock_server)
        .await;
    mount_images(&mock_server).await;

    let out = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(out.path(), &base_url, &[SiteId::Shutterstock], 100);
    let coordinator = Coordinator::new(config, "german").expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Crawl failed");

    let (_, rows) = read_ledger(&coordinator.ledger_path());
    assert_eq!(rows.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(rows[2].image_url, format!("{}/img/c.jpg", base_url));
    assert!(rows.iter().all(|r| r.stock == "shutterstock"));

    let summary = &report.sites[0];
    assert_eq!(summary.status, SiteStatus::Done);
    assert_eq!(summary.pages_fetched, 3);
    assert_eq!(summary.pages_skipped, 1);
}

#[tokio::test]
async fn test_computed_pagination_until_results_run_out() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    for (page, thumbs) in [("1", vec!["p1a", "p1b"]), ("2", vec!["p2a"]), ("3", vec![])] {
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("k", "german"))
            .and(query_param("search_page", page))
            .respond_with(ResponseTemplate::new(200).set_body_string(adobe_page(&base_url, &thumbs)))
            .expect(1)
            .mount(&mock_server)
            .await;
    }
    mount_images(&mock_server).await;

    let out = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(out.path(), &base_url, &[SiteId::AdobeStock], 100);
    let coordinator = Coordinator::new(config, "german").expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Crawl failed");

    let (_, rows) = read_ledger(&coordinator.ledger_path());
    assert_eq!(rows.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(rows[2].info_url, format!("{}/image/p2a", base_url));
    assert_eq!(report.sites[0].pages_fetched, 3);
    assert_eq!(report.sites[0].status, SiteStatus::Done);
}

#[tokio::test]
async fn test_quota_stops_after_page_completes() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/photos/german"))
        .respond_with(ResponseTemplate::new(200).set_body_string(getty_page(
            &base_url,
            &["a", "b", "c"],
            Some("/photos/german?page=2"),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_images(&mock_server).await;

    let out = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(out.path(), &base_url, &[SiteId::GettyImages], 2);
    let coordinator = Coordinator::new(config, "german").expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Crawl failed");

    // The soft quota overshoots to the end of the page
    assert_eq!(report.sites[0].images_recorded, 3);
    assert_eq!(report.sites[0].pages_fetched, 1);
}

#[tokio::test]
async fn test_aborted_site_does_not_stop_run() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Getty never answers its first page
    Mock::given(method("GET"))
        .and(path("/photos/german"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/2/image"))
        .and(query_param("phrase", "german"))
        .respond_with(ResponseTemplate::new(200).set_body_string(istock_page(&base_url, &["x", "y"])))
        .mount(&mock_server)
        .await;
    mount_images(&mock_server).await;

    let out = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(
        out.path(),
        &base_url,
        &[SiteId::GettyImages, SiteId::IStock],
        100,
    );
    let coordinator = Coordinator::new(config, "german").expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.sites.len(), 2);
    assert_eq!(report.sites[0].site, SiteId::GettyImages);
    assert_eq!(report.sites[0].status, SiteStatus::Aborted);
    assert_eq!(report.sites[1].site, SiteId::IStock);
    assert_eq!(report.sites[1].status, SiteStatus::Done);
    assert_eq!(report.aborted_sites(), 1);

    let (_, rows) = read_ledger(&coordinator.ledger_path());
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.stock == "istock"));
    assert_eq!(rows.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(rows[0].info_url, format!("{}/photo/x", base_url));
    assert!(out.path().join("german").join("getty-images").is_dir());
}

#[tokio::test]
async fn test_ranks_restart_for_each_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/photos/german"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(getty_page(&base_url, &["g1", "g2"], None)),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/german"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(shutterstock_page(&base_url, &["s1", "s2", "s3"])),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/german"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(shutterstock_page(&base_url, &[])))
        .mount(&mock_server)
        .await;
    mount_images(&mock_server).await;

    let out = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(
        out.path(),
        &base_url,
        &[SiteId::GettyImages, SiteId::Shutterstock],
        100,
    );
    let coordinator = Coordinator::new(config, "german").expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Crawl failed");

    let (_, rows) = read_ledger(&coordinator.ledger_path());
    let ranked: Vec<(u32, &str)> = rows.iter().map(|r| (r.rank, r.stock.as_str())).collect();
    assert_eq!(
        ranked,
        vec![
            (1, "getty-images"),
            (2, "getty-images"),
            (1, "shutterstock"),
            (2, "shutterstock"),
            (3, "shutterstock"),
        ]
    );
    assert_eq!(rows[2].image_url, format!("{}/img/s1.jpg", base_url));
    assert_eq!(report.sites[0].images_recorded, 2);
    assert_eq!(report.sites[1].images_recorded, 3);
    assert_eq!(report.total_images(), 5);
}

#[tokio::test]
async fn test_consecutive_page_failures_end_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/search/german"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(shutterstock_page(&base_url, &["a"])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    // Pages 2..=4 fail on both attempts; page 5 is never reached
    for page in ["2", "3", "4"] {
        Mock::given(method("GET"))
            .and(path("/search/german"))
            .and(query_param("page", page))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&mock_server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/search/german"))
        .and(query_param("page", "5"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;
    mount_images(&mock_server).await;

    let out = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(out.path(), &base_url, &[SiteId::Shutterstock], 100);
    let max_skipped = config.crawler.max_skipped_pages;
    assert_eq!(max_skipped, 3);

    let coordinator = Coordinator::new(config, "german").expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Crawl failed");

    let summary = &report.sites[0];
    assert_eq!(summary.status, SiteStatus::Done);
    assert_eq!(summary.pages_fetched, 1);
    assert_eq!(summary.pages_skipped, max_skipped);
    assert_eq!(summary.images_recorded, 1);
}
