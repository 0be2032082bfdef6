use crate::{files_in, mount_home, mount_redirect_home, mount_text, test_config};
use tululu_parser::crawler::{BookArchiver, Fetcher};
use tululu_parser::{FetchError, TululuError};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn archiver_for(server: &MockServer, dest: &std::path::Path) -> (Fetcher, BookArchiver) {
    let config = test_config(server, dest);
    let fetcher = Fetcher::new(&config.site, &config.crawler).unwrap();
    let text_endpoint = Url::parse(&format!("{}/txt.php", server.uri())).unwrap();
    let archiver = BookArchiver::new(fetcher.clone(), text_endpoint);
    (fetcher, archiver)
}

#[tokio::test]
async fn test_download_text_writes_sanitized_file() {
    let mock_server = MockServer::start().await;
    mount_text(&mock_server, 42).await;

    let dest = tempfile::tempdir().unwrap();
    let (_, archiver) = archiver_for(&mock_server, dest.path());
    let books_dir = dest.path().join("books");

    let written = archiver
        .download_text("42", "42. Кто? Где: Когда", &books_dir)
        .await
        .unwrap();

    assert_eq!(written, books_dir.join("42. Кто Где Когда.txt"));
    assert_eq!(std::fs::read_to_string(&written).unwrap(), "Text of book 42");
}

#[tokio::test]
async fn test_download_text_redirect_writes_nothing() {
    let mock_server = MockServer::start().await;
    mount_home(&mock_server).await;
    mount_redirect_home(&mock_server, "/txt.php").await;

    let dest = tempfile::tempdir().unwrap();
    let (_, archiver) = archiver_for(&mock_server, dest.path());
    let books_dir = dest.path().join("books");

    let result = archiver.download_text("9", "9. Missing", &books_dir).await;

    assert!(matches!(
        result,
        Err(TululuError::Fetch(FetchError::Redirected { .. }))
    ));
    assert!(files_in(&books_dir).is_empty());
}

#[tokio::test]
async fn test_download_image_redirect_writes_nothing() {
    let mock_server = MockServer::start().await;
    mount_home(&mock_server).await;
    mount_redirect_home(&mock_server, "/shots/9.jpg").await;

    let dest = tempfile::tempdir().unwrap();
    let (_, archiver) = archiver_for(&mock_server, dest.path());
    let images_dir = dest.path().join("images");
    let image_url = Url::parse(&format!("{}/shots/9.jpg", mock_server.uri())).unwrap();

    let result = archiver.download_image(&image_url, "9.jpg", &images_dir).await;

    assert!(matches!(
        result,
        Err(TululuError::Fetch(FetchError::Redirected { .. }))
    ));
    assert!(files_in(&images_dir).is_empty());
}

#[tokio::test]
async fn test_download_image_overwrites_existing_file() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/shots/3.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
        .mount(&mock_server)
        .await;

    let dest = tempfile::tempdir().unwrap();
    let (_, archiver) = archiver_for(&mock_server, dest.path());
    let images_dir = dest.path().join("images");
    std::fs::create_dir_all(&images_dir).unwrap();
    std::fs::write(images_dir.join("3.png"), b"stale content").unwrap();

    let image_url = Url::parse(&format!("{}/shots/3.png", mock_server.uri())).unwrap();
    let written = archiver
        .download_image(&image_url, "3.png", &images_dir)
        .await
        .unwrap();

    assert_eq!(std::fs::read(&written).unwrap(), vec![1u8, 2, 3]);
    assert_eq!(files_in(&images_dir), vec!["3.png"]);
}

#[tokio::test]
async fn test_http_error_writes_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/txt.php"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let dest = tempfile::tempdir().unwrap();
    let (_, archiver) = archiver_for(&mock_server, dest.path());
    let books_dir = dest.path().join("books");

    let result = archiver.download_text("1", "1. Gone", &books_dir).await;

    assert!(matches!(
        result,
        Err(TululuError::Fetch(FetchError::Http { status: 404, .. }))
    ));
    assert!(!books_dir.exists());
}

#[tokio::test]
async fn test_home_page_redirect_wins_over_status() {
    let mock_server = MockServer::start().await;
    // The home page itself answers with an error status
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    mount_redirect_home(&mock_server, "/b77/").await;

    let dest = tempfile::tempdir().unwrap();
    let (fetcher, _) = archiver_for(&mock_server, dest.path());
    let url = Url::parse(&format!("{}/b77/", mock_server.uri())).unwrap();

    let result = fetcher.fetch_page(&url).await;
    assert!(matches!(result, Err(FetchError::Redirected { .. })));
}

#[tokio::test]
async fn test_connection_refused_is_connection_error() {
    // Grab a free port, then close it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let mock_server = MockServer::start().await;
    let dest = tempfile::tempdir().unwrap();
    let (fetcher, _) = archiver_for(&mock_server, dest.path());
    let url = Url::parse(&format!("http://127.0.0.1:{}/b1/", port)).unwrap();

    let result = fetcher.fetch_page(&url).await;
    assert!(matches!(result, Err(FetchError::Connection { .. })));
}
