//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the catalogue site and run the
//! fetch / parse / archive pipeline end-to-end into a temporary folder.

mod archive_tests;

use std::path::Path;
use tululu_parser::config::Config;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a configuration pointing at the mock server and writing into `dest`
pub fn test_config(server: &MockServer, dest: &Path) -> Config {
    let mut config = Config::default();
    config.site.base_url = format!("{}/", server.uri());
    config.crawler.connection_pause_ms = 50;
    config.crawler.request_timeout_ms = 2_000;
    config.output.dest_folder = dest.to_path_buf();
    config
}

/// HTML of a book detail page
pub fn book_page(id: u64, title: &str, author: &str) -> String {
    format!(
        r#"<html><body>
        <h1>{title} &nbsp; :: &nbsp; <a href="/a{id}/">{author}</a></h1>
        <div class="bookimage"><a href="/b{id}/"><img src="/shots/{id}.jpg" alt="{title}"></a></div>
        <span class="d_book"><b>Жанр книги:</b> <a href="/l55/">Научная фантастика</a>, <a href="/l17/">Приключения</a></span>
        <div class="texts"><b>Reader</b><br><span class="black">Книга {id} понравилась</span></div>
        </body></html>"#,
        id = id,
        title = title,
        author = author
    )
}

/// HTML of a category listing page referencing the given book ids
pub fn listing_page(ids: &[u64]) -> String {
    let rows: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<table class="d_book"><tr><td><a href="/b{id}/"><img src="/shots/{id}.jpg"></a></td></tr></table>"#,
                id = id
            )
        })
        .collect();
    format!("<html><body>{}</body></html>", rows)
}

pub fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

/// Serves the home page, which every "not available" redirect lands on
pub async fn mount_home(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<html><body>Home</body></html>".to_string()))
        .mount(server)
        .await;
}

/// Redirects `route` to the home page
pub async fn mount_redirect_home(server: &MockServer, route: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", format!("{}/", server.uri()).as_str()),
        )
        .mount(server)
        .await;
}

/// Serves a complete book: detail page, text body and cover image
pub async fn mount_book(server: &MockServer, id: u64, title: &str, author: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/b{}/", id)))
        .respond_with(html(book_page(id, title, author)))
        .mount(server)
        .await;

    mount_text(server, id).await;

    Mock::given(method("GET"))
        .and(path(format!("/shots/{}.jpg", id)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF, id as u8]))
        .mount(server)
        .await;
}

pub async fn mount_text(server: &MockServer, id: u64) {
    Mock::given(method("GET"))
        .and(path("/txt.php"))
        .and(query_param("id", id.to_string().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!("Text of book {}", id)))
        .mount(server)
        .await;
}

/// Lists regular files in `dir`, or nothing if it does not exist
pub fn files_in(dir: &Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => {
            let mut names: Vec<String> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            names
        }
        Err(_) => Vec::new(),
    }
}
