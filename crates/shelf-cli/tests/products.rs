use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn product(id: u64, brand: &str, price: f64) -> serde_json::Value {
    json!({
        "id": id,
        "title": format!("Item {id}"),
        "brand": brand,
        "sku": format!("SKU-{id}"),
        "rating": 4.5,
        "price": price,
    })
}

#[tokio::test]
async fn test_products_prints_page_and_range() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("limit", "20"))
        .and(query_param("skip", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [product(21, "Zeta", 5.0), product(22, "Acme", 12.5)],
            "total": 57,
            "skip": 20,
            "limit": 20,
        })))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("shelf")
        .env("SHELF_HOME", home.path())
        .env("SHELF_API_BASE_URL", server.uri())
        .args(["products", "--page", "2", "--sort", "brand"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Item 21"))
        .stdout(predicate::str::contains("$12.50"))
        .stdout(predicate::str::contains("21-40 of 57"))
        .stdout(predicate::str::is_match(r"(?s)Acme.*Zeta").unwrap());
}

#[tokio::test]
async fn test_products_search_uses_search_endpoint() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/search"))
        .and(query_param("q", "phone"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [],
            "total": 0,
            "skip": 0,
            "limit": 20,
        })))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("shelf")
        .env("SHELF_HOME", home.path())
        .env("SHELF_API_BASE_URL", server.uri())
        .args(["products", "--search", "  phone "])
        .assert()
        .success()
        .stdout(predicate::str::contains("No products found."));
}

#[test]
fn test_products_rejects_page_zero() {
    let home = TempDir::new().unwrap();

    cargo_bin_cmd!("shelf")
        .env("SHELF_HOME", home.path())
        .env("SHELF_API_BASE_URL", "http://127.0.0.1:9")
        .args(["products", "--page", "0"])
        .assert()
        .failure();
}

#[test]
fn test_products_rejects_page_beyond_offset_range() {
    let home = TempDir::new().unwrap();

    cargo_bin_cmd!("shelf")
        .env("SHELF_HOME", home.path())
        .env("SHELF_API_BASE_URL", "http://127.0.0.1:9")
        .args(["products", "--page", "300000000", "--limit", "20"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_products_rejects_unknown_sort() {
    let home = TempDir::new().unwrap();

    cargo_bin_cmd!("shelf")
        .env("SHELF_HOME", home.path())
        .args(["products", "--sort", "color"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown sort field 'color'"));
}
