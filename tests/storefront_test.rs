use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use shopfront::api::{BackendClient, RequestScope};
use shopfront::catalog::CatalogView;
use shopfront::countdown::{CountdownBoard, Phase};
use shopfront::events::Event;
use shopfront::location::{Location, MemoryHistory, Navigator};
use shopfront::preview::{load_preview, LoadState};

const SHOP: &str = r#"{"success": true, "shop": {
    "_id": "s1", "name": "Lamp House", "address": "1 Main St", "phoneNumber": "555-0100"
}}"#;

const PRODUCTS: &str = r#"{"success": true, "products": [
    {"_id": "p1", "name": "Lamp", "category": "lighting", "discountPrice": 300,
     "originalPrice": 400, "ratings": 4.6,
     "reviews": [{"user": {"name": "Ana"}, "rating": 5, "comment": "bright"}]},
    {"_id": "p2", "name": "Desk", "category": "furniture", "discountPrice": 700,
     "ratings": 3.2},
    {"_id": "p3", "name": "Latch", "category": "hardware", "discountPrice": 20},
    {"_id": "p4", "name": "Chair", "category": "furniture", "discountPrice": 250,
     "originalPrice": 500}
]}"#;

const ODD_SHOP: &str = r#"{"shop": {"_id": "odd", "name": null, "phoneNumber": null}}"#;

const ODD_PRODUCTS: &str = r#"{"products": [
    {"_id": "p1", "name": "Lamp", "category": null, "images": null, "discountPrice": 300,
     "shopId": null}
]}"#;

const ODD_EVENTS: &str = r#"{"events": [
    {"_id": "e-millis", "name": null, "finishDate": 32503680000000},
    {"_id": "e-date", "finishDate": "2999-01-01"},
    {"_id": "e-object", "finishDate": {"$date": "2999-01-01"}},
    {"_id": "e-flag", "finishDate": true}
]}"#;

const EVENTS: &str = r#"{"success": true, "events": [
    {"_id": "e-past", "name": "Spring sale", "Finish_Date": "2020-01-01T00:00:00.000Z"},
    {"_id": "e-future", "name": "Far sale", "finishDate": "2999-01-01T00:00:00Z"},
    {"_id": "e-broken", "name": "Mystery sale", "finishDate": "soon"}
]}"#;

const CATEGORIES: &str = r#"{"categories": [{"_id": "lighting", "title": "Lighting"}]}"#;

/// Minimal HTTP/1.1 responder: matches the request path suffix against
/// `routes`, answers 404 otherwise, and closes the connection.
async fn serve(routes: Vec<(&'static str, u16, &'static str)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let routes = routes.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let mut read = 0;
                while read < buf.len() {
                    let n = socket.read(&mut buf[read..]).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    read += n;
                    if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }

                let request = String::from_utf8_lossy(&buf[..read]).to_string();
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                let (status, body) = routes
                    .iter()
                    .find(|(suffix, _, _)| path.ends_with(suffix))
                    .map(|(_, status, body)| (*status, *body))
                    .unwrap_or((404, "{}"));

                let response = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}/api/v2", addr)
}

async fn happy_backend() -> BackendClient {
    let base = serve(vec![
        ("/shop/get-shop-info/s1", 200, SHOP),
        ("/product/get-all-products-shop/s1", 200, PRODUCTS),
        ("/event/get-all-events/s1", 200, EVENTS),
        ("/category/get-all-categories", 200, CATEGORIES),
        ("/shop/get-shop-info/broken", 200, "<html>oops</html>"),
        ("/product/get-all-products-shop/broken", 500, "{}"),
        ("/event/get-all-events/broken", 200, EVENTS),
        ("/shop/get-shop-info/odd", 200, ODD_SHOP),
        ("/product/get-all-products-shop/odd", 200, ODD_PRODUCTS),
        ("/event/get-all-events/odd", 200, ODD_EVENTS),
    ])
    .await;
    BackendClient::new(&base, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_preview_loads_and_feeds_catalog() {
    let client = happy_backend().await;
    let scope = RequestScope::new();

    let mut state = LoadState::Loading;
    state.apply(load_preview(&client, &scope.handle(), "s1").await);
    let preview = state.loaded().expect("preview should load").clone();

    assert_eq!(preview.shop.name, "Lamp House");
    assert_eq!(preview.products.len(), 4);
    assert_eq!(preview.events.len(), 3);
    assert_eq!(preview.rating.review_count, 1);
    assert_eq!(preview.rating.rated_products, 2);

    let history = MemoryHistory::new(Location::parse("/products?search=la").unwrap());
    let mut view = CatalogView::new(preview.products.clone(), 12, history);

    let names: Vec<&str> = view.current_page().items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Lamp", "Latch"]);

    view.toggle_price(1);
    let names: Vec<&str> = view.current_page().items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Lamp"]);

    view.reset();
    view.select_category(Some("furniture"));
    let names: Vec<&str> = view.current_page().items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Desk", "Chair"]);
    assert_eq!(view.navigator().current().path_and_query(), "/products?category=furniture");
    assert_eq!(view.navigator().len(), 1);

    let categories = client.categories().await.unwrap();
    assert_eq!(categories[0].title, "Lighting");
}

#[tokio::test]
async fn test_preview_events_drive_countdowns() {
    let client = happy_backend().await;
    let scope = RequestScope::new();

    let mut state = LoadState::Loading;
    state.apply(load_preview(&client, &scope.handle(), "s1").await);
    let preview = state.loaded().unwrap();

    let mut board = CountdownBoard::new(false);
    let now = chrono::Utc::now().timestamp_millis();
    let mut expired = Vec::new();
    for event in &preview.events {
        for update in board.watch(event, now) {
            if let Event::Expired { event_id } = update {
                expired.push(event_id);
            }
        }
    }

    expired.sort();
    assert_eq!(expired, vec!["e-broken", "e-past"]);
    assert_eq!(board.countdown("e-future").unwrap().phase(), Phase::Counting);

    // A second later nothing re-fires
    let later = board.on_tick(now + 1000);
    assert!(later.iter().all(|e| !matches!(e, Event::Expired { .. })));
}

#[tokio::test]
async fn test_loose_payloads_still_load() {
    let client = happy_backend().await;
    let scope = RequestScope::new();

    let mut state = LoadState::Loading;
    state.apply(load_preview(&client, &scope.handle(), "odd").await);
    let preview = state.loaded().expect("loose payloads should still decode");

    assert_eq!(preview.shop.name, "");
    assert_eq!(preview.products[0].category, "");
    assert_eq!(preview.events.len(), 4);

    let mut board = CountdownBoard::new(false);
    let now = chrono::Utc::now().timestamp_millis();
    let mut expired = Vec::new();
    for event in &preview.events {
        for update in board.watch(event, now) {
            if let Event::Expired { event_id } = update {
                expired.push(event_id);
            }
        }
    }

    expired.sort();
    assert_eq!(expired, vec!["e-flag", "e-object"]);
    assert_eq!(board.countdown("e-millis").unwrap().phase(), Phase::Counting);
    assert_eq!(board.countdown("e-date").unwrap().phase(), Phase::Counting);
}

#[tokio::test]
async fn test_unknown_shop_fails_softly() {
    let client = happy_backend().await;
    let scope = RequestScope::new();

    let mut state = LoadState::Loading;
    state.apply(load_preview(&client, &scope.handle(), "nope").await);

    match state {
        LoadState::Failed(message) => assert!(message.contains("could not be found")),
        other => panic!("expected failure, got {:?}", other.loaded().map(|p| &p.shop.name)),
    }
}

#[tokio::test]
async fn test_server_error_fails_softly() {
    let client = happy_backend().await;
    let scope = RequestScope::new();

    let mut state = LoadState::Loading;
    state.apply(load_preview(&client, &scope.handle(), "broken").await);

    assert!(matches!(state, LoadState::Failed(_)));
}

#[tokio::test]
async fn test_cancelled_scope_leaves_state_loading() {
    let client = happy_backend().await;
    let scope = RequestScope::new();
    let handle = scope.handle();
    scope.cancel();

    let mut state = LoadState::Loading;
    state.apply(load_preview(&client, &handle, "s1").await);

    assert!(matches!(state, LoadState::Loading));
}
