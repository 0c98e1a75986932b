mod common;

use actix_web::test;
use serde_json::{json, Value};

use common::{send, trip_body, TestApp};

fn names(body: &Value) -> Vec<String> {
    body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect()
}

#[actix_rt::test]
async fn test_query_that_sanitizes_to_nothing_returns_empty_page() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let ada = test_app.signup("Ada").await;
    test_app.create_trip(&ada, "Anything", true).await;

    for uri in ["/api/search/trips?q=%24%7B%7D%28%29", "/api/search/trips"] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(ada.auth())
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, 200);
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 0);
        assert_eq!(body["data"]["total"], 0);
        assert_eq!(body["data"]["hasMore"], false);
    }
}

#[actix_rt::test]
async fn test_trip_search_respects_access() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let ada = test_app.signup("Ada").await;
    let eve = test_app.signup("Eve").await;

    test_app.create_trip(&ada, "Nordic Public", true).await;
    test_app.create_trip(&ada, "Nordic Private", false).await;
    test_app.create_trip(&eve, "Nordic Eve", false).await;

    let req = test::TestRequest::get()
        .uri("/api/search/trips?q=nordic&sortBy=name")
        .insert_header(eve.auth())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(names(&body), vec!["Nordic Eve", "Nordic Public"]);
    assert_eq!(body["data"]["total"], 2);

    let req = test::TestRequest::get()
        .uri("/api/search/trips?q=nordic")
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, 401);
}

#[actix_rt::test]
async fn test_trip_search_paginates() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let ada = test_app.signup("Ada").await;
    for name in ["Coast A", "Coast B", "Coast C"] {
        test_app.create_trip(&ada, name, true).await;
    }

    let req = test::TestRequest::get()
        .uri("/api/search/trips?q=coast&sortBy=name&limit=2&offset=0")
        .insert_header(ada.auth())
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(names(&body), vec!["Coast A", "Coast B"]);
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["hasMore"], true);

    let req = test::TestRequest::get()
        .uri("/api/search/trips?q=coast&sortBy=name&limit=2&offset=2")
        .insert_header(ada.auth())
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(names(&body), vec!["Coast C"]);
    assert_eq!(body["data"]["hasMore"], false);

    let req = test::TestRequest::get()
        .uri("/api/search/trips?q=coast&limit=500")
        .insert_header(ada.auth())
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body["data"]["limit"], 50);
}

#[actix_rt::test]
async fn test_trip_search_filters_by_country() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let ada = test_app.signup("Ada").await;

    let iberia = test_app.create_trip(&ada, "Sunny Iberia", true).await;
    test_app
        .add_stop(&ada, iberia["_id"].as_str().unwrap(), "Porto", "Portugal", (1, 3))
        .await;
    let alps = test_app.create_trip(&ada, "Sunny Alps", true).await;
    test_app
        .add_stop(&ada, alps["_id"].as_str().unwrap(), "Zermatt", "Switzerland", (1, 3))
        .await;

    let req = test::TestRequest::get()
        .uri("/api/search/trips?q=sunny&country=portugal")
        .insert_header(ada.auth())
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(names(&body), vec!["Sunny Iberia"]);

    let req = test::TestRequest::get()
        .uri("/api/search/trips?q=zermatt")
        .insert_header(ada.auth())
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(names(&body), vec!["Sunny Alps"]);
}

#[actix_rt::test]
async fn test_user_search_hides_credentials() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let ada = test_app.signup("Ada").await;
    test_app.signup("Adalbert").await;
    test_app.signup("Bob").await;

    let req = test::TestRequest::get()
        .uri("/api/search/users?q=ada")
        .insert_header(ada.auth())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["total"], 2);
    for user in body["data"]["items"].as_array().unwrap() {
        assert!(user.get("password").is_none());
    }
}

#[actix_rt::test]
async fn test_popular_destinations_are_public() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let ada = test_app.signup("Ada").await;

    let one = test_app.create_trip(&ada, "One", true).await;
    let one = one["_id"].as_str().unwrap();
    test_app.add_stop(&ada, one, "Rome", "Italy", (1, 3)).await;
    test_app.add_stop(&ada, one, "Rome", "Italy", (5, 7)).await;
    test_app.add_stop(&ada, one, "Paris", "France", (3, 5)).await;

    let two = test_app.create_trip(&ada, "Two", true).await;
    let two = two["_id"].as_str().unwrap();
    test_app.add_stop(&ada, two, "Paris", "France", (1, 3)).await;

    let hidden = test_app.create_trip(&ada, "Hidden", false).await;
    let hidden = hidden["_id"].as_str().unwrap();
    test_app.add_stop(&ada, hidden, "Oslo", "Norway", (1, 3)).await;

    let req = test::TestRequest::get()
        .uri("/api/search/destinations/popular")
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    let destinations = body["data"].as_array().unwrap();
    assert_eq!(destinations.len(), 2);
    assert_eq!(destinations[0]["city"], "Paris");
    assert_eq!(destinations[0]["tripCount"], 2);
    assert_eq!(destinations[1]["city"], "Rome");
    assert_eq!(destinations[1]["tripCount"], 1);
    assert_eq!(destinations[1]["occurrences"], 2);

    let req = test::TestRequest::get()
        .uri("/api/search/destinations/popular?limit=1")
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[actix_rt::test]
async fn test_suggestions_list_locations_then_trips() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let ada = test_app.signup("Ada").await;

    let trip = test_app.create_trip(&ada, "Paris in Spring", true).await;
    test_app
        .add_stop(&ada, trip["_id"].as_str().unwrap(), "Paris", "France", (1, 3))
        .await;

    let req = test::TestRequest::get()
        .uri("/api/search/suggestions?q=par")
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    let suggestions = body["data"].as_array().unwrap();
    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0]["kind"], "location");
    assert_eq!(suggestions[0]["text"], "Paris, France");
    assert_eq!(suggestions[1]["kind"], "trip");
    assert_eq!(suggestions[1]["tripId"], trip["_id"]);

    let req = test::TestRequest::get()
        .uri("/api/search/suggestions?q=%21%21")
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[actix_rt::test]
async fn test_offset_at_u64_max_returns_empty_page() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let ada = test_app.signup("Ada").await;
    test_app.create_trip(&ada, "Coast", true).await;

    for uri in [
        "/api/search/trips?q=coast&offset=18446744073709551615",
        "/api/search/trips?q=%24%24&offset=18446744073709551615",
        "/api/search/users?q=ada&offset=18446744073709551615",
    ] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(ada.auth())
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, 200, "{}", uri);
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 0);
        assert_eq!(body["data"]["hasMore"], false);
    }
}

#[actix_rt::test]
async fn test_trip_search_filters_and_sorts() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let ada = test_app.signup("Ada").await;

    let trips = [
        ("Fjord Cheap", 800.0, "adventure", "2024-05-20T00:00:00Z"),
        ("Fjord Mid", 1000.0, "cultural", "2024-06-01T00:00:00Z"),
        ("Fjord Top", 2500.0, "adventure", "2024-06-03T00:00:00Z"),
        ("Fjord Lux", 4000.0, "luxury", "2024-06-02T00:00:00Z"),
    ];
    for (name, total, theme, start) in trips {
        let mut body = trip_body(name, true);
        body["budget"]["total"] = json!(total);
        body["theme"] = json!(theme);
        body["startDate"] = json!(start);
        let req = test::TestRequest::post()
            .uri("/api/trips")
            .insert_header(ada.auth())
            .set_json(body)
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, 201);
    }

    let cases = [
        (
            "/api/search/trips?q=fjord&minBudget=1000&maxBudget=2500&sortBy=budget",
            vec!["Fjord Top", "Fjord Mid"],
        ),
        (
            "/api/search/trips?q=fjord&theme=adventure&sortBy=name",
            vec!["Fjord Cheap", "Fjord Top"],
        ),
        (
            "/api/search/trips?q=fjord&startDate=2024-06-01T00:00:00Z&sortBy=date",
            vec!["Fjord Mid", "Fjord Lux", "Fjord Top"],
        ),
        (
            "/api/search/trips?q=fjord&status=completed",
            Vec::new(),
        ),
    ];
    for (uri, expected) in cases {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(ada.auth())
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, 200, "{}", uri);
        assert_eq!(names(&body), expected, "{}", uri);
    }
}
