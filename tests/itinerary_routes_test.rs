mod common;

use actix_web::test;
use serde_json::json;

use common::{activity_body, send, stop_body, TestApp};

#[actix_rt::test]
async fn test_stop_budget_follows_accommodation_and_activities() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let ada = test_app.signup("Ada").await;
    let trip = test_app.create_trip(&ada, "Portugal", false).await;
    let trip_uri = format!("/api/trips/{}", trip["_id"].as_str().unwrap());

    let req = test::TestRequest::post()
        .uri(&format!("{}/stops", trip_uri))
        .insert_header(ada.auth())
        .set_json(stop_body("Lisbon", "Portugal", 1, 4))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 201);
    let stop = &body["data"]["stop"];
    assert_eq!(stop["duration"], 3);
    assert_eq!(stop["order"], 0);
    assert_eq!(stop["accommodation"]["nights"], 3);
    assert_eq!(body["data"]["budget"]["totalBudget"], 300.0);
    let stop_uri = format!("{}/stops/{}", trip_uri, stop["_id"].as_str().unwrap());

    let req = test::TestRequest::put()
        .uri(&stop_uri)
        .insert_header(ada.auth())
        .set_json(json!({ "accommodation": { "totalCost": 300.0 } }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["budget"]["totalBudget"], 600.0);

    for (day, start, end, cost) in [(1, "09:00", "11:00", 50.0), (2, "14:00", "16:00", 25.0)] {
        let req = test::TestRequest::post()
            .uri(&format!("{}/activities", stop_uri))
            .insert_header(ada.auth())
            .set_json(activity_body(day, start, end, cost))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, 201);
        assert_eq!(body["data"]["activity"]["completed"], false);
    }

    let req = test::TestRequest::get()
        .uri(&trip_uri)
        .insert_header(ada.auth())
        .to_request();
    let (_, body) = send(&app, req).await;
    let stored = &body["data"]["itinerary"]["stops"][0];
    assert_eq!(stored["totalBudget"], 675.0);
    assert_eq!(stored["activities"].as_array().unwrap().len(), 2);

    let activity_id = stored["activities"][0]["_id"].as_str().unwrap();
    let req = test::TestRequest::delete()
        .uri(&format!("{}/activities/{}", stop_uri, activity_id))
        .insert_header(ada.auth())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["totalBudget"], 625.0);
    assert_eq!(body["data"]["activitiesCost"], 25.0);
}

#[actix_rt::test]
async fn test_stop_dates_must_fit_order() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let ada = test_app.signup("Ada").await;
    let trip = test_app.create_trip(&ada, "Portugal", false).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/trips/{}/stops", trip["_id"].as_str().unwrap()))
        .insert_header(ada.auth())
        .set_json(stop_body("Porto", "Portugal", 5, 3))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
}

#[actix_rt::test]
async fn test_delete_stop_resequences() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let ada = test_app.signup("Ada").await;
    let trip = test_app.create_trip(&ada, "Spain", false).await;
    let trip_id = trip["_id"].as_str().unwrap();

    test_app
        .add_stop(&ada, trip_id, "Madrid", "Spain", (1, 3))
        .await;
    let seville = test_app
        .add_stop(&ada, trip_id, "Seville", "Spain", (3, 5))
        .await;
    test_app
        .add_stop(&ada, trip_id, "Granada", "Spain", (5, 7))
        .await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/trips/{}/stops/{}", trip_id, seville))
        .insert_header(ada.auth())
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, 200);

    let req = test::TestRequest::get()
        .uri(&format!("/api/trips/{}", trip_id))
        .insert_header(ada.auth())
        .to_request();
    let (_, body) = send(&app, req).await;
    let stops = body["data"]["itinerary"]["stops"].as_array().unwrap();
    let summary: Vec<(String, u64)> = stops
        .iter()
        .map(|s| {
            (
                s["city"].as_str().unwrap().to_string(),
                s["order"].as_u64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![("Madrid".to_string(), 0), ("Granada".to_string(), 1)]
    );

    let req = test::TestRequest::delete()
        .uri(&format!("/api/trips/{}/stops/{}", trip_id, seville))
        .insert_header(ada.auth())
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_reorder_validates_before_writing() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let ada = test_app.signup("Ada").await;
    let trip = test_app.create_trip(&ada, "Spain", false).await;
    let trip_id = trip["_id"].as_str().unwrap();

    let madrid = test_app
        .add_stop(&ada, trip_id, "Madrid", "Spain", (1, 3))
        .await;
    let seville = test_app
        .add_stop(&ada, trip_id, "Seville", "Spain", (3, 5))
        .await;
    let granada = test_app
        .add_stop(&ada, trip_id, "Granada", "Spain", (5, 7))
        .await;
    let uri = format!("/api/trips/{}/stops/reorder", trip_id);

    let bad = [
        json!({ "stopIds": [madrid, seville] }),
        json!({ "stopIds": [madrid, seville, "unknown"] }),
        json!({ "stopIds": [madrid, madrid, granada] }),
    ];
    for body in bad {
        let req = test::TestRequest::put()
            .uri(&uri)
            .insert_header(ada.auth())
            .set_json(body)
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, 400);
        assert_eq!(body["errors"][0]["field"], "stopIds");
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/trips/{}", trip_id))
        .insert_header(ada.auth())
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body["data"]["version"], 3);
    assert_eq!(body["data"]["itinerary"]["stops"][0]["city"], "Madrid");

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(ada.auth())
        .set_json(json!({ "stopIds": [granada, madrid, seville] }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    let cities: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["city"].as_str().unwrap())
        .collect();
    assert_eq!(cities, vec!["Granada", "Madrid", "Seville"]);
    assert_eq!(body["data"][2]["order"], 2);
}

#[actix_rt::test]
async fn test_activity_schedule_validation() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let ada = test_app.signup("Ada").await;
    let trip = test_app.create_trip(&ada, "Portugal", false).await;
    let trip_id = trip["_id"].as_str().unwrap();
    let stop = test_app
        .add_stop(&ada, trip_id, "Lisbon", "Portugal", (1, 4))
        .await;
    let uri = format!("/api/trips/{}/stops/{}/activities", trip_id, stop);

    let cases = [
        (activity_body(4, "09:00", "10:00", 0.0), "day"),
        (activity_body(0, "09:00", "10:00", 0.0), "day"),
        (activity_body(1, "10:00", "10:00", 0.0), "endTime"),
        (activity_body(1, "11:00", "09:30", 0.0), "endTime"),
        (activity_body(1, "9:00", "10:00", 0.0), "startTime"),
    ];
    for (body, field) in cases {
        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(ada.auth())
            .set_json(body)
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, 400);
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert!(fields.contains(&field), "expected {} in {:?}", field, fields);
    }

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(ada.auth())
        .set_json(activity_body(3, "18:00", "20:00", 40.0))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 201);
    let activity_id = body["data"]["activity"]["_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("{}/{}", uri, activity_id))
        .insert_header(ada.auth())
        .set_json(json!({ "day": 5 }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, 400);

    let req = test::TestRequest::put()
        .uri(&format!("{}/{}", uri, activity_id))
        .insert_header(ada.auth())
        .set_json(json!({ "endTime": "17:00" }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, 400);

    let req = test::TestRequest::put()
        .uri(&format!("{}/{}", uri, activity_id))
        .insert_header(ada.auth())
        .set_json(json!({ "day": 2, "cost": 60.0 }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["activity"]["day"], 2);
    assert_eq!(body["data"]["budget"]["activitiesCost"], 60.0);
}

#[actix_rt::test]
async fn test_list_and_toggle_activities() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let ada = test_app.signup("Ada").await;
    let trip = test_app.create_trip(&ada, "Portugal", false).await;
    let trip_id = trip["_id"].as_str().unwrap();
    let stop = test_app
        .add_stop(&ada, trip_id, "Lisbon", "Portugal", (1, 4))
        .await;
    let uri = format!("/api/trips/{}/stops/{}/activities", trip_id, stop);

    for (day, start, end) in [(2, "15:00", "16:00"), (1, "08:30", "09:30"), (2, "10:00", "12:00")] {
        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(ada.auth())
            .set_json(activity_body(day, start, end, 10.0))
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, 201);
    }

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(ada.auth())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    let starts: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["startTime"].as_str().unwrap())
        .collect();
    assert_eq!(starts, vec!["08:30", "10:00", "15:00"]);

    let req = test::TestRequest::get()
        .uri(&format!("{}?day=2", uri))
        .insert_header(ada.auth())
        .to_request();
    let (_, body) = send(&app, req).await;
    let day_two = body["data"].as_array().unwrap();
    assert_eq!(day_two.len(), 2);
    let activity_id = day_two[0]["_id"].as_str().unwrap().to_string();

    let toggle_uri = format!("{}/{}/toggle", uri, activity_id);
    let req = test::TestRequest::patch()
        .uri(&toggle_uri)
        .insert_header(ada.auth())
        .set_json(json!({ "rating": 4 }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["activity"]["completed"], true);
    assert_eq!(body["data"]["activity"]["rating"], 4);

    let req = test::TestRequest::patch()
        .uri(&toggle_uri)
        .insert_header(ada.auth())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["activity"]["completed"], false);

    let req = test::TestRequest::patch()
        .uri(&toggle_uri)
        .insert_header(ada.auth())
        .set_json(json!({ "rating": 9 }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, 400);

    let req = test::TestRequest::patch()
        .uri(&format!("{}/missing/toggle", uri))
        .insert_header(ada.auth())
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, 404);
}
