mod common;

use actix_web::test;
use serde_json::json;

use common::TestApp;

#[actix_web::test]
async fn test_stay_quote_with_default_markup() {
    let test_app = TestApp::with_markup(5.0);
    let hotel_id = test_app
        .seed_hotel(json!({
            "name": "Palm Court",
            "city": "Doha",
            "default_meal_plan": "HB",
            "base_rates": { "double_room": 300.0, "child_with_bed": 80.0 }
        }))
        .await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/hotels/{}/rates", hotel_id))
        .set_json(json!({ "room_type": "DBL", "meal_plan": "HB", "date": "2025-12-31", "price": 500 }))
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    let req = test::TestRequest::post()
        .uri("/api/quotations/stay")
        .set_json(json!({
            "hotel_id": hotel_id.to_hex(),
            "check_in": "2025-12-30",
            "check_out": "2026-01-01",
            "rooms": [
                { "room_type": "DBL" },
                { "room_type": "CWB_3_11", "quantity": 2 }
            ]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let quote: serde_json::Value = test::read_body_json(resp).await;

    assert_eq!(quote["meal_plan"], "HB");
    assert_eq!(quote["nights"], 2);
    assert_eq!(quote["lines"].as_array().unwrap().len(), 4);
    // (300 + 500) + 2 × 80 × 2
    assert_eq!(quote["subtotal"], 1120.0);
    assert_eq!(quote["markup_percent"], 5.0);
    assert_eq!(quote["markup"], 56.0);
    assert_eq!(quote["total"], 1176.0);
}

#[actix_web::test]
async fn test_stay_quote_errors() {
    let test_app = TestApp::new();
    let hotel_id = test_app
        .seed_hotel(json!({
            "name": "Palm Court",
            "city": "Doha",
            "base_rates": { "double_room": 300.0 }
        }))
        .await;
    let app = test::init_service(test_app.create_app()).await;

    let cases = [
        (json!({ "hotel_id": hotel_id.to_hex(), "check_in": "2025-06-05", "check_out": "2025-06-05",
                 "rooms": [{ "room_type": "DBL" }] }), 400),
        (json!({ "hotel_id": hotel_id.to_hex(), "check_in": "2025-06-01", "check_out": "2025-06-05",
                 "rooms": [{ "room_type": "DBL" }], "markup_percent": -2 }), 400),
        (json!({ "hotel_id": hotel_id.to_hex(), "check_in": "2025-06-01", "check_out": "2025-06-05",
                 "rooms": [{ "room_type": "SGL" }] }), 404),
        (json!({ "hotel_id": "65f0c0ffee0000000000beef", "check_in": "2025-06-01", "check_out": "2025-06-05",
                 "rooms": [{ "room_type": "DBL" }] }), 404),
    ];

    for (body, status) in cases {
        let req = test::TestRequest::post()
            .uri("/api/quotations/stay")
            .set_json(&body)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), status, "body {}", body);
    }
}
