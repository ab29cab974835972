use serde_json::json;

use crate::common::{TestApp, routes};

mod events {
    use super::*;

    fn event(title: &str, starts_at: &str, featured: bool) -> serde_json::Value {
        json!({
            "title": title,
            "description": "Talks and pizza",
            "location": "Room 101",
            "starts_at": starts_at,
            "is_featured": featured,
        })
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let created = app
            .post_with_token(routes::EVENTS, &event("Kickoff", "2026-09-01T17:00:00Z", false), &token)
            .await;
        assert_eq!(created.status, 201, "{}", created.text);
        assert_eq!(created.body["title"], "Kickoff");
        assert!(created.body["image_url"].is_null());
        let id = created.id();

        let fetched = app.get_without_token(&routes::item(routes::EVENTS, id)).await;
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body["location"], "Room 101");

        let updated = app
            .patch_with_token(
                &routes::item(routes::EVENTS, id),
                &json!({"title": "Kickoff Night", "location": null}),
                &token,
            )
            .await;
        assert_eq!(updated.status, 200, "{}", updated.text);
        assert_eq!(updated.body["title"], "Kickoff Night");
        assert!(updated.body["location"].is_null());
        assert_eq!(updated.body["description"], "Talks and pizza");

        let deleted = app
            .delete_with_token(&routes::item(routes::EVENTS, id), &token)
            .await;
        assert_eq!(deleted.status, 204);

        let gone = app.get_without_token(&routes::item(routes::EVENTS, id)).await;
        assert_eq!(gone.status, 404);
        assert_eq!(gone.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn featured_events_list_first() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        for (title, at, featured) in [
            ("Old", "2026-01-10T17:00:00Z", false),
            ("Featured", "2025-12-01T17:00:00Z", true),
            ("New", "2026-03-10T17:00:00Z", false),
        ] {
            let res = app
                .post_with_token(routes::EVENTS, &event(title, at, featured), &token)
                .await;
            assert_eq!(res.status, 201, "{}", res.text);
        }

        let list = app.get_without_token(routes::EVENTS).await;
        let titles: Vec<&str> = list
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, ["Featured", "New", "Old"]);
    }

    #[tokio::test]
    async fn rejects_blank_title_and_bad_urls() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let blank = app
            .post_with_token(routes::EVENTS, &event("   ", "2026-09-01T17:00:00Z", false), &token)
            .await;
        assert_eq!(blank.status, 400);
        assert_eq!(blank.body["code"], "VALIDATION_ERROR");

        let mut bad_url = event("Hack night", "2026-09-01T17:00:00Z", false);
        bad_url["registration_url"] = json!("javascript:alert(1)");
        let res = app.post_with_token(routes::EVENTS, &bad_url, &token).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod members {
    use super::*;

    #[tokio::test]
    async fn positions_are_assigned_in_creation_order() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let mut ids = Vec::new();
        for name in ["Ada", "Grace", "Barbara"] {
            let res = app
                .post_with_token(
                    routes::MEMBERS,
                    &json!({"name": name, "role_title": "Board"}),
                    &token,
                )
                .await;
            assert_eq!(res.status, 201, "{}", res.text);
            ids.push(res.id());
        }

        let moved = app
            .patch_with_token(&routes::item(routes::MEMBERS, ids[2]), &json!({"position": 0}), &token)
            .await;
        assert_eq!(moved.status, 200);

        let list = app.get_without_token(routes::MEMBERS).await;
        let names: Vec<&str> = list
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Ada", "Barbara", "Grace"]);
    }

    #[tokio::test]
    async fn negative_position_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::MEMBERS,
                &json!({"name": "Ada", "role_title": "Board", "position": -1}),
                &token,
            )
            .await;
        assert_eq!(res.status, 400);
    }
}

mod mentors_startups_sponsors {
    use super::*;

    #[tokio::test]
    async fn mentors_list_alphabetically() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        for name in ["Zed", "Alice"] {
            app.post_with_token(
                routes::MENTORS,
                &json!({"name": name, "expertise": "Fundraising"}),
                &token,
            )
            .await;
        }

        let list = app.get_without_token(routes::MENTORS).await;
        assert_eq!(list.body[0]["name"], "Alice");
        assert_eq!(list.body[1]["name"], "Zed");
    }

    #[tokio::test]
    async fn startup_optional_fields_can_be_cleared() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let created = app
            .post_with_token(
                routes::STARTUPS,
                &json!({
                    "name": "Acme",
                    "tagline": "Robots for everyone",
                    "website_url": "https://acme.example.com",
                    "founded_year": 2024,
                }),
                &token,
            )
            .await;
        assert_eq!(created.status, 201, "{}", created.text);

        let updated = app
            .patch_with_token(
                &routes::item(routes::STARTUPS, created.id()),
                &json!({"website_url": null, "founded_year": null}),
                &token,
            )
            .await;
        assert_eq!(updated.status, 200, "{}", updated.text);
        assert!(updated.body["website_url"].is_null());
        assert!(updated.body["founded_year"].is_null());
        assert_eq!(updated.body["tagline"], "Robots for everyone");
    }

    #[tokio::test]
    async fn sponsor_crud_and_missing_records() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let created = app
            .post_with_token(
                routes::SPONSORS,
                &json!({"name": "Initech", "tier": "Gold"}),
                &token,
            )
            .await;
        assert_eq!(created.status, 201, "{}", created.text);
        assert_eq!(created.body["position"], 0);

        let patched = app
            .patch_with_token(&routes::item(routes::SPONSORS, 9999), &json!({"tier": "Silver"}), &token)
            .await;
        assert_eq!(patched.status, 404);

        let deleted = app
            .delete_with_token(&routes::item(routes::SPONSORS, 9999), &token)
            .await;
        assert_eq!(deleted.status, 404);
    }
}

mod slides {
    use super::*;

    async fn slide_titles(app: &TestApp) -> Vec<String> {
        let list = app.get_without_token(routes::SLIDES).await;
        list.body
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["title"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn reorder_assigns_positions_by_index() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let a = app.create_slide(&token, "A").await;
        let b = app.create_slide(&token, "B").await;
        let c = app.create_slide(&token, "C").await;
        assert_eq!(slide_titles(&app).await, ["A", "B", "C"]);

        let res = app
            .put_with_token(routes::SLIDES_REORDER, &json!({"slide_ids": [c, a, b]}), &token)
            .await;
        assert_eq!(res.status, 204, "{}", res.text);
        assert_eq!(slide_titles(&app).await, ["C", "A", "B"]);

        let first = app.get_without_token(&routes::item(routes::SLIDES, c)).await;
        assert_eq!(first.body["position"], 0);
    }

    #[tokio::test]
    async fn reorder_requires_exactly_the_existing_slides() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let a = app.create_slide(&token, "A").await;
        let b = app.create_slide(&token, "B").await;

        for ids in [json!([a]), json!([a, b, 999]), json!([a, a, b]), json!([])] {
            let res = app
                .put_with_token(routes::SLIDES_REORDER, &json!({"slide_ids": ids}), &token)
                .await;
            assert_eq!(res.status, 400, "{ids}: {}", res.text);
        }
        assert_eq!(slide_titles(&app).await, ["A", "B"]);
    }

    #[tokio::test]
    async fn inactive_slides_stay_listed() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let id = app.create_slide(&token, "Archived").await;

        let res = app
            .patch_with_token(&routes::item(routes::SLIDES, id), &json!({"is_active": false}), &token)
            .await;
        assert_eq!(res.status, 200);

        let list = app.get_without_token(routes::SLIDES).await;
        assert_eq!(list.body[0]["is_active"], false);
    }
}

mod site_config {
    use super::*;

    #[tokio::test]
    async fn defaults_are_public() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::SITE_CONFIG).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["site_title"], "Startup Club");
        assert!(res.body["logo_url"].is_null());
    }

    #[tokio::test]
    async fn only_admins_edit_site_config() {
        let app = TestApp::spawn().await;
        let editor = app.create_user_with_role("grace", "securepass", "editor").await;
        let admin = app.admin_token().await;
        let patch = json!({"hero_heading": "Build something", "contact_email": "team@club.example"});

        let denied = app.patch_with_token(routes::SITE_CONFIG, &patch, &editor).await;
        assert_eq!(denied.status, 403);

        let res = app.patch_with_token(routes::SITE_CONFIG, &patch, &admin).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["hero_heading"], "Build something");
        assert_eq!(res.body["contact_email"], "team@club.example");
        assert_eq!(res.body["site_title"], "Startup Club");
    }

    #[tokio::test]
    async fn invalid_email_is_rejected() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;

        let res = app
            .patch_with_token(routes::SITE_CONFIG, &json!({"contact_email": "nope"}), &admin)
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod access {
    use super::*;

    #[tokio::test]
    async fn writes_need_a_token() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::SLIDES, &json!({"title": "Sneaky"}))
            .await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn members_cannot_write_and_editors_can() {
        let app = TestApp::spawn().await;
        let member = app.create_authenticated_user("ada", "securepass").await;
        let editor = app.create_user_with_role("grace", "securepass", "editor").await;
        let body = json!({"name": "Zed", "expertise": "Sales"});

        let denied = app.post_with_token(routes::MENTORS, &body, &member).await;
        assert_eq!(denied.status, 403);
        assert_eq!(denied.body["code"], "PERMISSION_DENIED");

        let created = app.post_with_token(routes::MENTORS, &body, &editor).await;
        assert_eq!(created.status, 201, "{}", created.text);
    }
}
