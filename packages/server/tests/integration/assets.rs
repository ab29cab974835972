use serde_json::json;

use crate::common::{TestApp, png_bytes, routes, settle};

const MB: usize = 1024 * 1024;

fn assert_generated_key(url: &str, base: &str, bucket: &str, ext: &str) {
    let prefix = format!("{base}/{bucket}/");
    let key = url
        .strip_prefix(&prefix)
        .unwrap_or_else(|| panic!("{url} is not under {prefix}"));
    let stem = key
        .strip_suffix(&format!(".{ext}"))
        .unwrap_or_else(|| panic!("{key} does not end with .{ext}"));
    assert_eq!(stem.len(), 36, "{stem} is not a UUID");
    assert_eq!(stem.matches('-').count(), 4, "{stem} is not a UUID");
}

mod record_images {
    use super::*;

    #[tokio::test]
    async fn png_upload_is_linked_to_the_slide() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let slide_id = app.create_slide(&token, "Hackathon finals").await;

        let res = app
            .upload_with_token(
                &routes::image(routes::SLIDES, slide_id),
                "Finals Photo.PNG",
                "image/png",
                png_bytes(2 * MB),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "upload failed: {}", res.text);
        let url = res.body["url"].as_str().unwrap().to_string();
        assert_generated_key(&url, &app.url("/media"), "slides", "png");
        assert_eq!(res.body["bucket"], "slides");
        assert_eq!(res.body["size"], 2 * MB);
        assert_eq!(res.body["content_type"], "image/png");
        assert_eq!(res.body["attempts"], 1);
        assert!(res.body["replaced"].is_null());

        let slide = app
            .get_without_token(&routes::item(routes::SLIDES, slide_id))
            .await;
        assert_eq!(slide.body["image_url"], url.as_str());

        let fetched = app.fetch(&url).await;
        assert_eq!(fetched.status(), 200);
        assert_eq!(fetched.headers()["content-type"], "image/png");
        assert_eq!(fetched.bytes().await.unwrap().len(), 2 * MB);
    }

    #[tokio::test]
    async fn jpeg_between_ceiling_and_body_limit_is_too_large() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let slide_id = app.create_slide(&token, "Almost").await;

        let res = app
            .upload_with_token(
                &routes::image(routes::SLIDES, slide_id),
                "big.jpg",
                "image/jpeg",
                vec![0xFF; 16 * MB],
                &token,
            )
            .await;

        assert_eq!(res.status, 413, "{}", res.text);
        assert_eq!(res.body["code"], "FILE_TOO_LARGE");
        assert!(res.body["message"].as_str().unwrap().contains("15 MB"));
        assert_eq!(app.stored_objects("slides"), 0);
    }

    /// The body is larger than the route's default body limit, so the
    /// multipart stream is cut off before the policy ceiling is checked.
    #[tokio::test]
    async fn oversized_jpeg_is_rejected_without_storing_anything() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let slide_id = app.create_slide(&token, "Too big").await;

        let res = app
            .upload_with_token(
                &routes::image(routes::SLIDES, slide_id),
                "huge.jpg",
                "image/jpeg",
                vec![0xFF; 20 * MB],
                &token,
            )
            .await;

        assert_eq!(res.status, 413, "{}", res.text);
        assert_eq!(res.body["code"], "FILE_TOO_LARGE");
        assert!(res.body["message"].as_str().unwrap().contains("15 MB"));
        assert_eq!(app.stored_objects("slides"), 0);

        let slide = app
            .get_without_token(&routes::item(routes::SLIDES, slide_id))
            .await;
        assert!(slide.body["image_url"].is_null());
    }

    #[tokio::test]
    async fn avatars_have_a_lower_ceiling() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let member = app
            .post_with_token(
                routes::MEMBERS,
                &json!({"name": "Grace Hopper", "role_title": "President"}),
                &token,
            )
            .await;
        assert_eq!(member.status, 201, "{}", member.text);

        let res = app
            .upload_with_token(
                &routes::image(routes::MEMBERS, member.id()),
                "me.png",
                "image/png",
                png_bytes(11 * MB),
                &token,
            )
            .await;

        assert_eq!(res.status, 413);
        assert_eq!(res.body["code"], "FILE_TOO_LARGE");
        assert!(res.body["message"].as_str().unwrap().contains("10 MB"));
    }

    #[tokio::test]
    async fn non_image_is_rejected_as_invalid_type() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let slide_id = app.create_slide(&token, "Docs").await;

        let res = app
            .upload_with_token(
                &routes::image(routes::SLIDES, slide_id),
                "slides.pdf",
                "application/pdf",
                b"%PDF-1.7".to_vec(),
                &token,
            )
            .await;

        assert_eq!(res.status, 415);
        assert_eq!(res.body["code"], "INVALID_FILE_TYPE");
        assert_eq!(app.stored_objects("slides"), 0);
    }

    #[tokio::test]
    async fn svg_is_accepted_for_logos_only() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg"/>"#.to_vec();

        let sponsor = app
            .post_with_token(routes::SPONSORS, &json!({"name": "Initech", "tier": "Gold"}), &token)
            .await;
        let res = app
            .upload_with_token(
                &routes::image(routes::SPONSORS, sponsor.id()),
                "logo.svg",
                "image/svg+xml",
                svg.clone(),
                &token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_generated_key(
            res.body["url"].as_str().unwrap(),
            &app.url("/media"),
            "sponsor-logos",
            "svg",
        );

        let slide_id = app.create_slide(&token, "Vector").await;
        let res = app
            .upload_with_token(
                &routes::image(routes::SLIDES, slide_id),
                "logo.svg",
                "image/svg+xml",
                svg,
                &token,
            )
            .await;
        assert_eq!(res.status, 415);
    }

    #[tokio::test]
    async fn missing_content_type_is_guessed_from_the_file_name() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let slide_id = app.create_slide(&token, "Guess").await;

        let res = app
            .upload_with_token(
                &routes::image(routes::SLIDES, slide_id),
                "photo.webp",
                "application/octet-stream",
                b"RIFF\0\0\0\0WEBP".to_vec(),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["content_type"], "image/webp");
    }
}

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn replacing_an_image_reclaims_the_previous_object() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let slide_id = app.create_slide(&token, "Replace me").await;
        let path = routes::image(routes::SLIDES, slide_id);

        let first = app
            .upload_with_token(&path, "a.png", "image/png", png_bytes(1024), &token)
            .await;
        assert_eq!(first.status, 201, "{}", first.text);
        let first_url = first.body["url"].as_str().unwrap().to_string();

        let second = app
            .upload_with_token(&path, "b.png", "image/png", png_bytes(2048), &token)
            .await;
        assert_eq!(second.status, 201, "{}", second.text);
        let second_url = second.body["url"].as_str().unwrap().to_string();
        assert_eq!(second.body["replaced"], first_url.as_str());
        assert_ne!(first_url, second_url);

        settle().await;
        assert_eq!(app.fetch(&first_url).await.status(), 404);
        assert_eq!(app.fetch(&second_url).await.status(), 200);
        assert_eq!(app.stored_objects("slides"), 1);
    }

    #[tokio::test]
    async fn clearing_an_image_unlinks_and_reclaims_it() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let slide_id = app.create_slide(&token, "Clear me").await;
        let path = routes::image(routes::SLIDES, slide_id);

        let uploaded = app
            .upload_with_token(&path, "a.png", "image/png", png_bytes(1024), &token)
            .await;
        let url = uploaded.body["url"].as_str().unwrap().to_string();

        let res = app.delete_with_token(&path, &token).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["removed"], url.as_str());

        let slide = app
            .get_without_token(&routes::item(routes::SLIDES, slide_id))
            .await;
        assert!(slide.body["image_url"].is_null());

        settle().await;
        assert_eq!(app.stored_objects("slides"), 0);

        let again = app.delete_with_token(&path, &token).await;
        assert_eq!(again.status, 200);
        assert!(again.body["removed"].is_null());
    }

    #[tokio::test]
    async fn deleting_the_record_reclaims_its_image() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let mentor = app
            .post_with_token(
                routes::MENTORS,
                &json!({"name": "Linus", "expertise": "Kernels"}),
                &token,
            )
            .await;
        let uploaded = app
            .upload_with_token(
                &routes::image(routes::MENTORS, mentor.id()),
                "linus.jpg",
                "image/jpeg",
                vec![0xFF, 0xD8, 0xFF, 0xE0],
                &token,
            )
            .await;
        assert_eq!(uploaded.status, 201, "{}", uploaded.text);
        assert_eq!(app.stored_objects("mentor-photos"), 1);

        let res = app
            .delete_with_token(&routes::item(routes::MENTORS, mentor.id()), &token)
            .await;
        assert_eq!(res.status, 204);

        settle().await;
        assert_eq!(app.stored_objects("mentor-photos"), 0);
    }

    #[tokio::test]
    async fn patching_in_an_external_url_reclaims_only_the_stored_object() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let event = app
            .post_with_token(
                routes::EVENTS,
                &json!({
                    "title": "Demo Day",
                    "description": "Pitches",
                    "starts_at": "2026-05-01T18:00:00Z",
                }),
                &token,
            )
            .await;
        assert_eq!(event.status, 201, "{}", event.text);
        let uploaded = app
            .upload_with_token(
                &routes::image(routes::EVENTS, event.id()),
                "banner.gif",
                "image/gif",
                b"GIF89a".to_vec(),
                &token,
            )
            .await;
        assert_eq!(uploaded.status, 201, "{}", uploaded.text);

        let external = "https://cdn.example.com/banner.png";
        let res = app
            .patch_with_token(
                &routes::item(routes::EVENTS, event.id()),
                &json!({"image_url": external}),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["image_url"], external);

        settle().await;
        assert_eq!(app.stored_objects("event-images"), 0);

        let cleared = app
            .patch_with_token(
                &routes::item(routes::EVENTS, event.id()),
                &json!({"image_url": null}),
                &token,
            )
            .await;
        assert_eq!(cleared.status, 200);
        assert!(cleared.body["image_url"].is_null());
    }

    #[tokio::test]
    async fn image_shared_by_two_records_survives_deleting_one() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let first = app.create_slide(&token, "Original").await;
        let uploaded = app
            .upload_with_token(
                &routes::image(routes::SLIDES, first),
                "a.png",
                "image/png",
                png_bytes(1024),
                &token,
            )
            .await;
        assert_eq!(uploaded.status, 201, "{}", uploaded.text);
        let url = uploaded.body["url"].as_str().unwrap().to_string();

        let copy = app
            .post_with_token(
                routes::SLIDES,
                &json!({"title": "Copy", "image_url": url}),
                &token,
            )
            .await;
        assert_eq!(copy.status, 201, "{}", copy.text);

        let deleted = app
            .delete_with_token(&routes::item(routes::SLIDES, copy.id()), &token)
            .await;
        assert_eq!(deleted.status, 204);

        settle().await;
        assert_eq!(app.fetch(&url).await.status(), 200);

        let cleared = app
            .delete_with_token(&routes::image(routes::SLIDES, first), &token)
            .await;
        assert_eq!(cleared.status, 200);
        settle().await;
        assert_eq!(app.fetch(&url).await.status(), 404);
    }

    #[tokio::test]
    async fn replacing_a_shared_image_keeps_it_for_the_other_owner() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let sponsor = app
            .post_with_token(routes::SPONSORS, &json!({"name": "Initech", "tier": "Gold"}), &token)
            .await;
        let uploaded = app
            .upload_with_token(
                &routes::image(routes::SPONSORS, sponsor.id()),
                "logo.png",
                "image/png",
                png_bytes(256),
                &token,
            )
            .await;
        let url = uploaded.body["url"].as_str().unwrap().to_string();

        let startup = app
            .post_with_token(
                routes::STARTUPS,
                &json!({"name": "Initech Labs", "tagline": "Spin-off", "logo_url": url}),
                &token,
            )
            .await;
        assert_eq!(startup.status, 201, "{}", startup.text);

        let replaced = app
            .upload_with_token(
                &routes::image(routes::SPONSORS, sponsor.id()),
                "logo2.png",
                "image/png",
                png_bytes(512),
                &token,
            )
            .await;
        assert_eq!(replaced.status, 201, "{}", replaced.text);
        assert_eq!(replaced.body["replaced"], url.as_str());

        settle().await;
        assert_eq!(app.fetch(&url).await.status(), 200);
    }

    #[tokio::test]
    async fn upload_for_a_missing_record_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .upload_with_token(
                &routes::image(routes::STARTUPS, 4242),
                "logo.png",
                "image/png",
                png_bytes(64),
                &token,
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
        // The object was stored before linking failed and is left in place.
        assert_eq!(app.stored_objects("startup-logos"), 1);
    }
}

mod unowned_uploads {
    use super::*;

    #[tokio::test]
    async fn upload_then_create_record_with_the_url() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .upload_with_token(
                &routes::upload("startups"),
                "acme.png",
                "image/png",
                png_bytes(512),
                &token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["attempts"], 1);
        let url = res.body["url"].as_str().unwrap().to_string();
        assert_generated_key(&url, &app.url("/media"), "startup-logos", "png");

        let startup = app
            .post_with_token(
                routes::STARTUPS,
                &json!({"name": "Acme", "tagline": "Robots", "logo_url": url}),
                &token,
            )
            .await;
        assert_eq!(startup.status, 201, "{}", startup.text);
        assert_eq!(startup.body["logo_url"], url.as_str());
    }

    #[tokio::test]
    async fn unknown_kind_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .upload_with_token(
                &routes::upload("spaceships"),
                "x.png",
                "image/png",
                png_bytes(8),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
    }
}

mod permissions {
    use super::*;

    #[tokio::test]
    async fn members_cannot_upload() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let slide_id = app.create_slide(&admin, "Locked").await;
        let member = app.create_authenticated_user("ada", "securepass").await;

        let res = app
            .upload_with_token(
                &routes::image(routes::SLIDES, slide_id),
                "a.png",
                "image/png",
                png_bytes(8),
                &member,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
        assert_eq!(app.stored_objects("slides"), 0);
    }

    #[tokio::test]
    async fn site_logo_requires_config_permission() {
        let app = TestApp::spawn().await;
        let editor = app.create_user_with_role("grace", "securepass", "editor").await;
        let admin = app.admin_token().await;
        let path = routes::image(routes::SITE_CONFIG, 1);

        let denied = app
            .upload_with_token(&path, "logo.svg", "image/svg+xml", b"<svg/>".to_vec(), &editor)
            .await;
        assert_eq!(denied.status, 403);

        let res = app
            .upload_with_token(&path, "logo.svg", "image/svg+xml", b"<svg/>".to_vec(), &admin)
            .await;
        assert_eq!(res.status, 201, "{}", res.text);

        let config = app.get_without_token(routes::SITE_CONFIG).await;
        assert_eq!(config.body["logo_url"], res.body["url"]);
    }

    #[tokio::test]
    async fn media_for_unknown_keys_is_not_found() {
        let app = TestApp::spawn().await;

        let missing = app
            .fetch(&app.url("/media/slides/00000000-0000-4000-8000-000000000000.png"))
            .await;
        assert_eq!(missing.status(), 404);

        let traversal = app.fetch(&app.url("/media/slides/..%2Fsecret")).await;
        assert_eq!(traversal.status(), 404);
    }
}
