use serde_json::json;

use crate::common::{TestApp, TestResponse, routes};

mod registration {
    use super::*;

    #[tokio::test]
    async fn visitor_can_register_an_account() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "ada", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 201);
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["username"], "ada");
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let app = TestApp::spawn().await;
        let body = json!({"username": "ada", "password": "securepass"});

        let first = app.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(first.status, 201, "First registration failed: {}", first.text);

        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "USERNAME_TAKEN");
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "ada", "password": "short"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn username_with_symbols_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "ada lovelace!", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod role_routing {
    use super::*;

    #[tokio::test]
    async fn new_accounts_are_members_sent_to_the_public_site() {
        let app = TestApp::spawn().await;
        let body = json!({"username": "ada", "password": "securepass"});

        let reg = app.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(reg.status, 201, "Registration failed: {}", reg.text);
        let res = app.post_without_token(routes::LOGIN, &body).await;

        assert_eq!(res.status, 200);
        assert!(res.body["token"].is_string());
        assert_eq!(res.body["role"], "member");
        assert_eq!(res.body["redirect"], "/");
        assert_eq!(res.body["permissions"], json!([]));
    }

    #[tokio::test]
    async fn editors_land_on_the_dashboard_with_content_permissions() {
        let app = TestApp::spawn().await;

        let res = app.login_with_role("grace", "securepass", "editor").await;

        assert_eq!(res.body["role"], "editor");
        assert_eq!(res.body["redirect"], "/admin");
        let permissions = res.body["permissions"]
            .as_array()
            .expect("permissions should be an array");
        assert!(permissions.contains(&json!("content:edit")));
        assert!(permissions.contains(&json!("content:delete")));
        assert!(!permissions.contains(&json!("config:edit")));
    }

    #[tokio::test]
    async fn admins_land_on_the_dashboard_with_every_permission() {
        let app = TestApp::spawn().await;

        let res = app.login_with_role("root", "securepass", "admin").await;

        assert_eq!(res.body["redirect"], "/admin");
        let permissions = res.body["permissions"]
            .as_array()
            .expect("permissions should be an array");
        for permission in ["content:edit", "content:delete", "config:edit", "user:manage"] {
            assert!(permissions.contains(&json!(permission)), "missing {permission}");
        }
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("ada", "securepass").await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "ada", "password": "wrongpass"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn unknown_username_is_rejected_the_same_way() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "nobody", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }
}

mod tokens {
    use super::*;

    #[tokio::test]
    async fn me_returns_the_token_holder() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("ada", "securepass").await;

        let res = app.get_with_token(routes::ME, &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["username"], "ada");
        assert_eq!(res.body["role"], "member");
    }

    #[tokio::test]
    async fn missing_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::ME).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::ME, "not-a-valid-jwt").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn malformed_json_body_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .client
            .post(app.url(routes::REGISTER))
            .header("Content-Type", "application/json")
            .body("not valid json")
            .send()
            .await
            .expect("Failed to send request");

        let res = TestResponse::from_response(res).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}
