#[cfg(test)]
mod tests {
    use crate::helpers::{
        admin_token, authorized, body_json, get, make_test_app, multipart_upload, post_json,
    };
    use api::auth::{Claims, verify_admin_token};
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};
    use db::{
        models::{attendance, student},
        test_utils::seed_students,
    };
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
    use serde_json::json;
    use tower::ServiceExt;
    use util::{
        event_date,
        test_helpers::{TEST_ADMIN_PASSWORD, TEST_JWT_SECRET},
    };

    const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot-really-a-png";

    // --- POST /api/admin/login ---

    #[tokio::test]
    async fn login_with_correct_password_returns_usable_token() {
        let (app, state, _tmp) = make_test_app().await;

        let req = authorized(
            post_json("/api/admin/login", &json!({ "password": TEST_ADMIN_PASSWORD })),
            None,
        );
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Login successful");
        let token = json["data"]["token"].as_str().unwrap().to_owned();
        assert!(json["data"]["expiresAt"].is_string());
        assert!(verify_admin_token(&state, &token).is_some());

        let response = app
            .oneshot(authorized(get("/api/admin/stats"), Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn login_with_wrong_or_empty_password_fails() {
        let (app, _state, _tmp) = make_test_app().await;

        let response = app
            .clone()
            .oneshot(authorized(
                post_json("/api/admin/login", &json!({ "password": "guess" })),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["message"], "Invalid password");

        let response = app
            .oneshot(authorized(
                post_json("/api/admin/login", &json!({ "password": "" })),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Password is required");
    }

    #[tokio::test]
    async fn login_is_behind_the_gate() {
        let (app, _state, _tmp) = make_test_app().await;

        let response = app
            .oneshot(post_json(
                "/api/admin/login",
                &json!({ "password": TEST_ADMIN_PASSWORD }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    // --- token checks ---

    #[tokio::test]
    async fn protected_routes_reject_missing_expired_and_forged_tokens() {
        let (app, state, _tmp) = make_test_app().await;

        let response = app
            .clone()
            .oneshot(authorized(get("/api/admin/stats"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let now = Utc::now();
        let expired = Claims {
            sub: "admin".into(),
            admin: true,
            iat: (now - Duration::hours(3)).timestamp() as usize,
            exp: (now - Duration::hours(2)).timestamp() as usize,
        };
        let expired_token = encode(
            &Header::new(Algorithm::HS256),
            &expired,
            &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        )
        .unwrap();
        let response = app
            .clone()
            .oneshot(authorized(get("/api/admin/stats"), Some(&expired_token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["message"], "Invalid token");

        let forged = encode(
            &Header::new(Algorithm::HS256),
            &Claims {
                exp: (now + Duration::hours(1)).timestamp() as usize,
                ..expired
            },
            &EncodingKey::from_secret(b"someone-elses-secret"),
        )
        .unwrap();
        let response = app
            .clone()
            .oneshot(authorized(post_json("/api/admin/reset", &json!({})), Some(&forged)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // A valid token does not bypass the shared-secret gate.
        let mut req = get("/api/admin/stats");
        req.headers_mut().insert(
            "authorization",
            format!("Bearer {}", admin_token(&state)).parse().unwrap(),
        );
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    // --- POST /api/admin/reset ---

    #[tokio::test]
    async fn reset_clears_only_todays_attendance() {
        let (app, state, _tmp) = make_test_app().await;
        let roster = seed_students(state.db(), &[("Early", 7), ("Late", 12)]).await;
        let today = event_date::today(state.config());
        let yesterday = today.pred_opt().unwrap();

        attendance::Model::check_in(state.db(), roster[0].id, yesterday, Utc::now())
            .await
            .unwrap();
        for s in &roster {
            attendance::Model::check_in(state.db(), s.id, today, Utc::now())
                .await
                .unwrap();
        }

        let response = app
            .oneshot(authorized(
                post_json("/api/admin/reset", &json!({})),
                Some(&admin_token(&state)),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["deleted"], 2);
        assert_eq!(
            json["message"],
            "All attendance records for today have been reset"
        );

        assert_eq!(attendance::Model::count_on(state.db(), today).await.unwrap(), 0);
        assert_eq!(attendance::Model::count_on(state.db(), yesterday).await.unwrap(), 1);
        assert_eq!(student::Model::count(state.db()).await.unwrap(), 2);
    }

    // --- GET /api/admin/stats ---

    #[tokio::test]
    async fn stats_break_down_by_grade() {
        let (app, state, _tmp) = make_test_app().await;
        let roster = seed_students(state.db(), &[("A", 9), ("B", 9), ("C", 10), ("D", 12)]).await;
        let today = event_date::today(state.config());
        for s in &roster[..3] {
            attendance::Model::check_in(state.db(), s.id, today, Utc::now())
                .await
                .unwrap();
        }

        let response = app
            .oneshot(authorized(get("/api/admin/stats"), Some(&admin_token(&state))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let data = body_json(response).await["data"].clone();
        assert_eq!(data["totalCheckedIn"], 3);
        assert_eq!(data["totalStudents"], 4);
        assert_eq!(data["percentage"], 75);
        let rows = data["gradeData"].as_array().unwrap();
        assert_eq!(rows.len(), 6);
        let sum: u64 = rows.iter().map(|r| r["checkedIn"].as_u64().unwrap()).sum();
        assert_eq!(sum, 3);
        let nine = rows.iter().find(|r| r["grade"] == 9).unwrap();
        assert_eq!(nine["checkedIn"], 2);
        assert_eq!(nine["total"], 2);
    }

    // --- POST /api/admin/students/upload ---

    #[tokio::test]
    async fn upload_stores_file_and_records_url() {
        let (app, state, tmp) = make_test_app().await;
        let s = &seed_students(state.db(), &[("Photo Op", 10)]).await[0];
        let token = admin_token(&state);

        let req = multipart_upload(Some(&s.id.to_string()), Some(("image/png", PNG_BYTES)));
        let response = app.clone().oneshot(authorized(req, Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let url = json["data"]["avatarUrl"].as_str().unwrap().to_owned();
        let prefix = format!("/api/avatars/{}_", s.id);
        assert!(url.starts_with(&prefix), "unexpected url {url}");
        assert!(url.ends_with(".png"));

        let filename = url.rsplit('/').next().unwrap();
        let stored = std::fs::read(tmp.path().join(filename)).unwrap();
        assert_eq!(stored, PNG_BYTES);

        let reloaded = student::Model::find_by_id(state.db(), s.id).await.unwrap().unwrap();
        assert_eq!(reloaded.avatar_url.as_deref(), Some(url.as_str()));

        let response = app.oneshot(get(&url)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "image/png");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], PNG_BYTES);
    }

    #[tokio::test]
    async fn upload_rejects_bad_input() {
        let (app, state, _tmp) = make_test_app().await;
        let s = &seed_students(state.db(), &[("Target", 8)]).await[0];
        let token = admin_token(&state);
        let id = s.id.to_string();
        let oversized = vec![0u8; state.config().max_avatar_bytes + 1];

        let cases = [
            (
                multipart_upload(Some(&id), Some(("image/svg+xml", b"<svg/>".as_slice()))),
                StatusCode::BAD_REQUEST,
                "File type not supported",
            ),
            (
                multipart_upload(None, Some(("image/png", PNG_BYTES))),
                StatusCode::BAD_REQUEST,
                "Missing file or student ID",
            ),
            (
                multipart_upload(Some(&id), None),
                StatusCode::BAD_REQUEST,
                "Missing file or student ID",
            ),
            (
                multipart_upload(Some("abc"), Some(("image/png", PNG_BYTES))),
                StatusCode::BAD_REQUEST,
                "Invalid student ID",
            ),
            (
                multipart_upload(Some("99999"), Some(("image/png", PNG_BYTES))),
                StatusCode::NOT_FOUND,
                "Student not found",
            ),
            (
                multipart_upload(Some(&id), Some(("image/jpeg", oversized.as_slice()))),
                StatusCode::BAD_REQUEST,
                "File too large",
            ),
        ];

        for (req, status, message) in cases {
            let response = app.clone().oneshot(authorized(req, Some(&token))).await.unwrap();
            assert_eq!(response.status(), status, "expected {message}");
            assert_eq!(body_json(response).await["message"], message);
        }

        let unchanged = student::Model::find_by_id(state.db(), s.id).await.unwrap().unwrap();
        assert!(unchanged.avatar_url.is_none());
    }

    #[tokio::test]
    async fn upload_requires_admin_token() {
        let (app, state, _tmp) = make_test_app().await;
        let s = &seed_students(state.db(), &[("No Token", 11)]).await[0];

        let req = multipart_upload(Some(&s.id.to_string()), Some(("image/png", PNG_BYTES)));
        let response = app.oneshot(authorized(req, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
