#[cfg(test)]
mod tests {
    use crate::helpers::{
        RecordingMailer, admin_token, authorized, body_json, get, make_test_app,
        make_test_app_with, post_json,
    };
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use db::{models::student, test_utils::seed_students};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;
    use util::test_helpers::TEST_SECRET_KEY;

    fn grade_row(report: &Value, grade: i64) -> &Value {
        report["gradeData"]
            .as_array()
            .unwrap()
            .iter()
            .find(|g| g["grade"] == grade)
            .unwrap()
    }

    #[tokio::test]
    async fn reports_require_the_secret_key() {
        let (app, _state, _tmp) = make_test_app().await;

        let response = app.clone().oneshot(get("/api/reports")).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["message"], "Forbidden");

        let response = app
            .clone()
            .oneshot(get("/api/reports?key=wrong"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .clone()
            .oneshot(get(&format!("/api/reports?key={TEST_SECRET_KEY}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(authorized(get("/api/reports"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unset_secret_closes_the_gate() {
        let (app, _state, _tmp) = make_test_app_with(|c| c.secret_key = None, None).await;

        let response = app
            .oneshot(authorized(get("/api/reports"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn empty_roster_reports_zero_percent() {
        let (app, _state, _tmp) = make_test_app().await;

        let json = body_json(
            app.oneshot(authorized(get("/api/reports"), None))
                .await
                .unwrap(),
        )
        .await;
        let report = &json["data"];
        assert_eq!(report["summary"]["total"], 0);
        assert_eq!(report["summary"]["totalStudents"], 0);
        assert_eq!(report["summary"]["percentage"], 0);
        assert_eq!(report["gradeData"].as_array().unwrap().len(), 6);
        assert_eq!(report["recentCheckins"], json!([]));
    }

    #[tokio::test]
    async fn check_in_report_reset_scenario() {
        let (app, state, _tmp) = make_test_app().await;
        let roster = seed_students(state.db(), &[("A", 9), ("B", 9), ("C", 10)]).await;
        let token = admin_token(&state);

        let check_in = |id: i64| post_json("/api/attendance/checkin", &json!({ "id": id }));
        let report = || authorized(get("/api/reports"), None);

        app.clone().oneshot(check_in(roster[0].id)).await.unwrap();
        let json = body_json(app.clone().oneshot(report()).await.unwrap()).await;
        let data = &json["data"];
        assert_eq!(data["summary"]["total"], 1);
        assert_eq!(data["summary"]["totalStudents"], 3);
        assert_eq!(grade_row(data, 9)["checkedIn"], 1);
        assert_eq!(grade_row(data, 9)["total"], 2);
        assert_eq!(grade_row(data, 9)["students"][0]["fullName"], "A");
        assert_eq!(grade_row(data, 10)["checkedIn"], 0);
        assert_eq!(grade_row(data, 10)["total"], 1);
        assert_eq!(data["recentCheckins"][0]["fullName"], "A");

        app.clone().oneshot(check_in(roster[1].id)).await.unwrap();
        let json = body_json(app.clone().oneshot(report()).await.unwrap()).await;
        assert_eq!(json["data"]["summary"]["total"], 2);
        assert_eq!(json["data"]["recentCheckins"].as_array().unwrap().len(), 2);

        let reset = authorized(post_json("/api/admin/reset", &json!({})), Some(&token));
        let response = app.clone().oneshot(reset).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(app.oneshot(report()).await.unwrap()).await;
        assert_eq!(json["data"]["summary"]["total"], 0);
        assert_eq!(json["data"]["summary"]["totalStudents"], 3);
        assert_eq!(student::Model::count(state.db()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn recent_checkins_are_capped_at_ten() {
        let (app, state, _tmp) = make_test_app().await;
        let names: Vec<String> = (0..12).map(|i| format!("Guest {i:02}")).collect();
        let roster: Vec<(&str, i32)> = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.as_str(), 7 + (i as i32 % 6)))
            .collect();
        for s in seed_students(state.db(), &roster).await {
            app.clone()
                .oneshot(post_json("/api/attendance/checkin", &json!({ "id": s.id })))
                .await
                .unwrap();
        }

        let json = body_json(
            app.oneshot(authorized(get("/api/reports"), None))
                .await
                .unwrap(),
        )
        .await;
        let recent = json["data"]["recentCheckins"].as_array().unwrap();
        assert_eq!(recent.len(), 10);
        let times: Vec<&str> = recent
            .iter()
            .map(|r| r["checkinTime"].as_str().unwrap())
            .collect();
        let parsed: Vec<chrono::DateTime<chrono::Utc>> =
            times.iter().map(|t| t.parse().unwrap()).collect();
        assert!(parsed.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(json["data"]["summary"]["total"], 12);
    }

    fn email_payload() -> Value {
        json!({
            "reportData": {
                "summary": { "total": 1, "totalStudents": 3, "percentage": 33 },
                "gradeData": [ { "grade": 9, "total": 2, "checkedIn": 1, "students": [] } ]
            },
            "email": "principal@example.com",
            "pdfAttachment": "JVBERi0xLjQK",
            "filename": "Gala.pdf"
        })
    }

    #[tokio::test]
    async fn email_is_sent_through_the_mailer() {
        let mailer = Arc::new(RecordingMailer::default());
        let (app, _state, _tmp) = make_test_app_with(|_| {}, Some(mailer.clone())).await;

        let response = app
            .oneshot(authorized(post_json("/api/reports/email", &email_payload()), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], "Email sent successfully");

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "principal@example.com");
        assert!(sent[0].subject.starts_with("Attendance Report - "));
        assert!(sent[0].text_body.contains("Grade 9: 1 / 2"));
        let attachment = sent[0].attachment.as_ref().unwrap();
        assert_eq!(attachment.filename, "Gala.pdf");
        assert_eq!(attachment.content_type, "application/pdf");
        assert!(attachment.bytes.starts_with(b"%PDF-1.4"));
    }

    #[tokio::test]
    async fn email_defaults_the_attachment_name() {
        let mailer = Arc::new(RecordingMailer::default());
        let (app, _state, _tmp) = make_test_app_with(|_| {}, Some(mailer.clone())).await;

        let mut payload = email_payload();
        payload.as_object_mut().unwrap().remove("filename");
        let response = app
            .oneshot(authorized(post_json("/api/reports/email", &payload), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            mailer.sent()[0].attachment.as_ref().unwrap().filename,
            "Attendance_Report.pdf"
        );
    }

    #[tokio::test]
    async fn email_validation_failures_are_bad_requests() {
        let mailer = Arc::new(RecordingMailer::default());
        let (app, _state, _tmp) = make_test_app_with(|_| {}, Some(mailer.clone())).await;

        let mut no_email = email_payload();
        no_email.as_object_mut().unwrap().remove("email");
        let mut no_report = email_payload();
        no_report.as_object_mut().unwrap().remove("reportData");
        let mut bad_email = email_payload();
        bad_email["email"] = json!("not-an-email");
        let mut bad_pdf = email_payload();
        bad_pdf["pdfAttachment"] = json!("%%% not base64 %%%");

        for (payload, message) in [
            (no_email, "Missing report data or email"),
            (no_report, "Missing report data or email"),
            (bad_email, "Invalid email format"),
            (bad_pdf, "Invalid PDF attachment"),
        ] {
            let response = app
                .clone()
                .oneshot(authorized(post_json("/api/reports/email", &payload), None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_json(response).await["message"], message);
        }
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn email_without_mailer_or_with_failing_transport_is_a_server_error() {
        let (app, _state, _tmp) = make_test_app().await;
        let response = app
            .oneshot(authorized(post_json("/api/reports/email", &email_payload()), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await["message"],
            "Email delivery is not configured"
        );

        let (app, _state, _tmp) =
            make_test_app_with(|_| {}, Some(Arc::new(RecordingMailer::failing()))).await;
        let response = app
            .oneshot(authorized(post_json("/api/reports/email", &email_payload()), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["message"], "Failed to send email");
    }

    #[tokio::test]
    async fn email_route_is_behind_the_gate() {
        let mailer = Arc::new(RecordingMailer::default());
        let (app, _state, _tmp) = make_test_app_with(|_| {}, Some(mailer.clone())).await;

        let req: Request<Body> = post_json("/api/reports/email", &email_payload());
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn multi_megabyte_pdf_is_accepted() {
        use base64::{Engine, engine::general_purpose::STANDARD};

        let mailer = Arc::new(RecordingMailer::default());
        let (app, _state, _tmp) = make_test_app_with(|_| {}, Some(mailer.clone())).await;

        let mut pdf = b"%PDF-1.4\n".to_vec();
        pdf.resize(3 * 1024 * 1024, b'0');
        let mut payload = email_payload();
        payload["pdfAttachment"] = json!(STANDARD.encode(&pdf));

        let response = app
            .oneshot(authorized(post_json("/api/reports/email", &payload), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let sent = mailer.sent();
        assert_eq!(sent[0].attachment.as_ref().unwrap().bytes.len(), pdf.len());
    }

    #[tokio::test]
    async fn email_body_over_the_limit_is_rejected() {
        let mailer = Arc::new(RecordingMailer::default());
        let (app, _state, _tmp) =
            make_test_app_with(|c| c.max_report_email_bytes = 1024, Some(mailer.clone())).await;

        let mut payload = email_payload();
        payload["pdfAttachment"] = json!("A".repeat(4096));

        let response = app
            .oneshot(authorized(post_json("/api/reports/email", &payload), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Report email too large");
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn malformed_email_body_gets_the_error_envelope() {
        let mailer = Arc::new(RecordingMailer::default());
        let (app, _state, _tmp) = make_test_app_with(|_| {}, Some(mailer.clone())).await;

        let mut wrong_type = email_payload();
        wrong_type["email"] = json!(42);
        let not_json = Request::builder()
            .method("POST")
            .uri("/api/reports/email")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        for req in [post_json("/api/reports/email", &wrong_type), not_json] {
            let response = app.clone().oneshot(authorized(req, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let json = body_json(response).await;
            assert_eq!(json["success"], false);
            assert_eq!(json["data"], json!({}));
            assert_eq!(json["message"], "Invalid request body");
        }
        assert!(mailer.sent().is_empty());
    }
}
