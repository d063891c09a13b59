use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use payslip_server::config::{BrevoConfig, Contact};
use payslip_server::delivery::{
    Attachment, BrevoTransport, EmailTransport, OutgoingEmail, TransportError,
};
use serde_json::{json, Value};
use std::sync::Mutex;

#[cfg(test)]
mod brevo_transport_tests {
    use super::*;

    const GOOD_KEY: &str = "xkeysib-good";

    /// What the fake Brevo endpoint last received.
    #[derive(Default)]
    struct Received {
        api_key: Option<String>,
        body: Option<Value>,
    }

    async fn smtp_email(
        req: HttpRequest,
        body: web::Json<Value>,
        received: web::Data<Mutex<Received>>,
    ) -> HttpResponse {
        let api_key = req
            .headers()
            .get("api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let accepted = api_key.as_deref() == Some(GOOD_KEY);
        {
            let mut received = received.lock().unwrap();
            received.api_key = api_key;
            received.body = Some(body.into_inner());
        }

        if accepted {
            HttpResponse::Created().json(json!({"messageId": "<202410191200.1@smtp-relay.brevo.com>"}))
        } else {
            HttpResponse::Unauthorized().json(json!({"code": "unauthorized", "message": "Key not found"}))
        }
    }

    async fn bad_gateway() -> HttpResponse {
        HttpResponse::BadGateway().body("upstream unavailable")
    }

    async fn start_fake_brevo() -> (String, web::Data<Mutex<Received>>, ServerHandle) {
        let received = web::Data::new(Mutex::new(Received::default()));
        let data = received.clone();

        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .route("/v3/smtp/email", web::post().to(smtp_email))
                .route("/gateway/v3/smtp/email", web::post().to(bad_gateway))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("Failed to bind fake Brevo server");

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        (format!("http://{}", addr), received, handle)
    }

    fn transport(base_url: &str, api_key: &str) -> BrevoTransport {
        BrevoTransport::new(
            reqwest::Client::new(),
            &BrevoConfig {
                api_key: Some(api_key.to_string()),
                base_url: base_url.to_string(),
            },
        )
    }

    fn email() -> OutgoingEmail {
        OutgoingEmail {
            sender: Contact {
                name: "Ticket To The Moon".to_string(),
                email: "office@ticketothemoon.com".to_string(),
            },
            to: Contact {
                name: "Ana".to_string(),
                email: "ana@x.com".to_string(),
            },
            subject: "Salary Slip - Ana".to_string(),
            html_content: "<p>Dear Ana,</p><p>Please find your attached salary slip.</p>"
                .to_string(),
            attachment: Attachment {
                name: "Salary-Slip-Ana.pdf".to_string(),
                content: b"%PDF".to_vec(),
            },
        }
    }

    #[actix_web::test]
    async fn test_accepted_send_posts_key_and_body() {
        let (base_url, received, handle) = start_fake_brevo().await;

        transport(&base_url, GOOD_KEY)
            .send(&email())
            .await
            .expect("Brevo accepted the email");

        {
            let received = received.lock().unwrap();
            assert_eq!(received.api_key.as_deref(), Some(GOOD_KEY));
            let body = received.body.as_ref().unwrap();
            assert_eq!(body["to"][0]["email"], "ana@x.com");
            assert_eq!(body["subject"], "Salary Slip - Ana");
            assert_eq!(body["attachment"][0]["content"], "JVBERg==");
        }

        handle.stop(true).await;
    }

    #[actix_web::test]
    async fn test_rejected_send_reports_brevo_message() {
        let (base_url, received, handle) = start_fake_brevo().await;

        let result = transport(&base_url, "xkeysib-revoked").send(&email()).await;

        match result {
            Err(TransportError::Rejected { status, message }) => {
                assert_eq!(status.as_u16(), 401);
                assert_eq!(message, "Key not found");
            }
            other => panic!("expected a rejection, got {:?}", other),
        }
        assert_eq!(
            received.lock().unwrap().api_key.as_deref(),
            Some("xkeysib-revoked")
        );

        handle.stop(true).await;
    }

    #[actix_web::test]
    async fn test_non_json_error_body_is_reported_verbatim() {
        let (base_url, _received, handle) = start_fake_brevo().await;

        let result = transport(&format!("{}/gateway", base_url), GOOD_KEY)
            .send(&email())
            .await;

        match result {
            Err(TransportError::Rejected { status, message }) => {
                assert_eq!(status.as_u16(), 502);
                assert_eq!(message, "upstream unavailable");
            }
            other => panic!("expected a rejection, got {:?}", other),
        }

        handle.stop(true).await;
    }
}
