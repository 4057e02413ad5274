//! HTTP handlers for the web front-end.

use crate::pages::{self, ServicesValues};
use crate::{AppState, MESSAGE_HEADER};
use api_shared::{ContactRes, ErrorRes, HealthRes};
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    response::{Html, IntoResponse, Json, Response},
    Form,
};
use ecg_core::constants::{
    DIAGNOSIS_FAILED_MESSAGE, FIELD_AGE, FIELD_GENDER, FIELD_IMAGE, FIELD_NAME,
};
use ecg_core::{
    ContactForm, DiagnosisDraft, DiagnosisForm, DiagnosisReport, EcgError, EcgResult, Gender,
    ImageUpload, ReportSink, Route,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use utoipa::ToSchema;

/// RFC 5987 `attr-char`: everything outside it is percent-encoded in `filename*`.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// Multipart body of a diagnosis submission, for the OpenAPI document.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct DiagnosisUpload {
    name: String,
    age: String,
    /// One of `male`, `female`, `other`.
    gender: String,
    #[schema(value_type = String, format = Binary)]
    image: Vec<u8>,
}

/// `Content-Disposition` for a download named `filename`.
///
/// Carries an ASCII-only `filename` for old clients and the exact UTF-8 name in `filename*`.
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        utf8_percent_encode(filename, ATTR_CHAR)
    )
}

/// Delivers a report as an HTTP attachment, which the browser saves as a download.
struct AttachmentSink;

impl ReportSink for AttachmentSink {
    type Output = Response;

    fn deliver(&self, report: DiagnosisReport) -> EcgResult<Response> {
        let disposition = HeaderValue::from_str(&content_disposition(report.filename()))
            .map_err(|e| EcgError::Delivery(format!("invalid content-disposition: {e}")))?;
        let content_type = HeaderValue::from_static(report.content_type());

        Ok((
            [
                (header::CONTENT_TYPE, content_type),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            report.into_bytes(),
        )
            .into_response())
    }
}

fn with_message(status: StatusCode, page: String, message: Option<&'static str>) -> Response {
    let mut response = (status, Html(page)).into_response();
    if let Some(message) = message {
        response
            .headers_mut()
            .insert(MESSAGE_HEADER, HeaderValue::from_static(message));
    }
    response
}

/// Whether the caller asked for a JSON body instead of a rendered page.
fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

fn rejection(
    headers: &HeaderMap,
    status: StatusCode,
    message: Option<&'static str>,
    page: impl FnOnce() -> String,
) -> Response {
    if wants_json(headers) {
        let body = ErrorRes {
            message: message.unwrap_or_default().to_string(),
        };
        return (status, Json(body)).into_response();
    }
    with_message(status, page(), message)
}

fn status_for(error: &EcgError) -> StatusCode {
    match error {
        e if e.is_validation() => StatusCode::UNPROCESSABLE_ENTITY,
        EcgError::Busy => StatusCode::CONFLICT,
        _ => StatusCode::BAD_GATEWAY,
    }
}

pub async fn home() -> Html<String> {
    Html(pages::render(Route::Home))
}

pub async fn about() -> Html<String> {
    Html(pages::render(Route::About))
}

pub async fn services() -> Html<String> {
    Html(pages::render(Route::Services))
}

pub async fn how_it_works() -> Html<String> {
    Html(pages::render(Route::HowItWorks))
}

pub async fn contact() -> Html<String> {
    Html(pages::render(Route::Contact))
}

/// Fallback for paths outside the navigation. A trailing slash on a known page still renders it.
pub async fn not_found(uri: Uri) -> Response {
    match Route::from_path(uri.path()) {
        Some(route) => Html(pages::render(route)).into_response(),
        None => (StatusCode::NOT_FOUND, Html(pages::not_found(uri.path()))).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint
///
/// Returns liveness of the front-end and the prediction endpoint it is configured for.
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    Json(state.health.check_health())
}

/// Collect the diagnosis fields from a multipart body.
///
/// Unknown parts are ignored. A file input with nothing chosen arrives as an empty part with
/// an empty filename and is treated as "no image". An unrecognised gender is treated as unset.
async fn read_draft(mut multipart: Multipart) -> Result<DiagnosisDraft, MultipartError> {
    let mut draft = DiagnosisDraft::new();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            FIELD_NAME => draft.set_name(&field.text().await?),
            FIELD_AGE => draft.set_age(&field.text().await?),
            FIELD_GENDER => {
                let value = field.text().await?;
                let gender = Gender::from_field(&value).unwrap_or_else(|e| {
                    tracing::warn!("ignoring diagnosis field: {e}");
                    None
                });
                draft.set_gender(gender);
            }
            FIELD_IMAGE => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                draft.set_image(ImageUpload::new(file_name, content_type, bytes));
            }
            other => tracing::debug!(field = other, "ignoring unknown multipart field"),
        }
    }

    Ok(draft)
}

#[utoipa::path(
    post,
    path = "/services",
    request_body(content = DiagnosisUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Generated ECG report", body = String, content_type = "application/pdf"),
        (status = 400, description = "Malformed multipart body", body = ErrorRes),
        (status = 422, description = "A required field is missing", body = ErrorRes),
        (status = 502, description = "The prediction service failed", body = ErrorRes)
    )
)]
/// Submit a diagnosis request
///
/// Validates the four fields, forwards them to the prediction service, and answers with the
/// generated report as `ECG_Report_<name>.pdf`. On failure the services page is rendered again
/// with the blocking message, which is also sent in the `x-ecg-message` header (or as an
/// `ErrorRes` body for `Accept: application/json`).
#[axum::debug_handler]
pub async fn diagnose(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let draft = match read_draft(multipart).await {
        Ok(draft) => draft,
        Err(e) => {
            tracing::warn!("rejecting malformed diagnosis upload: {e}");
            return rejection(
                &headers,
                StatusCode::BAD_REQUEST,
                Some(DIAGNOSIS_FAILED_MESSAGE),
                || pages::services(&ServicesValues::default(), Some(DIAGNOSIS_FAILED_MESSAGE)),
            );
        }
    };

    let form = DiagnosisForm::with_draft(draft);
    match form.submit(&state.client, &AttachmentSink).await {
        Ok(response) => response,
        Err(e) => {
            let message = e.user_message();
            rejection(&headers, status_for(&e), message, || {
                pages::services(&ServicesValues::from(form.draft()), message)
            })
        }
    }
}

#[utoipa::path(
    post,
    path = "/contact",
    request_body(
        content = String,
        content_type = "application/x-www-form-urlencoded",
        description = "Fields: name, email, phone, message, consent (checkbox)"
    ),
    responses(
        (status = 200, description = "Submission acknowledged", body = ContactRes),
        (status = 422, description = "Consent missing or a required field is empty", body = ErrorRes)
    )
)]
/// Submit the contact form
///
/// The submission is only checked and logged. Nothing is sent anywhere. Callers sending
/// `Accept: application/json` get a `ContactRes` or `ErrorRes` body instead of the page.
#[axum::debug_handler]
pub async fn submit_contact(headers: HeaderMap, Form(form): Form<ContactForm>) -> Response {
    match form.submit() {
        Ok(ack) if wants_json(&headers) => Json(ContactRes {
            message: ack.message.to_string(),
        })
        .into_response(),
        Ok(ack) => with_message(
            StatusCode::OK,
            pages::contact(&ContactForm::default(), Some(ack.message)),
            Some(ack.message),
        ),
        Err(e) => {
            let message = e.user_message();
            rejection(&headers, status_for(&e), message, || {
                pages::contact(&form, message)
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{router, AppState};
    use axum::body::Body;
    use axum::http::Request;
    use ecg_core::CoreConfig;
    use http_body_util::BodyExt;
    use std::path::PathBuf;
    use tower::ServiceExt;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BOUNDARY: &str = "ecg-test-boundary";

    fn app_for(predict_url: &str) -> axum::Router {
        let cfg = CoreConfig::new(Url::parse(predict_url).unwrap(), None, PathBuf::from("."))
            .unwrap();
        router(AppState::new(&cfg).unwrap())
    }

    /// Build a multipart body. `image` is `(filename, bytes)`; an empty filename mimics a file
    /// input with nothing chosen.
    fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((filename, bytes)) = image {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn post_multipart(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/services")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    const FULL_FIELDS: &[(&str, &str)] = &[
        ("name", "Dr. P Dhanalakshmi"),
        ("age", "54"),
        ("gender", "female"),
    ];

    #[tokio::test]
    async fn every_route_renders() {
        let app = app_for("http://127.0.0.1:1/predict");
        for route in ecg_core::Route::ALL {
            let response = app
                .clone()
                .oneshot(Request::get(route.path()).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{}", route.path());
        }
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let app = app_for("http://127.0.0.1:1/predict");
        let response = app
            .oneshot(Request::get("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn trailing_slash_renders_known_page() {
        let app = app_for("http://127.0.0.1:1/predict");
        let response = app
            .oneshot(Request::get("/about/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Get in touch"));
    }

    #[tokio::test]
    async fn health_reports_endpoint() {
        let app = app_for("http://127.0.0.1:1/predict");
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["predict_url"], "http://127.0.0.1:1/predict");
    }

    #[tokio::test]
    async fn diagnose_returns_pdf_attachment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/pdf")
                    .set_body_bytes(b"%PDF-1.4 report".to_vec()),
            )
            .expect(1)
            .mount(&server)
            .await;

        let app = app_for(&format!("{}/predict", server.uri()));
        let body = multipart_body(FULL_FIELDS, Some(("ecg.png", b"\x89PNG")));
        let response = app.oneshot(post_multipart(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"ECG_Report_Dr._P_Dhanalakshmi.pdf\"; \
             filename*=UTF-8''ECG_Report_Dr._P_Dhanalakshmi.pdf"
        );
        assert_eq!(body_text(response).await, "%PDF-1.4 report");
    }

    #[test]
    fn content_disposition_encodes_non_ascii_names() {
        assert_eq!(
            content_disposition("ECG_Report_José_Müller.pdf"),
            "attachment; filename=\"ECG_Report_Jos__M_ller.pdf\"; \
             filename*=UTF-8''ECG_Report_Jos%C3%A9_M%C3%BCller.pdf"
        );
        assert_eq!(
            content_disposition("ECG_Report_a\u{1}\"b.pdf"),
            "attachment; filename=\"ECG_Report_a__b.pdf\"; filename*=UTF-8''ECG_Report_a%01%22b.pdf"
        );
    }

    #[tokio::test]
    async fn non_ascii_name_downloads_under_exact_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let app = app_for(&format!("{}/predict", server.uri()));
        let fields = [("name", "José Müller"), ("age", "70"), ("gender", "male")];
        let body = multipart_body(&fields, Some(("ecg.png", b"\x89PNG")));
        let response = app.oneshot(post_multipart(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.is_ascii());
        assert!(disposition.ends_with("filename*=UTF-8''ECG_Report_Jos%C3%A9_M%C3%BCller.pdf"));
    }

    #[tokio::test]
    async fn missing_image_is_rejected_without_calling_service() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let app = app_for(&format!("{}/predict", server.uri()));
        let body = multipart_body(FULL_FIELDS, Some(("", b"")));
        let response = app.oneshot(post_multipart(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.headers()[MESSAGE_HEADER],
            "Please fill all fields and upload an image."
        );
        let html = body_text(response).await;
        assert!(html.contains(r#"value="Dr. P Dhanalakshmi""#));
    }

    #[tokio::test]
    async fn service_failure_returns_generic_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let app = app_for(&format!("{}/predict", server.uri()));
        let body = multipart_body(FULL_FIELDS, Some(("ecg.png", b"\x89PNG")));
        let response = app.oneshot(post_multipart(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            response.headers()[MESSAGE_HEADER],
            "Something went wrong. Please try again."
        );
        assert!(response.headers().get(header::CONTENT_DISPOSITION).is_none());
    }

    #[tokio::test]
    async fn contact_without_consent_is_blocked() {
        let app = app_for("http://127.0.0.1:1/predict");
        let response = app
            .oneshot(post_form(
                "/contact",
                "name=Asha&email=asha%40example.com&phone=555&message=hi",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.headers()[MESSAGE_HEADER],
            "Please provide consent to submit the form."
        );
    }

    #[tokio::test]
    async fn contact_with_consent_is_acknowledged() {
        let app = app_for("http://127.0.0.1:1/predict");
        let response = app
            .oneshot(post_form(
                "/contact",
                "name=Asha&email=asha%40example.com&phone=555&message=&consent=on",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[MESSAGE_HEADER],
            "Your message has been submitted!"
        );
    }

    #[tokio::test]
    async fn json_callers_get_structured_bodies() {
        let app = app_for("http://127.0.0.1:1/predict");

        let mut request = post_form("/contact", "name=Asha&email=not-an-email&phone=555&consent=on");
        request
            .headers_mut()
            .insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let err: ErrorRes = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(err.message, "Please enter a valid email address.");

        let mut request = post_multipart(multipart_body(&[("name", "Asha")], None));
        request
            .headers_mut()
            .insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let err: ErrorRes = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(err.message, "Please fill all fields and upload an image.");
    }

    #[tokio::test]
    async fn openapi_document_lists_paths() {
        let app = app_for("http://127.0.0.1:1/predict");
        let response = app
            .oneshot(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert!(json["paths"]["/services"]["post"].is_object());
        assert!(json["paths"]["/health"]["get"].is_object());
    }
}
