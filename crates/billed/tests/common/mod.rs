#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedUpload {
    pub email: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub content: Vec<u8>,
}

/// In-process stand-in for the Billed REST API.
#[derive(Clone, Default)]
pub struct FakeApi {
    pub bills: Arc<Mutex<Vec<Value>>>,
    pub uploads: Arc<Mutex<Vec<ReceivedUpload>>>,
    pub patches: Arc<Mutex<Vec<(String, Value)>>>,
    pub authorizations: Arc<Mutex<Vec<Option<String>>>>,
    pub failing: bool,
}

impl FakeApi {
    pub fn with_bills(bills: Vec<Value>) -> Self {
        Self {
            bills: Arc::new(Mutex::new(bills)),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn uploads(&self) -> Vec<ReceivedUpload> {
        self.uploads.lock().expect("uploads mutex").clone()
    }

    pub fn patches(&self) -> Vec<(String, Value)> {
        self.patches.lock().expect("patches mutex").clone()
    }

    pub fn authorizations(&self) -> Vec<Option<String>> {
        self.authorizations.lock().expect("auth mutex").clone()
    }

    fn remember_auth(&self, headers: &HeaderMap) {
        let value = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        self.authorizations.lock().expect("auth mutex").push(value);
    }

    /// Serve on an ephemeral local port and return the base URL.
    pub async fn spawn(self) -> String {
        let app = Router::new()
            .route("/bills", get(list_bills).post(create_bill))
            .route("/bills/:id", patch(update_bill))
            .with_state(self);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake api");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake api serves");
        });
        format!("http://{addr}")
    }
}

fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "Erreur 500" })),
    )
        .into_response()
}

async fn list_bills(State(api): State<FakeApi>, headers: HeaderMap) -> Response {
    api.remember_auth(&headers);
    if api.failing {
        return server_error();
    }
    let bills = api.bills.lock().expect("bills mutex").clone();
    Json(Value::Array(bills)).into_response()
}

async fn create_bill(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    api.remember_auth(&headers);
    if api.failing {
        return server_error();
    }

    let mut upload = ReceivedUpload {
        email: None,
        file_name: None,
        content_type: None,
        content: Vec::new(),
    };
    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                upload.file_name = field.file_name().map(str::to_string);
                upload.content_type = field.content_type().map(str::to_string);
                upload.content = field.bytes().await.expect("file bytes").to_vec();
            }
            Some("email") => upload.email = Some(field.text().await.expect("email text")),
            _ => {}
        }
    }

    let file_name = upload.file_name.clone().unwrap_or_default();
    api.uploads.lock().expect("uploads mutex").push(upload);
    Json(json!({
        "fileUrl": format!("https://localhost:3456/images/{file_name}"),
        "key": "1234",
        "fileName": file_name,
    }))
    .into_response()
}

async fn update_bill(
    State(api): State<FakeApi>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Response {
    api.remember_auth(&headers);
    if api.failing {
        return server_error();
    }
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if content_type != "application/json" {
        return (StatusCode::UNSUPPORTED_MEDIA_TYPE, Json(json!({}))).into_response();
    }

    let mut bill: Value = serde_json::from_str(&body).expect("json body");
    api.patches
        .lock()
        .expect("patches mutex")
        .push((id.clone(), bill.clone()));
    bill["id"] = Value::String(id);
    api.bills.lock().expect("bills mutex").push(bill.clone());
    Json(bill).into_response()
}

pub fn fixture_bills() -> Vec<Value> {
    vec![
        json!({
            "id": "47qAXb6fIm2zOKkLzMro",
            "vat": "80",
            "fileUrl": "https://test.storage.tld/v0/b/billable-677b6.appspot.com/o/preview-facture-free-201801-pdf-1.jpg",
            "status": "pending",
            "type": "Hôtel et logement",
            "commentary": "séminaire billed",
            "name": "encore",
            "fileName": "preview-facture-free-201801-pdf-1.jpg",
            "date": "2004-04-04",
            "amount": 400,
            "commentAdmin": "ok",
            "email": "a@a",
            "pct": 20
        }),
        json!({
            "id": "BeKy5Mo4jkmdfPGYpTxZ",
            "vat": "",
            "amount": 100,
            "name": "test1",
            "fileName": "1592770761.jpeg",
            "commentary": "plop",
            "pct": 20,
            "type": "Transports",
            "email": "a@a",
            "fileUrl": "https://test.storage.tld/v0/b/billable-677b6.appspot.com/o/justificatifs%2F1592770761.jpeg",
            "date": "2001-01-01",
            "status": "refused",
            "commentAdmin": "en fait non"
        }),
        json!({
            "id": "UIUZtnPQvnbFnB0ozvJh",
            "name": "test3",
            "email": "a@a",
            "type": "Services en ligne",
            "vat": 60,
            "pct": 20,
            "commentAdmin": "bon bah d'accord",
            "amount": 300,
            "status": "accepted",
            "date": "2003-03-03",
            "commentary": "",
            "fileName": "facture-client-php-exportee-dans-document-pdf-enregistre-sur-disque-dur.png",
            "fileUrl": "https://test.storage.tld/v0/b/billable-677b6.appspot.com/o/justificatifs%2Ffacture-client-php-exportee-dans-document-pdf-enregistre-sur-disque-dur.png"
        }),
        json!({
            "id": "qcCK3SzECmaZAGRrHjaC",
            "status": "refused",
            "pct": 20,
            "amount": 200,
            "email": "a@a",
            "name": "test2",
            "vat": "40",
            "fileName": "preview-facture-free-201801-pdf-1.jpg",
            "date": "2002-02-02",
            "commentAdmin": "pas la bonne facture",
            "commentary": "test2",
            "type": "Restaurants et bars",
            "fileUrl": "https://test.storage.tld/v0/b/billable-677b6.appspot.com/o/4.jpg"
        }),
    ]
}
