//! HTTP surface for the student roster.
//!
//! Student routes live under `/api/student`:
//!
//! - `GET /all` – List every student in insertion order.
//! - `GET /{id}` / `GET /{name}` – Fetch one student by integer id or alphabetic name.
//! - `POST /create` – Create a student; responds `201` with a `Location` header.
//! - `PUT /update` – Overwrite name, email, and address of the student named by `id`.
//! - `PATCH /{id}updatepartial` – Apply a JSON Patch document to one student.
//! - `DELETE /delete/{id}` – Remove a student (`id` in `1..=100`).
//!
//! Two service endpoints sit at the root: `GET /metrics` for operation counters and
//! `GET /commands` for a machine-readable route catalog.

use crate::metrics::MetricsSnapshot;
use crate::roster::{FieldError, PatchOperation, RosterApi, RosterError, StudentView};
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// Path prefix shared by every student route.
pub const STUDENT_PREFIX: &str = "/api/student";

const PARTIAL_UPDATE_SUFFIX: &str = "updatepartial";

/// Build the HTTP router exposing the roster API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: RosterApi + 'static,
{
    let students = Router::new()
        .route("/all", get(list_students::<S>))
        .route(
            "/create",
            post(create_student::<S>).get(|State(service): State<Arc<S>>| {
                get_student_named(service, "create")
            }),
        )
        .route(
            "/update",
            put(update_student::<S>).get(|State(service): State<Arc<S>>| {
                get_student_named(service, "update")
            }),
        )
        .route("/delete/:id", delete(delete_student::<S>))
        .route(
            "/:key",
            get(get_student::<S>).patch(update_student_partial::<S>),
        );

    Router::new()
        .nest(STUDENT_PREFIX, students)
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .with_state(service)
}

/// List all students.
async fn list_students<S>(State(service): State<Arc<S>>) -> Json<Vec<StudentView>>
where
    S: RosterApi,
{
    Json(service.list_students().await)
}

/// Fetch one student. Integer segments look up by id, alphabetic segments by name; anything
/// else matches no route.
async fn get_student<S>(
    State(service): State<Arc<S>>,
    Path(key): Path<String>,
) -> Result<Json<StudentView>, AppError>
where
    S: RosterApi,
{
    let view = match StudentKey::parse(&key) {
        StudentKey::Id(id) => service.get_student_by_id(id).await?,
        StudentKey::Name(name) => service.get_student_by_name(name).await?,
        StudentKey::Unmatched => return Err(AppError::no_route(&key)),
    };
    Ok(Json(view))
}

/// Name lookup for segments that coincide with a static route. Routing picks the static path
/// first, so a `GET` on `/create` or `/update` lands here rather than in [`get_student`].
async fn get_student_named<S>(
    service: Arc<S>,
    name: &'static str,
) -> Result<Json<StudentView>, AppError>
where
    S: RosterApi,
{
    Ok(Json(service.get_student_by_name(name).await?))
}

/// Create a student and point the caller at its get-by-id route.
async fn create_student<S>(
    State(service): State<Arc<S>>,
    body: Result<Json<Option<StudentView>>, JsonRejection>,
) -> Result<Response, AppError>
where
    S: RosterApi,
{
    let Json(payload) = body?;
    let created = service.create_student(payload).await?;
    let location = format!("{STUDENT_PREFIX}/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    )
        .into_response())
}

/// Replace name, email, and address of an existing student.
async fn update_student<S>(
    State(service): State<Arc<S>>,
    body: Result<Json<Option<StudentView>>, JsonRejection>,
) -> Result<StatusCode, AppError>
where
    S: RosterApi,
{
    let Json(payload) = body?;
    service.update_student(payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Apply a JSON Patch document to the student addressed by `/{id}updatepartial`.
async fn update_student_partial<S>(
    State(service): State<Arc<S>>,
    Path(key): Path<String>,
    body: Result<Json<Option<Vec<PatchOperation>>>, JsonRejection>,
) -> Result<StatusCode, AppError>
where
    S: RosterApi,
{
    let Some(id) = key
        .strip_suffix(PARTIAL_UPDATE_SUFFIX)
        .and_then(|id| id.parse::<i64>().ok())
    else {
        return Err(AppError::no_route(&key));
    };
    let Json(patch) = body?;
    service.update_student_partial(id, patch).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a student, answering `true` on success.
async fn delete_student<S>(
    State(service): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<Json<bool>, AppError>
where
    S: RosterApi,
{
    let Ok(id) = id.parse::<i64>() else {
        return Err(AppError::no_route(&id));
    };
    Ok(Json(service.delete_student(id).await?))
}

/// Return roster counters and the current record count.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: RosterApi,
{
    Json(service.metrics_snapshot().await)
}

enum StudentKey<'a> {
    Id(i64),
    Name(&'a str),
    Unmatched,
}

impl<'a> StudentKey<'a> {
    fn parse(segment: &'a str) -> Self {
        if let Ok(id) = segment.parse::<i64>() {
            Self::Id(id)
        } else if !segment.is_empty() && segment.chars().all(|c| c.is_ascii_alphabetic()) {
            Self::Name(segment)
        } else {
            Self::Unmatched
        }
    }
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery by tools and scripts.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "list_students",
                method: "GET",
                path: "/api/student/all",
                description: "Return every student record.",
                request_example: None,
            },
            CommandDescriptor {
                name: "get_student_by_id",
                method: "GET",
                path: "/api/student/{id}",
                description: "Return one student by positive integer id.",
                request_example: None,
            },
            CommandDescriptor {
                name: "get_student_by_name",
                method: "GET",
                path: "/api/student/{name}",
                description: "Return the first student whose name matches exactly (alphabetic names only).",
                request_example: None,
            },
            CommandDescriptor {
                name: "create_student",
                method: "POST",
                path: "/api/student/create",
                description: "Create a student. Responds 201 with the stored record and a Location header.",
                request_example: Some(json!({
                    "studentName": "studentThree",
                    "address": "byblos, Lebanon",
                    "email": "student3email@gmail.com"
                })),
            },
            CommandDescriptor {
                name: "update_student",
                method: "PUT",
                path: "/api/student/update",
                description: "Overwrite name, email, and address of the student with the given id.",
                request_example: Some(json!({
                    "id": 1,
                    "studentName": "studentOne",
                    "address": "tripoli, Lebanon",
                    "email": "student1email@gmail.com"
                })),
            },
            CommandDescriptor {
                name: "update_student_partial",
                method: "PATCH",
                path: "/api/student/{id}updatepartial",
                description: "Apply JSON Patch operations (add, remove, replace, move, copy, test) to one student.",
                request_example: Some(json!([
                    { "op": "replace", "path": "/studentName", "value": "renamed" }
                ])),
            },
            CommandDescriptor {
                name: "delete_student",
                method: "DELETE",
                path: "/api/student/delete/{id}",
                description: "Delete the student with the given id (1-100). Responds true on success.",
                request_example: None,
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return operation counters and the current record count.",
                request_example: None,
            },
        ],
    })
}

/// JSON body attached to every error response.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldError>,
}

struct AppError(RosterError);

impl AppError {
    fn no_route(segment: &str) -> Self {
        Self(RosterError::NotFound(format!(
            "no student route matches '{segment}'"
        )))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, fields) = match self.0 {
            RosterError::InvalidInput(_) => (StatusCode::BAD_REQUEST, Vec::new()),
            RosterError::NotFound(_) => (StatusCode::NOT_FOUND, Vec::new()),
            RosterError::Validation(ref fields) => (StatusCode::BAD_REQUEST, fields.clone()),
        };
        let body = ErrorBody {
            error: self.0.to_string(),
            fields,
        };
        (status, Json(body)).into_response()
    }
}

impl From<RosterError> for AppError {
    fn from(inner: RosterError) -> Self {
        Self(inner)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(error = %rejection.body_text(), "Rejected request body");
        Self(RosterError::InvalidInput(rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::{StudentKey, create_router, get_commands};
    use crate::roster::{RosterService, StudentStore};
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(Arc::new(RosterService::default()))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("router response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }

    #[test]
    fn student_key_distinguishes_ids_names_and_garbage() {
        assert!(matches!(StudentKey::parse("12"), StudentKey::Id(12)));
        assert!(matches!(StudentKey::parse("-1"), StudentKey::Id(-1)));
        assert!(matches!(StudentKey::parse("Ana"), StudentKey::Name("Ana")));
        assert!(matches!(StudentKey::parse("ana_1"), StudentKey::Unmatched));
        assert!(matches!(StudentKey::parse("Zoë"), StudentKey::Unmatched));
    }

    #[tokio::test]
    async fn commands_catalog_lists_student_routes() {
        let response = get_commands().await;
        let commands = response.0.commands;
        let create = commands
            .iter()
            .find(|cmd| cmd.name == "create_student")
            .expect("create command present");

        assert_eq!(create.method, "POST");
        assert_eq!(create.path, "/api/student/create");
        assert!(commands.iter().any(|cmd| cmd.method == "PATCH"));
        assert!(commands.len() >= 7);
    }

    #[tokio::test]
    async fn list_returns_seeded_students() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/api/student/all", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(2));
        assert_eq!(body[0]["studentName"], "studentOne");
        assert_eq!(body[1]["email"], "student2email@gmail.com");
    }

    #[tokio::test]
    async fn get_routes_dispatch_on_segment_shape() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/api/student/2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["studentName"], "studentTwo");

        let (status, body) = send(&app, Method::GET, "/api/student/studentOne", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 1);

        let (status, _) = send(&app, Method::GET, "/api/student/0", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, Method::GET, "/api/student/9", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "the student with the id 9 is not found");

        let (status, _) = send(&app, Method::GET, "/api/student/nobody", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::GET, "/api/student/a1b2", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_responds_with_location_header() {
        let app = app();
        let payload = json!({ "studentName": "X", "address": "Y", "email": "Z" });
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/student/create")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response
                .headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some("/api/student/3")
        );
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(
            json,
            json!({ "id": 3, "studentName": "X", "address": "Y", "email": "Z" })
        );
    }

    #[tokio::test]
    async fn null_and_malformed_bodies_are_bad_requests() {
        let app = app();
        let (status, _) = send(&app, Method::POST, "/api/student/create", Some(Value::Null)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::PUT, "/api/student/update", Some(Value::Null)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/student/create",
            Some(json!({ "studentName": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::PUT, "/api/student/update", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_returns_no_content_and_persists() {
        let app = app();
        let update = json!({
            "id": 1,
            "studentName": "studentUno",
            "address": "sidon, Lebanon",
            "email": "uno@example.org"
        });
        let (status, _) = send(&app, Method::PUT, "/api/student/update", Some(update.clone())).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&app, Method::GET, "/api/student/1", None).await;
        assert_eq!(body, update);

        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/student/update",
            Some(json!({ "id": 40, "studentName": "a" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn partial_update_applies_patch_document() {
        let app = app();
        let patch = json!([{ "op": "replace", "path": "/studentName", "value": "Karim" }]);
        let (status, _) = send(&app, Method::PATCH, "/api/student/2updatepartial", Some(patch)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&app, Method::GET, "/api/student/2", None).await;
        assert_eq!(body["studentName"], "Karim");
        assert_eq!(body["address"], "zahle, Lebanon");
    }

    #[tokio::test]
    async fn partial_update_reports_field_errors() {
        let app = app();
        let patch = json!([{ "op": "replace", "path": "/studentName", "value": "" }]);
        let (status, body) = send(&app, Method::PATCH, "/api/student/1updatepartial", Some(patch)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"][0]["field"], "studentName");

        let patch = json!([{ "op": "replace", "path": "/nickname", "value": "x" }]);
        let (status, body) = send(&app, Method::PATCH, "/api/student/1updatepartial", Some(patch)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"][0]["field"], "nickname");

        let patch = json!([]);
        let (status, _) = send(&app, Method::PATCH, "/api/student/0updatepartial", Some(patch.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::PATCH, "/api/student/8updatepartial", Some(patch.clone())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::PATCH, "/api/student/1update", Some(patch)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            Method::PATCH,
            "/api/student/1updatepartial",
            Some(Value::Null),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_removes_student_then_reports_not_found() {
        let app = app();
        let (status, body) = send(&app, Method::DELETE, "/api/student/delete/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(true));

        let (_, body) = send(&app, Method::GET, "/api/student/all", None).await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));

        let (status, _) = send(&app, Method::DELETE, "/api/student/delete/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        for uri in ["/api/student/delete/0", "/api/student/delete/-4", "/api/student/delete/101"] {
            let (status, _) = send(&app, Method::DELETE, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[tokio::test]
    async fn names_matching_static_routes_are_still_fetchable() {
        let app = app();
        for name in ["create", "update"] {
            let (status, body) = send(&app, Method::GET, &format!("/api/student/{name}"), None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{name}");
            assert_eq!(body["error"], format!("the student with the name {name} is not found"));

            let (status, created) = send(
                &app,
                Method::POST,
                "/api/student/create",
                Some(json!({ "studentName": name, "address": "a", "email": "b" })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);

            let (status, body) = send(&app, Method::GET, &format!("/api/student/{name}"), None).await;
            assert_eq!(status, StatusCode::OK, "{name}");
            assert_eq!(body, created);
        }
    }

    #[tokio::test]
    async fn non_ascii_names_match_no_route() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/api/student/Zo%C3%AB", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "no student route matches 'Zoë'");
    }

    #[tokio::test]
    async fn create_on_empty_store_starts_at_one() {
        let app = create_router(Arc::new(RosterService::new(StudentStore::new())));
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/student/create",
            Some(json!({ "studentName": "First", "address": "a", "email": "b" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 1);
    }

    #[tokio::test]
    async fn metrics_reflect_handled_requests() {
        let app = app();
        send(&app, Method::GET, "/api/student/all", None).await;
        send(&app, Method::GET, "/api/student/-3", None).await;
        let (status, body) = send(&app, Method::GET, "/metrics", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["listed"], 1);
        assert_eq!(body["rejected"], 1);
        assert_eq!(body["students"], 2);
    }
}
