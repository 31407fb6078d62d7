use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::requests::{
    CategoryRequest, ExerciseRequest, LessonRequest, LevelRequest, VocabularyRequest,
};
use super::sync::{plan_exercise_sync, SyncFailure, SyncOp, SyncPlan, SyncReport};
use crate::auth::TokenSource;
use crate::error::{AdminError, Result};
use crate::forms::LevelFields;
use crate::models::{Category, DashboardStats, Id, Lesson, Level, Question, Vocabulary};

/// Responses come either wrapped as `{"data": ...}` or bare.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(data) => data,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Reply to a create call; only the new id is used.
#[derive(Deserialize)]
struct Created {
    #[serde(default)]
    id: Option<Id>,
}

fn extract_api_error(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed.message.or(parsed.error)
}

/// Stateless client for the catalog REST API.
///
/// The bearer token is read from the [`TokenSource`] on every request, so a
/// login or refresh takes effect without rebuilding the client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, tokens: Arc<dyn TokenSource>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("catalog-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header(CONTENT_TYPE, "application/json")
    }

    /// Attach auth and a request id, send, and turn error statuses into errors.
    async fn execute(&self, builder: RequestBuilder, method: &Method, path: &str) -> Result<Response> {
        let request_id = Uuid::new_v4().to_string();
        let mut builder = builder.header("x-request-id", &request_id);
        if let Some(token) = self.tokens.access_token() {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        debug!(target: "api", %method, path, %request_id, "Sending request");
        let res = builder.send().await?;
        let status = res.status();

        if status.is_success() {
            return Ok(res);
        }

        let body = res.text().await.unwrap_or_default();
        warn!(target: "api", %method, path, %request_id, %status, "Request failed");
        if status == StatusCode::UNAUTHORIZED {
            return Err(AdminError::NotAuthenticated);
        }
        Err(AdminError::Api {
            status: status.as_u16(),
            message: extract_api_error(&body).unwrap_or_default(),
        })
    }

    async fn decode<T: DeserializeOwned>(res: Response) -> Result<T> {
        let bytes = res.bytes().await?;
        let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
        Ok(envelope.into_inner())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let builder = self.request(Method::GET, path).query(query);
        let res = self.execute(builder, &Method::GET, path).await?;
        Self::decode(res).await
    }

    async fn send<B: Serialize>(&self, method: Method, path: &str, body: &B) -> Result<Response> {
        let builder = self.request(method.clone(), path).json(body);
        self.execute(builder, &method, path).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let builder = self.request(Method::DELETE, path);
        self.execute(builder, &Method::DELETE, path).await?;
        Ok(())
    }

    // Categories

    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.get("/categories", &[]).await
    }

    pub async fn create_category(&self, req: &CategoryRequest) -> Result<()> {
        self.send(Method::POST, "/categories", req).await?;
        Ok(())
    }

    pub async fn update_category(&self, id: &Id, req: &CategoryRequest) -> Result<()> {
        self.send(Method::PUT, &format!("/categories/{}", id), req).await?;
        Ok(())
    }

    pub async fn delete_category(&self, id: &Id) -> Result<()> {
        self.delete(&format!("/categories/{}", id)).await
    }

    // Vocabulary

    pub async fn vocabulary(&self) -> Result<Vec<Vocabulary>> {
        self.get("/vocabularies", &[]).await
    }

    pub async fn create_vocabulary(&self, req: &VocabularyRequest) -> Result<()> {
        self.send(Method::POST, "/vocabularies", req).await?;
        Ok(())
    }

    pub async fn update_vocabulary(&self, id: &Id, req: &VocabularyRequest) -> Result<()> {
        self.send(Method::PUT, &format!("/vocabularies/{}", id), req).await?;
        Ok(())
    }

    pub async fn delete_vocabulary(&self, id: &Id) -> Result<()> {
        self.delete(&format!("/vocabularies/{}", id)).await
    }

    // Levels

    pub async fn levels(&self) -> Result<Vec<Level>> {
        self.get("/levels", &[]).await
    }

    pub async fn level_with_exercises(&self, id: &Id) -> Result<Level> {
        self.get(&format!("/levels/{}", id), &[("include", "exercises")])
            .await
    }

    pub async fn lessons_by_level(&self, id: &Id) -> Result<Vec<Lesson>> {
        let level: Level = self
            .get(&format!("/levels/{}", id), &[("include", "lessons")])
            .await?;
        Ok(level.lessons)
    }

    pub async fn create_level(&self, req: &LevelRequest) -> Result<Level> {
        let res = self.send(Method::POST, "/levels", req).await?;
        Self::decode(res).await
    }

    pub async fn update_level(&self, id: &Id, req: &LevelRequest) -> Result<()> {
        self.send(Method::PUT, &format!("/levels/{}", id), req).await?;
        Ok(())
    }

    pub async fn delete_level(&self, id: &Id) -> Result<()> {
        self.delete(&format!("/levels/{}", id)).await
    }

    // Lessons

    pub async fn lessons(&self) -> Result<Vec<Lesson>> {
        self.get("/lessons", &[]).await
    }

    pub async fn create_lesson(&self, req: &LessonRequest) -> Result<()> {
        self.send(Method::POST, "/lessons", req).await?;
        Ok(())
    }

    pub async fn update_lesson(&self, id: &Id, req: &LessonRequest) -> Result<()> {
        self.send(Method::PUT, &format!("/lessons/{}", id), req).await?;
        Ok(())
    }

    pub async fn delete_lesson(&self, id: &Id) -> Result<()> {
        self.delete(&format!("/lessons/{}", id)).await
    }

    // Exercises

    /// Create an exercise. Returns its new id when the backend sends one back.
    pub async fn create_exercise(&self, req: &ExerciseRequest) -> Result<Option<Id>> {
        let res = self.send(Method::POST, "/exercises", req).await?;
        let bytes = res.bytes().await?;
        // An empty or id-less reply still counts as created.
        Ok(serde_json::from_slice::<Envelope<Created>>(&bytes)
            .ok()
            .and_then(|created| created.into_inner().id))
    }

    pub async fn update_exercise(&self, id: &Id, req: &ExerciseRequest) -> Result<()> {
        self.send(Method::PUT, &format!("/exercises/{}", id), req).await?;
        Ok(())
    }

    pub async fn delete_exercise(&self, id: &Id) -> Result<()> {
        self.delete(&format!("/exercises/{}", id)).await
    }

    /// Counts for the dashboard, fetched concurrently.
    #[instrument(target = "api", level = "info", skip(self))]
    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let (categories, vocabulary, lessons, levels) = tokio::try_join!(
            self.categories(),
            self.vocabulary(),
            self.lessons(),
            self.levels()
        )?;
        Ok(DashboardStats {
            total_categories: categories.len(),
            total_vocabulary: vocabulary.len(),
            total_lessons: lessons.len(),
            total_levels: levels.len(),
        })
    }

    /// Run every operation of `plan` concurrently and report what happened.
    ///
    /// A failed operation does not cancel or undo the others.
    #[instrument(target = "api", level = "info", skip_all, fields(ops = plan.len()))]
    pub async fn sync_exercises(&self, plan: &SyncPlan) -> SyncReport {
        let results = join_all(plan.ops.iter().map(|op| async move {
            let result = match op {
                SyncOp::Delete(id) => self.delete_exercise(id).await.map(|()| None),
                SyncOp::Update(id, req) => self.update_exercise(id, req).await.map(|()| None),
                SyncOp::Create(_, req) => self.create_exercise(req).await,
            };
            (op, result)
        }))
        .await;

        let mut report = SyncReport::default();
        for (op, result) in results {
            match result {
                Ok(created) => {
                    report.succeeded += 1;
                    match (op, created) {
                        (SyncOp::Delete(id), _) => report.deleted.push(id.clone()),
                        (SyncOp::Create(index, _), Some(id)) => report.created.push((*index, id)),
                        _ => {}
                    }
                }
                Err(e) => {
                    warn!(target: "api", operation = %op, error = %e, "Exercise change failed");
                    report.failures.push(SyncFailure {
                        operation: op.to_string(),
                        message: e.user_message(),
                    });
                }
            }
        }
        info!(target: "api", succeeded = report.succeeded, failed = report.failures.len(), "Exercise sync finished");
        report
    }

    /// Save a level and its exercises.
    ///
    /// The level is created or updated first so new exercises have a level id
    /// to point at; then the exercise changes are synchronised. Returns the
    /// level id.
    ///
    /// When some exercise changes fail the error still carries the level id
    /// and what was applied, so a retry can update instead of create.
    pub async fn save_level(
        &self,
        existing: Option<&Id>,
        fields: &LevelFields,
        questions: &[Question],
        deleted: &[Id],
    ) -> Result<Id> {
        let request = LevelRequest::from(fields);
        let level_id = match existing {
            Some(id) => {
                self.update_level(id, &request).await?;
                id.clone()
            }
            None => self.create_level(&request).await?.id,
        };

        let plan = plan_exercise_sync(&level_id, questions, deleted);
        if plan.is_empty() {
            return Ok(level_id);
        }
        let report = self.sync_exercises(&plan).await;
        if report.is_complete() {
            Ok(level_id)
        } else {
            Err(AdminError::Sync { level_id, report })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use axum::extract::State;
    use axum::http::{HeaderMap, Method as HttpMethod, StatusCode as HttpStatus, Uri};
    use axum::response::{IntoResponse, Response as HttpResponse};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::test_support::spawn;

    struct StaticToken(Option<&'static str>);

    impl TokenSource for StaticToken {
        fn access_token(&self) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    /// Every request the fake backend saw: "METHOD /path?query | auth | body".
    type Log = Arc<Mutex<Vec<String>>>;

    async fn backend(
        State(log): State<Log>,
        method: HttpMethod,
        uri: Uri,
        headers: HeaderMap,
        body: String,
    ) -> HttpResponse {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string();
        let has_request_id = headers.contains_key("x-request-id");
        log.lock().unwrap().push(format!("{} {} | {} | {}", method, uri, auth, body));
        assert!(has_request_id);

        let path = uri.path();
        let query = uri.query().unwrap_or("");
        match (method.as_str(), path) {
            ("GET", "/api/categories") => {
                Json(json!({ "data": [{ "id": 1, "name": "Greetings" }] })).into_response()
            }
            ("GET", "/api/vocabularies") => Json(json!([
                { "id": 1, "arabicText": "سَلَام", "indonesianText": "salam" },
                { "id": 2, "arabicText": "بَاب", "indonesianText": "pintu" }
            ]))
            .into_response(),
            ("GET", "/api/lessons") => Json(json!({ "data": [] })).into_response(),
            ("GET", "/api/levels") => Json(json!({ "data": [
                { "id": 1, "name": "Beginner", "sequence": 1 },
                { "id": 2, "name": "Intermediate", "sequence": 2 },
                { "id": 3, "name": "Advanced", "sequence": 3 }
            ]}))
            .into_response(),
            ("GET", "/api/levels/1") if query == "include=exercises" => Json(json!({ "data": {
                "id": 1, "name": "Beginner", "sequence": 1,
                "exercises": [{
                    "id": 5, "question": "q5",
                    "choices": [
                        { "id": 51, "text": "a", "isCorrect": true },
                        { "id": 52, "text": "b", "isCorrect": false },
                        { "id": 53, "text": "c", "isCorrect": false },
                        { "id": 54, "text": "d", "isCorrect": false }
                    ]
                }]
            }}))
            .into_response(),
            ("GET", "/api/levels/1") if query == "include=lessons" => Json(json!({ "data": {
                "id": 1, "name": "Beginner",
                "lessons": [{ "id": 4, "title": "Alphabet", "sequence": 1, "level_id": 1 }]
            }}))
            .into_response(),
            ("POST", "/api/levels") => (
                HttpStatus::CREATED,
                Json(json!({ "data": { "id": 77, "name": "New", "sequence": 4 } })),
            )
                .into_response(),
            ("PUT", "/api/levels/1") => Json(json!({ "data": {} })).into_response(),
            ("POST", "/api/exercises") if body.contains("\"question\":\"fail\"") => (
                HttpStatus::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Exercise rejected" })),
            )
                .into_response(),
            ("POST", "/api/exercises") => {
                (HttpStatus::CREATED, Json(json!({ "data": { "id": 100 } }))).into_response()
            }
            ("PUT", _) => Json(json!({ "data": {} })).into_response(),
            ("DELETE", "/api/exercises/13") => (
                HttpStatus::NOT_FOUND,
                Json(json!({ "message": "Exercise not found" })),
            )
                .into_response(),
            ("DELETE", "/api/categories/1") => HttpStatus::UNAUTHORIZED.into_response(),
            ("DELETE", _) => HttpStatus::NO_CONTENT.into_response(),
            _ => HttpStatus::NOT_FOUND.into_response(),
        }
    }

    async fn client(token: Option<&'static str>) -> (ApiClient, Log) {
        let log: Log = Arc::default();
        let router = Router::new().fallback(backend).with_state(log.clone());
        let url = spawn(router).await;
        let api = ApiClient::new(
            &format!("{}/api/", url),
            Duration::from_secs(5),
            Arc::new(StaticToken(token)),
        )
        .unwrap();
        (api, log)
    }

    fn entries(log: &Log) -> Vec<String> {
        let mut lines = log.lock().unwrap().clone();
        lines.sort();
        lines
    }

    fn question(id: Option<i64>, text: &str) -> Question {
        let mut q = Question::blank();
        q.id = id.map(Id::Int);
        q.text = text.to_string();
        q
    }

    fn fields() -> LevelFields {
        LevelFields {
            name: "Beginner".to_string(),
            description: "Start".to_string(),
            sequence: 1,
        }
    }

    #[tokio::test]
    async fn decodes_wrapped_and_bare_lists() {
        let (api, log) = client(Some("tok")).await;
        let categories = api.categories().await.unwrap();
        assert_eq!(categories[0].name, "Greetings");
        let vocabulary = api.vocabulary().await.unwrap();
        assert_eq!(vocabulary.len(), 2);

        let lines = entries(&log);
        assert!(lines.iter().all(|l| l.contains("| Bearer tok |")));
    }

    #[tokio::test]
    async fn no_session_means_no_auth_header() {
        let (api, log) = client(None).await;
        api.levels().await.unwrap();
        assert!(entries(&log)[0].contains("| - |"));
    }

    #[tokio::test]
    async fn level_includes() {
        let (api, _) = client(Some("tok")).await;
        let level = api.level_with_exercises(&Id::Int(1)).await.unwrap();
        assert_eq!(level.exercises.len(), 1);
        assert_eq!(level.exercises[0].choices[0].id, Some(Id::Int(51)));

        let lessons = api.lessons_by_level(&Id::Int(1)).await.unwrap();
        assert_eq!(lessons[0].title, "Alphabet");
    }

    #[tokio::test]
    async fn dashboard_counts_every_list() {
        let (api, _) = client(Some("tok")).await;
        let stats = api.dashboard_stats().await.unwrap();
        assert_eq!(
            stats,
            DashboardStats {
                total_categories: 1,
                total_vocabulary: 2,
                total_lessons: 0,
                total_levels: 3,
            }
        );
    }

    #[tokio::test]
    async fn unauthorized_maps_to_not_authenticated() {
        let (api, _) = client(Some("stale")).await;
        assert!(matches!(
            api.delete_category(&Id::Int(1)).await,
            Err(AdminError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn save_existing_level_syncs_exercises() {
        let (api, log) = client(Some("tok")).await;
        let id = api
            .save_level(
                Some(&Id::Int(1)),
                &fields(),
                &[question(Some(9), "kept"), question(None, "added")],
                &[Id::Int(5)],
            )
            .await
            .unwrap();
        assert_eq!(id, Id::Int(1));

        let lines = entries(&log);
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().any(|l| l.starts_with("DELETE /api/exercises/5 ")));
        assert!(lines.iter().any(|l| l.starts_with("PUT /api/exercises/9 ")));
        assert!(lines.iter().any(|l| l.starts_with("PUT /api/levels/1 ")));
        let create = lines
            .iter()
            .find(|l| l.starts_with("POST /api/exercises "))
            .unwrap();
        assert!(create.contains("\"level_id\":1"));
        assert!(create.contains("\"question\":\"added\""));
    }

    #[tokio::test]
    async fn new_level_id_flows_into_exercises() {
        let (api, log) = client(Some("tok")).await;
        let id = api
            .save_level(None, &fields(), &[question(None, "first")], &[])
            .await
            .unwrap();
        assert_eq!(id, Id::Int(77));

        let lines = entries(&log);
        let create = lines
            .iter()
            .find(|l| l.starts_with("POST /api/exercises "))
            .unwrap();
        assert!(create.contains("\"level_id\":77"));
    }

    #[tokio::test]
    async fn partial_failure_is_reported_without_rollback() {
        let (api, log) = client(Some("tok")).await;
        let err = api
            .save_level(
                Some(&Id::Int(1)),
                &fields(),
                &[question(Some(9), "kept"), question(None, "fail")],
                &[Id::Int(13), Id::Int(5)],
            )
            .await
            .unwrap_err();

        let AdminError::Sync { level_id, report } = err else {
            panic!("expected sync error");
        };
        assert_eq!(level_id, Id::Int(1));
        assert_eq!(report.total(), 4);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.deleted, vec![Id::Int(5)]);
        assert!(report.created.is_empty());
        let messages: Vec<_> = report.failures.iter().map(|f| f.message.as_str()).collect();
        assert!(messages.contains(&"Exercise not found"));
        assert!(messages.contains(&"Exercise rejected"));

        // The level update and every exercise call were still issued.
        assert_eq!(entries(&log).len(), 5);
    }

    #[tokio::test]
    async fn new_level_sync_failure_carries_the_created_level() {
        let (api, log) = client(Some("tok")).await;
        let err = api
            .save_level(
                None,
                &fields(),
                &[question(None, "fail"), question(None, "ok")],
                &[],
            )
            .await
            .unwrap_err();

        let AdminError::Sync { level_id, report } = err else {
            panic!("expected sync error");
        };
        assert_eq!(level_id, Id::Int(77));
        assert_eq!(report.created, vec![(1, Id::Int(100))]);
        assert_eq!(report.failures.len(), 1);
        assert!(report.summary().contains("create exercise \"fail\""));

        let posts = entries(&log)
            .into_iter()
            .filter(|l| l.starts_with("POST /api/levels "))
            .count();
        assert_eq!(posts, 1);
    }
}
