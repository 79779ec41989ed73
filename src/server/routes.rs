use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::io::Cursor;
use std::sync::Arc;
use crate::search::CognateSearch;
use crate::server::{with_store, ApiError, ApiResult, AppState};

#[derive(Deserialize)]
pub struct SuggestionParams {
    pub prefix: Option<String>,
}

#[derive(Deserialize)]
pub struct ChainParams {
    pub word: Option<String>,
    #[serde(alias = "language")]
    pub lang: Option<String>,
}

/// Read the `file` field of a multipart upload
async fn read_upload(mut multipart: Multipart) -> ApiResult<Vec<u8>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("No file uploaded: {}", e)))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read uploaded file: {}", e)))?;
            return Ok(bytes.to_vec());
        }
    }
    Err(ApiError::BadRequest("No file uploaded: missing `file` field".to_string()))
}

pub async fn import_tsv(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> ApiResult<Json<Value>> {
    let upload = read_upload(multipart).await?;
    tracing::info!("Importing TSV upload ({} bytes)", upload.len());

    let summary = with_store(&state, move |state, store| {
        let summary = state.importer.import_tsv(store, Cursor::new(upload), None)?;
        state.set_last_import(store.import_metadata()?);
        Ok(summary)
    })
    .await?;

    Ok(Json(json!({
        "message": "Import completed successfully",
        "records": summary.records,
        "skipped": summary.skipped,
    })))
}

pub async fn import_languages(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> ApiResult<Json<Value>> {
    let upload = read_upload(multipart).await?;

    let count = with_store(&state, move |state, store| {
        state.importer.import_languages(store, upload.as_slice())
    })
    .await?;

    Ok(Json(json!({
        "message": "Languages imported successfully",
        "languages": count,
    })))
}

/// Never waits on the store, so it answers while an import is running
pub async fn import_status(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": state.importer.status().as_str(),
        "last_import": state.last_import(),
    }))
}

pub async fn clear_database(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    with_store(&state, |state, store| {
        state.importer.clear_database(store)?;
        state.set_last_import(None);
        Ok(())
    })
    .await?;

    Ok(Json(json!({ "message": "Database cleared successfully" })))
}

pub async fn suggestions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SuggestionParams>,
) -> ApiResult<Json<Value>> {
    let prefix = params
        .prefix
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::BadRequest("prefix is required".to_string()))?;

    let suggestions = with_store(&state, move |_, store| {
        CognateSearch::new(&*store).suggest_words(&prefix)
    })
    .await?;

    Ok(Json(json!({ "data": suggestions })))
}

pub async fn cognates_by_concept(
    State(state): State<Arc<AppState>>,
    Path(concept_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let cognates = with_store(&state, move |_, store| {
        CognateSearch::new(&*store).cognates_by_concept(&concept_id)
    })
    .await?;

    Ok(Json(json!({ "data": cognates })))
}

pub async fn cognate_chains(
    State(state): State<Arc<AppState>>,
    Path(concept_id): Path<String>,
    Query(params): Query<ChainParams>,
) -> ApiResult<Json<Value>> {
    let result = with_store(&state, move |_, store| {
        CognateSearch::new(&*store).find_cognate_chains(
            &concept_id,
            params.word.as_deref().filter(|w| !w.is_empty()),
            params.lang.as_deref().filter(|l| !l.is_empty()),
        )
    })
    .await?;

    tracing::debug!("Concept {}: returning {} chains", result.concept_id, result.chains.len());
    Ok(Json(json!({ "data": result })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use crate::cognate::CognatePair;
    use crate::language::LanguageInfo;
    use crate::server::{cors_layer, router};
    use crate::storage::{ImportMetadata, SqliteStore};

    fn app() -> Router {
        let store = SqliteStore::open_in_memory().unwrap();
        store.insert_language(&LanguageInfo::new("eng", "English", 52.0, -1.0)).unwrap();
        store.insert_language(&LanguageInfo::new("deu", "German", 51.0, 10.0)).unwrap();
        store.insert_cognate(&CognatePair::new("c1", "eng", "mother", "deu", "Mutter")).unwrap();
        store.insert_cognate(&CognatePair::new("c1", "eng", "water", "deu", "Wasser")).unwrap();
        store.index_prefix("mo", "mother|eng|c1").unwrap();

        router(Arc::new(AppState::new(store).unwrap()), cors_layer(&[]).unwrap())
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn multipart(uri: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--BOUNDARY\r\nContent-Disposition: form-data; name=\"file\"; filename=\"upload\"\r\n\r\n{}\r\n--BOUNDARY--\r\n",
            content
        );
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "multipart/form-data; boundary=BOUNDARY")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_chains_endpoint() {
        let (status, body) = send(app(), get("/api/v1/search/chains/concept/c1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["concept_id"], "c1");
        assert_eq!(body["data"]["chains"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"]["chains"][0][0]["word"], "Mutter");
        assert_eq!(body["data"]["chains"][0][0]["transliteration"], "");
    }

    #[tokio::test]
    async fn test_chains_endpoint_filters() {
        let (status, body) = send(app(), get("/api/v1/search/chains/concept/c1?word=water&lang=eng")).await;
        assert_eq!(status, StatusCode::OK);
        let chains = body["data"]["chains"].as_array().unwrap();
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0][1]["word"], "water");

        let (_, body) = send(app(), get("/api/v1/search/chains/concept/c1?word=water&lang=deu")).await;
        assert!(body["data"]["chains"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concept_endpoint() {
        let (status, body) = send(app(), get("/api/v1/search/concept/c1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let (_, body) = send(app(), get("/api/v1/search/concept/unknown")).await;
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_suggestions_endpoint() {
        let (status, body) = send(app(), get("/api/v1/search/suggestions?prefix=Mo")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["word"], "mother");
        assert_eq!(body["data"][0]["language_info"]["name"], "English");

        let (status, body) = send(app(), get("/api/v1/search/suggestions")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "prefix is required");
    }

    #[tokio::test]
    async fn test_import_roundtrip() {
        let app = app();
        let tsv = "concept\tlang1\tword1\tlang2\tword2\nc7\teng\tfire\tdeu\tFeuer\n";

        let (status, body) = send(app.clone(), multipart("/api/v1/import/tsv", tsv)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["records"], 1);

        let (_, body) = send(app.clone(), get("/api/v1/search/chains/concept/c7")).await;
        assert_eq!(body["data"]["chains"][0].as_array().unwrap().len(), 2);

        let (_, body) = send(app.clone(), get("/api/v1/import/status")).await;
        assert_eq!(body["status"], "ready");
        assert_eq!(body["last_import"]["total_records"], 1);

        let clear = Request::builder()
            .method("DELETE")
            .uri("/api/v1/import/clear")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app.clone(), clear).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(app.clone(), get("/api/v1/import/status")).await;
        assert!(body["last_import"].is_null());

        let (_, body) = send(app, get("/api/v1/search/concept/c7")).await;
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_status_answers_while_store_is_busy() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .set_import_metadata(&ImportMetadata {
                total_records: 42,
                status: "completed".to_string(),
                timestamp: 1_700_000_000,
            })
            .unwrap();
        let state = Arc::new(AppState::new(store).unwrap());
        let app = router(Arc::clone(&state), cors_layer(&[]).unwrap());

        let _busy = state.store.lock().await;
        let (status, body) = send(app, get("/api/v1/import/status")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
        assert_eq!(body["last_import"]["total_records"], 42);
    }

    #[tokio::test]
    async fn test_import_languages_endpoint() {
        let app = app();
        let json = r#"[{"code":"nld","name":"Dutch","coordinates":[52.1,5.3],"flag":"","country":"Netherlands"}]"#;

        let (status, body) = send(app.clone(), multipart("/api/v1/import/languages", json)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["languages"], 1);

        let (status, _) = send(app, multipart("/api/v1/import/languages", "not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_without_file_field() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/import/tsv")
            .header("content-type", "multipart/form-data; boundary=BOUNDARY")
            .body(Body::from("--BOUNDARY--\r\n"))
            .unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("No file uploaded"));
    }
}
