pub mod pages;

use actix_multipart::Multipart;
use actix_web::http::header::{self, ContentType};
use actix_web::http::StatusCode;
use actix_web::{dev::Server, get, post, web, App, HttpRequest, HttpResponse, HttpServer, ResponseError};
use futures_util::StreamExt;
use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::{error, info, warn};
use url::Url;

use crate::application::{
    DescribeUseCase, IngestionUseCase, PlottingUseCase, UploadUseCase, UploadedFile,
};
use crate::domain::error::AppError;
use crate::domain::upload::{UploadOutcome, UploadRejection};
use crate::infrastructure::config::Config;
use crate::infrastructure::storage::UploadStore;

static BASE_URL: Lazy<Url> = Lazy::new(|| Url::parse("http://localhost/").unwrap());

pub struct HttpState {
    pub upload_use_case: UploadUseCase,
    pub describe_use_case: DescribeUseCase,
    pub plotting_use_case: PlottingUseCase,
    pub max_upload_bytes: usize,
}

impl HttpState {
    pub fn new(config: &Config, store: UploadStore) -> Self {
        let ingestion = IngestionUseCase::new(config.sniff_rows);
        Self {
            upload_use_case: UploadUseCase::new(store.clone()),
            describe_use_case: DescribeUseCase::new(store.clone(), ingestion.clone()),
            plotting_use_case: PlottingUseCase::new(
                store,
                ingestion,
                config.histogram_bins,
                config.chart_format,
            ),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type(ContentType::html())
            .body(pages::error_page(&self.to_string()))
    }
}

/// Absolute path `/<prefix>/<filename>` with the file name percent-encoded
pub fn route_path(prefix: &str, filename: &str) -> String {
    let mut url = BASE_URL.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push(prefix).push(filename);
    }
    url.path().to_string()
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Path of the page the form was posted from, or `/`
fn origin_path(req: &HttpRequest) -> String {
    req.headers()
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|referer| BASE_URL.join(referer).ok())
        .map(|url| url.path().to_string())
        .filter(|path| path != "/upload")
        .unwrap_or_else(|| "/".to_string())
}

fn failed(filename: &str, err: AppError) -> AppError {
    error!(filename = %filename, error = %err, "Request failed");
    err
}

#[derive(Deserialize)]
struct IndexQuery {
    error: Option<String>,
}

#[get("/")]
async fn index(query: web::Query<IndexQuery>) -> HttpResponse {
    let rejection = query.error.as_deref().and_then(UploadRejection::from_code);
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(pages::index_page(rejection))
}

#[get("/health")]
async fn health() -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::plaintext()).body("ok")
}

enum FormFile {
    Found(UploadedFile),
    Missing,
    TooLarge,
}

/// Drain the form, keeping the first `file` field
async fn read_file_field(mut payload: Multipart, limit: usize) -> Result<FormFile, actix_multipart::MultipartError> {
    let mut found: Option<UploadedFile> = None;

    while let Some(field) = payload.next().await {
        let mut field = field?;
        let wanted = found.is_none() && field.name() == Some("file");
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or("")
            .to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            if wanted {
                if bytes.len() + chunk.len() > limit {
                    return Ok(FormFile::TooLarge);
                }
                bytes.extend_from_slice(&chunk);
            }
        }

        if wanted {
            found = Some(UploadedFile { filename, bytes });
        }
    }

    Ok(found.map(FormFile::Found).unwrap_or(FormFile::Missing))
}

#[post("/upload")]
async fn upload(
    data: web::Data<HttpState>,
    req: HttpRequest,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let form = match read_file_field(payload, data.max_upload_bytes).await {
        Ok(form) => form,
        Err(err) => {
            warn!(error = %err, "Could not read upload form");
            FormFile::Missing
        }
    };

    let outcome = match form {
        FormFile::Found(file) => data.upload_use_case.execute(Some(file)).await,
        FormFile::Missing => data.upload_use_case.execute(None).await,
        FormFile::TooLarge => Ok(UploadOutcome::Rejected(UploadRejection::TooLarge)),
    }
    .map_err(|err| failed("", err))?;

    Ok(match outcome {
        UploadOutcome::Stored { filename } => see_other(&route_path("display", &filename)),
        UploadOutcome::Rejected(rejection) => see_other(&format!(
            "{}?error={}",
            origin_path(&req),
            rejection.code()
        )),
    })
}

#[get("/display/{filename}")]
async fn display_data(
    data: web::Data<HttpState>,
    filename: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let filename = filename.into_inner();
    let use_case = data.describe_use_case.clone();
    let name = filename.clone();

    let summary = web::block(move || use_case.execute(&name))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))
        .and_then(|result| result)
        .map_err(|err| failed(&filename, err))?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(pages::display_page(&filename, &summary)))
}

#[get("/plot/{filename}")]
async fn plot(
    data: web::Data<HttpState>,
    filename: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let filename = filename.into_inner();
    let use_case = data.plotting_use_case.clone();
    let name = filename.clone();

    let charts = web::block(move || use_case.execute(&name))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))
        .and_then(|result| result)
        .map_err(|err| failed(&filename, err))?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(pages::plot_page(&filename, &charts)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(health)
        .service(upload)
        .service(display_data)
        .service(plot);
}

pub fn start_server(state: HttpState, host: &str, port: u16) -> Result<Server, AppError> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind((host, port))
        .map_err(|err| AppError::Internal(format!("Failed to bind {}:{}: {}", host, port, err)))?
        .run();

    info!(host = %host, port, "Listening on http://{}:{}", host, port);
    Ok(server)
}
