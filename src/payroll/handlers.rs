use actix_multipart::Multipart;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use futures_util::TryStreamExt;
use log::{debug, error, info, warn};

use super::breakdown::PayrollBreakdown;
use super::models::{PayrollPreview, RowRequest, RowsRequest};
use super::sheet::parse_workbook;
use super::summary::PayrollSummary;
use crate::auth::middleware::validate_request_token;
use crate::slip::SlipContent;
use crate::{AppState, ErrorResponse};

/// Reads the `file` field of an upload form into memory.
async fn read_sheet_field(mut payload: Multipart) -> Result<(String, Vec<u8>), String> {
    while let Some(mut field) = payload.try_next().await.map_err(|e| e.to_string())? {
        let filename = field
            .content_disposition()
            .filter(|cd| cd.get_name() == Some("file"))
            .map(|cd| cd.get_filename().unwrap_or("payroll.xlsx").to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(|e| e.to_string())? {
            bytes.extend_from_slice(&chunk);
        }

        if let Some(filename) = filename {
            return Ok((filename, bytes));
        }
    }

    Err("No file was uploaded".to_string())
}

#[utoipa::path(
    context_path = "/api",
    tag = "Payroll",
    post,
    path = "/payroll/upload",
    security(("bearer_auth" = [])),
    request_body(content = inline(super::models::UploadSheetRequest), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Parsed sheet with batch totals", body = PayrollPreview),
        (status = 400, description = "Missing or unreadable workbook", body = ErrorResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn upload_sheet(req: HttpRequest, payload: Multipart) -> impl Responder {
    if let Err(e) = validate_request_token(&req) {
        return e.error_response();
    }
    info!("Executing upload_sheet handler");

    let (filename, bytes) = match read_sheet_field(payload).await {
        Ok(file) => file,
        Err(e) => {
            warn!("Rejected payroll upload: {}", e);
            return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&e));
        }
    };
    debug!("Received {} ({} bytes)", filename, bytes.len());

    let parsed = match web::block(move || parse_workbook(&bytes).map_err(|e| e.to_string())).await {
        Ok(Ok(parsed)) => parsed,
        Ok(Err(e)) => {
            warn!("Failed to parse {}: {}", filename, e);
            return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&e));
        }
        Err(e) => {
            error!("Workbook parsing task failed: {}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to parse workbook"));
        }
    };

    let summary = PayrollSummary::from_rows(&parsed.rows);
    info!("Parsed {}: {} employees", filename, summary.total_employees);

    HttpResponse::Ok().json(PayrollPreview {
        filename,
        headers: parsed.headers,
        rows: parsed.rows,
        summary,
    })
}

#[utoipa::path(
    context_path = "/api",
    tag = "Payroll",
    post,
    path = "/payroll/summary",
    security(("bearer_auth" = [])),
    request_body = RowsRequest,
    responses(
        (status = 200, description = "Batch totals", body = PayrollSummary),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn summarize_rows(req: HttpRequest, body: web::Json<RowsRequest>) -> impl Responder {
    if let Err(e) = validate_request_token(&req) {
        return e.error_response();
    }

    let rows = body.rows.as_deref().unwrap_or_default();
    HttpResponse::Ok().json(PayrollSummary::from_rows(rows))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Payroll",
    post,
    path = "/payroll/breakdown",
    security(("bearer_auth" = [])),
    request_body = RowRequest,
    responses(
        (status = 200, description = "Slip figures for one employee", body = PayrollBreakdown),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn breakdown_row(req: HttpRequest, body: web::Json<RowRequest>) -> impl Responder {
    if let Err(e) = validate_request_token(&req) {
        return e.error_response();
    }

    HttpResponse::Ok().json(PayrollBreakdown::from_row(&body.row))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Payroll",
    post,
    path = "/payroll/slip",
    security(("bearer_auth" = [])),
    request_body = RowRequest,
    responses(
        (status = 200, description = "Salary slip as an application/pdf attachment"),
        (status = 400, description = "Row has no employee name", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Slip could not be rendered", body = ErrorResponse)
    )
)]
pub async fn download_slip(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<RowRequest>,
) -> impl Responder {
    if let Err(e) = validate_request_token(&req) {
        return e.error_response();
    }

    let RowRequest { row } = body.into_inner();
    if !row.is_employee() {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request("Row has no Name"));
    }

    let renderer = state.renderer.clone();
    let content = SlipContent::from_row(&row);
    let slip = match web::block(move || renderer.render(&content).map_err(|e| e.to_string())).await {
        Ok(Ok(slip)) => slip,
        Ok(Err(e)) => {
            error!("Failed to render slip: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&e));
        }
        Err(e) => {
            error!("Slip rendering task failed: {}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to render slip"));
        }
    };

    HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(slip.filename)],
        })
        .body(slip.pdf)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payroll")
            .route("/upload", web::post().to(upload_sheet))
            .route("/summary", web::post().to(summarize_rows))
            .route("/breakdown", web::post().to(breakdown_row))
            .route("/slip", web::post().to(download_slip))
            .route("/send", web::post().to(crate::delivery::handlers::send_payslips)),
    );
}
