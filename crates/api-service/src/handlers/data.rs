//! 数据流水线 API 处理器
//!
//! 公开访问；套餐等级取自有效 Token，匿名请求按 free 处理。
//! 套餐限制不作为错误返回，而是在响应中携带 `upsell`。

use axum::{
    Json,
    extract::Multipart,
    http::header,
    response::IntoResponse,
};
use datagen_pipeline::export::ExportFormat;
use datagen_pipeline::import::ImportFormat;
use datagen_pipeline::{
    PipelineError, PreviewOutput, Workbench, export_dataset, render_preview,
};
use datagen_shared::observability::metrics::record_upsell;
use tracing::info;

use crate::dto::{
    DatasetResponse, ExportFormatInfo, ExportRequest, FormatsResponse, GenerateRequest,
    PreviewRequest,
};
use crate::error::{ApiError, Result};
use crate::middleware::RequestPlan;

/// 单次请求可生成的最大行数（不受套餐影响的硬上限）
pub const MAX_ROWS_PER_REQUEST: usize = 100_000;

const UPLOAD_FIELD: &str = "file";

/// 支持的格式
///
/// GET /api/data/formats
pub async fn formats() -> Json<FormatsResponse> {
    let export = ExportFormat::ALL
        .iter()
        .map(|f| ExportFormatInfo {
            tag: f.as_str().to_string(),
            extension: f.extension().to_string(),
            content_type: f.content_type().to_string(),
        })
        .collect();

    Json(FormatsResponse {
        export,
        import: ImportFormat::EXTENSIONS.iter().map(|e| e.to_string()).collect(),
    })
}

/// 生成数据
///
/// POST /api/data/generate
pub async fn generate(
    RequestPlan(plan): RequestPlan,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<DatasetResponse>> {
    if req.rows > MAX_ROWS_PER_REQUEST {
        return Err(ApiError::Validation(format!(
            "单次最多生成 {MAX_ROWS_PER_REQUEST} 行"
        )));
    }

    let mut workbench = match req.seed {
        Some(seed) => Workbench::with_seed(plan, seed),
        None => Workbench::new(plan),
    };
    workbench.set_fields(req.fields)?;

    match workbench.add_generated_rows(req.rows) {
        Ok(total) => {
            info!(plan = %plan, rows = total, "Rows generated");
            Ok(Json(DatasetResponse::from_dataset(workbench.dataset(), None)))
        }
        Err(PipelineError::Upsell(signal)) => {
            record_upsell(plan.as_str(), "rowLimit");
            Ok(Json(DatasetResponse::from_dataset(
                workbench.dataset(),
                Some(signal),
            )))
        }
        Err(e) => Err(e.into()),
    }
}

/// 导入文件（multipart 字段 `file`）
///
/// POST /api/data/import
pub async fn import(
    RequestPlan(plan): RequestPlan,
    mut multipart: Multipart,
) -> Result<Json<DatasetResponse>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;

        let mut workbench = Workbench::new(plan);
        let upsell = workbench.import(&bytes, &file_name)?;
        if upsell.is_some() {
            record_upsell(plan.as_str(), "importLimit");
        }

        return Ok(Json(DatasetResponse::from_dataset(workbench.dataset(), upsell)));
    }

    Err(ApiError::Validation(format!("缺少上传字段 `{UPLOAD_FIELD}`")))
}

/// 导出为文本并作为附件下载
///
/// POST /api/data/export
pub async fn export(Json(req): Json<ExportRequest>) -> Result<impl IntoResponse> {
    let format = req.format;
    let dataset = req.data.into_dataset();
    let content = export_dataset(&dataset, format, &req.options)?;

    let disposition = format!("attachment; filename=\"data.{}\"", format.extension());
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        content,
    ))
}

/// 预览
///
/// POST /api/data/preview
pub async fn preview(Json(req): Json<PreviewRequest>) -> Result<Json<PreviewOutput>> {
    let dataset = req.data.into_dataset();
    Ok(Json(render_preview(&dataset, &req.settings)?))
}
