//! 字段记录 API 处理器
//!
//! 需要登录；列表按创建时间倒序分页。

use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::{info, warn};
use validator::Validate;

use crate::dto::{
    ListRecordsQuery, MessageResponse, RecordDto, RecordPage, RecordRequest, parse_record_id,
};
use crate::error::Result;
use crate::state::AppState;

/// 分页查询
///
/// GET /api/records?page=1&pageSize=20
pub async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<ListRecordsQuery>,
) -> Result<Json<RecordPage>> {
    let (page, page_size) = query.normalized();

    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM records")
        .fetch_one(state.db.pool())
        .await?;

    let rows = sqlx::query_as::<_, RecordDto>(
        r#"
        SELECT id, field_name, field_type, field_value, created_at
        FROM records
        ORDER BY created_at DESC, id DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(page_size)
    .bind(query.offset())
    .fetch_all(state.db.pool())
    .await?;

    Ok(Json(RecordPage {
        page,
        page_size,
        total,
        rows,
    }))
}

/// 创建记录
///
/// POST /api/records
pub async fn create_record(
    State(state): State<AppState>,
    Json(req): Json<RecordRequest>,
) -> Result<Json<MessageResponse>> {
    req.validate()?;
    let value = req.value_text()?;

    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO records (field_name, field_type, field_value) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&req.field_name)
    .bind(&req.field_type)
    .bind(&value)
    .fetch_one(state.db.pool())
    .await?;

    info!(record_id = id, field_name = %req.field_name, "Record created");
    Ok(Json(MessageResponse::new("创建成功")))
}

/// 更新记录
///
/// PUT /api/records/{id}
pub async fn update_record(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Json(req): Json<RecordRequest>,
) -> Result<Json<MessageResponse>> {
    let id = parse_record_id(&raw_id)?;
    req.validate()?;
    let value = req.value_text()?;

    let result = sqlx::query(
        "UPDATE records SET field_name = $1, field_type = $2, field_value = $3 WHERE id = $4",
    )
    .bind(&req.field_name)
    .bind(&req.field_type)
    .bind(&value)
    .bind(id)
    .execute(state.db.pool())
    .await?;

    if result.rows_affected() == 0 {
        warn!(record_id = id, "Update matched no record");
    } else {
        info!(record_id = id, "Record updated");
    }
    Ok(Json(MessageResponse::new("更新成功")))
}

/// 删除记录
///
/// DELETE /api/records/{id}
pub async fn delete_record(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_record_id(&raw_id)?;

    let result = sqlx::query("DELETE FROM records WHERE id = $1")
        .bind(id)
        .execute(state.db.pool())
        .await?;

    if result.rows_affected() == 0 {
        warn!(record_id = id, "Delete matched no record");
    } else {
        info!(record_id = id, "Record deleted");
    }
    Ok(Json(MessageResponse::new("删除成功")))
}
