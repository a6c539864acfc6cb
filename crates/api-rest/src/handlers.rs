//! Record API handlers.
//!
//! Each handler is a thin translation: wire request into [`PatientFields`], one call on
//! [`ehr_core::PatientService`], core result back into a wire response.

use crate::error::ApiError;
use crate::AppState;
use api_shared::{
    ErrorRes, HealthRes, HealthService, ListRecordsQuery, PatientFieldsReq, PatientRecordRes,
    VitalSigns as VitalSignsRes,
};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use ehr_core::{PatientFields, PatientRecord, ValidationErrors, VitalSigns};

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
pub(crate) async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/records",
    params(ListRecordsQuery),
    responses(
        (status = 200, description = "All patient records", body = [PatientRecordRes]),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// List patient records
///
/// Returns every record in storage order. With `?q=term`, only records matching the term
/// (case-insensitive substring) are returned.
///
/// # Errors
/// Returns `500 Internal Server Error` if the record store cannot be read.
#[axum::debug_handler]
pub(crate) async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<ListRecordsQuery>,
) -> Result<Json<Vec<PatientRecordRes>>, ApiError> {
    let records = match query.q {
        Some(term) => state.patient_service.search(&term)?,
        None => state.patient_service.list()?,
    };
    Ok(Json(records.into_iter().map(record_res).collect()))
}

#[utoipa::path(
    get,
    path = "/records/{id}",
    params(("id" = String, Path, description = "Record id (32 lowercase hex characters)")),
    responses(
        (status = 200, description = "Patient record", body = PatientRecordRes),
        (status = 404, description = "Unknown record id", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Fetch one patient record
#[axum::debug_handler]
pub(crate) async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PatientRecordRes>, ApiError> {
    let record = state.patient_service.get(&id)?;
    Ok(Json(record_res(record)))
}

#[utoipa::path(
    post,
    path = "/records",
    request_body = PatientFieldsReq,
    responses(
        (status = 201, description = "Patient record created", body = PatientRecordRes),
        (status = 400, description = "Missing or invalid fields", body = ErrorRes),
        (status = 409, description = "ehrId already in use", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Create a patient record
///
/// Required-field presence is checked here, before the store is touched; the full validation
/// then runs inside the core service.
///
/// # Errors
/// - `400 Bad Request` listing every missing or invalid field, or for a malformed body
/// - `409 Conflict` if the `ehrId` is already in use
/// - `500 Internal Server Error` if the record cannot be persisted
#[axum::debug_handler]
pub(crate) async fn create_record(
    State(state): State<AppState>,
    payload: Result<Json<PatientFieldsReq>, JsonRejection>,
) -> Result<(StatusCode, Json<PatientRecordRes>), ApiError> {
    let Json(req) = payload?;
    let fields = patient_fields(req);

    let missing = fields.missing_required();
    if !missing.is_empty() {
        return Err(ValidationErrors::missing(&missing).into());
    }

    let record = state.patient_service.create(fields)?;
    Ok((StatusCode::CREATED, Json(record_res(record))))
}

#[utoipa::path(
    put,
    path = "/records/{id}",
    params(("id" = String, Path, description = "Record id (32 lowercase hex characters)")),
    request_body = PatientFieldsReq,
    responses(
        (status = 200, description = "Patient record updated", body = PatientRecordRes),
        (status = 400, description = "Invalid fields", body = ErrorRes),
        (status = 404, description = "Unknown record id", body = ErrorRes),
        (status = 409, description = "ehrId already in use", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Partially update a patient record
///
/// Only the supplied fields change; everything else keeps its stored value.
#[axum::debug_handler]
pub(crate) async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PatientFieldsReq>, JsonRejection>,
) -> Result<Json<PatientRecordRes>, ApiError> {
    let Json(req) = payload?;
    let record = state.patient_service.update(&id, patient_fields(req))?;
    Ok(Json(record_res(record)))
}

#[utoipa::path(
    delete,
    path = "/records/{id}",
    params(("id" = String, Path, description = "Record id (32 lowercase hex characters)")),
    responses(
        (status = 204, description = "Patient record deleted"),
        (status = 404, description = "Unknown record id", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Permanently delete a patient record
#[axum::debug_handler]
pub(crate) async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.patient_service.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

fn patient_fields(req: PatientFieldsReq) -> PatientFields {
    PatientFields {
        patient_name: req.patient_name,
        age: req.age,
        gender: req.gender,
        dob: req.dob,
        status: req.status,
        medical_history: req.medical_history,
        medications: req.medications,
        vital_signs: req.vital_signs.map(|v| VitalSigns {
            blood_pressure: v.blood_pressure,
        }),
        ehr_id: req.ehr_id,
    }
}

fn record_res(record: PatientRecord) -> PatientRecordRes {
    PatientRecordRes {
        id: record.id.to_string(),
        ehr_id: record.ehr_id.to_string(),
        patient_name: record.patient_name.into_inner(),
        age: record.age,
        gender: record.gender.to_string(),
        dob: record.dob,
        status: record.status.to_string(),
        medical_history: record.medical_history,
        medications: record.medications,
        vital_signs: VitalSignsRes {
            blood_pressure: record.vital_signs.blood_pressure,
        },
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}
