use crate::{
    data::{
        student::{StudentDetails, StudentPatch, StudentRecord},
        wire::DeleteConfirmation,
    },
    error::{FailedSnafu, InvalidBodySnafu, RosterResult, StudentAction},
    state::RosterState,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use snafu::ResultExt;

pub async fn get_students(
    State(state): State<RosterState>,
) -> RosterResult<Json<Vec<StudentRecord>>> {
    let students = state.all().await.context(FailedSnafu {
        action: StudentAction::List,
    })?;
    Ok(Json(students))
}

pub async fn get_student(
    State(state): State<RosterState>,
    Path(id): Path<String>,
) -> RosterResult<Json<StudentRecord>> {
    let student = state.get(&id).await.context(FailedSnafu {
        action: StudentAction::Get,
    })?;
    Ok(Json(student))
}

pub async fn post_student(
    State(state): State<RosterState>,
    body: Result<Json<StudentDetails>, JsonRejection>,
) -> RosterResult<(StatusCode, Json<StudentRecord>)> {
    let Json(details) = body.context(InvalidBodySnafu)?;

    let student = state.insert(details).await.context(FailedSnafu {
        action: StudentAction::Create,
    })?;
    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn put_student(
    State(state): State<RosterState>,
    Path(id): Path<String>,
    body: Result<Json<StudentPatch>, JsonRejection>,
) -> RosterResult<Json<StudentRecord>> {
    let Json(patch) = body.context(InvalidBodySnafu)?;

    let student = state.update(&id, patch).await.context(FailedSnafu {
        action: StudentAction::Update,
    })?;
    Ok(Json(student))
}

pub async fn delete_student(
    State(state): State<RosterState>,
    Path(id): Path<String>,
) -> RosterResult<Json<DeleteConfirmation>> {
    state.remove(&id).await.context(FailedSnafu {
        action: StudentAction::Delete,
    })?;
    Ok(Json(DeleteConfirmation::default()))
}

pub async fn search_students(
    State(state): State<RosterState>,
    Path(query): Path<String>,
) -> RosterResult<Json<Vec<StudentRecord>>> {
    let students = state.search(&query).await.context(FailedSnafu {
        action: StudentAction::Search,
    })?;
    debug!(%query, found = students.len(), "searched students");
    Ok(Json(students))
}
