//! The HTML front end. `GET` renders the application page in its initial
//! state; the page's forms post back to `/`, where each action is replayed
//! through a [`StudentController`] backed directly by the store.

use crate::{
    client::{
        api::{ClientError, ClientResult, StudentApi},
        controller::{Snapshot, StudentController},
        view::render_app,
    },
    data::{
        StudentStore,
        student::{StudentDetails, StudentPatch, StudentRecord},
        wire::{DeleteConfirmation, ErrorBody, HealthStatus},
    },
    error::{FailedSnafu, RosterError, RosterResult, StudentAction},
    maud_conveniences::render_page,
    state::RosterState,
};
use async_trait::async_trait;
use axum::{
    Form, Json,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use jiff::Zoned;
use maud::Markup;
use serde::Deserialize;
use snafu::ResultExt;
use std::sync::Arc;

/// Every unmatched GET gets the application page in its initial state.
pub async fn get_shell(method: Method, uri: Uri) -> Response {
    if method != Method::GET {
        debug!(%method, %uri, "no route");
        return (StatusCode::NOT_FOUND, Json(ErrorBody::new("Not found"))).into_response();
    }

    render_page(render_app(&Snapshot::default(), Zoned::now().date())).into_response()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShellAction {
    Submit,
    Edit,
    CancelEdit,
    Clear,
    Refresh,
}

#[derive(Debug, Deserialize)]
pub struct ShellForm {
    action: ShellAction,
    /// The saved record the page was showing, if any.
    #[serde(default)]
    id: Option<String>,
    #[serde(flatten)]
    details: StudentDetails,
}

pub async fn post_shell(
    State(state): State<RosterState>,
    Form(form): Form<ShellForm>,
) -> RosterResult<Markup> {
    let ShellForm {
        action,
        id,
        mut details,
    } = form;
    details.drop_blank_optionals();

    let api = Arc::new(StoreApi(StudentStore::clone(&state)));
    let mut controller = match id.filter(|id| !id.trim().is_empty()) {
        Some(id) => {
            let record = state.get(&id).await.context(FailedSnafu {
                action: StudentAction::Get,
            })?;
            StudentController::with_record(api, record)
        }
        None => StudentController::new(api),
    };
    controller.check_connectivity().await;

    match action {
        ShellAction::Submit => {
            controller.edit();
            let outcome = controller.submit(details).await;
            debug!(?outcome, "form submitted");
        }
        ShellAction::Edit => {
            controller.edit();
        }
        ShellAction::Clear => controller.clear(),
        ShellAction::CancelEdit | ShellAction::Refresh => {}
    }

    Ok(render_page(render_app(
        &controller.snapshot(),
        Zoned::now().date(),
    )))
}

/// [`StudentApi`] straight over the store, for controllers running inside the server.
pub struct StoreApi(pub StudentStore);

fn client_error(error: RosterError, action: StudentAction) -> ClientError {
    match error {
        RosterError::MissingStudent { .. } => ClientError::NotFound,
        other => {
            error!(?other, %action, "store call failed");
            ClientError::Server {
                status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                message: action.failure_message().to_string(),
            }
        }
    }
}

#[async_trait]
impl StudentApi for StoreApi {
    async fn health(&self) -> ClientResult<HealthStatus> {
        Ok(HealthStatus::ok())
    }

    async fn list(&self) -> ClientResult<Vec<StudentRecord>> {
        self.0
            .all()
            .await
            .map_err(|e| client_error(e, StudentAction::List))
    }

    async fn get(&self, id: &str) -> ClientResult<StudentRecord> {
        self.0
            .get(id)
            .await
            .map_err(|e| client_error(e, StudentAction::Get))
    }

    async fn create(&self, details: &StudentDetails) -> ClientResult<StudentRecord> {
        self.0
            .insert(details.clone())
            .await
            .map_err(|e| client_error(e, StudentAction::Create))
    }

    async fn update(&self, id: &str, details: &StudentDetails) -> ClientResult<StudentRecord> {
        self.0
            .update(id, StudentPatch::from(details.clone()))
            .await
            .map_err(|e| client_error(e, StudentAction::Update))
    }

    async fn delete(&self, id: &str) -> ClientResult<DeleteConfirmation> {
        self.0
            .remove(id)
            .await
            .map(|()| DeleteConfirmation::default())
            .map_err(|e| client_error(e, StudentAction::Delete))
    }

    async fn search(&self, query: &str) -> ClientResult<Vec<StudentRecord>> {
        self.0
            .search(query)
            .await
            .map_err(|e| client_error(e, StudentAction::Search))
    }
}
