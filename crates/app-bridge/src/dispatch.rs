use mesh_export::StlFormat;
use tracing::debug;

use crate::app::{App, AppError};
use crate::form::FormSchema;
use crate::messages::{AppToUi, UiToApp};

/// Handle one UI message and produce the reply.
///
/// Errors never escape: they come back as [`AppToUi::Error`].
pub fn dispatch(app: &mut App, msg: UiToApp) -> AppToUi {
    match handle_message(app, msg) {
        Ok(response) => response,
        Err(e) => AppToUi::Error {
            message: e.to_string(),
        },
    }
}

/// Parse a JSON message and dispatch it.
pub fn dispatch_json(app: &mut App, json: &str) -> AppToUi {
    match serde_json::from_str::<UiToApp>(json) {
        Ok(msg) => dispatch(app, msg),
        Err(e) => AppToUi::Error {
            message: AppError::from(e).to_string(),
        },
    }
}

fn handle_message(app: &mut App, msg: UiToApp) -> Result<AppToUi, AppError> {
    debug!(?msg, "dispatch");
    match msg {
        UiToApp::SetField { field, value } => {
            let value = app.set_field(field, value)?;
            Ok(AppToUi::FieldChanged { field, value })
        }

        UiToApp::SelectShape { shape } => {
            let groups = app.select_shape(shape);
            Ok(AppToUi::ShapeSelected { shape, groups })
        }

        UiToApp::SetParams { params } => {
            app.set_params(&params)?;
            Ok(describe_form(app))
        }

        UiToApp::Update => {
            app.update();
            Ok(app.model_updated())
        }

        UiToApp::Export { path, ascii } => {
            let format = if ascii {
                StlFormat::Ascii
            } else {
                StlFormat::Binary
            };
            let report = app.export(&path, format)?;
            Ok(AppToUi::ExportFinished { report })
        }

        UiToApp::DescribeForm => Ok(describe_form(app)),
    }
}

fn describe_form(app: &App) -> AppToUi {
    AppToUi::FormDescribed {
        schema: FormSchema::standard(),
        values: *app.params(),
        groups: app.form().groups(),
    }
}
