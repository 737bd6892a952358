use crate::error::{ExportError, Result};
use crate::pptx::PptxPresentationModel;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::process::ExitCode;

/// What the caller of an export receives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PptxPresentationModel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// The error message is meant for the end user
    #[serde(default)]
    pub is_api_error: bool,
}

impl ExportResponse {
    pub fn ok(model: PptxPresentationModel) -> Self {
        Self { success: true, data: Some(model), error: None, is_api_error: false }
    }

    pub fn failed(error: &ExportError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            is_api_error: error.is_domain_error(),
        }
    }

    /// Process exit status for a command-line export
    pub fn exit_code(&self) -> ExitCode {
        if self.success { ExitCode::SUCCESS } else { ExitCode::FAILURE }
    }
}

impl From<Result<PptxPresentationModel>> for ExportResponse {
    fn from(result: Result<PptxPresentationModel>) -> Self {
        match result {
            Ok(model) => Self::ok(model),
            Err(e) => Self::failed(&e),
        }
    }
}
