//! Wire format between the editor and the settings backend
//!
//! The editor speaks three requests to a settings-scoped endpoint: fetch
//! (`GET`), save the full bag (`PUT`) and switch/reset the template
//! (`PATCH { template, mode }`). Transports are pluggable; the crate ships an
//! in-process one in [`crate::backend`].

use crate::error::{Error, Result};
use crate::settings::SettingsBag;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body field a backend sets when it answered but could not persist
pub const DEGRADED_MARKER: &str = "_degraded";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Patch,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
        }
    }
}

/// What a template PATCH asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateMode {
    /// Switch to the template, restoring its snapshot or its shipped defaults
    Import,
    /// Null the resettable keys of the current template
    Defaults,
}

/// Body of a template PATCH
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePatch {
    pub template: String,
    pub mode: TemplateMode,
}

/// A request to the settings endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsRequest {
    Fetch,
    Save(SettingsBag),
    Patch(TemplatePatch),
}

impl SettingsRequest {
    pub fn method(&self) -> Method {
        match self {
            SettingsRequest::Fetch => Method::Get,
            SettingsRequest::Save(_) => Method::Put,
            SettingsRequest::Patch(_) => Method::Patch,
        }
    }

    /// JSON body, if the method carries one
    pub fn body(&self) -> Result<Option<Value>> {
        Ok(match self {
            SettingsRequest::Fetch => None,
            SettingsRequest::Save(bag) => Some(serde_json::to_value(bag)?),
            SettingsRequest::Patch(patch) => Some(serde_json::to_value(patch)?),
        })
    }
}

/// Status and JSON body of a response
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Value,
}

impl TransportResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: serde_json::json!({ "error": message.into() }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the backend flagged that no durable write happened
    pub fn is_degraded(&self) -> bool {
        self.body
            .get(DEGRADED_MARKER)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Turn a response into the settings it carries
    ///
    /// Non-success statuses become [`Error::Transport`]; a degraded marker
    /// becomes [`Error::DegradedBackend`] even on success, because nothing
    /// was persisted.
    pub fn into_settings(self) -> Result<SettingsBag> {
        if !self.is_success() {
            let message = self
                .body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("request failed")
                .to_string();
            return Err(Error::Transport {
                status: self.status,
                message,
            });
        }
        if self.is_degraded() {
            return Err(Error::DegradedBackend);
        }
        match self.body {
            Value::Null => Ok(SettingsBag::new()),
            body => SettingsBag::from_value(body),
        }
    }
}

/// Something that can carry settings requests to a backend
///
/// `Err` from `send` means the request never produced a response (network
/// failure); HTTP-level failures come back as a response with an error status.
pub trait SettingsTransport {
    fn send(&self, path: &str, request: &SettingsRequest) -> Result<TransportResponse>;
}

impl<T: SettingsTransport + ?Sized> SettingsTransport for &T {
    fn send(&self, path: &str, request: &SettingsRequest) -> Result<TransportResponse> {
        (**self).send(path, request)
    }
}

impl<T: SettingsTransport + ?Sized> SettingsTransport for std::sync::Arc<T> {
    fn send(&self, path: &str, request: &SettingsRequest) -> Result<TransportResponse> {
        (**self).send(path, request)
    }
}

/// Image upload collaborator: accepts a file, returns its public URL
pub trait ImageUploader {
    fn upload(&self, file_name: &str, bytes: &[u8]) -> Result<String>;
}
