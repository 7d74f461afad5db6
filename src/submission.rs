//! Proposal request data and the checks that gate the outbound webhook call.
//!
//! Nothing here touches the network: a [`SubmissionForm`] only becomes a
//! [`ProposalRequest`] once the endpoint, the RFP document and the client name
//! are all present, so an incomplete form can never reach the webhook.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use reqwest::Url;
use uuid::Uuid;

use crate::error::AppError;

pub const RFP_EXTENSIONS: [&str; 3] = ["pdf", "docx", "txt"];
pub const REFERENCE_EXTENSIONS: [&str; 1] = ["pdf"];

/// An uploaded file, held in memory for the lifetime of one submit.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub content_type: Option<String>,
    pub content: Bytes,
}

impl Document {
    pub fn new(filename: impl Into<String>, content_type: Option<String>, content: Bytes) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            content,
        }
    }

    /// Browsers post an empty, nameless part when the file input is left blank.
    pub fn is_empty(&self) -> bool {
        self.filename.trim().is_empty() || self.content.is_empty()
    }

    pub fn extension(&self) -> Option<String> {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .filter(|ext| !ext.is_empty())
    }

    fn ensure_extension(&self, allowed: &[&str]) -> Result<(), AppError> {
        match self.extension() {
            Some(ext) if allowed.contains(&ext.as_str()) => Ok(()),
            _ => Err(AppError::UnsupportedFileType {
                filename: self.filename.clone(),
                allowed: allowed.join(", "),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceScope {
    Mdr,
    Dfir,
    Mis,
    SocAsAService,
}

impl ServiceScope {
    pub const ALL: [ServiceScope; 4] = [
        ServiceScope::Mdr,
        ServiceScope::Dfir,
        ServiceScope::Mis,
        ServiceScope::SocAsAService,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ServiceScope::Mdr => "Managed Detection & Response (MDR)",
            ServiceScope::Dfir => "Digital Forensics (DFIR)",
            ServiceScope::Mis => "Managed Infrastructure (MIS)",
            ServiceScope::SocAsAService => "SOCaaS",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ServiceScope::Mdr => "MDR",
            ServiceScope::Dfir => "DFIR",
            ServiceScope::Mis => "MIS",
            ServiceScope::SocAsAService => "SOCaaS",
        }
    }
}

impl fmt::Display for ServiceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ServiceScope {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ServiceScope::ALL
            .into_iter()
            .find(|scope| scope.label() == s || scope.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::MalformedForm(format!("unknown service scope `{}`", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Formal,
    Consultative,
    AggressiveCompetitive,
}

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Formal, Tone::Consultative, Tone::AggressiveCompetitive];

    pub fn label(&self) -> &'static str {
        match self {
            Tone::Formal => "Formal",
            Tone::Consultative => "Consultative",
            Tone::AggressiveCompetitive => "Aggressive/Competitive",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tone {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Tone::ALL
            .into_iter()
            .find(|tone| tone.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::MalformedForm(format!("unknown tone `{}`", s)))
    }
}

/// Raw values collected from the page, before any checks. Nothing is parsed
/// while the multipart body is read.
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    pub webhook_url: String,
    pub client_name: String,
    pub services: Vec<String>,
    pub tone: Option<String>,
    pub rfp_file: Option<Document>,
    pub reference_files: Vec<Document>,
}

/// A validated request, ready to be forwarded.
#[derive(Debug, Clone)]
pub struct ProposalRequest {
    pub correlation_id: Uuid,
    pub client_name: String,
    pub services: Vec<ServiceScope>,
    pub tone: Tone,
    pub document: Document,
    pub reference_files: Vec<Document>,
}

impl SubmissionForm {
    /// Checks run in a fixed order: endpoint, then file, then client name,
    /// then services and tone, then file types. Each call mints a fresh
    /// correlation id.
    pub fn into_request(self) -> Result<(Url, ProposalRequest), AppError> {
        let endpoint = parse_endpoint(&self.webhook_url)?;

        let document = self
            .rfp_file
            .filter(|doc| !doc.is_empty())
            .ok_or(AppError::MissingFile)?;

        let client_name = self.client_name.trim();
        if client_name.is_empty() {
            return Err(AppError::MissingClientName);
        }

        let mut services = Vec::with_capacity(self.services.len());
        for raw in self.services.iter().filter(|raw| !raw.trim().is_empty()) {
            let service: ServiceScope = raw.parse()?;
            if !services.contains(&service) {
                services.push(service);
            }
        }
        let tone = match self.tone.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse()?,
            _ => Tone::default(),
        };

        document.ensure_extension(&RFP_EXTENSIONS)?;
        let reference_files = self
            .reference_files
            .into_iter()
            .filter(|doc| !doc.is_empty())
            .map(|doc| doc.ensure_extension(&REFERENCE_EXTENSIONS).map(|_| doc))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((
            endpoint,
            ProposalRequest {
                correlation_id: Uuid::new_v4(),
                client_name: client_name.to_string(),
                services,
                tone,
                document,
                reference_files,
            },
        ))
    }
}

pub fn parse_endpoint(raw: &str) -> Result<Url, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::MissingEndpoint);
    }

    let url = Url::parse(raw).map_err(|e| AppError::InvalidEndpoint(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::InvalidEndpoint(format!(
            "unsupported scheme `{}`",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(AppError::InvalidEndpoint("missing host".to_string()));
    }

    Ok(url)
}
