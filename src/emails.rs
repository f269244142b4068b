use std::collections::HashMap;

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::{
    client::{required, NO_BODY},
    types::{ListQuery, Page},
    EkdSend, Result,
};

/// Email operations, obtained from [`EkdSend::emails`].
pub struct EmailsApi<'a> {
    pub(crate) client: &'a EkdSend,
}

impl EmailsApi<'_> {
    /// Sends an email.
    pub async fn send(&self, request: &SendEmail) -> Result<Email> {
        required(self.client.request(Method::POST, "/emails", Some(request)).await?)
    }

    /// Fetches an email by ID.
    pub async fn get(&self, email_id: &str) -> Result<Email> {
        let path = format!("/emails/{email_id}");
        required(self.client.request(Method::GET, &path, NO_BODY).await?)
    }

    /// Lists emails, newest first.
    pub async fn list(&self, query: &ListQuery) -> Result<Page<Email>> {
        let path = query.append_to("/emails");
        required(self.client.request(Method::GET, &path, NO_BODY).await?)
    }

    /// Cancels a scheduled email that has not been sent yet.
    pub async fn cancel(&self, email_id: &str) -> Result<Email> {
        let path = format!("/emails/{email_id}");
        required(self.client.request(Method::DELETE, &path, NO_BODY).await?)
    }
}

/// Parameters for [`EmailsApi::send`].
///
/// Unset optional fields are omitted from the request body entirely.
///
/// ```
/// use ekdsend::SendEmail;
///
/// let request = SendEmail {
///     from: "hello@yourdomain.com".into(),
///     to: vec!["user@example.com".into()],
///     subject: "Hello!".into(),
///     html: Some("<h1>Welcome!</h1>".into()),
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Debug, Default, Serialize)]
pub struct SendEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bcc: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
    /// RFC 3339 timestamp to defer sending until.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<String>,
}

/// An email as reported by the API.
#[derive(Clone, Debug, Deserialize)]
pub struct Email {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: Vec<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub cc: Option<Vec<String>>,
    #[serde(default)]
    pub bcc: Option<Vec<String>>,
    #[serde(default)]
    pub reply_to: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
    #[serde(default)]
    pub scheduled_for: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
