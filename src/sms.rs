use std::collections::HashMap;

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::{
    client::{required, NO_BODY},
    types::{ListQuery, Page},
    EkdSend, Result,
};

/// SMS operations, obtained from [`EkdSend::sms`].
pub struct SmsApi<'a> {
    pub(crate) client: &'a EkdSend,
}

impl SmsApi<'_> {
    /// Sends an SMS message.
    pub async fn send(&self, request: &SendSms) -> Result<Sms> {
        required(self.client.request(Method::POST, "/sms", Some(request)).await?)
    }

    /// Fetches an SMS by ID.
    pub async fn get(&self, sms_id: &str) -> Result<Sms> {
        let path = format!("/sms/{sms_id}");
        required(self.client.request(Method::GET, &path, NO_BODY).await?)
    }

    /// Lists SMS messages, newest first.
    pub async fn list(&self, query: &ListQuery) -> Result<Page<Sms>> {
        let path = query.append_to("/sms");
        required(self.client.request(Method::GET, &path, NO_BODY).await?)
    }

    /// Cancels a scheduled SMS that has not been sent yet.
    pub async fn cancel(&self, sms_id: &str) -> Result<Sms> {
        let path = format!("/sms/{sms_id}");
        required(self.client.request(Method::DELETE, &path, NO_BODY).await?)
    }
}

/// Parameters for [`SmsApi::send`].
#[derive(Clone, Debug, Default, Serialize)]
pub struct SendSms {
    /// Destination phone number in E.164 format.
    pub to: String,
    /// Sender ID or phone number.
    pub from: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
    /// RFC 3339 timestamp to defer sending until.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<String>,
}

/// An SMS message as reported by the API.
#[derive(Clone, Debug, Deserialize)]
pub struct Sms {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
    #[serde(default)]
    pub scheduled_for: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
