use std::collections::HashMap;

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::{
    client::{required, NO_BODY},
    types::{ListQuery, Page},
    EkdSend, Result,
};

/// Voice call operations, obtained from [`EkdSend::calls`].
pub struct VoiceApi<'a> {
    pub(crate) client: &'a EkdSend,
}

impl VoiceApi<'_> {
    /// Initiates an outbound voice call.
    pub async fn create(&self, request: &CreateCall) -> Result<VoiceCall> {
        required(self.client.request(Method::POST, "/calls", Some(request)).await?)
    }

    /// Fetches a call by ID.
    pub async fn get(&self, call_id: &str) -> Result<VoiceCall> {
        let path = format!("/calls/{call_id}");
        required(self.client.request(Method::GET, &path, NO_BODY).await?)
    }

    /// Lists calls, newest first.
    pub async fn list(&self, query: &ListQuery) -> Result<Page<VoiceCall>> {
        let path = query.append_to("/calls");
        required(self.client.request(Method::GET, &path, NO_BODY).await?)
    }

    /// Hangs up a call in progress.
    pub async fn hangup(&self, call_id: &str) -> Result<VoiceCall> {
        let path = format!("/calls/{call_id}/hangup");
        required(self.client.request(Method::POST, &path, NO_BODY).await?)
    }

    /// Fetches the recording of a completed call.
    ///
    /// The call must have been created with `record: Some(true)`.
    pub async fn recording(&self, call_id: &str) -> Result<Recording> {
        let path = format!("/calls/{call_id}/recording");
        required(self.client.request(Method::GET, &path, NO_BODY).await?)
    }
}

/// Parameters for [`VoiceApi::create`].
///
/// Exactly one of `tts_message` or `audio_url` should be set; the API rejects
/// requests carrying both.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CreateCall {
    /// Destination phone number in E.164 format.
    pub to: String,
    /// Caller ID phone number.
    pub from: String,
    /// Text to synthesize and play to the callee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_message: Option<String>,
    /// URL of an audio file to play instead of TTS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine_detection: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
}

/// A voice call as reported by the API.
#[derive(Clone, Debug, Deserialize)]
pub struct VoiceCall {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub tts_message: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub record: bool,
    #[serde(default)]
    pub machine_detection: bool,
    /// Call length in seconds, once the call has ended.
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub recording_url: Option<String>,
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub answered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
}

/// A call recording.
#[derive(Clone, Debug, Deserialize)]
pub struct Recording {
    pub url: String,
    /// Recording length in seconds.
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::CreateCall;

    #[test]
    fn unset_optional_fields_are_omitted_not_null() {
        let request = CreateCall {
            to: "+15551234567".into(),
            from: "+15557654321".into(),
            tts_message: Some("Your appointment is tomorrow".into()),
            record: Some(true),
            ..Default::default()
        };
        let json = serde_json::to_value(&request).expect("request must serialize");
        let object = json.as_object().expect("body must be an object");

        assert_eq!(object["tts_message"], "Your appointment is tomorrow");
        assert_eq!(object["record"], true);
        for absent in ["audio_url", "voice", "language", "machine_detection", "webhook_url", "metadata"] {
            assert!(!object.contains_key(absent), "{absent} must be omitted");
        }
    }

    #[test]
    fn voice_call_parses_timestamps() {
        let raw = r#"{
            "id": "call_1",
            "status": "completed",
            "to": "+15551234567",
            "from": "+15557654321",
            "record": true,
            "duration": 42,
            "created_at": "2026-08-01T12:00:00Z",
            "ended_at": "2026-08-01T12:00:42Z"
        }"#;
        let call: super::VoiceCall = serde_json::from_str(raw).expect("call must parse");
        assert_eq!(call.duration, Some(42));
        assert!(call.created_at.is_some());
        assert!(call.answered_at.is_none());
    }
}
