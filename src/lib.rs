//! `ekdsend` is an async Rust client for the EKDSend communications API.
//!
//! One client, three resource façades:
//! - [`EkdSend::emails`] — send and manage email
//! - [`EkdSend::sms`] — send and manage SMS
//! - [`EkdSend::calls`] — create and manage voice calls
//!
//! # Example
//!
//! ```no_run
//! use ekdsend::{EkdSend, SendEmail};
//!
//! # async fn run() -> ekdsend::Result<()> {
//! let client = EkdSend::new("ek_live_xxxxxxxxxxxxx")?;
//!
//! let email = client
//!     .emails()
//!     .send(&SendEmail {
//!         from: "hello@yourdomain.com".into(),
//!         to: vec!["user@example.com".into()],
//!         subject: "Hello!".into(),
//!         html: Some("<h1>Welcome!</h1>".into()),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("sent {} ({})", email.id, email.status);
//! # Ok(())
//! # }
//! ```

mod client;
mod emails;
mod error;
mod retry;
mod sms;
mod types;
mod voice;
mod wire;

pub use client::{EkdSend, EkdSendBuilder, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT};
pub use emails::{Email, EmailsApi, SendEmail};
pub use error::EkdSendError;
pub use sms::{SendSms, Sms, SmsApi};
pub use types::{ListQuery, Page};
pub use voice::{CreateCall, Recording, VoiceApi, VoiceCall};

pub type Result<T> = std::result::Result<T, EkdSendError>;
