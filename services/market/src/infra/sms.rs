use anyhow::anyhow;
use reqwest::Client;

use bazaar_domain::phone::mask_phone;

use crate::domain::repository::SmsSender;
use crate::error::MarketError;

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Twilio credentials. All three values are required to send real SMS.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_phone: String,
}

/// Sends SMS through the Twilio Messages API.
#[derive(Clone)]
pub struct TwilioSmsSender {
    client: Client,
    config: TwilioConfig,
    base_url: String,
}

impl TwilioSmsSender {
    pub fn new(config: TwilioConfig) -> Self {
        Self::with_base_url(config, TWILIO_API_BASE)
    }

    pub fn with_base_url(config: TwilioConfig, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            config,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            self.base_url, self.config.account_sid
        )
    }
}

impl SmsSender for TwilioSmsSender {
    async fn send(&self, to: &str, body: &str) -> Result<(), MarketError> {
        let params = [
            ("To", to),
            ("From", self.config.from_phone.as_str()),
            ("Body", body),
        ];
        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| MarketError::Delivery(anyhow!(e).context("twilio request")))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(to = %mask_phone(to), "sms accepted by twilio");
            return Ok(());
        }
        let detail = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_owned());
        Err(MarketError::Delivery(anyhow!(
            "twilio rejected message to {}: {status}: {detail}",
            mask_phone(to)
        )))
    }
}

/// Development sender: writes the message to the log instead of sending it.
#[derive(Clone, Default)]
pub struct LogSmsSender;

impl SmsSender for LogSmsSender {
    async fn send(&self, to: &str, body: &str) -> Result<(), MarketError> {
        tracing::info!(to = %mask_phone(to), body, "sms not sent (log sender)");
        Ok(())
    }
}

/// SMS backend selected at startup.
#[derive(Clone)]
pub enum SmsGateway {
    Twilio(TwilioSmsSender),
    Log(LogSmsSender),
}

impl SmsGateway {
    /// Twilio when credentials are configured, otherwise the log sender.
    pub fn from_config(config: Option<TwilioConfig>) -> Self {
        match config {
            Some(config) => Self::Twilio(TwilioSmsSender::new(config)),
            None => Self::Log(LogSmsSender),
        }
    }
}

impl SmsSender for SmsGateway {
    async fn send(&self, to: &str, body: &str) -> Result<(), MarketError> {
        match self {
            Self::Twilio(sender) => sender.send(to, body).await,
            Self::Log(sender) => sender.send(to, body).await,
        }
    }
}
