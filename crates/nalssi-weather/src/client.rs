//! Client for the short-term forecast endpoint (`getVilageFcst`).

use std::sync::Arc;
use std::time::Duration;

use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::retry::{with_retry, RetryConfig};
use crate::types::{BaseTime, ForecastRecord, GridCell, WeatherError};

pub const KMA_API_BASE: &str = "https://apis.data.go.kr";
const FORECAST_PATH: &str = "/1360000/VilageFcstInfoService_2.0/getVilageFcst";

/// Rows requested per call; enough for the current day and part of the next
pub const DEFAULT_NUM_OF_ROWS: u32 = 500;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const RESULT_OK: &str = "00";
const RESULT_NO_DATA: &str = "03";

/// Settings for [`KmaClient`]
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    /// Decoded service key; it is percent-encoded when the query is built
    pub service_key: String,
    pub num_of_rows: u32,
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: KMA_API_BASE.to_string(),
            service_key: String::new(),
            num_of_rows: DEFAULT_NUM_OF_ROWS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    response: EnvelopeResponse,
}

#[derive(Debug, Deserialize)]
struct EnvelopeResponse {
    header: EnvelopeHeader,
    /// Decoded only once the header reports success; failed responses may
    /// carry an empty string in place of `items`
    #[serde(default)]
    body: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeHeader {
    result_code: String,
    #[serde(default)]
    result_msg: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeBody {
    items: EnvelopeItems,
    #[serde(default)]
    total_count: u32,
}

#[derive(Debug, Deserialize)]
struct EnvelopeItems {
    #[serde(default)]
    item: Vec<ForecastRecord>,
}

#[derive(Debug, Clone)]
pub struct KmaClient {
    client: Arc<Client>,
    options: ClientOptions,
}

impl KmaClient {
    pub fn new(options: ClientOptions) -> Result<Self, WeatherError> {
        if options.service_key.trim().is_empty() {
            return Err(WeatherError::MissingApiKey);
        }

        let client = Client::builder().timeout(options.timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            options,
        })
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Fetch every record of the `base` issuance for `grid`.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_forecast(
        &self,
        grid: GridCell,
        base: &BaseTime,
    ) -> Result<Vec<ForecastRecord>, WeatherError> {
        let url = format!(
            "{}{}",
            self.options.base_url.trim_end_matches('/'),
            FORECAST_PATH
        );
        let query = [
            ("serviceKey", self.options.service_key.clone()),
            ("pageNo", "1".to_string()),
            ("numOfRows", self.options.num_of_rows.to_string()),
            ("dataType", "JSON".to_string()),
            ("base_date", base.base_date.clone()),
            ("base_time", base.base_time.clone()),
            ("nx", grid.nx.to_string()),
            ("ny", grid.ny.to_string()),
        ];

        let response = with_retry(&self.options.retry, || {
            self.client.get(&url).query(&query).send()
        })
        .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(WeatherError::Http {
                status: status.as_u16(),
                message: text.chars().take(200).collect(),
            });
        }

        let records = parse_forecast_body(&text)?;
        tracing::debug!("Fetched {} forecast records for {}", records.len(), grid);
        Ok(records)
    }
}

/// Decode a `getVilageFcst` response body.
///
/// Gateway-level failures (for example an unregistered key) arrive as XML
/// even when JSON was requested; their reason code is reported as an
/// [`WeatherError::Api`].
pub fn parse_forecast_body(text: &str) -> Result<Vec<ForecastRecord>, WeatherError> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('<') {
        return Err(gateway_error(trimmed));
    }

    let envelope: Envelope =
        serde_json::from_str(trimmed).map_err(|e| WeatherError::Parse(e.to_string()))?;
    let header = envelope.response.header;

    match header.result_code.as_str() {
        RESULT_OK => {}
        RESULT_NO_DATA => return Err(WeatherError::NoData),
        _ => {
            return Err(WeatherError::Api {
                code: header.result_code,
                message: header.result_msg,
            })
        }
    }

    let body = envelope.response.body.ok_or(WeatherError::NoData)?;
    let body: EnvelopeBody =
        serde_json::from_value(body).map_err(|e| WeatherError::Parse(e.to_string()))?;
    if body.items.item.is_empty() {
        return Err(WeatherError::NoData);
    }
    if body.total_count as usize > body.items.item.len() {
        tracing::debug!(
            "Response truncated: {} of {} records",
            body.items.item.len(),
            body.total_count
        );
    }

    Ok(body.items.item)
}

fn gateway_error(xml: &str) -> WeatherError {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut current: Option<Vec<u8>> = None;
    let mut code: Option<String> = None;
    let mut message = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => current = Some(e.name().as_ref().to_vec()),
            Ok(Event::End(_)) => current = None,
            Ok(Event::Text(t)) => {
                let text = match t.unescape() {
                    Ok(text) => text.trim().to_string(),
                    Err(e) => return WeatherError::Parse(format!("gateway XML: {e}")),
                };
                match current.as_deref() {
                    Some(b"returnReasonCode") => code = Some(text),
                    Some(b"returnAuthMsg") => message = text,
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return WeatherError::Parse(format!(
                    "gateway XML at position {}: {e}",
                    reader.buffer_position()
                ))
            }
            _ => {}
        }
        buf.clear();
    }

    match code {
        Some(code) => WeatherError::Api { code, message },
        None => WeatherError::Parse("unexpected XML response".to_string()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::types::Category;

    #[test]
    fn test_parse_success() {
        let body = r#"{"response":{"header":{"resultCode":"00","resultMsg":"NORMAL_SERVICE"},
            "body":{"dataType":"JSON","items":{"item":[
                {"baseDate":"20240601","baseTime":"0500","category":"TMP","fcstDate":"20240601","fcstTime":"0600","fcstValue":"17","nx":60,"ny":127},
                {"baseDate":"20240601","baseTime":"0500","category":"SKY","fcstDate":"20240601","fcstTime":"0600","fcstValue":"1","nx":60,"ny":127}
            ]},"pageNo":1,"numOfRows":500,"totalCount":2}}}"#;

        let records = parse_forecast_body(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category, Category::Temperature);
        assert_eq!(records[1].category, Category::Sky);
    }

    #[test]
    fn test_parse_error_code() {
        let body = r#"{"response":{"header":{"resultCode":"10","resultMsg":"INVALID_REQUEST_PARAMETER_ERROR"}}}"#;
        match parse_forecast_body(body) {
            Err(WeatherError::Api { code, message }) => {
                assert_eq!(code, "10");
                assert_eq!(message, "INVALID_REQUEST_PARAMETER_ERROR");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_no_data() {
        let body = r#"{"response":{"header":{"resultCode":"03","resultMsg":"NO_DATA"}}}"#;
        assert!(parse_forecast_body(body).unwrap_err().is_no_data());
    }

    #[test]
    fn test_parse_gateway_xml() {
        let body = "<OpenAPI_ServiceResponse><cmmMsgHeader>\
            <errMsg>SERVICE ERROR</errMsg>\
            <returnAuthMsg>SERVICE_KEY_IS_NOT_REGISTERED_ERROR</returnAuthMsg>\
            <returnReasonCode>30</returnReasonCode>\
            </cmmMsgHeader></OpenAPI_ServiceResponse>";
        match parse_forecast_body(body) {
            Err(WeatherError::Api { code, message }) => {
                assert_eq!(code, "30");
                assert_eq!(message, "SERVICE_KEY_IS_NOT_REGISTERED_ERROR");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_gateway_xml_decodes_entities() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
            <OpenAPI_ServiceResponse>
              <cmmMsgHeader>
                <returnAuthMsg>KEY &amp; IP ERROR</returnAuthMsg>
                <returnReasonCode xml:space="preserve"> 32 </returnReasonCode>
              </cmmMsgHeader>
            </OpenAPI_ServiceResponse>"#;
        match parse_forecast_body(body) {
            Err(WeatherError::Api { code, message }) => {
                assert_eq!(code, "32");
                assert_eq!(message, "KEY & IP ERROR");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_xml_without_reason_code() {
        assert!(matches!(
            parse_forecast_body("<html><body>Bad Gateway</body></html>"),
            Err(WeatherError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_forecast_body("not json"),
            Err(WeatherError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_service_key_rejected() {
        let result = KmaClient::new(ClientOptions::default());
        assert!(matches!(result, Err(WeatherError::MissingApiKey)));
    }
}
