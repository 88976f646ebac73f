use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::rates::{CurrencyRate, DailyRates, DateKey, RateProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.privatbank.ua/p24api/exchange_rates";

// PrivatBankProvider implementation for RateProvider
pub struct PrivatBankProvider {
    base_url: String,
}

impl PrivatBankProvider {
    pub fn new(base_url: &str) -> Self {
        PrivatBankProvider {
            base_url: base_url.to_string(),
        }
    }

    fn url_for(&self, date: &DateKey) -> String {
        format!("{}?date={}", self.base_url, date)
    }
}

#[derive(Deserialize, Debug)]
struct ExchangeRatesResponse {
    date: String,
    #[serde(rename = "baseCurrencyLit")]
    base_currency_lit: Option<String>,
    #[serde(rename = "exchangeRate", default)]
    exchange_rate: Vec<ExchangeRateItem>,
}

#[derive(Deserialize, Debug)]
struct ExchangeRateItem {
    // Older archives carry a leading UAH-only row without a currency code
    #[serde(default)]
    currency: String,
    #[serde(rename = "saleRate")]
    sale_rate: Option<f64>,
    #[serde(rename = "purchaseRate")]
    purchase_rate: Option<f64>,
    #[serde(rename = "saleRateNB")]
    sale_rate_nb: Option<f64>,
    #[serde(rename = "purchaseRateNB")]
    purchase_rate_nb: Option<f64>,
}

impl From<ExchangeRatesResponse> for DailyRates {
    fn from(response: ExchangeRatesResponse) -> Self {
        DailyRates {
            date: response.date,
            base_currency: response.base_currency_lit,
            rates: response
                .exchange_rate
                .into_iter()
                .map(|item| CurrencyRate {
                    currency: item.currency,
                    sale_rate: item.sale_rate,
                    purchase_rate: item.purchase_rate,
                    sale_rate_nb: item.sale_rate_nb,
                    purchase_rate_nb: item.purchase_rate_nb,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl RateProvider for PrivatBankProvider {
    #[instrument(
        name = "PrivatBankRatesFetch",
        skip(self, session),
        fields(date = %date)
    )]
    async fn fetch_day(&self, session: &reqwest::Client, date: &DateKey) -> Result<DailyRates> {
        let url = self.url_for(date);
        debug!("Requesting exchange rates from {}", url);

        let response = session
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for date: {}", e, date))?;

        if response.status() != StatusCode::OK {
            return Err(anyhow!(
                "Failed to fetch data: {} for date: {}",
                response.status(),
                date
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read response body for {}: {}", date, e))?;

        let data: ExchangeRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", date, e))?;

        debug!(entries = data.exchange_rate.len(), "Received exchange rates");
        Ok(data.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::batch::open_session;
    use chrono::NaiveDate;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RATES_PATH: &str = "/p24api/exchange_rates";

    const MOCK_JSON: &str = r#"{
        "date": "01.12.2014",
        "bank": "PB",
        "baseCurrency": 980,
        "baseCurrencyLit": "UAH",
        "exchangeRate": [
            {
                "baseCurrency": "UAH",
                "currency": "USD",
                "saleRateNB": 15.056413,
                "purchaseRateNB": 15.056413,
                "saleRate": 15.7,
                "purchaseRate": 15.35
            },
            {
                "baseCurrency": "UAH",
                "currency": "EUR",
                "saleRateNB": 18.79492,
                "purchaseRateNB": 18.79492,
                "saleRate": 20.0,
                "purchaseRate": 19.2
            },
            {
                "baseCurrency": "UAH",
                "currency": "PLZ",
                "saleRateNB": 4.4967,
                "purchaseRateNB": 4.4967
            }
        ]
    }"#;

    fn date() -> DateKey {
        DateKey::new(NaiveDate::from_ymd_opt(2014, 12, 1).unwrap())
    }

    fn session() -> reqwest::Client {
        open_session(Duration::from_secs(5)).unwrap()
    }

    async fn create_mock_server(date: &str, template: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(RATES_PATH))
            .and(query_param("date", date))
            .respond_with(template)
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn provider_for(mock_server: &MockServer) -> PrivatBankProvider {
        PrivatBankProvider::new(&format!("{}{}", mock_server.uri(), RATES_PATH))
    }

    #[tokio::test]
    async fn test_successful_rates_fetch() {
        let mock_server = create_mock_server(
            "01.12.2014",
            ResponseTemplate::new(200).set_body_string(MOCK_JSON),
        )
        .await;
        let provider = provider_for(&mock_server);

        let rates = provider.fetch_day(&session(), &date()).await.unwrap();

        assert_eq!(rates.date, "01.12.2014");
        assert_eq!(rates.base_currency.as_deref(), Some("UAH"));
        let currencies: Vec<&str> = rates.rates.iter().map(|r| r.currency.as_str()).collect();
        assert_eq!(currencies, vec!["USD", "EUR", "PLZ"]);
        assert_eq!(rates.rates[0].sale_rate, Some(15.7));
        assert_eq!(rates.rates[0].purchase_rate, Some(15.35));
        assert_eq!(rates.rates[1].sale_rate_nb, Some(18.79492));
        assert!(rates.rates[2].sale_rate.is_none());
        assert!(rates.rates[2].purchase_rate.is_none());
    }

    #[tokio::test]
    async fn test_missing_exchange_rate_list_is_empty() {
        let mock_server = create_mock_server(
            "01.12.2014",
            ResponseTemplate::new(200).set_body_string(r#"{"date": "01.12.2014"}"#),
        )
        .await;
        let provider = provider_for(&mock_server);

        let rates = provider.fetch_day(&session(), &date()).await.unwrap();
        assert!(rates.rates.is_empty());
        assert!(rates.base_currency.is_none());
    }

    #[tokio::test]
    async fn test_api_error_response() {
        let mock_server = create_mock_server("01.12.2014", ResponseTemplate::new(500)).await;
        let provider = provider_for(&mock_server);

        let result = provider.fetch_day(&session(), &date()).await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "Failed to fetch data: 500 Internal Server Error for date: 01.12.2014"
        );
    }

    #[tokio::test]
    async fn test_non_200_success_status_is_rejected() {
        let mock_server = create_mock_server(
            "01.12.2014",
            ResponseTemplate::new(204).set_body_string(MOCK_JSON),
        )
        .await;
        let provider = provider_for(&mock_server);

        let result = provider.fetch_day(&session(), &date()).await;
        assert!(result.unwrap_err().to_string().contains("204"));
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server = create_mock_server(
            "01.12.2014",
            ResponseTemplate::new(200).set_body_string(r#"{"exchangeRate": "#),
        )
        .await;
        let provider = provider_for(&mock_server);

        let result = provider.fetch_day(&session(), &date()).await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse JSON response for 01.12.2014")
        );
    }

    #[tokio::test]
    async fn test_transport_error() {
        // Nothing listens on the discard port
        let provider = PrivatBankProvider::new("http://127.0.0.1:9/p24api/exchange_rates");

        let result = provider.fetch_day(&session(), &date()).await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .starts_with("Request error:")
        );
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let mock_server = create_mock_server(
            "01.12.2014",
            ResponseTemplate::new(200)
                .set_body_string(MOCK_JSON)
                .set_delay(Duration::from_secs(2)),
        )
        .await;
        let provider = provider_for(&mock_server);
        let session = open_session(Duration::from_millis(200)).unwrap();

        let result = provider.fetch_day(&session, &date()).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_url_uses_date_query_parameter() {
        let provider = PrivatBankProvider::new(DEFAULT_BASE_URL);
        assert_eq!(
            provider.url_for(&date()),
            "https://api.privatbank.ua/p24api/exchange_rates?date=01.12.2014"
        );
    }
}
