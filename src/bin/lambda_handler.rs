//! AWS Lambda handler for the option redemption calculator
//!
//! Accepts grant inputs as JSON and returns the results table, the full
//! yearly projection and both comparison charts, or the results CSV when
//! `"format": "csv"` is requested.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use std::collections::{BTreeMap, HashMap};

use aws_lambda_events::event::lambda_function_urls::LambdaFunctionUrlRequest;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use option_redemption::{
    grant::{
        DEFAULT_GROWTH_PCT, DEFAULT_REDEMPTION_PCT, DEFAULT_STRIKE_PRICE,
        DEFAULT_TOTAL_GRANT_SHARES,
    },
    project,
    report::{results_csv, CalculatorReport, RESULTS_CSV_FILENAME},
    GrantError, GrantParameters, VestingSchedule,
};

/// Input parameters, defaulted to the calculator's starting values
#[derive(Debug, Deserialize)]
pub struct CalculatorRequest {
    /// Redemption percentage, 0-10
    #[serde(default = "default_redemption_pct")]
    pub redemption_pct: u32,

    /// Share price growth percentage, 0-20
    #[serde(default = "default_growth_pct")]
    pub growth_pct: u32,

    #[serde(default = "default_strike_price")]
    pub strike_price: f64,

    #[serde(default = "default_total_grant_shares")]
    pub total_grant_shares: u64,

    /// Custom vesting values by year; unspecified years keep the default
    #[serde(default)]
    pub vesting_schedule: Option<BTreeMap<u32, u64>>,

    #[serde(default)]
    pub format: ResponseFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Json,
    Csv,
}

fn default_redemption_pct() -> u32 { DEFAULT_REDEMPTION_PCT }
fn default_growth_pct() -> u32 { DEFAULT_GROWTH_PCT }
fn default_strike_price() -> f64 { DEFAULT_STRIKE_PRICE }
fn default_total_grant_shares() -> u64 { DEFAULT_TOTAL_GRANT_SHARES }

impl CalculatorRequest {
    fn to_parameters(&self) -> Result<GrantParameters, GrantError> {
        let mut schedule = VestingSchedule::default_schedule();
        if let Some(custom) = &self.vesting_schedule {
            for (&year, &shares) in custom {
                schedule.set(year, shares)?;
            }
        }

        let params = GrantParameters::from_percentages(
            self.redemption_pct,
            self.growth_pct,
            self.strike_price,
            self.total_grant_shares,
            schedule,
        );
        params.validate()?;
        if self.vesting_schedule.is_some() {
            params.validate_custom_vesting()?;
        }
        Ok(params)
    }
}

/// Function URL response; serialized in the shape Lambda expects
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionUrlResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: String,
    message: &'a str,
}

fn cors_headers() -> HashMap<String, String> {
    HashMap::from([
        ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
        ("Access-Control-Allow-Methods".to_string(), "POST, OPTIONS".to_string()),
        ("Access-Control-Allow-Headers".to_string(), "Content-Type".to_string()),
    ])
}

fn response(status_code: u16, content_type: &str, body: String) -> FunctionUrlResponse {
    let mut headers = cors_headers();
    headers.insert("Content-Type".to_string(), content_type.to_string());
    FunctionUrlResponse {
        status_code,
        headers,
        body,
        is_base64_encoded: false,
    }
}

fn error_response(status_code: u16, cause: &str) -> FunctionUrlResponse {
    let body = ErrorBody {
        error: format!("An error occurred in the calculation: {}", cause),
        message: "Please check your inputs and try again.",
    };
    let body = serde_json::to_string(&body)
        .unwrap_or_else(|_| r#"{"error":"An error occurred in the calculation"}"#.to_string());
    response(status_code, "application/json", body)
}

/// Build the response for a parsed request
fn calculate(request: &CalculatorRequest) -> FunctionUrlResponse {
    let params = match request.to_parameters() {
        Ok(p) => p,
        Err(e) => {
            warn!("rejected calculator request: {}", e);
            return error_response(400, &e.to_string());
        }
    };

    match request.format {
        ResponseFormat::Csv => match results_csv(&project(&params)) {
            Ok(csv) => {
                let mut resp = response(200, "text/csv", csv);
                resp.headers.insert(
                    "Content-Disposition".to_string(),
                    format!("attachment; filename=\"{}\"", RESULTS_CSV_FILENAME),
                );
                resp
            }
            Err(e) => error_response(500, &e.to_string()),
        },
        ResponseFormat::Json => {
            let report = CalculatorReport::build(&params);
            match serde_json::to_string(&report) {
                Ok(body) => response(200, "application/json", body),
                Err(e) => error_response(500, &e.to_string()),
            }
        }
    }
}

/// Lambda handler function
async fn handler(event: LambdaEvent<LambdaFunctionUrlRequest>) -> Result<FunctionUrlResponse, Error> {
    let request = event.payload;

    // Handle CORS preflight
    if request.request_context.http.method.as_deref() == Some("OPTIONS") {
        return Ok(FunctionUrlResponse {
            status_code: 200,
            headers: cors_headers(),
            body: String::new(),
            is_base64_encoded: false,
        });
    }

    if request.is_base64_encoded {
        return Ok(error_response(400, "binary request bodies are not supported"));
    }

    let body = request.body.unwrap_or_else(|| "{}".to_string());
    debug!("calculator request body: {}", body);

    let calculator_request: CalculatorRequest = match serde_json::from_str(&body) {
        Ok(r) => r,
        Err(e) => return Ok(error_response(400, &format!("Invalid JSON: {}", e))),
    };

    Ok(calculate(&calculator_request))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> CalculatorRequest {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_empty_request_uses_defaults() {
        let request = parse("{}");
        assert_eq!(request.redemption_pct, 5);
        assert_eq!(request.growth_pct, 15);
        assert_eq!(request.format, ResponseFormat::Json);
        assert_eq!(request.to_parameters().unwrap(), GrantParameters::default());
    }

    #[test]
    fn test_custom_vesting_overrides_default_years() {
        let request = parse(r#"{"vesting_schedule": {"2026": 6500, "2030": 9500}}"#);
        let params = request.to_parameters().unwrap();

        assert_eq!(params.vesting_schedule.vested_shares(2025), 6_000);
        assert_eq!(params.vesting_schedule.vested_shares(2026), 6_500);
        assert_eq!(params.vesting_schedule.vested_shares(2030), 9_500);
    }

    #[test]
    fn test_json_response() {
        let resp = calculate(&parse(r#"{"redemption_pct": 10, "growth_pct": 20}"#));
        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.headers["Content-Type"], "application/json");

        let body: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(body["rows"].as_array().unwrap().len(), 12);
        assert_eq!(body["parameters"][0], "Redemption Rate: 10%");
        assert_eq!(body["charts"]["growth"]["series"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_csv_response() {
        let resp = calculate(&parse(r#"{"format": "csv"}"#));
        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.headers["Content-Type"], "text/csv");
        assert!(resp.headers["Content-Disposition"].contains("option_redemption_results.csv"));
        assert_eq!(resp.body.lines().count(), 12);
    }

    #[test]
    fn test_invalid_inputs_return_error_message() {
        let resp = calculate(&parse(r#"{"growth_pct": 25}"#));
        assert_eq!(resp.status_code, 400);

        let body: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("An error occurred in the calculation: growth rate"));
        assert_eq!(body["message"], "Please check your inputs and try again.");

        let resp = calculate(&parse(r#"{"vesting_schedule": {"2040": 100}}"#));
        assert_eq!(resp.status_code, 400);
    }

    #[test]
    fn test_vesting_bound_applies_only_to_custom_schedule() {
        let resp = calculate(&parse(r#"{"total_grant_shares": 5000}"#));
        assert_eq!(resp.status_code, 200);
        let body: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(body["rows"].as_array().unwrap().len(), 12);

        let resp = calculate(&parse(
            r#"{"total_grant_shares": 5000, "vesting_schedule": {"2025": 5000}}"#,
        ));
        assert_eq!(resp.status_code, 400);
        let body: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
        assert!(body["error"].as_str().unwrap().contains("2026"));
    }
}
