use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::{
    FormFields, InputError, ResultReport, SimulationInput, SimulationResult, YearTracePoint,
    build_report, contribution_preview, monthly_contribution, render_trace_table, run_projection,
    run_yearly_trace,
};

/// Ages accepted at the boundary. The engine itself clamps anything.
const MAX_AGE: i32 = 150;

#[derive(Parser, Debug)]
#[command(
    name = "retirement-planner",
    about = "Deterministic retirement projection: accumulation, sustainable spending and heritage"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one projection and print the result panel
    Simulate(SimulateArgs),
    /// Serve the JSON API over HTTP
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[arg(long, default_value_t = 10_000.0, help = "Monthly income")]
    pub monthly_income: f64,
    #[arg(long, default_value_t = 20_000.0, help = "Amount already invested")]
    pub current_investments: f64,
    #[arg(long, default_value_t = 1_000_000.0, help = "Net worth goal at retirement")]
    pub target_patrimony: f64,
    #[arg(
        long,
        default_value_t = 20.0,
        help = "Share of income invested every month in percent, e.g. 20"
    )]
    pub invest_percentage: f64,
    #[arg(long, default_value_t = 30)]
    pub current_age: i32,
    #[arg(long, default_value_t = 65)]
    pub retirement_age: i32,
    #[arg(
        long,
        default_value_t = 10.0,
        help = "Expected nominal annual return in percent, compounded monthly"
    )]
    pub annual_return: f64,
    #[arg(long, default_value_t = 5_000.0, help = "Monthly spending once retired")]
    pub monthly_spending_retirement: f64,
    #[arg(long, help = "Print the full response as JSON instead of text")]
    pub json: bool,
    #[arg(long, help = "Append the year-by-year balance table")]
    pub trace: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, env = "RETIREMENT_PLANNER_PORT", default_value_t = 8080)]
    pub port: u16,
    #[arg(long, env = "RETIREMENT_PLANNER_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid parameter: {field} - {message}")]
    Validation { field: &'static str, message: String },

    #[error("Invalid form field: {0}")]
    Form(#[from] InputError),

    #[error("Invalid JSON body: {0}")]
    Body(#[from] JsonRejection),

    #[error("Invalid query string: {0}")]
    Query(#[from] QueryRejection),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found")]
    NotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation { .. }
            | ApiError::Form(_)
            | ApiError::Body(_)
            | ApiError::Query(_) => StatusCode::BAD_REQUEST,
            ApiError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        };
        if status.is_server_error() {
            warn!(error = %self, "request failed");
        } else {
            debug!(error = %self, "request rejected");
        }
        error_response(status, &self.to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    monthly_income: Option<f64>,
    current_investments: Option<f64>,
    target_patrimony: Option<f64>,
    invest_percentage: Option<f64>,
    current_age: Option<i32>,
    retirement_age: Option<i32>,
    annual_return: Option<f64>,
    monthly_spending_retirement: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PreviewPayload {
    monthly_income: Option<f64>,
    invest_percentage: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
    input: SimulationInput,
    result: SimulationResult,
    report: ResultReport,
    yearly_trace: Vec<YearTracePoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PreviewResponse {
    monthly_contribution: f64,
    formatted: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DefaultsResponse {
    input: SimulationInput,
    form: FormFields,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Checks what the engine would silently absorb: non-finite numbers,
/// negative money, returns at or below -100% and ages outside 0..=150.
pub fn build_inputs(inputs: SimulationInput) -> Result<SimulationInput, ApiError> {
    for (field, value) in [
        ("monthlyIncome", inputs.monthly_income),
        ("currentInvestments", inputs.current_investments),
        ("targetPatrimony", inputs.target_patrimony),
        ("investPercentage", inputs.invest_percentage),
        ("monthlySpendingRetirement", inputs.monthly_spending_retirement),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ApiError::Validation {
                field,
                message: "must be a finite number >= 0".to_string(),
            });
        }
    }

    if !inputs.annual_return.is_finite() || inputs.annual_return <= -100.0 {
        return Err(ApiError::Validation {
            field: "annualReturn",
            message: "must be a finite number > -100".to_string(),
        });
    }

    for (field, age) in [
        ("currentAge", inputs.current_age),
        ("retirementAge", inputs.retirement_age),
    ] {
        if !(0..=MAX_AGE).contains(&age) {
            return Err(ApiError::Validation {
                field,
                message: format!("must be between 0 and {MAX_AGE}"),
            });
        }
    }

    Ok(inputs)
}

impl From<&SimulateArgs> for SimulationInput {
    fn from(args: &SimulateArgs) -> Self {
        SimulationInput {
            monthly_income: args.monthly_income,
            current_investments: args.current_investments,
            target_patrimony: args.target_patrimony,
            invest_percentage: args.invest_percentage,
            current_age: args.current_age,
            retirement_age: args.retirement_age,
            annual_return: args.annual_return,
            monthly_spending_retirement: args.monthly_spending_retirement,
        }
    }
}

/// Output of the `simulate` subcommand: the result panel as text, or the
/// same body the HTTP API returns when `--json` is set.
pub fn run_cli_simulation(args: &SimulateArgs) -> Result<String, ApiError> {
    let inputs = build_inputs(SimulationInput::from(args))?;
    let response = simulate(inputs);
    info!(
        total_accumulated = response.result.total_accumulated,
        heritage = response.result.heritage,
        goal_met = response.result.is_goal_met,
        "projection finished"
    );

    if args.json {
        return Ok(serde_json::to_string_pretty(&response)?);
    }

    let mut out = response.report.to_string();
    if args.trace {
        out.push_str("\n\n");
        out.push_str(&render_trace_table(&response.yearly_trace));
    }
    Ok(out)
}

pub fn router() -> Router {
    Router::new()
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .route("/api/form", post(form_handler))
        .route(
            "/api/preview",
            get(preview_get_handler).post(preview_post_handler),
        )
        .route("/api/defaults", get(defaults_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "retirement planner HTTP API listening");
    axum::serve(listener, router()).await
}

async fn simulate_get_handler(
    payload: Result<Query<SimulatePayload>, QueryRejection>,
) -> Response {
    simulate_handler_impl(payload.map(|Query(p)| p).map_err(ApiError::from))
}

async fn simulate_post_handler(payload: Result<Json<SimulatePayload>, JsonRejection>) -> Response {
    simulate_handler_impl(payload.map(|Json(p)| p).map_err(ApiError::from))
}

fn simulate_handler_impl(payload: Result<SimulatePayload, ApiError>) -> Response {
    match payload.and_then(inputs_from_payload) {
        Ok(inputs) => json_response(StatusCode::OK, simulate(inputs)),
        Err(err) => err.into_response(),
    }
}

async fn form_handler(fields: Result<Json<FormFields>, JsonRejection>) -> Response {
    let inputs = fields.map_err(ApiError::from).and_then(|Json(fields)| {
        fields.parse().map_err(ApiError::from).and_then(build_inputs)
    });
    let inputs = match inputs {
        Ok(inputs) => inputs,
        Err(err) => return err.into_response(),
    };
    json_response(StatusCode::OK, simulate(inputs))
}

async fn preview_get_handler(payload: Result<Query<PreviewPayload>, QueryRejection>) -> Response {
    preview_handler_impl(payload.map(|Query(p)| p).map_err(ApiError::from))
}

async fn preview_post_handler(payload: Result<Json<PreviewPayload>, JsonRejection>) -> Response {
    preview_handler_impl(payload.map(|Json(p)| p).map_err(ApiError::from))
}

fn preview_handler_impl(payload: Result<PreviewPayload, ApiError>) -> Response {
    let payload = match payload {
        Ok(payload) => payload,
        Err(err) => return err.into_response(),
    };
    let inputs = SimulationInput {
        monthly_income: payload.monthly_income.unwrap_or(0.0),
        invest_percentage: payload.invest_percentage.unwrap_or(0.0),
        ..SimulationInput::default()
    };
    let inputs = match build_inputs(inputs) {
        Ok(inputs) => inputs,
        Err(err) => return err.into_response(),
    };
    json_response(
        StatusCode::OK,
        PreviewResponse {
            monthly_contribution: monthly_contribution(
                inputs.monthly_income,
                inputs.invest_percentage,
            ),
            formatted: contribution_preview(&inputs),
        },
    )
}

async fn defaults_handler() -> Response {
    let input = SimulationInput::initial();
    json_response(
        StatusCode::OK,
        DefaultsResponse {
            form: FormFields::from_input(&input),
            input,
        },
    )
}

async fn not_found_handler() -> Response {
    ApiError::NotFound.into_response()
}

/// Missing fields are zero, the same as a cleared form field.
fn inputs_from_payload(payload: SimulatePayload) -> Result<SimulationInput, ApiError> {
    let mut inputs = SimulationInput::default();

    if let Some(v) = payload.monthly_income {
        inputs.monthly_income = v;
    }
    if let Some(v) = payload.current_investments {
        inputs.current_investments = v;
    }
    if let Some(v) = payload.target_patrimony {
        inputs.target_patrimony = v;
    }
    if let Some(v) = payload.invest_percentage {
        inputs.invest_percentage = v;
    }
    if let Some(v) = payload.current_age {
        inputs.current_age = v;
    }
    if let Some(v) = payload.retirement_age {
        inputs.retirement_age = v;
    }
    if let Some(v) = payload.annual_return {
        inputs.annual_return = v;
    }
    if let Some(v) = payload.monthly_spending_retirement {
        inputs.monthly_spending_retirement = v;
    }

    build_inputs(inputs)
}

fn simulate(inputs: SimulationInput) -> SimulateResponse {
    let result = run_projection(&inputs);
    SimulateResponse {
        input: inputs,
        report: build_report(&inputs, &result),
        yearly_trace: run_yearly_trace(&inputs),
        result,
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
