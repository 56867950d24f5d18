//! AWS Lambda handler exposing the projection engine over HTTP
//!
//! Accepts JSON goal records or simulator parameters and returns annotated
//! goals, trajectories and scenario comparisons.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use serde::{Deserialize, Serialize};

use goal_projection::projection::Trajectory;
use goal_projection::scenario::ScenarioOutcome;
use goal_projection::{
    Clock, ContributionOutcome, FixedClock, GoalEnvelope, GoalRecord, GoalSnapshot, GoalStatus,
    ProjectionConfig, ProjectionEngine, ProjectionError, ScenarioRunner, SimulationParams,
    SystemClock,
};

/// Body for `/goals/contribution`
#[derive(Debug, Deserialize)]
pub struct ContributionRequest {
    pub goal: GoalRecord,
    pub amount: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionResponse {
    #[serde(flatten)]
    pub outcome: ContributionOutcome,
    pub status: GoalStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryResponse {
    pub months_remaining: u32,
    pub trajectory: Trajectory,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub scenarios: Vec<ScenarioOutcome>,
}

fn error_response(status: u16, message: &str) -> Result<Response<Body>, Error> {
    let body = serde_json::json!({ "error": message });
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::Text(body.to_string()))?)
}

fn json_response<T: Serialize>(body: &T) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Body::Text(serde_json::to_string(body)?))?)
}

fn parse_body<T: for<'de> Deserialize<'de>>(event: &Request) -> Result<T, String> {
    let body_str = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    };
    serde_json::from_str(&body_str).map_err(|e| format!("Invalid JSON: {}", e))
}

fn goal_from(record: GoalRecord) -> Result<GoalSnapshot, ProjectionError> {
    GoalSnapshot::try_from(record)
}

/// Route a request to the engine; engine errors become 400s
fn route<C: Clock>(
    event: &Request,
    engine: &ProjectionEngine<C>,
) -> Result<Response<Body>, Error> {
    let runner = ScenarioRunner::with_config(engine.config().clone());

    macro_rules! body {
        ($ty:ty) => {
            match parse_body::<$ty>(event) {
                Ok(parsed) => parsed,
                Err(message) => return error_response(400, &message),
            }
        };
    }

    macro_rules! engine_call {
        ($expr:expr) => {
            match $expr {
                Ok(value) => value,
                Err(e) => {
                    log::info!("rejected request to {}: {}", event.uri().path(), e);
                    return error_response(400, &e.to_string());
                }
            }
        };
    }

    match event.uri().path() {
        "/goals/annotate" => {
            let goal = engine_call!(goal_from(body!(GoalRecord)));
            let annotated = engine_call!(engine.annotate(&goal));
            json_response(&GoalEnvelope::from(annotated))
        }
        "/goals/trajectory" => {
            let goal = engine_call!(goal_from(body!(GoalRecord)));
            let trajectory = engine_call!(engine.trajectory(&goal));
            json_response(&TrajectoryResponse {
                months_remaining: trajectory.summary().months,
                trajectory,
            })
        }
        "/goals/contribution" => {
            let request = body!(ContributionRequest);
            let goal = engine_call!(goal_from(request.goal));
            let outcome = engine_call!(engine.apply_contribution(&goal, request.amount));
            json_response(&ContributionResponse {
                status: outcome.next_status(goal.status),
                outcome,
            })
        }
        "/simulate" => {
            let params = body!(SimulationParams);
            json_response(&engine_call!(runner.simulate(&params)))
        }
        "/compare" => {
            let params = body!(SimulationParams);
            json_response(&CompareResponse {
                scenarios: engine_call!(runner.compare_profiles(&params)),
            })
        }
        other => error_response(404, &format!("Unknown route: {}", other)),
    }
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
    // Handle CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(Response::builder()
            .status(200)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "POST, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Body::Empty)?);
    }

    if event.method().as_str() != "POST" {
        return error_response(405, "Only POST is supported");
    }

    // One clock reading per request
    let engine = ProjectionEngine::new(ProjectionConfig::default(), FixedClock(SystemClock.now()));
    route(&event, &engine)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
