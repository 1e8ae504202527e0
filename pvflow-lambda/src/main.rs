use lambda_http::{run, service_fn, tracing, Body, Error, Request, RequestExt, Response};
use pvflow::output::SinkOutput;
use pvflow::{run_project, FlowRunResults, ProjectFlags};
use serde_json::json;
use uuid::Uuid;

async fn function_handler(event: Request) -> Result<Response<Body>, Error> {
    let input = match event.body() {
        Body::Empty => &[][..],
        Body::Text(text) => text.as_bytes(),
        Body::Binary(bytes) => bytes.as_slice(),
    };

    let flags = match event.query_string_parameters().first("strict") {
        Some("true") | Some("1") => ProjectFlags::STRICT_VALIDATION,
        _ => ProjectFlags::empty(),
    };

    let resp = match run_project(input, SinkOutput, None, &flags) {
        Ok(FlowRunResults { result, report, .. }) => Response::builder()
            .status(200)
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&json!({
                "data": result,
                "meta": {"errors": report.errors, "warnings": report.warnings}
            }))?))
            .map_err(Box::new)?,
        Err(e) => {
            tracing::warn!("Rejected request: {e}");
            Response::builder()
                .status(422)
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&json!({"errors": [{"id": Uuid::new_v4(), "status": "422", "detail": e.to_string()}]}))?))
                .map_err(Box::new)?
        }
    };

    Ok(resp)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    run(service_fn(function_handler)).await
}
