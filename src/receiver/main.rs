use lambda_http::http::{Method, StatusCode};
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use tracing::{debug, error, info};

mod config;
mod flip;
mod slack;
mod types;

use config::Config;
use types::{ResponseType, SlackResponse};

fn empty_response(status: StatusCode) -> Result<Response<Body>, Error> {
    Ok(Response::builder().status(status).body(Body::Empty)?)
}

async fn function_handler(config: &Config, event: Request) -> Result<Response<Body>, Error> {
    if event.method() != Method::POST || !event.uri().path().ends_with("/slack") {
        return empty_response(StatusCode::NOT_FOUND);
    }
    let body: &[u8] = event.body().as_ref();

    // Verify Slack signature
    if let Some(signing_secret) = &config.signing_secret {
        let header = |name: &str| {
            event
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
        };
        let slack_timestamp = header("X-Slack-Request-Timestamp");
        let slack_signature = header("X-Slack-Signature");

        if let Err(e) = slack::verify_slack_signature(signing_secret, body, slack_timestamp, slack_signature) {
            error!(error = %e, "rejecting unsigned request");
            return Ok(Response::builder()
                .status(StatusCode::UNAUTHORIZED)
                .header("Content-Type", "text/plain")
                .body(Body::from("Unauthorized"))?);
        }
    }

    // Parse form data
    let command = match slack::parse_command(body) {
        Ok(command) => command,
        Err(e) => {
            error!(error = %e, "error parsing form");
            return empty_response(StatusCode::NOT_FOUND);
        }
    };

    if let Err(e) = slack::validate_command(config, &command) {
        error!(error = %e, "command validation failed");
        if config.strict_auth {
            return empty_response(StatusCode::FORBIDDEN);
        }
    }
    info!(trigger_word = %command.trigger_word, text = %command.text, "flipping");

    let response = SlackResponse {
        response_type: ResponseType::InChannel,
        text: flip::render(&command.text, &config.trigger_word),
    };
    debug!(?response, "payload");

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(&response)?))?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .without_time()
        .init();

    let config = Config::from_env()?;
    debug!(
        tokens = config.allowed_tokens.len(),
        trigger_word = %config.trigger_word,
        strict_auth = config.strict_auth,
        signed = config.signing_secret.is_some(),
        "loaded configuration"
    );

    let config = &config;
    run(service_fn(move |event: Request| async move {
        function_handler(config, event).await
    }))
    .await
}
