//! HTTP access to the prediction service.
//!
//! One POST per submission, no retry, transport-default timeout. Native
//! builds block on a worker thread; the browser build goes through the
//! fetch API. Errors split into transport, service-reported, and
//! malformed-body cases so the UI can pick the right message.

use thiserror::Error;

use crate::prediction::{ErrorBody, OrbitData, PredictionRequest, PredictionResult, WirePrediction};

pub const GENERIC_FETCH_ERROR: &str =
    "Failed to fetch prediction data. Ensure the backend is running.";
pub const GENERIC_PARSE_ERROR: &str =
    "Received an unexpected response from the prediction service.";

pub type FetchOutcome = Result<(PredictionResult, OrbitData), PredictionError>;

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("transport: {0}")]
    Transport(String),
    #[error("service returned HTTP {status}")]
    Service { status: u16, detail: Option<String> },
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl PredictionError {
    /// The message shown in the error panel. A service-supplied detail is
    /// used verbatim; everything else falls back to a generic message.
    pub fn display_message(&self) -> String {
        match self {
            Self::Service { detail: Some(detail), .. } => detail.clone(),
            Self::Service { detail: None, .. } | Self::Transport(_) => {
                GENERIC_FETCH_ERROR.to_string()
            }
            Self::Malformed(_) => GENERIC_PARSE_ERROR.to_string(),
        }
    }
}

pub fn predict_url(base_url: &str) -> String {
    format!("{}/predict_collision", base_url.trim_end_matches('/'))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn fetch_prediction(base_url: &str, request: &PredictionRequest) -> FetchOutcome {
    let url = predict_url(base_url);
    tracing::info!(%url, id1 = %request.norad_id_1, id2 = %request.norad_id_2, "requesting prediction");

    match ureq::post(&url).send_json(request) {
        Ok(response) => {
            let wire: WirePrediction = response
                .into_json()
                .map_err(|e| PredictionError::Malformed(e.to_string()))?;
            wire.into_parts().map_err(PredictionError::Malformed)
        }
        Err(ureq::Error::Status(status, response)) => {
            let detail = response
                .into_json::<ErrorBody>()
                .ok()
                .and_then(|body| body.detail);
            Err(PredictionError::Service { status, detail })
        }
        Err(err) => Err(PredictionError::Transport(err.to_string())),
    }
}

#[cfg(target_arch = "wasm32")]
pub async fn fetch_prediction(base_url: &str, request: &PredictionRequest) -> FetchOutcome {
    use wasm_bindgen::JsCast as _;
    use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

    let url = predict_url(base_url);
    let body = serde_json::to_string(request)
        .map_err(|e| PredictionError::Malformed(e.to_string()))?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&wasm_bindgen::JsValue::from_str(&body));

    let headers = Headers::new().map_err(|e| PredictionError::Transport(format!("{e:?}")))?;
    headers
        .set("Content-Type", "application/json")
        .map_err(|e| PredictionError::Transport(format!("{e:?}")))?;
    opts.set_headers(&headers);

    let http_request = Request::new_with_str_and_init(&url, &opts)
        .map_err(|e| PredictionError::Transport(format!("{e:?}")))?;

    let window = web_sys::window()
        .ok_or_else(|| PredictionError::Transport("no window".to_string()))?;
    let resp_value = wasm_bindgen_futures::JsFuture::from(window.fetch_with_request(&http_request))
        .await
        .map_err(|e| PredictionError::Transport(format!("{e:?}")))?;
    let response: Response = resp_value
        .dyn_into()
        .map_err(|_| PredictionError::Transport("response is not a Response".to_string()))?;

    let text_promise = response
        .text()
        .map_err(|e| PredictionError::Transport(format!("{e:?}")))?;
    let text = wasm_bindgen_futures::JsFuture::from(text_promise)
        .await
        .map_err(|e| PredictionError::Transport(format!("{e:?}")))?
        .as_string()
        .unwrap_or_default();

    if !response.ok() {
        let detail = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.detail);
        return Err(PredictionError::Service { status: response.status(), detail });
    }

    let wire: WirePrediction =
        serde_json::from_str(&text).map_err(|e| PredictionError::Malformed(e.to_string()))?;
    wire.into_parts().map_err(PredictionError::Malformed)
}
