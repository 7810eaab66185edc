use crate::dispatcher::{HandlerResult, Response, RouteRequest};
use http::StatusCode;
use serde_json::json;

// Example handler: echoes back what the router extracted
pub fn echo_handler(res: &mut Response, req: &RouteRequest) -> HandlerResult {
    res.json(
        StatusCode::OK,
        &json!({
            "request_id": req.request_id(),
            "route_slot": req.route_slot(),
            "pattern": req.pattern(),
            "method": req.method().as_str(),
            "path": req.uri().path(),
            "params": req.params(),
            "named_params": req.named_params_map(),
        }),
    );
    Ok(())
}
