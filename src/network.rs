use std::io::ErrorKind;
use std::net::ToSocketAddrs;
use std::result::Result as DefaultResult;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::api::web::{ApiRouteTableType, ApiRouteType};
use crate::error::{AppError, AppErrorCode};
use crate::{ApiServerCfg, AppSharedState, WebApiListenCfg, WebApiRouteCfg};

pub type WebServiceRoute = Router<()>;

/// mount every configured route whose handler label exists in the route
/// table, all of them nested under the API base path. Return the router
/// and number of routes mounted
pub fn app_web_service(
    cfg: &WebApiListenCfg,
    rtable: ApiRouteTableType,
    shr_state: AppSharedState,
) -> (WebServiceRoute, u16) {
    let mounted = cfg
        .routes
        .iter()
        .filter_map(|r: &WebApiRouteCfg| {
            rtable
                .get(r.handler.as_str())
                .map(|hdlr: &ApiRouteType| (r.path.as_str(), hdlr.clone()))
        })
        .collect::<Vec<_>>();
    let num_applied = mounted.len() as u16;
    // several paths are allowed to share the same handler
    let api_router = mounted
        .into_iter()
        .fold(Router::<AppSharedState>::new(), |rt, (path, hdlr)| {
            rt.route(path, hdlr)
        });
    let router = if num_applied > 0 {
        let base = format!("/{}", cfg.api_base);
        Router::new().nest(base.as_str(), api_router)
    } else {
        api_router
    };
    // the router becomes a service only after the state is provided
    (router.with_state(shr_state), num_applied)
} // end of fn app_web_service

/// requests not matching any API route are served from the static asset
/// folder
pub fn static_assets(router: WebServiceRoute, fullpath: String) -> WebServiceRoute {
    router.fallback_service(ServeDir::new(fullpath))
}

pub fn apply_middlewares(
    router: WebServiceRoute,
    cfg: &ApiServerCfg,
) -> DefaultResult<WebServiceRoute, AppError> {
    let co = middleware::cors(cfg.listen.cors.as_ref())?;
    let reqlm = middleware::req_body_limit(cfg.limit_req_body_in_bytes);
    let connlm = middleware::concurrency_limit(cfg.listen.max_connections);
    // the layer added last is the outermost one, the concurrency limit
    // shares one semaphore among all routes
    let router = router.layer(reqlm).layer(co).layer(connlm);
    Ok(router)
}

pub mod middleware {
    use std::str::FromStr;
    use std::time::Duration;

    use axum::http;
    use tower::limit::GlobalConcurrencyLimitLayer;
    use tower_http::cors::{AllowOrigin, CorsLayer};
    use tower_http::limit::RequestBodyLimitLayer;

    use super::{AppError, AppErrorCode, DefaultResult};
    use crate::AppCorsCfg;

    /// excess requests wait in queue until any of running requests
    /// completes, regardless of the routes they are sent to
    pub fn concurrency_limit(max_conn: u32) -> GlobalConcurrencyLimitLayer {
        GlobalConcurrencyLimitLayer::new(max_conn as usize)
    }

    pub fn req_body_limit(limit: usize) -> RequestBodyLimitLayer {
        RequestBodyLimitLayer::new(limit)
    }

    pub fn cors(cfg: Option<&AppCorsCfg>) -> DefaultResult<CorsLayer, AppError> {
        let val = match cfg {
            Some(v) => v,
            None => {
                return Ok(CorsLayer::permissive());
            }
        };
        let methods = val
            .allowed_methods
            .iter()
            .filter_map(|m| http::Method::from_bytes(m.as_bytes()).ok())
            .collect::<Vec<http::Method>>();
        if val.allowed_methods.len() > methods.len() {
            return Err(AppError {
                detail: Some("invalid-allowed-method".to_string()),
                code: AppErrorCode::InvalidInput,
            });
        }
        let headers = val
            .allowed_headers
            .iter()
            .filter_map(|h| http::HeaderName::from_str(h.as_str()).ok())
            .collect::<Vec<http::HeaderName>>();
        if val.allowed_headers.len() > headers.len() {
            return Err(AppError {
                detail: Some("invalid-allowed-header".to_string()),
                code: AppErrorCode::InvalidInput,
            });
        }
        let any_origin =
            val.allowed_origins.is_empty() || val.allowed_origins.iter().any(|o| o == "*");
        let origin = if any_origin {
            AllowOrigin::any()
        } else {
            let origins = val
                .allowed_origins
                .iter()
                .map(|o| {
                    o.parse::<http::HeaderValue>().map_err(|e| AppError {
                        detail: Some(format!("invalid-origin-header: {}", e)),
                        code: AppErrorCode::InvalidInput,
                    })
                })
                .collect::<DefaultResult<Vec<_>, AppError>>()?;
            AllowOrigin::list(origins)
        };
        let co = CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(methods)
            .allow_headers(headers)
            .max_age(Duration::from_secs(val.preflight_max_age));
        Ok(co)
    } // end of fn cors
} // end of inner-module middleware

/// bind to the first resolved address of the host which is available,
/// host without port number is resolved with port zero
pub async fn net_listener(host: String, port: u16) -> DefaultResult<TcpListener, AppError> {
    let resolvable = if host.contains(':') {
        host
    } else {
        format!("{host}:0")
    };
    let addrs = resolvable.to_socket_addrs().map_err(|e| AppError {
        code: AppErrorCode::IOerror(ErrorKind::AddrNotAvailable),
        detail: Some(format!("{e}, host:{resolvable}")),
    })?;
    for mut addr in addrs {
        addr.set_port(port);
        if let Ok(lsnr) = TcpListener::bind(addr).await {
            return Ok(lsnr);
        }
    }
    Err(AppError {
        code: AppErrorCode::IOerror(ErrorKind::AddrInUse),
        detail: Some(format!("no address available, host:{resolvable}, port:{port}")),
    })
} // end of fn net_listener
