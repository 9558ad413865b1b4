use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::env;
use std::process;
use std::sync::Arc;

use tokio::runtime::Builder as RuntimeBuilder;

use industrial_order::api::web::route_table;
use industrial_order::constant::env_vars::EXPECTED_LABELS;
use industrial_order::logging::{app_log_event, AppLogContext, AppLogLevel};
use industrial_order::network::{app_web_service, apply_middlewares, net_listener, static_assets};
use industrial_order::{AppConfig, AppSharedState};

async fn shutdown_signal(shr_state: AppSharedState) {
    let log_ctx_p = shr_state.log_context().clone();
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            app_log_event!(log_ctx_p, AppLogLevel::ERROR, "ctrl-c handler error, {e}");
        }
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                app_log_event!(log_ctx_p, AppLogLevel::ERROR, "sigterm handler error, {e}");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    app_log_event!(log_ctx_p, AppLogLevel::WARNING, "API server shutting down");
}

// return false if schema of any database cannot be created
async fn bootstrap_schema(shr_state: &AppSharedState) -> bool {
    let log_ctx_p = shr_state.log_context().clone();
    let ds = shr_state.datastore();
    let dbs = match ds.sql_dbs.as_ref() {
        Some(v) => v,
        None => {
            return true;
        }
    };
    for db in dbs {
        if let Err(e) = db.ensure_schema().await {
            app_log_event!(
                log_ctx_p,
                AppLogLevel::FATAL,
                "failed to initialize database schema, alias:{}, reason:{e}",
                db.alias
            );
            return false;
        }
        app_log_event!(
            log_ctx_p,
            AppLogLevel::INFO,
            "database schema ready, alias:{}",
            db.alias
        );
    }
    true
} // end of fn bootstrap_schema

async fn start_server(shr_state: AppSharedState) -> bool {
    if !bootstrap_schema(&shr_state).await {
        return false;
    }
    let log_ctx_p = shr_state.log_context().clone();
    let cfg = shr_state.config().clone();
    let routes = route_table();
    let listener = &cfg.api_server.listen;
    let (service, num_applied) = app_web_service(listener, routes, shr_state.clone());
    if num_applied == 0 {
        app_log_event!(
            log_ctx_p,
            AppLogLevel::ERROR,
            "no route created, web API server failed to start"
        );
        return false;
    }
    let asset_path = cfg.basepath.resolve(cfg.api_server.static_assets.as_str());
    let service = static_assets(service, asset_path);
    let service = match apply_middlewares(service, &cfg.api_server) {
        Ok(s) => s,
        Err(e) => {
            app_log_event!(log_ctx_p, AppLogLevel::ERROR, "middleware init error, {e}");
            return false;
        }
    };
    match net_listener(listener.host.clone(), listener.port).await {
        Ok(b) => {
            app_log_event!(
                log_ctx_p,
                AppLogLevel::INFO,
                "API server listening, host:{}, port:{}, num-routes:{}",
                listener.host,
                listener.port,
                num_applied
            );
            let result = axum::serve(b, service.into_make_service())
                .with_graceful_shutdown(shutdown_signal(shr_state))
                .await;
            app_log_event!(log_ctx_p, AppLogLevel::WARNING, "API server terminating");
            if let Err(e) = result {
                app_log_event!(log_ctx_p, AppLogLevel::ERROR, "API server error, {e}");
                false
            } else {
                true
            }
        }
        Err(e) => {
            app_log_event!(
                log_ctx_p,
                AppLogLevel::ERROR,
                "API server failed to start, {}",
                e
            );
            false
        }
    }
} // end of fn start_server

// log writers are flushed when the log context is dropped, the caller
// determines exit status after this function returns
fn start_async_runtime(cfg: AppConfig) -> bool {
    let log_ctx = Arc::new(AppLogContext::new(&cfg.basepath, &cfg.api_server.logging));
    let log_ctx2 = log_ctx.clone();
    let log_ctx3 = log_ctx.clone();
    let stack_nbytes: usize = (cfg.api_server.stack_sz_kb as usize) << 10;
    let result = RuntimeBuilder::new_multi_thread()
        .worker_threads(cfg.api_server.num_workers as usize)
        .on_thread_start(move || {
            // this closure is invoked by every new worker thread
            let log_cpy = log_ctx2.clone();
            app_log_event!(log_cpy, AppLogLevel::DEBUG, "[API server] worker started");
        })
        .on_thread_stop(move || {
            let log_cpy = log_ctx3.clone();
            app_log_event!(log_cpy, AppLogLevel::DEBUG, "[API server] worker terminating");
        })
        .thread_stack_size(stack_nbytes)
        .thread_name("web-api-worker")
        .enable_io()
        .enable_time()
        .build();
    match result {
        Ok(rt) => rt.block_on(async move {
            let shr_state = AppSharedState::new(cfg, log_ctx);
            start_server(shr_state).await
        }),
        Err(e) => {
            app_log_event!(
                log_ctx,
                AppLogLevel::ERROR,
                "async runtime failed to build, {}",
                e
            );
            false
        }
    }
} // end of fn start_async_runtime

fn main() {
    let iter = env::vars().filter(|(k, _v)| EXPECTED_LABELS.contains(&k.as_str()));
    let arg_map: HashMap<String, String, RandomState> = HashMap::from_iter(iter);
    match AppConfig::new(arg_map) {
        Ok(cfg) => {
            if !start_async_runtime(cfg) {
                process::exit(1);
            }
        }
        Err(e) => {
            println!("app failed to configure, error code: {} ", e);
            process::exit(1);
        }
    };
} // end of main
