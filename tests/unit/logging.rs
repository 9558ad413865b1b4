use std::fs::{remove_file, File};

use serde_json::{from_value as json_from_value, json};

use industrial_order::logging::{app_log_event, AppLogContext, AppLogLevel};
use industrial_order::{to_3rdparty_level, AppLoggingCfg};

use crate::ut_basepath;

#[test]
fn init_log_context_ok() {
    let basepath = ut_basepath();
    let log_file_path = "tmp/log/test/industrial_order_unit_test.log";
    let logger_keys = ["should-be-module-path", "another-module-hier"];
    let cfg = {
        let val = json!({
            "handlers" : [
                {"alias": "errlog-file-456", "min_level": "WARNING",
                 "path": log_file_path,  "destination": "localfs"},
                {"alias": "std-output-123",  "min_level": "ERROR",
                 "destination": "console"}
            ],
            "loggers" : [
                {"alias": logger_keys[0],
                 "handlers": ["errlog-file-456", "std-output-123"],
                 "level": "INFO"},
                {"alias": logger_keys[1],
                 "handlers": ["errlog-file-456"] }
            ]
        });
        json_from_value::<AppLoggingCfg>(val).unwrap()
    };
    let actual = AppLogContext::new(&basepath, &cfg);
    for key in logger_keys {
        let result = actual.get_assigner(key);
        assert!(result.is_some());
        let logger = result.unwrap();
        tracing::dispatcher::with_default(logger, || {
            const LVL: tracing::Level = to_3rdparty_level!(AppLogLevel::ERROR);
            tracing::event!(LVL, "invoked by unit test");
        });
    }
    assert!(actual.get_assigner("nonexist-module-path").is_none());
    drop(actual);
    {
        let fullpath = basepath.resolve(log_file_path);
        let result = File::open(fullpath.clone());
        assert!(result.is_ok());
        let f = result.unwrap();
        drop(f);
        let result = remove_file(fullpath);
        assert!(result.is_ok());
    }
} // end of init_log_context_ok

#[test]
fn handler_without_valid_destination_skipped() {
    let cfg = {
        let val = json!({
            "handlers" : [
                {"alias": "file-no-path", "min_level": "INFO", "destination": "localfs"},
                {"alias": "std-output", "min_level": "INFO", "destination": "console"}
            ],
            "loggers" : [
                {"alias": "unittest::logging", "handlers": ["file-no-path", "std-output"]}
            ]
        });
        json_from_value::<AppLoggingCfg>(val).unwrap()
    };
    let logctx = AppLogContext::new(&ut_basepath(), &cfg);
    assert!(logctx.get_assigner("unittest::logging").is_some());
    // the event is dispatched to the logger registered with this module path
    app_log_event!(logctx, AppLogLevel::INFO, "unit test, num:{}", 123);
}
