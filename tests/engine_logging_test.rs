/// Logging setup driven from the environment, and the engine's `log` records
/// arriving in the capture sink through the `log` → `tracing` bridge.
///
/// Kept in its own test binary: it installs the global subscriber and sets
/// process environment variables.

#[cfg(test)]
mod tests {
    use curry_engine::functional::prelude::*;
    use curry_engine::utils::engine_logger::{init_logging, LogFormat, LoggingConfig};
    use curry_engine::{Function, Receiver, Value};
    use std::env;

    fn sum_bar() -> Function {
        Function::new("sumBar", 3, |inv| {
            Ok(Value::from(
                inv.arg(0).to_number()?
                    + inv.arg(1).to_number()?
                    + inv.arg(2).to_number()?
                    + inv.this()?.get("bar").to_number()?,
            ))
        })
    }

    fn message(line: &str) -> String {
        let parsed: serde_json::Value = serde_json::from_str(line).expect("json log line");
        parsed["message"].as_str().unwrap_or_default().to_string()
    }

    #[test]
    fn test_engine_events_reach_the_capture_sink() {
        env::set_var("CURRY_LOG_FORMAT", "json");
        env::set_var("RUST_LOG", "curry_engine=trace");
        env::set_var("CURRY_LOG_CAPACITY", "512");

        let config = LoggingConfig::from_env();
        assert_eq!(
            config,
            LoggingConfig {
                format: LogFormat::Json,
                filter: "curry_engine=trace".to_string(),
                capture_capacity: 512,
            }
        );

        let sink = init_logging(&config).unwrap();
        assert_eq!(sink.capacity(), 512);
        let again = init_logging(&LoggingConfig::default()).unwrap();
        assert_eq!(again.capacity(), 512);
        sink.drain();

        let method = object_curry(&sum_bar()).unwrap();
        let obj = Receiver::from_properties([("bar", 1.0)]);
        let partial = method.call(Some(&obj), &[1.into()]).unwrap();
        assert_eq!(
            partial.apply(&[2.into(), 3.into(), 4.into()]).unwrap(),
            Value::from(7)
        );

        let messages: Vec<String> = sink.drain().iter().map(|line| message(line)).collect();
        assert!(
            messages
                .iter()
                .any(|m| m == "capturing receiver for object-curried chain"),
            "no capture event in {:?}",
            messages
        );
        assert!(
            messages
                .iter()
                .any(|m| m == "`sumBar` takes 2 argument(s); discarding 1 extra"),
            "no truncation event in {:?}",
            messages
        );
    }
}
