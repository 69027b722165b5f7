use serde_json::Value;
use textgen_rust::{
    Result,
    generator::ModelLoader,
    service::{ServiceLoop, Termination},
};

/// Output of one service run
pub struct ServiceRun {
    pub termination: Termination,
    pub lines: Vec<Value>,
    /// Bytes of input left unread when the service stopped
    pub unread: usize,
}

/// Run the service loop over in-memory input and collect every output line
pub async fn run_service(loader: &dyn ModelLoader, input: &str) -> Result<ServiceRun> {
    let mut remaining = input.as_bytes();
    let mut output = Vec::new();

    let termination = ServiceLoop::new(&mut remaining, &mut output)
        .run(loader)
        .await?;

    Ok(ServiceRun {
        termination,
        lines: decode_lines(&output),
        unread: remaining.len(),
    })
}

/// Decode newline-delimited JSON output, asserting each line is an object
/// with exactly one of `result` / `error`.
pub fn decode_lines(output: &[u8]) -> Vec<Value> {
    let text = String::from_utf8(output.to_vec()).expect("output is not UTF-8");
    assert!(
        text.is_empty() || text.ends_with('\n'),
        "output must end with a newline: {:?}",
        text
    );

    text.lines()
        .map(|line| {
            let value: Value = serde_json::from_str(line).expect("output line is not JSON");
            let object = value.as_object().expect("output line is not an object");
            assert_eq!(object.len(), 1, "unexpected fields in {}", line);
            assert!(
                object.contains_key("result") || object.contains_key("error"),
                "unexpected response shape: {}",
                line
            );
            value
        })
        .collect()
}

/// Build newline-delimited request input from prompts
pub fn prompt_lines(prompts: &[&str]) -> String {
    prompts
        .iter()
        .map(|prompt| format!("{}\n", serde_json::json!({ "prompt": prompt })))
        .collect()
}

pub fn result_of(line: &Value) -> Option<&str> {
    line.get("result").and_then(Value::as_str)
}

pub fn error_of(line: &Value) -> Option<&str> {
    line.get("error").and_then(Value::as_str)
}
