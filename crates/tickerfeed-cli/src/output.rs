use std::io::{self, Write};

use serde_json::Value;

use crate::error::CliError;

/// Write `data` to stdout as a single JSON document.
pub fn render(data: &Value, pretty: bool) -> Result<(), CliError> {
    let rendered = to_json(data, pretty)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    Ok(())
}

fn to_json(data: &Value, pretty: bool) -> Result<String, CliError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(data)?
    } else {
        serde_json::to_string(data)?
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn compact_and_pretty_render_same_document() {
        let data = json!({ "meta": { "symbol": "IBM" }, "rows": [] });

        let compact = to_json(&data, false).expect("serializable");
        let pretty = to_json(&data, true).expect("serializable");

        assert_eq!(compact, r#"{"meta":{"symbol":"IBM"},"rows":[]}"#);
        assert!(pretty.contains('\n'));
        assert_eq!(serde_json::from_str::<Value>(&pretty).expect("valid json"), data);
    }
}
