//! Tolerant JSON extraction from model output.
//!
//! Models wrap JSON in markdown fences or prose despite instructions, and
//! occasionally emit trailing commas. Extraction peels the wrapping; the
//! repair pass only runs if the first parse fails, and the original parse
//! error is the one reported.

/// Slice out the JSON payload: fenced ```json block first, then any fenced
/// block, then the widest brace window, then the trimmed input itself.
pub fn extract_json_block(response: &str) -> &str {
    if let Some(start) = response.find("```json") {
        let rest = &response[start + 7..];
        if let Some(end) = rest.find("```") {
            return rest[..end].trim();
        }
    }
    if let Some(start) = response.find("```") {
        let rest = &response[start + 3..];
        if let Some(end) = rest.find("```") {
            return rest[..end].trim();
        }
    }
    if let (Some(s), Some(e)) = (response.find('{'), response.rfind('}')) {
        if s < e {
            return response[s..=e].trim();
        }
    }
    response.trim()
}

/// Remove commas that directly precede a closing brace or bracket, outside
/// string literals.
pub fn strip_trailing_commas(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_string = false;
    let mut escaped = false;
    for c in raw.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '}' | ']' => {
                let trimmed_len = out.trim_end().len();
                if out[..trimmed_len].ends_with(',') {
                    out.truncate(trimmed_len - 1);
                }
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Parse model output into a JSON value, repairing trailing commas on a
/// failed first parse.
pub fn parse_model_json(response: &str) -> Result<serde_json::Value, serde_json::Error> {
    let block = extract_json_block(response);
    match serde_json::from_str(block) {
        Ok(value) => Ok(value),
        Err(first_err) => {
            let repaired = strip_trailing_commas(block);
            serde_json::from_str(&repaired).map_err(|_| first_err)
        }
    }
}
