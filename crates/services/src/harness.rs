//! The evaluation harness: wraps learner code so that printed output and
//! runtime errors both come back as one string.

/// Prefix the harness puts in front of a trapped runtime error.
pub const ERROR_MARKER: &str = "Error:";

/// Wrap `code` in an R expression that parses it, evaluates every top-level
/// expression in the global environment, prints visible values, and returns
/// the captured output as a single string. A runtime error turns into
/// `"Error: <message>"` instead of escaping.
#[must_use]
pub fn wrap_source(code: &str) -> String {
    // A JSON string literal is also a valid R string literal.
    let literal = serde_json::Value::String(code.to_owned()).to_string();
    format!(
        r#"tryCatch({{
  .rzero_lines <- capture.output({{
    .rzero_exprs <- parse(text = {literal})
    for (.rzero_i in seq_along(.rzero_exprs)) {{
      .rzero_res <- withVisible(eval(.rzero_exprs[[.rzero_i]], envir = globalenv()))
      if (.rzero_res$visible) print(.rzero_res$value)
    }}
  }}, type = "output")
  paste(.rzero_lines, collapse = "\n")
}}, error = function(e) paste("{ERROR_MARKER}", conditionMessage(e)))"#
    )
}

/// Text returned by one harness-wrapped evaluation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Evaluation {
    text: String,
}

impl Evaluation {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// True when the harness trapped a runtime error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.text.starts_with(ERROR_MARKER)
    }

    /// True when there is nothing worth logging.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_source_embeds_code_as_escaped_literal() {
        let wrapped = wrap_source("print(\"hi\")\nx <- 1");
        assert!(wrapped.contains(r#"parse(text = "print(\"hi\")\nx <- 1")"#), "{wrapped}");
        assert!(wrapped.starts_with("tryCatch({"));
        assert!(wrapped.contains(r#"paste("Error:", conditionMessage(e))"#));
    }

    #[test]
    fn wrap_source_escapes_backslashes() {
        let wrapped = wrap_source(r#"cat("a\tb")"#);
        assert!(wrapped.contains(r#""cat(\"a\\tb\")""#), "{wrapped}");
    }

    #[test]
    fn classifies_error_marker_prefix_only() {
        assert!(Evaluation::new("Error: object 'x' not found").is_error());
        assert!(!Evaluation::new("[1] \"Error: not really\"").is_error());
        assert!(!Evaluation::new(" Error: leading space").is_error());
    }

    #[test]
    fn blank_means_whitespace_only() {
        assert!(Evaluation::new("").is_blank());
        assert!(Evaluation::new("\n  \n").is_blank());
        assert!(!Evaluation::new("[1] 1").is_blank());
    }
}
