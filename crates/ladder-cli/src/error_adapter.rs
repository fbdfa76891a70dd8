//! Error adapter for rendering [`LadderError`] as a miette diagnostic.
//!
//! The library reports plain `std::error::Error` values; the CLI wraps them
//! here so that `miette::GraphicalReportHandler` can add a code, a help line
//! and the cause chain.

use std::fmt;

use miette::Diagnostic;

use ladder::LadderError;

/// Wraps a [`LadderError`] for graphical reporting.
pub struct ErrorAdapter<'a>(pub &'a LadderError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl Diagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            LadderError::Io(_) => "ladder::io",
            LadderError::Parse { .. } => "ladder::parse",
            LadderError::Config(_) => "ladder::config",
            LadderError::Export(_) => "ladder::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self.0 {
            LadderError::Parse { what, .. } => Some(Box::new(format!(
                "check that the {what} document is well-formed JSON"
            ))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use miette::GraphicalReportHandler;

    use super::*;

    fn parse_error() -> LadderError {
        ladder::DiagramBuilder::default()
            .parse_progress("{ nope")
            .unwrap_err()
    }

    #[test]
    fn test_codes_follow_variant() {
        let config = LadderError::Config("bad".to_string());
        let code = ErrorAdapter(&config).code().map(|code| code.to_string());
        assert_eq!(code.as_deref(), Some("ladder::config"));

        let parse = parse_error();
        let adapter = ErrorAdapter(&parse);
        assert_eq!(
            adapter.code().map(|code| code.to_string()).as_deref(),
            Some("ladder::parse")
        );
        assert!(adapter.help().is_some_and(|help| help.to_string().contains("progress")));
    }

    #[test]
    fn test_graphical_report_contains_message() {
        let err = LadderError::Config("missing file".to_string());
        let mut writer = String::new();
        GraphicalReportHandler::new()
            .render_report(&mut writer, &ErrorAdapter(&err))
            .unwrap();

        assert!(writer.contains("missing file"));
        assert!(writer.contains("ladder::config"));
    }
}
