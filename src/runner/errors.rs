use std::error::Error;

use owo_colors::{OwoColorize, Stream};

use shade::errors::{Diagnostic, DiagnosticMessage, Level};
use shade::source::Source;

fn format_level(level: Level) -> String {
    let label = match level {
        Level::Fatal => "FATAL",
        Level::Error => "ERROR",
        Level::Warn => "WARN ",
        Level::Info => "INFO ",
    };

    let colored = label.if_supports_color(Stream::Stderr, |text| match level {
        Level::Fatal => text.red().to_string(),
        Level::Error => text.bright_red().to_string(),
        Level::Warn => text.yellow().to_string(),
        Level::Info => text.bright_cyan().to_string(),
    });

    colored.to_string()
}

fn format_diagnostic(src: &Source<'_>, diagnostic: &Diagnostic) -> String {
    let Diagnostic {
        level,
        message: DiagnosticMessage { span, message },
        source,
    } = diagnostic;

    let mut result = format_level(*level);
    result.push(' ');

    if let Some(span) = span {
        result.push_str(&format!("{} ", span.display(src)));
    }

    result.push_str(message);

    let mut cause: Option<&dyn Error> = source.as_deref();

    while let Some(e) = cause {
        result.push_str(&format!(": {}", e));
        cause = e.source();
    }

    result
}

pub fn print_diagnostic(src: &Source<'_>, diagnostic: &Diagnostic) {
    eprintln!("{}", format_diagnostic(src, diagnostic));
}

#[cfg(test)]
mod tests {
    use std::io;

    use pretty_assertions::assert_eq;

    use super::*;
    use shade::errors::Diagnostics;
    use shade::position::{Position, Span};
    use shade::source::SourceBuffer;

    fn render(level: Level, message: DiagnosticMessage, source: Option<Box<dyn Error>>) -> String {
        let mut buf = SourceBuffer::new();
        let mut src = Source::new(&mut buf);
        let id = src.load_from_string("main.shd".into(), "x = 1".into());

        let message = DiagnosticMessage {
            span: message.span.map(|span| Span {
                start: Position {
                    src: Some(id),
                    ..span.start
                },
                end: span.end,
            }),
            ..message
        };

        owo_colors::set_override(false);
        let result = format_diagnostic(
            &src,
            &Diagnostic {
                level,
                message,
                source,
            },
        );
        owo_colors::unset_override();

        result
    }

    #[test]
    fn spanned_error_names_the_location() {
        let start = Position {
            src: None,
            byte: 4,
            line: 1,
            col: 5,
        };
        let message = DiagnosticMessage::with_span(
            Span { start, end: start },
            "expected an expression".to_owned(),
        );

        assert_eq!(
            render(Level::Error, message, None),
            "ERROR main.shd:1:5 expected an expression"
        );
    }

    #[test]
    fn error_causes_are_appended() {
        let cause = io::Error::new(io::ErrorKind::NotFound, "no such file");

        assert_eq!(
            render(
                Level::Error,
                "could not load file a.shd".to_owned().into(),
                Some(Box::new(cause))
            ),
            "ERROR could not load file a.shd: no such file"
        );
    }

    #[test]
    fn warnings_are_padded() {
        assert!(render(Level::Warn, "hmm".to_owned().into(), None).starts_with("WARN  hmm"));

        let mut diagnostics = Diagnostics::new();
        diagnostics.with_level(Level::Info).with_message("fyi".to_owned()).emit();
        assert!(!diagnostics.has_errors());
    }
}
