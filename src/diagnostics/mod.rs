use crate::span::Span;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("Syntax error: {msg}")]
    Syntax { msg: String, span: Span },

    #[error("Invalid method pattern '{pattern}': {msg}")]
    Pattern { pattern: String, msg: String },

    #[error("Config error: {msg}")]
    Config { msg: String, path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RewriteError {
    pub fn syntax(msg: impl Into<String>, span: Span) -> Self {
        Self::Syntax { msg: msg.into(), span }
    }

    pub fn pattern(pattern: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Pattern { pattern: pattern.into(), msg: msg.into() }
    }

    pub fn config(msg: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Config { msg: msg.into(), path: path.into() }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            RewriteError::Syntax { span, .. } => Some(*span),
            _ => None,
        }
    }
}

/// Render a RewriteError with ariadne for nice terminal output.
pub fn render_error(source: &str, filename: &str, err: &RewriteError) {
    use ariadne::{Label, Report, ReportKind, Source};

    match err {
        RewriteError::Syntax { msg, span } => {
            let _ = Report::build(ReportKind::Error, (), span.start)
                .with_message(format!("syntax error in {filename}"))
                .with_label(Label::new(span.start..span.end).with_message(msg))
                .finish()
                .eprint(Source::from(source));
        }
        RewriteError::Pattern { pattern, msg } => {
            eprintln!("error[pattern]: {msg}");
            eprintln!("  --> {pattern}");
        }
        RewriteError::Config { msg, path } => {
            eprintln!("error[config]: {msg}");
            eprintln!("  --> {}", path.display());
        }
        RewriteError::Io(e) => {
            eprintln!("error: {filename}: {e}");
        }
    }
}
