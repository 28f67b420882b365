pub mod span;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod pretty;
pub mod typeck;
pub mod visit;
pub mod search;
pub mod change_type;
pub mod imports;
pub mod config;
pub mod recipe;

use serde::Serialize;

use config::Config;
use diagnostics::RewriteError;
use recipe::catch_migration::CatchMigration;
use recipe::{Recipe, RecipeRun};
use typeck::Classpath;

/// Result of rewriting one source file.
#[derive(Debug, Clone, Serialize)]
pub struct RewriteOutcome {
    /// The rewritten source; identical to the input when nothing changed.
    #[serde(skip)]
    pub source: String,
    pub changed: bool,
    #[serde(flatten)]
    pub run: RecipeRun,
}

/// Rewrite a Java source string with the catch migration configured in
/// `config` (lex → parse → attribute → recipe → imports → print).
pub fn rewrite_source(source: &str, config: &Config) -> Result<RewriteOutcome, RewriteError> {
    let classpath = config.classpath()?;
    let recipe = CatchMigration::new(&config.catch_migration)?;
    rewrite_with(source, &recipe, &classpath)
}

/// Rewrite with an already built recipe and classpath, for callers that
/// process many files.
pub fn rewrite_with(source: &str, recipe: &dyn Recipe, classpath: &Classpath) -> Result<RewriteOutcome, RewriteError> {
    let tokens = lexer::lex(source)?;
    let mut cu = parser::Parser::new(&tokens, source).parse_compilation_unit()?;
    typeck::attribute(&mut cu, classpath);
    let run = recipe::run(recipe, &mut cu, classpath);
    let changed = run.changed();
    let source = if changed { pretty::print(&cu) } else { source.to_string() };
    Ok(RewriteOutcome { source, changed, run })
}
