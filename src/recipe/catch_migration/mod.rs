//! Migrate catch clauses when an API changes the exception type it throws.
//!
//! The default configuration handles Jackson 3, whose `ObjectMapper`,
//! `ObjectReader` and `ObjectWriter` throw the unchecked
//! `tools.jackson.core.JacksonException` where Jackson 2 threw
//! `java.io.IOException` subtypes. For every try statement that calls the
//! API:
//!
//! - if nothing else in the body can throw the legacy exception, each clause
//!   catching it is changed to catch the replacement instead;
//! - otherwise the replacement is added as an extra alternative, unless some
//!   clause already catches it.
//!
//! Tries are handled innermost first.

pub mod catches;
pub mod classify;
pub mod rewrite;
pub mod scan;

use std::sync::Arc;

use tracing::debug;

use self::classify::Classifier;
use self::rewrite::CatchRewriter;
use super::{Change, Precondition, Recipe, RecipeContext};
use crate::change_type::Naming;
use crate::config::CatchMigrationConfig;
use crate::imports;
use crate::diagnostics::RewriteError;
use crate::parser::ast::{CompilationUnit, Try};
use crate::search::MethodMatcher;
use crate::typeck::types::{simple_name, ClassType};
use crate::visit::{walk_try_mut, VisitMut};

#[derive(Debug, Clone)]
pub struct CatchMigration {
    legacy: String,
    replacement: String,
    display_name: String,
    description: String,
    tags: Vec<String>,
    /// Finds API calls: the pattern's declaring type only.
    exact_api: Vec<MethodMatcher>,
    /// Tells API calls apart from other legacy sources.
    api: Vec<MethodMatcher>,
    precondition: Precondition,
}

impl CatchMigration {
    pub fn new(config: &CatchMigrationConfig) -> Result<Self, RewriteError> {
        let exact_api = config.exact_matchers()?;
        let legacy = simple_name(&config.legacy_exception);
        let replacement = simple_name(&config.replacement_exception);
        Ok(CatchMigration {
            legacy: config.legacy_exception.clone(),
            replacement: config.replacement_exception.clone(),
            display_name: format!("Replace `{legacy}` with `{replacement}` in catch clauses"),
            description: format!(
                "Where a try body calls the configured API, which now throws `{}`, catch clauses for `{}` \
                 are changed to catch `{replacement}` instead. When other code in the body can still throw \
                 `{legacy}`, `{replacement}` is added as a multi-catch alternative.",
                config.replacement_exception, config.legacy_exception
            ),
            tags: config.tags.clone(),
            precondition: Precondition::any_method(&exact_api),
            api: config.matchers()?,
            exact_api,
        })
    }

    pub fn legacy(&self) -> &str {
        &self.legacy
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    fn classifier(&self) -> Classifier<'_> {
        Classifier { api: &self.api, legacy: &self.legacy }
    }

    fn finder(&self) -> Classifier<'_> {
        Classifier { api: &self.exact_api, legacy: &self.legacy }
    }
}

impl Recipe for CatchMigration {
    fn name(&self) -> &str {
        "catch-migration"
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn precondition(&self) -> &Precondition {
        &self.precondition
    }

    fn visit(&self, cu: &mut CompilationUnit, ctx: &mut RecipeContext<'_>) {
        let replacement = ctx.classpath.type_named(&self.replacement);
        let classpath = ctx.classpath;
        let naming = if imports::simple_name_usable(cu, &self.replacement, |fqn| classpath.contains(fqn)) {
            Naming::Simple
        } else {
            debug!(replacement = %self.replacement, "simple name is taken, writing it qualified");
            Naming::Qualified
        };
        let mut visitor = TryVisitor { rule: self, replacement: &replacement, naming, ctx };
        visitor.visit_compilation_unit_mut(cu);
    }
}

struct TryVisitor<'a, 'cp> {
    rule: &'a CatchMigration,
    replacement: &'a Arc<ClassType>,
    naming: Naming,
    ctx: &'a mut RecipeContext<'cp>,
}

impl TryVisitor<'_, '_> {
    fn rewrite(&mut self, t: &mut Try) {
        if !scan::has_designated_call(t, &self.rule.finder()) {
            return;
        }
        let classifier = self.rule.classifier();
        let rewriter = CatchRewriter { legacy: &self.rule.legacy, replacement: self.replacement, naming: self.naming };
        let other_source = scan::has_non_designated_legacy_source(t, &classifier);
        let rewritten = if other_source { rewriter.augment(t) } else { rewriter.substitute(t) };
        let Some(rewritten) = rewritten else {
            debug!(try_id = %t.id, other_source, "try left unchanged");
            return;
        };
        debug!(try_id = %t.id, kind = ?rewritten.kind, clauses = rewritten.clauses, "rewrote catch clauses");
        *t = rewritten.tree;
        self.ctx.changes.push(Change { node: t.id, kind: rewritten.kind, clauses: rewritten.clauses });
        self.ctx.imports.merge(rewritten.imports);
    }
}

impl VisitMut for TryVisitor<'_, '_> {
    fn visit_try_mut(&mut self, t: &mut Try) {
        walk_try_mut(self, t);
        self.rewrite(t);
    }
}
