//! Rewrite rules over attributed compilation units.
//!
//! A [`Recipe`] gates itself with a [`Precondition`] evaluated on the whole
//! unit, then edits the tree in place and records what it did in a
//! [`RecipeContext`]. [`run`] drives one recipe and reconciles imports
//! afterwards.

pub mod catch_migration;

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::imports::{self, ImportChanges, ImportDelta};
use crate::parser::ast::CompilationUnit;
use crate::search::{uses_method, MethodMatcher};
use crate::typeck::Classpath;

/// Whole-unit applicability check for a recipe.
#[derive(Debug, Clone)]
pub enum Precondition {
    Always,
    /// The unit contains a call matching the pattern.
    UsesMethod(MethodMatcher),
    AnyOf(Vec<Precondition>),
}

impl Precondition {
    pub fn any_method(matchers: &[MethodMatcher]) -> Self {
        Precondition::AnyOf(matchers.iter().cloned().map(Precondition::UsesMethod).collect())
    }

    pub fn holds(&self, cu: &CompilationUnit) -> bool {
        match self {
            Precondition::Always => true,
            Precondition::UsesMethod(matcher) => uses_method(cu, matcher),
            Precondition::AnyOf(all) => all.iter().any(|p| p.holds(cu)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeKind {
    /// The legacy type was replaced in place.
    Substituted,
    /// The replacement type was added as a multi-catch alternative.
    Augmented,
}

/// One rewritten statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub node: Uuid,
    pub kind: ChangeKind,
    /// Number of catch clauses edited.
    pub clauses: usize,
}

/// Shared state handed to a recipe while it visits a unit.
pub struct RecipeContext<'cp> {
    pub classpath: &'cp Classpath,
    pub changes: Vec<Change>,
    pub imports: ImportDelta,
}

impl<'cp> RecipeContext<'cp> {
    pub fn new(classpath: &'cp Classpath) -> Self {
        RecipeContext { classpath, changes: Vec::new(), imports: ImportDelta::default() }
    }
}

pub trait Recipe {
    /// Stable identifier used in reports.
    fn name(&self) -> &str;

    fn display_name(&self) -> &str {
        self.name()
    }

    fn description(&self) -> &str {
        ""
    }

    fn tags(&self) -> &[String] {
        &[]
    }

    fn precondition(&self) -> &Precondition;

    /// Edit `cu` in place. Only called when the precondition holds.
    fn visit(&self, cu: &mut CompilationUnit, ctx: &mut RecipeContext<'_>);
}

/// What one recipe did to one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeRun {
    pub recipe: String,
    pub display_name: String,
    pub tags: Vec<String>,
    pub applicable: bool,
    pub changes: Vec<Change>,
    pub imports: ImportChanges,
}

impl RecipeRun {
    pub fn changed(&self) -> bool {
        !self.changes.is_empty() || !self.imports.is_empty()
    }
}

/// Run `recipe` over an attributed unit, then apply the import delta it
/// signalled. An inapplicable unit is left untouched.
pub fn run(recipe: &dyn Recipe, cu: &mut CompilationUnit, classpath: &Classpath) -> RecipeRun {
    let mut run = RecipeRun {
        recipe: recipe.name().to_string(),
        display_name: recipe.display_name().to_string(),
        tags: recipe.tags().to_vec(),
        applicable: recipe.precondition().holds(cu),
        changes: Vec::new(),
        imports: ImportChanges::default(),
    };
    if !run.applicable {
        debug!(recipe = recipe.name(), "precondition does not hold, skipping");
        return run;
    }

    let mut ctx = RecipeContext::new(classpath);
    recipe.visit(cu, &mut ctx);
    run.imports = imports::apply(cu, &ctx.imports);
    run.changes = ctx.changes;
    run
}
