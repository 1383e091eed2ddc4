//! Tree walk driving the resolver and the checks.
//!
//! At every node the resolver is called before the checks, on entry and on
//! exit, and checks are called in list order. Terminal tokens are not visited.

use xquery_syntax::{ProblemReporter, SyntaxNode};

use crate::issues::{Issue, IssueSink};
use crate::project::SourceUnit;
use crate::resolver::Resolver;
use crate::semantic::{Check, CheckContext};

/// Walk `root` with the resolver alone
pub fn map_dependencies<R: Resolver + ?Sized>(unit: &str, root: &SyntaxNode, resolver: &mut R) {
    let mut issues = IssueSink::new();
    let mut walker = Walker {
        unit,
        resolver,
        checks: &mut [],
        issues: &mut issues,
    };
    walker.run(root);
}

/// Walk a unit with the resolver and every check, then hand the unit's parse
/// problems to each check's report hook.
pub fn process<R: Resolver + ?Sized>(
    unit: &SourceUnit,
    resolver: &mut R,
    checks: &mut [Box<dyn Check>],
) -> Vec<Issue> {
    let mut issues = IssueSink::new();
    let reporter = ProblemReporter::from_problems(unit.problems.iter().cloned());

    let mut walker = Walker {
        unit: &unit.name,
        resolver,
        checks,
        issues: &mut issues,
    };
    walker.run(&unit.tree);
    walker.report(&reporter);

    tracing::debug!("{}: {} issue(s)", unit.name, issues.len());
    issues.into_issues()
}

struct Walker<'w, R: ?Sized> {
    unit: &'w str,
    resolver: &'w mut R,
    checks: &'w mut [Box<dyn Check>],
    issues: &'w mut IssueSink,
}

impl<R: Resolver + ?Sized> Walker<'_, R> {
    fn run(&mut self, root: &SyntaxNode) {
        self.resolver.enter_source(self.unit, root);
        self.each_check(|check, ctx| check.enter_source(ctx, root));

        self.visit(root);

        self.resolver.exit_source(root);
        self.each_check(|check, ctx| check.exit_source(ctx, root));
    }

    fn visit(&mut self, node: &SyntaxNode) {
        self.resolver.enter_expression(node);
        self.each_check(|check, ctx| check.enter_expression(ctx, node));

        for child in node.child_nodes() {
            self.visit(child);
        }

        self.resolver.exit_expression(node);
        self.each_check(|check, ctx| check.exit_expression(ctx, node));
    }

    fn report(&mut self, reporter: &ProblemReporter) {
        self.each_check(|check, ctx| check.check_report(ctx, reporter));
    }

    fn each_check(&mut self, mut hook: impl FnMut(&mut dyn Check, &mut CheckContext<'_>)) {
        if self.checks.is_empty() {
            return;
        }
        let mut ctx = CheckContext::new(self.unit, self.resolver.symbols(), self.issues);
        for check in self.checks.iter_mut() {
            hook(check.as_mut(), &mut ctx);
        }
    }
}
