// SPDX-License-Identifier: MIT

//! Conditional router with a run-scoped iteration guard

use super::evaluator::evaluate_condition;
use super::operator::Operator;
use crate::component::context::HostContext;
use crate::component::error::ContextError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the two router output edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    TrueResult,
    #[default]
    FalseResult,
}

impl Route {
    pub const ALL: [&'static str; 2] = ["true_result", "false_result"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Route::TrueResult => "true_result",
            Route::FalseResult => "false_result",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Route::TrueResult => Route::FalseResult,
            Route::FalseResult => Route::TrueResult,
        }
    }

    /// The route a predicate result selects
    pub fn from_result(result: bool) -> Self {
        if result {
            Route::TrueResult
        } else {
            Route::FalseResult
        }
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "true_result" => Ok(Route::TrueResult),
            "false_result" => Ok(Route::FalseResult),
            other => Err(format!(
                "unknown route '{}', expected true_result or false_result",
                other
            )),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inputs to a single routing decision
#[derive(Debug, Clone)]
pub struct BranchState<T> {
    pub input_text: String,
    pub match_text: String,
    pub operator: Operator,
    pub case_sensitive: bool,
    /// Forwarded unchanged along the taken edge
    pub passthrough: T,
}

impl<T> BranchState<T> {
    pub fn new(input_text: impl Into<String>, match_text: impl Into<String>, passthrough: T) -> Self {
        Self {
            input_text: input_text.into(),
            match_text: match_text.into(),
            operator: Operator::default(),
            case_sensitive: false,
            passthrough,
        }
    }

    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = operator;
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn evaluate(&self) -> bool {
        evaluate_condition(
            &self.input_text,
            &self.match_text,
            &self.operator,
            self.case_sensitive,
        )
    }
}

fn default_max_iterations() -> u64 {
    10
}

/// Loop-exit settings of a router
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Invocations per run after which the default route is kept open
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u64,
    /// Route that must keep flowing once the cap is reached
    #[serde(default)]
    pub default_route: Route,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            default_route: Route::default(),
        }
    }
}

/// Outcome of one router invocation
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDecision<T> {
    /// Raw predicate result
    pub result: bool,
    /// Edge left open
    pub taken: Route,
    /// Edge the host was told to stop
    pub stopped: Route,
    /// Value on the taken edge; `None` is the empty value
    pub value: Option<T>,
    /// Counter value after this invocation
    pub iteration: u64,
    /// Whether the guard overrode the predicate
    pub forced: bool,
}

/// Run-context key holding the iteration counter of router `id`
pub fn iteration_key(id: &str) -> String {
    format!("{}_iteration", id)
}

/// Routes a passthrough value to `true_result` or `false_result`
#[derive(Debug, Clone)]
pub struct ConditionalRouter {
    id: String,
    guard: GuardConfig,
}

impl ConditionalRouter {
    pub fn new(id: impl Into<String>, guard: GuardConfig) -> Self {
        Self {
            id: id.into(),
            guard,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn guard(&self) -> &GuardConfig {
        &self.guard
    }

    /// Start an invocation. The predicate is evaluated once, here.
    pub fn begin<'a, T, C>(
        &'a self,
        branch: &'a BranchState<T>,
        ctx: &'a mut C,
    ) -> Invocation<'a, T, C>
    where
        C: HostContext + ?Sized,
    {
        Invocation {
            router: self,
            result: branch.evaluate(),
            branch,
            ctx,
            guarded: None,
        }
    }

    /// Evaluate, stop one edge, and report the decision
    pub fn route<T, C>(
        &self,
        branch: &BranchState<T>,
        ctx: &mut C,
    ) -> Result<RouteDecision<T>, ContextError>
    where
        T: Clone,
        C: HostContext + ?Sized,
    {
        self.begin(branch, ctx).finish()
    }
}

#[derive(Debug, Clone, Copy)]
struct Guarded {
    stopped: Route,
    iteration: u64,
    forced: bool,
}

/// A single router invocation.
///
/// The host may read both `true_response` and `false_response`; the counter
/// is bumped and an edge stopped only on the first read.
pub struct Invocation<'a, T, C: HostContext + ?Sized> {
    router: &'a ConditionalRouter,
    branch: &'a BranchState<T>,
    ctx: &'a mut C,
    result: bool,
    guarded: Option<Guarded>,
}

impl<'a, T: Clone, C: HostContext + ?Sized> Invocation<'a, T, C> {
    pub fn result(&self) -> bool {
        self.result
    }

    /// Value for the `true_result` output
    pub fn true_response(&mut self) -> Result<Option<T>, ContextError> {
        self.respond(Route::TrueResult)
    }

    /// Value for the `false_result` output
    pub fn false_response(&mut self) -> Result<Option<T>, ContextError> {
        self.respond(Route::FalseResult)
    }

    /// Close the invocation, applying the guard if no response was read
    pub fn finish(mut self) -> Result<RouteDecision<T>, ContextError> {
        let selected = Route::from_result(self.result);
        let guarded = match self.guarded {
            Some(guarded) => guarded,
            None => self.iterate_and_stop_once(selected.opposite())?,
        };

        let taken = guarded.stopped.opposite();
        let value = (taken == selected).then(|| self.branch.passthrough.clone());

        Ok(RouteDecision {
            result: self.result,
            taken,
            stopped: guarded.stopped,
            value,
            iteration: guarded.iteration,
            forced: guarded.forced,
        })
    }

    fn respond(&mut self, route: Route) -> Result<Option<T>, ContextError> {
        if Route::from_result(self.result) == route {
            self.iterate_and_stop_once(route.opposite())?;
            Ok(Some(self.branch.passthrough.clone()))
        } else {
            self.iterate_and_stop_once(route)?;
            Ok(None)
        }
    }

    fn iterate_and_stop_once(&mut self, route_to_stop: Route) -> Result<Guarded, ContextError> {
        if let Some(guarded) = self.guarded {
            return Ok(guarded);
        }

        let id = self.router.id();
        let key = iteration_key(id);
        let iteration = self.ctx.counter(&key)?.saturating_add(1);
        self.ctx.set_counter(&key, iteration)?;

        let guard = self.router.guard();
        let forced = iteration >= guard.max_iterations && route_to_stop == guard.default_route;
        let stopped = if forced {
            log::info!(
                "Router {} reached {} iterations, keeping default route {} open",
                id,
                iteration,
                guard.default_route
            );
            route_to_stop.opposite()
        } else {
            route_to_stop
        };

        // At most one stop signal per invocation, even if it fails.
        let guarded = Guarded {
            stopped,
            iteration,
            forced,
        };
        self.guarded = Some(guarded);
        self.ctx.stop_edge(id, stopped.as_str())?;

        Ok(guarded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::context::RunContext;
    use std::collections::HashMap;

    /// Host double that records every capability call
    #[derive(Default)]
    struct RecordingHost {
        counters: HashMap<String, u64>,
        stops: Vec<(String, String)>,
        offline: bool,
    }

    impl HostContext for RecordingHost {
        fn counter(&self, key: &str) -> Result<u64, ContextError> {
            if self.offline {
                return Err(ContextError::HostContextUnavailable("offline".to_string()));
            }
            Ok(self.counters.get(key).copied().unwrap_or(0))
        }

        fn set_counter(&mut self, key: &str, value: u64) -> Result<(), ContextError> {
            self.counters.insert(key.to_string(), value);
            Ok(())
        }

        fn stop_edge(&mut self, node_id: &str, edge: &str) -> Result<(), ContextError> {
            self.stops.push((node_id.to_string(), edge.to_string()));
            Ok(())
        }
    }

    fn router(max_iterations: u64, default_route: Route) -> ConditionalRouter {
        ConditionalRouter::new(
            "check",
            GuardConfig {
                max_iterations,
                default_route,
            },
        )
    }

    #[test]
    fn test_route_names() {
        assert_eq!(Route::TrueResult.as_str(), "true_result");
        assert_eq!(Route::FalseResult.opposite(), Route::TrueResult);
        assert_eq!("false_result".parse::<Route>(), Ok(Route::FalseResult));
        assert!("maybe".parse::<Route>().is_err());
    }

    #[test]
    fn test_guard_defaults() {
        let guard = GuardConfig::default();
        assert_eq!(guard.max_iterations, 10);
        assert_eq!(guard.default_route, Route::FalseResult);

        let guard: GuardConfig = serde_yaml::from_str("max_iterations: 2").unwrap();
        assert_eq!(guard.max_iterations, 2);
        assert_eq!(guard.default_route, Route::FalseResult);
    }

    #[test]
    fn test_contains_takes_true_edge() {
        let mut ctx = RunContext::new();
        let branch = BranchState::new("hello world", "WORLD", "payload")
            .with_operator(Operator::Contains);

        let decision = router(10, Route::FalseResult)
            .route(&branch, &mut ctx)
            .unwrap();

        assert!(decision.result);
        assert_eq!(decision.taken, Route::TrueResult);
        assert_eq!(decision.stopped, Route::FalseResult);
        assert_eq!(decision.value, Some("payload"));
        assert!(!decision.forced);
        assert!(ctx.is_stopped("check", "false_result"));
        assert!(!ctx.is_stopped("check", "true_result"));
    }

    #[test]
    fn test_equals_mismatch_takes_false_edge() {
        let mut ctx = RunContext::new();
        let branch = BranchState::new("abc", "xyz", 7);

        let decision = router(10, Route::FalseResult)
            .route(&branch, &mut ctx)
            .unwrap();

        assert!(!decision.result);
        assert_eq!(decision.taken, Route::FalseResult);
        assert_eq!(decision.value, Some(7));
        assert!(ctx.is_stopped("check", "true_result"));
    }

    #[test]
    fn test_exactly_one_edge_stopped_per_invocation() {
        let r = router(3, Route::TrueResult);
        let mut host = RecordingHost::default();

        for (input, expected) in [("a", true), ("b", false), ("a", true), ("b", false)] {
            host.stops.clear();
            let branch = BranchState::new(input, "a", ());
            let decision = r.route(&branch, &mut host).unwrap();

            assert_eq!(decision.result, expected);
            assert_ne!(decision.taken, decision.stopped);
            assert_eq!(host.stops.len(), 1);
            assert_eq!(host.stops[0].1, decision.stopped.as_str());
        }
    }

    #[test]
    fn test_both_responses_increment_once() {
        let r = router(10, Route::FalseResult);
        let mut host = RecordingHost::default();
        let branch = BranchState::new("yes", "yes", "msg");

        let mut invocation = r.begin(&branch, &mut host);
        assert_eq!(invocation.true_response().unwrap(), Some("msg"));
        assert_eq!(invocation.false_response().unwrap(), None);
        assert_eq!(invocation.true_response().unwrap(), Some("msg"));
        let decision = invocation.finish().unwrap();

        assert_eq!(decision.iteration, 1);
        assert_eq!(host.counters[&iteration_key("check")], 1);
        assert_eq!(
            host.stops,
            vec![("check".to_string(), "false_result".to_string())]
        );
    }

    #[test]
    fn test_false_response_first_stops_true_edge() {
        let r = router(10, Route::FalseResult);
        let mut host = RecordingHost::default();
        let branch = BranchState::new("no", "yes", "msg");

        let mut invocation = r.begin(&branch, &mut host);
        assert_eq!(invocation.false_response().unwrap(), Some("msg"));
        assert_eq!(invocation.true_response().unwrap(), None);
        invocation.finish().unwrap();

        assert_eq!(
            host.stops,
            vec![("check".to_string(), "true_result".to_string())]
        );
    }

    #[test]
    fn test_guard_flips_to_keep_default_route() {
        // Predicate is true every time, so the false edge is due to be stopped.
        let r = router(3, Route::FalseResult);
        let mut ctx = RunContext::new();
        let branch = BranchState::new("done", "done", "msg");

        for iteration in 1..=2 {
            let decision = r.route(&branch, &mut ctx).unwrap();
            assert_eq!(decision.iteration, iteration);
            assert_eq!(decision.stopped, Route::FalseResult);
            assert!(!decision.forced);
            ctx.begin_invocation("check");
        }

        let third = r.route(&branch, &mut ctx).unwrap();
        assert_eq!(third.iteration, 3);
        assert!(third.forced);
        assert_eq!(third.stopped, Route::TrueResult);
        assert_eq!(third.taken, Route::FalseResult);
        assert_eq!(third.value, None);
        assert!(ctx.is_stopped("check", "true_result"));
        assert!(!ctx.is_stopped("check", "false_result"));

        ctx.begin_invocation("check");
        let fourth = r.route(&branch, &mut ctx).unwrap();
        assert!(fourth.forced);
        assert_eq!(fourth.taken, Route::FalseResult);
    }

    #[test]
    fn test_guard_leaves_non_default_stop_alone() {
        // Predicate false, so the true edge is stopped; default is false_result.
        let r = router(1, Route::FalseResult);
        let mut ctx = RunContext::new();
        let branch = BranchState::new("left", "right", ());

        let decision = r.route(&branch, &mut ctx).unwrap();
        assert_eq!(decision.iteration, 1);
        assert!(!decision.forced);
        assert_eq!(decision.taken, Route::FalseResult);
        assert_eq!(decision.value, Some(()));
    }

    #[test]
    fn test_counters_are_per_router() {
        let mut ctx = RunContext::new();
        let first = ConditionalRouter::new("first", GuardConfig::default());
        let second = ConditionalRouter::new("second", GuardConfig::default());
        let branch = BranchState::new("x", "x", ());

        first.route(&branch, &mut ctx).unwrap();
        first.route(&branch, &mut ctx).unwrap();
        second.route(&branch, &mut ctx).unwrap();

        assert_eq!(ctx.counter("first_iteration").unwrap(), 2);
        assert_eq!(ctx.counter("second_iteration").unwrap(), 1);
    }

    #[test]
    fn test_counter_saturates_at_max() {
        let r = router(10, Route::FalseResult);
        let mut host = RecordingHost::default();
        host.counters.insert(iteration_key("check"), u64::MAX);
        let branch = BranchState::new("a", "a", ());

        let decision = r.route(&branch, &mut host).unwrap();

        assert_eq!(decision.iteration, u64::MAX);
        assert!(decision.forced);
        assert_eq!(decision.taken, Route::FalseResult);
        assert_eq!(host.counters[&iteration_key("check")], u64::MAX);
    }

    #[test]
    fn test_unavailable_host_propagates() {
        let r = router(10, Route::FalseResult);
        let mut host = RecordingHost {
            offline: true,
            ..Default::default()
        };
        let branch = BranchState::new("a", "a", ());

        let err = r.route(&branch, &mut host).unwrap_err();
        assert!(matches!(err, ContextError::HostContextUnavailable(_)));
        assert!(host.stops.is_empty());
    }
}
