//! The routing model restated as a `vrp-core` problem.
//!
//! Every non-depot node becomes a job at its own location, tagged with its
//! drop penalty. The single vehicle leaves the depot at minute zero and must
//! be back by the time budget. The goal ranks solutions by arc costs plus the
//! penalties of unassigned jobs, then by travel time.

use std::sync::Arc;

use vrp_core::construction::heuristics::UnassignmentInfo;
use vrp_core::models::common::{Location, Profile};
use vrp_core::models::problem::TravelTime;
use vrp_core::models::solution::{Activity, Registry, Route as VrpRoute, Tour};
use vrp_core::prelude::*;
use vrp_core::utils::{Environment, GenericError};

use crate::engine::RoutingModel;

custom_dimension!(DropPenalty typeof u64);

/// Leg costs between every pair of nodes.
#[derive(Debug)]
pub(crate) struct LegTable {
    legs: Vec<Vec<u64>>,
}

impl LegTable {
    fn new(routing: &RoutingModel<'_>) -> Self {
        let node_count = routing.problem().node_count();
        let arc_cost = routing.arc_cost();
        let legs = (0..node_count)
            .map(|from| (0..node_count).map(|to| arc_cost.leg(from, to)).collect())
            .collect();
        Self { legs }
    }

    fn leg(&self, from: Location, to: Location) -> u64 {
        self.legs
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(0)
    }

    fn tour_cost(&self, tour: &Tour) -> u128 {
        let locations: Vec<Location> = tour
            .all_activities()
            .map(|activity| activity.place.location)
            .collect();
        locations
            .iter()
            .zip(locations.iter().skip(1))
            .map(|(&from, &to)| u128::from(self.leg(from, to)))
            .sum()
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "minute totals and penalties stay well inside f64's exact range"
)]
const fn to_cost(value: i128) -> Cost {
    value as Cost
}

fn unsigned_cost(value: u128) -> Cost {
    to_cost(i128::try_from(value).unwrap_or(i128::MAX))
}

fn job_penalty(job: &Job) -> u64 {
    job.dimens().get_drop_penalty().copied().unwrap_or(0)
}

struct RouteObjective {
    legs: Arc<LegTable>,
    total_penalty: u128,
}

impl FeatureObjective for RouteObjective {
    fn fitness(&self, solution: &InsertionContext) -> Cost {
        let routes = &solution.solution.routes;
        let travelled: u128 = routes
            .iter()
            .map(|route_ctx| self.legs.tour_cost(&route_ctx.route().tour))
            .sum();
        let kept: u128 = routes
            .iter()
            .flat_map(|route_ctx| route_ctx.route().tour.jobs())
            .map(|job| u128::from(job_penalty(job)))
            .sum();
        unsigned_cost(travelled.saturating_add(self.total_penalty.saturating_sub(kept)))
    }

    fn estimate(&self, move_ctx: &MoveContext<'_>) -> Cost {
        match move_ctx {
            MoveContext::Route { job, .. } => to_cost(-i128::from(job_penalty(job))),
            MoveContext::Activity { activity_ctx, .. } => {
                let leg = |from: Location, to: Location| i128::from(self.legs.leg(from, to));
                let prev = activity_ctx.prev.place.location;
                let target = activity_ctx.target.place.location;
                let detour = match activity_ctx.next {
                    Some(after) => {
                        let next = after.place.location;
                        leg(prev, target)
                            .saturating_add(leg(target, next))
                            .saturating_sub(leg(prev, next))
                    }
                    None => leg(prev, target),
                };
                to_cost(detour)
            }
        }
    }
}

struct LegTransportCost {
    legs: Arc<LegTable>,
}

impl LegTransportCost {
    fn minutes(&self, from: Location, to: Location) -> f64 {
        to_cost(i128::from(self.legs.leg(from, to)))
    }
}

impl TransportCost for LegTransportCost {
    fn distance(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> Cost {
        self.minutes(from, to)
    }

    fn duration(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> f64 {
        self.minutes(from, to)
    }

    fn distance_approx(&self, profile: &Profile, from: usize, to: usize) -> f64 {
        self.duration_approx(profile, from, to)
    }

    fn duration_approx(&self, _profile: &Profile, from: usize, to: usize) -> f64 {
        self.minutes(from, to)
    }
}

fn define_goal(
    objective: RouteObjective,
    transport: Arc<dyn TransportCost>,
) -> GenericResult<GoalContext> {
    let route_feature = FeatureBuilder::default()
        .with_name("min-route-objective")
        .with_objective(objective)
        .build()?;
    let time_feature = TransportFeatureBuilder::new("time-budget")
        .set_transport_cost(transport)
        .set_time_constrained(true)
        .build_minimize_distance()?;

    GoalContextBuilder::with_features(&[route_feature, time_feature])?.build()
}

/// A `vrp-core` problem plus the job standing for each node.
pub(crate) struct WellProblem {
    problem: Arc<Problem>,
    jobs: Vec<Option<Job>>,
    depot: Location,
}

impl WellProblem {
    /// Restate `routing` for the solver.
    pub(crate) fn build(routing: &RoutingModel<'_>) -> GenericResult<Self> {
        let model = routing.problem();
        let depot = routing.depot();
        let legs = Arc::new(LegTable::new(routing));
        let transport: Arc<dyn TransportCost> = Arc::new(LegTransportCost { legs: legs.clone() });
        let objective = RouteObjective {
            legs,
            total_penalty: routing.disjunctions().total_penalty(model.non_depot_nodes()),
        };
        let goal = define_goal(objective, transport.clone())?;

        let mut jobs = vec![None; model.node_count()];
        for node in model.non_depot_nodes() {
            let penalty = routing.disjunctions().penalty(node);
            let job = SingleBuilder::default()
                .id(format!("well{node}").as_str())
                .dimension(|dimens| {
                    dimens.set_drop_penalty(penalty);
                })
                .location(node)?
                .build_as_job()?;
            if let Some(slot) = jobs.get_mut(node) {
                *slot = Some(job);
            }
        }

        let vehicle = VehicleBuilder::default()
            .id("pumper")
            .add_detail(
                VehicleDetailBuilder::default()
                    .set_start_location(depot)
                    .set_start_time(0.0)
                    .set_end_location(depot)
                    .set_end_time(to_cost(i128::from(routing.dimension().capacity())))
                    .build()?,
            )
            .build()?;

        let problem = ProblemBuilder::default()
            .add_jobs(jobs.iter().flatten().cloned())
            .add_vehicles(std::iter::once(vehicle))
            .with_goal(goal)
            .with_transport_cost(transport)
            .build()?;

        Ok(Self {
            problem: Arc::new(problem),
            jobs,
            depot,
        })
    }

    /// The solver-side problem.
    pub(crate) const fn problem(&self) -> &Arc<Problem> {
        &self.problem
    }

    fn job(&self, node: usize) -> Option<&Job> {
        self.jobs.get(node).and_then(Option::as_ref)
    }

    /// A solver individual visiting `nodes` in order and leaving every other
    /// job unassigned.
    pub(crate) fn initial_solution(
        &self,
        nodes: &[usize],
        environment: &Arc<Environment>,
    ) -> GenericResult<InsertionContext> {
        let mut registry = Registry::new(&self.problem.fleet, environment.random.clone());
        let mut routes = Vec::new();
        if !nodes.is_empty() {
            let actor = registry
                .next()
                .next()
                .ok_or_else(|| GenericError::from("the fleet has no vehicle"))?;
            let mut tour = Tour::new(&actor);
            for &node in nodes {
                let job = self
                    .job(node)
                    .ok_or_else(|| GenericError::from(format!("node {node} has no job")))?;
                let mut activity = Activity::new_with_job(job.to_single().clone());
                activity.place.location = node;
                tour.insert_last(activity);
            }
            registry.use_actor(&actor);
            routes.push(VrpRoute { actor, tour });
        }

        let unassigned = self
            .jobs
            .iter()
            .enumerate()
            .filter(|(node, _)| !nodes.contains(node))
            .filter_map(|(_, job)| job.clone())
            .map(|job| (job, UnassignmentInfo::Unknown))
            .collect();
        let solution = Solution {
            cost: Cost::default(),
            registry,
            routes,
            unassigned,
            telemetry: None,
        };
        Ok(InsertionContext::new_from_solution(
            self.problem.clone(),
            (solution, None),
            environment.clone(),
        ))
    }

    /// Non-depot nodes of the solver's route, in visiting order.
    pub(crate) fn visited_nodes(&self, solution: &Solution) -> Vec<usize> {
        solution
            .get_locations()
            .flatten()
            .filter(|&location| location != self.depot)
            .collect()
    }
}
