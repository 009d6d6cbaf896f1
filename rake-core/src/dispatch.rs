//! Planning cycle orchestration: keeps the current snapshot and backlog, runs cycles and commits
//! published plans producing the next snapshot version.

#[cfg(test)]
#[path = "../tests/unit/dispatch_test.rs"]
mod dispatch_test;

use crate::models::problem::{Amendment, Backlog, Booking, LoadingPoint, Order, WagonStatus, WagonUnit, WorldState};
use crate::models::solution::DispatchPlan;
use crate::models::{PlanningError, PlanningPolicy};
use crate::solver::Solver;
use crate::utils::{Environment, GenericError};
use std::sync::{Arc, Mutex, MutexGuard};

struct DispatchState {
    world: Arc<WorldState>,
    backlog: Backlog,
    cycle: usize,
    plan: Option<Arc<DispatchPlan>>,
}

/// Owns the mutable planning state. Commits are serialized, a plan can be committed only against
/// the snapshot version it was computed for.
pub struct Dispatcher {
    policy: Arc<PlanningPolicy>,
    environment: Arc<Environment>,
    state: Mutex<DispatchState>,
}

impl Dispatcher {
    /// Creates a new instance of `Dispatcher` starting from the given snapshot.
    pub fn new(
        world: WorldState,
        policy: Arc<PlanningPolicy>,
        environment: Arc<Environment>,
    ) -> Result<Self, PlanningError> {
        let backlog = Backlog::new(world.orders.iter().map(|order| order.as_ref().clone()).collect())?;
        let state = DispatchState { world: Arc::new(world), backlog, cycle: 0, plan: None };

        Ok(Self { policy, environment, state: Mutex::new(state) })
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> Result<Arc<WorldState>, PlanningError> {
        Ok(self.lock()?.world.clone())
    }

    /// Returns the latest published plan, if any.
    pub fn current_plan(&self) -> Result<Option<Arc<DispatchPlan>>, PlanningError> {
        Ok(self.lock()?.plan.clone())
    }

    /// Returns the number of the last started cycle.
    pub fn cycle(&self) -> Result<usize, PlanningError> {
        Ok(self.lock()?.cycle)
    }

    /// Returns all known revisions of the order.
    pub fn order_history(&self, order_id: &str) -> Result<Vec<Arc<Order>>, PlanningError> {
        Ok(self.lock()?.backlog.history(order_id).to_vec())
    }

    /// Runs a planning cycle over the current snapshot and publishes its plan, superseding the
    /// previous one. Search runs without holding the state lock.
    pub fn run_cycle(&self) -> Result<Arc<DispatchPlan>, PlanningError> {
        let (world, cycle) = {
            let mut state = self.lock()?;
            state.cycle += 1;
            (state.world.clone(), state.cycle)
        };

        (self.environment.logger)(&format!("cycle {cycle}: planning over snapshot v{}", world.version));

        let plan = Solver::new(world, self.policy.clone(), self.environment.clone()).with_cycle(cycle).solve()?;
        let plan = Arc::new(plan);

        let mut state = self.lock()?;
        if state.plan.as_ref().is_none_or(|current| current.cycle < plan.cycle) {
            state.plan = Some(plan.clone());
        }

        Ok(plan)
    }

    /// Commits the plan: reserves its wagons, books loading windows and removes dispatched orders
    /// from the backlog. Returns the next snapshot.
    pub fn commit(&self, plan: &DispatchPlan) -> Result<Arc<WorldState>, PlanningError> {
        let mut state = self.lock()?;

        if plan.snapshot_version != state.world.version {
            return Err(PlanningError::StaleSnapshot { expected: state.world.version, actual: plan.snapshot_version });
        }

        let world = state.world.clone();
        let mut wagons = world.wagons.clone();
        let mut loading_points = world.loading_points.clone();

        plan.solution.compositions.iter().enumerate().for_each(|(idx, composition)| {
            composition.wagons().into_iter().for_each(|wagon| wagons[wagon].status = WagonStatus::Reserved);

            loading_points[composition.loading_point].bookings.push(Booking {
                siding: composition.siding,
                window: composition.loading.clone(),
                reference: format!("cycle-{}/rake-{}", plan.cycle, idx + 1),
            });
        });

        let dispatched = plan
            .solution
            .compositions
            .iter()
            .flat_map(|composition| composition.orders.iter().map(|&order| world.orders[order].id.as_str()))
            .collect::<Vec<_>>();
        let mut backlog = state.backlog.clone();
        backlog.complete(dispatched.as_slice());

        let next = Self::advance(&mut state, backlog, wagons, loading_points)?;

        (self.environment.logger)(&format!(
            "cycle {}: committed {} rake(s), {} order(s) dispatched, snapshot v{}",
            plan.cycle,
            plan.solution.compositions.len(),
            dispatched.len(),
            next.version
        ));

        Ok(next)
    }

    /// Releases reserved wagons back to the available pool. Returns the next snapshot.
    pub fn release(&self, wagon_ids: &[&str]) -> Result<Arc<WorldState>, PlanningError> {
        let mut state = self.lock()?;
        let world = state.world.clone();

        let mut wagons = world.wagons.clone();
        wagon_ids.iter().try_for_each(|&wagon_id| {
            let idx = world
                .wagon_index(wagon_id)
                .ok_or_else(|| GenericError::from(format!("cannot release unknown wagon '{wagon_id}'")))?;

            if wagons[idx].status == WagonStatus::Reserved {
                wagons[idx].status = WagonStatus::Available;
            }

            Ok::<_, GenericError>(())
        })?;

        let backlog = state.backlog.clone();
        Self::advance(&mut state, backlog, wagons, world.loading_points.clone())
    }

    /// Amends a pending order creating a new revision. Returns the new revision.
    pub fn amend_order(&self, order_id: &str, amendment: &Amendment) -> Result<Arc<Order>, PlanningError> {
        let mut state = self.lock()?;

        let mut backlog = state.backlog.clone();
        let revised = backlog.amend(order_id, amendment)?;
        let world = state.world.clone();
        Self::advance(&mut state, backlog, world.wagons.clone(), world.loading_points.clone())?;

        Ok(revised)
    }

    /// Adds new orders to the backlog. Returns the next snapshot.
    pub fn add_orders(&self, orders: Vec<Order>) -> Result<Arc<WorldState>, PlanningError> {
        let mut state = self.lock()?;

        let mut backlog = state.backlog.clone();
        orders.into_iter().try_for_each(|order| backlog.add(order))?;

        let world = state.world.clone();
        Self::advance(&mut state, backlog, world.wagons.clone(), world.loading_points.clone())
    }

    /// Derives the next snapshot and replaces the state with it, the state is unchanged on failure.
    fn advance(
        state: &mut DispatchState,
        backlog: Backlog,
        wagons: Vec<WagonUnit>,
        loading_points: Vec<LoadingPoint>,
    ) -> Result<Arc<WorldState>, PlanningError> {
        let next = Arc::new(state.world.next_version(backlog.orders().to_vec(), wagons, loading_points)?);

        state.world = next.clone();
        state.backlog = backlog;

        Ok(next)
    }

    fn lock(&self) -> Result<MutexGuard<'_, DispatchState>, PlanningError> {
        self.state.lock().map_err(|_| PlanningError::Generic("dispatch state is poisoned".into()))
    }
}
