use super::*;
use crate::parse_time;
use crate::validation::ValidationContext;
use rake_core::models::common::{HOUR, TimeWindow};
use rake_core::prelude::{
    Booking as CoreBooking, GenericError, HandlingMode as CoreHandlingMode, LoadingPoint as CoreLoadingPoint,
    MaterialSpec, Order as CoreOrder, PlanningError, RouteRestriction as CoreRouteRestriction,
    RouteSegment as CoreRouteSegment, WagonProfile as CoreWagonProfile, WagonStatus as CoreWagonStatus, WagonUnit,
};
use std::sync::Arc;

pub(super) fn map_to_world(snapshot: &Snapshot) -> Result<WorldState, MultiFormatError> {
    ValidationContext::new(snapshot).validate()?;

    let start = parse_time(&snapshot.start_time).map_err(to_multi_format_error)?;
    let orders = read_orders(snapshot).map_err(to_multi_format_error)?;
    let wagons = read_wagons(snapshot).map_err(to_multi_format_error)?;
    let loading_points = read_loading_points(snapshot).map_err(to_multi_format_error)?;
    let segments = snapshot.routes.iter().map(read_segment).collect();
    let materials = snapshot.materials.iter().map(read_material).collect();

    let mut world = WorldState::new(start, orders, wagons, loading_points, segments, materials).map_err(|err| {
        let details = match &err {
            PlanningError::DataIntegrity(issues) => {
                issues.iter().map(|issue| issue.to_string()).collect::<Vec<_>>().join("; ")
            }
            other => other.to_string(),
        };

        MultiFormatError::from(FormatError::new_with_details(
            "E0002".to_string(),
            "snapshot violates data integrity".to_string(),
            "fix entities listed in details".to_string(),
            details,
        ))
    })?;

    world.version = snapshot.version;

    Ok(world)
}

fn to_multi_format_error(error: GenericError) -> MultiFormatError {
    FormatError::new(
        "E0001".to_string(),
        "cannot read snapshot".to_string(),
        format!("need to check snapshot definition: '{error}'"),
    )
    .into()
}

pub(crate) fn parse_time_window(window: &[String]) -> Result<TimeWindow, GenericError> {
    match window {
        [start, end] => Ok(TimeWindow::new(parse_time(start)?, parse_time(end)?)),
        _ => Err(format!("time window must have two values, got {}", window.len()).into()),
    }
}

fn read_orders(snapshot: &Snapshot) -> Result<Vec<Arc<CoreOrder>>, GenericError> {
    snapshot
        .orders
        .iter()
        .map(|order| {
            Ok(Arc::new(CoreOrder {
                id: order.id.clone(),
                revision: 0,
                plant: order.plant.clone(),
                material: order.material.clone(),
                quantity: order.quantity,
                destination: order.destination.clone(),
                window: parse_time_window(&order.window)?,
                priority: order.priority,
                wagon_types: order.wagon_types.clone(),
                hard_deadline: order.hard_deadline,
            }))
        })
        .collect()
}

fn read_wagons(snapshot: &Snapshot) -> Result<Vec<WagonUnit>, GenericError> {
    snapshot
        .wagons
        .iter()
        .map(|wagon| {
            let availability = wagon.availability.as_ref().map_or(Ok(TimeWindow::max()), |tw| parse_time_window(tw))?;
            let profile = wagon.profile.as_ref().map_or_else(CoreWagonProfile::default, |profile| CoreWagonProfile {
                tare: profile.tare,
                height: profile.height,
                gauge: profile.gauge.clone(),
            });

            Ok(WagonUnit {
                id: wagon.id.clone(),
                wagon_type: wagon.wagon_type.clone(),
                capacity: wagon.capacity,
                location: wagon.location.clone(),
                availability,
                status: match wagon.status {
                    WagonStatus::Available => CoreWagonStatus::Available,
                    WagonStatus::InMaintenance => CoreWagonStatus::InMaintenance,
                    WagonStatus::Reserved => CoreWagonStatus::Reserved,
                },
                profile,
            })
        })
        .collect()
}

fn read_loading_points(snapshot: &Snapshot) -> Result<Vec<CoreLoadingPoint>, GenericError> {
    snapshot
        .loading_points
        .iter()
        .map(|point| {
            let bookings = point
                .bookings
                .iter()
                .map(|booking| {
                    Ok(CoreBooking {
                        siding: booking.siding,
                        window: parse_time_window(&booking.window)?,
                        reference: booking.reference.clone(),
                    })
                })
                .collect::<Result<Vec<_>, GenericError>>()?;

            Ok(CoreLoadingPoint {
                id: point.id.clone(),
                plant: point.plant.clone(),
                mode: read_mode(point.mode),
                throughput: point.throughput,
                sidings: point.sidings,
                slice_capacity: point.slice_capacity * HOUR,
                free_time: point.free_time * HOUR,
                bookings,
            })
        })
        .collect()
}

fn read_segment(segment: &RouteSegment) -> CoreRouteSegment {
    let restriction = segment.restriction.as_ref().map_or_else(CoreRouteRestriction::default, |restriction| {
        CoreRouteRestriction {
            max_gross_weight: restriction.max_gross_weight,
            max_height: restriction.max_height,
            gauge: restriction.gauge.clone(),
        }
    });

    CoreRouteSegment {
        origin: segment.origin.clone(),
        destination: segment.destination.clone(),
        distance: segment.distance,
        restriction,
        transit_time: segment.transit_time * HOUR,
        congestion_risk: segment.congestion_risk,
    }
}

fn read_material(material: &Material) -> MaterialSpec {
    MaterialSpec {
        material: material.id.clone(),
        wagon_types: material.wagon_types.clone(),
        splittable: material.splittable,
        handling_modes: material.handling_modes.iter().copied().map(read_mode).collect(),
    }
}

fn read_mode(mode: HandlingMode) -> CoreHandlingMode {
    match mode {
        HandlingMode::Mechanical => CoreHandlingMode::Mechanical,
        HandlingMode::Manual => CoreHandlingMode::Manual,
        HandlingMode::Crane => CoreHandlingMode::Crane,
    }
}
