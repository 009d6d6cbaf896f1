#[cfg(test)]
#[path = "../../tests/unit/validation/network_test.rs"]
mod network_test;

use super::*;
use crate::utils::combine_error_results;

/// Checks that route segments are correct.
fn check_e1300_segment_correctness(ctx: &ValidationContext) -> Result<(), FormatError> {
    let ids = ctx
        .snapshot
        .routes
        .iter()
        .filter(|segment| {
            segment.origin == segment.destination
                || !segment.distance.is_finite()
                || segment.distance < 0.
                || !segment.transit_time.is_finite()
                || segment.transit_time < 0.
                || !(0. ..=1.).contains(&segment.congestion_risk)
        })
        .map(|segment| format!("{}->{}", segment.origin, segment.destination))
        .collect();

    check_ids(
        "E1300",
        "invalid route segments",
        "use distinct stations, non-negative distance and transit time, congestion risk in [0, 1]",
        ids,
    )
}

/// Checks that material catalog has no duplicate ids.
fn check_e1400_no_materials_with_duplicate_ids(ctx: &ValidationContext) -> Result<(), FormatError> {
    let ids = get_duplicates(ctx.snapshot.materials.iter().map(|material| &material.id)).into_iter().cloned().collect();

    check_ids("E1400", "duplicated material ids", "remove duplicates or use unique ids", ids)
}

/// Checks that every material allows at least one wagon type.
fn check_e1401_material_wagon_types(ctx: &ValidationContext) -> Result<(), FormatError> {
    let ids = ctx
        .snapshot
        .materials
        .iter()
        .filter(|material| material.wagon_types.is_empty())
        .map(|material| material.id.clone())
        .collect();

    check_ids("E1401", "material has no allowed wagon types", "add wagon types to materials", ids)
}

/// Checks that start time can be parsed.
fn check_e1500_start_time(ctx: &ValidationContext) -> Result<(), FormatError> {
    parse_time(&ctx.snapshot.start_time).map(|_| ()).map_err(|err| {
        FormatError::new_with_details(
            "E1500".to_string(),
            "invalid snapshot start time".to_string(),
            "use RFC3339 format, e.g. '2024-07-04T09:00:00Z'".to_string(),
            err.to_string(),
        )
    })
}

/// Validates route network, material catalog and snapshot properties.
pub fn validate_network(ctx: &ValidationContext) -> Result<(), MultiFormatError> {
    combine_error_results(&[
        check_e1300_segment_correctness(ctx),
        check_e1400_no_materials_with_duplicate_ids(ctx),
        check_e1401_material_wagon_types(ctx),
        check_e1500_start_time(ctx),
    ])
    .map_err(From::from)
}
